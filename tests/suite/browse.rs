//! Home rows, the popular feed, and search over a mocked TMDB.

use tempfile::tempdir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use reel_engine::{Direction, MovieId, PopularView, Route};

use crate::common::{
    KEY, english_page, home_loaded, mount_home, mount_page, movie, open_app, page_json, pump_until,
    sign_in,
};

fn ids(movies: &[reel_types::Movie]) -> Vec<u64> {
    movies.iter().map(|m| m.id.get()).collect()
}

#[tokio::test]
async fn home_rows_come_from_their_endpoints() {
    let server = MockServer::start().await;
    mount_home(&server).await;
    let dir = tempdir().unwrap();

    let mut app = open_app(&server.uri(), dir.path());
    sign_in(&mut app, true);
    pump_until(&mut app, home_loaded).await;

    let home = app.home();
    assert_eq!(home.featured().map(|m| m.id), Some(MovieId::new(1)));
    assert_eq!(ids(home.rows()[0].movies()), vec![1, 2, 3]);
    assert_eq!(ids(home.rows()[1].movies()), vec![10, 11]);
    assert_eq!(ids(home.rows()[2].movies()), vec![20, 21, 22, 23, 24, 25]);

    // The banner reuses the Popular row's page.
    let requests = server.received_requests().await.unwrap();
    let popular_calls = requests
        .iter()
        .filter(|r| r.url.path() == "/movie/popular")
        .count();
    assert_eq!(popular_calls, 1);

    app.move_selection(Direction::Down);
    app.move_selection(Direction::Right);
    assert_eq!(app.selected_movie().map(|m| m.id), Some(MovieId::new(11)));
}

#[tokio::test]
async fn popular_feed_prefetches_near_the_end() {
    // Home's own rows 404 here; only popular matters.
    let server = MockServer::start().await;
    for page in 1..=3_u32 {
        let start = u64::from(page) * 100;
        mount_page(&server, "/movie/popular", page, english_page(start..start + 20, page, 3)).await;
    }
    let dir = tempdir().unwrap();

    let mut app = open_app(&server.uri(), dir.path());
    sign_in(&mut app, true);
    app.navigate(Route::Popular);
    app.toggle_popular_view();
    assert_eq!(app.popular().view(), PopularView::Infinite);
    app.set_grid_layout(5, 2);

    pump_until(&mut app, |app| app.popular().feed().feed().len() == 20).await;
    assert!(app.popular().feed().feed().has_more());

    // Two rows from the end of a four-row feed.
    app.move_selection(Direction::Down);
    pump_until(&mut app, |app| app.popular().feed().feed().len() == 40).await;

    for _ in 0..8 {
        app.move_selection(Direction::Down);
    }
    pump_until(&mut app, |app| !app.popular().feed().feed().has_more()).await;
    assert_eq!(app.popular().feed().feed().len(), 60);
}

#[tokio::test]
async fn search_query_replaces_the_genre_feed() {
    let server = MockServer::start().await;
    mount_home(&server).await;
    Mock::given(method("GET"))
        .and(path("/search/movie"))
        .and(query_param("query", "parasite"))
        .and(query_param("api_key", KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
            vec![movie(496_243, "ko", 8.5), movie(7, "en", 6.0)],
            1,
            1,
        )))
        .mount(&server)
        .await;
    let dir = tempdir().unwrap();

    let mut app = open_app(&server.uri(), dir.path());
    sign_in(&mut app, true);
    app.navigate(Route::Search);
    app.begin_query_edit();
    app.query_field_mut().enter_text("parasite");
    app.commit_query();
    assert_eq!(app.search().applied_query(), "parasite");

    pump_until(&mut app, |app| !app.search().feed().feed().has_more()).await;
    assert_eq!(ids(app.search().feed().feed().movies()), vec![496_243, 7]);

    // Language narrows client-side and refetches from page 1.
    app.cycle_language();
    app.cycle_language();
    pump_until(&mut app, |app| !app.search().feed().feed().has_more()).await;
    assert_eq!(ids(app.search().feed().feed().movies()), vec![496_243]);
}
