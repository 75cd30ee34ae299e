//! Wishlist toggling and paging, persisted in `storage.json`.

use tempfile::tempdir;
use wiremock::MockServer;

use reel_engine::{MovieId, NoticeLevel, Route};
use reel_store::{Storage, keys};

use crate::common::{home_loaded, mount_home, movie, open_app, pump_until, sign_in};

#[tokio::test]
async fn toggled_movies_survive_restart() {
    let server = MockServer::start().await;
    mount_home(&server).await;
    let dir = tempdir().unwrap();

    let mut app = open_app(&server.uri(), dir.path());
    sign_in(&mut app, true);
    pump_until(&mut app, home_loaded).await;
    app.toggle_selected_wishlist();
    let notice = app.current_notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Success);
    assert_eq!(notice.text, "Added \"Movie 1\" to wishlist");
    assert!(app.is_wishlisted(MovieId::new(1)));
    drop(app);

    let mut app = open_app(&server.uri(), dir.path());
    app.start();
    assert_eq!(app.wishlist().len(), 1);
    app.navigate(Route::Wishlist);
    assert_eq!(app.selected_movie().map(|m| m.id), Some(MovieId::new(1)));

    app.toggle_selected_wishlist();
    assert_eq!(
        app.current_notice().map(|n| n.text.as_str()),
        Some("Removed \"Movie 1\" from wishlist")
    );
    assert!(app.wishlist().is_empty());
    assert_eq!(app.selected_movie(), None);
    drop(app);

    let app = open_app(&server.uri(), dir.path());
    assert!(app.wishlist().is_empty());
}

#[tokio::test]
async fn wishlist_pages_by_grid_capacity() {
    let server = MockServer::start().await;
    mount_home(&server).await;
    let dir = tempdir().unwrap();
    {
        let mut storage = Storage::open(dir.path()).unwrap();
        let saved: Vec<_> = (1..=25).map(|id| movie(id, "en", 7.0)).collect();
        storage.local.set_json(keys::WISHLIST, &saved).unwrap();
    }

    let mut app = open_app(&server.uri(), dir.path());
    sign_in(&mut app, true);
    app.navigate(Route::Wishlist);
    app.set_grid_layout(4, 2);
    let pager = app.wishlist_view().pager();
    assert_eq!(pager.page_count(app.wishlist().len()), 4);

    for _ in 0..5 {
        app.next_page();
    }
    assert_eq!(app.wishlist_view().pager().page(), 4);
    assert_eq!(app.wishlist_view().selected(), 24);

    app.prev_page();
    assert_eq!(app.wishlist_view().pager().page(), 3);
    assert_eq!(app.selected_movie().map(|m| m.id), Some(MovieId::new(17)));
}
