//! Shared test utilities and fixtures
//!
//! A wiremock stand-in for TMDB plus helpers for file-backed apps.

#![allow(dead_code)]

use std::path::Path;
use std::time::Duration;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use reel_engine::{App, Settings};
use reel_types::{Movie, MoviePage};

pub const EMAIL: &str = "viewer@example.com";
pub const KEY: &str = "tmdb-key";

/// Settings rooted at `data_dir`, talking to `base_url` with no retries.
pub fn test_settings(base_url: &str, data_dir: &Path) -> Settings {
    let mut settings = Settings::with_data_dir(data_dir.to_path_buf());
    settings.base_url = base_url.to_string();
    settings.max_retries = Some(0);
    settings.timeout = Duration::from_secs(5);
    settings
}

/// App backed by `storage.json` and `cache.json` under `data_dir`.
pub fn open_app(base_url: &str, data_dir: &Path) -> App {
    App::open(test_settings(base_url, data_dir)).expect("open app storage")
}

pub fn movie(id: u64, language: &str, vote: f64) -> Movie {
    Movie::new(id, format!("Movie {id}"))
        .with_language(language)
        .with_vote_average(vote)
        .with_release_date("2020-01-01")
}

pub fn page_json(movies: Vec<Movie>, page: u32, total_pages: u32) -> serde_json::Value {
    let total_results = total_pages * 20;
    serde_json::to_value(MoviePage {
        results: movies,
        page,
        total_pages,
        total_results,
    })
    .expect("serialize page")
}

/// English movies with consecutive ids.
pub fn english_page(ids: std::ops::Range<u64>, page: u32, total_pages: u32) -> serde_json::Value {
    page_json(ids.map(|id| movie(id, "en", 7.5)).collect(), page, total_pages)
}

/// Answer `GET route?page=N` with `body`.
pub async fn mount_page(server: &MockServer, route: &str, page: u32, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(query_param("page", page.to_string()))
        .and(query_param("api_key", KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Everything the home screen asks for.
pub async fn mount_home(server: &MockServer) {
    mount_page(server, "/movie/popular", 1, english_page(1..4, 1, 10)).await;
    mount_page(server, "/movie/now_playing", 2, english_page(10..12, 2, 10)).await;
    mount_page(server, "/discover/movie", 1, english_page(20..26, 1, 10)).await;
}

/// Register and sign in through the sign-in form.
pub fn sign_in(app: &mut App, remember: bool) {
    app.flip_auth_card();
    {
        let form = app.auth_form_mut();
        form.register_email.set_text(EMAIL.to_string());
        form.register_password.set_text(KEY.to_string());
        form.confirm_password.set_text(KEY.to_string());
        form.accept_terms = true;
    }
    app.submit_auth_form();
    {
        let form = app.auth_form_mut();
        assert_eq!(form.email.text(), EMAIL, "registration prefills the login email");
        form.password.set_text(KEY.to_string());
        form.remember_me = remember;
    }
    app.submit_auth_form();
}

/// Apply fetch results until `done` holds, or fail after ~3s.
pub async fn pump_until(app: &mut App, done: impl Fn(&App) -> bool) {
    for _ in 0..300 {
        app.process_fetch_events();
        if done(app) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "condition not reached; notices: {:?}",
        app.notices().iter().map(|n| n.text.clone()).collect::<Vec<_>>()
    );
}

pub fn home_loaded(app: &App) -> bool {
    app.home().featured().is_some() && app.home().rows().iter().all(|r| !r.movies().is_empty())
}
