//! The page cache in `cache.json` across restarts.

use std::time::Duration;

use tempfile::tempdir;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use reel_engine::{App, Route};
use reel_store::ExpiringCache;

use crate::common::{home_loaded, mount_home, pump_until, sign_in, test_settings};

#[tokio::test]
async fn cached_pages_skip_the_network_after_restart() {
    let server = MockServer::start().await;
    mount_home(&server).await;
    let dir = tempdir().unwrap();

    let mut app = App::open(test_settings(&server.uri(), dir.path())).unwrap();
    sign_in(&mut app, true);
    pump_until(&mut app, home_loaded).await;
    drop(app);

    let offline = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&offline)
        .await;

    let mut app = App::open(test_settings(&offline.uri(), dir.path())).unwrap();
    app.start();
    assert_eq!(app.route(), Route::Home);
    pump_until(&mut app, home_loaded).await;
    assert!(app.current_notice().is_none());
}

#[tokio::test]
async fn expired_pages_are_purged_on_start() {
    let server = MockServer::start().await;
    mount_home(&server).await;
    let dir = tempdir().unwrap();

    let mut settings = test_settings(&server.uri(), dir.path());
    settings.cache_ttl = Duration::from_millis(1);
    let mut app = App::open(settings).unwrap();
    sign_in(&mut app, true);
    pump_until(&mut app, home_loaded).await;
    drop(app);
    assert!(!ExpiringCache::open(dir.path()).unwrap().is_empty());

    tokio::time::sleep(Duration::from_millis(20)).await;
    let mut app = App::open(test_settings(&server.uri(), dir.path())).unwrap();
    app.start();
    // Purged before home asked for anything; fresh pages are still in flight.
    assert!(ExpiringCache::open(dir.path()).unwrap().is_empty());
    pump_until(&mut app, home_loaded).await;
}

#[tokio::test]
async fn disabled_cache_always_fetches() {
    let server = MockServer::start().await;
    mount_home(&server).await;
    let dir = tempdir().unwrap();

    let mut settings = test_settings(&server.uri(), dir.path());
    settings.cache_enabled = false;
    let mut app = App::open(settings).unwrap();
    sign_in(&mut app, true);
    pump_until(&mut app, home_loaded).await;
    assert!(ExpiringCache::open(dir.path()).unwrap().is_empty());
}
