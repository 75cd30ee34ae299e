//! Sign-in, restart, and logout against file-backed storage.

use tempfile::tempdir;
use wiremock::MockServer;

use reel_engine::{NoticeLevel, Route, USER_EXISTS};

use crate::common::{EMAIL, KEY, home_loaded, mount_home, open_app, pump_until, sign_in};

#[tokio::test]
async fn remembered_login_survives_restart() {
    let server = MockServer::start().await;
    mount_home(&server).await;
    let dir = tempdir().unwrap();

    let mut app = open_app(&server.uri(), dir.path());
    sign_in(&mut app, true);
    assert_eq!(app.route(), Route::Home);
    assert_eq!(app.current_user(), Some(EMAIL));
    pump_until(&mut app, home_loaded).await;
    drop(app);

    let mut app = open_app(&server.uri(), dir.path());
    app.start();
    assert_eq!(app.route(), Route::Home);
    assert_eq!(app.current_user(), Some(EMAIL));
    assert!(app.is_signed_in());
}

#[tokio::test]
async fn unremembered_login_survives_restart_without_prefill() {
    let server = MockServer::start().await;
    mount_home(&server).await;
    let dir = tempdir().unwrap();

    let mut app = open_app(&server.uri(), dir.path());
    sign_in(&mut app, false);
    assert_eq!(app.route(), Route::Home);
    drop(app);

    let mut app = open_app(&server.uri(), dir.path());
    app.start();
    assert_eq!(app.route(), Route::Home);
    assert!(app.is_signed_in());

    app.logout();
    assert_eq!(app.route(), Route::SignIn);
    // Nothing remembered, so the card starts empty.
    assert!(app.auth_form().email.is_empty());
    assert!(!app.auth_form().remember_me);
}

#[tokio::test]
async fn logout_prefills_the_remembered_account() {
    let server = MockServer::start().await;
    mount_home(&server).await;
    let dir = tempdir().unwrap();

    let mut app = open_app(&server.uri(), dir.path());
    sign_in(&mut app, true);
    app.logout();
    assert_eq!(app.route(), Route::SignIn);
    assert_eq!(app.current_user(), None);
    assert_eq!(app.auth_form().email.text(), EMAIL);
    assert_eq!(app.auth_form().password.text(), KEY);
    assert!(app.auth_form().remember_me);
    drop(app);

    // The flag is gone, but the account and the prefill stay.
    let mut app = open_app(&server.uri(), dir.path());
    app.start();
    assert_eq!(app.route(), Route::SignIn);
    assert_eq!(app.auth_form().email.text(), EMAIL);
    app.submit_auth_form();
    assert_eq!(app.route(), Route::Home);
}

#[tokio::test]
async fn registered_accounts_persist() {
    let server = MockServer::start().await;
    mount_home(&server).await;
    let dir = tempdir().unwrap();

    let mut app = open_app(&server.uri(), dir.path());
    sign_in(&mut app, false);
    drop(app);

    let mut app = open_app(&server.uri(), dir.path());
    app.start();
    app.flip_auth_card();
    {
        let form = app.auth_form_mut();
        form.register_email.set_text(EMAIL.to_string());
        form.register_password.set_text("another-key".to_string());
        form.confirm_password.set_text("another-key".to_string());
        form.accept_terms = true;
    }
    app.submit_auth_form();
    let notice = app.current_notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.text, USER_EXISTS);
}
