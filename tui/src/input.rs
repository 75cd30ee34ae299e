//! Input handling for Reel TUI.

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::sync::mpsc;
use tracing::debug;

use reel_engine::{App, AuthField, Direction, PopularView, Route, TextField};

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 1024; // bounded: no OOM
const MAX_EVENTS_PER_FRAME: usize = 64; // never starve rendering

enum InputMsg {
    Event(Event),
    Error(String),
}

/// Reads terminal events on a blocking thread and hands them to the frame loop.
pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<tokio::task::JoinHandle<()>>,
}

impl InputPump {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = stop.clone();

        let join = tokio::task::spawn_blocking(move || input_loop(stop2, tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    pub async fn shutdown(&mut self) {
        // Close first so a thread blocked on a full channel wakes up.
        self.rx.close();

        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = tokio::time::timeout(Duration::from_secs(2), join).await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Best-effort stop if caller exits early; do not block in Drop.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: Arc<AtomicBool>, tx: mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    // Bounded queue: apply backpressure instead of dropping events.
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

/// Drain queued input into `app`. Returns true once the app wants to quit.
pub fn handle_events(app: &mut App, input: &mut InputPump) -> Result<bool> {
    let mut processed = 0;
    while processed < MAX_EVENTS_PER_FRAME {
        let ev = match input.rx.try_recv() {
            Ok(InputMsg::Event(ev)) => ev,
            Ok(InputMsg::Error(msg)) => return Err(anyhow!("input error: {msg}")),
            Err(mpsc::error::TryRecvError::Empty) => break,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                return Err(anyhow!("input pump disconnected"));
            }
        };
        apply_event(app, ev);
        processed += 1;
        if app.should_quit() {
            return Ok(true);
        }
    }
    if processed == MAX_EVENTS_PER_FRAME {
        debug!(backlog = input.rx.len(), "Input budget exhausted for this frame");
    }
    Ok(app.should_quit())
}

/// Apply one terminal event to the app.
pub fn apply_event(app: &mut App, ev: Event) {
    match ev {
        Event::Key(key) if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                app.request_quit();
                return;
            }
            if app.route() == Route::SignIn {
                handle_sign_in_key(app, key);
            } else if app.route() == Route::Search && app.search().is_editing_query() {
                handle_query_key(app, key);
            } else {
                handle_browse_key(app, key);
            }
        }
        Event::Paste(text) => {
            if app.route() == Route::SignIn {
                if let Some(field) = app.auth_form_mut().focused_text_mut() {
                    field.enter_text(&text);
                }
            } else if app.route() == Route::Search && app.search().is_editing_query() {
                app.query_field_mut().enter_text(&text);
            }
        }
        _ => {}
    }
}

/// Line editing shared by the sign-in fields and the search box.
fn edit_text(field: &mut TextField, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('w') if ctrl => field.delete_word_backwards(),
        KeyCode::Char('u') if ctrl => field.clear(),
        KeyCode::Char(c) if !ctrl => field.enter_char(c),
        KeyCode::Backspace => field.delete_char(),
        KeyCode::Delete => field.delete_char_forward(),
        KeyCode::Left => field.move_cursor_left(),
        KeyCode::Right => field.move_cursor_right(),
        KeyCode::Home => field.move_cursor_home(),
        KeyCode::End => field.move_cursor_end(),
        _ => {}
    }
}

fn handle_sign_in_key(app: &mut App, key: KeyEvent) {
    let focused = app.auth_form().focused();
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('n') if ctrl => app.flip_auth_card(),
        KeyCode::Tab | KeyCode::Down => app.auth_form_mut().focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.auth_form_mut().focus_prev(),
        KeyCode::Enter => activate(app, focused),
        KeyCode::Char(' ') if !focused.is_text() => activate(app, focused),
        _ => {
            if let Some(field) = app.auth_form_mut().focused_text_mut() {
                edit_text(field, key);
            }
        }
    }
}

fn activate(app: &mut App, field: AuthField) {
    match field {
        AuthField::RememberMe | AuthField::AcceptTerms => {
            app.auth_form_mut().toggle_focused_checkbox();
        }
        AuthField::SwitchCard => app.flip_auth_card(),
        AuthField::Email | AuthField::Password | AuthField::ConfirmPassword | AuthField::Submit => {
            app.submit_auth_form();
        }
    }
}

fn handle_query_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.commit_query(),
        KeyCode::Esc => app.cancel_query_edit(),
        _ => edit_text(app.query_field_mut(), key),
    }
}

fn handle_browse_key(app: &mut App, key: KeyEvent) {
    let route = app.route();
    match key.code {
        KeyCode::Char('q') => app.request_quit(),
        KeyCode::Char(c @ '1'..='4') => app.select_tab((c as usize) - ('1' as usize)),
        KeyCode::Tab => app.next_tab(),
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(Direction::Up),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(Direction::Down),
        KeyCode::Left | KeyCode::Char('h') => app.move_selection(Direction::Left),
        KeyCode::Char('l') if route == Route::Search => app.cycle_language(),
        KeyCode::Right | KeyCode::Char('l') => app.move_selection(Direction::Right),
        KeyCode::Enter | KeyCode::Char(' ') => app.toggle_selected_wishlist(),
        KeyCode::Char('n') | KeyCode::PageDown => app.next_page(),
        KeyCode::Char('p') | KeyCode::PageUp => app.prev_page(),
        KeyCode::Char('v') if route == Route::Popular => app.toggle_popular_view(),
        KeyCode::Char('t') if is_feed(app) => app.reset_feed(),
        KeyCode::Char('g') if route == Route::Search => app.cycle_genre(),
        KeyCode::Char('r') if route == Route::Search => app.cycle_rating(),
        KeyCode::Char('c') if route == Route::Search => app.reset_filters(),
        KeyCode::Char('/') => {
            app.navigate(Route::Search);
            if app.route() == Route::Search {
                app.begin_query_edit();
            }
        }
        KeyCode::Char('L') => app.logout(),
        _ => {}
    }
}

fn is_feed(app: &App) -> bool {
    match app.route() {
        Route::Search => true,
        Route::Popular => app.popular().view() == PopularView::Infinite,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use reel_engine::{AuthCard, ExpiringCache, Settings, Storage};

    fn app() -> App {
        App::new(
            Settings::with_data_dir(PathBuf::from(".").join("reel-test")),
            Storage::in_memory(),
            ExpiringCache::in_memory(),
        )
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            apply_event(app, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn ctrl_c_quits_from_any_screen() {
        let mut app = app();
        apply_event(&mut app, ctrl('c'));
        assert!(app.should_quit());
    }

    #[test]
    fn q_is_text_on_the_sign_in_card() {
        let mut app = app();
        type_text(&mut app, "q@x.io");
        assert!(!app.should_quit());
        assert_eq!(app.auth_form().email.text(), "q@x.io");
    }

    #[test]
    fn tab_walks_fields_and_space_toggles_checkbox() {
        let mut app = app();
        apply_event(&mut app, key(KeyCode::Tab));
        assert_eq!(app.auth_form().focused(), AuthField::Password);
        apply_event(&mut app, key(KeyCode::Tab));
        assert_eq!(app.auth_form().focused(), AuthField::RememberMe);
        apply_event(&mut app, key(KeyCode::Char(' ')));
        assert!(app.auth_form().remember_me);
        apply_event(&mut app, key(KeyCode::BackTab));
        assert_eq!(app.auth_form().focused(), AuthField::Password);
    }

    #[test]
    fn ctrl_n_flips_to_the_register_card() {
        let mut app = app();
        apply_event(&mut app, ctrl('n'));
        assert_eq!(app.auth_form().card(), AuthCard::Register);
        type_text(&mut app, "new@x.io");
        assert_eq!(app.auth_form().register_email.text(), "new@x.io");
    }

    #[test]
    fn paste_lands_in_the_focused_field() {
        let mut app = app();
        apply_event(&mut app, key(KeyCode::Tab));
        apply_event(&mut app, Event::Paste("secret-key\n".to_string()));
        assert_eq!(app.auth_form().password.text(), "secret-key");
        assert!(app.auth_form().email.is_empty());
    }

    #[test]
    fn editing_keys_move_within_the_field() {
        let mut app = app();
        type_text(&mut app, "ab");
        apply_event(&mut app, key(KeyCode::Left));
        type_text(&mut app, "X");
        assert_eq!(app.auth_form().email.text(), "aXb");
        apply_event(&mut app, key(KeyCode::Backspace));
        apply_event(&mut app, key(KeyCode::End));
        apply_event(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.auth_form().email.text(), "a");
    }

    #[test]
    fn register_then_sign_in_through_the_keyboard() {
        let mut app = app();
        apply_event(&mut app, ctrl('n'));
        type_text(&mut app, "viewer@example.com");
        apply_event(&mut app, key(KeyCode::Tab));
        type_text(&mut app, "tmdb-key");
        apply_event(&mut app, key(KeyCode::Tab));
        type_text(&mut app, "tmdb-key");
        apply_event(&mut app, key(KeyCode::Tab));
        apply_event(&mut app, key(KeyCode::Char(' ')));
        apply_event(&mut app, key(KeyCode::Enter));
        assert_eq!(app.auth_form().card(), AuthCard::Login);
        assert_eq!(app.auth_form().email.text(), "viewer@example.com");

        apply_event(&mut app, key(KeyCode::Tab));
        type_text(&mut app, "tmdb-key");
        apply_event(&mut app, key(KeyCode::Enter));
        assert_eq!(app.route(), Route::Home);
        assert_eq!(app.current_user(), Some("viewer@example.com"));
    }

    #[test]
    fn empty_login_stays_on_sign_in() {
        let mut app = app();
        apply_event(&mut app, key(KeyCode::Enter));
        assert_eq!(app.route(), Route::SignIn);
        assert!(app.current_notice().is_some());
        apply_event(&mut app, key(KeyCode::Char('1')));
        assert_eq!(app.route(), Route::SignIn);
    }
}
