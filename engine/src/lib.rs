//! Application state machine for Reel.
//!
//! This crate holds the `App` without any terminal dependencies. The TUI
//! reads state through getters and calls the action methods; network pages
//! arrive through [`App::process_fetch_events`], which the frame loop calls
//! once per frame.

mod auth_form;
mod browse;
mod feed;
mod fetch;
mod home;
mod notice;
mod pager;
mod text_field;

pub use auth_form::{
    AuthCard, AuthField, AuthForm, EMAIL_EMPTY, FormRejection, LOGIN_INCOMPLETE,
    PASSWORD_EMPTY, PASSWORD_MISMATCH, TERMS_NOT_ACCEPTED,
};
pub use browse::{
    Direction, FeedView, PopularState, PopularTable, SearchState, TMDB_PAGE_SIZE, WishlistView,
    move_in_grid,
};
pub use feed::{FeedUpdate, InfiniteFeed, MAX_EMPTY_PAGE_SKIPS};
pub use fetch::{FetchEvent, FetchTarget};
pub use home::{HomeRow, HomeState};
pub use notice::{NOTICE_TTL, Notice, NoticeLevel, Notices};
pub use pager::Pager;
pub use text_field::TextField;

pub use reel_config::Settings;
pub use reel_store::{ExpiringCache, Storage};
pub use reel_types::{
    DiscoverFilter, Genre, LanguageFilter, Movie, MovieId, PopularView, RatingFilter, Route,
    UiOptions,
};

use std::path::PathBuf;
use std::time::Instant;

use reel_store::{AuthError, LoginPersistence, StoreError, Toggle, Wishlist};
use reel_tmdb::{ClientSettings, Endpoint, RetryConfig, TmdbClient, TmdbError};
use reel_types::{ApiKey, MoviePage};

use fetch::FetchQueue;

pub const INVALID_API_KEY: &str = "Invalid TMDB API key";
pub const LOAD_FAILED: &str = "Failed to load movies";
pub const USER_EXISTS: &str = "This user already exists.";
pub const REGISTRATION_FAILED: &str = "Registration failed.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FeedKind {
    Popular,
    Search,
}

// ============================================================================
// App
// ============================================================================

#[derive(Debug)]
pub struct App {
    settings: Settings,
    config_path: Option<PathBuf>,
    storage: Storage,
    cache: ExpiringCache,
    client: Option<TmdbClient>,
    wishlist: Wishlist,

    route: Route,
    current_user: Option<String>,
    auth_form: AuthForm,
    home: HomeState,
    popular: PopularState,
    search: SearchState,
    wishlist_view: WishlistView,

    notices: Notices,
    fetches: FetchQueue,
    /// Bumped on logout so pages requested by the previous session are dropped.
    epoch: u64,
    grid: (usize, usize),
    tick: u64,
    should_quit: bool,
}

impl App {
    #[must_use]
    pub fn new(settings: Settings, mut storage: Storage, cache: ExpiringCache) -> Self {
        let wishlist = Wishlist::load(&storage.local);
        let auth_form = AuthForm::prefilled(storage.auth().remembered_user());
        let popular = PopularState {
            view: settings.popular_view,
            ..PopularState::default()
        };
        Self {
            settings,
            config_path: None,
            storage,
            cache,
            client: None,
            wishlist,
            route: Route::SignIn,
            current_user: None,
            auth_form,
            home: HomeState::default(),
            popular,
            search: SearchState::default(),
            wishlist_view: WishlistView::default(),
            notices: Notices::default(),
            fetches: FetchQueue::default(),
            epoch: 0,
            grid: (0, 0),
            tick: 0,
            should_quit: false,
        }
    }

    /// File-backed storage and cache under `settings.data_dir`.
    pub fn open(settings: Settings) -> Result<Self, StoreError> {
        let storage = Storage::open(&settings.data_dir)?;
        let cache = ExpiringCache::open(&settings.data_dir)?;
        Ok(Self::new(settings, storage, cache))
    }

    /// Where `toggle_popular_view` saves the choice.
    #[must_use]
    pub fn with_config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    /// Restore the previous session, if any.
    pub fn start(&mut self) {
        match self.cache.purge_expired() {
            Ok(0) => {}
            Ok(purged) => tracing::debug!(purged, "Purged expired cache entries"),
            Err(e) => tracing::warn!("Cache purge failed: {e}"),
        }

        if !self.storage.is_authenticated() {
            return;
        }
        if self.resolve_api_key().is_none() {
            tracing::info!("Clearing session whose key did not survive restart");
            if let Err(e) = self.storage.auth().logout() {
                tracing::warn!("Failed to clear stale session: {e}");
            }
            return;
        }
        self.current_user = self.storage.current_user().map(str::to_string);
        self.navigate(Route::Home);
    }

    // ------------------------------------------------------------------
    // Getters
    // ------------------------------------------------------------------

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn ui(&self) -> UiOptions {
        self.settings.ui
    }

    #[must_use]
    pub fn route(&self) -> Route {
        self.route
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&str> {
        self.current_user.as_deref()
    }

    #[must_use]
    pub fn auth_form(&self) -> &AuthForm {
        &self.auth_form
    }

    pub fn auth_form_mut(&mut self) -> &mut AuthForm {
        &mut self.auth_form
    }

    #[must_use]
    pub fn home(&self) -> &HomeState {
        &self.home
    }

    #[must_use]
    pub fn popular(&self) -> &PopularState {
        &self.popular
    }

    #[must_use]
    pub fn search(&self) -> &SearchState {
        &self.search
    }

    #[must_use]
    pub fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    #[must_use]
    pub fn wishlist_view(&self) -> &WishlistView {
        &self.wishlist_view
    }

    #[must_use]
    pub fn is_wishlisted(&self, id: MovieId) -> bool {
        self.wishlist.contains(id)
    }

    #[must_use]
    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    #[must_use]
    pub fn current_notice(&self) -> Option<&Notice> {
        self.notices.current()
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Signed in with a key the client can use.
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.storage.is_authenticated() && self.resolve_api_key().is_some()
    }

    /// The movie under the cursor on the current screen.
    #[must_use]
    pub fn selected_movie(&self) -> Option<&Movie> {
        match self.route {
            Route::SignIn => None,
            Route::Home => self.home.selected_movie(),
            Route::Popular => self.popular.selected_movie(),
            Route::Search => self.search.feed.selected_movie(),
            Route::Wishlist => self.wishlist.movies().get(self.wishlist_view.selected()),
        }
    }

    pub fn push_notice(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notices.push(level, text);
    }

    // ------------------------------------------------------------------
    // Frame hooks
    // ------------------------------------------------------------------

    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        self.notices.prune(Instant::now());
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    /// Grid capacity reported by the renderer.
    pub fn set_grid_layout(&mut self, columns: usize, rows: usize) {
        let columns = columns.max(1);
        let rows = rows.max(1);
        if self.grid == (columns, rows) {
            return;
        }
        self.grid = (columns, rows);
        self.popular.table.set_layout(columns, rows);
        self.popular.feed.set_columns(columns);
        self.search.feed.set_columns(columns);
        self.wishlist_view
            .set_layout(columns, rows, self.wishlist.len());

        match self.route {
            Route::Popular if self.popular.view == PopularView::Infinite => {
                self.maybe_prefetch(FeedKind::Popular);
            }
            Route::Search => self.maybe_prefetch(FeedKind::Search),
            _ => {}
        }
    }

    /// Cards that fit in one home row.
    pub fn set_home_layout(&mut self, cards: usize) {
        self.home.set_visible_cards(cards);
    }

    // ------------------------------------------------------------------
    // Routing
    // ------------------------------------------------------------------

    /// Go to `route`, or to sign-in when it needs a session we don't have.
    pub fn navigate(&mut self, route: Route) {
        let target = if route.requires_auth() && !self.is_signed_in() {
            Route::SignIn
        } else {
            route
        };
        if target != route {
            tracing::debug!(?route, "Redirecting to sign-in");
        }
        self.route = target;
        if target.requires_auth() && self.client.is_none() && !self.connect() {
            self.route = Route::SignIn;
            return;
        }
        self.enter(target);
    }

    pub fn next_tab(&mut self) {
        self.navigate(self.route.next_tab());
    }

    /// Header tab by index (0-based).
    pub fn select_tab(&mut self, index: usize) {
        if let Some(route) = Route::TABS.get(index) {
            self.navigate(*route);
        }
    }

    fn enter(&mut self, route: Route) {
        match route {
            Route::SignIn => {}
            Route::Home => self.load_home(),
            Route::Popular => self.load_popular(),
            Route::Search => {
                if self.search.feed.feed.is_empty() {
                    self.fetch_feed(FeedKind::Search);
                }
            }
            Route::Wishlist => self.wishlist_view.clamp(self.wishlist.len()),
        }
    }

    fn load_home(&mut self) {
        for index in 0..self.home.rows().len() {
            let Some(row) = self.home.row_mut(index) else {
                continue;
            };
            if row.begin_load() {
                let endpoint = row.endpoint().clone();
                let page = row.page();
                self.request(FetchTarget::HomeRow(index), endpoint, page);
            }
        }
    }

    fn load_popular(&mut self) {
        match self.popular.view {
            PopularView::Table => {
                if self.popular.table.begin_load() {
                    self.request(FetchTarget::PopularTable, Endpoint::Popular, 1);
                }
            }
            PopularView::Infinite => {
                if self.popular.feed.feed.is_empty() {
                    self.fetch_feed(FeedKind::Popular);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------

    fn resolve_api_key(&self) -> Option<ApiKey> {
        self.settings
            .api_key_override
            .as_deref()
            .and_then(ApiKey::new)
            .or_else(|| self.storage.api_key().and_then(ApiKey::new))
    }

    fn client_settings(&self) -> ClientSettings {
        let retry = match self.settings.max_retries {
            Some(max_retries) => RetryConfig {
                max_retries,
                ..RetryConfig::default()
            },
            None => RetryConfig::default(),
        };
        ClientSettings {
            base_url: self.settings.base_url.clone(),
            language: self.settings.language.clone(),
            timeout: self.settings.timeout,
            retry,
        }
    }

    fn connect(&mut self) -> bool {
        let Some(key) = self.resolve_api_key() else {
            return false;
        };
        match TmdbClient::new(self.client_settings(), key) {
            Ok(client) => {
                self.client = Some(client);
                true
            }
            Err(e) => {
                tracing::warn!("Failed to build TMDB client: {e}");
                self.notices.push(NoticeLevel::Error, LOAD_FAILED);
                false
            }
        }
    }

    pub fn submit_auth_form(&mut self) {
        match self.auth_form.card() {
            AuthCard::Login => self.submit_login(),
            AuthCard::Register => self.submit_register(),
        }
    }

    pub fn flip_auth_card(&mut self) {
        self.auth_form.flip_card();
    }

    fn reject(&mut self, rejection: FormRejection) {
        let level = if rejection.is_warning {
            NoticeLevel::Warning
        } else {
            NoticeLevel::Error
        };
        self.notices.push(level, rejection.message);
    }

    fn submit_login(&mut self) {
        let (email, password) = match self.auth_form.validate_login() {
            Ok(credentials) => credentials,
            Err(rejection) => return self.reject(rejection),
        };
        // Remember-me only controls the prefill; the key always persists.
        let remember = self.auth_form.remember_me;

        let mut auth = self.storage.auth();
        match auth.try_login(&email, &password, LoginPersistence::Remember) {
            Ok(_) => {
                if let Err(e) = auth.set_remember_user(&email, &password, remember) {
                    tracing::warn!("Failed to update remembered user: {e}");
                }
            }
            Err(AuthError::InvalidCredentials) => {
                self.notices.push(NoticeLevel::Error, "Login failed");
                return;
            }
            Err(e) => {
                tracing::warn!("Login failed: {e}");
                self.notices.push(NoticeLevel::Error, "Login failed");
                return;
            }
        }

        self.client = None;
        self.current_user = Some(email.as_str().to_string());
        self.notices.push(NoticeLevel::Success, "Login successful");
        self.navigate(Route::Home);
    }

    fn submit_register(&mut self) {
        let (email, password) = match self.auth_form.validate_register() {
            Ok(credentials) => credentials,
            Err(rejection) => return self.reject(rejection),
        };
        match self.storage.auth().try_register(&email, &password) {
            Ok(()) => {
                self.auth_form.finish_registration();
                self.auth_form.email = TextField::with_text(email.as_str());
                self.auth_form.password.clear();
                self.notices.push(NoticeLevel::Success, "Registration successful");
            }
            Err(AuthError::UserExists) => self.notices.push(NoticeLevel::Error, USER_EXISTS),
            Err(e) => {
                tracing::warn!("Registration failed: {e}");
                self.notices.push(NoticeLevel::Error, REGISTRATION_FAILED);
            }
        }
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.storage.auth().logout() {
            tracing::warn!("Logout failed to clear storage: {e}");
        }
        self.epoch = self.epoch.wrapping_add(1);
        self.client = None;
        self.current_user = None;
        self.home = HomeState::default();
        self.popular = PopularState {
            view: self.popular.view,
            ..PopularState::default()
        };
        self.search = SearchState::default();
        self.wishlist_view = WishlistView::default();
        self.grid = (0, 0);
        self.auth_form = AuthForm::prefilled(self.storage.auth().remembered_user());
        self.route = Route::SignIn;
        self.notices.push(NoticeLevel::Info, "Logged out");
    }

    // ------------------------------------------------------------------
    // Browsing
    // ------------------------------------------------------------------

    pub fn move_selection(&mut self, direction: Direction) {
        match self.route {
            Route::SignIn => {}
            Route::Home => match direction {
                Direction::Up => self.home.focus_up(),
                Direction::Down => self.home.focus_down(),
                Direction::Left => self.home.focused_row_mut().select_prev(),
                Direction::Right => self.home.focused_row_mut().select_next(),
            },
            Route::Popular => match self.popular.view {
                PopularView::Table => self.popular.table.move_selection(direction),
                PopularView::Infinite => {
                    self.popular.feed.move_selection(direction);
                    self.maybe_prefetch(FeedKind::Popular);
                }
            },
            Route::Search => {
                self.search.feed.move_selection(direction);
                self.maybe_prefetch(FeedKind::Search);
            }
            Route::Wishlist => self
                .wishlist_view
                .move_selection(self.wishlist.len(), direction),
        }
    }

    pub fn next_page(&mut self) {
        match self.route {
            Route::Home => self.home.focused_row_mut().slide_right(),
            Route::Popular if self.popular.view == PopularView::Table => {
                self.popular.table.next_page();
            }
            Route::Wishlist => self.wishlist_view.next_page(self.wishlist.len()),
            _ => {}
        }
    }

    pub fn prev_page(&mut self) {
        match self.route {
            Route::Home => self.home.focused_row_mut().slide_left(),
            Route::Popular if self.popular.view == PopularView::Table => {
                self.popular.table.prev_page();
            }
            Route::Wishlist => self.wishlist_view.prev_page(self.wishlist.len()),
            _ => {}
        }
    }

    pub fn toggle_selected_wishlist(&mut self) {
        let Some(movie) = self.selected_movie().cloned() else {
            return;
        };
        match self.wishlist.toggle(&movie, &mut self.storage.local) {
            Ok(Toggle::Added) => {
                self.notices
                    .push(NoticeLevel::Success, format!("Added \"{}\" to wishlist", movie.title));
            }
            Ok(Toggle::Removed) => {
                self.notices.push(
                    NoticeLevel::Info,
                    format!("Removed \"{}\" from wishlist", movie.title),
                );
            }
            Err(e) => {
                tracing::warn!(movie = %movie.id, "Wishlist update failed: {e}");
                self.notices
                    .push(NoticeLevel::Error, "Failed to update wishlist");
            }
        }
        self.wishlist_view.clamp(self.wishlist.len());
    }

    pub fn toggle_popular_view(&mut self) {
        let view = self.popular.view.toggle();
        self.popular.view = view;
        tracing::info!(view = view.as_str(), "Popular view changed");
        if let Some(path) = &self.config_path
            && let Err(e) = reel_config::persist_popular_view_at(path, view)
        {
            tracing::warn!("Failed to save popular view to {}: {e}", path.display());
        }
        if self.route == Route::Popular {
            self.load_popular();
        }
    }

    /// Scroll the current feed to the top and refetch from page 1.
    pub fn reset_feed(&mut self) {
        match self.route {
            Route::Popular if self.popular.view == PopularView::Infinite => {
                self.popular.feed.reset();
                self.fetch_feed(FeedKind::Popular);
            }
            Route::Search => self.reset_search(),
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    pub fn cycle_genre(&mut self) {
        self.search.filter.genre = self.search.filter.genre.next();
        self.reset_search();
    }

    pub fn cycle_rating(&mut self) {
        self.search.filter.rating = self.search.filter.rating.next();
        self.reset_search();
    }

    pub fn cycle_language(&mut self) {
        self.search.filter.language = self.search.filter.language.next();
        self.reset_search();
    }

    pub fn reset_filters(&mut self) {
        self.search.filter = DiscoverFilter::default();
        self.search.query.clear();
        self.search.applied_query.clear();
        self.reset_search();
    }

    pub fn begin_query_edit(&mut self) {
        self.search.editing_query = true;
        self.search.query.move_cursor_end();
    }

    pub fn query_field_mut(&mut self) -> &mut TextField {
        &mut self.search.query
    }

    pub fn commit_query(&mut self) {
        self.search.editing_query = false;
        let query = self.search.query.text().trim().to_string();
        if query == self.search.applied_query {
            return;
        }
        self.search.applied_query = query;
        self.reset_search();
    }

    pub fn cancel_query_edit(&mut self) {
        self.search.editing_query = false;
        let applied = self.search.applied_query.clone();
        self.search.query.set_text(applied);
    }

    fn reset_search(&mut self) {
        self.search.feed.reset();
        if self.route == Route::Search {
            self.fetch_feed(FeedKind::Search);
        }
    }

    // ------------------------------------------------------------------
    // Fetching
    // ------------------------------------------------------------------

    fn feed_view(&self, kind: FeedKind) -> &FeedView {
        match kind {
            FeedKind::Popular => &self.popular.feed,
            FeedKind::Search => &self.search.feed,
        }
    }

    fn fetch_feed(&mut self, kind: FeedKind) {
        let (endpoint, claim) = match kind {
            FeedKind::Popular => (Endpoint::Popular, self.popular.feed.feed.begin_fetch()),
            FeedKind::Search => (self.search.endpoint(), self.search.feed.feed.begin_fetch()),
        };
        let Some((generation, page)) = claim else {
            return;
        };
        let target = match kind {
            FeedKind::Popular => FetchTarget::PopularFeed { generation },
            FeedKind::Search => FetchTarget::SearchFeed { generation },
        };
        self.request(target, endpoint, page);
    }

    fn maybe_prefetch(&mut self, kind: FeedKind) {
        let view = self.feed_view(kind);
        if view
            .feed
            .near_end(view.selected(), view.columns(), self.settings.feed_prefetch_rows)
        {
            self.fetch_feed(kind);
        }
    }

    fn request(&mut self, target: FetchTarget, endpoint: Endpoint, page: u32) {
        if self.settings.cache_enabled {
            let key = endpoint.cache_key(&self.settings.language, page);
            if let Some(cached) = self.cache.get::<MoviePage>(&key) {
                tracing::debug!(%key, "Cache hit");
                self.fetches.deliver(FetchEvent {
                    target,
                    endpoint,
                    page,
                    epoch: self.epoch,
                    cached: true,
                    result: Ok(cached),
                });
                return;
            }
        }

        let Some(client) = self.client.clone() else {
            self.fetches.deliver(FetchEvent {
                target,
                endpoint,
                page,
                epoch: self.epoch,
                cached: false,
                result: Err(TmdbError::Unauthorized {
                    message: "no API key".to_string(),
                }),
            });
            return;
        };
        tracing::debug!(endpoint = endpoint.name(), page, ?target, "Fetching");
        self.fetches.spawn(client, target, endpoint, page, self.epoch);
    }

    /// Apply every finished fetch. Returns how many events were handled.
    pub fn process_fetch_events(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.fetches.try_recv() {
            handled += 1;
            if event.epoch != self.epoch {
                tracing::debug!(target = ?event.target, "Dropping page from previous session");
                continue;
            }
            match event.result {
                Ok(page) => {
                    if !event.cached && self.settings.cache_enabled {
                        let key = event.endpoint.cache_key(&self.settings.language, event.page);
                        if let Err(e) = self.cache.set(&key, &page, self.settings.cache_ttl) {
                            tracing::warn!(%key, "Failed to cache page: {e}");
                        }
                    }
                    self.apply_page(event.target, event.page, page);
                }
                Err(err) => self.apply_failure(event.target, &event.endpoint, event.page, &err),
            }
        }
        handled
    }

    fn apply_page(&mut self, target: FetchTarget, requested: u32, page: MoviePage) {
        match target {
            FetchTarget::HomeRow(index) => {
                if let Some(row) = self.home.row_mut(index) {
                    row.finish_load(Some(page.results));
                }
            }
            FetchTarget::PopularTable => {
                let has_next = page.has_next();
                let more = self.popular.table.append_page(
                    page.results,
                    requested,
                    has_next,
                    self.settings.grid_movie_limit,
                );
                let (columns, rows) = self.grid;
                if columns > 0 {
                    self.popular.table.set_layout(columns, rows);
                }
                if more {
                    self.request(FetchTarget::PopularTable, Endpoint::Popular, requested + 1);
                }
            }
            FetchTarget::PopularFeed { generation } => {
                let update = self.popular.feed.feed.apply_page(generation, page, |_| true);
                self.after_feed_update(FeedKind::Popular, update);
            }
            FetchTarget::SearchFeed { generation } => {
                let filter = self.search.filter;
                let update = self
                    .search
                    .feed
                    .feed
                    .apply_page(generation, page, |movie| filter.matches(movie));
                self.after_feed_update(FeedKind::Search, update);
            }
        }
    }

    fn after_feed_update(&mut self, kind: FeedKind, update: FeedUpdate) {
        match update {
            FeedUpdate::Stale | FeedUpdate::Exhausted { .. } => {}
            FeedUpdate::NeedsMore => self.fetch_feed(kind),
            FeedUpdate::Appended { .. } => self.maybe_prefetch(kind),
        }
    }

    fn apply_failure(&mut self, target: FetchTarget, endpoint: &Endpoint, page: u32, err: &TmdbError) {
        tracing::warn!(endpoint = endpoint.name(), page, ?target, "Fetch failed: {err}");
        match target {
            FetchTarget::HomeRow(index) => {
                if let Some(row) = self.home.row_mut(index) {
                    row.finish_load(None);
                }
            }
            FetchTarget::PopularTable => self.popular.table.fail(),
            FetchTarget::PopularFeed { generation } => self.popular.feed.feed.fail(generation),
            FetchTarget::SearchFeed { generation } => self.search.feed.feed.fail(generation),
        }
        let message = if err.is_unauthorized() {
            INVALID_API_KEY
        } else {
            LOAD_FAILED
        };
        self.notices.push(NoticeLevel::Error, message);
    }
}
