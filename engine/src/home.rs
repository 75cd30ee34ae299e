//! Home screen: featured banner and horizontally sliding rows.

use reel_tmdb::Endpoint;
use reel_types::{Genre, Movie};

/// Fraction of the visible cards one slide moves.
const SLIDE_FRACTION: f64 = 0.8;

/// Row whose first movie is featured: popular, page 1.
const FEATURED_ROW: usize = 0;

#[derive(Debug, Clone)]
pub struct HomeRow {
    title: &'static str,
    endpoint: Endpoint,
    page: u32,
    movies: Vec<Movie>,
    loading: bool,
    loaded: bool,
    /// First visible card.
    offset: usize,
    selected: usize,
    visible: usize,
}

impl HomeRow {
    #[must_use]
    pub fn new(title: &'static str, endpoint: Endpoint, page: u32) -> Self {
        Self {
            title,
            endpoint,
            page,
            movies: Vec::new(),
            loading: false,
            loaded: false,
            offset: 0,
            selected: 0,
            visible: 5,
        }
    }

    #[must_use]
    pub fn title(&self) -> &'static str {
        self.title
    }

    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    #[must_use]
    pub fn selected_movie(&self) -> Option<&Movie> {
        self.movies.get(self.selected)
    }

    /// Cards currently inside the window.
    #[must_use]
    pub fn visible_movies(&self) -> &[Movie] {
        let end = (self.offset + self.visible).min(self.movies.len());
        &self.movies[self.offset.min(end)..end]
    }

    pub(crate) fn begin_load(&mut self) -> bool {
        if self.loading || self.loaded {
            return false;
        }
        self.loading = true;
        true
    }

    pub(crate) fn finish_load(&mut self, movies: Option<Vec<Movie>>) {
        self.loading = false;
        if let Some(movies) = movies {
            self.movies = movies;
            self.loaded = true;
            self.offset = 0;
            self.selected = 0;
        }
    }

    pub fn set_visible(&mut self, cards: usize) {
        self.visible = cards.max(1);
        self.offset = self.offset.min(self.max_offset());
        self.keep_selection_visible();
    }

    fn max_offset(&self) -> usize {
        self.movies.len().saturating_sub(self.visible)
    }

    fn step(&self) -> usize {
        ((self.visible as f64 * SLIDE_FRACTION) as usize).max(1)
    }

    pub fn slide_right(&mut self) {
        self.offset = (self.offset + self.step()).min(self.max_offset());
        self.selected = self.selected.max(self.offset);
    }

    pub fn slide_left(&mut self) {
        self.offset = self.offset.saturating_sub(self.step());
        let last_visible = (self.offset + self.visible).saturating_sub(1);
        self.selected = self.selected.min(last_visible);
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.movies.len() {
            self.selected += 1;
            if self.selected >= self.offset + self.visible {
                self.slide_right();
            }
        }
    }

    pub fn select_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            if self.selected < self.offset {
                self.slide_left();
            }
        }
    }

    fn keep_selection_visible(&mut self) {
        if self.movies.is_empty() {
            self.selected = 0;
            return;
        }
        self.selected = self.selected.min(self.movies.len() - 1);
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + self.visible {
            self.offset = self.selected + 1 - self.visible;
        }
    }
}

/// The banner features the first movie of the Popular row, so one request
/// fills both.
#[derive(Debug, Clone)]
pub struct HomeState {
    rows: Vec<HomeRow>,
    focused_row: usize,
}

impl Default for HomeState {
    fn default() -> Self {
        Self {
            rows: vec![
                HomeRow::new("Popular", Endpoint::Popular, 1),
                HomeRow::new("Now Playing", Endpoint::NowPlaying, 2),
                HomeRow::new(
                    "Action",
                    Endpoint::Discover {
                        genre_id: Genre::Action.tmdb_id().unwrap_or(28),
                    },
                    1,
                ),
            ],
            focused_row: 0,
        }
    }
}

impl HomeState {
    #[must_use]
    pub fn featured(&self) -> Option<&Movie> {
        self.rows
            .get(FEATURED_ROW)
            .and_then(|row| row.movies().first())
    }

    #[must_use]
    pub fn is_featured_loading(&self) -> bool {
        self.rows.get(FEATURED_ROW).is_some_and(HomeRow::is_loading)
    }

    #[must_use]
    pub fn rows(&self) -> &[HomeRow] {
        &self.rows
    }

    pub(crate) fn row_mut(&mut self, index: usize) -> Option<&mut HomeRow> {
        self.rows.get_mut(index)
    }

    #[must_use]
    pub fn focused_row(&self) -> usize {
        self.focused_row
    }

    pub fn focus_down(&mut self) {
        self.focused_row = (self.focused_row + 1).min(self.rows.len() - 1);
    }

    pub fn focus_up(&mut self) {
        self.focused_row = self.focused_row.saturating_sub(1);
    }

    pub(crate) fn focused_row_mut(&mut self) -> &mut HomeRow {
        &mut self.rows[self.focused_row]
    }

    #[must_use]
    pub fn selected_movie(&self) -> Option<&Movie> {
        self.rows[self.focused_row].selected_movie()
    }

    pub fn set_visible_cards(&mut self, cards: usize) {
        for row in &mut self.rows {
            row.set_visible(cards);
        }
    }
}
