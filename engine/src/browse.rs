//! Grid screens: popular (table or feed), search, wishlist.

use reel_tmdb::Endpoint;
use reel_types::{DiscoverFilter, Movie, PopularView};

use crate::feed::InfiniteFeed;
use crate::pager::Pager;
use crate::text_field::TextField;

/// TMDB list endpoints return 20 movies per page.
pub const TMDB_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Move a grid selection, clamped to `0..len`.
#[must_use]
pub fn move_in_grid(selected: usize, len: usize, columns: usize, direction: Direction) -> usize {
    if len == 0 {
        return 0;
    }
    let columns = columns.max(1);
    let last = len - 1;
    match direction {
        Direction::Left => selected.saturating_sub(1),
        Direction::Right => (selected + 1).min(last),
        Direction::Up => selected.checked_sub(columns).unwrap_or(selected),
        Direction::Down => {
            let target = selected + columns;
            if target <= last { target } else { selected }
        }
    }
    .min(last)
}

/// Feed plus the selected card and grid width for prefetch decisions.
#[derive(Debug, Default)]
pub struct FeedView {
    pub(crate) feed: InfiniteFeed,
    selected: usize,
    columns: usize,
}

impl FeedView {
    #[must_use]
    pub fn feed(&self) -> &InfiniteFeed {
        &self.feed
    }

    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.columns.max(1)
    }

    #[must_use]
    pub fn selected_movie(&self) -> Option<&Movie> {
        self.feed.movies().get(self.selected)
    }

    pub(crate) fn set_columns(&mut self, columns: usize) {
        self.columns = columns.max(1);
    }

    pub(crate) fn move_selection(&mut self, direction: Direction) {
        self.selected = move_in_grid(self.selected, self.feed.len(), self.columns(), direction);
    }

    pub(crate) fn reset(&mut self) {
        self.feed.reset();
        self.selected = 0;
    }
}

/// Fixed list of popular movies fetched page by page up to a limit.
#[derive(Debug, Default)]
pub struct PopularTable {
    movies: Vec<Movie>,
    loading: bool,
    loaded: bool,
    pub(crate) pager: Pager,
    selected: usize,
}

impl PopularTable {
    #[must_use]
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    #[must_use]
    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    #[must_use]
    pub fn selected_movie(&self) -> Option<&Movie> {
        self.movies.get(self.selected)
    }

    /// Number of API pages needed for `limit` movies.
    #[must_use]
    pub fn pages_needed(limit: usize) -> u32 {
        u32::try_from(limit.div_ceil(TMDB_PAGE_SIZE).max(1)).unwrap_or(u32::MAX)
    }

    pub(crate) fn begin_load(&mut self) -> bool {
        if self.loading || self.loaded {
            return false;
        }
        self.loading = true;
        self.movies.clear();
        true
    }

    /// Append one page. Returns whether another page should be requested.
    pub(crate) fn append_page(&mut self, movies: Vec<Movie>, page: u32, has_next: bool, limit: usize) -> bool {
        for movie in movies {
            if !self.movies.iter().any(|m| m.id == movie.id) {
                self.movies.push(movie);
            }
        }
        let done = self.movies.len() >= limit || page >= Self::pages_needed(limit) || !has_next;
        if done {
            self.movies.truncate(limit);
            self.loading = false;
            self.loaded = true;
        }
        !done
    }

    pub(crate) fn fail(&mut self) {
        self.loading = false;
    }

    pub(crate) fn move_selection(&mut self, direction: Direction) {
        self.selected = move_in_grid(self.selected, self.movies.len(), self.pager.columns(), direction);
        self.pager.show(self.selected);
    }

    pub(crate) fn next_page(&mut self) -> bool {
        let moved = self.pager.next(self.movies.len());
        if moved {
            self.selected = self.pager.page_range(self.movies.len()).start;
        }
        moved
    }

    pub(crate) fn prev_page(&mut self) -> bool {
        let moved = self.pager.prev();
        if moved {
            self.selected = self.pager.page_range(self.movies.len()).start;
        }
        moved
    }

    pub(crate) fn set_layout(&mut self, columns: usize, rows: usize) {
        self.pager.set_layout(columns, rows, self.movies.len());
        if !self.movies.is_empty() {
            self.pager.show(self.selected.min(self.movies.len() - 1));
        }
    }
}

#[derive(Debug, Default)]
pub struct PopularState {
    pub(crate) view: PopularView,
    pub(crate) table: PopularTable,
    pub(crate) feed: FeedView,
}

impl PopularState {
    #[must_use]
    pub fn view(&self) -> PopularView {
        self.view
    }

    #[must_use]
    pub fn table(&self) -> &PopularTable {
        &self.table
    }

    #[must_use]
    pub fn feed(&self) -> &FeedView {
        &self.feed
    }

    #[must_use]
    pub fn selected_movie(&self) -> Option<&Movie> {
        match self.view {
            PopularView::Table => self.table.selected_movie(),
            PopularView::Infinite => self.feed.selected_movie(),
        }
    }
}

#[derive(Debug)]
pub struct SearchState {
    pub(crate) filter: DiscoverFilter,
    pub(crate) query: TextField,
    /// Query the feed was last built for.
    pub(crate) applied_query: String,
    pub(crate) editing_query: bool,
    pub(crate) feed: FeedView,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            filter: DiscoverFilter::initial(),
            query: TextField::default(),
            applied_query: String::new(),
            editing_query: false,
            feed: FeedView::default(),
        }
    }
}

impl SearchState {
    #[must_use]
    pub fn filter(&self) -> &DiscoverFilter {
        &self.filter
    }

    #[must_use]
    pub fn query(&self) -> &TextField {
        &self.query
    }

    #[must_use]
    pub fn applied_query(&self) -> &str {
        &self.applied_query
    }

    #[must_use]
    pub fn is_editing_query(&self) -> bool {
        self.editing_query
    }

    #[must_use]
    pub fn feed(&self) -> &FeedView {
        &self.feed
    }

    /// Where the results come from: free text, then genre, then popular.
    #[must_use]
    pub fn endpoint(&self) -> Endpoint {
        let query = self.applied_query.trim();
        if !query.is_empty() {
            return Endpoint::search(query);
        }
        match self.filter.genre.tmdb_id() {
            Some(genre_id) => Endpoint::Discover { genre_id },
            None => Endpoint::Popular,
        }
    }
}

#[derive(Debug, Default)]
pub struct WishlistView {
    pub(crate) pager: Pager,
    selected: usize,
}

impl WishlistView {
    #[must_use]
    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub(crate) fn move_selection(&mut self, len: usize, direction: Direction) {
        self.selected = move_in_grid(self.selected, len, self.pager.columns(), direction);
        self.pager.show(self.selected);
    }

    pub(crate) fn next_page(&mut self, len: usize) {
        if self.pager.next(len) {
            self.selected = self.pager.page_range(len).start;
        }
    }

    pub(crate) fn prev_page(&mut self, len: usize) {
        if self.pager.prev() {
            self.selected = self.pager.page_range(len).start;
        }
    }

    /// Keep selection and page valid after the list changed.
    pub(crate) fn clamp(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
        self.pager.set_layout(self.pager.columns(), self.pager.rows(), len);
        if len > 0 {
            self.pager.show(self.selected);
        }
    }

    pub(crate) fn set_layout(&mut self, columns: usize, rows: usize, len: usize) {
        self.pager.set_layout(columns, rows, len);
        self.clamp(len);
    }
}

#[cfg(test)]
mod tests {
    use reel_types::{Genre, LanguageFilter};

    use super::*;

    #[test]
    fn grid_moves_are_clamped() {
        assert_eq!(move_in_grid(0, 10, 4, Direction::Left), 0);
        assert_eq!(move_in_grid(9, 10, 4, Direction::Right), 9);
        assert_eq!(move_in_grid(2, 10, 4, Direction::Up), 2);
        assert_eq!(move_in_grid(6, 10, 4, Direction::Up), 2);
        assert_eq!(move_in_grid(5, 10, 4, Direction::Down), 9);
        assert_eq!(move_in_grid(7, 10, 4, Direction::Down), 7);
        assert_eq!(move_in_grid(3, 0, 4, Direction::Down), 0);
    }

    #[test]
    fn pages_needed_for_limit() {
        assert_eq!(PopularTable::pages_needed(120), 6);
        assert_eq!(PopularTable::pages_needed(121), 7);
        assert_eq!(PopularTable::pages_needed(0), 1);
    }

    #[test]
    fn table_stops_at_limit_and_truncates() {
        let mut table = PopularTable::default();
        assert!(table.begin_load());
        let page = |start: u64| (start..start + 20).map(|id| Movie::new(id, "m")).collect::<Vec<_>>();

        assert!(table.append_page(page(0), 1, true, 30));
        assert!(!table.append_page(page(20), 2, true, 30));
        assert_eq!(table.movies().len(), 30);
        assert!(table.is_loaded());
        assert!(!table.begin_load());
    }

    #[test]
    fn table_stops_when_server_runs_out() {
        let mut table = PopularTable::default();
        table.begin_load();
        assert!(!table.append_page(vec![Movie::new(1, "only")], 1, false, 120));
        assert_eq!(table.movies().len(), 1);
    }

    #[test]
    fn table_paging_moves_selection_to_page_start() {
        let mut table = PopularTable::default();
        table.begin_load();
        table.append_page((0..20).map(|id| Movie::new(id, "m")).collect(), 1, false, 120);
        table.set_layout(4, 2);

        assert!(table.next_page());
        assert_eq!(table.selected(), 8);
        table.move_selection(Direction::Up);
        assert_eq!(table.selected(), 4);
        assert_eq!(table.pager().page(), 1);
    }

    #[test]
    fn search_endpoint_prefers_query_then_genre() {
        let mut search = SearchState::default();
        assert_eq!(search.endpoint(), Endpoint::Discover { genre_id: 28 });

        search.filter.genre = Genre::All;
        assert_eq!(search.endpoint(), Endpoint::Popular);

        search.filter.language = LanguageFilter::Korean;
        search.applied_query = " parasite ".into();
        assert_eq!(search.endpoint(), Endpoint::search("parasite"));
    }

    #[test]
    fn wishlist_clamps_after_removal() {
        let mut view = WishlistView::default();
        view.set_layout(2, 1, 5);
        view.move_selection(5, Direction::Right);
        view.move_selection(5, Direction::Right);
        view.move_selection(5, Direction::Right);
        view.move_selection(5, Direction::Right);
        assert_eq!(view.selected(), 4);
        assert_eq!(view.pager().page(), 3);

        view.clamp(2);
        assert_eq!(view.selected(), 1);
        assert_eq!(view.pager().page(), 1);
    }
}
