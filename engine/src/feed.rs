//! Infinite feed: pages appended as the selection approaches the end.
//!
//! Each fetch is tagged with the feed generation it was issued under;
//! `reset` bumps the generation so late responses for an old filter or
//! query are dropped instead of appended.

use std::collections::HashSet;

use reel_types::{Movie, MovieId, MoviePage};

/// Consecutive pages that may filter down to nothing before the feed stops.
pub const MAX_EMPTY_PAGE_SKIPS: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedUpdate {
    /// Response for an older generation; nothing changed.
    Stale,
    Appended { added: usize },
    /// Filtered page came back empty but more pages exist. Fetch again.
    NeedsMore,
    /// No further pages will be requested.
    Exhausted { added: usize },
}

#[derive(Debug)]
pub struct InfiniteFeed {
    movies: Vec<Movie>,
    seen: HashSet<MovieId>,
    next_page: u32,
    loading: bool,
    has_more: bool,
    generation: u64,
    empty_streak: u8,
}

impl Default for InfiniteFeed {
    fn default() -> Self {
        Self {
            movies: Vec::new(),
            seen: HashSet::new(),
            next_page: 1,
            loading: false,
            has_more: true,
            generation: 0,
            empty_streak: 0,
        }
    }
}

impl InfiniteFeed {
    #[must_use]
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn next_page(&self) -> u32 {
        self.next_page
    }

    /// Claim the next page. `None` while a fetch is in flight or after the
    /// last page.
    pub fn begin_fetch(&mut self) -> Option<(u64, u32)> {
        if self.loading || !self.has_more {
            return None;
        }
        self.loading = true;
        Some((self.generation, self.next_page))
    }

    /// Append a fetched page, keeping only movies that pass `keep` and whose
    /// id is not already in the feed.
    pub fn apply_page(
        &mut self,
        generation: u64,
        page: MoviePage,
        keep: impl Fn(&Movie) -> bool,
    ) -> FeedUpdate {
        if generation != self.generation {
            return FeedUpdate::Stale;
        }
        self.loading = false;

        let raw_empty = page.results.is_empty();
        let last_page = raw_empty || page.page >= page.total_pages;
        self.next_page = page.page.max(self.next_page) + 1;

        let before = self.movies.len();
        for movie in page.results {
            if keep(&movie) && self.seen.insert(movie.id) {
                self.movies.push(movie);
            }
        }
        let added = self.movies.len() - before;

        if last_page {
            self.has_more = false;
            return FeedUpdate::Exhausted { added };
        }

        if added > 0 {
            self.empty_streak = 0;
            return FeedUpdate::Appended { added };
        }

        self.empty_streak += 1;
        if self.empty_streak >= MAX_EMPTY_PAGE_SKIPS {
            self.has_more = false;
            return FeedUpdate::Exhausted { added: 0 };
        }
        FeedUpdate::NeedsMore
    }

    /// A fetch failed; the next prefetch retries the same page.
    pub fn fail(&mut self, generation: u64) {
        if generation == self.generation {
            self.loading = false;
        }
    }

    /// Back to an empty first page under a new generation.
    pub fn reset(&mut self) {
        let generation = self.generation.wrapping_add(1);
        *self = Self {
            generation,
            ..Self::default()
        };
    }

    /// Whether `selected` is within `rows` grid rows of the end.
    #[must_use]
    pub fn near_end(&self, selected: usize, columns: usize, rows: usize) -> bool {
        if self.movies.is_empty() {
            return true;
        }
        let columns = columns.max(1);
        let last_row = (self.movies.len() - 1) / columns;
        let selected_row = selected.min(self.movies.len() - 1) / columns;
        last_row - selected_row <= rows
    }
}
