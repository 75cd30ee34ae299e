use serde::{Deserialize, Serialize};

/// Top-level screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Route {
    #[default]
    SignIn,
    Home,
    Popular,
    Wishlist,
    Search,
}

impl Route {
    /// Screens reachable from the header, in tab order.
    pub const TABS: [Route; 4] = [Route::Home, Route::Popular, Route::Wishlist, Route::Search];

    #[must_use]
    pub const fn requires_auth(self) -> bool {
        !matches!(self, Route::SignIn)
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Route::SignIn => "Sign in",
            Route::Home => "Home",
            Route::Popular => "Popular",
            Route::Wishlist => "My List",
            Route::Search => "Browse",
        }
    }

    /// The tab after this one. Routes outside the header start at the first tab.
    #[must_use]
    pub fn next_tab(self) -> Self {
        match Self::TABS.iter().position(|r| *r == self) {
            Some(index) => Self::TABS[(index + 1) % Self::TABS.len()],
            None => Self::TABS[0],
        }
    }
}

/// How the popular screen lays out its movies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PopularView {
    /// Fixed set of movies split into pages.
    #[default]
    Table,
    /// Feed that keeps fetching as the selection nears the end.
    Infinite,
}

impl PopularView {
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            PopularView::Table => PopularView::Infinite,
            PopularView::Infinite => PopularView::Table,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PopularView::Table => "table",
            PopularView::Infinite => "infinite",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "table" | "grid" => Some(PopularView::Table),
            "infinite" | "list" | "scroll" => Some(PopularView::Infinite),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UiOptions {
    pub ascii_only: bool,
    pub high_contrast: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_sign_in_is_public() {
        assert!(!Route::SignIn.requires_auth());
        for route in Route::TABS {
            assert!(route.requires_auth());
        }
    }

    #[test]
    fn tabs_wrap() {
        assert_eq!(Route::Home.next_tab(), Route::Popular);
        assert_eq!(Route::Search.next_tab(), Route::Home);
    }

    #[test]
    fn sign_in_advances_to_the_first_tab() {
        assert_eq!(Route::SignIn.next_tab(), Route::Home);
    }

    #[test]
    fn popular_view_parse_aliases() {
        assert_eq!(PopularView::parse("Grid"), Some(PopularView::Table));
        assert_eq!(PopularView::parse(" list "), Some(PopularView::Infinite));
        assert_eq!(PopularView::parse("carousel"), None);
    }
}
