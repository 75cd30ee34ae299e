//! Browse filters: genre (server side), rating band and language (client side).

use crate::Movie;

/// Catalog genres offered by the search screen, with their TMDB ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Genre {
    #[default]
    All,
    Action,
    Adventure,
    Comedy,
    Crime,
    Family,
    Animation,
    Documentary,
    Drama,
    Fantasy,
    History,
    Horror,
    Music,
    Mystery,
    Romance,
    ScienceFiction,
    TvMovie,
    Thriller,
    War,
    Western,
}

impl Genre {
    pub const ALL: [Genre; 20] = [
        Genre::All,
        Genre::Action,
        Genre::Adventure,
        Genre::Comedy,
        Genre::Crime,
        Genre::Family,
        Genre::Animation,
        Genre::Documentary,
        Genre::Drama,
        Genre::Fantasy,
        Genre::History,
        Genre::Horror,
        Genre::Music,
        Genre::Mystery,
        Genre::Romance,
        Genre::ScienceFiction,
        Genre::TvMovie,
        Genre::Thriller,
        Genre::War,
        Genre::Western,
    ];

    /// TMDB genre id. `All` has none and browses the popular list instead.
    #[must_use]
    pub const fn tmdb_id(self) -> Option<u32> {
        match self {
            Genre::All => None,
            Genre::Action => Some(28),
            Genre::Adventure => Some(12),
            Genre::Comedy => Some(35),
            Genre::Crime => Some(80),
            Genre::Family => Some(10751),
            Genre::Animation => Some(16),
            Genre::Documentary => Some(99),
            Genre::Drama => Some(18),
            Genre::Fantasy => Some(14),
            Genre::History => Some(36),
            Genre::Horror => Some(27),
            Genre::Music => Some(10402),
            Genre::Mystery => Some(9648),
            Genre::Romance => Some(10749),
            Genre::ScienceFiction => Some(878),
            Genre::TvMovie => Some(10770),
            Genre::Thriller => Some(53),
            Genre::War => Some(10752),
            Genre::Western => Some(37),
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Genre::All => "All genres",
            Genre::Action => "Action",
            Genre::Adventure => "Adventure",
            Genre::Comedy => "Comedy",
            Genre::Crime => "Crime",
            Genre::Family => "Family",
            Genre::Animation => "Animation",
            Genre::Documentary => "Documentary",
            Genre::Drama => "Drama",
            Genre::Fantasy => "Fantasy",
            Genre::History => "History",
            Genre::Horror => "Horror",
            Genre::Music => "Music",
            Genre::Mystery => "Mystery",
            Genre::Romance => "Romance",
            Genre::ScienceFiction => "Science Fiction",
            Genre::TvMovie => "TV Movie",
            Genre::Thriller => "Thriller",
            Genre::War => "War",
            Genre::Western => "Western",
        }
    }

    #[must_use]
    pub fn next(self) -> Self {
        cycle(&Self::ALL, self)
    }
}

/// Client-side rating band on `vote_average`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RatingFilter {
    #[default]
    All,
    /// `n <= vote_average < n + 1`, for `n` in 4..=9.
    Band(u8),
    /// `vote_average <= 4`.
    AtMostFour,
}

impl RatingFilter {
    pub const ALL: [RatingFilter; 8] = [
        RatingFilter::All,
        RatingFilter::Band(9),
        RatingFilter::Band(8),
        RatingFilter::Band(7),
        RatingFilter::Band(6),
        RatingFilter::Band(5),
        RatingFilter::Band(4),
        RatingFilter::AtMostFour,
    ];

    #[must_use]
    pub fn matches(self, vote_average: f64) -> bool {
        match self {
            RatingFilter::All => true,
            RatingFilter::AtMostFour => vote_average <= 4.0,
            RatingFilter::Band(low) => {
                let low = f64::from(low);
                vote_average >= low && vote_average < low + 1.0
            }
        }
    }

    #[must_use]
    pub fn label(self) -> String {
        match self {
            RatingFilter::All => "All ratings".to_string(),
            RatingFilter::AtMostFour => "4 and below".to_string(),
            RatingFilter::Band(low) => format!("{low}~{}", low + 1),
        }
    }

    #[must_use]
    pub fn next(self) -> Self {
        cycle(&Self::ALL, self)
    }
}

/// Client-side filter on `original_language`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LanguageFilter {
    #[default]
    All,
    English,
    Korean,
}

impl LanguageFilter {
    pub const ALL: [LanguageFilter; 3] = [
        LanguageFilter::All,
        LanguageFilter::English,
        LanguageFilter::Korean,
    ];

    #[must_use]
    pub const fn code(self) -> Option<&'static str> {
        match self {
            LanguageFilter::All => None,
            LanguageFilter::English => Some("en"),
            LanguageFilter::Korean => Some("ko"),
        }
    }

    #[must_use]
    pub fn matches(self, original_language: &str) -> bool {
        self.code().is_none_or(|code| code == original_language)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            LanguageFilter::All => "All languages",
            LanguageFilter::English => "English",
            LanguageFilter::Korean => "Korean",
        }
    }

    #[must_use]
    pub fn next(self) -> Self {
        cycle(&Self::ALL, self)
    }
}

/// The search screen's selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DiscoverFilter {
    pub genre: Genre,
    pub rating: RatingFilter,
    pub language: LanguageFilter,
}

impl DiscoverFilter {
    /// What the search screen opens with: action movies, nothing else narrowed.
    #[must_use]
    pub fn initial() -> Self {
        Self {
            genre: Genre::Action,
            ..Self::default()
        }
    }

    /// Client-side predicates only; genre is applied by the endpoint.
    #[must_use]
    pub fn matches(&self, movie: &Movie) -> bool {
        self.language.matches(&movie.original_language) && self.rating.matches(movie.vote_average)
    }

    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.rating == RatingFilter::All && self.language == LanguageFilter::All
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T) -> T {
    let index = all.iter().position(|item| *item == current).unwrap_or(0);
    all[(index + 1) % all.len()]
}
