//! Core domain types for Reel.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod filter;
mod route;
mod sanitize;

pub use filter::{DiscoverFilter, Genre, LanguageFilter, RatingFilter};
pub use route::{PopularView, Route, UiOptions};
pub use sanitize::sanitize_display_text;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

// ============================================================================
// Catalog Types
// ============================================================================

/// TMDB movie identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(u64);

impl MovieId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A movie as returned by the list endpoints.
///
/// TMDB sends `null` for missing artwork and an empty string for unknown
/// release dates; both normalize to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub poster_path: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub overview: Option<String>,
    #[serde(default)]
    pub original_language: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub release_date: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

impl Movie {
    /// Minimal constructor, mostly for tests and fixtures.
    #[must_use]
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id: MovieId::new(id),
            title: title.into(),
            poster_path: None,
            backdrop_path: None,
            overview: None,
            original_language: String::new(),
            vote_average: 0.0,
            release_date: None,
            genre_ids: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.original_language = language.into();
        self
    }

    #[must_use]
    pub fn with_vote_average(mut self, vote_average: f64) -> Self {
        self.vote_average = vote_average;
        self
    }

    #[must_use]
    pub fn with_release_date(mut self, date: impl Into<String>) -> Self {
        self.release_date = Some(date.into());
        self
    }

    #[must_use]
    pub fn release_year(&self) -> Option<i32> {
        let date = self.release_date.as_deref()?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .ok()
            .map(|d| d.year())
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MoviePage {
    #[serde(default)]
    pub results: Vec<Movie>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

impl MoviePage {
    /// Whether the server reports pages after this one.
    #[must_use]
    pub fn has_next(&self) -> bool {
        !self.results.is_empty() && self.page < self.total_pages
    }
}

// ============================================================================
// Credential Types
// ============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("email cannot be empty")]
    EmptyEmail,
    #[error("password cannot be empty")]
    EmptyPassword,
}

/// Account identifier. Trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn new(value: impl Into<String>) -> Result<Self, CredentialError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(CredentialError::EmptyEmail);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Email {
    type Error = CredentialError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Account password. Doubles as the TMDB API key for the session.
///
/// Whitespace-only input is rejected, but the value itself is kept verbatim.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Password(String);

impl Password {
    pub fn new(value: impl Into<String>) -> Result<Self, CredentialError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(CredentialError::EmptyPassword);
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Password {
    type Error = CredentialError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Password> for String {
    fn from(value: Password) -> Self {
        value.0
    }
}

// Manual Debug impl to prevent leaking passwords in logs.
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}

/// TMDB v3 API key.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl From<&Password> for ApiKey {
    fn from(value: &Password) -> Self {
        Self(value.expose().trim().to_string())
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_deserializes_tmdb_nulls_and_empty_dates() {
        let json = r#"{
            "id": 550,
            "title": "Fight Club",
            "poster_path": null,
            "backdrop_path": "/bd.jpg",
            "overview": "",
            "original_language": "en",
            "vote_average": 8.4,
            "release_date": "",
            "genre_ids": [18]
        }"#;
        let movie: Movie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.id, MovieId::new(550));
        assert_eq!(movie.poster_path, None);
        assert_eq!(movie.backdrop_path.as_deref(), Some("/bd.jpg"));
        assert_eq!(movie.overview, None);
        assert_eq!(movie.release_date, None);
        assert_eq!(movie.genre_ids, vec![18]);
    }

    #[test]
    fn movie_tolerates_missing_optional_fields() {
        let movie: Movie = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert_eq!(movie.title, "");
        assert!(movie.genre_ids.is_empty());
        assert!((movie.vote_average - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn release_year_parses_iso_dates() {
        let movie = Movie::new(1, "x").with_release_date("1999-10-15");
        assert_eq!(movie.release_year(), Some(1999));

        let movie = Movie::new(1, "x").with_release_date("soon");
        assert_eq!(movie.release_year(), None);
    }

    #[test]
    fn page_has_next() {
        let mut page = MoviePage {
            results: vec![Movie::new(1, "a")],
            page: 1,
            total_pages: 2,
            total_results: 21,
        };
        assert!(page.has_next());
        page.page = 2;
        assert!(!page.has_next());
        page.page = 1;
        page.results.clear();
        assert!(!page.has_next());
    }

    #[test]
    fn email_trims_and_rejects_blank() {
        assert_eq!(Email::new("  a@b.c ").unwrap().as_str(), "a@b.c");
        assert_eq!(Email::new("   "), Err(CredentialError::EmptyEmail));
    }

    #[test]
    fn password_debug_is_redacted() {
        let password = Password::new("hunter2").unwrap();
        assert_eq!(format!("{password:?}"), "Password([REDACTED])");
        assert_eq!(Password::new(" "), Err(CredentialError::EmptyPassword));
    }

    #[test]
    fn api_key_rejects_blank_and_redacts() {
        assert!(ApiKey::new("  ").is_none());
        let key = ApiKey::new("abc123").unwrap();
        assert_eq!(key.expose(), "abc123");
        assert!(!format!("{key:?}").contains("abc123"));
    }
}
