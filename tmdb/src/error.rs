use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TmdbError {
    /// Rejected API key.
    #[error("invalid TMDB API key: {message}")]
    Unauthorized { message: String },
    #[error("resource not found")]
    NotFound,
    #[error("TMDB returned {status}: {message}")]
    Http { status: StatusCode, message: String },
    /// Connection or timeout failure, after retries where applicable.
    #[error("request failed after {attempts} attempt(s): {message}")]
    Transport { attempts: u32, message: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl TmdbError {
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, TmdbError::Unauthorized { .. })
    }

    /// Map a non-success response body to an error.
    pub(crate) fn from_status(status: StatusCode, body: &str) -> Self {
        let message = ErrorBody::parse(body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });
        match status {
            StatusCode::UNAUTHORIZED => TmdbError::Unauthorized { message },
            StatusCode::NOT_FOUND => TmdbError::NotFound,
            _ => TmdbError::Http { status, message },
        }
    }
}

/// TMDB's error envelope: `{"status_code": 7, "status_message": "..."}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    status_message: Option<String>,
}

impl ErrorBody {
    fn parse(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()?
            .status_message
            .filter(|m| !m.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_carries_status_message() {
        let body = r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#;
        let err = TmdbError::from_status(StatusCode::UNAUTHORIZED, body);
        match err {
            TmdbError::Unauthorized { message } => {
                assert!(message.starts_with("Invalid API key"));
            }
            other => panic!("expected Unauthorized, got {other:?}"),
        }
    }

    #[test]
    fn not_found_maps_directly() {
        assert!(matches!(
            TmdbError::from_status(StatusCode::NOT_FOUND, ""),
            TmdbError::NotFound
        ));
    }

    #[test]
    fn non_json_body_falls_back_to_reason() {
        let err = TmdbError::from_status(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert_eq!(err.to_string(), "TMDB returned 502 Bad Gateway: Bad Gateway");
    }
}
