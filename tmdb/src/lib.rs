//! TMDB v3 client.
//!
//! - [`Endpoint`] builds list URLs and cache keys
//! - [`TmdbClient`] fetches [`MoviePage`]s through [`retry::send_with_retry`]
//! - [`TmdbError`] separates a bad key from other HTTP and transport failures
//!
//! The API key rides in the query string, so every URL or transport error
//! that reaches a log goes through [`reel_utils::redact_api_key`] first.

mod endpoint;
mod error;
pub mod retry;

pub use endpoint::{Endpoint, ImageSize, PLACEHOLDER_IMAGE, image_url};
pub use error::TmdbError;
pub use retry::RetryConfig;

use std::time::Duration;

use reel_types::{ApiKey, Movie, MoviePage};
use reel_utils::{mask_secret, redact_api_key};
use retry::RetryOutcome;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_LANGUAGE: &str = "ko-KR";

const CONNECT_TIMEOUT_SECS: u64 = 10;
const TCP_KEEPALIVE_SECS: u64 = 60;
const POOL_MAX_IDLE_PER_HOST: usize = 8;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;
const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub language: String,
    pub timeout: Duration,
    pub retry: RetryConfig,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            timeout: Duration::from_secs(15),
            retry: RetryConfig::default(),
        }
    }
}

fn base_client_builder(base_url: &str) -> reqwest::ClientBuilder {
    use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .redirect(reqwest::redirect::Policy::none())
        // Plain http is only reachable through an explicit base_url override.
        .https_only(base_url.starts_with("https://"))
        .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .pool_idle_timeout(Some(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS)))
        .user_agent(concat!("reel/", env!("CARGO_PKG_VERSION")))
        .default_headers(default_headers)
}

/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    http: reqwest::Client,
    settings: ClientSettings,
    api_key: ApiKey,
}

impl TmdbClient {
    pub fn new(settings: ClientSettings, api_key: ApiKey) -> Result<Self, TmdbError> {
        let http = base_client_builder(&settings.base_url)
            .timeout(settings.timeout)
            .build()
            .map_err(|e| TmdbError::Client(e.to_string()))?;
        tracing::debug!(
            base_url = %settings.base_url,
            language = %settings.language,
            key = %mask_secret(api_key.expose()),
            "TMDB client ready"
        );
        Ok(Self {
            http,
            settings,
            api_key,
        })
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.settings.language
    }

    #[must_use]
    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub async fn fetch_page(&self, endpoint: &Endpoint, page: u32) -> Result<MoviePage, TmdbError> {
        let url = endpoint.url(
            &self.settings.base_url,
            self.api_key.expose(),
            &self.settings.language,
            page,
        )?;
        tracing::debug!(
            endpoint = endpoint.name(),
            page,
            url = %redact_api_key(url.as_str()),
            "TMDB request"
        );

        let outcome = retry::send_with_retry(|| self.http.get(url.clone()), &self.settings.retry).await;
        let response = match outcome {
            RetryOutcome::Success(response) => response,
            RetryOutcome::HttpError(response) => {
                let status = response.status();
                let body = read_capped_error_body(response).await;
                let err = TmdbError::from_status(status, &body);
                tracing::warn!(endpoint = endpoint.name(), page, %status, "TMDB error: {err}");
                return Err(err);
            }
            RetryOutcome::ConnectionError { attempts, source } => {
                return Err(transport_error(attempts, &source));
            }
            RetryOutcome::NonRetryable(source) => return Err(transport_error(1, &source)),
        };

        let body = response
            .text()
            .await
            .map_err(|e| transport_error(1, &e))?;
        serde_json::from_str::<MoviePage>(&body).map_err(|e| {
            tracing::warn!(endpoint = endpoint.name(), page, "Undecodable TMDB body: {e}");
            TmdbError::Decode(e.to_string())
        })
    }

    pub async fn popular(&self, page: u32) -> Result<MoviePage, TmdbError> {
        self.fetch_page(&Endpoint::Popular, page).await
    }

    pub async fn now_playing(&self, page: u32) -> Result<MoviePage, TmdbError> {
        self.fetch_page(&Endpoint::NowPlaying, page).await
    }

    pub async fn discover(&self, genre_id: u32, page: u32) -> Result<MoviePage, TmdbError> {
        self.fetch_page(&Endpoint::Discover { genre_id }, page).await
    }

    pub async fn search(&self, query: &str, page: u32) -> Result<MoviePage, TmdbError> {
        self.fetch_page(&Endpoint::search(query), page).await
    }

    /// First movie on the first popular page.
    pub async fn featured(&self) -> Result<Option<Movie>, TmdbError> {
        let page = self.popular(1).await?;
        Ok(page.results.into_iter().next())
    }
}

fn transport_error(attempts: u32, source: &reqwest::Error) -> TmdbError {
    let message = redact_api_key(&source.to_string()).into_owned();
    tracing::warn!(attempts, "TMDB transport error: {message}");
    TmdbError::Transport { attempts, message }
}

async fn read_capped_error_body(response: reqwest::Response) -> String {
    let Ok(bytes) = response.bytes().await else {
        return String::new();
    };
    let capped = &bytes[..bytes.len().min(MAX_ERROR_BODY_BYTES)];
    String::from_utf8_lossy(capped).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> TmdbClient {
        let settings = ClientSettings {
            base_url: server.uri(),
            retry: RetryConfig {
                max_retries: 1,
                initial_delay: Duration::from_millis(1),
                max_delay: Duration::from_millis(5),
                jitter_factor: 0.0,
            },
            ..ClientSettings::default()
        };
        TmdbClient::new(settings, ApiKey::new("test-key").unwrap()).unwrap()
    }

    fn page_json(ids: &[u64], page: u32, total_pages: u32) -> serde_json::Value {
        let results: Vec<_> = ids
            .iter()
            .map(|id| serde_json::json!({"id": id, "title": format!("Movie {id}"), "original_language": "en", "vote_average": 7.5}))
            .collect();
        serde_json::json!({
            "page": page,
            "results": results,
            "total_pages": total_pages,
            "total_results": ids.len(),
        })
    }

    #[tokio::test]
    async fn popular_sends_key_language_and_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/popular"))
            .and(query_param("api_key", "test-key"))
            .and(query_param("language", "ko-KR"))
            .and(query_param("page", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(&[1, 2], 3, 10)))
            .expect(1)
            .mount(&server)
            .await;

        let page = client_for(&server).popular(3).await.unwrap();
        assert_eq!(page.page, 3);
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].title, "Movie 1");
    }

    #[tokio::test]
    async fn discover_sends_genre() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/discover/movie"))
            .and(query_param("with_genres", "28"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(&[9], 1, 1)))
            .expect(1)
            .mount(&server)
            .await;

        let page = client_for(&server).discover(28, 1).await.unwrap();
        assert_eq!(page.results[0].id.get(), 9);
    }

    #[tokio::test]
    async fn search_sends_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .and(query_param("query", "blade runner"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(&[78], 1, 1)))
            .expect(1)
            .mount(&server)
            .await;

        let page = client_for(&server).search("blade runner", 1).await.unwrap();
        assert_eq!(page.results.len(), 1);
    }

    #[tokio::test]
    async fn featured_is_first_popular_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/popular"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(&[5, 6], 1, 1)))
            .mount(&server)
            .await;

        let featured = client_for(&server).featured().await.unwrap().unwrap();
        assert_eq!(featured.id.get(), 5);
    }

    #[tokio::test]
    async fn featured_on_empty_page_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/popular"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(&[], 1, 0)))
            .mount(&server)
            .await;

        assert!(client_for(&server).featured().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn bad_key_maps_to_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/popular"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "status_code": 7,
                "status_message": "Invalid API key: You must be granted a valid key.",
                "success": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).popular(1).await.unwrap_err();
        assert!(err.is_unauthorized());
        assert!(err.to_string().contains("Invalid API key"));
    }

    #[tokio::test]
    async fn server_errors_are_retried_then_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/now_playing"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;

        let err = client_for(&server).now_playing(2).await.unwrap_err();
        assert!(matches!(err, TmdbError::Http { status, .. } if status.as_u16() == 500));
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/popular"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[1,2,3]"))
            .mount(&server)
            .await;

        let err = client_for(&server).popular(1).await.unwrap_err();
        assert!(matches!(err, TmdbError::Decode(_)));
    }

    #[tokio::test]
    async fn transport_errors_do_not_leak_key() {
        // Port 9 (discard) on localhost is closed in test environments.
        let settings = ClientSettings {
            base_url: "http://127.0.0.1:9".to_string(),
            retry: RetryConfig {
                max_retries: 0,
                ..RetryConfig::default()
            },
            ..ClientSettings::default()
        };
        let client = TmdbClient::new(settings, ApiKey::new("super-secret").unwrap()).unwrap();

        let err = client.popular(1).await.unwrap_err();
        assert!(matches!(err, TmdbError::Transport { .. }));
        assert!(!err.to_string().contains("super-secret"));
    }
}
