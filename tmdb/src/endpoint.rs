//! URL builders for the list endpoints and image CDN.

use url::Url;

/// Shown in place of artwork when a movie has no image path.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder-image.jpg";

/// A paged list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Popular,
    NowPlaying,
    Discover { genre_id: u32 },
    Search { query: String },
}

impl Endpoint {
    #[must_use]
    pub fn search(query: impl Into<String>) -> Self {
        Endpoint::Search {
            query: query.into(),
        }
    }

    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Endpoint::Popular => "/movie/popular",
            Endpoint::NowPlaying => "/movie/now_playing",
            Endpoint::Discover { .. } => "/discover/movie",
            Endpoint::Search { .. } => "/search/movie",
        }
    }

    /// Short name for logs and cache keys.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Endpoint::Popular => "popular",
            Endpoint::NowPlaying => "now_playing",
            Endpoint::Discover { .. } => "discover",
            Endpoint::Search { .. } => "search",
        }
    }

    /// Full request URL. Parameter order: `api_key`, endpoint parameters,
    /// `language`, `page`.
    pub fn url(
        &self,
        base: &str,
        api_key: &str,
        language: &str,
        page: u32,
    ) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&format!("{}{}", base.trim_end_matches('/'), self.path()))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("api_key", api_key);
            match self {
                Endpoint::Discover { genre_id } => {
                    query.append_pair("with_genres", &genre_id.to_string());
                }
                Endpoint::Search { query: text } => {
                    query.append_pair("query", text);
                }
                Endpoint::Popular | Endpoint::NowPlaying => {}
            }
            query.append_pair("language", language);
            query.append_pair("page", &page.to_string());
        }
        Ok(url)
    }

    /// Cache key for one page. Never contains the API key.
    #[must_use]
    pub fn cache_key(&self, language: &str, page: u32) -> String {
        match self {
            Endpoint::Popular | Endpoint::NowPlaying => {
                format!("{}:{language}:{page}", self.name())
            }
            Endpoint::Discover { genre_id } => {
                format!("{}:{genre_id}:{language}:{page}", self.name())
            }
            Endpoint::Search { query } => {
                format!("{}:{}:{language}:{page}", self.name(), query.trim())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    /// Poster cards.
    W300,
    /// Banner backdrops.
    Original,
}

impl ImageSize {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ImageSize::W300 => "w300",
            ImageSize::Original => "original",
        }
    }
}

#[must_use]
pub fn image_url(base: &str, size: ImageSize, path: Option<&str>) -> String {
    match path.filter(|p| !p.is_empty()) {
        Some(path) => format!("{}/{}{path}", base.trim_end_matches('/'), size.as_str()),
        None => PLACEHOLDER_IMAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://api.themoviedb.org/3";

    fn url(endpoint: &Endpoint, page: u32) -> String {
        endpoint.url(BASE, "KEY", "ko-KR", page).unwrap().to_string()
    }

    #[test]
    fn popular_url() {
        insta::assert_snapshot!(
            url(&Endpoint::Popular, 1),
            @"https://api.themoviedb.org/3/movie/popular?api_key=KEY&language=ko-KR&page=1"
        );
    }

    #[test]
    fn now_playing_url() {
        insta::assert_snapshot!(
            url(&Endpoint::NowPlaying, 2),
            @"https://api.themoviedb.org/3/movie/now_playing?api_key=KEY&language=ko-KR&page=2"
        );
    }

    #[test]
    fn discover_url_places_genre_before_language() {
        insta::assert_snapshot!(
            url(&Endpoint::Discover { genre_id: 28 }, 3),
            @"https://api.themoviedb.org/3/discover/movie?api_key=KEY&with_genres=28&language=ko-KR&page=3"
        );
    }

    #[test]
    fn search_url_encodes_query() {
        insta::assert_snapshot!(
            url(&Endpoint::search("star wars & co"), 1),
            @"https://api.themoviedb.org/3/search/movie?api_key=KEY&query=star+wars+%26+co&language=ko-KR&page=1"
        );
    }

    #[test]
    fn trailing_slash_on_base_is_ignored() {
        let url = Endpoint::Popular
            .url("http://127.0.0.1:8080/3/", "k", "en-US", 1)
            .unwrap();
        assert_eq!(url.path(), "/3/movie/popular");
    }

    #[test]
    fn cache_keys_exclude_api_key_and_separate_sources() {
        let keys = [
            Endpoint::Popular.cache_key("ko-KR", 1),
            Endpoint::NowPlaying.cache_key("ko-KR", 1),
            Endpoint::Discover { genre_id: 28 }.cache_key("ko-KR", 1),
            Endpoint::search("dune").cache_key("ko-KR", 1),
        ];
        assert_eq!(keys[0], "popular:ko-KR:1");
        assert_eq!(keys[2], "discover:28:ko-KR:1");
        assert_eq!(keys[3], "search:dune:ko-KR:1");
        let unique: std::collections::HashSet<_> = keys.iter().collect();
        assert_eq!(unique.len(), keys.len());
    }

    #[test]
    fn image_urls() {
        let base = "https://image.tmdb.org/t/p";
        assert_eq!(
            image_url(base, ImageSize::W300, Some("/abc.jpg")),
            "https://image.tmdb.org/t/p/w300/abc.jpg"
        );
        assert_eq!(
            image_url(base, ImageSize::Original, Some("/bd.jpg")),
            "https://image.tmdb.org/t/p/original/bd.jpg"
        );
        assert_eq!(image_url(base, ImageSize::W300, None), PLACEHOLDER_IMAGE);
        assert_eq!(image_url(base, ImageSize::W300, Some("")), PLACEHOLDER_IMAGE);
    }
}
