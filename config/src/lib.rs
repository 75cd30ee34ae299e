//! `~/.reel/config.toml` loading and persistence.
//!
//! Every section is optional; a missing file means built-in defaults.
//!
//! ```toml
//! [app]
//! ascii_only = false
//! high_contrast = false
//! popular_view = "table"
//!
//! [tmdb]
//! api_key = "${TMDB_API_KEY}"
//! language = "ko-KR"
//! timeout_seconds = 15
//!
//! [cache]
//! enabled = true
//! ttl_seconds = 600
//!
//! [browse]
//! grid_movie_limit = 120
//! ```

use serde::Deserialize;
use std::{
    env, fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

use reel_types::{PopularView, UiOptions};
use reel_utils::{PersistMode, atomic_write};

pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";
pub const DEFAULT_LANGUAGE: &str = "ko-KR";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 600;
pub const DEFAULT_GRID_MOVIE_LIMIT: usize = 120;
pub const DEFAULT_FEED_PREFETCH_ROWS: usize = 2;

// Default value function for serde (bool::default() is false, so only true needs a fn)
const fn default_true() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
pub struct ReelConfig {
    pub app: Option<AppConfig>,
    pub tmdb: Option<TmdbConfig>,
    pub cache: Option<CacheConfig>,
    pub storage: Option<StorageConfig>,
    pub browse: Option<BrowseConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Use ASCII-only glyphs for markers and spinners.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
    /// Initial layout of the popular screen: "table" or "infinite".
    pub popular_view: Option<String>,
}

#[derive(Default, Deserialize)]
pub struct TmdbConfig {
    /// Overrides the key derived from the signed-in account.
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub image_base_url: Option<String>,
    pub language: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub max_retries: Option<u32>,
}

// Manual Debug impl to prevent leaking API keys in logs.
impl std::fmt::Debug for TmdbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbConfig")
            .field(
                "api_key",
                &if self.api_key.is_some() {
                    "[REDACTED]"
                } else {
                    "None"
                },
            )
            .field("base_url", &self.base_url)
            .field("image_base_url", &self.image_base_url)
            .field("language", &self.language)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub ttl_seconds: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_seconds: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct StorageConfig {
    /// Directory for `storage.json`, `cache.json`, and logs.
    pub dir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BrowseConfig {
    pub grid_movie_limit: Option<usize>,
    pub feed_prefetch_rows: Option<usize>,
}

/// Flattened, defaulted view of the config that the rest of the app consumes.
#[derive(Debug, Clone)]
pub struct Settings {
    pub ui: UiOptions,
    pub popular_view: PopularView,
    pub api_key_override: Option<String>,
    pub base_url: String,
    pub image_base_url: String,
    pub language: String,
    pub timeout: Duration,
    pub max_retries: Option<u32>,
    pub cache_enabled: bool,
    pub cache_ttl: Duration,
    pub data_dir: PathBuf,
    pub grid_movie_limit: usize,
    pub feed_prefetch_rows: usize,
}

impl Settings {
    /// Defaults rooted at an explicit data directory.
    #[must_use]
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            ui: UiOptions::default(),
            popular_view: PopularView::default(),
            api_key_override: None,
            base_url: DEFAULT_TMDB_BASE_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: None,
            cache_enabled: true,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            data_dir,
            grid_movie_limit: DEFAULT_GRID_MOVIE_LIMIT,
            feed_prefetch_rows: DEFAULT_FEED_PREFETCH_ROWS,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::with_data_dir(default_data_dir())
    }
}

pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        if let Some(end) = after.find('}') {
            let var = &after[..end];
            if !var.is_empty() {
                out.push_str(&env::var(var).unwrap_or_default());
            }
            rest = &after[end + 1..];
        } else {
            // Unclosed: keep the remainder verbatim.
            out.push_str(&rest[start..]);
            rest = "";
        }
    }
    out.push_str(rest);

    out
}

impl ReelConfig {
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// Resolve defaults, env expansion, and value parsing.
    #[must_use]
    pub fn settings(&self) -> Settings {
        let data_dir = self
            .storage
            .as_ref()
            .and_then(|s| s.dir.as_deref())
            .map(|dir| PathBuf::from(expand_env_vars(dir)))
            .unwrap_or_else(default_data_dir);
        let mut settings = Settings::with_data_dir(data_dir);

        if let Some(app) = &self.app {
            settings.ui = UiOptions {
                ascii_only: app.ascii_only,
                high_contrast: app.high_contrast,
            };
            if let Some(raw) = app.popular_view.as_deref() {
                match PopularView::parse(raw) {
                    Some(view) => settings.popular_view = view,
                    None => tracing::warn!("Unknown popular_view in config: {}", raw),
                }
            }
        }

        if let Some(tmdb) = &self.tmdb {
            settings.api_key_override = tmdb
                .api_key
                .as_deref()
                .map(expand_env_vars)
                .filter(|key| !key.trim().is_empty());
            if let Some(base) = &tmdb.base_url {
                settings.base_url = base.trim_end_matches('/').to_string();
            }
            if let Some(base) = &tmdb.image_base_url {
                settings.image_base_url = base.trim_end_matches('/').to_string();
            }
            if let Some(language) = &tmdb.language {
                settings.language = language.clone();
            }
            if let Some(secs) = tmdb.timeout_seconds.filter(|s| *s > 0) {
                settings.timeout = Duration::from_secs(secs);
            }
            settings.max_retries = tmdb.max_retries;
        }

        if let Some(cache) = &self.cache {
            settings.cache_enabled = cache.enabled;
            if let Some(ttl) = cache.ttl_seconds {
                settings.cache_ttl = Duration::from_secs(ttl);
            }
        }

        if let Some(browse) = &self.browse {
            if let Some(limit) = browse.grid_movie_limit.filter(|l| *l > 0) {
                settings.grid_movie_limit = limit;
            }
            if let Some(rows) = browse.feed_prefetch_rows {
                settings.feed_prefetch_rows = rows;
            }
        }

        settings
    }

    /// Persist the popular view choice to the config file.
    ///
    /// Uses `toml_edit` to preserve comments and formatting.
    /// Creates the config file and parent directory if they don't exist.
    pub fn persist_popular_view(view: PopularView) -> io::Result<()> {
        let path = config_path()
            .ok_or_else(|| io::Error::new(ErrorKind::NotFound, "Could not determine config path"))?;
        persist_popular_view_at(&path, view)
    }
}

pub fn persist_popular_view_at(path: &Path, view: PopularView) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
        restrict_dir_permissions(parent)?;
    }

    let content = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };

    let mut doc = content
        .parse::<toml_edit::DocumentMut>()
        .map_err(|e| io::Error::new(ErrorKind::InvalidData, e))?;

    let app = doc
        .entry("app")
        .or_insert(toml_edit::table())
        .as_table_like_mut()
        .ok_or_else(|| {
            io::Error::new(
                ErrorKind::InvalidData,
                format!("`app` in {} is not a table", path.display()),
            )
        })?;
    app.insert("popular_view", toml_edit::value(view.as_str()));

    // The file may carry a literal api_key.
    atomic_write(
        path,
        doc.to_string().as_bytes(),
        PersistMode::SensitiveOwnerOnly,
    )
}

/// Tighten a directory we own to 0o700 if group/other bits are set.
#[cfg(unix)]
fn restrict_dir_permissions(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::{MetadataExt, PermissionsExt};

    let metadata = fs::metadata(dir)?;
    let our_uid = unsafe { libc::getuid() };
    if metadata.uid() == our_uid {
        let mode = metadata.permissions().mode() & 0o777;
        if mode & 0o077 != 0 {
            fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
        }
    }
    Ok(())
}

#[cfg(not(unix))]
fn restrict_dir_permissions(_dir: &Path) -> io::Result<()> {
    Ok(())
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".reel").join("config.toml"))
}

/// `~/.reel`, or `./.reel` when no home directory is known.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir().map_or_else(|| PathBuf::from(".reel"), |home| home.join(".reel"))
}
