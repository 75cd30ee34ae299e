//! Persistent state for Reel.
//!
//! - **`local`**: file-backed and in-memory key-value stores
//! - **`cache`**: JSON cache entries with a millisecond expiry
//! - **`auth`**: simulated accounts on top of local storage
//! - **`wishlist`**: bookmarked movies, unique by id

mod auth;
mod cache;
mod error;
mod local;
mod wishlist;

pub use auth::{AuthService, LoginPersistence, RememberedUser, StoredUser};
pub use cache::{CacheEntry, Clock, ExpiringCache, SystemClock};
pub use error::{AuthError, StoreError};
pub use local::{KeyValueStore, Storage};
pub use wishlist::{Toggle, Wishlist};

/// Storage keys shared with the browser build of the app.
pub mod keys {
    pub const USERS: &str = "users";
    pub const API_KEY: &str = "TMDb-Key";
    pub const IS_AUTHENTICATED: &str = "isAuthenticated";
    pub const CURRENT_USER: &str = "currentUser";
    pub const REMEMBER_USER: &str = "rememberUser";
    pub const WISHLIST: &str = "movieWishlist";
}

pub const STORAGE_FILE: &str = "storage.json";
pub const CACHE_FILE: &str = "cache.json";
