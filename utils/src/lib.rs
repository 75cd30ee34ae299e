//! Shared infrastructure utilities for Reel.
//!
//! - **`atomic_write`**: Crash-safe file persistence (temp + rename)
//! - **`redact`**: Keep API keys out of logs and notices

pub mod atomic_write;
pub mod redact;

pub use atomic_write::{PersistMode, atomic_write, recover_bak_file};
pub use redact::{mask_secret, redact_api_key};
