//! Secret redaction for logs and user-facing messages.
//!
//! The TMDB v3 key travels as the `api_key` query parameter, so every logged
//! request URL and every `reqwest::Error` display would otherwise carry it.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

const REDACTED: &str = "[REDACTED]";

fn api_key_param() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(api_key=)[^&#\s)]+").expect("static regex is valid"))
}

/// Replace the value of every `api_key=` query parameter with `[REDACTED]`.
#[must_use]
pub fn redact_api_key(input: &str) -> Cow<'_, str> {
    api_key_param().replace_all(input, format!("${{1}}{REDACTED}"))
}

/// Short, log-safe fingerprint of a secret: the last four characters.
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 4 {
        return "****".to_string();
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("****{tail}")
}
