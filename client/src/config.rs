//! Client configuration from `LITMAP_*` environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `LITMAP_BASE_URL` | `http://127.0.0.1:8000` |
//! | `LITMAP_TOKEN` | none |
//! | `LITMAP_REQUEST_TIMEOUT_SECS` | 30 |
//! | `LITMAP_CONNECT_TIMEOUT_SECS` | 10 |
//!
//! Unparsable numbers fall back to their defaults.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Errors raised while turning a [`ClientConfig`] into a working client.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The base URL does not parse or cannot carry a path.
    #[error("invalid base URL `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Bearer token sent with every request.
    pub token: Option<String>,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            token: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Read every setting from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            base_url: env_string("LITMAP_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            token: env_string("LITMAP_TOKEN"),
            request_timeout_secs: env_parse("LITMAP_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout_secs: env_parse("LITMAP_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

/// Non-empty trimmed value of `key`.
fn env_string(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().to_owned()),
        _ => None,
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    env_string(key)
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
