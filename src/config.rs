//! Client configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const SESSION_DIR_NAME: &str = ".classroom-copilot";
pub const SESSION_FILE_NAME: &str = "session.json";

/// Errors produced while building configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid API base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Timeouts {
    #[must_use]
    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    #[must_use]
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend API root, without a trailing slash.
    pub api_base_url: String,
    pub session_file: PathBuf,
    pub timeouts: Timeouts,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `COPILOT_API_BASE_URL`: default `http://localhost:8000/api`
    /// - `COPILOT_SESSION_FILE`: default `$HOME/.classroom-copilot/session.json`
    /// - `COPILOT_REQUEST_TIMEOUT_SECS`: default 30
    /// - `COPILOT_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an absolute `http(s)` URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = std::env::var("COPILOT_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_owned());
        let session_file = std::env::var("COPILOT_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_session_file(std::env::var("HOME").ok().as_deref()));
        let timeouts = Timeouts {
            request_secs: env_parse_u64("COPILOT_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("COPILOT_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        Self::new(&api_base_url, session_file, timeouts)
    }

    /// Build config from explicit values, validating and normalizing the URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an absolute `http(s)` URL.
    pub fn new(api_base_url: &str, session_file: PathBuf, timeouts: Timeouts) -> Result<Self, ConfigError> {
        let api_base_url = normalize_base_url(api_base_url)?;
        Ok(Self { api_base_url, session_file, timeouts })
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

pub(crate) fn default_session_file(home: Option<&str>) -> PathBuf {
    let base = home
        .filter(|h| !h.is_empty())
        .map_or_else(|| PathBuf::from("."), PathBuf::from);
    base.join(SESSION_DIR_NAME).join(SESSION_FILE_NAME)
}

pub(crate) fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let invalid = |reason: String| ConfigError::InvalidBaseUrl { url: raw.to_owned(), reason };

    let url = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(trimmed.to_owned()),
        other => Err(invalid(format!("unsupported scheme {other}"))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
