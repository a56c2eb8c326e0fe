//! Shared HTTP client construction for outbound backend requests.

use std::time::Duration;

use crate::config::OmdbConfig;
use crate::error::SearchError;

/// User-Agent sent when the configuration does not override it.
pub const DEFAULT_USER_AGENT: &str = concat!("usg-search/", env!("CARGO_PKG_VERSION"));

/// Build a [`reqwest::Client`] for the OMDb backend.
///
/// The client has:
/// - Timeout from config, covering connect, send and body read
/// - Custom User-Agent if configured, [`DEFAULT_USER_AGENT`] otherwise
/// - Brotli and gzip decompression
///
/// # Errors
///
/// Returns [`SearchError::Config`] if the client cannot be constructed.
pub fn build_client(config: &OmdbConfig) -> Result<reqwest::Client, SearchError> {
    let ua = config
        .user_agent
        .clone()
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned());

    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(ua)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| SearchError::Config(format!("failed to build HTTP client: {e}")))
}
