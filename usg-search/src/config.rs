//! Backend and aggregator configuration with sensible defaults.
//!
//! Credentials are passed in explicitly; nothing here reads global state.
//! The gateway loads these sections from TOML and the environment.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Default OMDb API endpoint.
pub const DEFAULT_OMDB_BASE_URL: &str = "https://www.omdbapi.com/";

/// Configuration for the OMDb metadata backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OmdbConfig {
    /// Base URL of the OMDb API.
    pub base_url: String,
    /// OMDb API key. Required; usually supplied via `OMDB_API_KEY`.
    pub api_key: String,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Custom User-Agent string. If `None`, a crate default is sent.
    pub user_agent: Option<String>,
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OMDB_BASE_URL.to_owned(),
            api_key: String::new(),
            timeout_seconds: 10,
            user_agent: None,
        }
    }
}

impl OmdbConfig {
    /// Validates this configuration.
    ///
    /// Checks:
    /// - `api_key` must not be empty
    /// - `base_url` must be an absolute http(s) URL
    /// - `timeout_seconds` must be greater than 0
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.api_key.trim().is_empty() {
            return Err(SearchError::Config(
                "omdb api_key must be set (OMDB_API_KEY)".into(),
            ));
        }
        let url = url::Url::parse(&self.base_url)
            .map_err(|e| SearchError::Config(format!("omdb base_url is invalid: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SearchError::Config(
                "omdb base_url must use http or https".into(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "omdb timeout_seconds must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration for the fan-out/fan-in aggregator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Upper bound in seconds on any single binding. A binding that runs
    /// longer resolves as a failed item. `None` waits indefinitely, leaving
    /// timeouts to each backend's transport.
    pub deadline_seconds: Option<u64>,
}

impl AggregatorConfig {
    /// Validates this configuration.
    ///
    /// A deadline of zero seconds is rejected.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.deadline_seconds == Some(0) {
            return Err(SearchError::Config(
                "aggregator deadline_seconds must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_omdb() -> OmdbConfig {
        OmdbConfig {
            api_key: "test-key".into(),
            ..Default::default()
        }
    }

    #[test]
    fn default_omdb_config_has_sensible_values() {
        let config = OmdbConfig::default();
        assert_eq!(config.base_url, DEFAULT_OMDB_BASE_URL);
        assert_eq!(config.timeout_seconds, 10);
        assert!(config.api_key.is_empty());
        assert!(config.user_agent.is_none());
    }

    #[test]
    fn valid_omdb_config_passes() {
        assert!(valid_omdb().validate().is_ok());
    }

    #[test]
    fn missing_api_key_rejected() {
        let err = OmdbConfig::default().validate().unwrap_err();
        assert!(err.to_string().contains("api_key"));
    }

    #[test]
    fn invalid_base_url_rejected() {
        let config = OmdbConfig {
            base_url: "not a url".into(),
            ..valid_omdb()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn non_http_base_url_rejected() {
        let config = OmdbConfig {
            base_url: "ftp://example.com".into(),
            ..valid_omdb()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = OmdbConfig {
            timeout_seconds: 0,
            ..valid_omdb()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_seconds"));
    }

    #[test]
    fn aggregator_default_has_no_deadline() {
        let config = AggregatorConfig::default();
        assert!(config.deadline_seconds.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_deadline_rejected() {
        let config = AggregatorConfig {
            deadline_seconds: Some(0),
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("deadline"));
    }

    #[test]
    fn omdb_config_from_partial_json() {
        let config: OmdbConfig =
            serde_json::from_str(r#"{"api_key":"k"}"#).expect("deserialize");
        assert_eq!(config.api_key, "k");
        assert_eq!(config.timeout_seconds, 10);
    }
}
