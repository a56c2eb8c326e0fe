//! Configuration types for the gateway.
//!
//! Loaded from TOML with every section optional, then overridden from the
//! environment. The OMDb API key usually arrives via `OMDB_API_KEY`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use usg_search::{AggregatorConfig, OmdbConfig};

use crate::error::{GatewayError, Result};

/// Top-level gateway configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// OMDb metadata backend settings.
    pub omdb: OmdbConfig,
    /// Fan-out/fan-in settings.
    pub aggregator: AggregatorConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to. `0` picks a free port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
        }
    }
}

impl GatewayConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| GatewayError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| GatewayError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/usg/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("usg").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("usg")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/usg-config/config.toml")
        }
    }

    /// Apply overrides from the process environment.
    ///
    /// # Errors
    ///
    /// See [`GatewayConfig::apply_overrides`].
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`:
    ///
    /// - `OMDB_API_KEY` → `omdb.api_key`
    /// - `OMDB_BASE_URL` → `omdb.base_url`
    /// - `USG_HOST` → `server.host`
    /// - `USG_PORT` → `server.port`
    ///
    /// # Errors
    ///
    /// Returns an error if `USG_PORT` is not a valid port number.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(key) = lookup("OMDB_API_KEY") {
            self.omdb.api_key = key;
        }
        if let Some(base_url) = lookup("OMDB_BASE_URL") {
            self.omdb.base_url = base_url;
        }
        if let Some(host) = lookup("USG_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("USG_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| GatewayError::Config(format!("USG_PORT {port:?} is invalid: {e}")))?;
        }
        Ok(())
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(GatewayError::Config("server host must not be empty".into()));
        }
        self.omdb.validate()?;
        self.aggregator.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_values() {
        let config = GatewayConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert!(config.aggregator.deadline_seconds.is_none());
    }

    #[test]
    fn default_config_needs_api_key() {
        let err = GatewayConfig::default().validate().unwrap_err();
        assert!(err.to_string().contains("api_key"));
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = GatewayConfig::default();
        config
            .apply_overrides(env(&[
                ("OMDB_API_KEY", "abc"),
                ("OMDB_BASE_URL", "http://localhost:9999/"),
                ("USG_HOST", "0.0.0.0"),
                ("USG_PORT", "9090"),
            ]))
            .unwrap();
        assert_eq!(config.omdb.api_key, "abc");
        assert_eq!(config.omdb.base_url, "http://localhost:9999/");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9090);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn absent_env_leaves_config_untouched() {
        let mut config = GatewayConfig::default();
        config.apply_overrides(env(&[])).unwrap();
        assert_eq!(config, GatewayConfig::default());
    }

    #[test]
    fn invalid_port_override_rejected() {
        let mut config = GatewayConfig::default();
        let err = config
            .apply_overrides(env(&[("USG_PORT", "eighty")]))
            .unwrap_err();
        assert!(err.to_string().contains("USG_PORT"));
    }

    #[test]
    fn empty_host_rejected() {
        let mut config = GatewayConfig::default();
        config.omdb.api_key = "abc".into();
        config.server.host = " ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_deadline_rejected() {
        let mut config = GatewayConfig::default();
        config.omdb.api_key = "abc".into();
        config.aggregator.deadline_seconds = Some(0);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("deadline"));
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = GatewayConfig::default();
        config.server.port = 3000;
        config.omdb.api_key = "k".into();
        config.aggregator.deadline_seconds = Some(5);

        config.save_to_file(&path).unwrap();
        let loaded = GatewayConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml_str = r#"
[omdb]
api_key = "from-file"
timeout_seconds = 3
"#;
        let config: GatewayConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.omdb.api_key, "from-file");
        assert_eq!(config.omdb.timeout_seconds, 3);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn from_file_nonexistent_returns_error() {
        let result = GatewayConfig::from_file(std::path::Path::new("/nonexistent/usg/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn from_file_invalid_toml_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "server = [not valid").unwrap();
        let err = GatewayConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().starts_with("config error"));
    }
}
