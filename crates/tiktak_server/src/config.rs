//! Configuration for the REST server and the MCP adapter.
//!
//! Values come from, in increasing precedence: built-in defaults, an optional
//! TOML file, `TIKTAK_*` environment variables (a `.env` file is honored),
//! and command-line flags.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// REST server settings.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    port: u16,

    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    log_filter: String,
}

/// MCP adapter settings.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Base URL of the REST server the adapter forwards to.
    #[serde(default = "default_api_base")]
    api_base: String,
}

/// Whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// `[server]` table.
    #[serde(default)]
    server: ServerConfig,

    /// `[adapter]` table.
    #[serde(default)]
    adapter: AdapterConfig,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_filter() -> String {
    "info,tiktak_server=debug".to_string()
}

fn default_api_base() -> String {
    "http://127.0.0.1:5000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_filter: default_log_filter(),
        }
    }
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
        }
    }
}

impl ServerConfig {
    /// Replaces host and port with any values given.
    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }
}

impl AdapterConfig {
    /// Replaces the API base URL if one is given.
    pub fn with_api_base(mut self, api_base: Option<String>) -> Self {
        if let Some(api_base) = api_base {
            self.api_base = api_base;
        }
        self
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        info!(port = config.server.port, "Config loaded successfully");
        Ok(config)
    }

    /// Loads the file if a path is given, otherwise starts from defaults.
    /// Environment overrides are applied in both cases.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                debug!("No config file given, using defaults");
                Self::default()
            }
        };
        config.with_env(|key| std::env::var(key).ok())
    }

    /// Applies `TIKTAK_HOST`, `TIKTAK_PORT` and `TIKTAK_API_BASE` from `lookup`.
    pub fn with_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(host) = lookup("TIKTAK_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("TIKTAK_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| ConfigError::new(format!("Invalid TIKTAK_PORT {port:?}: {e}")))?;
        }
        if let Some(api_base) = lookup("TIKTAK_API_BASE") {
            self.adapter.api_base = api_base;
        }
        Ok(self)
    }

    /// Splits into server and adapter settings.
    pub fn into_parts(self) -> (ServerConfig, AdapterConfig) {
        (self.server, self.adapter)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server().host(), "127.0.0.1");
        assert_eq!(*config.server().port(), 5000);
        assert_eq!(config.adapter().api_base(), "http://127.0.0.1:5000");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = AppConfig::from_toml("[server]\nport = 8080\n").unwrap();
        assert_eq!(*config.server().port(), 8080);
        assert_eq!(config.server().host(), "127.0.0.1");
        assert_eq!(config.adapter(), &AdapterConfig::default());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[server]\nhost = \"0.0.0.0\"\nlog_filter = \"warn\"\n\n[adapter]\napi_base = \"http://game:9000\""
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server().host(), "0.0.0.0");
        assert_eq!(config.server().log_filter(), "warn");
        assert_eq!(config.adapter().api_base(), "http://game:9000");
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = AppConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(err.message.contains("Failed to read config file"));
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let err = AppConfig::from_toml("[server\nport = ").unwrap_err();
        assert!(err.message.contains("Failed to parse config"));
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::default()
            .with_env(|key| match key {
                "TIKTAK_PORT" => Some("7000".to_string()),
                "TIKTAK_API_BASE" => Some("http://elsewhere:7000".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(*config.server().port(), 7000);
        assert_eq!(config.adapter().api_base(), "http://elsewhere:7000");

        let bad = AppConfig::default().with_env(|key| (key == "TIKTAK_PORT").then(|| "abc".to_string()));
        assert!(bad.is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let server = ServerConfig::default().with_overrides(None, Some(9999));
        assert_eq!(*server.port(), 9999);
        assert_eq!(server.host(), "127.0.0.1");

        let adapter = AdapterConfig::default().with_api_base(Some("http://x:1".to_string()));
        assert_eq!(adapter.api_base(), "http://x:1");
    }
}
