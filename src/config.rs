//! Configuration loading and management for websum.
//!
//! Loads settings from `websum.toml`, falling back to built-in defaults, with an
//! environment variable override for the summariser endpoint.

use crate::summary::{SummaryLength, SummaryStyle};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable that replaces `endpoint.base_url`
pub const ENDPOINT_ENV: &str = "WEBSUM_ENDPOINT";

const CONFIG_FILE: &str = "websum.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("invalid endpoint url: {0}")]
    InvalidEndpoint(String),
}

/// Summariser endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Base URL; `/summarize` is appended to it
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Initial form selections
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DefaultsConfig {
    pub length: SummaryLength,
    pub style: SummaryStyle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
}

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub endpoint: EndpointConfig,
    pub defaults: DefaultsConfig,
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from the default location (websum.toml in cwd or home),
    /// or the defaults when no file exists
    pub fn load() -> Result<Self, ConfigError> {
        let config = match Self::find_config_file() {
            Some(path) => Self::read_from(&path)?,
            None => Config::default(),
        };
        config.with_env_overrides()
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::read_from(path)?.with_env_overrides()
    }

    fn read_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            self.endpoint.base_url = endpoint;
        }
        self.endpoint.validate()?;
        Ok(self)
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        // Check current directory first
        let local_config = PathBuf::from(CONFIG_FILE);
        if local_config.exists() {
            return Some(local_config);
        }

        // Check home directory
        let home_config = dirs::home_dir()?
            .join(".config")
            .join("websum")
            .join(CONFIG_FILE);
        home_config.exists().then_some(home_config)
    }

    /// Directory for the TUI log file
    pub fn log_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("websum")
    }
}

impl EndpointConfig {
    /// Full URL of the summarise route
    pub fn summarize_url(&self) -> String {
        format!("{}/summarize", self.base_url.trim_end_matches('/'))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let scheme_ok = self.base_url.starts_with("http://") || self.base_url.starts_with("https://");
        if !scheme_ok {
            return Err(ConfigError::InvalidEndpoint(self.base_url.clone()));
        }
        Ok(())
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 60,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
