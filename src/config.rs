//! Configuration management for autogpt-robinhood
//!
//! Handles loading and merging configuration from multiple sources:
//! 1. Compiled defaults
//! 2. User config (~/.config/autogpt-robinhood/config.toml)
//! 3. CLI-specified config file
//! 4. Environment variables

use crate::broker::{
    env_value, Credentials, DEFAULT_BASE_URL, DEFAULT_CLIENT_ID, PASSWORD_ENV, USERNAME_ENV,
};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Overrides the brokerage API host
pub const BASE_URL_ENV: &str = "ROBINHOOD_BASE_URL";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub robinhood: RobinhoodConfig,
}

/// Brokerage connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RobinhoodConfig {
    /// API host
    pub base_url: String,
    /// OAuth client id sent with the password grant
    pub client_id: String,
    /// Request timeout in seconds
    pub timeout: u64,
    /// Account username
    pub username: Option<String>,
    /// Account password
    #[serde(skip_serializing)]
    pub password: Option<String>,
}

impl Default for RobinhoodConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            timeout: 30,
            username: None,
            password: None,
        }
    }
}

impl Config {
    /// Load configuration from all sources
    pub fn load(cli_config: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(user_config) = Self::user_config_path() {
            if user_config.exists() {
                debug!("Loading user config from {:?}", user_config);
                config.merge_from_file(&user_config)?;
            }
        }

        if let Some(path) = cli_config {
            debug!("Loading CLI config from {:?}", path);
            config.merge_from_file(path)?;
        }

        config.apply_env_overrides();

        Ok(config)
    }

    /// Default per-user config location
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("autogpt-robinhood/config.toml"))
    }

    /// Merge configuration from a file
    fn merge_from_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;

        let file_config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))?;

        self.merge(file_config);
        Ok(())
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        let defaults = RobinhoodConfig::default();
        let other = other.robinhood;

        if other.base_url != defaults.base_url {
            self.robinhood.base_url = other.base_url;
        }
        if other.client_id != defaults.client_id {
            self.robinhood.client_id = other.client_id;
        }
        if other.timeout != defaults.timeout {
            self.robinhood.timeout = other.timeout;
        }
        if other.username.is_some() {
            self.robinhood.username = other.username;
        }
        if other.password.is_some() {
            self.robinhood.password = other.password;
        }
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Some(username) = env_value(USERNAME_ENV) {
            self.robinhood.username = Some(username);
        }
        if let Some(password) = env_value(PASSWORD_ENV) {
            self.robinhood.password = Some(password);
        }
        if let Some(base_url) = env_value(BASE_URL_ENV) {
            self.robinhood.base_url = base_url;
        }
    }

    /// Validate transport settings. Credentials are left to the brokerage.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.robinhood.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "robinhood.base_url must not be empty".to_string(),
            ));
        }
        if self.robinhood.timeout == 0 {
            return Err(ConfigError::Invalid(
                "robinhood.timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Credentials for the session; missing values become empty strings
    pub fn credentials(&self) -> Credentials {
        Credentials::new(
            self.robinhood.username.clone().unwrap_or_default(),
            self.robinhood.password.clone().unwrap_or_default(),
        )
    }
}
