//! Configuration module for loading and parsing TOML configuration files.

use crate::auth::OAuthConfig;
use crate::token::DEFAULT_MAX_TOKEN_AGE_SECS;
use schwab_client::{ClientConfig, DEFAULT_BASE_URL};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse TOML configuration.
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// Invalid configuration value.
    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Application credentials.
    pub oauth: OAuthSettings,
    /// HTTP client settings.
    #[serde(default)]
    pub client: ClientSettings,
    /// Token file settings.
    #[serde(default)]
    pub token: TokenSettings,
}

/// Application credentials registered with the broker.
#[derive(Clone, Deserialize)]
pub struct OAuthSettings {
    /// Application key.
    pub api_key: String,
    /// Application secret.
    pub app_secret: String,
    /// Registered callback URL.
    #[serde(default = "default_callback_url")]
    pub callback_url: String,
}

fn default_callback_url() -> String {
    "https://127.0.0.1:8182".to_string()
}

impl fmt::Debug for OAuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthSettings")
            .field("api_key", &self.api_key)
            .field("app_secret", &"[REDACTED]")
            .field("callback_url", &self.callback_url)
            .finish()
    }
}

/// HTTP client configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// API host; the OAuth endpoints live under the same host.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl ClientSettings {
    /// Request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Settings in the form the HTTP client takes.
    #[must_use]
    pub fn to_client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            timeout: self.timeout(),
        }
    }
}

/// Token file configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TokenSettings {
    /// Token file location.
    pub path: PathBuf,
    /// Tokens older than this are refused; refresh tokens die after 7 days.
    pub max_age_secs: i64,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("token.json"),
            max_age_secs: DEFAULT_MAX_TOKEN_AGE_SECS,
        }
    }
}

impl Config {
    /// Configuration with default client and token settings.
    #[must_use]
    pub fn new(api_key: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            oauth: OAuthSettings {
                api_key: api_key.into(),
                app_secret: app_secret.into(),
                callback_url: default_callback_url(),
            },
            client: ClientSettings::default(),
            token: TokenSettings::default(),
        }
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file.
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Arguments
    /// * `content` - TOML content as string.
    ///
    /// # Errors
    /// Returns error if content cannot be parsed.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// OAuth credentials with endpoints under the configured host.
    #[must_use]
    pub fn oauth_config(&self) -> OAuthConfig {
        OAuthConfig::with_base_url(
            &self.oauth.api_key,
            &self.oauth.app_secret,
            &self.oauth.callback_url,
            &self.client.base_url,
        )
    }

    /// Validates the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.oauth.api_key.is_empty() {
            return Err(ConfigError::InvalidValue(
                "oauth.api_key cannot be empty".to_string(),
            ));
        }
        if self.oauth.app_secret.is_empty() {
            return Err(ConfigError::InvalidValue(
                "oauth.app_secret cannot be empty".to_string(),
            ));
        }
        if Url::parse(&self.oauth.callback_url).is_err() {
            return Err(ConfigError::InvalidValue(format!(
                "oauth.callback_url {} is not a URL",
                self.oauth.callback_url
            )));
        }
        if Url::parse(&self.client.base_url).is_err() {
            return Err(ConfigError::InvalidValue(format!(
                "client.base_url {} is not a URL",
                self.client.base_url
            )));
        }
        if self.client.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "client.timeout_secs must be positive".to_string(),
            ));
        }
        if self.token.max_age_secs <= 0 {
            return Err(ConfigError::InvalidValue(
                "token.max_age_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
