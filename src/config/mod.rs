use crate::utils::DEFAULT_API_BASE;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tokio::fs;

/// Repository that publishes the EEPROM images
pub const DEFAULT_REPOSITORY: &str = "raspberrypi/rpi-eeprom";

/// Directory inside the repository holding the images
pub const DEFAULT_PATH: &str = "firmware-2711/latest";

/// Git commit of the repository to take EEPROM updates from
pub const DEFAULT_REFERENCE: &str = "4c5aebdb200bc9a2ffd2a0158efffb9603c33be7";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid credentials: expected user:password")]
    InvalidCredentials,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_repository() -> String {
    DEFAULT_REPOSITORY.to_string()
}

fn default_path() -> String {
    DEFAULT_PATH.to_string()
}

fn default_reference() -> String {
    DEFAULT_REFERENCE.to_string()
}

fn default_extension() -> String {
    "bin".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    60
}

/// Sync configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SyncConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// `owner/name` of the remote repository
    #[serde(default = "default_repository")]
    pub repository: String,
    #[serde(default = "default_path")]
    pub path: String,
    /// Pinned commit; never a branch name
    #[serde(default = "default_reference")]
    pub reference: String,
    /// Only files with this extension are hashed, fetched or deleted
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Budget for the whole download phase
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            repository: default_repository(),
            path: default_path(),
            reference: default_reference(),
            extension: default_extension(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl SyncConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

/// Read the configuration file
pub async fn read_config(config_path: &Path) -> Result<SyncConfig, ConfigError> {
    let content = fs::read_to_string(config_path).await?;
    let config: SyncConfig = serde_json::from_str(&content)?;
    Ok(config)
}

/// HTTP basic authentication credentials
#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl Credentials {
    /// Parse a `user:password` string. The password may itself contain colons.
    pub fn parse(user_pass: &str) -> Result<Self, ConfigError> {
        let (user, password) = user_pass
            .split_once(':')
            .ok_or(ConfigError::InvalidCredentials)?;
        Ok(Self {
            user: user.to_string(),
            password: password.to_string(),
        })
    }

    /// Build credentials from a user name and access token pair.
    /// Returns `None` unless a token is present.
    pub fn from_token(user: Option<&str>, token: Option<&str>) -> Option<Self> {
        let token = token.filter(|t| !t.is_empty())?;
        Some(Self {
            user: user.unwrap_or_default().to_string(),
            password: token.to_string(),
        })
    }

    /// Resolve credentials from an explicit `user:password` flag, falling back
    /// to the `GITHUB_USER` / `GITHUB_AUTH_TOKEN` environment variables.
    pub fn resolve(user_pass: Option<&str>) -> Result<Option<Self>, ConfigError> {
        match user_pass.filter(|s| !s.is_empty()) {
            Some(user_pass) => Self::parse(user_pass).map(Some),
            None => {
                let user = std::env::var("GITHUB_USER").ok();
                let token = std::env::var("GITHUB_AUTH_TOKEN").ok();
                Ok(Self::from_token(user.as_deref(), token.as_deref()))
            }
        }
    }
}

// Keep the secret out of logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}
