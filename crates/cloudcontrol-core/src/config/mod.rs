//! Configuration types for the CloudControl MCP server.
//!
//! Configuration is assembled once at process start from three layers, each
//! overriding the previous one:
//!
//! 1. Built-in defaults
//! 2. An optional YAML file (`cloudcontrol.yaml`)
//! 3. Environment variables (`AWS_REGION`, `AWS_PROFILE`, `AWS_ACCESS_KEY_ID`, ...)
//!
//! Command line flags are applied on top by the binary. The resulting
//! [`AppConfig`] is treated as immutable afterwards.

pub mod aws;
pub mod logging;
pub mod mcp;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use aws::{AwsConfig, CredentialSource};
pub use logging::LoggingConfig;
pub use mcp::{McpConfig, Transport};

/// Environment variable holding the log filter directive.
pub const LOG_LEVEL_ENV: &str = "CLOUDCONTROL_LOG_LEVEL";

/// Complete server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// AWS client settings.
    #[serde(default)]
    pub aws: AwsConfig,

    /// MCP transport settings.
    #[serde(default)]
    pub mcp: McpConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Load the file (if given and present), then overlay the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(path)?,
            Some(path) => {
                tracing::warn!(config = %path.display(), "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Overlay environment variables read through `lookup`.
    ///
    /// Blank values are treated as unset.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(region) = get("AWS_REGION").or_else(|| get("AWS_DEFAULT_REGION")) {
            self.aws.region = region;
        }
        if let Some(profile) = get("AWS_PROFILE") {
            self.aws.profile = Some(profile);
        }
        if let Some(key) = get("AWS_ACCESS_KEY_ID") {
            self.aws.access_key_id = Some(key);
        }
        if let Some(secret) = get("AWS_SECRET_ACCESS_KEY") {
            self.aws.secret_access_key = Some(secret);
        }
        if let Some(token) = get("AWS_SESSION_TOKEN") {
            self.aws.session_token = Some(token);
        }
        if let Some(level) = get(LOG_LEVEL_ENV) {
            self.logging.level = level;
        }
    }

    /// Reject values the SDK clients cannot be built from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.aws.region.trim().is_empty() {
            return Err(ConfigError::Config("aws.region must not be empty".to_string()));
        }
        if self.aws.max_attempts == 0 {
            return Err(ConfigError::Config(
                "aws.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.aws.connect_timeout_secs == 0 || self.aws.read_timeout_secs == 0 {
            return Err(ConfigError::Config(
                "aws timeouts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
