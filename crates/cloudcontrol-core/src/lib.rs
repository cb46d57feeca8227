//! Shared types for the CloudControl MCP server crates.

// Configuration types shared across all crates
pub mod config;

pub use config::{
    AppConfig, AwsConfig, ConfigError, CredentialSource, LoggingConfig, McpConfig, Transport,
};
