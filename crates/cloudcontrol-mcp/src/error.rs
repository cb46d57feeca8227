//! Error types for the MCP crate.

use crate::provider::ProviderError;
use crate::validator::ValidationError;
use thiserror::Error;

/// Errors that can occur in the MCP server.
#[derive(Debug, Error)]
pub enum McpError {
    /// Failed to start the server.
    #[error("failed to start MCP server: {0}")]
    StartupFailed(String),

    /// Transport error.
    #[error("transport error: {0}")]
    TransportError(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors returned by a single tool invocation.
///
/// Each variant is surfaced to the caller as a tool result carrying an
/// `error` field; none of them affects later invocations.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Missing or malformed argument, detected before any outbound call.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Structured failure reported by the provider, or a transport failure
    /// reaching it.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The provider answered with a payload that could not be decoded.
    #[error("{context}: {reason}")]
    InvalidResponse { context: String, reason: String },

    /// No provider client was configured at startup.
    #[error("AWS CloudControl API client not initialized")]
    ClientUnavailable,
}

impl AdapterError {
    /// Short, stable category name used in the error envelope.
    pub fn kind(&self) -> &'static str {
        match self {
            AdapterError::Validation(e) => e.kind.as_str(),
            AdapterError::Provider(e) => e.kind().as_str(),
            AdapterError::InvalidResponse { .. } => "invalid-response",
            AdapterError::ClientUnavailable => "client-unavailable",
        }
    }

    /// Provider error code, when the failure came from the provider.
    pub fn code(&self) -> Option<&str> {
        match self {
            AdapterError::Provider(e) => e.code(),
            _ => None,
        }
    }

    /// Whether the failure was detected locally, before any outbound call.
    pub fn is_input_error(&self) -> bool {
        matches!(self, AdapterError::Validation(_))
    }
}
