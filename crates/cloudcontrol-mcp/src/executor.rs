//! Tool execution engine.
//!
//! This module maps a tool call (name plus JSON arguments) onto the
//! matching [`CloudControlAdapter`] operation and formats the outcome:
//! - argument decoding into the per-tool request structure
//! - dispatch to the adapter
//! - success payloads as pretty JSON text plus structured content
//! - failures as an error envelope `{error, error_kind, error_code?}`

use crate::adapter::CloudControlAdapter;
use crate::error::AdapterError;
use crate::protocol::{CallToolResponse, ToolContent};
use crate::tools;
use crate::validator::parse_arguments;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Result of a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Whether the execution was successful.
    pub success: bool,
    /// The result content.
    pub content: Vec<ToolContent>,
    /// The result (or error envelope) as JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured: Option<Value>,
    /// Error message if failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionResult {
    /// Create a successful result with JSON content.
    pub fn success_json(value: Value) -> Self {
        Self {
            success: true,
            content: vec![ToolContent::Text {
                text: pretty(&value),
            }],
            structured: Some(value),
            error: None,
        }
    }

    /// Create an error result from an adapter failure.
    pub fn from_error(err: &AdapterError) -> Self {
        let mut envelope = json!({
            "error": err.to_string(),
            "error_kind": err.kind(),
        });
        if let Some(code) = err.code() {
            envelope["error_code"] = json!(code);
        }
        Self::failure(err.to_string(), envelope)
    }

    /// Create an error result with a plain message.
    pub fn error(kind: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let envelope = json!({
            "error": message,
            "error_kind": kind,
        });
        Self::failure(message, envelope)
    }

    fn failure(message: String, envelope: Value) -> Self {
        Self {
            success: false,
            content: vec![ToolContent::Text {
                text: pretty(&envelope),
            }],
            structured: Some(envelope),
            error: Some(message),
        }
    }

    /// Convert into the `tools/call` result body.
    pub fn into_response(self) -> CallToolResponse {
        CallToolResponse {
            content: self.content,
            structured_content: self.structured,
            is_error: !self.success,
        }
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// The tool executor dispatches tool calls to the adapter.
#[derive(Clone)]
pub struct ToolExecutor {
    adapter: CloudControlAdapter,
}

impl ToolExecutor {
    /// Create a new tool executor.
    pub fn new(adapter: CloudControlAdapter) -> Self {
        Self { adapter }
    }

    pub fn adapter(&self) -> &CloudControlAdapter {
        &self.adapter
    }

    /// Execute a tool by name.
    pub async fn execute(&self, tool: &str, arguments: Value) -> ExecutionResult {
        tracing::debug!(tool = %tool, "Executing tool");

        let outcome = self.dispatch(tool, arguments).await;

        match outcome {
            Some(Ok(value)) => ExecutionResult::success_json(value),
            Some(Err(err)) => {
                if err.is_input_error() {
                    tracing::info!(tool = %tool, kind = err.kind(), error = %err, "Rejected tool call");
                } else {
                    tracing::warn!(tool = %tool, kind = err.kind(), error = %err, "Tool call failed");
                }
                ExecutionResult::from_error(&err)
            }
            None => ExecutionResult::error("unknown-tool", format!("Unknown tool: {}", tool)),
        }
    }

    async fn dispatch(&self, tool: &str, arguments: Value) -> Option<Result<Value, AdapterError>> {
        let adapter = &self.adapter;

        let result = match tool {
            tools::CREATE_RESOURCE => match parse_arguments(tool, arguments) {
                Ok(request) => to_json(adapter.create_resource(request).await),
                Err(e) => Err(e.into()),
            },
            tools::GET_RESOURCE => match parse_arguments(tool, arguments) {
                Ok(request) => to_json(adapter.get_resource(request).await),
                Err(e) => Err(e.into()),
            },
            tools::UPDATE_RESOURCE => match parse_arguments(tool, arguments) {
                Ok(request) => to_json(adapter.update_resource(request).await),
                Err(e) => Err(e.into()),
            },
            tools::DELETE_RESOURCE => match parse_arguments(tool, arguments) {
                Ok(request) => to_json(adapter.delete_resource(request).await),
                Err(e) => Err(e.into()),
            },
            tools::LIST_RESOURCES => match parse_arguments(tool, arguments) {
                Ok(request) => to_json(adapter.list_resources(request).await),
                Err(e) => Err(e.into()),
            },
            tools::GET_RESOURCE_REQUEST_STATUS => match parse_arguments(tool, arguments) {
                Ok(request) => to_json(adapter.get_resource_request_status(request).await),
                Err(e) => Err(e.into()),
            },
            tools::CANCEL_RESOURCE_REQUEST => match parse_arguments(tool, arguments) {
                Ok(request) => to_json(adapter.cancel_resource_request(request).await),
                Err(e) => Err(e.into()),
            },
            tools::LIST_RESOURCE_REQUESTS => match parse_arguments(tool, arguments) {
                Ok(request) => to_json(adapter.list_resource_requests(request).await),
                Err(e) => Err(e.into()),
            },
            tools::LIST_RESOURCE_TYPES => match parse_arguments(tool, arguments) {
                Ok(request) => to_json(adapter.list_resource_types(request).await),
                Err(e) => Err(e.into()),
            },
            _ => return None,
        };

        Some(result)
    }
}

fn to_json<T: Serialize>(result: Result<T, AdapterError>) -> Result<Value, AdapterError> {
    let value = result?;
    serde_json::to_value(value).map_err(|e| AdapterError::InvalidResponse {
        context: "Error encoding result".to_string(),
        reason: e.to_string(),
    })
}
