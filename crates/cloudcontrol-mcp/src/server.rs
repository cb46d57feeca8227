//! MCP server implementation.
//!
//! This module provides the JSON-RPC front of the server: method dispatch,
//! tool discovery, tool calls and the two transports.

use crate::adapter::CloudControlAdapter;
use crate::error::McpError;
use crate::executor::ToolExecutor;
use crate::http_transport::HttpServer;
use crate::protocol::*;
use crate::tools::ToolRegistry;
use cloudcontrol_core::config::{McpConfig, Transport};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

const SERVER_NAME: &str = "cloudcontrol-mcp";

const INSTRUCTIONS: &str = "\
Manage AWS resources through the CloudControl API.

Resource types are named like AWS::Logs::LogGroup; use list_resource_types to discover them.
create_resource, update_resource and delete_resource are asynchronous: each returns a progress \
record with a request_token. Poll get_resource_request_status with that token until \
operation_status is success, failed or canceled.
update_resource takes an RFC 6902 JSON Patch document.
List operations are paginated: pass the returned next_token to get the next page.
Supplying client_token makes a mutation idempotent.";

/// The MCP server.
#[derive(Clone)]
pub struct McpServer {
    config: McpConfig,
    tools: ToolRegistry,
    executor: ToolExecutor,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    ///
    /// Until an adapter is attached with [`McpServer::with_adapter`] every
    /// tool call fails with "client not initialized".
    pub fn new(config: McpConfig) -> Self {
        Self {
            config,
            tools: ToolRegistry::with_catalog(),
            executor: ToolExecutor::new(CloudControlAdapter::unavailable()),
        }
    }

    /// Attach the adapter used to run tools.
    pub fn with_adapter(mut self, adapter: CloudControlAdapter) -> Self {
        self.executor = ToolExecutor::new(adapter);
        self
    }

    /// Get a reference to the tool registry.
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Start the MCP server.
    pub async fn run(&self) -> Result<(), McpError> {
        match self.config.transport {
            Transport::Stdio => self.run_stdio().await,
            Transport::Http => self.run_http().await,
        }
    }

    /// Run the server with stdio transport.
    ///
    /// One JSON-RPC message per line. A line that does not parse gets a
    /// parse error response and the loop carries on.
    async fn run_stdio(&self) -> Result<(), McpError> {
        tracing::info!(
            tools = self.tools.len(),
            client = self.executor.adapter().is_available(),
            "Starting MCP server with stdio transport"
        );

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let response = match parse_message(line.as_bytes()) {
                Ok(request) => {
                    let notification = request.is_notification();
                    let response = self.handle_request(request).await;
                    if notification {
                        continue;
                    }
                    response
                }
                Err(response) => {
                    tracing::warn!(
                        code = response.error.as_ref().map(|e| e.code),
                        "Rejected JSON-RPC message"
                    );
                    response
                }
            };

            let mut payload = serde_json::to_vec(&response)?;
            payload.push(b'\n');
            stdout.write_all(&payload).await?;
            stdout.flush().await?;
        }

        tracing::info!("stdin closed, stopping MCP server");
        Ok(())
    }

    /// Run the server with HTTP transport.
    pub async fn run_http(&self) -> Result<(), McpError> {
        let bind_address = self.config.bind_address();
        tracing::info!(
            address = %bind_address,
            tools = self.tools.len(),
            client = self.executor.adapter().is_available(),
            "Starting MCP server with HTTP transport"
        );

        // Create channel for request handling
        let (request_tx, mut request_rx) =
            mpsc::channel::<(JsonRpcRequest, mpsc::Sender<JsonRpcResponse>)>(100);

        let server = Arc::new(self.clone());

        // Each request gets its own task so slow provider calls do not queue up
        tokio::spawn(async move {
            while let Some((request, response_tx)) = request_rx.recv().await {
                let server = Arc::clone(&server);
                tokio::spawn(async move {
                    let response = server.handle_request(request).await;
                    let _ = response_tx.send(response).await;
                });
            }
        });

        let http_server = HttpServer::new(bind_address, request_tx);
        http_server.run().await
    }

    /// Handle a JSON-RPC request.
    ///
    /// Notifications are handled like requests; the transports drop the
    /// response.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();

        match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "initialized" | "notifications/initialized" => JsonRpcResponse::success(id, json!({})),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_list_tools(id),
            "tools/call" => self.handle_call_tool(id, request.params).await,
            "shutdown" => self.handle_shutdown(id),
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        }
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            },
            "capabilities": {
                "tools": {
                    "listChanged": false
                }
            },
            "instructions": INSTRUCTIONS
        });
        JsonRpcResponse::success(id, result)
    }

    fn handle_list_tools(&self, id: Option<Value>) -> JsonRpcResponse {
        let response = ListToolsResponse {
            tools: self.tools.list().into_iter().cloned().collect(),
        };

        match serde_json::to_value(response) {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, e.to_string()),
        }
    }

    async fn handle_call_tool(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: CallToolParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        error_codes::INVALID_PARAMS,
                        format!("Invalid params: {}", e),
                    );
                }
            },
            None => return JsonRpcResponse::error(id, error_codes::INVALID_PARAMS, "Missing params"),
        };

        if !self.tools.contains(&params.name) {
            return JsonRpcResponse::error(
                id,
                error_codes::INVALID_PARAMS,
                format!("Tool not found: {}", params.name),
            );
        }

        let result = self
            .executor
            .execute(&params.name, params.arguments)
            .await
            .into_response();

        match serde_json::to_value(result) {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, e.to_string()),
        }
    }

    fn handle_shutdown(&self, id: Option<Value>) -> JsonRpcResponse {
        tracing::info!("MCP server shutdown requested");
        JsonRpcResponse::success(id, json!(null))
    }
}
