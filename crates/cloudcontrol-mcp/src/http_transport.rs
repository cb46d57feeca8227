//! HTTP transport for MCP server.
//!
//! JSON-RPC over `POST /mcp`, plus `GET /health`. Requests are forwarded to
//! the server task over a channel, each with its own reply channel.

use crate::error::McpError;
use crate::protocol::{JsonRpcRequest, JsonRpcResponse, error_codes, parse_message};
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;

/// Request plus the channel its response goes back on.
pub type RequestEnvelope = (JsonRpcRequest, mpsc::Sender<JsonRpcResponse>);

/// HTTP transport handler state.
pub struct HttpTransportState {
    /// Channel for sending requests to the MCP server.
    request_tx: mpsc::Sender<RequestEnvelope>,
}

impl HttpTransportState {
    /// Create a new HTTP transport state.
    pub fn new(request_tx: mpsc::Sender<RequestEnvelope>) -> Self {
        Self { request_tx }
    }
}

/// Create the HTTP router for MCP.
pub fn create_router(state: Arc<HttpTransportState>) -> Router {
    Router::new()
        .route("/mcp", post(handle_mcp_post))
        .route("/health", get(handle_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handle POST requests to /mcp (JSON-RPC over HTTP).
///
/// Undecodable bodies get a JSON-RPC error, the same as on stdio.
async fn handle_mcp_post(State(state): State<Arc<HttpTransportState>>, body: Bytes) -> Response {
    let request = match parse_message(&body) {
        Ok(request) => request,
        Err(response) => return (StatusCode::BAD_REQUEST, Json(response)).into_response(),
    };
    let notification = request.is_notification();
    let (response_tx, mut response_rx) = mpsc::channel(1);

    // Send request to MCP server
    if state.request_tx.send((request, response_tx)).await.is_err() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(JsonRpcResponse::error(
                None,
                error_codes::INTERNAL_ERROR,
                "MCP server unavailable",
            )),
        )
            .into_response();
    }

    // Wait for response
    match response_rx.recv().await {
        Some(_) if notification => StatusCode::ACCEPTED.into_response(),
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(JsonRpcResponse::error(
                None,
                error_codes::INTERNAL_ERROR,
                "No response from MCP server",
            )),
        )
            .into_response(),
    }
}

/// Handle health check requests.
async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "cloudcontrol-mcp",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// HTTP server for MCP transport.
pub struct HttpServer {
    bind_address: String,
    state: Arc<HttpTransportState>,
}

impl HttpServer {
    /// Create a new HTTP server.
    pub fn new(bind_address: impl Into<String>, request_tx: mpsc::Sender<RequestEnvelope>) -> Self {
        Self {
            bind_address: bind_address.into(),
            state: Arc::new(HttpTransportState::new(request_tx)),
        }
    }

    /// Run the HTTP server until interrupted.
    pub async fn run(self) -> Result<(), McpError> {
        let app = create_router(self.state);

        let listener = tokio::net::TcpListener::bind(&self.bind_address)
            .await
            .map_err(|e| {
                McpError::StartupFailed(format!("Failed to bind to {}: {}", self.bind_address, e))
            })?;

        tracing::info!(address = %self.bind_address, "MCP HTTP server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| McpError::TransportError(e.to_string()))?;

        tracing::info!("MCP HTTP server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
