//! # cloudcontrol-mcp
//!
//! MCP (Model Context Protocol) server exposing the AWS CloudControl API as
//! tools for AI agents.
//!
//! Nine tools cover the resource lifecycle and request tracking:
//!
//! | Tool | Provider call |
//! |------|---------------|
//! | `create_resource` | CloudControl `CreateResource` |
//! | `get_resource` | CloudControl `GetResource` |
//! | `update_resource` | CloudControl `UpdateResource` |
//! | `delete_resource` | CloudControl `DeleteResource` |
//! | `list_resources` | CloudControl `ListResources` |
//! | `get_resource_request_status` | CloudControl `GetResourceRequestStatus` |
//! | `cancel_resource_request` | CloudControl `CancelResourceRequest` |
//! | `list_resource_requests` | CloudControl `ListResourceRequests` |
//! | `list_resource_types` | CloudFormation `ListTypes` |
//!
//! ## Architecture
//!
//! ```text
//! AI Agent
//!       │
//!       │ MCP protocol (stdio or HTTP)
//!       ▼
//! ┌──────────────────────┐
//! │  McpServer           │
//! │  1. JSON-RPC dispatch│
//! │  2. ToolExecutor     │
//! │  3. Validate args    │  ← validator
//! │  4. One provider call│  ← CloudControlApi
//! │  5. Reshape / errors │
//! └──────────┬───────────┘
//!            │
//!            ▼
//!   AWS CloudControl / CloudFormation
//! ```
//!
//! ## Example Usage
//!
//! ```ignore
//! use cloudcontrol_core::AppConfig;
//! use cloudcontrol_mcp::{AwsCloudControl, CloudControlAdapter, McpServer};
//! use std::sync::Arc;
//!
//! let config = AppConfig::load(None)?;
//! let provider = AwsCloudControl::from_config(&config.aws).await;
//!
//! let server = McpServer::new(config.mcp.clone())
//!     .with_adapter(CloudControlAdapter::new(Arc::new(provider)));
//!
//! server.run().await?;
//! ```

pub mod adapter;
pub mod aws;
pub mod error;
pub mod executor;
pub mod http_transport;
pub mod model;
pub mod protocol;
pub mod provider;
pub mod request;
pub mod server;
pub mod tools;
pub mod validator;

// Re-export main types
pub use adapter::CloudControlAdapter;
pub use aws::AwsCloudControl;
pub use error::{AdapterError, McpError};
pub use executor::{ExecutionResult, ToolExecutor};
pub use model::{
    Operation, OperationStatus, ProgressRecord, RequestPage, ResourcePage, ResourceRecord,
    ResourceResult, ResourceType, TypePage,
};
pub use protocol::{
    CallToolParams, CallToolResponse, JsonRpcRequest, JsonRpcResponse, ToolAnnotations,
    ToolContent, ToolDefinition,
};
pub use provider::{CloudControlApi, ProviderError, ProviderErrorKind};
pub use server::McpServer;
pub use tools::ToolRegistry;
pub use validator::{ValidationError, ValidationErrorKind};
