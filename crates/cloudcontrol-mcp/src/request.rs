//! Per-operation tool arguments.
//!
//! Each tool deserializes its JSON arguments into one of these structures.
//! Every field is optional at this stage so that a missing required field
//! is reported by the validator with a descriptive message rather than as a
//! serde error. For the optional fields, absent means the provider default.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Arguments of `create_resource`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateResourceRequest {
    /// Resource type identifier, e.g. `AWS::Logs::LogGroup`. Required.
    pub type_name: Option<String>,
    /// Desired state as a JSON object, or a string holding one. Required.
    pub desired_state: Option<Value>,
    /// IAM role the provider assumes for this operation. Absent: the caller's credentials.
    pub role_arn: Option<String>,
    /// Idempotency key. Absent: the provider generates one.
    pub client_token: Option<String>,
}

/// Arguments of `get_resource`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetResourceRequest {
    /// Resource type identifier. Required.
    pub type_name: Option<String>,
    /// Primary identifier of the resource. Required.
    pub identifier: Option<String>,
    /// IAM role the provider assumes for this operation.
    pub role_arn: Option<String>,
}

/// Arguments of `update_resource`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateResourceRequest {
    /// Resource type identifier. Required.
    pub type_name: Option<String>,
    /// Primary identifier of the resource. Required.
    pub identifier: Option<String>,
    /// RFC 6902 patch document, as a JSON string or a JSON array. Required.
    pub patch_document: Option<Value>,
    /// IAM role the provider assumes for this operation.
    pub role_arn: Option<String>,
    /// Idempotency key.
    pub client_token: Option<String>,
}

/// Arguments of `delete_resource`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteResourceRequest {
    /// Resource type identifier. Required.
    pub type_name: Option<String>,
    /// Primary identifier of the resource. Required.
    pub identifier: Option<String>,
    /// IAM role the provider assumes for this operation.
    pub role_arn: Option<String>,
    /// Idempotency key.
    pub client_token: Option<String>,
}

/// Arguments of `list_resources`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListResourcesRequest {
    /// Resource type identifier. Required.
    pub type_name: Option<String>,
    /// Extra properties some resource types need in order to be listed
    /// (e.g. the parent resource). Absent: none.
    pub resource_model: Option<Value>,
    /// IAM role the provider assumes for this operation.
    pub role_arn: Option<String>,
    /// Pagination cursor from a previous page. Absent: first page.
    pub next_token: Option<String>,
}

/// Arguments of `get_resource_request_status`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestTokenRequest {
    /// Request token returned by a create, update or delete. Required.
    pub request_token: Option<String>,
}

/// Arguments of `list_resource_requests`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListResourceRequestsRequest {
    /// `{"Operations": [...], "OperationStatuses": [...]}`. Absent: every request.
    #[serde(alias = "status_filter")]
    pub resource_request_status_filter: Option<Value>,
    /// Pagination cursor from a previous page.
    pub next_token: Option<String>,
}

/// Arguments of `list_resource_types`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListResourceTypesRequest {
    /// `{"TypeNamePrefix": ..., "Category": ..., "PublisherId": ...}`. Absent: every type.
    pub filters: Option<Value>,
    /// Pagination cursor from a previous page.
    pub next_token: Option<String>,
}
