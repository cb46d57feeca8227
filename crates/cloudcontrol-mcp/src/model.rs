//! Records returned to the caller.
//!
//! These are the lightly reshaped forms of the provider outputs: statuses
//! become typed enums and property documents become JSON values.

use crate::provider::{ProgressEvent, TypeSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status of an asynchronous resource operation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OperationStatus {
    Pending,
    InProgress,
    Success,
    Failed,
    Canceled,
}

impl OperationStatus {
    /// Map a provider status string.
    ///
    /// `CANCEL_IN_PROGRESS` is still in flight, so it maps to `InProgress`.
    pub fn from_provider(status: &str) -> Option<Self> {
        match status {
            "PENDING" => Some(OperationStatus::Pending),
            "IN_PROGRESS" | "CANCEL_IN_PROGRESS" => Some(OperationStatus::InProgress),
            "SUCCESS" => Some(OperationStatus::Success),
            "FAILED" => Some(OperationStatus::Failed),
            "CANCEL_COMPLETE" => Some(OperationStatus::Canceled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationStatus::Pending => "pending",
            OperationStatus::InProgress => "in-progress",
            OperationStatus::Success => "success",
            OperationStatus::Failed => "failed",
            OperationStatus::Canceled => "canceled",
        }
    }
}

/// Kind of resource operation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn from_provider(operation: &str) -> Option<Self> {
        match operation {
            "CREATE" => Some(Operation::Create),
            "UPDATE" => Some(Operation::Update),
            "DELETE" => Some(Operation::Delete),
            _ => None,
        }
    }
}

/// Progress of an asynchronous operation, as surfaced to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgressRecord {
    pub request_token: Option<String>,
    pub operation: Option<Operation>,
    pub operation_status: Option<OperationStatus>,
    pub type_name: Option<String>,
    /// Primary identifier, once the provider knows it.
    pub identifier: Option<String>,
    pub status_message: Option<String>,
    /// Handler error code, on failure.
    pub error_code: Option<String>,
    pub event_time: Option<DateTime<Utc>>,
    /// Earliest time the caller should poll again.
    pub retry_after: Option<DateTime<Utc>>,
}

impl From<ProgressEvent> for ProgressRecord {
    fn from(event: ProgressEvent) -> Self {
        Self {
            operation: event.operation.as_deref().and_then(Operation::from_provider),
            operation_status: event
                .operation_status
                .as_deref()
                .and_then(OperationStatus::from_provider),
            request_token: event.request_token,
            type_name: event.type_name,
            identifier: event.identifier,
            status_message: event.status_message,
            error_code: event.error_code,
            event_time: event.event_time,
            retry_after: event.retry_after,
        }
    }
}

/// A resource's identifier and current properties.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceRecord {
    pub identifier: Option<String>,
    pub properties: Value,
}

/// Result of `get_resource`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceResult {
    pub type_name: Option<String>,
    #[serde(flatten)]
    pub resource: ResourceRecord,
}

/// One page of `list_resources`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourcePage {
    pub type_name: Option<String>,
    pub resources: Vec<ResourceRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

/// One page of `list_resource_requests`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestPage {
    pub requests: Vec<ProgressRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

/// A registered resource type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceType {
    pub type_name: Option<String>,
    pub type_arn: Option<String>,
    pub description: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
    pub default_version_id: Option<String>,
    pub publisher_id: Option<String>,
    pub publisher_name: Option<String>,
    pub publisher_identity: Option<String>,
    pub is_activated: Option<bool>,
    pub original_type_name: Option<String>,
    pub latest_public_version: Option<String>,
    pub public_version_number: Option<String>,
    pub registry_type: Option<String>,
}

impl From<TypeSummary> for ResourceType {
    fn from(summary: TypeSummary) -> Self {
        Self {
            type_name: summary.type_name,
            type_arn: summary.type_arn,
            description: summary.description,
            last_updated: summary.last_updated,
            default_version_id: summary.default_version_id,
            publisher_id: summary.publisher_id,
            publisher_name: summary.publisher_name,
            publisher_identity: summary.publisher_identity,
            is_activated: summary.is_activated,
            original_type_name: summary.original_type_name,
            latest_public_version: summary.latest_public_version,
            public_version_number: summary.public_version_number,
            registry_type: summary.registry_type,
        }
    }
}

/// One page of `list_resource_types`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypePage {
    pub types: Vec<ResourceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}
