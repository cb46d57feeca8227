//! Provider seam.
//!
//! [`CloudControlApi`] is the single boundary between the tool adapter and
//! the cloud control plane. Inputs are provider-ready (already validated,
//! documents serialized to strings) and outputs are provider-shaped (raw
//! status strings, raw property documents). Reshaping happens in the adapter
//! so that it can be exercised against any implementation of this trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

// =============================================================================
// INPUTS
// =============================================================================

/// Input of `CreateResource`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateResourceInput {
    pub type_name: String,
    /// Desired state serialized as a JSON object string.
    pub desired_state: String,
    pub role_arn: Option<String>,
    pub client_token: Option<String>,
}

/// Input of `GetResource`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetResourceInput {
    pub type_name: String,
    pub identifier: String,
    pub role_arn: Option<String>,
}

/// Input of `UpdateResource`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateResourceInput {
    pub type_name: String,
    pub identifier: String,
    /// RFC 6902 patch document serialized as a JSON array string.
    pub patch_document: String,
    pub role_arn: Option<String>,
    pub client_token: Option<String>,
}

/// Input of `DeleteResource`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResourceInput {
    pub type_name: String,
    pub identifier: String,
    pub role_arn: Option<String>,
    pub client_token: Option<String>,
}

/// Input of `ListResources`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListResourcesInput {
    pub type_name: String,
    /// Resource model serialized as a JSON object string.
    pub resource_model: Option<String>,
    pub role_arn: Option<String>,
    pub next_token: Option<String>,
}

/// Filter of `ListResourceRequests`, using provider enum spellings
/// (`CREATE`, `IN_PROGRESS`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestStatusFilter {
    pub operations: Vec<String>,
    pub operation_statuses: Vec<String>,
}

/// Input of `ListResourceRequests`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListResourceRequestsInput {
    pub filter: Option<RequestStatusFilter>,
    pub next_token: Option<String>,
}

/// Registry filters of `ListTypes`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeFilters {
    pub type_name_prefix: Option<String>,
    pub category: Option<String>,
    pub publisher_id: Option<String>,
}

/// Input of `ListTypes`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListResourceTypesInput {
    pub filters: Option<TypeFilters>,
    pub next_token: Option<String>,
}

// =============================================================================
// OUTPUTS
// =============================================================================

/// Progress of an asynchronous resource operation as reported by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressEvent {
    pub type_name: Option<String>,
    pub identifier: Option<String>,
    pub request_token: Option<String>,
    /// `CREATE`, `UPDATE` or `DELETE`.
    pub operation: Option<String>,
    /// `PENDING`, `IN_PROGRESS`, `SUCCESS`, `FAILED`, `CANCEL_IN_PROGRESS`
    /// or `CANCEL_COMPLETE`.
    pub operation_status: Option<String>,
    pub event_time: Option<DateTime<Utc>>,
    pub status_message: Option<String>,
    pub error_code: Option<String>,
    pub retry_after: Option<DateTime<Utc>>,
}

/// Identifier and raw property document of a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceDescription {
    pub identifier: Option<String>,
    /// Properties as a JSON object string.
    pub properties: Option<String>,
}

/// Output of `GetResource`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetResourceOutput {
    pub type_name: Option<String>,
    pub resource_description: Option<ResourceDescription>,
}

/// Output of `ListResources`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListResourcesOutput {
    pub type_name: Option<String>,
    pub resource_descriptions: Vec<ResourceDescription>,
    pub next_token: Option<String>,
}

/// Output of `ListResourceRequests`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListResourceRequestsOutput {
    pub summaries: Vec<ProgressEvent>,
    pub next_token: Option<String>,
}

/// Registry entry for a resource type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeSummary {
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

/// Output of `ListTypes`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListResourceTypesOutput {
    pub type_summaries: Vec<TypeSummary>,
    pub next_token: Option<String>,
}

// =============================================================================
// ERRORS
// =============================================================================

/// Failure reported by, or on the way to, the provider.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// Structured service error, passed through with its original code and message.
    #[error("AWS {service} API error: {code}: {message}")]
    Service {
        service: &'static str,
        code: String,
        message: String,
    },

    /// Network failure, timeout or other dispatch problem.
    #[error("AWS request failed: {0}")]
    Transport(String),
}

/// Classification of a [`ProviderError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    NotFound,
    AccessDenied,
    AlreadyExists,
    Conflict,
    NotCancelable,
    Throttled,
    Rejected,
    ServiceInternal,
    Transport,
    Other,
}

impl ProviderError {
    /// A CloudControl service error.
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        ProviderError::Service {
            service: "CloudControl",
            code: code.into(),
            message: message.into(),
        }
    }

    /// A transport-level failure.
    pub fn transport(message: impl Into<String>) -> Self {
        ProviderError::Transport(message.into())
    }

    /// The provider error code, if the service produced one.
    pub fn code(&self) -> Option<&str> {
        match self {
            ProviderError::Service { code, .. } => Some(code),
            ProviderError::Transport(_) => None,
        }
    }

    pub fn kind(&self) -> ProviderErrorKind {
        match self {
            ProviderError::Service { code, .. } => ProviderErrorKind::from_code(code),
            ProviderError::Transport(_) => ProviderErrorKind::Transport,
        }
    }
}

impl ProviderErrorKind {
    /// Classify a provider error code.
    pub fn from_code(code: &str) -> Self {
        match code {
            "ResourceNotFoundException"
            | "RequestTokenNotFoundException"
            | "TypeNotFoundException"
            | "TypeConfigurationNotFoundException" => ProviderErrorKind::NotFound,
            "AccessDeniedException"
            | "AccessDenied"
            | "UnauthorizedOperation"
            | "InvalidCredentialsException"
            | "ExpiredTokenException"
            | "UnrecognizedClientException"
            | "InvalidClientTokenId" => ProviderErrorKind::AccessDenied,
            "AlreadyExistsException" => ProviderErrorKind::AlreadyExists,
            "ResourceConflictException"
            | "ConcurrentOperationException"
            | "ClientTokenConflictException" => ProviderErrorKind::Conflict,
            // Only returned by CancelResourceRequest for requests past the cancelable stage.
            "ConcurrentModificationException" => ProviderErrorKind::NotCancelable,
            "ThrottlingException" | "Throttling" | "TooManyRequestsException"
            | "RequestLimitExceeded" => ProviderErrorKind::Throttled,
            "InvalidRequestException"
            | "ValidationException"
            | "UnsupportedActionException"
            | "NotUpdatableException"
            | "CFNRegistryException"
            | "PrivateTypeException"
            | "ServiceLimitExceededException" => ProviderErrorKind::Rejected,
            "ServiceInternalErrorException"
            | "GeneralServiceException"
            | "HandlerInternalFailureException"
            | "HandlerFailureException"
            | "NetworkFailureException"
            | "NotStabilizedException"
            | "InternalFailure"
            | "ServiceUnavailable" => ProviderErrorKind::ServiceInternal,
            _ => ProviderErrorKind::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderErrorKind::NotFound => "not-found",
            ProviderErrorKind::AccessDenied => "access-denied",
            ProviderErrorKind::AlreadyExists => "already-exists",
            ProviderErrorKind::Conflict => "conflict",
            ProviderErrorKind::NotCancelable => "not-cancelable",
            ProviderErrorKind::Throttled => "throttled",
            ProviderErrorKind::Rejected => "provider-rejected",
            ProviderErrorKind::ServiceInternal => "service-internal",
            ProviderErrorKind::Transport => "transport",
            ProviderErrorKind::Other => "provider-error",
        }
    }
}

// =============================================================================
// TRAIT
// =============================================================================

/// One method per provider call. Implementations must not retry on their
/// own beyond what the underlying client library does.
#[async_trait]
pub trait CloudControlApi: Send + Sync {
    async fn create_resource(
        &self,
        input: CreateResourceInput,
    ) -> Result<ProgressEvent, ProviderError>;

    async fn get_resource(&self, input: GetResourceInput)
        -> Result<GetResourceOutput, ProviderError>;

    async fn update_resource(
        &self,
        input: UpdateResourceInput,
    ) -> Result<ProgressEvent, ProviderError>;

    async fn delete_resource(
        &self,
        input: DeleteResourceInput,
    ) -> Result<ProgressEvent, ProviderError>;

    async fn list_resources(
        &self,
        input: ListResourcesInput,
    ) -> Result<ListResourcesOutput, ProviderError>;

    async fn get_resource_request_status(
        &self,
        request_token: String,
    ) -> Result<ProgressEvent, ProviderError>;

    async fn cancel_resource_request(
        &self,
        request_token: String,
    ) -> Result<ProgressEvent, ProviderError>;

    async fn list_resource_requests(
        &self,
        input: ListResourceRequestsInput,
    ) -> Result<ListResourceRequestsOutput, ProviderError>;

    async fn list_resource_types(
        &self,
        input: ListResourceTypesInput,
    ) -> Result<ListResourceTypesOutput, ProviderError>;
}
