//! Request validation for tool calls.
//!
//! Converts the loosely typed tool arguments of [`crate::request`] into the
//! provider-ready inputs of [`crate::provider`]. Validation is limited to
//! well-formedness: required fields present, documents that parse as the
//! expected JSON shape, filters with known keys and values. Schema checks
//! against the resource type are left to the provider.
//!
//! All validation happens BEFORE any provider call is issued.

use crate::provider::{
    CreateResourceInput, DeleteResourceInput, GetResourceInput, ListResourceRequestsInput,
    ListResourceTypesInput, ListResourcesInput, RequestStatusFilter, TypeFilters,
    UpdateResourceInput,
};
use crate::request::{
    CreateResourceRequest, DeleteResourceRequest, GetResourceRequest, ListResourceRequestsRequest,
    ListResourceTypesRequest, ListResourcesRequest, RequestTokenRequest, UpdateResourceRequest,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;

// =============================================================================
// VALIDATION ERROR TYPES
// =============================================================================

/// Error type for validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The kind of validation error.
    pub kind: ValidationErrorKind,
    /// Human-readable error message.
    pub message: String,
}

/// Kinds of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A required field is absent, null or blank.
    MissingField,
    /// Arguments could not be decoded, or a field has the wrong shape.
    InvalidArgument,
    /// The patch document is not a JSON array of patch operations.
    MalformedPatch,
    /// A filter object has unknown keys or values.
    MalformedFilter,
}

impl ValidationErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationErrorKind::MissingField => "missing-field",
            ValidationErrorKind::InvalidArgument => "invalid-argument",
            ValidationErrorKind::MalformedPatch => "malformed-patch",
            ValidationErrorKind::MalformedFilter => "malformed-filter",
        }
    }
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Create a missing field error.
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ValidationErrorKind::MissingField,
            format!("Missing required field '{}'", field),
        )
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(field: &str, reason: impl fmt::Display) -> Self {
        Self::new(
            ValidationErrorKind::InvalidArgument,
            format!("Invalid value for '{}': {}", field, reason),
        )
    }

    /// Create a malformed patch error.
    pub fn malformed_patch(reason: impl fmt::Display) -> Self {
        Self::new(
            ValidationErrorKind::MalformedPatch,
            format!("Malformed patch document: {}", reason),
        )
    }

    /// Create a malformed filter error.
    pub fn malformed_filter(field: &str, reason: impl fmt::Display) -> Self {
        Self::new(
            ValidationErrorKind::MalformedFilter,
            format!("Malformed filter '{}': {}", field, reason),
        )
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

// =============================================================================
// ARGUMENT DECODING
// =============================================================================

/// Decode the JSON arguments of `tool` into its request structure.
///
/// A missing (`null`) argument object is treated as empty, so that the
/// missing-field checks produce the error instead.
pub fn parse_arguments<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T, ValidationError> {
    let arguments = match arguments {
        Value::Null => Value::Object(Map::new()),
        Value::Object(map) => Value::Object(map),
        other => {
            return Err(ValidationError::new(
                ValidationErrorKind::InvalidArgument,
                format!(
                    "Invalid arguments for tool {}: expected an object, got {}",
                    tool,
                    type_name(&other)
                ),
            ));
        }
    };

    serde_json::from_value(arguments).map_err(|e| {
        ValidationError::new(
            ValidationErrorKind::InvalidArgument,
            format!("Invalid arguments for tool {}: {}", tool, e),
        )
    })
}

// =============================================================================
// PER-OPERATION VALIDATION
// =============================================================================

pub fn validate_create(request: CreateResourceRequest) -> Result<CreateResourceInput, ValidationError> {
    Ok(CreateResourceInput {
        type_name: required("type_name", request.type_name)?,
        desired_state: desired_state_document(request.desired_state)?,
        role_arn: optional(request.role_arn),
        client_token: optional(request.client_token),
    })
}

pub fn validate_get(request: GetResourceRequest) -> Result<GetResourceInput, ValidationError> {
    Ok(GetResourceInput {
        type_name: required("type_name", request.type_name)?,
        identifier: required("identifier", request.identifier)?,
        role_arn: optional(request.role_arn),
    })
}

pub fn validate_update(request: UpdateResourceRequest) -> Result<UpdateResourceInput, ValidationError> {
    Ok(UpdateResourceInput {
        type_name: required("type_name", request.type_name)?,
        identifier: required("identifier", request.identifier)?,
        patch_document: patch_document(request.patch_document)?,
        role_arn: optional(request.role_arn),
        client_token: optional(request.client_token),
    })
}

pub fn validate_delete(request: DeleteResourceRequest) -> Result<DeleteResourceInput, ValidationError> {
    Ok(DeleteResourceInput {
        type_name: required("type_name", request.type_name)?,
        identifier: required("identifier", request.identifier)?,
        role_arn: optional(request.role_arn),
        client_token: optional(request.client_token),
    })
}

pub fn validate_list_resources(
    request: ListResourcesRequest,
) -> Result<ListResourcesInput, ValidationError> {
    Ok(ListResourcesInput {
        type_name: required("type_name", request.type_name)?,
        resource_model: resource_model(request.resource_model)?,
        role_arn: optional(request.role_arn),
        next_token: optional(request.next_token),
    })
}

pub fn validate_request_token(request: RequestTokenRequest) -> Result<String, ValidationError> {
    required("request_token", request.request_token)
}

pub fn validate_list_requests(
    request: ListResourceRequestsRequest,
) -> Result<ListResourceRequestsInput, ValidationError> {
    Ok(ListResourceRequestsInput {
        filter: request_status_filter(request.resource_request_status_filter)?,
        next_token: optional(request.next_token),
    })
}

pub fn validate_list_types(
    request: ListResourceTypesRequest,
) -> Result<ListResourceTypesInput, ValidationError> {
    Ok(ListResourceTypesInput {
        filters: type_filters(request.filters)?,
        next_token: optional(request.next_token),
    })
}

// =============================================================================
// FIELD HELPERS
// =============================================================================

/// A required string field. Blank counts as missing; the value itself is
/// forwarded untouched.
fn required(field: &str, value: Option<String>) -> Result<String, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::missing_field(field)),
    }
}

/// An optional string field. Blank counts as absent.
fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Desired state: a JSON object, or a string that parses to one.
fn desired_state_document(value: Option<Value>) -> Result<String, ValidationError> {
    match value {
        None | Some(Value::Null) => Err(ValidationError::missing_field("desired_state")),
        Some(Value::Object(map)) => {
            serde_json::to_string(&map).map_err(|e| ValidationError::invalid_argument("desired_state", e))
        }
        Some(Value::String(text)) => {
            if text.trim().is_empty() {
                return Err(ValidationError::missing_field("desired_state"));
            }
            match serde_json::from_str::<Value>(&text) {
                Ok(Value::Object(_)) => Ok(text),
                Ok(other) => Err(ValidationError::invalid_argument(
                    "desired_state",
                    format!("expected a JSON object, got {}", type_name(&other)),
                )),
                Err(e) => Err(ValidationError::invalid_argument(
                    "desired_state",
                    format!("not valid JSON: {}", e),
                )),
            }
        }
        Some(other) => Err(ValidationError::invalid_argument(
            "desired_state",
            format!("expected a JSON object, got {}", type_name(&other)),
        )),
    }
}

const PATCH_OPS: [&str; 6] = ["add", "remove", "replace", "move", "copy", "test"];

/// Patch document: a JSON string or an array of RFC 6902 operations.
///
/// A string input is forwarded byte-for-byte once it has been checked.
fn patch_document(value: Option<Value>) -> Result<String, ValidationError> {
    match value {
        None | Some(Value::Null) => Err(ValidationError::missing_field("patch_document")),
        Some(Value::String(text)) => {
            if text.trim().is_empty() {
                return Err(ValidationError::missing_field("patch_document"));
            }
            let parsed: Value = serde_json::from_str(&text)
                .map_err(|e| ValidationError::malformed_patch(format!("not valid JSON: {}", e)))?;
            check_patch_operations(&parsed)?;
            Ok(text)
        }
        Some(value @ Value::Array(_)) => {
            check_patch_operations(&value)?;
            serde_json::to_string(&value).map_err(ValidationError::malformed_patch)
        }
        Some(other) => Err(ValidationError::malformed_patch(format!(
            "expected a JSON array, got {}",
            type_name(&other)
        ))),
    }
}

fn check_patch_operations(document: &Value) -> Result<(), ValidationError> {
    let operations = document.as_array().ok_or_else(|| {
        ValidationError::malformed_patch(format!(
            "expected a JSON array, got {}",
            type_name(document)
        ))
    })?;

    if operations.is_empty() {
        return Err(ValidationError::malformed_patch(
            "must contain at least one operation",
        ));
    }

    for (index, operation) in operations.iter().enumerate() {
        let object = operation.as_object().ok_or_else(|| {
            ValidationError::malformed_patch(format!("operation {} is not an object", index))
        })?;

        let op = object.get("op").and_then(Value::as_str).ok_or_else(|| {
            ValidationError::malformed_patch(format!("operation {} has no string 'op'", index))
        })?;
        if !PATCH_OPS.contains(&op) {
            return Err(ValidationError::malformed_patch(format!(
                "operation {} has unsupported op '{}'",
                index, op
            )));
        }

        let path = object.get("path").and_then(Value::as_str).ok_or_else(|| {
            ValidationError::malformed_patch(format!("operation {} has no string 'path'", index))
        })?;
        if !is_json_pointer(path) {
            return Err(ValidationError::malformed_patch(format!(
                "operation {} path '{}' is not a JSON pointer",
                index, path
            )));
        }

        match op {
            "add" | "replace" | "test" if !object.contains_key("value") => {
                return Err(ValidationError::malformed_patch(format!(
                    "operation {} ('{}') requires 'value'",
                    index, op
                )));
            }
            "move" | "copy" => {
                let from = object.get("from").and_then(Value::as_str);
                if !from.is_some_and(is_json_pointer) {
                    return Err(ValidationError::malformed_patch(format!(
                        "operation {} ('{}') requires a JSON pointer 'from'",
                        index, op
                    )));
                }
            }
            _ => {}
        }
    }

    Ok(())
}

fn is_json_pointer(path: &str) -> bool {
    path.is_empty() || path.starts_with('/')
}

/// Resource model: a JSON object or a string holding one. An empty object
/// counts as absent.
fn resource_model(value: Option<Value>) -> Result<Option<String>, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) if map.is_empty() => Ok(None),
        Some(Value::Object(map)) => serde_json::to_string(&map)
            .map(Some)
            .map_err(|e| ValidationError::invalid_argument("resource_model", e)),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(Value::String(text)) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(_)) => Ok(Some(text)),
            Ok(other) => Err(ValidationError::invalid_argument(
                "resource_model",
                format!("expected a JSON object, got {}", type_name(&other)),
            )),
            Err(e) => Err(ValidationError::invalid_argument(
                "resource_model",
                format!("not valid JSON: {}", e),
            )),
        },
        Some(other) => Err(ValidationError::invalid_argument(
            "resource_model",
            format!("expected a JSON object, got {}", type_name(&other)),
        )),
    }
}

const OPERATIONS: [&str; 3] = ["CREATE", "UPDATE", "DELETE"];
const OPERATION_STATUSES: [&str; 6] = [
    "PENDING",
    "IN_PROGRESS",
    "SUCCESS",
    "FAILED",
    "CANCEL_IN_PROGRESS",
    "CANCEL_COMPLETE",
];

/// `{"Operations": [...], "OperationStatuses": [...]}`. Values are matched
/// case-insensitively and with `-` accepted for `_`.
fn request_status_filter(
    value: Option<Value>,
) -> Result<Option<RequestStatusFilter>, ValidationError> {
    const FIELD: &str = "resource_request_status_filter";

    let map = match filter_object(FIELD, value)? {
        Some(map) => map,
        None => return Ok(None),
    };

    let mut filter = RequestStatusFilter::default();
    for (key, entry) in map {
        match key.as_str() {
            "Operations" | "operations" => {
                filter.operations = enum_list(FIELD, &key, &entry, &OPERATIONS)?;
            }
            "OperationStatuses" | "operation_statuses" => {
                filter.operation_statuses = enum_list(FIELD, &key, &entry, &OPERATION_STATUSES)?;
            }
            other => {
                return Err(ValidationError::malformed_filter(
                    FIELD,
                    format!(
                        "unknown key '{}' (expected 'Operations' or 'OperationStatuses')",
                        other
                    ),
                ));
            }
        }
    }

    if filter.operations.is_empty() && filter.operation_statuses.is_empty() {
        return Ok(None);
    }
    Ok(Some(filter))
}

const CATEGORIES: [&str; 4] = ["REGISTERED", "ACTIVATED", "THIRD_PARTY", "AWS_TYPES"];

/// `{"TypeNamePrefix": ..., "Category": ..., "PublisherId": ...}`.
fn type_filters(value: Option<Value>) -> Result<Option<TypeFilters>, ValidationError> {
    const FIELD: &str = "filters";

    let map = match filter_object(FIELD, value)? {
        Some(map) => map,
        None => return Ok(None),
    };

    let mut filters = TypeFilters::default();
    for (key, entry) in map {
        let text = entry.as_str().ok_or_else(|| {
            ValidationError::malformed_filter(
                FIELD,
                format!("'{}' must be a string, got {}", key, type_name(&entry)),
            )
        })?;
        match key.as_str() {
            "TypeNamePrefix" | "type_name_prefix" => {
                filters.type_name_prefix = Some(text.to_string());
            }
            "PublisherId" | "publisher_id" => {
                filters.publisher_id = Some(text.to_string());
            }
            "Category" | "category" => {
                let category = normalize_enum(text);
                if !CATEGORIES.contains(&category.as_str()) {
                    return Err(ValidationError::malformed_filter(
                        FIELD,
                        format!(
                            "unknown Category '{}' (expected one of {})",
                            text,
                            CATEGORIES.join(", ")
                        ),
                    ));
                }
                filters.category = Some(category);
            }
            other => {
                return Err(ValidationError::malformed_filter(
                    FIELD,
                    format!(
                        "unknown key '{}' (expected 'TypeNamePrefix', 'Category' or 'PublisherId')",
                        other
                    ),
                ));
            }
        }
    }

    if filters == TypeFilters::default() {
        return Ok(None);
    }
    Ok(Some(filters))
}

/// Accept a filter given as an object or as a string holding one.
fn filter_object(
    field: &str,
    value: Option<Value>,
) -> Result<Option<Map<String, Value>>, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(Value::String(text)) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => Ok(Some(map)),
            Ok(other) => Err(ValidationError::malformed_filter(
                field,
                format!("expected a JSON object, got {}", type_name(&other)),
            )),
            Err(e) => Err(ValidationError::malformed_filter(
                field,
                format!("not valid JSON: {}", e),
            )),
        },
        Some(other) => Err(ValidationError::malformed_filter(
            field,
            format!("expected a JSON object, got {}", type_name(&other)),
        )),
    }
}

fn enum_list(
    field: &str,
    key: &str,
    value: &Value,
    allowed: &[&str],
) -> Result<Vec<String>, ValidationError> {
    let items = value.as_array().ok_or_else(|| {
        ValidationError::malformed_filter(
            field,
            format!("'{}' must be an array, got {}", key, type_name(value)),
        )
    })?;

    items
        .iter()
        .map(|item| {
            let text = item.as_str().ok_or_else(|| {
                ValidationError::malformed_filter(
                    field,
                    format!("'{}' entries must be strings", key),
                )
            })?;
            let normalized = normalize_enum(text);
            if allowed.contains(&normalized.as_str()) {
                Ok(normalized)
            } else {
                Err(ValidationError::malformed_filter(
                    field,
                    format!(
                        "unknown {} value '{}' (expected one of {})",
                        key,
                        text,
                        allowed.join(", ")
                    ),
                ))
            }
        })
        .collect()
}

fn normalize_enum(text: &str) -> String {
    text.trim().to_ascii_uppercase().replace('-', "_")
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
