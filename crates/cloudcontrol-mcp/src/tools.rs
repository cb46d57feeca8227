//! Tool registry and the CloudControl tool catalog.
//!
//! [`catalog`] describes the nine tools this server exposes. Input schemas
//! are written by hand and mirror the request structures in
//! [`crate::request`]; the validator remains the authority on what is
//! accepted.

use crate::protocol::{ToolAnnotations, ToolDefinition};
use serde_json::{Value, json};
use std::collections::HashMap;

/// Registry of available MCP tools.
#[derive(Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, ToolDefinition>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    /// Create a new empty tool registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// A registry holding every tool of [`catalog`].
    pub fn with_catalog() -> Self {
        let mut registry = Self::new();
        for tool in catalog() {
            registry.register(tool);
        }
        registry
    }

    /// Register a tool.
    pub fn register(&mut self, tool: ToolDefinition) {
        self.tools.insert(tool.name.clone(), tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    /// Check if a tool exists.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// List all tools, ordered by name.
    pub fn list(&self) -> Vec<&ToolDefinition> {
        let mut tools: Vec<_> = self.tools.values().collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    /// Get the number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

// =============================================================================
// CATALOG
// =============================================================================

pub const CREATE_RESOURCE: &str = "create_resource";
pub const GET_RESOURCE: &str = "get_resource";
pub const UPDATE_RESOURCE: &str = "update_resource";
pub const DELETE_RESOURCE: &str = "delete_resource";
pub const LIST_RESOURCES: &str = "list_resources";
pub const GET_RESOURCE_REQUEST_STATUS: &str = "get_resource_request_status";
pub const CANCEL_RESOURCE_REQUEST: &str = "cancel_resource_request";
pub const LIST_RESOURCE_REQUESTS: &str = "list_resource_requests";
pub const LIST_RESOURCE_TYPES: &str = "list_resource_types";

/// Every tool name, in catalog order.
pub const TOOL_NAMES: [&str; 9] = [
    CREATE_RESOURCE,
    GET_RESOURCE,
    UPDATE_RESOURCE,
    DELETE_RESOURCE,
    LIST_RESOURCES,
    GET_RESOURCE_REQUEST_STATUS,
    CANCEL_RESOURCE_REQUEST,
    LIST_RESOURCE_REQUESTS,
    LIST_RESOURCE_TYPES,
];

/// The nine CloudControl tool definitions.
pub fn catalog() -> Vec<ToolDefinition> {
    vec![
        tool(
            CREATE_RESOURCE,
            "Create an AWS resource through the CloudControl API. Returns a progress \
             record; poll get_resource_request_status with its request_token until the \
             operation_status is terminal.",
            object_schema(
                json!({
                    "type_name": type_name_property(),
                    "desired_state": {
                        "description": "Desired resource properties as a JSON object (or a string holding one)",
                        "type": ["object", "string"]
                    },
                    "role_arn": role_arn_property(),
                    "client_token": client_token_property()
                }),
                &["type_name", "desired_state"],
            ),
            annotations("Create resource", false, false, false),
        ),
        tool(
            GET_RESOURCE,
            "Get the current properties of an AWS resource.",
            object_schema(
                json!({
                    "type_name": type_name_property(),
                    "identifier": identifier_property(),
                    "role_arn": role_arn_property()
                }),
                &["type_name", "identifier"],
            ),
            annotations("Get resource", true, false, true),
        ),
        tool(
            UPDATE_RESOURCE,
            "Update an AWS resource with an RFC 6902 JSON Patch document. Returns a \
             progress record for the asynchronous update.",
            object_schema(
                json!({
                    "type_name": type_name_property(),
                    "identifier": identifier_property(),
                    "patch_document": {
                        "description": "JSON Patch operations, as an array or a JSON string, e.g. [{\"op\": \"replace\", \"path\": \"/RetentionInDays\", \"value\": 14}]",
                        "type": ["array", "string"],
                        "items": {
                            "type": "object",
                            "properties": {
                                "op": {
                                    "type": "string",
                                    "enum": ["add", "remove", "replace", "move", "copy", "test"]
                                },
                                "path": { "type": "string" },
                                "from": { "type": "string" },
                                "value": {}
                            },
                            "required": ["op", "path"]
                        }
                    },
                    "role_arn": role_arn_property(),
                    "client_token": client_token_property()
                }),
                &["type_name", "identifier", "patch_document"],
            ),
            annotations("Update resource", false, true, false),
        ),
        tool(
            DELETE_RESOURCE,
            "Delete an AWS resource. Returns a progress record for the asynchronous deletion.",
            object_schema(
                json!({
                    "type_name": type_name_property(),
                    "identifier": identifier_property(),
                    "role_arn": role_arn_property(),
                    "client_token": client_token_property()
                }),
                &["type_name", "identifier"],
            ),
            annotations("Delete resource", false, true, true),
        ),
        tool(
            LIST_RESOURCES,
            "List the resources of a given type in the configured account and region. \
             Pass next_token from a previous page to continue.",
            object_schema(
                json!({
                    "type_name": type_name_property(),
                    "resource_model": {
                        "description": "Extra properties some resource types require for listing, e.g. the parent resource",
                        "type": ["object", "string"]
                    },
                    "role_arn": role_arn_property(),
                    "next_token": next_token_property()
                }),
                &["type_name"],
            ),
            annotations("List resources", true, false, true),
        ),
        tool(
            GET_RESOURCE_REQUEST_STATUS,
            "Get the current status of an asynchronous resource operation.",
            object_schema(
                json!({ "request_token": request_token_property() }),
                &["request_token"],
            ),
            annotations("Get request status", true, false, true),
        ),
        tool(
            CANCEL_RESOURCE_REQUEST,
            "Cancel an asynchronous resource operation that has not yet completed.",
            object_schema(
                json!({ "request_token": request_token_property() }),
                &["request_token"],
            ),
            annotations("Cancel request", false, false, true),
        ),
        tool(
            LIST_RESOURCE_REQUESTS,
            "List recent resource operation requests, optionally filtered by operation \
             and status.",
            object_schema(
                json!({
                    "resource_request_status_filter": {
                        "description": "Filter on operation and status",
                        "type": "object",
                        "properties": {
                            "Operations": {
                                "type": "array",
                                "items": { "type": "string", "enum": ["CREATE", "UPDATE", "DELETE"] }
                            },
                            "OperationStatuses": {
                                "type": "array",
                                "items": {
                                    "type": "string",
                                    "enum": [
                                        "PENDING",
                                        "IN_PROGRESS",
                                        "SUCCESS",
                                        "FAILED",
                                        "CANCEL_IN_PROGRESS",
                                        "CANCEL_COMPLETE"
                                    ]
                                }
                            }
                        },
                        "additionalProperties": false
                    },
                    "next_token": next_token_property()
                }),
                &[],
            ),
            annotations("List resource requests", true, false, true),
        ),
        tool(
            LIST_RESOURCE_TYPES,
            "List the resource types available through the CloudControl API.",
            object_schema(
                json!({
                    "filters": {
                        "description": "Registry filters",
                        "type": "object",
                        "properties": {
                            "TypeNamePrefix": { "type": "string" },
                            "Category": {
                                "type": "string",
                                "enum": ["REGISTERED", "ACTIVATED", "THIRD_PARTY", "AWS_TYPES"]
                            },
                            "PublisherId": { "type": "string" }
                        },
                        "additionalProperties": false
                    },
                    "next_token": next_token_property()
                }),
                &[],
            ),
            annotations("List resource types", true, false, true),
        ),
    ]
}

fn tool(
    name: &str,
    description: &str,
    input_schema: Value,
    annotations: ToolAnnotations,
) -> ToolDefinition {
    ToolDefinition {
        name: name.to_string(),
        description: Some(description.to_string()),
        input_schema,
        annotations: Some(annotations),
    }
}

fn object_schema(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

fn annotations(title: &str, read_only: bool, destructive: bool, idempotent: bool) -> ToolAnnotations {
    ToolAnnotations {
        title: Some(title.to_string()),
        read_only_hint: Some(read_only),
        destructive_hint: Some(destructive),
        idempotent_hint: Some(idempotent),
        open_world_hint: Some(true),
    }
}

fn type_name_property() -> Value {
    json!({
        "description": "Resource type, e.g. AWS::Logs::LogGroup",
        "type": "string"
    })
}

fn identifier_property() -> Value {
    json!({
        "description": "Primary identifier of the resource",
        "type": "string"
    })
}

fn role_arn_property() -> Value {
    json!({
        "description": "IAM role to assume for this operation",
        "type": "string"
    })
}

fn client_token_property() -> Value {
    json!({
        "description": "Idempotency token; repeating a request with the same token has no further effect",
        "type": "string"
    })
}

fn request_token_property() -> Value {
    json!({
        "description": "Request token returned by create_resource, update_resource or delete_resource",
        "type": "string"
    })
}

fn next_token_property() -> Value {
    json!({
        "description": "Pagination token from a previous page",
        "type": "string"
    })
}
