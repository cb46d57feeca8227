//! Tool behaviour against a recording provider.
//!
//! Run with:
//!   cargo test -p cloudcontrol-mcp --test adapter

mod common;

use cloudcontrol_mcp::provider::{
    GetResourceOutput, ListResourceRequestsOutput, ListResourceTypesOutput, ListResourcesOutput,
    ProgressEvent, ProviderError, RequestStatusFilter, ResourceDescription, TypeFilters,
    TypeSummary,
};
use cloudcontrol_mcp::tools::{self, TOOL_NAMES};
use common::*;
use serde_json::{Value, json};

// =============================================================================
// VALIDATION HAPPENS BEFORE ANY PROVIDER CALL
// =============================================================================

#[tokio::test]
async fn test_missing_required_fields_issue_no_calls() {
    let mock = MockCloudControl::new();
    let executor = executor(&mock);

    let required = [
        (tools::CREATE_RESOURCE, json!({"desired_state": {"A": 1}})),
        (tools::CREATE_RESOURCE, json!({"type_name": "AWS::Logs::LogGroup"})),
        (tools::GET_RESOURCE, json!({"type_name": "AWS::S3::Bucket"})),
        (tools::GET_RESOURCE, json!({"identifier": "bucket"})),
        (tools::UPDATE_RESOURCE, json!({"type_name": "AWS::S3::Bucket", "identifier": "b"})),
        (tools::DELETE_RESOURCE, json!({"type_name": "AWS::S3::Bucket", "identifier": ""})),
        (tools::LIST_RESOURCES, json!({"next_token": "t"})),
        (tools::GET_RESOURCE_REQUEST_STATUS, json!({})),
        (tools::CANCEL_RESOURCE_REQUEST, json!({"request_token": null})),
    ];

    for (tool, arguments) in required {
        let result = executor.execute(tool, arguments.clone()).await;
        assert_error_kind(&result, "missing-field");
        let message = extract_json(&result)["error"].as_str().unwrap().to_string();
        assert!(message.contains("Missing required field"), "{} {}: {}", tool, arguments, message);
    }

    // The two list tools without required fields reject malformed filters instead.
    let result = executor
        .execute(
            tools::LIST_RESOURCE_REQUESTS,
            json!({"resource_request_status_filter": {"Operations": ["IMPORT"]}}),
        )
        .await;
    assert_error_kind(&result, "malformed-filter");

    let result = executor
        .execute(tools::LIST_RESOURCE_TYPES, json!({"filters": {"Provisioning": "FULL"}}))
        .await;
    assert_error_kind(&result, "malformed-filter");

    assert!(mock.calls().is_empty(), "no provider call expected: {:?}", mock.calls());
}

#[tokio::test]
async fn test_wrong_argument_types_issue_no_calls() {
    let mock = MockCloudControl::new();
    let executor = executor(&mock);

    for tool in TOOL_NAMES {
        let result = executor.execute(tool, json!("not an object")).await;
        assert_error_kind(&result, "invalid-argument");
    }

    let result = executor
        .execute(tools::GET_RESOURCE, json!({"type_name": 12, "identifier": "x"}))
        .await;
    assert_error_kind(&result, "invalid-argument");

    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_malformed_patch_issues_no_call() {
    let mock = MockCloudControl::new();
    let executor = executor(&mock);

    for patch in [
        json!("this is not json"),
        json!(r#"{"op": "replace", "path": "/A", "value": 1}"#),
        json!([{"op": "upsert", "path": "/A", "value": 1}]),
        json!(7),
    ] {
        let result = executor
            .execute(
                tools::UPDATE_RESOURCE,
                json!({
                    "type_name": "AWS::Logs::LogGroup",
                    "identifier": "/aws/lambda/f",
                    "patch_document": patch
                }),
            )
            .await;
        assert_error_kind(&result, "malformed-patch");
    }

    assert!(mock.calls().is_empty());
}

// =============================================================================
// PROVIDER ERRORS
// =============================================================================

#[tokio::test]
async fn test_not_found_error_is_passed_through() {
    let mock = MockCloudControl::new();
    mock.script(Scripted::Fail(ProviderError::service(
        "ResourceNotFoundException",
        "AWS::S3::Bucket Handler returned status FAILED: Bucket not found",
    )));
    let executor = executor(&mock);

    let result = executor
        .execute(
            tools::GET_RESOURCE,
            json!({"type_name": "AWS::S3::Bucket", "identifier": "missing-bucket"}),
        )
        .await;

    assert_error_kind(&result, "not-found");
    let envelope = extract_json(&result);
    assert!(
        envelope["error"]
            .as_str()
            .unwrap()
            .contains("ResourceNotFoundException")
    );
    assert_eq!(envelope["error_code"], json!("ResourceNotFoundException"));
    assert_eq!(mock.calls().len(), 1);
}

#[tokio::test]
async fn test_cancel_after_completion_is_not_cancelable() {
    let mock = MockCloudControl::new();
    mock.script(Scripted::Fail(ProviderError::service(
        "ConcurrentModificationException",
        "Request has already completed",
    )));
    let executor = executor(&mock);

    let result = executor
        .execute(tools::CANCEL_RESOURCE_REQUEST, json!({"request_token": "rt-9"}))
        .await;

    assert_error_kind(&result, "not-cancelable");
    assert_eq!(mock.calls(), vec![ProviderCall::Cancel("rt-9".to_string())]);
}

#[tokio::test]
async fn test_transport_failure() {
    let mock = MockCloudControl::new();
    mock.script(Scripted::Fail(ProviderError::transport("connection timed out")));
    let executor = executor(&mock);

    let result = executor
        .execute(tools::LIST_RESOURCES, json!({"type_name": "AWS::S3::Bucket"}))
        .await;

    assert_error_kind(&result, "transport");
    assert!(extract_json(&result).get("error_code").is_none());
}

#[tokio::test]
async fn test_errors_do_not_affect_later_calls() {
    let mock = MockCloudControl::new();
    mock.script(Scripted::Fail(ProviderError::service("ThrottlingException", "Rate exceeded")));
    mock.script(Scripted::Progress(accepted("rt-2", "DELETE", "AWS::S3::Bucket")));
    let executor = executor(&mock);

    let arguments = json!({"type_name": "AWS::S3::Bucket", "identifier": "b"});
    let first = executor.execute(tools::DELETE_RESOURCE, arguments.clone()).await;
    assert_error_kind(&first, "throttled");

    let second = executor.execute(tools::DELETE_RESOURCE, arguments).await;
    assert_success(&second, "retry by the caller should go through");
    assert_eq!(extract_json(&second)["operation"], json!("delete"));
}

// =============================================================================
// ASYNCHRONOUS OPERATIONS
// =============================================================================

#[tokio::test]
async fn test_create_log_group_reports_in_progress() {
    let mock = MockCloudControl::new();
    mock.script(Scripted::Progress(accepted("rt-1", "CREATE", "AWS::Logs::LogGroup")));
    let executor = executor(&mock);

    let result = executor
        .execute(
            tools::CREATE_RESOURCE,
            json!({
                "type_name": "AWS::Logs::LogGroup",
                "desired_state": {"LogGroupName": "/aws/lambda/f", "RetentionInDays": 7},
                "client_token": "tok-1"
            }),
        )
        .await;

    assert_success(&result, "create should be acknowledged");
    let record = extract_json(&result);
    assert_eq!(record["request_token"], json!("rt-1"));
    assert_eq!(record["operation_status"], json!("in-progress"));
    assert_eq!(record["operation"], json!("create"));
    assert_eq!(record["type_name"], json!("AWS::Logs::LogGroup"));

    let calls = mock.calls();
    assert_eq!(calls.len(), 1);
    let ProviderCall::Create(input) = &calls[0] else {
        panic!("expected a create call, got {:?}", calls[0]);
    };
    assert_eq!(input.type_name, "AWS::Logs::LogGroup");
    let desired: Value = serde_json::from_str(&input.desired_state).unwrap();
    assert_eq!(desired, json!({"LogGroupName": "/aws/lambda/f", "RetentionInDays": 7}));
    assert_eq!(input.role_arn, None);
    assert_eq!(input.client_token.as_deref(), Some("tok-1"));
}

#[tokio::test]
async fn test_create_then_poll_request_status() {
    let mock = MockCloudControl::new();
    mock.script(Scripted::Progress(accepted("rt-1", "CREATE", "AWS::Logs::LogGroup")));
    mock.script(Scripted::Progress(ProgressEvent {
        operation_status: Some("SUCCESS".to_string()),
        identifier: Some("/aws/lambda/f".to_string()),
        ..accepted("rt-1", "CREATE", "AWS::Logs::LogGroup")
    }));
    let executor = executor(&mock);

    let create = executor
        .execute(
            tools::CREATE_RESOURCE,
            json!({
                "type_name": "AWS::Logs::LogGroup",
                "desired_state": {"LogGroupName": "/aws/lambda/f", "RetentionInDays": 7},
                "client_token": "tok-1"
            }),
        )
        .await;
    assert_success(&create, "create should be acknowledged");
    let returned = extract_json(&create)["request_token"].as_str().unwrap().to_string();
    assert_eq!(returned, "rt-1");

    let status = executor
        .execute(
            tools::GET_RESOURCE_REQUEST_STATUS,
            json!({"request_token": returned}),
        )
        .await;
    assert_success(&status, "status should be returned");
    let record = extract_json(&status);
    assert_eq!(record["request_token"], json!("rt-1"));
    assert_eq!(record["operation"], json!("create"));
    assert_eq!(record["operation_status"], json!("success"));
    assert_eq!(record["identifier"], json!("/aws/lambda/f"));

    let calls = mock.calls();
    assert_eq!(calls.len(), 2);
    assert!(matches!(&calls[0], ProviderCall::Create(_)));
    assert_eq!(calls[1], ProviderCall::Status("rt-1".to_string()));
}

#[tokio::test]
async fn test_request_token_round_trip() {
    let token = "a1b2c3d4-opaque/token+with=symbols";
    let mock = MockCloudControl::new();
    mock.script(Scripted::Progress(accepted(token, "UPDATE", "AWS::Logs::LogGroup")));
    mock.script(Scripted::Progress(ProgressEvent {
        operation_status: Some("SUCCESS".to_string()),
        identifier: Some("/aws/lambda/f".to_string()),
        ..accepted(token, "UPDATE", "AWS::Logs::LogGroup")
    }));
    let executor = executor(&mock);

    let patch = r#"[{"op": "replace", "path": "/RetentionInDays", "value": 14}]"#;
    let update = executor
        .execute(
            tools::UPDATE_RESOURCE,
            json!({
                "type_name": "AWS::Logs::LogGroup",
                "identifier": "/aws/lambda/f",
                "patch_document": patch,
                "client_token": "idem-42",
                "role_arn": "arn:aws:iam::123456789012:role/cc"
            }),
        )
        .await;
    assert_success(&update, "update should be acknowledged");
    let returned = extract_json(&update)["request_token"].as_str().unwrap().to_string();

    let status = executor
        .execute(
            tools::GET_RESOURCE_REQUEST_STATUS,
            json!({"request_token": returned}),
        )
        .await;
    assert_success(&status, "status should be returned");
    assert_eq!(extract_json(&status)["operation_status"], json!("success"));
    assert_eq!(extract_json(&status)["identifier"], json!("/aws/lambda/f"));

    let calls = mock.calls();
    let ProviderCall::Update(input) = &calls[0] else {
        panic!("expected an update call, got {:?}", calls[0]);
    };
    assert_eq!(input.patch_document, patch);
    assert_eq!(input.client_token.as_deref(), Some("idem-42"));
    assert_eq!(
        input.role_arn.as_deref(),
        Some("arn:aws:iam::123456789012:role/cc")
    );
    assert_eq!(calls[1], ProviderCall::Status(token.to_string()));
}

#[tokio::test]
async fn test_cancel_in_progress_maps_to_in_progress() {
    let mock = MockCloudControl::new();
    mock.script(Scripted::Progress(ProgressEvent {
        operation_status: Some("CANCEL_IN_PROGRESS".to_string()),
        ..accepted("rt-3", "CREATE", "AWS::S3::Bucket")
    }));
    mock.script(Scripted::Progress(ProgressEvent {
        operation_status: Some("CANCEL_COMPLETE".to_string()),
        ..accepted("rt-3", "CREATE", "AWS::S3::Bucket")
    }));
    let executor = executor(&mock);

    let cancel = executor
        .execute(tools::CANCEL_RESOURCE_REQUEST, json!({"request_token": "rt-3"}))
        .await;
    assert_eq!(extract_json(&cancel)["operation_status"], json!("in-progress"));

    let status = executor
        .execute(tools::GET_RESOURCE_REQUEST_STATUS, json!({"request_token": "rt-3"}))
        .await;
    assert_eq!(extract_json(&status)["operation_status"], json!("canceled"));
}

#[tokio::test]
async fn test_mutation_without_request_token_is_invalid_response() {
    let mock = MockCloudControl::new();
    mock.script(Scripted::Progress(ProgressEvent::default()));
    let executor = executor(&mock);

    let result = executor
        .execute(
            tools::CREATE_RESOURCE,
            json!({"type_name": "AWS::S3::Bucket", "desired_state": "{}"}),
        )
        .await;

    assert_error_kind(&result, "invalid-response");
}

// =============================================================================
// READS AND LISTINGS
// =============================================================================

#[tokio::test]
async fn test_get_resource_parses_properties() {
    let mock = MockCloudControl::new();
    mock.script(Scripted::Resource(GetResourceOutput {
        type_name: Some("AWS::Logs::LogGroup".to_string()),
        resource_description: Some(ResourceDescription {
            identifier: Some("/aws/lambda/f".to_string()),
            properties: Some(r#"{"LogGroupName":"/aws/lambda/f","RetentionInDays":7}"#.to_string()),
        }),
    }));
    let executor = executor(&mock);

    let result = executor
        .execute(
            tools::GET_RESOURCE,
            json!({"type_name": "AWS::Logs::LogGroup", "identifier": "/aws/lambda/f"}),
        )
        .await;

    assert_success(&result, "get should succeed");
    let record = extract_json(&result);
    assert_eq!(record["identifier"], json!("/aws/lambda/f"));
    assert_eq!(record["properties"]["RetentionInDays"], json!(7));
    assert_eq!(record["type_name"], json!("AWS::Logs::LogGroup"));
}

#[tokio::test]
async fn test_get_resource_with_invalid_properties_fails() {
    let mock = MockCloudControl::new();
    mock.script(Scripted::Resource(GetResourceOutput {
        type_name: Some("AWS::Logs::LogGroup".to_string()),
        resource_description: Some(ResourceDescription {
            identifier: Some("/aws/lambda/f".to_string()),
            properties: Some("{truncated".to_string()),
        }),
    }));
    let executor = executor(&mock);

    let result = executor
        .execute(
            tools::GET_RESOURCE,
            json!({"type_name": "AWS::Logs::LogGroup", "identifier": "/aws/lambda/f"}),
        )
        .await;

    assert_error_kind(&result, "invalid-response");
    assert!(
        extract_json(&result)["error"]
            .as_str()
            .unwrap()
            .starts_with("Error getting resource")
    );
}

#[tokio::test]
async fn test_list_resources_tolerates_undecodable_entries() {
    let mock = MockCloudControl::new();
    mock.script(Scripted::Resources(ListResourcesOutput {
        type_name: Some("AWS::S3::Bucket".to_string()),
        resource_descriptions: vec![
            ResourceDescription {
                identifier: Some("good".to_string()),
                properties: Some(r#"{"BucketName":"good"}"#.to_string()),
            },
            ResourceDescription {
                identifier: Some("bad".to_string()),
                properties: Some("not json".to_string()),
            },
        ],
        next_token: None,
    }));
    let executor = executor(&mock);

    let result = executor
        .execute(tools::LIST_RESOURCES, json!({"type_name": "AWS::S3::Bucket"}))
        .await;

    assert_success(&result, "list should succeed");
    let page = extract_json(&result);
    assert_eq!(page["resources"][0]["properties"]["BucketName"], json!("good"));
    assert_eq!(page["resources"][1]["identifier"], json!("bad"));
    assert_eq!(page["resources"][1]["properties"], json!({}));
    assert!(page.get("next_token").is_none());
}

#[tokio::test]
async fn test_pagination_cursor_is_forwarded_unchanged() {
    let mock = MockCloudControl::new();
    mock.script(Scripted::Resources(ListResourcesOutput {
        type_name: Some("AWS::S3::Bucket".to_string()),
        resource_descriptions: vec![ResourceDescription {
            identifier: Some("first".to_string()),
            properties: Some("{}".to_string()),
        }],
        next_token: Some("cursor==/page-2".to_string()),
    }));
    mock.script(Scripted::Resources(ListResourcesOutput::default()));
    let executor = executor(&mock);

    let first = executor
        .execute(tools::LIST_RESOURCES, json!({"type_name": "AWS::S3::Bucket"}))
        .await;
    let cursor = extract_json(&first)["next_token"].as_str().unwrap().to_string();
    assert_eq!(cursor, "cursor==/page-2");

    executor
        .execute(
            tools::LIST_RESOURCES,
            json!({"type_name": "AWS::S3::Bucket", "next_token": cursor}),
        )
        .await;

    let calls = mock.calls();
    let (ProviderCall::List(first_input), ProviderCall::List(second_input)) = (&calls[0], &calls[1])
    else {
        panic!("expected two list calls, got {:?}", calls);
    };
    assert_eq!(first_input.next_token, None);
    assert_eq!(second_input.next_token.as_deref(), Some("cursor==/page-2"));
}

#[tokio::test]
async fn test_list_resources_with_model() {
    let mock = MockCloudControl::new();
    let executor = executor(&mock);

    let result = executor
        .execute(
            tools::LIST_RESOURCES,
            json!({
                "type_name": "AWS::EKS::Nodegroup",
                "resource_model": {"ClusterName": "main"}
            }),
        )
        .await;
    assert_success(&result, "list with a model should succeed");

    let calls = mock.calls();
    let ProviderCall::List(input) = &calls[0] else {
        panic!("expected a list call");
    };
    let model: Value = serde_json::from_str(input.resource_model.as_deref().unwrap()).unwrap();
    assert_eq!(model, json!({"ClusterName": "main"}));
}

#[tokio::test]
async fn test_list_resource_requests() {
    let mock = MockCloudControl::new();
    mock.script(Scripted::Requests(ListResourceRequestsOutput {
        summaries: vec![
            accepted("rt-1", "CREATE", "AWS::Logs::LogGroup"),
            ProgressEvent {
                operation_status: Some("FAILED".to_string()),
                error_code: Some("NotFound".to_string()),
                ..accepted("rt-2", "DELETE", "AWS::S3::Bucket")
            },
        ],
        next_token: Some("more".to_string()),
    }));
    let executor = executor(&mock);

    let result = executor
        .execute(
            tools::LIST_RESOURCE_REQUESTS,
            json!({"status_filter": {"Operations": ["CREATE", "DELETE"], "OperationStatuses": ["FAILED", "IN_PROGRESS"]}}),
        )
        .await;

    assert_success(&result, "list requests should succeed");
    let page = extract_json(&result);
    assert_eq!(page["requests"].as_array().unwrap().len(), 2);
    assert_eq!(page["requests"][1]["operation_status"], json!("failed"));
    assert_eq!(page["requests"][1]["error_code"], json!("NotFound"));
    assert_eq!(page["next_token"], json!("more"));

    let calls = mock.calls();
    let ProviderCall::ListRequests(input) = &calls[0] else {
        panic!("expected a list requests call");
    };
    assert_eq!(
        input.filter,
        Some(RequestStatusFilter {
            operations: vec!["CREATE".to_string(), "DELETE".to_string()],
            operation_statuses: vec!["FAILED".to_string(), "IN_PROGRESS".to_string()],
        })
    );
}

#[tokio::test]
async fn test_list_resource_requests_forwards_cursor_unchanged() {
    let mock = MockCloudControl::new();
    mock.script(Scripted::Requests(ListResourceRequestsOutput {
        summaries: vec![accepted("rt-1", "CREATE", "AWS::Logs::LogGroup")],
        next_token: Some("nt-xyz==".to_string()),
    }));
    mock.script(Scripted::Requests(ListResourceRequestsOutput::default()));
    let executor = executor(&mock);

    let first = executor.execute(tools::LIST_RESOURCE_REQUESTS, json!({})).await;
    assert_success(&first, "first page should succeed");
    let cursor = extract_json(&first)["next_token"].as_str().unwrap().to_string();
    assert_eq!(cursor, "nt-xyz==");

    let second = executor
        .execute(tools::LIST_RESOURCE_REQUESTS, json!({"next_token": cursor}))
        .await;
    assert_success(&second, "second page should succeed");
    assert!(extract_json(&second).get("next_token").is_none());

    let calls = mock.calls();
    let (ProviderCall::ListRequests(first_input), ProviderCall::ListRequests(second_input)) =
        (&calls[0], &calls[1])
    else {
        panic!("expected two list requests calls, got {:?}", calls);
    };
    assert_eq!(first_input.next_token, None);
    assert_eq!(second_input.next_token.as_deref(), Some("nt-xyz=="));
    assert_eq!(second_input.filter, None);
}

#[tokio::test]
async fn test_list_resource_types() {
    let mock = MockCloudControl::new();
    mock.script(Scripted::Types(ListResourceTypesOutput {
        type_summaries: vec![TypeSummary {
            type_name: Some("AWS::S3::Bucket".to_string()),
            registry_type: Some("RESOURCE".to_string()),
            publisher_id: Some("AWS".to_string()),
            publisher_identity: Some("AWS_Marketplace".to_string()),
            ..TypeSummary::default()
        }],
        next_token: None,
    }));
    let executor = executor(&mock);

    let result = executor
        .execute(
            tools::LIST_RESOURCE_TYPES,
            json!({"filters": {"TypeNamePrefix": "AWS::S3::", "Category": "AWS_TYPES"}}),
        )
        .await;

    assert_success(&result, "list types should succeed");
    let page = extract_json(&result);
    assert_eq!(page["types"][0]["type_name"], json!("AWS::S3::Bucket"));
    assert_eq!(page["types"][0]["registry_type"], json!("RESOURCE"));
    assert_eq!(page["types"][0]["publisher_identity"], json!("AWS_Marketplace"));

    let calls = mock.calls();
    let ProviderCall::ListTypes(input) = &calls[0] else {
        panic!("expected a list types call");
    };
    assert_eq!(
        input.filters,
        Some(TypeFilters {
            type_name_prefix: Some("AWS::S3::".to_string()),
            category: Some("AWS_TYPES".to_string()),
            publisher_id: None,
        })
    );
}
