//! Shared helpers for the integration tests.
//!
//! [`MockCloudControl`] records every provider call and answers from a
//! queue of scripted responses. An empty queue answers with the default
//! (empty) output.

#![allow(dead_code)]

use async_trait::async_trait;
use cloudcontrol_mcp::executor::ExecutionResult;
use cloudcontrol_mcp::provider::{
    CloudControlApi, CreateResourceInput, DeleteResourceInput, GetResourceInput,
    GetResourceOutput, ListResourceRequestsInput, ListResourceRequestsOutput,
    ListResourceTypesInput, ListResourceTypesOutput, ListResourcesInput, ListResourcesOutput,
    ProgressEvent, ProviderError, UpdateResourceInput,
};
use cloudcontrol_mcp::{CloudControlAdapter, ToolExecutor};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A provider call as seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    Create(CreateResourceInput),
    Get(GetResourceInput),
    Update(UpdateResourceInput),
    Delete(DeleteResourceInput),
    List(ListResourcesInput),
    Status(String),
    Cancel(String),
    ListRequests(ListResourceRequestsInput),
    ListTypes(ListResourceTypesInput),
}

/// A scripted provider answer.
#[derive(Debug, Clone)]
pub enum Scripted {
    Progress(ProgressEvent),
    Resource(GetResourceOutput),
    Resources(ListResourcesOutput),
    Requests(ListResourceRequestsOutput),
    Types(ListResourceTypesOutput),
    Fail(ProviderError),
}

#[derive(Default)]
pub struct MockCloudControl {
    calls: Mutex<Vec<ProviderCall>>,
    responses: Mutex<VecDeque<Scripted>>,
}

impl MockCloudControl {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue the next answer.
    pub fn script(&self, response: Scripted) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: ProviderCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn next<T: Default>(
        &self,
        pick: impl FnOnce(Scripted) -> Result<T, Scripted>,
    ) -> Result<T, ProviderError> {
        match self.responses.lock().unwrap().pop_front() {
            None => Ok(T::default()),
            Some(Scripted::Fail(err)) => Err(err),
            Some(other) => match pick(other) {
                Ok(value) => Ok(value),
                Err(unexpected) => panic!("scripted response does not fit the call: {:?}", unexpected),
            },
        }
    }

    fn progress(&self) -> Result<ProgressEvent, ProviderError> {
        self.next(|s| match s {
            Scripted::Progress(event) => Ok(event),
            other => Err(other),
        })
    }
}

#[async_trait]
impl CloudControlApi for MockCloudControl {
    async fn create_resource(
        &self,
        input: CreateResourceInput,
    ) -> Result<ProgressEvent, ProviderError> {
        self.record(ProviderCall::Create(input));
        self.progress()
    }

    async fn get_resource(
        &self,
        input: GetResourceInput,
    ) -> Result<GetResourceOutput, ProviderError> {
        self.record(ProviderCall::Get(input));
        self.next(|s| match s {
            Scripted::Resource(output) => Ok(output),
            other => Err(other),
        })
    }

    async fn update_resource(
        &self,
        input: UpdateResourceInput,
    ) -> Result<ProgressEvent, ProviderError> {
        self.record(ProviderCall::Update(input));
        self.progress()
    }

    async fn delete_resource(
        &self,
        input: DeleteResourceInput,
    ) -> Result<ProgressEvent, ProviderError> {
        self.record(ProviderCall::Delete(input));
        self.progress()
    }

    async fn list_resources(
        &self,
        input: ListResourcesInput,
    ) -> Result<ListResourcesOutput, ProviderError> {
        self.record(ProviderCall::List(input));
        self.next(|s| match s {
            Scripted::Resources(output) => Ok(output),
            other => Err(other),
        })
    }

    async fn get_resource_request_status(
        &self,
        request_token: String,
    ) -> Result<ProgressEvent, ProviderError> {
        self.record(ProviderCall::Status(request_token));
        self.progress()
    }

    async fn cancel_resource_request(
        &self,
        request_token: String,
    ) -> Result<ProgressEvent, ProviderError> {
        self.record(ProviderCall::Cancel(request_token));
        self.progress()
    }

    async fn list_resource_requests(
        &self,
        input: ListResourceRequestsInput,
    ) -> Result<ListResourceRequestsOutput, ProviderError> {
        self.record(ProviderCall::ListRequests(input));
        self.next(|s| match s {
            Scripted::Requests(output) => Ok(output),
            other => Err(other),
        })
    }

    async fn list_resource_types(
        &self,
        input: ListResourceTypesInput,
    ) -> Result<ListResourceTypesOutput, ProviderError> {
        self.record(ProviderCall::ListTypes(input));
        self.next(|s| match s {
            Scripted::Types(output) => Ok(output),
            other => Err(other),
        })
    }
}

/// Executor wired to the given mock.
pub fn executor(mock: &Arc<MockCloudControl>) -> ToolExecutor {
    ToolExecutor::new(CloudControlAdapter::new(mock.clone()))
}

/// A progress event as the provider reports it right after accepting a request.
pub fn accepted(token: &str, operation: &str, type_name: &str) -> ProgressEvent {
    ProgressEvent {
        type_name: Some(type_name.to_string()),
        request_token: Some(token.to_string()),
        operation: Some(operation.to_string()),
        operation_status: Some("IN_PROGRESS".to_string()),
        ..ProgressEvent::default()
    }
}

/// Structured payload of a result (the value or the error envelope).
pub fn extract_json(result: &ExecutionResult) -> Value {
    result.structured.clone().unwrap_or(Value::Null)
}

/// Assert that a result is successful
pub fn assert_success(result: &ExecutionResult, msg: &str) {
    assert!(result.success, "{}: {:?}", msg, result);
}

/// Assert that a result is a failure
pub fn assert_failure(result: &ExecutionResult, msg: &str) {
    assert!(!result.success, "{}: {:?}", msg, result);
}

/// Assert that a result failed with the given error kind.
pub fn assert_error_kind(result: &ExecutionResult, kind: &str) {
    assert_failure(result, kind);
    assert_eq!(
        extract_json(result)["error_kind"],
        Value::String(kind.to_string()),
        "unexpected error envelope: {:?}",
        result
    );
}
