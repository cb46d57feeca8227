//! The tool adapter.
//!
//! One async method per tool. Each method validates its arguments, issues
//! exactly one provider call and reshapes the answer. Nothing is cached,
//! polled or retried here.

use crate::error::AdapterError;
use crate::model::{
    ProgressRecord, RequestPage, ResourcePage, ResourceRecord, ResourceResult, ResourceType,
    TypePage,
};
use crate::provider::{CloudControlApi, ProgressEvent, ResourceDescription};
use crate::request::{
    CreateResourceRequest, DeleteResourceRequest, GetResourceRequest, ListResourceRequestsRequest,
    ListResourceTypesRequest, ListResourcesRequest, RequestTokenRequest, UpdateResourceRequest,
};
use crate::validator;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Translates tool invocations into provider calls.
#[derive(Clone)]
pub struct CloudControlAdapter {
    provider: Option<Arc<dyn CloudControlApi>>,
}

impl CloudControlAdapter {
    pub fn new(provider: Arc<dyn CloudControlApi>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// An adapter with no provider client. Every operation fails with
    /// [`AdapterError::ClientUnavailable`] after validation.
    pub fn unavailable() -> Self {
        Self { provider: None }
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_some()
    }

    fn provider(&self) -> Result<&dyn CloudControlApi, AdapterError> {
        self.provider
            .as_deref()
            .ok_or(AdapterError::ClientUnavailable)
    }

    pub async fn create_resource(
        &self,
        request: CreateResourceRequest,
    ) -> Result<ProgressRecord, AdapterError> {
        let input = validator::validate_create(request)?;
        let provider = self.provider()?;

        tracing::info!(type_name = %input.type_name, "Creating resource");
        let event = provider.create_resource(input).await?;
        acknowledged("Error creating resource", event)
    }

    pub async fn get_resource(
        &self,
        request: GetResourceRequest,
    ) -> Result<ResourceResult, AdapterError> {
        let input = validator::validate_get(request)?;
        let provider = self.provider()?;

        tracing::debug!(
            type_name = %input.type_name,
            identifier = %input.identifier,
            "Getting resource"
        );
        let output = provider.get_resource(input).await?;

        let description = output
            .resource_description
            .ok_or_else(|| AdapterError::InvalidResponse {
                context: "Error getting resource".to_string(),
                reason: "response carried no resource description".to_string(),
            })?;

        let properties = match description.properties.as_deref() {
            Some(raw) => serde_json::from_str(raw).map_err(|e| AdapterError::InvalidResponse {
                context: "Error getting resource".to_string(),
                reason: format!("properties are not valid JSON: {}", e),
            })?,
            None => Value::Object(Map::new()),
        };

        Ok(ResourceResult {
            type_name: output.type_name,
            resource: ResourceRecord {
                identifier: description.identifier,
                properties,
            },
        })
    }

    pub async fn update_resource(
        &self,
        request: UpdateResourceRequest,
    ) -> Result<ProgressRecord, AdapterError> {
        let input = validator::validate_update(request)?;
        let provider = self.provider()?;

        tracing::info!(
            type_name = %input.type_name,
            identifier = %input.identifier,
            "Updating resource"
        );
        let event = provider.update_resource(input).await?;
        acknowledged("Error updating resource", event)
    }

    pub async fn delete_resource(
        &self,
        request: DeleteResourceRequest,
    ) -> Result<ProgressRecord, AdapterError> {
        let input = validator::validate_delete(request)?;
        let provider = self.provider()?;

        tracing::info!(
            type_name = %input.type_name,
            identifier = %input.identifier,
            "Deleting resource"
        );
        let event = provider.delete_resource(input).await?;
        acknowledged("Error deleting resource", event)
    }

    pub async fn list_resources(
        &self,
        request: ListResourcesRequest,
    ) -> Result<ResourcePage, AdapterError> {
        let input = validator::validate_list_resources(request)?;
        let provider = self.provider()?;

        tracing::debug!(
            type_name = %input.type_name,
            has_model = input.resource_model.is_some(),
            "Listing resources"
        );
        let output = provider.list_resources(input).await?;

        let resources = output
            .resource_descriptions
            .into_iter()
            .map(listed_resource)
            .collect();

        Ok(ResourcePage {
            type_name: output.type_name,
            resources,
            next_token: output.next_token,
        })
    }

    pub async fn get_resource_request_status(
        &self,
        request: RequestTokenRequest,
    ) -> Result<ProgressRecord, AdapterError> {
        let request_token = validator::validate_request_token(request)?;
        let provider = self.provider()?;

        tracing::debug!(request_token = %request_token, "Getting resource request status");
        let event = provider.get_resource_request_status(request_token).await?;
        Ok(ProgressRecord::from(event))
    }

    pub async fn cancel_resource_request(
        &self,
        request: RequestTokenRequest,
    ) -> Result<ProgressRecord, AdapterError> {
        let request_token = validator::validate_request_token(request)?;
        let provider = self.provider()?;

        tracing::info!(request_token = %request_token, "Cancelling resource request");
        let event = provider.cancel_resource_request(request_token).await?;
        Ok(ProgressRecord::from(event))
    }

    pub async fn list_resource_requests(
        &self,
        request: ListResourceRequestsRequest,
    ) -> Result<RequestPage, AdapterError> {
        let input = validator::validate_list_requests(request)?;
        let provider = self.provider()?;

        tracing::debug!(filtered = input.filter.is_some(), "Listing resource requests");
        let output = provider.list_resource_requests(input).await?;

        Ok(RequestPage {
            requests: output
                .summaries
                .into_iter()
                .map(ProgressRecord::from)
                .collect(),
            next_token: output.next_token,
        })
    }

    pub async fn list_resource_types(
        &self,
        request: ListResourceTypesRequest,
    ) -> Result<TypePage, AdapterError> {
        let input = validator::validate_list_types(request)?;
        let provider = self.provider()?;

        tracing::debug!(filtered = input.filters.is_some(), "Listing resource types");
        let output = provider.list_resource_types(input).await?;

        Ok(TypePage {
            types: output
                .type_summaries
                .into_iter()
                .map(ResourceType::from)
                .collect(),
            next_token: output.next_token,
        })
    }
}

/// A mutation is acknowledged once the provider hands back a request token.
fn acknowledged(context: &str, event: ProgressEvent) -> Result<ProgressRecord, AdapterError> {
    if event.request_token.is_none() {
        return Err(AdapterError::InvalidResponse {
            context: context.to_string(),
            reason: "response carried no request token".to_string(),
        });
    }

    let record = ProgressRecord::from(event);
    tracing::debug!(
        request_token = record.request_token.as_deref().unwrap_or_default(),
        status = record.operation_status.map(|s| s.as_str()).unwrap_or("unknown"),
        "Provider acknowledged request"
    );
    Ok(record)
}

/// Undecodable properties in a listing become `{}` rather than failing the page.
fn listed_resource(description: ResourceDescription) -> ResourceRecord {
    let properties = match description.properties.as_deref() {
        Some(raw) => match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(
                    identifier = description.identifier.as_deref().unwrap_or_default(),
                    error = %e,
                    "Could not decode resource properties"
                );
                Value::Object(Map::new())
            }
        },
        None => Value::Object(Map::new()),
    };

    ResourceRecord {
        identifier: description.identifier,
        properties,
    }
}
