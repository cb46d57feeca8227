//! AWS SDK implementation of [`CloudControlApi`].
//!
//! Resource operations go to the CloudControl API. Resource type discovery
//! goes to the CloudFormation registry, which owns the type catalog.
//!
//! # Authentication
//!
//! Credentials follow [`AwsConfig::credential_source`]: explicit keys, then a
//! named profile, then the SDK default chain (environment, shared files,
//! container and instance metadata).

use crate::provider::{
    CloudControlApi, CreateResourceInput, DeleteResourceInput, GetResourceInput,
    GetResourceOutput, ListResourceRequestsInput, ListResourceRequestsOutput,
    ListResourceTypesInput, ListResourceTypesOutput, ListResourcesInput, ListResourcesOutput,
    ProgressEvent, ProviderError, ResourceDescription, TypeSummary, UpdateResourceInput,
};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_sdk_cloudcontrol::config::{Credentials, Region};
use aws_sdk_cloudcontrol::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_cloudcontrol::primitives::DateTime as SdkDateTime;
use aws_sdk_cloudcontrol::types as cc;
use aws_sdk_cloudformation::types as cfn;
use chrono::{DateTime, Utc};
use cloudcontrol_core::{AwsConfig, CredentialSource};
use std::time::Duration;

const CLOUDCONTROL: &str = "CloudControl";
const CLOUDFORMATION: &str = "CloudFormation";

/// CloudControl and CloudFormation clients sharing one SDK configuration.
#[derive(Clone)]
pub struct AwsCloudControl {
    cloudcontrol: aws_sdk_cloudcontrol::Client,
    cloudformation: aws_sdk_cloudformation::Client,
}

impl AwsCloudControl {
    /// Build both clients from the process configuration.
    pub async fn from_config(config: &AwsConfig) -> Self {
        let timeouts = TimeoutConfig::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .read_timeout(Duration::from_secs(config.read_timeout_secs))
            .build();

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .retry_config(RetryConfig::standard().with_max_attempts(config.max_attempts))
            .timeout_config(timeouts);

        let source = config.credential_source();
        match &source {
            CredentialSource::Static {
                access_key_id,
                secret_access_key,
                session_token,
            } => {
                loader = loader.credentials_provider(Credentials::new(
                    access_key_id.clone(),
                    secret_access_key.clone(),
                    session_token.clone(),
                    None,
                    "cloudcontrol-static",
                ));
            }
            CredentialSource::Profile(name) => {
                loader = loader.profile_name(name);
            }
            CredentialSource::DefaultChain => {}
        }

        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;

        tracing::info!(
            region = %config.region,
            credentials = %source,
            max_attempts = config.max_attempts,
            "AWS clients initialized"
        );

        Self {
            cloudcontrol: aws_sdk_cloudcontrol::Client::new(&sdk_config),
            cloudformation: aws_sdk_cloudformation::Client::new(&sdk_config),
        }
    }
}

#[async_trait]
impl CloudControlApi for AwsCloudControl {
    async fn create_resource(
        &self,
        input: CreateResourceInput,
    ) -> Result<ProgressEvent, ProviderError> {
        let output = self
            .cloudcontrol
            .create_resource()
            .type_name(input.type_name)
            .desired_state(input.desired_state)
            .set_role_arn(input.role_arn)
            .set_client_token(input.client_token)
            .send()
            .await
            .map_err(|e| provider_error(CLOUDCONTROL, e))?;

        Ok(output.progress_event().map(progress_event).unwrap_or_default())
    }

    async fn get_resource(
        &self,
        input: GetResourceInput,
    ) -> Result<GetResourceOutput, ProviderError> {
        let output = self
            .cloudcontrol
            .get_resource()
            .type_name(input.type_name)
            .identifier(input.identifier)
            .set_role_arn(input.role_arn)
            .send()
            .await
            .map_err(|e| provider_error(CLOUDCONTROL, e))?;

        Ok(GetResourceOutput {
            type_name: output.type_name().map(str::to_string),
            resource_description: output.resource_description().map(resource_description),
        })
    }

    async fn update_resource(
        &self,
        input: UpdateResourceInput,
    ) -> Result<ProgressEvent, ProviderError> {
        let output = self
            .cloudcontrol
            .update_resource()
            .type_name(input.type_name)
            .identifier(input.identifier)
            .patch_document(input.patch_document)
            .set_role_arn(input.role_arn)
            .set_client_token(input.client_token)
            .send()
            .await
            .map_err(|e| provider_error(CLOUDCONTROL, e))?;

        Ok(output.progress_event().map(progress_event).unwrap_or_default())
    }

    async fn delete_resource(
        &self,
        input: DeleteResourceInput,
    ) -> Result<ProgressEvent, ProviderError> {
        let output = self
            .cloudcontrol
            .delete_resource()
            .type_name(input.type_name)
            .identifier(input.identifier)
            .set_role_arn(input.role_arn)
            .set_client_token(input.client_token)
            .send()
            .await
            .map_err(|e| provider_error(CLOUDCONTROL, e))?;

        Ok(output.progress_event().map(progress_event).unwrap_or_default())
    }

    async fn list_resources(
        &self,
        input: ListResourcesInput,
    ) -> Result<ListResourcesOutput, ProviderError> {
        let output = self
            .cloudcontrol
            .list_resources()
            .type_name(input.type_name)
            .set_resource_model(input.resource_model)
            .set_role_arn(input.role_arn)
            .set_next_token(input.next_token)
            .send()
            .await
            .map_err(|e| provider_error(CLOUDCONTROL, e))?;

        Ok(ListResourcesOutput {
            type_name: output.type_name().map(str::to_string),
            resource_descriptions: output
                .resource_descriptions()
                .iter()
                .map(resource_description)
                .collect(),
            next_token: output.next_token().map(str::to_string),
        })
    }

    async fn get_resource_request_status(
        &self,
        request_token: String,
    ) -> Result<ProgressEvent, ProviderError> {
        let output = self
            .cloudcontrol
            .get_resource_request_status()
            .request_token(request_token)
            .send()
            .await
            .map_err(|e| provider_error(CLOUDCONTROL, e))?;

        Ok(output.progress_event().map(progress_event).unwrap_or_default())
    }

    async fn cancel_resource_request(
        &self,
        request_token: String,
    ) -> Result<ProgressEvent, ProviderError> {
        let output = self
            .cloudcontrol
            .cancel_resource_request()
            .request_token(request_token)
            .send()
            .await
            .map_err(|e| provider_error(CLOUDCONTROL, e))?;

        Ok(output.progress_event().map(progress_event).unwrap_or_default())
    }

    async fn list_resource_requests(
        &self,
        input: ListResourceRequestsInput,
    ) -> Result<ListResourceRequestsOutput, ProviderError> {
        let filter = input.filter.map(|filter| {
            cc::ResourceRequestStatusFilter::builder()
                .set_operations(non_empty(
                    filter
                        .operations
                        .iter()
                        .map(|op| cc::Operation::from(op.as_str()))
                        .collect(),
                ))
                .set_operation_statuses(non_empty(
                    filter
                        .operation_statuses
                        .iter()
                        .map(|status| cc::OperationStatus::from(status.as_str()))
                        .collect(),
                ))
                .build()
        });

        let output = self
            .cloudcontrol
            .list_resource_requests()
            .set_resource_request_status_filter(filter)
            .set_next_token(input.next_token)
            .send()
            .await
            .map_err(|e| provider_error(CLOUDCONTROL, e))?;

        Ok(ListResourceRequestsOutput {
            summaries: output
                .resource_request_status_summaries()
                .iter()
                .map(progress_event)
                .collect(),
            next_token: output.next_token().map(str::to_string),
        })
    }

    async fn list_resource_types(
        &self,
        input: ListResourceTypesInput,
    ) -> Result<ListResourceTypesOutput, ProviderError> {
        let filters = input.filters.map(|filters| {
            cfn::TypeFilters::builder()
                .set_type_name_prefix(filters.type_name_prefix)
                .set_category(filters.category.as_deref().map(cfn::Category::from))
                .set_publisher_id(filters.publisher_id)
                .build()
        });

        let output = self
            .cloudformation
            .list_types()
            .r#type(cfn::RegistryType::Resource)
            .set_filters(filters)
            .set_next_token(input.next_token)
            .send()
            .await
            .map_err(|e| provider_error(CLOUDFORMATION, e))?;

        Ok(ListResourceTypesOutput {
            type_summaries: output.type_summaries().iter().map(type_summary).collect(),
            next_token: output.next_token().map(str::to_string),
        })
    }
}

// =============================================================================
// SDK CONVERSIONS
// =============================================================================

/// Service errors keep their code and message; everything else (timeouts,
/// dispatch and response failures) is reported as a transport failure.
fn provider_error<E, R>(service: &'static str, err: SdkError<E, R>) -> ProviderError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    if let Some(service_err) = err.as_service_error() {
        let code = service_err.code().unwrap_or("Unknown").to_string();
        let message = service_err
            .message()
            .map(str::to_string)
            .unwrap_or_else(|| service_err.to_string());

        tracing::warn!(service, code = %code, "AWS service error");
        return ProviderError::Service {
            service,
            code,
            message,
        };
    }

    let message = DisplayErrorContext(&err).to_string();
    tracing::warn!(service, error = %message, "AWS request failed");
    ProviderError::Transport(message)
}

fn progress_event(event: &cc::ProgressEvent) -> ProgressEvent {
    ProgressEvent {
        type_name: event.type_name().map(str::to_string),
        identifier: event.identifier().map(str::to_string),
        request_token: event.request_token().map(str::to_string),
        operation: event.operation().map(|op| op.as_str().to_string()),
        operation_status: event
            .operation_status()
            .map(|status| status.as_str().to_string()),
        event_time: event.event_time().and_then(timestamp),
        status_message: event.status_message().map(str::to_string),
        error_code: event.error_code().map(|code| code.as_str().to_string()),
        retry_after: event.retry_after().and_then(timestamp),
    }
}

fn resource_description(description: &cc::ResourceDescription) -> ResourceDescription {
    ResourceDescription {
        identifier: description.identifier().map(str::to_string),
        properties: description.properties().map(str::to_string),
    }
}

fn type_summary(summary: &cfn::TypeSummary) -> TypeSummary {
    TypeSummary {
        type_name: summary.type_name().map(str::to_string),
        type_arn: summary.type_arn().map(str::to_string),
        description: summary.description().map(str::to_string),
        last_updated: summary.last_updated().and_then(timestamp),
        default_version_id: summary.default_version_id().map(str::to_string),
        publisher_id: summary.publisher_id().map(str::to_string),
        publisher_name: summary.publisher_name().map(str::to_string),
        publisher_identity: summary.publisher_identity().map(|p| p.as_str().to_string()),
        is_activated: summary.is_activated(),
        original_type_name: summary.original_type_name().map(str::to_string),
        latest_public_version: summary.latest_public_version().map(str::to_string),
        public_version_number: summary.public_version_number().map(str::to_string),
        registry_type: summary.r#type().map(|t| t.as_str().to_string()),
    }
}

fn timestamp(time: &SdkDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(time.secs(), time.subsec_nanos())
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() { None } else { Some(items) }
}
