//! `cloudcontrol serve`: run the MCP server.

use anyhow::{Context, Result};
use clap::Args;
use cloudcontrol_core::{AppConfig, Transport};
use cloudcontrol_mcp::{AwsCloudControl, CloudControlAdapter, McpServer};
use std::sync::Arc;
use tracing::info;

/// Arguments for `cloudcontrol serve`. Each flag overrides the config file
/// and the environment.
#[derive(Debug, Default, Args)]
pub struct ServeArgs {
    /// AWS region.
    #[arg(long)]
    pub region: Option<String>,

    /// Named AWS profile.
    #[arg(long)]
    pub profile: Option<String>,

    /// Transport type (stdio or http).
    #[arg(long)]
    pub transport: Option<Transport>,

    /// Shorthand for `--transport http`.
    #[arg(long, conflicts_with = "transport")]
    pub sse: bool,

    /// HTTP bind host (http transport only).
    #[arg(long)]
    pub host: Option<String>,

    /// HTTP port (http transport only).
    #[arg(long)]
    pub port: Option<u16>,
}

impl ServeArgs {
    /// Apply the command line overrides to `config`.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(region) = &self.region {
            config.aws.region = region.clone();
        }
        if let Some(profile) = &self.profile {
            config.aws.profile = Some(profile.clone());
        }
        if let Some(transport) = self.transport {
            config.mcp.transport = transport;
        }
        if self.sse {
            config.mcp.transport = Transport::Http;
        }
        if let Some(host) = &self.host {
            config.mcp.host = host.clone();
        }
        if let Some(port) = self.port {
            config.mcp.port = port;
        }
    }
}

/// Build the AWS clients and run the server until the transport closes.
pub async fn execute(config: AppConfig) -> Result<()> {
    info!(
        transport = %config.mcp.transport,
        region = %config.aws.region,
        "Starting CloudControl MCP server"
    );

    let provider = AwsCloudControl::from_config(&config.aws).await;
    let adapter = CloudControlAdapter::new(Arc::new(provider));

    let server = McpServer::new(config.mcp.clone()).with_adapter(adapter);
    server
        .run()
        .await
        .with_context(|| format!("MCP server ({} transport) failed", config.mcp.transport))?;

    Ok(())
}
