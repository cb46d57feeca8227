//! Tools introspection command.
//!
//! `cloudcontrol tools` - List the tools the server exposes (offline).

use anyhow::{Context, Result};
use clap::Args;
use cloudcontrol_mcp::protocol::ListToolsResponse;
use cloudcontrol_mcp::tools::catalog;

/// Arguments for `cloudcontrol tools`.
#[derive(Debug, Args)]
pub struct ToolsArgs {
    /// Only show this tool.
    pub name: Option<String>,

    /// Show input schemas.
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the `tools/list` payload as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: ToolsArgs) -> Result<()> {
    let mut tools = catalog();
    if let Some(name) = &args.name {
        tools.retain(|t| &t.name == name);
        if tools.is_empty() {
            anyhow::bail!("Unknown tool: {}", name);
        }
    }

    if args.json {
        let payload = serde_json::to_string_pretty(&ListToolsResponse { tools })
            .context("Failed to encode tool list")?;
        println!("{}", payload);
        return Ok(());
    }

    println!("\nAvailable Tools ({}):", tools.len());

    for tool in &tools {
        let annotations = tool.annotations.clone().unwrap_or_default();

        let mut badges = Vec::new();
        if annotations.read_only_hint == Some(true) {
            badges.push("read");
        } else {
            badges.push("write");
        }
        if annotations.destructive_hint == Some(true) {
            badges.push("destructive");
        }
        if annotations.idempotent_hint == Some(true) {
            badges.push("idempotent");
        }

        println!("   • {} ({})", tool.name, badges.join(", "));

        if let Some(desc) = &tool.description {
            println!("     {}", desc);
        }

        if args.verbose {
            println!(
                "     Schema: {}",
                serde_json::to_string_pretty(&tool.input_schema)?
            );
        }
    }

    println!();

    Ok(())
}
