mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cloudcontrol_core::AppConfig;
use commands::serve::ServeArgs;
use commands::tools::ToolsArgs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "cloudcontrol",
    version,
    about = "MCP server exposing the AWS CloudControl API as tools"
)]
struct Cli {
    /// Configuration file (YAML).
    #[arg(short, long, global = true, env = "CLOUDCONTROL_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter, e.g. `info` or `cloudcontrol_mcp=debug`. Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the MCP server (the default when no command is given).
    Serve(ServeArgs),

    /// List the tools the server exposes.
    Tools(ToolsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cmd = cli.cmd.unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    let mut config = AppConfig::load(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("Failed to load configuration from {:?}", path),
        None => "Failed to load configuration".to_string(),
    })?;

    if let Command::Serve(args) = &cmd {
        args.apply(&mut config);
        config.validate().context("Invalid configuration")?;
    }

    init_logging(cli.log_level.as_deref(), &config.logging.level)?;

    if let Some(path) = &cli.config {
        if !path.exists() {
            tracing::warn!(config = %path.display(), "Config file not found, using defaults");
        }
    }

    match cmd {
        Command::Serve(_) => commands::serve::execute(config).await?,
        Command::Tools(args) => commands::tools::execute(args)?,
    }

    Ok(())
}

/// Logs go to stderr; stdout belongs to the stdio transport.
///
/// Filter precedence: `--log-level`, then `RUST_LOG`, then the configured
/// level (`CLOUDCONTROL_LOG_LEVEL` or `logging.level`).
fn init_logging(flag: Option<&str>, configured: &str) -> Result<()> {
    let filter = match flag {
        Some(level) => EnvFilter::try_new(level)
            .with_context(|| format!("Invalid log level: {}", level))?,
        None => match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(configured)
                .with_context(|| format!("Invalid log level: {}", configured))?,
        },
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use cloudcontrol_core::Transport;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_command_means_serve() {
        let cli = Cli::try_parse_from(["cloudcontrol"]).unwrap();
        assert!(cli.cmd.is_none());
    }

    #[test]
    fn test_serve_flags() {
        let cli = Cli::try_parse_from([
            "cloudcontrol",
            "serve",
            "--transport",
            "http",
            "--port",
            "9090",
            "--region",
            "eu-central-1",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        let Some(Command::Serve(args)) = cli.cmd else {
            panic!("expected serve");
        };
        assert_eq!(args.transport, Some(Transport::Http));
        assert_eq!(args.port, Some(9090));
        assert_eq!(args.region.as_deref(), Some("eu-central-1"));
    }

    #[test]
    fn test_sse_conflicts_with_transport() {
        let result = Cli::try_parse_from(["cloudcontrol", "serve", "--sse", "--transport", "stdio"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_transport_rejected() {
        let result = Cli::try_parse_from(["cloudcontrol", "serve", "--transport", "grpc"]);
        assert!(result.is_err());
    }
}
