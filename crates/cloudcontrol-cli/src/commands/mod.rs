//! CLI command implementations for the CloudControl MCP server.

pub mod serve;
pub mod tools;
