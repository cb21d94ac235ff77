//! Model Context Protocol (MCP) facade for the ktl report catalog.
//!
//! Exposes three tools to an agent: `list_reports`, `describe_report`, and
//! `report`. Report generation itself is delegated to the external pipeline
//! engine; this crate resolves names, invokes the engine, and shapes the
//! output.

pub mod bridge;
pub mod config;
pub mod server;

#[cfg(test)]
mod test_support;

pub use bridge::{BridgeError, ReportBridge, format_listing, wrap_with_provenance};
pub use config::{ConfigError, EngineConfig, HttpServerConfig, ReportsConfig, load_config, load_config_from_path, validate_config};
pub use server::{
    MCP_HTTP_PATH, McpLogEntry, ReportActivity, ReportCounters, ReportRequestParam, ReportsHttpServer, ReportsMcpCore, serve_stdio,
};
