//! stdio transport: what an agent uses when it launches the facade itself.

use std::sync::Arc;

use anyhow::{Context, Result};
use rmcp::ServiceExt;
use rmcp::transport::stdio;
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

use crate::bridge::ReportBridge;
use crate::server::core::ReportsMcpCore;
use crate::server::log_payload::McpLogEntry;

/// Serve the report tools over stdin/stdout until the client disconnects.
pub async fn serve_stdio(bridge: Arc<ReportBridge>, log_sender: Option<UnboundedSender<McpLogEntry>>) -> Result<()> {
    info!(catalog = %bridge.catalog().root().display(), "serving report tools over stdio");
    let core = ReportsMcpCore::new(bridge, log_sender);
    let activity = core.activity();
    let running = core.serve(stdio()).await.context("failed to start MCP stdio server")?;
    let reason = running.waiting().await.context("MCP stdio server task failed")?;
    info!(?reason, "MCP stdio session ended");
    activity.log_summary();
    Ok(())
}
