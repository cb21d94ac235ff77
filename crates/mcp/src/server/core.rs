use crate::bridge::{BridgeError, ReportBridge};
use crate::server::activity::ReportActivity;
use crate::server::errors::bridge_error;
use crate::server::log_payload::{McpLogEntry, build_log_payload, summarize_text};
use crate::server::schemas::ReportRequestParam;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, ErrorData, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo};
use ktl_reports_types::ReportOperation;
use rmcp::{ServerHandler, tool, tool_handler, tool_router};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

const SERVER_INSTRUCTIONS: &str = "Kubernetes report catalog.\nFLOW:\n1) Call list_reports to see available report names.\n2) Call describe_report with a name to learn what the report contains and its columns.\n3) Call report with the same name to generate it.\nOUTPUT:\n- report returns CSV prefixed with <source>NAME.csv</source>; the tag names the report the rows came from.\n- Reports are generated on demand against the live cluster and may take a while.";

/// MCP tool server exposing the report catalog.
///
/// Tool-only: `list_reports`, `describe_report`, and `report`. Every call goes
/// straight through the bridge; nothing is cached between calls.
#[derive(Clone)]
pub struct ReportsMcpCore {
    tool_router: ToolRouter<Self>,
    log_sender: Option<UnboundedSender<McpLogEntry>>,
    bridge: Arc<ReportBridge>,
    activity: Arc<ReportActivity>,
}

#[tool_router]
impl ReportsMcpCore {
    /// Create a new MCP core handler backed by the provided bridge.
    pub fn new(bridge: Arc<ReportBridge>, log_sender: Option<UnboundedSender<McpLogEntry>>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            log_sender,
            bridge,
            activity: Arc::new(ReportActivity::default()),
        }
    }

    #[tool(
        annotations(read_only_hint = true),
        description = "List available reports. Use first to discover report names for describe_report and report."
    )]
    async fn list_reports(&self) -> Result<CallToolResult, ErrorData> {
        let listing = self.bridge.list_reports();
        info!(tool = "list_reports", "tool call");
        self.emit_log("list_reports", None, Some(summarize_text(&listing)));
        Ok(CallToolResult::success(vec![Content::text(listing)]))
    }

    #[tool(
        annotations(read_only_hint = true),
        description = "Describe a report: its purpose and the columns it produces. Input: name (from list_reports). Call before report to know what the CSV contains."
    )]
    async fn describe_report(&self, param: Parameters<ReportRequestParam>) -> Result<CallToolResult, ErrorData> {
        let result = self.bridge.describe_report(&param.0.name).await;
        self.complete("describe_report", ReportOperation::Describe, &param.0, result)
    }

    #[tool(
        annotations(read_only_hint = true, open_world_hint = true),
        description = "Generate the named Kubernetes report and return the result in CSV format, prefixed with <source>NAME.csv</source>. Input: name (from list_reports). Check describe_report first."
    )]
    async fn report(&self, param: Parameters<ReportRequestParam>) -> Result<CallToolResult, ErrorData> {
        let result = self.bridge.report(&param.0.name).await;
        self.complete("report", ReportOperation::Run, &param.0, result)
    }
}

impl ReportsMcpCore {
    /// Share one activity ledger between this handler and others, such as
    /// every session of an HTTP server.
    pub fn with_activity(mut self, activity: Arc<ReportActivity>) -> Self {
        self.activity = activity;
        self
    }

    pub fn activity(&self) -> Arc<ReportActivity> {
        Arc::clone(&self.activity)
    }

    fn complete(
        &self,
        tool_name: &str,
        operation: ReportOperation,
        request: &ReportRequestParam,
        result: Result<String, BridgeError>,
    ) -> Result<CallToolResult, ErrorData> {
        self.activity.record(operation, &request.name, result.is_ok());
        let request_value = serde_json::to_value(request).unwrap_or(Value::Null);
        match result {
            Ok(text) => {
                info!(tool = tool_name, report = %request.name, bytes = text.len(), "tool call");
                self.emit_log(tool_name, Some(request_value), Some(summarize_text(&text)));
                Ok(CallToolResult::success(vec![Content::text(text)]))
            }
            Err(error) => {
                warn!(tool = tool_name, report = %request.name, %error, "tool call failed");
                let error_data = bridge_error(&error);
                self.emit_log(
                    tool_name,
                    Some(request_value),
                    Some(serde_json::to_value(&error_data).unwrap_or(Value::Null)),
                );
                Err(error_data)
            }
        }
    }

    fn emit_log(&self, tool_name: &str, request: Option<Value>, response: Option<Value>) {
        let Some(sender) = self.log_sender.as_ref() else {
            return;
        };
        let payload = build_log_payload(request, response);
        let _ = sender.send(McpLogEntry::new(format!("MCP: {tool_name}"), payload));
    }
}

#[tool_handler]
impl ServerHandler for ReportsMcpCore {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            protocol_version: ProtocolVersion::LATEST,
            server_info: Implementation {
                name: "ktl-reports".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("ktl reports".to_string()),
                ..Default::default()
            },
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
        }
    }
}
