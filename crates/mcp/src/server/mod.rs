mod activity;
mod core;
mod errors;
mod http;
mod log_payload;
mod schemas;
mod stdio;

pub use activity::{ReportActivity, ReportCounters};
pub use core::ReportsMcpCore;
pub use http::{MCP_HTTP_PATH, ReportsHttpServer};
pub use log_payload::McpLogEntry;
pub use schemas::ReportRequestParam;
pub use stdio::serve_stdio;
