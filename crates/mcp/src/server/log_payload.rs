//! Helpers for building tool-call log payloads.
//!
//! Report output can be large CSV, so responses are logged as a summary
//! (size, line count, short preview) rather than verbatim.

use ktl_reports_util::redact_sensitive;
use serde_json::{Map, Value};

const PREVIEW_CHARS: usize = 200;

/// Log entry emitted for each tool call when a log sender is attached.
#[derive(Debug, Clone)]
pub struct McpLogEntry {
    /// Human-readable summary for list display.
    pub message: String,
    /// Optional structured payload for detail inspection.
    pub payload: Option<Value>,
}

impl McpLogEntry {
    /// Create a new log entry.
    pub fn new(message: String, payload: Option<Value>) -> Self {
        Self { message, payload }
    }
}

/// Builds the standard log payload.
///
/// The payload includes `request` and/or `response` when present. Returns
/// `None` when both values are absent.
pub(crate) fn build_log_payload(request: Option<Value>, response: Option<Value>) -> Option<Value> {
    let mut payload = Map::new();
    if let Some(request_value) = request {
        payload.insert("request".to_string(), request_value);
    }
    if let Some(response_value) = response {
        payload.insert("response".to_string(), response_value);
    }
    if payload.is_empty() { None } else { Some(Value::Object(payload)) }
}

/// Size, line count, and a redacted preview of a text response.
pub(crate) fn summarize_text(text: &str) -> Value {
    let preview = text.chars().take(PREVIEW_CHARS).collect::<String>();
    serde_json::json!({
        "bytes": text.len(),
        "lines": text.lines().count(),
        "preview": redact_sensitive(&preview),
        "truncated": text.chars().nth(PREVIEW_CHARS).is_some(),
    })
}
