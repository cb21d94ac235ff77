//! Structured tool error helpers.

use crate::bridge::BridgeError;
use chrono::Utc;
use ktl_reports_engine::EngineError;
use rmcp::model::ErrorData;
use serde_json::Value;

fn build_error_data(error_code: &str, category: &str, message: &str, context: Value, retryable: bool, suggested_action: &str) -> Value {
    serde_json::json!({
        "error_code": error_code,
        "category": category,
        "message": message,
        "context": context,
        "retryable": retryable,
        "suggested_action": suggested_action,
        "correlation_id": format!("report-{}", Utc::now().timestamp_millis()),
    })
}

pub fn execution_error(error_code: &str, message: impl Into<String>, context: Value, suggested_action: &str) -> ErrorData {
    let message = message.into();
    ErrorData::internal_error(
        message.clone(),
        Some(build_error_data(
            error_code,
            "execution",
            &message,
            context,
            false,
            suggested_action,
        )),
    )
}

/// Maps a failed describe/run call to an MCP error carrying the engine diagnostics.
pub fn bridge_error(error: &BridgeError) -> ErrorData {
    let context = serde_json::json!({
        "report": error.name,
        "operation": error.operation,
        "definition_path": error.definition_path.display().to_string(),
        "exit_code": error.source.exit_code(),
        "stderr": error.source.stderr(),
    });
    execution_error(error.source.code(), error.to_string(), context, suggested_action(&error.source))
}

fn suggested_action(error: &EngineError) -> &'static str {
    match error {
        EngineError::Spawn { .. } => "Check that the pipeline engine is installed and the facade root exists.",
        EngineError::Failed { .. } | EngineError::Terminated { .. } => {
            "Call list_reports to confirm the report name, then inspect stderr for the engine diagnostic."
        }
        EngineError::Timeout { .. } => "The report exceeded the configured engine timeout; raise engine.timeoutSecs if it is expected to be slow.",
        EngineError::InvalidUtf8 { .. } | EngineError::Io(_) => "Inspect the pipeline engine output; it could not be read as UTF-8 text.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ktl_reports_types::ReportOperation;
    use std::path::PathBuf;

    #[test]
    fn bridge_error_carries_engine_diagnostics() {
        let error = BridgeError {
            name: "missing".to_string(),
            operation: ReportOperation::Run,
            definition_path: PathBuf::from("/srv/catalog/mcp-missing/pipeline.yaml"),
            source: EngineError::Failed {
                operation: ReportOperation::Run,
                exit_code: 1,
                stderr: "open pipeline.yaml: no such file or directory".to_string(),
                stdout: String::new(),
            },
        };

        let data = bridge_error(&error);
        assert!(data.message.starts_with("report 'missing' run failed"));
        let payload = data.data.expect("error payload");
        assert_eq!(payload["error_code"], "ENGINE_EXIT_NONZERO");
        assert_eq!(payload["category"], "execution");
        assert_eq!(payload["retryable"], false);
        assert_eq!(payload["context"]["report"], "missing");
        assert_eq!(payload["context"]["operation"], "run");
        assert_eq!(payload["context"]["exit_code"], 1);
        assert_eq!(payload["context"]["stderr"], "open pipeline.yaml: no such file or directory");
        assert!(payload["correlation_id"].as_str().is_some_and(|id| id.starts_with("report-")));
    }
}
