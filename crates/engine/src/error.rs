//! Error types for pipeline engine invocations.

use ktl_reports_types::ReportOperation;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single engine invocation.
///
/// Captured output is already redacted and size limited.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start pipeline engine '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("pipeline engine {operation} exited with status {exit_code}{}", diagnostic_suffix(.stderr, .stdout))]
    Failed {
        operation: ReportOperation,
        exit_code: i32,
        stderr: String,
        stdout: String,
    },

    #[error("pipeline engine {operation} was terminated by a signal{}", diagnostic_suffix(.stderr, ""))]
    Terminated { operation: ReportOperation, stderr: String },

    #[error("pipeline engine {operation} timed out after {}ms", .timeout.as_millis())]
    Timeout { operation: ReportOperation, timeout: Duration },

    #[error("pipeline engine {operation} produced output that is not valid UTF-8: {source}")]
    InvalidUtf8 {
        operation: ReportOperation,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("failed to collect pipeline engine output: {0}")]
    Io(#[from] std::io::Error),
}

/// `": <stderr>"`, else `": <stdout>"`, else nothing.
fn diagnostic_suffix(stderr: &str, stdout: &str) -> String {
    [stderr, stdout]
        .into_iter()
        .find(|text| !text.is_empty())
        .map(|text| format!(": {text}"))
        .unwrap_or_default()
}

impl EngineError {
    /// Stable machine-readable code for this failure class.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::Spawn { .. } => "ENGINE_SPAWN_FAILED",
            EngineError::Failed { .. } => "ENGINE_EXIT_NONZERO",
            EngineError::Terminated { .. } => "ENGINE_TERMINATED",
            EngineError::Timeout { .. } => "ENGINE_TIMEOUT",
            EngineError::InvalidUtf8 { .. } => "ENGINE_OUTPUT_NOT_UTF8",
            EngineError::Io(_) => "ENGINE_IO",
        }
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            EngineError::Failed { exit_code, .. } => Some(*exit_code),
            _ => None,
        }
    }

    /// Error output captured from the engine, when there was any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            EngineError::Failed { stderr, .. } | EngineError::Terminated { stderr, .. } if !stderr.is_empty() => Some(stderr.as_str()),
            _ => None,
        }
    }
}
