//! In-memory pipeline engine for tests.

use async_trait::async_trait;
use ktl_reports_engine::{EngineError, PipelineEngine};
use ktl_reports_types::ReportOperation;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Records every call and fails like the real engine when the definition
/// file does not exist.
#[derive(Debug, Default)]
pub(crate) struct RecordingEngine {
    describe_output: String,
    run_output: String,
    calls: Mutex<Vec<(ReportOperation, PathBuf)>>,
}

impl RecordingEngine {
    pub(crate) fn with_describe_output(mut self, output: &str) -> Self {
        self.describe_output = output.to_string();
        self
    }

    pub(crate) fn with_run_output(mut self, output: &str) -> Self {
        self.run_output = output.to_string();
        self
    }

    pub(crate) fn calls(&self) -> Vec<(ReportOperation, PathBuf)> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    fn respond(&self, operation: ReportOperation, definition: &Path, output: &str) -> Result<String, EngineError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((operation, definition.to_path_buf()));
        }
        if !definition.is_file() {
            return Err(EngineError::Failed {
                operation,
                exit_code: 1,
                stderr: format!("open {}: no such file or directory", definition.display()),
                stdout: String::new(),
            });
        }
        Ok(output.to_string())
    }
}

#[async_trait]
impl PipelineEngine for RecordingEngine {
    async fn describe(&self, definition: &Path) -> Result<String, EngineError> {
        self.respond(ReportOperation::Describe, definition, &self.describe_output)
    }

    async fn run(&self, definition: &Path) -> Result<String, EngineError> {
        self.respond(ReportOperation::Run, definition, &self.run_output)
    }
}
