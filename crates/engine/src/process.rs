use crate::{EngineCommand, EngineError, PipelineEngine};
use ktl_reports_types::{Invocation, ReportOperation};
use ktl_reports_util::sanitize_diagnostic;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;
use tracing::{debug, warn};

/// Runs the external engine as a child process, one process per call.
#[derive(Debug, Clone)]
pub struct ProcessEngine {
    command: EngineCommand,
    working_directory: PathBuf,
    timeout: Option<Duration>,
}

impl ProcessEngine {
    /// Create an adapter whose processes always start in `working_directory`.
    pub fn new(command: EngineCommand, working_directory: impl Into<PathBuf>) -> Self {
        Self {
            command,
            working_directory: working_directory.into(),
            timeout: None,
        }
    }

    /// Bound each engine execution. `None` waits for the process to exit.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    async fn execute(&self, operation: ReportOperation, definition: &Path) -> Result<String, EngineError> {
        let invocation = Invocation::new(operation, definition, &self.working_directory);
        debug!(
            command = %self.command.render(&invocation),
            cwd = %invocation.working_directory.display(),
            "invoking pipeline engine"
        );

        let child = self.command.to_command(&invocation).spawn().map_err(|source| EngineError::Spawn {
            program: self.command.program().to_string(),
            source,
        })?;

        // Dropping the pending output future drops the child, which kills it.
        let output = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, child.wait_with_output())
                .await
                .map_err(|_| EngineError::Timeout { operation, timeout })??,
            None => child.wait_with_output().await?,
        };

        let result = decode_output(operation, output);
        if let Err(error) = &result {
            warn!(%operation, definition = %definition.display(), %error, "pipeline engine failed");
        }
        result
    }
}

#[async_trait::async_trait]
impl PipelineEngine for ProcessEngine {
    async fn describe(&self, definition: &Path) -> Result<String, EngineError> {
        self.execute(ReportOperation::Describe, definition).await
    }

    async fn run(&self, definition: &Path) -> Result<String, EngineError> {
        self.execute(ReportOperation::Run, definition).await
    }
}

fn decode_output(operation: ReportOperation, output: Output) -> Result<String, EngineError> {
    if !output.status.success() {
        let stderr = sanitize_diagnostic(&String::from_utf8_lossy(&output.stderr));
        return Err(match output.status.code() {
            Some(exit_code) => EngineError::Failed {
                operation,
                exit_code,
                stderr,
                stdout: sanitize_diagnostic(&String::from_utf8_lossy(&output.stdout)),
            },
            None => EngineError::Terminated { operation, stderr },
        });
    }

    String::from_utf8(output.stdout).map_err(|error| EngineError::InvalidUtf8 {
        operation,
        source: error.utf8_error(),
    })
}
