//! Shared type definitions for the ktl report facade.
//!
//! These types describe a report invocation without performing one: the
//! catalog computes paths, the engine adapter executes, and both agree on the
//! vocabulary defined here.

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

/// File name of the pipeline definition inside every report directory.
pub const PIPELINE_FILE_NAME: &str = "pipeline.yaml";

/// Literal prefix that marks a catalog-root entry as a report directory.
pub const DEFAULT_REPORT_PREFIX: &str = "mcp-";

/// Catalog root relative to the facade root when nothing else is configured.
pub const DEFAULT_CATALOG_DIR: &str = "pkg/e2e/testdata";

/// Operations exposed to the calling agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportOperation {
    /// Enumerate the catalog. Computed locally, never reaches the engine.
    List,
    /// Ask the engine for a report's description.
    Describe,
    /// Ask the engine to execute a report and emit CSV.
    Run,
}

impl ReportOperation {
    /// Whether the operation spawns the external engine.
    pub fn is_engine_backed(&self) -> bool {
        !matches!(self, ReportOperation::List)
    }

    /// Engine sub-command arguments preceding the definition path.
    pub fn engine_arguments(&self) -> &'static [&'static str] {
        match self {
            ReportOperation::List => &[],
            ReportOperation::Describe => &["mcp", "describe"],
            ReportOperation::Run => &["run"],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportOperation::List => "list",
            ReportOperation::Describe => "describe",
            ReportOperation::Run => "run",
        }
    }
}

impl fmt::Display for ReportOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single synchronous call to the external engine.
///
/// Constructed per call and dropped when the call returns. The working
/// directory is always the facade root so the engine sees a stable relative
/// context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    pub operation: ReportOperation,
    pub definition_path: PathBuf,
    pub working_directory: PathBuf,
}

impl Invocation {
    pub fn new(operation: ReportOperation, definition_path: impl Into<PathBuf>, working_directory: impl Into<PathBuf>) -> Self {
        Self {
            operation,
            definition_path: definition_path.into(),
            working_directory: working_directory.into(),
        }
    }

    /// Sub-command arguments followed by the definition path.
    pub fn arguments(&self) -> Vec<OsString> {
        self.operation
            .engine_arguments()
            .iter()
            .map(OsString::from)
            .chain(std::iter::once(self.definition_path.clone().into_os_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_arguments_use_mcp_subcommand() {
        let invocation = Invocation::new(ReportOperation::Describe, "/srv/catalog/mcp-pods/pipeline.yaml", "/srv");
        assert_eq!(
            invocation.arguments(),
            vec![
                OsString::from("mcp"),
                OsString::from("describe"),
                OsString::from("/srv/catalog/mcp-pods/pipeline.yaml"),
            ]
        );
    }

    #[test]
    fn run_arguments_use_run_subcommand() {
        let invocation = Invocation::new(ReportOperation::Run, "catalog/mcp-nodes/pipeline.yaml", ".");
        assert_eq!(
            invocation.arguments(),
            vec![OsString::from("run"), OsString::from("catalog/mcp-nodes/pipeline.yaml")]
        );
    }

    #[test]
    fn list_is_local_only() {
        assert!(!ReportOperation::List.is_engine_backed());
        assert!(ReportOperation::Describe.is_engine_backed());
        assert!(ReportOperation::Run.is_engine_backed());
    }

    #[test]
    fn operation_serializes_as_snake_case() {
        let value = serde_json::to_value(ReportOperation::Describe).unwrap();
        assert_eq!(value, serde_json::json!("describe"));
    }
}
