//! Invocation bridge between catalog names and the pipeline engine.

use ktl_reports_engine::{EngineError, PipelineEngine};
use ktl_reports_registry::ReportCatalog;
use ktl_reports_types::ReportOperation;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

const LISTING_HEADER: &str = "Available reports:";
const LISTING_HINT: &str = "Use the 'report' tool to generate";

/// An engine-backed report operation that did not produce output.
#[derive(Debug, Error)]
#[error("report '{name}' {operation} failed: {source}")]
pub struct BridgeError {
    pub name: String,
    pub operation: ReportOperation,
    pub definition_path: PathBuf,
    #[source]
    pub source: EngineError,
}

/// Resolves report names and shapes engine output for the calling agent.
///
/// Holds no per-call state; the catalog is re-read on every listing and each
/// engine-backed call is a fresh engine execution.
#[derive(Clone)]
pub struct ReportBridge {
    catalog: ReportCatalog,
    engine: Arc<dyn PipelineEngine>,
}

impl ReportBridge {
    pub fn new(catalog: ReportCatalog, engine: Arc<dyn PipelineEngine>) -> Self {
        Self { catalog, engine }
    }

    pub fn catalog(&self) -> &ReportCatalog {
        &self.catalog
    }

    /// Formatted catalog listing: header, one `- <name>` line per report, hint.
    pub fn list_reports(&self) -> String {
        format_listing(&self.catalog.list_names())
    }

    /// The engine's description of a report, unmodified.
    pub async fn describe_report(&self, name: &str) -> Result<String, BridgeError> {
        let definition_path = self.catalog.resolve(name);
        self.engine
            .describe(&definition_path)
            .await
            .map_err(|source| BridgeError {
                name: name.to_string(),
                operation: ReportOperation::Describe,
                definition_path,
                source,
            })
    }

    /// Runs a report and prefixes its CSV with a provenance tag.
    pub async fn report(&self, name: &str) -> Result<String, BridgeError> {
        let definition_path = self.catalog.resolve(name);
        let content = self
            .engine
            .run(&definition_path)
            .await
            .map_err(|source| BridgeError {
                name: name.to_string(),
                operation: ReportOperation::Run,
                definition_path,
                source,
            })?;
        debug!(report = name, bytes = content.len(), "report generated");
        Ok(wrap_with_provenance(name, &content))
    }
}

/// Header, entry block, and hint joined by newlines.
///
/// An empty catalog leaves the entry block empty, so the header and hint are
/// separated by a blank line.
pub fn format_listing(names: &[String]) -> String {
    let entries = names.iter().map(|name| format!("- {name}")).collect::<Vec<String>>().join("\n");
    [LISTING_HEADER, entries.as_str(), LISTING_HINT].join("\n")
}

/// `<source><name>.csv</source>` immediately followed by `content`.
pub fn wrap_with_provenance(name: &str, content: &str) -> String {
    format!("<source>{name}.csv</source>{content}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingEngine;
    use std::fs;
    use std::path::Path;

    fn bridge_with(engine: RecordingEngine, reports: &[&str]) -> (tempfile::TempDir, ReportBridge, Arc<RecordingEngine>) {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        for report in reports {
            let report_dir = temp_dir.path().join(format!("mcp-{report}"));
            fs::create_dir_all(&report_dir).expect("create report dir");
            fs::write(report_dir.join("pipeline.yaml"), "kind: Pipeline\n").expect("write pipeline");
        }
        let engine = Arc::new(engine);
        let bridge = ReportBridge::new(ReportCatalog::new(temp_dir.path(), "mcp-"), engine.clone());
        (temp_dir, bridge, engine)
    }

    #[test]
    fn listing_format_matches_contract() {
        let names = vec!["nodes".to_string(), "pods".to_string()];
        assert_eq!(
            format_listing(&names),
            "Available reports:\n- nodes\n- pods\nUse the 'report' tool to generate"
        );
    }

    #[test]
    fn empty_listing_keeps_header_and_hint() {
        let listing = format_listing(&[]);
        assert_eq!(listing, "Available reports:\n\nUse the 'report' tool to generate");
        assert!(!listing.contains("- "));
    }

    #[test]
    fn provenance_tag_is_adjacent_to_content() {
        assert_eq!(
            wrap_with_provenance("pods", "name\nweb-0\n"),
            "<source>pods.csv</source>name\nweb-0\n"
        );
        assert_eq!(wrap_with_provenance("pods", ""), "<source>pods.csv</source>");
    }

    #[test]
    fn list_reports_reads_catalog() {
        let (_temp_dir, bridge, engine) = bridge_with(RecordingEngine::default(), &["pods"]);
        let listing = bridge.list_reports();
        assert!(listing.lines().any(|line| line == "- pods"), "listing: {listing}");
        assert!(engine.calls().is_empty());
    }

    #[tokio::test]
    async fn report_wraps_engine_output() {
        let engine = RecordingEngine::default().with_run_output("name,namespace\nweb-0,default\n");
        let (temp_dir, bridge, engine) = bridge_with(engine, &["pods"]);

        let output = bridge.report("pods").await.expect("report");
        assert_eq!(output, "<source>pods.csv</source>name,namespace\nweb-0,default\n");

        let expected_path = temp_dir.path().join("mcp-pods").join("pipeline.yaml");
        assert_eq!(engine.calls(), vec![(ReportOperation::Run, expected_path)]);
    }

    #[tokio::test]
    async fn describe_returns_engine_text_verbatim() {
        let engine = RecordingEngine::default().with_describe_output("Pods report\n\nColumns:\n- name: Pod name\n");
        let (temp_dir, bridge, engine) = bridge_with(engine, &["pods"]);

        let output = bridge.describe_report("pods").await.expect("describe");
        assert_eq!(output, "Pods report\n\nColumns:\n- name: Pod name\n");
        assert_eq!(
            engine.calls(),
            vec![(ReportOperation::Describe, temp_dir.path().join("mcp-pods/pipeline.yaml"))]
        );
    }

    #[tokio::test]
    async fn unknown_report_fails_both_operations() {
        let (_temp_dir, bridge, _engine) = bridge_with(RecordingEngine::default(), &["pods"]);

        let describe_error = bridge.describe_report("missing").await.expect_err("describe should fail");
        assert_eq!(describe_error.operation, ReportOperation::Describe);
        assert!(describe_error.definition_path.ends_with(Path::new("mcp-missing/pipeline.yaml")));

        let run_error = bridge.report("missing").await.expect_err("report should fail");
        assert_eq!(run_error.operation, ReportOperation::Run);
        assert_eq!(run_error.name, "missing");
        assert!(run_error.to_string().starts_with("report 'missing' run failed:"));
    }
}
