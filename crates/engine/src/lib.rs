//! # ktl-reports engine
//!
//! The external pipeline engine is an opaque command-line tool with two
//! relevant sub-commands: `mcp describe <pipeline>` prints a report's
//! description and `run <pipeline>` prints its CSV output. This crate defines
//! the [`PipelineEngine`] port the facade programs against and
//! [`ProcessEngine`], the adapter that spawns the real tool.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ktl_reports_engine::{EngineCommand, PipelineEngine, ProcessEngine};
//! use std::path::Path;
//!
//! # async fn demo() -> Result<(), ktl_reports_engine::EngineError> {
//! let engine = ProcessEngine::new(EngineCommand::default(), "/srv/ktl");
//! let csv = engine.run(Path::new("pkg/e2e/testdata/mcp-pods/pipeline.yaml")).await?;
//! println!("{csv}");
//! # Ok(())
//! # }
//! ```
//!
//! Every call is a single synchronous engine execution: no retries, no
//! caching, and no state shared between calls.

mod command;
mod error;
mod process;

pub use command::EngineCommand;
pub use error::EngineError;
pub use process::ProcessEngine;

use std::path::Path;

/// Port to the external pipeline engine.
///
/// Implementations must not retry or recover; every failure is returned to
/// the caller as is.
#[async_trait::async_trait]
pub trait PipelineEngine: Send + Sync {
    /// Returns the engine's description of the pipeline, verbatim.
    async fn describe(&self, definition: &Path) -> Result<String, EngineError>;

    /// Executes the pipeline and returns its standard output, verbatim.
    async fn run(&self, definition: &Path) -> Result<String, EngineError>;
}
