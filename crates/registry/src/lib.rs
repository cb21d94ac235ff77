//! Report catalog for the ktl report facade.
//!
//! The catalog is a directory whose `<prefix><name>` children each hold a
//! `pipeline.yaml`. Nothing is cached: every listing rereads the filesystem.

pub mod catalog;

pub use catalog::ReportCatalog;
pub use ktl_reports_types::{DEFAULT_REPORT_PREFIX, PIPELINE_FILE_NAME};
