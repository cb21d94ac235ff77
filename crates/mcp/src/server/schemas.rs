use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for tools that address a single report.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReportRequestParam {
    /// Short report name as returned by `list_reports`.
    #[schemars(description = "Name of the report, as listed by list_reports (for example: 'pods').")]
    pub name: String,
}
