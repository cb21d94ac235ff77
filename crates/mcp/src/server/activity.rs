//! Per-report call accounting shared by every session of a running server.

use ktl_reports_types::ReportOperation;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};
use tracing::info;

/// Counters for one report name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportCounters {
    pub describes: u64,
    pub runs: u64,
    pub failures: u64,
}

/// Engine-backed calls seen so far, keyed by report name.
///
/// Listing is local and leaves no trace here.
#[derive(Debug, Default)]
pub struct ReportActivity {
    reports: Mutex<BTreeMap<String, ReportCounters>>,
}

impl ReportActivity {
    pub fn record(&self, operation: ReportOperation, report: &str, succeeded: bool) {
        if !operation.is_engine_backed() {
            return;
        }
        let mut reports = self.reports.lock().unwrap_or_else(PoisonError::into_inner);
        let counters = reports.entry(report.to_string()).or_default();
        match operation {
            ReportOperation::Describe => counters.describes += 1,
            ReportOperation::Run => counters.runs += 1,
            ReportOperation::List => {}
        }
        if !succeeded {
            counters.failures += 1;
        }
    }

    /// Reports in name order with their counters.
    pub fn snapshot(&self) -> BTreeMap<String, ReportCounters> {
        self.reports.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// One `info` event per report touched during the session.
    pub fn log_summary(&self) {
        let snapshot = self.snapshot();
        if snapshot.is_empty() {
            info!("no reports were described or generated");
            return;
        }
        for (report, counters) in snapshot {
            info!(
                report = %report,
                describes = counters.describes,
                runs = counters.runs,
                failures = counters.failures,
                "report activity"
            );
        }
    }
}
