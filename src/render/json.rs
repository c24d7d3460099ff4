//! JSON export of the reconciled series for external tooling.

use serde::Serialize;

use crate::series::{ProcessSeries, ReconciledSeries, SystemSeries};

#[derive(Serialize)]
struct ExportDocument<'a> {
    version: &'static str,
    duplicate_policy: String,
    timeline: &'a [u64],
    timeline_labels: Vec<String>,
    per_process: &'a [ProcessSeries],
    system: &'a SystemSeries,
}

/// Serializes `series` as pretty-printed JSON. Absent system values are `null`.
pub fn export_json(series: &ReconciledSeries) -> Result<String, serde_json::Error> {
    let doc = ExportDocument {
        version: env!("CARGO_PKG_VERSION"),
        duplicate_policy: series.duplicate_policy.to_string(),
        timeline: &series.timeline,
        timeline_labels: series.timeline_labels(),
        per_process: &series.per_process,
        system: &series.system,
    };
    serde_json::to_string_pretty(&doc)
}
