//! End-to-end report generation: directory in, chart file out.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::batch::{collect_candidate_files, load_snapshots, FailedFile, SkippedFile};
use crate::config::Config;
use crate::render::{build_chart, export_json, HtmlRenderer, SeriesRenderer};
use crate::series::reconcile;

/// What a report run produced and what it left out.
#[derive(Debug)]
pub struct ReportSummary {
    pub files_seen: usize,
    pub snapshots: usize,
    pub processes: usize,
    pub charted_series: usize,
    pub skipped: Vec<SkippedFile>,
    pub failed: Vec<FailedFile>,
    pub output: PathBuf,
    pub json_output: Option<PathBuf>,
}

/// Reads every snapshot in `dir` and writes the configured report files.
///
/// Per-file problems end up in the summary; only an unreadable `dir` or a
/// failed write is an error. An empty snapshot set still yields a report.
pub fn generate_report(dir: &Path, config: &Config) -> Result<ReportSummary> {
    let files = collect_candidate_files(dir)
        .with_context(|| format!("Cannot list snapshot directory {}", dir.display()))?;
    info!("Found {} candidate file(s) in {}", files.len(), dir.display());

    let batch = load_snapshots(&files);
    if batch.snapshots.is_empty() {
        warn!("No usable snapshots in {}; the chart will be empty", dir.display());
    }

    let series = reconcile(&batch.snapshots, config.duplicate_policy());
    let chart = build_chart(&series, &config.chart_options());

    let output = config.output_path();
    let html = HtmlRenderer::new()
        .render(&chart)
        .context("Failed to render chart")?;
    fs::write(&output, html)
        .with_context(|| format!("Failed to write chart to {}", output.display()))?;
    info!("Chart written to {}", output.display());

    if let Some(json_path) = &config.json_output {
        let json = export_json(&series).context("Failed to serialize series")?;
        fs::write(json_path, json)
            .with_context(|| format!("Failed to write series to {}", json_path.display()))?;
        info!("Series written to {}", json_path.display());
    }

    Ok(ReportSummary {
        files_seen: files.len(),
        snapshots: series.len(),
        processes: series.per_process.len(),
        charted_series: chart.series.len(),
        skipped: batch.skipped,
        failed: batch.failed,
        output,
        json_output: config.json_output.clone(),
    })
}
