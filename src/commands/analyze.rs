//! Analyze command implementation.
//!
//! The default run: ingest a snapshot directory and write the chart.

use std::path::Path;

use dmanalyzer::config::Config;
use dmanalyzer::generate_report;

/// Generates the report for `dir` and prints a run summary.
pub fn command_analyze(dir: &Path, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("📂 Reading snapshots from {}", dir.display());

    let summary = generate_report(dir, config)?;

    println!(
        "   📊 {} snapshot(s), {} process name(s), {} series charted",
        summary.snapshots, summary.processes, summary.charted_series
    );

    if !summary.skipped.is_empty() {
        println!("   ⏭️  Skipped {} file(s):", summary.skipped.len());
        for skipped in &summary.skipped {
            println!("      ├─ {}: {}", skipped.path.display(), skipped.reason);
        }
    }
    if !summary.failed.is_empty() {
        println!("   ❌ Failed {} file(s):", summary.failed.len());
        for failed in &summary.failed {
            println!("      ├─ {}", failed.error);
        }
    }

    println!("✅ Chart written to {}", summary.output.display());
    if let Some(json) = &summary.json_output {
        println!("✅ Series written to {}", json.display());
    }
    Ok(())
}
