//! Inspect command implementation.
//!
//! Parses one file and prints the recognized snapshot, which is the quickest
//! way to see why a report is skipped or rejected.

use std::path::Path;

use dmanalyzer::cli::ConfigFormat;
use dmanalyzer::meminfo::{classify_file, read_snapshot, Verdict};

/// Classifies and parses `file`, printing the snapshot in `format`.
pub fn command_inspect(file: &Path, format: ConfigFormat) -> Result<(), Box<dyn std::error::Error>> {
    if let Verdict::Skip(reason) = classify_file(file) {
        eprintln!("❌ {} is not a meminfo report: {}", file.display(), reason);
        std::process::exit(1);
    }

    let snapshot = match read_snapshot(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(&snapshot)?,
        ConfigFormat::Toml => toml::to_string_pretty(&snapshot)?,
        ConfigFormat::Yaml => serde_yaml::to_string(&snapshot)?,
    };
    println!("{output}");

    if snapshot.uptime.is_none() {
        eprintln!("⚠️  No 'Uptime:' line: this snapshot would be left out of the chart");
    }
    Ok(())
}
