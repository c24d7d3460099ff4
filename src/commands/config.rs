//! Config command implementation.
//!
//! Generates configuration files in various formats.

use std::fs;
use std::path::PathBuf;

use dmanalyzer::cli::ConfigFormat;
use dmanalyzer::config::{render_config, Config};

/// Generates configuration files.
pub fn command_config(
    output: Option<PathBuf>,
    format: ConfigFormat,
    commented: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    let output = output.unwrap_or_else(|| PathBuf::from("dmanalyzer.yaml"));

    let mut content = render_config(&config, format)?;
    if commented && matches!(format, ConfigFormat::Yaml) {
        content = add_config_comments(content);
    }

    if output.to_string_lossy() == "-" {
        print!("{}", content);
    } else {
        fs::write(&output, content)?;
        println!("✅ Configuration written to: {}", output.display());
    }

    Ok(())
}

/// Adds comments to YAML configuration.
fn add_config_comments(yaml: String) -> String {
    let comments = r#"# dmanalyzer Configuration
# ========================
#
# Output
# ------
# output: "dmanalyzer.html"    # Chart file
# json_output: null            # Also write the reconciled series as JSON
# chart_title: "Android memory usage (PSS)"
#
# Reconciliation
# --------------
# duplicate_policy: "first"    # Same-named processes in one snapshot:
#                              #   first = only the first row counts
#                              #   sum   = rows are added up
#
# Series Selection
# ----------------
# include_names: null          # Chart only names containing one of these
# exclude_names: null          # Never chart names containing one of these
# top_n: null                  # Chart only the N processes with highest peak PSS
# enable_system_series: true   # Free/used RAM and foreground PSS lines
#
# Performance Tuning
# ------------------
# parallelism: null            # Parsing threads (null = auto)
#
# Logging
# -------
# log_level: "info"            # off, error, warn, info, debug, trace
"#;

    format!("{comments}\n{yaml}")
}
