//! CLI arguments and subcommands for dmanalyzer.
//!
//! This module defines the command-line interface structure using the clap library,
//! including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Configuration format options for output
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "dmanalyzer",
    about = "Chart per-process memory trends from Android dumpsys meminfo snapshots",
    long_about = "Chart per-process memory trends from Android dumpsys meminfo snapshots.\n\n\
                  Reads every `dumpsys meminfo` report in DIR, orders the reports by device \
                  uptime and writes a self-contained HTML chart with one PSS line per process \
                  plus free/used RAM and foreground PSS.",
    version,
    propagate_version = true,
    args_conflicts_with_subcommands = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory containing dumpsys meminfo snapshots
    pub dir: Option<PathBuf>,

    /// Output HTML file
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Also write the reconciled series as JSON to this file
    #[arg(long)]
    pub json_output: Option<PathBuf>,

    /// How same-named processes in one snapshot combine: first | sum
    #[arg(long)]
    pub duplicate_policy: Option<String>,

    /// Chart only processes matching these names (comma-separated substrings)
    #[arg(long)]
    pub include_names: Option<String>,

    /// Do not chart processes matching these names (comma-separated substrings)
    #[arg(long)]
    pub exclude_names: Option<String>,

    /// Chart only the N processes with the highest peak PSS
    #[arg(long)]
    pub top_n: Option<usize>,

    /// Leave free/used RAM and foreground series out of the chart
    #[arg(long)]
    pub no_system_series: bool,

    /// Parallel parsing threads (0 = auto)
    #[arg(long)]
    pub parallelism: Option<usize>,

    /// Log level [default: info]
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a single snapshot file and print what was recognized
    Inspect {
        /// Snapshot file
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,
    },

    /// Generate configuration files
    Config {
        /// Output file path ("-" for stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,

        /// Include comments and examples
        #[arg(long)]
        commented: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_single_positional_dir() {
        let args = Args::try_parse_from(["dmanalyzer", "logs"]).unwrap();
        assert_eq!(args.dir, Some(PathBuf::from("logs")));
        assert!(args.command.is_none());
    }

    #[test]
    fn test_extra_positional_is_rejected() {
        assert!(Args::try_parse_from(["dmanalyzer", "logs", "more"]).is_err());
    }

    #[test]
    fn test_inspect_subcommand() {
        let args = Args::try_parse_from(["dmanalyzer", "inspect", "a.txt", "--format", "json"])
            .unwrap();
        assert!(args.dir.is_none());
        assert!(matches!(
            args.command,
            Some(Commands::Inspect {
                format: ConfigFormat::Json,
                ..
            })
        ));
    }
}
