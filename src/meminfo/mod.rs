//! Parsing of Android `dumpsys meminfo` reports.
//!
//! This module provides:
//! - `values`: comma-grouped integer parsing
//! - `patterns`: section markers and compiled line patterns
//! - `sections`: per-line parsers for each report section
//! - `snapshot`: the snapshot model and the report parser
//! - `classifier`: header check deciding which files are reports

pub mod classifier;
pub mod patterns;
pub mod sections;
pub mod snapshot;
pub mod values;

// Re-export commonly used types
pub use classifier::{classify_file, is_report_header, SkipReason, Verdict};
pub use patterns::REPORT_HEADER;
pub use snapshot::{parse_snapshot, read_snapshot, Process, PssTable, Snapshot, SnapshotParser, Summary};
pub use values::{kb_to_mib, parse_grouped_int};
