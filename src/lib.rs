//! dmanalyzer library
//!
//! Turns a directory of Android `dumpsys meminfo` text reports into a
//! time-aligned dataset and a chart of per-process memory over time.
//!
//! # Pipeline
//!
//! 1. [`batch::collect_candidate_files`] lists the input directory.
//! 2. [`meminfo::classify_file`] keeps files whose first line is the report header.
//! 3. [`meminfo::read_snapshot`] parses each report into a [`meminfo::Snapshot`].
//! 4. [`batch::load_snapshots`] runs 2-3 per file and sorts the result by uptime.
//! 5. [`series::reconcile`] aligns every process name across all snapshots.
//! 6. [`render::build_chart`] and a [`render::SeriesRenderer`] produce the report.
//!
//! # Usage
//!
//! ```rust
//! use dmanalyzer::meminfo::parse_snapshot;
//! use dmanalyzer::series::{reconcile, DuplicatePolicy};
//! use std::path::Path;
//!
//! let text = "Applications Memory Usage (in Killobytes):
//! Uptime: 60 Realtime: 60
//!
//! Total PSS by process:
//!     1,234K: com.example.app (pid 567)
//! ";
//! let snapshot = parse_snapshot(Path::new("meminfo.txt"), text).unwrap();
//! let series = reconcile(&[snapshot], DuplicatePolicy::First);
//! assert_eq!(series.process("com.example.app").unwrap().pss_kb, vec![1234]);
//! ```

pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod meminfo;
pub mod render;
pub mod report;
pub mod series;

// Re-export main types for convenience
pub use batch::{collect_candidate_files, load_snapshots, BatchReport};
pub use error::{AnalyzerError, ParseError, Section};
pub use meminfo::{Process, Snapshot, Summary};
pub use report::{generate_report, ReportSummary};
pub use series::{reconcile, DuplicatePolicy, ReconciledSeries};
