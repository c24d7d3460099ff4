//! Error types for snapshot ingestion.
//!
//! Every per-file failure is local to that file: the batch driver reports it
//! and keeps going. Only [`AnalyzerError::Usage`] ends a run.

use std::fmt;
use std::path::PathBuf;

/// Report section a line was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Section {
    Time,
    ProcessTable,
    OomTable,
    CategoryTable,
    Summary,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Time => "uptime",
            Section::ProcessTable => "process table",
            Section::OomTable => "OOM adjustment table",
            Section::CategoryTable => "category table",
            Section::Summary => "RAM summary",
        };
        f.write_str(name)
    }
}

/// A line inside a strict section did not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}:{line_number}: malformed {section} line: {raw_line:?}", .file.display())]
pub struct ParseError {
    pub file: PathBuf,
    /// 1-based line number within `file`.
    pub line_number: usize,
    pub raw_line: String,
    pub section: Section,
}

#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("{} has no 'Uptime:' line and cannot be placed on the timeline", .path.display())]
    IncompleteSnapshot { path: PathBuf },

    #[error("{0}")]
    Usage(String),

    #[error("Failed to draw chart: {0}")]
    Render(String),
}

impl AnalyzerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalyzerError::Io {
            path: path.into(),
            source,
        }
    }
}
