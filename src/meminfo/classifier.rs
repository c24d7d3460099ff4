//! Decides which files in the input directory are meminfo reports.
//!
//! A file is parsed only when its first line is the report header; every other
//! file is skipped. An unreadable file is skipped with a warning instead of
//! failing the run.

use serde::Serialize;
use std::fmt;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

use crate::meminfo::patterns::REPORT_HEADER;

/// Why a candidate file was not parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    Empty,
    HeaderMismatch,
    Unreadable(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Empty => f.write_str("empty file"),
            SkipReason::HeaderMismatch => f.write_str("first line is not a meminfo header"),
            SkipReason::Unreadable(e) => write!(f, "unreadable: {e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Parse,
    Skip(SkipReason),
}

/// True when `first_line` is the report header, ignoring the line terminator,
/// trailing whitespace and a UTF-8 byte order mark.
pub fn is_report_header(first_line: &str) -> bool {
    let line = first_line.strip_prefix('\u{feff}').unwrap_or(first_line);
    line.trim_end() == REPORT_HEADER
}

/// Reads the first line of `path` and classifies the file.
pub fn classify_file(path: &Path) -> Verdict {
    let first_line = match read_first_line(path) {
        Ok(line) => line,
        Err(e) => {
            warn!("Skipping {}: {}", path.display(), e);
            return Verdict::Skip(SkipReason::Unreadable(e.to_string()));
        }
    };

    let verdict = match first_line {
        None => Verdict::Skip(SkipReason::Empty),
        Some(line) if is_report_header(&line) => Verdict::Parse,
        Some(_) => Verdict::Skip(SkipReason::HeaderMismatch),
    };
    debug!("Classified {}: {:?}", path.display(), verdict);
    verdict
}

fn read_first_line(path: &Path) -> Result<Option<String>, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let read = reader.read_until(b'\n', &mut buf)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}
