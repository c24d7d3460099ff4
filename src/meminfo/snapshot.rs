//! Snapshot data model and the line-oriented report parser.
//!
//! A report is read in a single pass. [`SnapshotParser`] keeps a small state
//! machine: while idle it looks for one of five leading markers, and on a match
//! it enters the matching section until that section's terminator (a blank
//! line, or end of input for the RAM summary) puts it back to idle.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{AnalyzerError, ParseError, Section};
use crate::meminfo::patterns::{LEAD_CATEGORY, LEAD_OOM, LEAD_PROCESS, LEAD_SUMMARY, LEAD_TIME};
use crate::meminfo::sections::{
    apply_summary_line, parse_category_line, parse_oom_line, parse_process_line, parse_time_line,
};

/// One memory-accounted process of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Process {
    pub pss_kb: u64,
    pub name: String,
    pub pid: u32,
}

/// Label → PSS (KB) table that keeps file order.
///
/// Re-inserting an existing label overwrites its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PssTable {
    entries: Vec<(String, u64)>,
}

impl PssTable {
    pub fn insert(&mut self, label: String, pss_kb: u64) {
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some(entry) => entry.1 = pss_kb,
            None => self.entries.push((label, pss_kb)),
        }
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(l, v)| (l.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for PssTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, pss_kb) in &self.entries {
            map.serialize_entry(label, pss_kb)?;
        }
        map.end()
    }
}

/// `Total RAM:` block. Each field is set only if its line matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[serde(rename = "FreeRAM")]
    pub free_ram: Option<u64>,
    pub cached_pss: Option<u64>,
    pub cached_kernel: Option<u64>,
    pub free: Option<u64>,
    #[serde(rename = "UsedRAM")]
    pub used_ram: Option<u64>,
    pub used_pss: Option<u64>,
    pub kernel: Option<u64>,
}

/// One parsed `dumpsys meminfo` report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub source: PathBuf,
    /// Seconds since boot; `None` when the report had no `Uptime:` line.
    pub uptime: Option<u64>,
    pub realtime: Option<u64>,
    pub processes: Vec<Process>,
    pub oom_adj: PssTable,
    pub category: PssTable,
    pub summary: Summary,
}

impl Snapshot {
    /// Rejects a snapshot that cannot be placed on the timeline.
    pub fn require_uptime(self) -> Result<Snapshot, AnalyzerError> {
        if self.uptime.is_none() {
            return Err(AnalyzerError::IncompleteSnapshot { path: self.source });
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    InProcessTable,
    InOomTable,
    InCategoryTable,
    InSummary,
}

/// Incremental report parser; feed it lines in file order.
pub struct SnapshotParser {
    state: State,
    snapshot: Snapshot,
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

impl SnapshotParser {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            state: State::Idle,
            snapshot: Snapshot {
                source: source.into(),
                ..Snapshot::default()
            },
        }
    }

    fn error(&self, line_number: usize, line: &str, section: Section) -> ParseError {
        ParseError {
            file: self.snapshot.source.clone(),
            line_number,
            raw_line: line.to_string(),
            section,
        }
    }

    /// Consumes one line. `line_number` is 1-based and only used for errors.
    pub fn feed_line(&mut self, line_number: usize, line: &str) -> Result<(), ParseError> {
        let state = self.state;
        self.state = match state {
            State::Idle => self.dispatch(line_number, line)?,
            _ if is_blank(line) => {
                debug!("Leaving {:?} at line {}", state, line_number);
                State::Idle
            }
            State::InProcessTable => match parse_process_line(line) {
                Some(process) => {
                    self.snapshot.processes.push(process);
                    State::InProcessTable
                }
                None => return Err(self.error(line_number, line, Section::ProcessTable)),
            },
            State::InOomTable => {
                if let Some((label, pss_kb)) = parse_oom_line(line) {
                    self.snapshot.oom_adj.insert(label, pss_kb);
                }
                State::InOomTable
            }
            State::InCategoryTable => {
                if let Some((label, pss_kb)) = parse_category_line(line) {
                    self.snapshot.category.insert(label, pss_kb);
                }
                State::InCategoryTable
            }
            State::InSummary => {
                apply_summary_line(line, &mut self.snapshot.summary);
                State::InSummary
            }
        };
        Ok(())
    }

    fn dispatch(&mut self, line_number: usize, line: &str) -> Result<State, ParseError> {
        let next = if line.starts_with(LEAD_TIME) {
            let (uptime, realtime) = parse_time_line(line)
                .ok_or_else(|| self.error(line_number, line, Section::Time))?;
            self.snapshot.uptime = Some(uptime);
            self.snapshot.realtime = Some(realtime);
            State::Idle
        } else if line.starts_with(LEAD_PROCESS) {
            self.snapshot.processes.clear();
            State::InProcessTable
        } else if line.starts_with(LEAD_OOM) {
            self.snapshot.oom_adj = PssTable::default();
            State::InOomTable
        } else if line.starts_with(LEAD_CATEGORY) {
            self.snapshot.category = PssTable::default();
            State::InCategoryTable
        } else if line.starts_with(LEAD_SUMMARY) {
            self.snapshot.summary = Summary::default();
            State::InSummary
        } else {
            State::Idle
        };

        if next != State::Idle {
            debug!("Entering {:?} at line {}", next, line_number);
        }
        Ok(next)
    }

    /// Ends the parse. End of input also terminates an open section.
    pub fn finish(self) -> Snapshot {
        self.snapshot
    }
}

/// Parses report text already in memory. `source` is used for error reports.
pub fn parse_snapshot(source: &Path, text: &str) -> Result<Snapshot, ParseError> {
    let mut parser = SnapshotParser::new(source);
    for (idx, line) in text.lines().enumerate() {
        // `lines` leaves the '\r' on a final CRLF line without a newline
        let line = line.strip_suffix('\r').unwrap_or(line);
        parser.feed_line(idx + 1, line)?;
    }
    let snapshot = parser.finish();
    debug!(
        "Parsed {}: uptime={:?}, {} processes, {} OOM buckets, {} categories",
        source.display(),
        snapshot.uptime,
        snapshot.processes.len(),
        snapshot.oom_adj.len(),
        snapshot.category.len()
    );
    Ok(snapshot)
}

/// Reads and parses one report file.
///
/// Invalid UTF-8 is replaced rather than rejected; such bytes never occur in
/// the lines the parser cares about.
pub fn read_snapshot(path: &Path) -> Result<Snapshot, AnalyzerError> {
    let bytes = fs::read(path).map_err(|e| AnalyzerError::io(path, e))?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(parse_snapshot(path, &text)?)
}
