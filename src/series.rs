//! Aligns per-process PSS values across a run of snapshots.
//!
//! Processes come and go between snapshots. The reconciler builds the union of
//! every process name seen (in first-seen order) and gives each name exactly
//! one value per snapshot, zero where the process was absent.

use ahash::{AHashMap as HashMap, AHashSet as HashSet};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::meminfo::{kb_to_mib, Snapshot};

/// OOM bucket charted as the foreground series.
pub const FOREGROUND_LABEL: &str = "Foreground";

/// How several same-named processes in one snapshot combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Only the first row with the name counts.
    #[default]
    First,
    /// All rows with the name are added up.
    Sum,
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "first" => Ok(DuplicatePolicy::First),
            "sum" => Ok(DuplicatePolicy::Sum),
            other => Err(format!(
                "Invalid duplicate_policy '{}', expected 'first' or 'sum'",
                other
            )),
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicatePolicy::First => f.write_str("first"),
            DuplicatePolicy::Sum => f.write_str("sum"),
        }
    }
}

/// PSS history of one process name, one entry per timeline position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessSeries {
    pub name: String,
    pub pss_kb: Vec<u64>,
}

impl ProcessSeries {
    pub fn peak_kb(&self) -> u64 {
        self.pss_kb.iter().copied().max().unwrap_or(0)
    }
}

/// System-wide series; `None` marks a snapshot lacking the source value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SystemSeries {
    pub free_ram_mib: Vec<Option<f64>>,
    pub used_ram_mib: Vec<Option<f64>>,
    pub foreground_mib: Vec<Option<f64>>,
}

/// Reconciled, read-only view of a sorted snapshot list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconciledSeries {
    /// Snapshot uptimes in seconds, ascending.
    pub timeline: Vec<u64>,
    pub per_process: Vec<ProcessSeries>,
    pub system: SystemSeries,
    pub duplicate_policy: DuplicatePolicy,
}

impl ReconciledSeries {
    pub fn len(&self) -> usize {
        self.timeline.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timeline.is_empty()
    }

    pub fn process(&self, name: &str) -> Option<&ProcessSeries> {
        self.per_process.iter().find(|s| s.name == name)
    }

    /// Timeline formatted as `H:MM:SS`.
    pub fn timeline_labels(&self) -> Vec<String> {
        self.timeline.iter().map(|&secs| format_hms(secs)).collect()
    }
}

/// Formats seconds as `H:MM:SS`; hours are not wrapped at 24.
pub fn format_hms(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours}:{minutes:02}:{seconds:02}")
}

/// Per-snapshot name → PSS lookup under `policy`.
fn index_processes(snapshot: &Snapshot, policy: DuplicatePolicy) -> HashMap<&str, u64> {
    let mut by_name: HashMap<&str, u64> = HashMap::with_capacity(snapshot.processes.len());
    for process in &snapshot.processes {
        match policy {
            DuplicatePolicy::First => {
                by_name.entry(process.name.as_str()).or_insert(process.pss_kb);
            }
            DuplicatePolicy::Sum => {
                *by_name.entry(process.name.as_str()).or_insert(0) += process.pss_kb;
            }
        }
    }
    by_name
}

/// Builds the reconciled series from snapshots already sorted by uptime.
///
/// Snapshots without an uptime cannot be placed on the timeline and are left
/// out.
pub fn reconcile(snapshots: &[Snapshot], policy: DuplicatePolicy) -> ReconciledSeries {
    let timed: Vec<&Snapshot> = snapshots.iter().filter(|s| s.uptime.is_some()).collect();
    if timed.len() != snapshots.len() {
        debug!(
            "Ignoring {} snapshot(s) without uptime",
            snapshots.len() - timed.len()
        );
    }

    // Universe of names in first-seen order.
    let mut universe: Vec<&str> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for snapshot in &timed {
        for process in &snapshot.processes {
            if seen.insert(process.name.as_str()) {
                universe.push(process.name.as_str());
            }
        }
    }

    let mut per_process: Vec<ProcessSeries> = universe
        .iter()
        .map(|name| ProcessSeries {
            name: name.to_string(),
            pss_kb: Vec::with_capacity(timed.len()),
        })
        .collect();
    let mut system = SystemSeries::default();
    let mut timeline = Vec::with_capacity(timed.len());

    for snapshot in &timed {
        timeline.push(snapshot.uptime.unwrap_or_default());

        let by_name = index_processes(snapshot, policy);
        for series in per_process.iter_mut() {
            series
                .pss_kb
                .push(by_name.get(series.name.as_str()).copied().unwrap_or(0));
        }

        system
            .free_ram_mib
            .push(snapshot.summary.free_ram.map(kb_to_mib));
        system
            .used_ram_mib
            .push(snapshot.summary.used_ram.map(kb_to_mib));
        system
            .foreground_mib
            .push(snapshot.oom_adj.get(FOREGROUND_LABEL).map(kb_to_mib));
    }

    debug!(
        "Reconciled {} snapshots into {} process series (policy: {})",
        timeline.len(),
        per_process.len(),
        policy
    );

    ReconciledSeries {
        timeline,
        per_process,
        system,
        duplicate_policy: policy,
    }
}
