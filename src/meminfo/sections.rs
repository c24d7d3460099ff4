//! Per-line parsers for each report section.
//!
//! Each function looks at one line and returns `None` when the line does not
//! have the section's shape. Whether that is an error or noise is decided by
//! the snapshot parser, not here.

use regex::Captures;

use crate::meminfo::patterns::{
    CATEGORY_RE, FREE_RAM_RE, OOM_RE, PROCESS_RE, TIME_RE, USED_RAM_RE,
};
use crate::meminfo::snapshot::{Process, Summary};
use crate::meminfo::values::parse_grouped_int;

fn grouped(caps: &Captures<'_>, idx: usize) -> Option<u64> {
    parse_grouped_int(caps.get(idx)?.as_str())
}

/// Extracts `(uptime, realtime)` from `Uptime: <n> Realtime: <n>`.
pub fn parse_time_line(line: &str) -> Option<(u64, u64)> {
    let caps = TIME_RE.captures(line)?;
    let uptime = caps.get(1)?.as_str().parse().ok()?;
    let realtime = caps.get(2)?.as_str().parse().ok()?;
    Some((uptime, realtime))
}

/// Parses a process-table row. The `/ activities` suffix is accepted and dropped.
pub fn parse_process_line(line: &str) -> Option<Process> {
    let caps = PROCESS_RE.captures(line)?;
    Some(Process {
        pss_kb: grouped(&caps, 1)?,
        name: caps.get(2)?.as_str().to_string(),
        pid: caps.get(3)?.as_str().parse().ok()?,
    })
}

/// Parses an OOM-adjustment row; the label has no whitespace.
pub fn parse_oom_line(line: &str) -> Option<(String, u64)> {
    let caps = OOM_RE.captures(line)?;
    Some((caps.get(2)?.as_str().to_string(), grouped(&caps, 1)?))
}

/// Parses a category row; the label is the rest of the line.
pub fn parse_category_line(line: &str) -> Option<(String, u64)> {
    let caps = CATEGORY_RE.captures(line)?;
    Some((caps.get(2)?.as_str().to_string(), grouped(&caps, 1)?))
}

/// Applies a `Free RAM:` or `Used RAM:` line to `summary`.
///
/// Returns `false` when the line is neither.
pub fn apply_summary_line(line: &str, summary: &mut Summary) -> bool {
    if let Some(caps) = FREE_RAM_RE.captures(line) {
        summary.free_ram = grouped(&caps, 1);
        summary.cached_pss = grouped(&caps, 2);
        summary.cached_kernel = grouped(&caps, 3);
        summary.free = grouped(&caps, 4);
        return true;
    }
    if let Some(caps) = USED_RAM_RE.captures(line) {
        summary.used_ram = grouped(&caps, 1);
        summary.used_pss = grouped(&caps, 2);
        summary.kernel = grouped(&caps, 3);
        return true;
    }
    false
}
