//! Value parsers for the numeric fragments of a meminfo report.
//!
//! dumpsys prints kilobyte counts with thousands separators (`12,345K`), so
//! every number goes through [`parse_grouped_int`] before it reaches a struct.

/// Parses a comma-grouped integer such as `"102,400"`.
///
/// Separators are stripped without checking their placement; dumpsys never
/// emits misplaced ones and the section regexes already restrict the input to
/// `[0-9,]+`.
pub fn parse_grouped_int(v: &str) -> Option<u64> {
    let digits: String = v.trim().chars().filter(|&c| c != ',').collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Converts kilobytes to MiB for charting.
pub fn kb_to_mib(kb: u64) -> f64 {
    kb as f64 / 1024.0
}
