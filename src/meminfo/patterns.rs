//! Leading markers and line patterns of a `dumpsys meminfo` report.
//!
//! The regexes are compiled once on first use and shared read-only by every
//! parse, including the parallel ones in the batch driver.

use once_cell::sync::Lazy;
use regex::Regex;

/// First line of every report.
pub const REPORT_HEADER: &str = "Applications Memory Usage (in Killobytes):";

pub const LEAD_TIME: &str = "Uptime:";
pub const LEAD_PROCESS: &str = "Total PSS by process:";
pub const LEAD_OOM: &str = "Total PSS by OOM adjustment:";
pub const LEAD_CATEGORY: &str = "Total PSS by category:";
pub const LEAD_SUMMARY: &str = "Total RAM:";

pub static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Uptime: (\d+) Realtime: (\d+)").expect("valid time regex"));

/// `  1,234K: com.example.app (pid 567 / activities)`
pub static PROCESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s+([0-9,]+)K: (\S+) \(pid (\d+)( / activities)?\)$")
        .expect("valid process regex")
});

/// `  12,345K: Foreground`
pub static OOM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s+([0-9,]+)K: (\S+)$").expect("valid OOM regex"));

/// `  12,345K: Other dev`; the label runs to the end of the line.
pub static CATEGORY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s+([0-9,]+)K: (.+)$").expect("valid category regex"));

pub static FREE_RAM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^\s*Free RAM: \s*([0-9,]+)K ",
        r"\(\s*([0-9,]+)K cached pss ",
        r"\+\s*([0-9,]+)K cached kernel ",
        r"\+\s*([0-9,]+)K free\)$",
    ))
    .expect("valid free RAM regex")
});

pub static USED_RAM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^\s*Used RAM: \s*([0-9,]+)K ",
        r"\(\s*([0-9,]+)K used pss ",
        r"\+\s*([0-9,]+)K kernel\)$",
    ))
    .expect("valid used RAM regex")
});
