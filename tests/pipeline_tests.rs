//! Integration tests for the directory-to-chart pipeline.
//!
//! These tests build snapshot directories on disk and verify which files are
//! used, how snapshots are ordered and what ends up in the report files.

use dmanalyzer::batch::{collect_candidate_files, load_snapshots};
use dmanalyzer::config::Config;
use dmanalyzer::meminfo::SkipReason;
use dmanalyzer::series::{reconcile, DuplicatePolicy};
use dmanalyzer::{generate_report, AnalyzerError};
use std::fs;
use std::path::Path;

const BOOT: &str = include_str!("fixtures/meminfo_boot.txt");
const LATER: &str = include_str!("fixtures/meminfo_later.txt");
const HEADER: &str = "Applications Memory Usage (in Killobytes):";

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

#[test]
fn test_only_files_with_header_are_parsed() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "01.txt", BOOT);
    write(dir.path(), "notes.txt", "Uptime: 1 Realtime: 1\n");
    write(dir.path(), "empty.txt", "");

    let files = collect_candidate_files(dir.path()).unwrap();
    let report = load_snapshots(&files);

    assert_eq!(report.snapshots.len(), 1);
    assert_eq!(report.snapshots[0].uptime, Some(3600));
    assert_eq!(report.skipped.len(), 2);
    assert!(report
        .skipped
        .iter()
        .any(|s| s.path.ends_with("notes.txt") && s.reason == SkipReason::HeaderMismatch));
    assert!(report
        .skipped
        .iter()
        .any(|s| s.path.ends_with("empty.txt") && s.reason == SkipReason::Empty));
    assert!(report.failed.is_empty());
}

#[test]
fn test_snapshot_without_uptime_is_excluded() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "01.txt", BOOT);
    let no_uptime = BOOT.replace("Uptime: 3600 Realtime: 3600\n", "");
    write(dir.path(), "02.txt", &no_uptime);

    let report = load_snapshots(&collect_candidate_files(dir.path()).unwrap());
    assert_eq!(report.snapshots.len(), 1);
    assert_eq!(report.failed.len(), 1);
    assert!(matches!(
        report.failed[0].error,
        AnalyzerError::IncompleteSnapshot { .. }
    ));

    let series = reconcile(&report.snapshots, DuplicatePolicy::First);
    assert_eq!(series.timeline, vec![3600]);
}

#[test]
fn test_parse_error_fails_only_that_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "01.txt", BOOT);
    let broken = format!("{HEADER}\nUptime: 10 Realtime: 10\nTotal PSS by process:\n  oops\n");
    write(dir.path(), "02.txt", &broken);
    write(dir.path(), "03.txt", LATER);

    let report = load_snapshots(&collect_candidate_files(dir.path()).unwrap());
    assert_eq!(report.snapshots.len(), 2);
    assert_eq!(report.failed.len(), 1);
    match &report.failed[0].error {
        AnalyzerError::Parse(e) => {
            assert!(e.file.ends_with("02.txt"));
            assert_eq!(e.line_number, 4);
            assert_eq!(e.raw_line, "  oops");
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn test_snapshots_sorted_by_uptime_not_file_name() {
    let dir = tempfile::tempdir().unwrap();
    // file names sort the later report first
    write(dir.path(), "a.txt", LATER);
    write(dir.path(), "b.txt", BOOT);

    let report = load_snapshots(&collect_candidate_files(dir.path()).unwrap());
    let uptimes: Vec<_> = report.snapshots.iter().map(|s| s.uptime).collect();
    assert_eq!(uptimes, vec![Some(3600), Some(7325)]);
}

#[test]
fn test_equal_uptimes_keep_file_order() {
    let dir = tempfile::tempdir().unwrap();
    let first = format!("{HEADER}\nUptime: 5 Realtime: 1\n");
    let second = format!("{HEADER}\nUptime: 5 Realtime: 2\n");
    write(dir.path(), "x1.txt", &first);
    write(dir.path(), "x2.txt", &second);

    let report = load_snapshots(&collect_candidate_files(dir.path()).unwrap());
    let realtimes: Vec<_> = report.snapshots.iter().map(|s| s.realtime).collect();
    assert_eq!(realtimes, vec![Some(1), Some(2)]);
}

#[test]
fn test_series_aligned_across_appearing_processes() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "01.txt", BOOT);
    write(dir.path(), "02.txt", LATER);

    let report = load_snapshots(&collect_candidate_files(dir.path()).unwrap());
    let series = reconcile(&report.snapshots, DuplicatePolicy::First);

    assert_eq!(series.timeline_labels(), vec!["1:00:00", "2:02:05"]);
    assert_eq!(
        series.process("com.example.app").unwrap().pss_kb,
        vec![12004, 0]
    );
    assert_eq!(
        series.process("com.android.chrome").unwrap().pss_kb,
        vec![0, 30000]
    );
    assert_eq!(series.system.free_ram_mib, vec![Some(2048.0), Some(1024.0)]);
    assert_eq!(series.system.used_ram_mib, vec![Some(1536.0), Some(2560.0)]);
    assert_eq!(
        series.system.foreground_mib,
        vec![Some(12004.0 / 1024.0), Some(30000.0 / 1024.0)]
    );
    for s in &series.per_process {
        assert_eq!(s.pss_kb.len(), series.len());
    }
}

#[test]
fn test_generate_report_writes_html_and_json() {
    let input = tempfile::tempdir().unwrap();
    write(input.path(), "01.txt", BOOT);
    write(input.path(), "02.txt", LATER);
    write(input.path(), "README", "not a report\n");

    let out = tempfile::tempdir().unwrap();
    let config = Config {
        output: Some(out.path().join("chart.html")),
        json_output: Some(out.path().join("series.json")),
        ..Config::default()
    };

    let summary = generate_report(input.path(), &config).unwrap();
    assert_eq!(summary.files_seen, 3);
    assert_eq!(summary.snapshots, 2);
    assert_eq!(summary.processes, 6);
    assert_eq!(summary.skipped.len(), 1);
    assert!(summary.failed.is_empty());

    let html = fs::read_to_string(out.path().join("chart.html")).unwrap();
    assert!(html.contains("com.android.chrome:sandboxed_process0"));
    assert!(html.contains("Free RAM (MiB)"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.path().join("series.json")).unwrap())
            .unwrap();
    assert_eq!(json["timeline"][1], 7325);
}

#[test]
fn test_generate_report_with_no_snapshots_still_writes_chart() {
    let input = tempfile::tempdir().unwrap();
    write(input.path(), "junk.bin", "\u{0}\u{1}");

    let out = tempfile::tempdir().unwrap();
    let config = Config {
        output: Some(out.path().join("chart.html")),
        ..Config::default()
    };

    let summary = generate_report(input.path(), &config).unwrap();
    assert_eq!(summary.snapshots, 0);
    assert_eq!(summary.charted_series, 0);
    let html = fs::read_to_string(out.path().join("chart.html")).unwrap();
    assert!(html.contains("No series to chart"));
}

#[test]
fn test_generate_report_missing_directory_is_an_error() {
    let input = tempfile::tempdir().unwrap();
    let config = Config::default();
    assert!(generate_report(&input.path().join("missing"), &config).is_err());
}
