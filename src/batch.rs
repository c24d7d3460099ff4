//! Batch ingestion of a snapshot directory.
//!
//! Files are classified and parsed independently (in parallel with rayon), then
//! gathered and stably sorted by uptime. A failure in one file never stops the
//! others; it is recorded in the [`BatchReport`].

use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::error::AnalyzerError;
use crate::meminfo::{classify_file, read_snapshot, SkipReason, Snapshot, Verdict};

/// A file the classifier did not accept.
#[derive(Debug)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// A report that could not be used.
#[derive(Debug)]
pub struct FailedFile {
    pub path: PathBuf,
    pub error: AnalyzerError,
}

/// Outcome of ingesting a single file.
#[derive(Debug)]
pub enum FileOutcome {
    Parsed(Snapshot),
    Skipped(SkipReason),
    Failed(AnalyzerError),
}

#[derive(Debug, Default)]
pub struct BatchReport {
    /// Usable snapshots, ascending by uptime.
    pub snapshots: Vec<Snapshot>,
    pub skipped: Vec<SkippedFile>,
    pub failed: Vec<FailedFile>,
}

/// Lists the regular files of `dir` (non-recursive), sorted by file name.
pub fn collect_candidate_files(dir: &Path) -> Result<Vec<PathBuf>, AnalyzerError> {
    let entries = fs::read_dir(dir).map_err(|e| AnalyzerError::io(dir, e))?;

    let mut out = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Cannot read an entry of {}: {}", dir.display(), e);
                continue;
            }
        };
        let path = entry.path();
        match entry.file_type() {
            Ok(ft) if ft.is_file() => out.push(path),
            // follow symlinks to files
            Ok(ft) if ft.is_symlink() && path.is_file() => out.push(path),
            Ok(_) => debug!("Ignoring non-file entry {}", path.display()),
            Err(e) => warn!("Cannot stat {}: {}", path.display(), e),
        }
    }
    out.sort();
    Ok(out)
}

/// Classifies, parses and validates one file.
pub fn load_file(path: &Path) -> FileOutcome {
    match classify_file(path) {
        Verdict::Skip(reason) => return FileOutcome::Skipped(reason),
        Verdict::Parse => {}
    }

    match read_snapshot(path).and_then(Snapshot::require_uptime) {
        Ok(snapshot) => FileOutcome::Parsed(snapshot),
        Err(e) => {
            warn!("Excluding {}: {}", path.display(), e);
            FileOutcome::Failed(e)
        }
    }
}

/// Stable sort by uptime; equal uptimes keep their input order.
pub fn sort_by_uptime(snapshots: &mut [Snapshot]) {
    snapshots.sort_by_key(|s| s.uptime);
}

/// Ingests every file and returns the sorted snapshots plus what was left out.
pub fn load_snapshots(files: &[PathBuf]) -> BatchReport {
    let start = Instant::now();

    // par_iter().map().collect() keeps input order, so ties stay in file-name order
    let outcomes: Vec<FileOutcome> = files.par_iter().map(|path| load_file(path)).collect();

    let mut report = BatchReport::default();
    for (path, outcome) in files.iter().zip(outcomes) {
        match outcome {
            FileOutcome::Parsed(snapshot) => report.snapshots.push(snapshot),
            FileOutcome::Skipped(reason) => {
                debug!("Skipped {}: {}", path.display(), reason);
                report.skipped.push(SkippedFile {
                    path: path.clone(),
                    reason,
                });
            }
            FileOutcome::Failed(error) => report.failed.push(FailedFile {
                path: path.clone(),
                error,
            }),
        }
    }
    sort_by_uptime(&mut report.snapshots);

    info!(
        "Loaded {} snapshot(s) from {} file(s) in {:.2}ms: {} skipped, {} failed",
        report.snapshots.len(),
        files.len(),
        start.elapsed().as_secs_f64() * 1000.0,
        report.skipped.len(),
        report.failed.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(name: &str, uptime: u64) -> Snapshot {
        Snapshot {
            source: PathBuf::from(name),
            uptime: Some(uptime),
            ..Snapshot::default()
        }
    }

    #[test]
    fn test_sort_by_uptime_is_stable() {
        let mut snaps = vec![snap("c", 30), snap("a", 10), snap("b1", 20), snap("b2", 20)];
        sort_by_uptime(&mut snaps);
        let order: Vec<_> = snaps.iter().map(|s| s.source.to_str().unwrap()).collect();
        assert_eq!(order, vec!["a", "b1", "b2", "c"]);
    }

    #[test]
    fn test_collect_candidate_files_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = collect_candidate_files(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, AnalyzerError::Io { .. }));
    }

    #[test]
    fn test_collect_candidate_files_sorted_and_files_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "x").unwrap();
        fs::write(dir.path().join("a.txt"), "x").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let files = collect_candidate_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_collect_candidate_files_skips_dangling_entries() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "x").unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("broken")).unwrap();

        let files = collect_candidate_files(dir.path()).unwrap();
        assert_eq!(files, vec![dir.path().join("a.txt")]);
    }
}
