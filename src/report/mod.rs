//! Read-only summaries over the settled destination and source

use crate::executor::{ExecutionStats, QuarantineReport};
use crate::scanner::list_directory;
use crate::types::{DirSnapshot, FileTally, SyncError};
use crate::Config;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;

/// Destination files that took the place of a quarantined file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewFilesReport {
    /// Sorted names
    pub names: Vec<String>,
    pub tally: FileTally,
}

/// Result of a full pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub dry_run: bool,
    pub quarantine: QuarantineReport,
    pub sync: ExecutionStats,
    pub new_files: NewFilesReport,
    pub destination: FileTally,
    pub in_progress: FileTally,
}

/// Names in the quarantine directory carrying the sync extension
///
/// Taken after the sync stage, so it includes files superseded in this run.
pub fn quarantined_names(config: &Config) -> Result<BTreeSet<String>, SyncError> {
    let quarantine_dir = config.quarantine_dir();
    match fs::symlink_metadata(&quarantine_dir) {
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeSet::new()),
        _ => {}
    }

    let snapshot = list_directory(&quarantine_dir)?;
    Ok(snapshot
        .with_suffix(&config.sync_extension)
        .map(|record| record.name.clone())
        .collect())
}

/// Destination files whose names also appear in quarantine
pub fn new_files(destination: &DirSnapshot, quarantined: &BTreeSet<String>) -> NewFilesReport {
    let records: Vec<_> = destination
        .iter()
        .filter(|record| quarantined.contains(&record.name))
        .collect();

    NewFilesReport {
        names: records.iter().map(|record| record.name.clone()).collect(),
        tally: records.into_iter().collect(),
    }
}

/// Every non-directory entry directly under the listed directory
pub fn directory_tally(snapshot: &DirSnapshot) -> FileTally {
    snapshot.tally()
}

/// Source files still carrying the in-progress marker
pub fn in_progress_tally(source: &DirSnapshot, in_progress_suffix: &str) -> FileTally {
    source.with_suffix(in_progress_suffix).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileRecord;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn snapshot(files: &[(&str, u64)]) -> DirSnapshot {
        let mut snapshot = DirSnapshot::new(PathBuf::from("/dir"));
        for (name, size) in files {
            snapshot.insert(FileRecord::new(*name, *size));
        }
        snapshot
    }

    #[test]
    fn test_new_files_matches_quarantined_names() {
        let dest = snapshot(&[("a.zip", 10), ("b.zip", 20), ("c.zip", 30)]);
        let quarantined: BTreeSet<String> =
            ["c.zip", "a.zip", "z.zip"].iter().map(|s| s.to_string()).collect();

        let report = new_files(&dest, &quarantined);

        assert_eq!(report.names, vec!["a.zip".to_string(), "c.zip".to_string()]);
        assert_eq!(report.tally, FileTally { count: 2, bytes: 40 });
    }

    #[test]
    fn test_directory_tally() {
        let dest = snapshot(&[("a.zip", 10), ("notes.txt", 5)]);
        assert_eq!(directory_tally(&dest), FileTally { count: 2, bytes: 15 });
    }

    #[test]
    fn test_in_progress_tally() {
        let src = snapshot(&[
            ("a.zip", 10),
            ("b.zip.fdmdownload", 7),
            ("c.zip.fdmdownload", 3),
        ]);

        assert_eq!(
            in_progress_tally(&src, ".fdmdownload"),
            FileTally { count: 2, bytes: 10 }
        );
    }

    #[test]
    fn test_quarantined_names_filters_extension() {
        let src = TempDir::new().expect("create src");
        let dst = TempDir::new().expect("create dst");
        let config = Config::new(src.path(), dst.path());
        fs::create_dir(config.quarantine_dir()).expect("create rmv");
        fs::write(config.quarantine_dir().join("a.zip"), b"a").expect("write a.zip");
        fs::write(config.quarantine_dir().join("a.zip.20260101_000000"), b"a")
            .expect("write archive");

        let names = quarantined_names(&config).expect("listing succeeds");

        assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["a.zip".to_string()]);
    }

    #[test]
    fn test_quarantined_names_without_quarantine_dir() {
        let src = TempDir::new().expect("create src");
        let dst = TempDir::new().expect("create dst");
        let config = Config::new(src.path(), dst.path());

        assert!(quarantined_names(&config).expect("succeeds").is_empty());
    }

    #[test]
    fn test_run_report_serializes() {
        let report = RunReport::default();
        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["sync"]["transferred"], 0);
        assert_eq!(json["quarantine"]["orphans"]["count"], 0);
        assert_eq!(json["dry_run"], false);
    }
}
