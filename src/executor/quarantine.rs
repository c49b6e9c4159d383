//! Quarantine instead of delete
//!
//! Files that leave the active destination are moved into a reserved
//! subdirectory (`rmv` by default). Nothing is ever removed: when the
//! quarantine already holds a file of the same name, the older copy is
//! archived under a timestamped name first.

use crate::executor::copy::copy_file_atomic;
use crate::scanner::list_directory;
use crate::types::{DirSnapshot, FileOperation, FileTally, SyncError};
use crate::Config;
use chrono::Local;
use serde::Serialize;
use std::collections::BTreeSet;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io::{Error, ErrorKind};
use std::path::{Path, PathBuf};

/// Outcome of the quarantine stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuarantineReport {
    /// Names moved this run (or that would be, in dry-run mode), sorted.
    /// Names that are not valid UTF-8 are shown lossily.
    pub moved: Vec<String>,

    /// Quarantined files whose names are still not expected
    pub orphans: FileTally,
}

/// Quarantine stage: move unexpected files, then tally the orphans
pub fn run_quarantine_stage(
    expected: &BTreeSet<OsString>,
    config: &Config,
) -> Result<QuarantineReport, SyncError> {
    let moved = quarantine_unexpected(expected, config)?;
    let orphans = orphan_tally(expected, config)?;
    Ok(QuarantineReport { moved, orphans })
}

/// File names in a destination listing that are not expected
///
/// Subdirectories are never candidates.
pub fn quarantine_candidates(
    destination: &DirSnapshot,
    expected: &BTreeSet<OsString>,
) -> Vec<OsString> {
    destination
        .file_names()
        .filter(|name| !expected.contains(*name))
        .map(OsStr::to_os_string)
        .collect()
}

/// Move every top-level destination file whose name is not expected into
/// the quarantine directory
///
/// Safe to re-run after a partial failure: files already moved are no longer
/// listed at the top level. In dry-run mode the candidates are returned and
/// nothing is touched.
pub fn quarantine_unexpected(
    expected: &BTreeSet<OsString>,
    config: &Config,
) -> Result<Vec<String>, SyncError> {
    let destination = list_directory(&config.destination)?;
    let candidates = quarantine_candidates(&destination, expected);

    if !config.dry_run {
        let quarantine_dir = config.quarantine_dir();
        for name in &candidates {
            let shown = name.to_string_lossy();
            tracing::debug!("{} is not in source, moving to {}", shown, config.quarantine_dir_name);
            move_to_quarantine(&config.destination.join(name), &quarantine_dir).inspect_err(|e| {
                tracing::error!("Quarantine of {} failed: {}", shown, e);
            })?;
        }
    }

    Ok(candidates
        .iter()
        .map(|name| name.to_string_lossy().into_owned())
        .collect())
}

/// Count and size of quarantined files whose names are still not expected
///
/// A missing quarantine directory means no orphans.
pub fn orphan_tally(
    expected: &BTreeSet<OsString>,
    config: &Config,
) -> Result<FileTally, SyncError> {
    let quarantine_dir = config.quarantine_dir();
    match fs::symlink_metadata(&quarantine_dir) {
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(FileTally::default()),
        _ => {}
    }

    let quarantined = list_directory(&quarantine_dir)?;
    let mut tally: FileTally = quarantined
        .iter()
        .filter(|record| !expected.contains(OsStr::new(&record.name)))
        .collect();
    for (name, size) in &quarantined.raw_entries {
        if !expected.contains(name.as_os_str()) {
            tally.add(*size);
        }
    }
    Ok(tally)
}

/// Move one destination entry into `quarantine_dir`, keeping its name
///
/// The directory is created on demand. An existing quarantined file of the
/// same name is archived first under a timestamped name. Falls back to
/// copy-then-remove when the rename crosses filesystems; the original is only
/// removed after the copy succeeded.
///
/// Returns the path of the quarantined file.
pub fn move_to_quarantine(target_path: &Path, quarantine_dir: &Path) -> Result<PathBuf, SyncError> {
    let name = target_path.file_name().ok_or_else(|| {
        SyncError::file_op(
            FileOperation::Quarantine,
            target_path,
            Error::new(ErrorKind::InvalidInput, "path has no file name"),
        )
    })?;

    fs::create_dir_all(quarantine_dir)
        .map_err(|e| SyncError::file_op(FileOperation::CreateDir, quarantine_dir, e))?;

    let quarantine_path = quarantine_dir.join(name);
    if fs::symlink_metadata(&quarantine_path).is_ok() {
        archive_existing(&quarantine_path)?;
    }

    match fs::rename(target_path, &quarantine_path) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::CrossesDevices => {
            copy_file_atomic(target_path, &quarantine_path)?;
            fs::remove_file(target_path)
                .map_err(|e| SyncError::file_op(FileOperation::Quarantine, target_path, e))?;
        }
        Err(e) => return Err(SyncError::file_op(FileOperation::Quarantine, target_path, e)),
    }

    Ok(quarantine_path)
}

/// Appended to an older quarantined copy: `<name>.<timestamp>[-N]`
fn archive_suffix(timestamp: &str, attempt: usize) -> String {
    if attempt == 0 {
        format!(".{}", timestamp)
    } else {
        format!(".{}-{}", timestamp, attempt)
    }
}

fn archive_existing(existing: &Path) -> Result<PathBuf, SyncError> {
    let name = existing.file_name().unwrap_or_default();
    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();

    let mut attempt = 0;
    let archived = loop {
        let mut archived_name = name.to_os_string();
        archived_name.push(archive_suffix(&timestamp, attempt));
        let candidate = existing.with_file_name(archived_name);
        if fs::symlink_metadata(&candidate).is_err() {
            break candidate;
        }
        attempt += 1;
    };

    tracing::debug!(
        "Archiving older quarantined {} as {}",
        existing.display(),
        archived.display()
    );
    fs::rename(existing, &archived)
        .map_err(|e| SyncError::file_op(FileOperation::Quarantine, existing, e))?;

    Ok(archived)
}
