//! Atomic file copy implementation

use crate::types::{FileOperation, SyncError};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

const COPY_BUFFER_SIZE: usize = 128 * 1024;

/// Hidden part file next to `dest`: `dir/x.zip` → `dir/.x.zip.part`
///
/// A part file left behind by an interrupted run is not in the expected set,
/// so the next quarantine stage moves it out of the way.
pub fn part_path_for(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    dest.with_file_name(format!(".{}.part", name))
}

/// Copy a file atomically using the write-then-rename strategy
///
/// 1. Stream into a hidden `.part` file beside `dest`
/// 2. Flush and sync to disk
/// 3. Preserve permissions and mtime
/// 4. Rename onto `dest`
///
/// Returns the number of bytes copied.
///
/// # Example
/// ```no_run
/// use romsync::executor::copy_file_atomic;
/// use std::path::Path;
///
/// let bytes = copy_file_atomic(Path::new("src/pacman.zip"), Path::new("dst/pacman.zip"))?;
/// # Ok::<(), romsync::types::SyncError>(())
/// ```
pub fn copy_file_atomic(src: &Path, dest: &Path) -> Result<u64, SyncError> {
    let part_path = part_path_for(dest);
    let bytes = copy_to_part(src, &part_path)?;
    commit_part(&part_path, dest)?;
    Ok(bytes)
}

/// Stream `src` into `part_path`, removing the part file again on failure
pub fn copy_to_part(src: &Path, part_path: &Path) -> Result<u64, SyncError> {
    match write_part(src, part_path) {
        Ok(bytes) => Ok(bytes),
        Err(e) => {
            discard_part(part_path);
            Err(SyncError::file_op(FileOperation::Copy, src, e))
        }
    }
}

/// Rename a finished part file onto its final name
pub fn commit_part(part_path: &Path, dest: &Path) -> Result<(), SyncError> {
    fs::rename(part_path, dest).map_err(|e| {
        discard_part(part_path);
        SyncError::file_op(FileOperation::Rename, dest, e)
    })
}

/// Remove a part file that will never be committed
pub fn discard_part(part_path: &Path) {
    if let Err(e) = fs::remove_file(part_path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!("Could not remove {}: {}", part_path.display(), e);
        }
    }
}

fn write_part(src: &Path, part_path: &Path) -> std::io::Result<u64> {
    let mut src_file = File::open(src)?;
    let mut part_file = File::create(part_path)?;

    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = src_file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        part_file.write_all(&buffer[..bytes_read])?;
        total_bytes += bytes_read as u64;
    }

    part_file.sync_all()?;

    // Drop the handle before rename (required on Windows)
    drop(part_file);

    let src_metadata = fs::metadata(src)?;
    fs::set_permissions(part_path, src_metadata.permissions())?;
    let mtime = filetime::FileTime::from_last_modification_time(&src_metadata);
    filetime::set_file_mtime(part_path, mtime)?;

    Ok(total_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_part_path_is_hidden_sibling() {
        assert_eq!(
            part_path_for(Path::new("/dst/pacman.zip")),
            PathBuf::from("/dst/.pacman.zip.part")
        );
    }

    #[test]
    fn test_copy_failure_leaves_no_part_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let dest = temp_dir.path().join("out.zip");

        let err = copy_file_atomic(&temp_dir.path().join("missing.zip"), &dest).unwrap_err();

        assert!(matches!(
            err,
            SyncError::FileOperationFailure {
                operation: FileOperation::Copy,
                ..
            }
        ));
        assert!(!dest.exists());
        assert!(!part_path_for(&dest).exists());
    }

    #[test]
    fn test_copy_to_part_then_commit() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src.zip");
        fs::write(&src, b"payload").expect("write source");
        let dest = temp_dir.path().join("dst.zip");
        let part = part_path_for(&dest);

        let bytes = copy_to_part(&src, &part).expect("copy_to_part should succeed");
        assert_eq!(bytes, 7);
        assert!(part.exists());
        assert!(!dest.exists());

        commit_part(&part, &dest).expect("commit should succeed");
        assert!(!part.exists());
        assert_eq!(fs::read(&dest).expect("read dest"), b"payload");
    }
}
