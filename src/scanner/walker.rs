//! Top-level directory listing

use crate::types::{DirSnapshot, FileOperation, FileRecord, SyncError};
use std::fs;
use std::path::Path;
use std::time::Instant;

/// List the entries directly under `root_path`
///
/// Uses the `ignore` walker limited to depth 1 with every filter disabled, so
/// hidden files and names matched by `.gitignore` are listed like any other.
/// Symlinks are resolved: a link to a directory counts as a directory, a link
/// to a file is recorded with the target's size, a broken link with the
/// link's own size.
///
/// # Errors
/// * `DirectoryUnavailable` if the root is missing, not a directory, or unreadable
/// * `FileOperationFailure` if metadata of a single entry cannot be read
///
/// Files whose names are not valid UTF-8 are kept as raw names.
pub fn list_directory(root_path: &Path) -> Result<DirSnapshot, SyncError> {
    let start_time = Instant::now();

    let root_meta = fs::metadata(root_path).map_err(|e| SyncError::directory(root_path, e))?;
    if !root_meta.is_dir() {
        return Err(SyncError::directory(
            root_path,
            std::io::Error::other("not a directory"),
        ));
    }

    let mut snapshot = DirSnapshot::new(root_path.to_path_buf());

    let walker = ignore::WalkBuilder::new(root_path)
        .standard_filters(false)
        .follow_links(false)
        .max_depth(Some(1))
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    for result in walker {
        let entry = result.map_err(|e| {
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
            SyncError::directory(root_path, source)
        })?;

        if entry.depth() == 0 {
            continue;
        }

        let file_type = match entry.file_type() {
            Some(ft) => ft,
            None => continue,
        };
        let name = entry.file_name().to_str();

        let size = if file_type.is_dir() {
            None
        } else if file_type.is_symlink() {
            match fs::metadata(entry.path()) {
                Ok(target) if target.is_dir() => None,
                Ok(target) => Some(target.len()),
                Err(e) => {
                    tracing::warn!(
                        "Broken symlink {}: {}. Listed with its own size.",
                        entry.path().display(),
                        e
                    );
                    Some(
                        fs::symlink_metadata(entry.path())
                            .map_err(|e| SyncError::file_op(FileOperation::Stat, entry.path(), e))?
                            .len(),
                    )
                }
            }
        } else {
            Some(
                fs::symlink_metadata(entry.path())
                    .map_err(|e| SyncError::file_op(FileOperation::Stat, entry.path(), e))?
                    .len(),
            )
        };

        match (name, size) {
            (Some(name), Some(size)) => snapshot.insert(FileRecord::new(name, size)),
            (Some(name), None) => snapshot.insert_directory(name),
            (None, Some(size)) => {
                tracing::debug!("{} is not valid UTF-8", entry.path().display());
                snapshot.insert_raw(entry.file_name().to_os_string(), size);
            }
            (None, None) => {}
        }
    }

    tracing::debug!(
        "Listed {} files ({} bytes) in {} in {:?}",
        snapshot.total_files,
        snapshot.total_size,
        root_path.display(),
        start_time.elapsed()
    );

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_list_empty_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let snapshot = list_directory(temp_dir.path()).expect("listing should succeed");

        assert!(snapshot.is_empty());
        assert_eq!(snapshot.total_size, 0);
        assert_eq!(snapshot.root_path, temp_dir.path());
    }

    #[test]
    fn test_list_files_with_sizes() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join("a.zip"), vec![0u8; 100]).expect("write a.zip");
        fs::write(temp_dir.path().join("b.zip"), vec![0u8; 50]).expect("write b.zip");

        let snapshot = list_directory(temp_dir.path()).expect("listing should succeed");

        assert_eq!(snapshot.total_files, 2);
        assert_eq!(snapshot.total_size, 150);
        assert_eq!(snapshot.get("a.zip").map(|r| r.size), Some(100));
        assert_eq!(snapshot.get("b.zip").map(|r| r.size), Some(50));
    }

    #[test]
    fn test_list_skips_directories_and_nested_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir_all(temp_dir.path().join("rmv")).expect("create rmv");
        fs::write(temp_dir.path().join("rmv/old.zip"), b"old").expect("write nested file");
        fs::write(temp_dir.path().join("top.zip"), b"top").expect("write top file");

        let snapshot = list_directory(temp_dir.path()).expect("listing should succeed");

        let names: Vec<&String> = snapshot.names().collect();
        assert_eq!(names, vec!["top.zip"]);
        assert!(snapshot.has_directory("rmv"));
        assert_eq!(snapshot.total_files, 1);
    }

    #[test]
    fn test_list_includes_hidden_and_gitignored_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join(".gitignore"), "*.zip\n").expect("write gitignore");
        fs::write(temp_dir.path().join(".hidden.zip"), b"x").expect("write hidden file");
        fs::write(temp_dir.path().join("game.zip"), b"y").expect("write game");

        let snapshot = list_directory(temp_dir.path()).expect("listing should succeed");

        assert!(snapshot.contains(".gitignore"));
        assert!(snapshot.contains(".hidden.zip"));
        assert!(snapshot.contains("game.zip"));
    }

    #[test]
    fn test_list_missing_directory_is_unavailable() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let missing = temp_dir.path().join("does-not-exist");

        let err = list_directory(&missing).unwrap_err();

        assert!(matches!(err, SyncError::DirectoryUnavailable { .. }));
    }

    #[test]
    fn test_list_file_root_is_unavailable() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file = temp_dir.path().join("plain.zip");
        fs::write(&file, b"x").expect("write file");

        let err = list_directory(&file).unwrap_err();

        assert!(matches!(err, SyncError::DirectoryUnavailable { .. }));
    }

    #[test]
    #[cfg(unix)]
    fn test_list_resolves_symlinks() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let outside = TempDir::new().expect("Failed to create temp dir");
        fs::write(outside.path().join("real.zip"), vec![0u8; 42]).expect("write target");
        fs::create_dir(outside.path().join("dir")).expect("create target dir");

        std::os::unix::fs::symlink(
            outside.path().join("real.zip"),
            temp_dir.path().join("link.zip"),
        )
        .expect("create file symlink");
        std::os::unix::fs::symlink(outside.path().join("dir"), temp_dir.path().join("dirlink"))
            .expect("create dir symlink");

        let snapshot = list_directory(temp_dir.path()).expect("listing should succeed");

        assert_eq!(snapshot.get("link.zip").map(|r| r.size), Some(42));
        assert!(!snapshot.contains("dirlink"));
        assert!(snapshot.has_directory("dirlink"));
    }

    #[test]
    #[cfg(unix)]
    fn test_list_keeps_names_that_are_not_utf8() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let raw = OsStr::from_bytes(b"junk\xff.zip");
        fs::write(temp_dir.path().join(raw), vec![0u8; 9]).expect("write raw name");
        fs::write(temp_dir.path().join("ok.zip"), vec![0u8; 1]).expect("write ok.zip");

        let snapshot = list_directory(temp_dir.path()).expect("listing should succeed");

        assert_eq!(snapshot.raw_entries.get(raw), Some(&9));
        assert_eq!(snapshot.total_files, 2);
        assert_eq!(snapshot.total_size, 10);
    }
}
