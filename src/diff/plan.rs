//! Sync plan generation

use crate::diff::{compare_sizes, SyncPlan};
use crate::types::{DirSnapshot, FileRecord, SyncAction};

/// Generate a sync plan from a source listing and the post-quarantine
/// destination listing
///
/// Only source files ending in `sync_extension` are considered. Files still
/// being downloaded carry the in-progress suffix after the extension, so they
/// never qualify. A destination directory holding a source file's name is
/// replaced like a stale copy. Source names that are not valid UTF-8 are not
/// transferred.
///
/// # Example
/// ```
/// use romsync::diff::generate_sync_plan;
/// use romsync::types::{DirSnapshot, FileRecord};
/// use std::path::PathBuf;
///
/// let mut src = DirSnapshot::new(PathBuf::from("src"));
/// src.insert(FileRecord::new("new.zip", 4));
/// src.insert(FileRecord::new("notes.txt", 9));
/// let dest = DirSnapshot::new(PathBuf::from("dst"));
///
/// let plan = generate_sync_plan(&src, &dest, ".zip");
/// assert_eq!(plan.stats.copy_count, 1);
/// assert_eq!(plan.stats.total_bytes, 4);
/// ```
pub fn generate_sync_plan(
    source: &DirSnapshot,
    destination: &DirSnapshot,
    sync_extension: &str,
) -> SyncPlan {
    let mut plan = SyncPlan::new();

    for src_record in source.with_suffix(sync_extension) {
        let action = match destination.get(&src_record.name) {
            Some(dest_record) => compare_sizes(src_record, dest_record),
            None if destination.has_directory(&src_record.name) => {
                tracing::warn!(
                    "{} is a directory in destination, it will be quarantined",
                    src_record.name
                );
                SyncAction::Replace {
                    source: src_record.clone(),
                    stale: FileRecord::new(src_record.name.clone(), 0),
                }
            }
            None => SyncAction::CopyNew(src_record.clone()),
        };
        plan.add_action(action);
    }

    for raw in source.raw_names() {
        if raw.as_encoded_bytes().ends_with(sync_extension.as_bytes()) {
            tracing::warn!(
                "Not copying {}: file name is not valid UTF-8",
                raw.to_string_lossy()
            );
        }
    }

    plan
}
