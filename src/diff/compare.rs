//! File comparison logic

use crate::types::{FileRecord, SyncAction};

/// Compare a source file with its same-named destination counterpart
///
/// Size is the only signal: equal sizes are treated as in sync, any
/// difference replaces the destination copy. Timestamps and content are
/// never consulted.
pub fn compare_sizes(src: &FileRecord, dest: &FileRecord) -> SyncAction {
    if src.size == dest.size {
        SyncAction::Skip
    } else {
        SyncAction::Replace {
            source: src.clone(),
            stale: dest.clone(),
        }
    }
}
