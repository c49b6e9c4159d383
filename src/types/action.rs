//! SyncAction - Actions determined by the size comparison

use super::FileRecord;

/// Sync action determined by diff engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    /// Copy new file (exists in src, missing in dest)
    CopyNew(FileRecord),

    /// Quarantine the stale destination copy, then copy the source file
    Replace {
        source: FileRecord,
        stale: FileRecord,
    },

    /// Skip (sizes match)
    Skip,
}

impl SyncAction {
    /// Short label used in logs and progress events
    pub fn action_name(&self) -> &'static str {
        match self {
            SyncAction::CopyNew(_) => "Copy",
            SyncAction::Replace { .. } => "Replace",
            SyncAction::Skip => "Skip",
        }
    }

    /// Source record to transfer, if any
    pub fn source(&self) -> Option<&FileRecord> {
        match self {
            SyncAction::CopyNew(record) | SyncAction::Replace { source: record, .. } => {
                Some(record)
            }
            SyncAction::Skip => None,
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, SyncAction::Skip)
    }

    pub fn is_replace(&self) -> bool {
        matches!(self, SyncAction::Replace { .. })
    }
}
