//! Sync plan types

use crate::types::SyncAction;
use serde::Serialize;

/// Sync plan containing actions and statistics
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SyncPlan {
    /// Actions in source name order
    pub actions: Vec<SyncAction>,

    /// Aggregate statistics about the plan
    pub stats: PlanStats,
}

impl SyncPlan {
    /// Create a new empty plan
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an action to the plan and update statistics
    pub fn add_action(&mut self, action: SyncAction) {
        match &action {
            SyncAction::CopyNew(record) => {
                self.stats.copy_count += 1;
                self.stats.total_files += 1;
                self.stats.total_bytes += record.size;
            }
            SyncAction::Replace { source, .. } => {
                self.stats.replace_count += 1;
                self.stats.total_files += 1;
                self.stats.total_bytes += source.size;
            }
            SyncAction::Skip => {
                self.stats.skip_count += 1;
            }
        }

        self.actions.push(action);
    }

    /// Actions that move or copy data
    pub fn transfers(&self) -> impl Iterator<Item = &SyncAction> {
        self.actions.iter().filter(|action| !action.is_skip())
    }

    pub fn has_transfers(&self) -> bool {
        self.stats.total_files > 0
    }
}

/// Statistics about a sync plan
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PlanStats {
    /// Total number of files to transfer (CopyNew + Replace)
    pub total_files: usize,

    /// Total bytes to transfer (CopyNew + Replace)
    pub total_bytes: u64,

    pub copy_count: usize,
    pub replace_count: usize,
    pub skip_count: usize,
}
