//! Core type definitions for romsync

mod action;
mod entry;
mod error;
mod snapshot;
mod tally;

pub use action::SyncAction;
pub use entry::FileRecord;
pub use error::{FileOperation, SyncError};
pub use snapshot::DirSnapshot;
pub use tally::FileTally;
