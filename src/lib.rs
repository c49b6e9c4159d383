//! # romsync - Size-based mirror with quarantine
//!
//! Keeps a destination directory holding exactly the files of a source
//! directory. Files that no longer belong are moved into a quarantine
//! subdirectory rather than deleted, and files whose size differs are
//! replaced after their old copy is quarantined.
//!
//! The pipeline runs four stages in order: source inventory, quarantine,
//! size-based sync, and reporting. See [`commands::sync::run`].

// Module declarations
pub mod config;
pub mod scanner;
pub mod diff;
pub mod executor;
pub mod report;
pub mod ui;
pub mod commands;
pub mod types;

// Re-export commonly used types
pub use types::{DirSnapshot, FileRecord, FileTally, SyncAction, SyncError};
pub use config::Config;
pub use report::RunReport;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
