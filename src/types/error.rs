//! Error types for romsync

use std::fmt;
use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Filesystem operation that failed on a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    /// Streaming a source file into the destination
    Copy,
    /// Moving a destination file into quarantine
    Quarantine,
    /// Committing a finished part file to its final name
    Rename,
    /// Creating the quarantine directory
    CreateDir,
    /// Reading metadata of a single entry
    Stat,
}

impl fmt::Display for FileOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FileOperation::Copy => "copy",
            FileOperation::Quarantine => "quarantine",
            FileOperation::Rename => "rename",
            FileOperation::CreateDir => "create directory",
            FileOperation::Stat => "stat",
        };
        f.write_str(label)
    }
}

/// Error types for romsync operations
#[derive(Debug, Error)]
pub enum SyncError {
    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A configured root is missing or cannot be listed
    #[error("Directory unavailable: {path}: {source}")]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Copy or move of one file failed mid-stage
    #[error("Failed to {operation} {path}: {source}")]
    FileOperationFailure {
        operation: FileOperation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SyncError {
    pub(crate) fn directory(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SyncError::DirectoryUnavailable {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn file_op(
        operation: FileOperation,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        SyncError::FileOperationFailure {
            operation,
            path: path.into(),
            source,
        }
    }

    /// The underlying IO error, if any
    pub fn io_error(&self) -> Option<&std::io::Error> {
        match self {
            SyncError::Io(e)
            | SyncError::DirectoryUnavailable { source: e, .. }
            | SyncError::FileOperationFailure { source: e, .. } => Some(e),
            SyncError::Config(_) => None,
        }
    }

    /// Check if this error is a configuration error
    pub fn is_validation_error(&self) -> bool {
        matches!(self, SyncError::Config(_))
    }

    /// Check if this error is related to permissions
    pub fn is_permission_error(&self) -> bool {
        self.io_error()
            .is_some_and(|e| e.kind() == ErrorKind::PermissionDenied)
    }

    /// Check if this error is related to disk space
    pub fn is_disk_space_error(&self) -> bool {
        self.io_error().is_some_and(|e| {
            e.kind() == ErrorKind::StorageFull || matches!(e.raw_os_error(), Some(28 | 122))
        })
    }
}
