//! FileRecord - A single file in one directory listing

use serde::{Deserialize, Serialize};

/// A top-level file: its name and byte size at listing time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileRecord {
    /// File name relative to the listed directory
    pub name: String,

    /// File size in bytes
    pub size: u64,
}

impl FileRecord {
    /// Create a new FileRecord
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    /// Whether the name carries the given suffix (extension or marker)
    pub fn has_suffix(&self, suffix: &str) -> bool {
        self.name.ends_with(suffix)
    }
}
