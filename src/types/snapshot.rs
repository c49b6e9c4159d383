//! DirSnapshot - Top-level file listing of one directory

use super::{FileRecord, FileTally};
use std::collections::{BTreeMap, BTreeSet};
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

/// Non-directory entries directly under a directory, keyed by name
///
/// Subdirectory names are kept apart from the files so a directory that
/// shadows an expected file name can still be found.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DirSnapshot {
    /// Map: file name → FileRecord (sorted by name)
    pub entries: BTreeMap<String, FileRecord>,

    /// Files whose names are not valid UTF-8: raw name → size
    pub raw_entries: BTreeMap<OsString, u64>,

    /// Subdirectories and links to directories
    pub directories: BTreeSet<String>,

    /// Aggregate statistics
    pub total_size: u64,
    pub total_files: usize,

    /// Directory this snapshot was taken from
    pub root_path: PathBuf,
}

impl DirSnapshot {
    /// Create a new empty DirSnapshot
    pub fn new(root_path: PathBuf) -> Self {
        Self {
            entries: BTreeMap::new(),
            raw_entries: BTreeMap::new(),
            directories: BTreeSet::new(),
            total_size: 0,
            total_files: 0,
            root_path,
        }
    }

    /// Insert a file record
    ///
    /// If the name already exists, the old record is replaced and statistics are adjusted.
    pub fn insert(&mut self, record: FileRecord) {
        if let Some(old) = self.entries.get(&record.name) {
            self.total_size = self.total_size.saturating_sub(old.size);
            self.total_files = self.total_files.saturating_sub(1);
        }

        self.total_size += record.size;
        self.total_files += 1;
        self.entries.insert(record.name.clone(), record);
    }

    /// Insert a file whose name is not valid UTF-8
    ///
    /// Counted in the totals like any other file.
    pub fn insert_raw(&mut self, name: OsString, size: u64) {
        if let Some(old) = self.raw_entries.insert(name, size) {
            self.total_size = self.total_size.saturating_sub(old);
            self.total_files = self.total_files.saturating_sub(1);
        }

        self.total_size += size;
        self.total_files += 1;
    }

    /// Record a subdirectory name
    pub fn insert_directory(&mut self, name: impl Into<String>) {
        self.directories.insert(name.into());
    }

    /// Whether `name` is a subdirectory rather than a file
    pub fn has_directory(&self, name: &str) -> bool {
        self.directories.contains(name)
    }

    /// Get a record by name
    pub fn get(&self, name: &str) -> Option<&FileRecord> {
        self.entries.get(name)
    }

    /// Check if a name exists in the snapshot
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records in name order
    pub fn iter(&self) -> impl Iterator<Item = &FileRecord> {
        self.entries.values()
    }

    /// Names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Raw names of files that are not valid UTF-8, sorted
    pub fn raw_names(&self) -> impl Iterator<Item = &OsStr> {
        self.raw_entries.keys().map(OsString::as_os_str)
    }

    /// Every file name, UTF-8 names first
    pub fn file_names(&self) -> impl Iterator<Item = &OsStr> {
        self.names()
            .map(|name| OsStr::new(name.as_str()))
            .chain(self.raw_names())
    }

    /// Records whose name ends with `suffix`
    pub fn with_suffix<'a>(&'a self, suffix: &'a str) -> impl Iterator<Item = &'a FileRecord> {
        self.iter().filter(move |record| record.has_suffix(suffix))
    }

    /// Count and size of every record
    pub fn tally(&self) -> FileTally {
        FileTally {
            count: self.total_files,
            bytes: self.total_size,
        }
    }
}
