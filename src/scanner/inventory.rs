//! Source inventory: the set of names the destination should hold

use super::list_directory;
use crate::types::{DirSnapshot, SyncError};
use std::collections::BTreeSet;
use std::ffi::{OsStr, OsString};
use std::path::Path;

/// Strip the in-progress marker, so `x.zip.fdmdownload` becomes `x.zip`
pub fn logical_name<'a>(name: &'a str, in_progress_suffix: &str) -> &'a str {
    name.strip_suffix(in_progress_suffix).unwrap_or(name)
}

#[cfg(unix)]
fn logical_raw_name(name: &OsStr, in_progress_suffix: &str) -> OsString {
    use std::os::unix::ffi::OsStrExt;

    let bytes = name.as_bytes();
    let stripped = bytes
        .strip_suffix(in_progress_suffix.as_bytes())
        .unwrap_or(bytes);
    OsStr::from_bytes(stripped).to_os_string()
}

#[cfg(not(unix))]
fn logical_raw_name(name: &OsStr, _in_progress_suffix: &str) -> OsString {
    name.to_os_string()
}

/// Expected set from an existing source listing
///
/// A finished file and its unfinished download collapse to one entry.
/// Subdirectories are not part of the set. Names that are not valid UTF-8
/// are kept as raw names so their destination copies are left alone.
pub fn expected_names(source: &DirSnapshot, in_progress_suffix: &str) -> BTreeSet<OsString> {
    let named = source
        .names()
        .map(|name| logical_name(name, in_progress_suffix))
        .filter(|name| !name.is_empty())
        .map(OsString::from);
    let raw = source
        .raw_names()
        .map(|name| logical_raw_name(name, in_progress_suffix));

    named.chain(raw).collect()
}

/// List `source` and build its expected set
///
/// # Errors
/// `DirectoryUnavailable` if the source cannot be listed.
pub fn build_expected_set(
    source: &Path,
    in_progress_suffix: &str,
) -> Result<BTreeSet<OsString>, SyncError> {
    let snapshot = list_directory(source)?;
    Ok(expected_names(&snapshot, in_progress_suffix))
}
