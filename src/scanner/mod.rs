//! Scanner - Directory listing and source inventory

mod inventory;
mod walker;

pub use inventory::{build_expected_set, expected_names, logical_name};
pub use walker::list_directory;
