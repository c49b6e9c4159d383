//! Main sync command: inventory, quarantine, sync, report

use crate::diff::{generate_sync_plan, SyncPlan};
use crate::executor::{execute_plan, run_quarantine_stage, ExecutionEvent, ExecutionStats};
use crate::report::{
    directory_tally, in_progress_tally, new_files, quarantined_names, RunReport,
};
use crate::scanner::{build_expected_set, list_directory};
use crate::types::SyncError;
use crate::ui::{format_size, ProgressReporter};
use crate::Config;
use std::cell::RefCell;
use std::io::ErrorKind;

/// Run the full pipeline with progress bars on stderr
pub fn run(config: &Config) -> Result<RunReport, SyncError> {
    let mut progress = ProgressReporter::new();
    run_with_progress(config, &mut progress)
}

/// Run the full pipeline
///
/// Every set is derived from a fresh listing, so running again after a
/// failure only acts on what is still out of place.
pub fn run_with_progress(
    config: &Config,
    progress: &mut ProgressReporter,
) -> Result<RunReport, SyncError> {
    config.validate()?;

    progress.start_stage("Reading source inventory");
    let expected = build_expected_set(&config.source, &config.in_progress_suffix)?;
    tracing::info!(
        "{} expected files in {}",
        expected.len(),
        config.source.display()
    );

    progress.start_stage("Quarantining files not in source");
    let quarantine = run_quarantine_stage(&expected, config)?;
    tracing::info!(
        "Total {} files {} are not in source",
        quarantine.orphans.count,
        format_size(quarantine.orphans.bytes)
    );

    progress.start_stage("Comparing sizes");
    let source = list_directory(&config.source)?;
    let destination = list_directory(&config.destination)?;
    let plan = generate_sync_plan(&source, &destination, &config.sync_extension);
    tracing::info!(
        "Plan: copy {}, replace {}, unchanged {}, {} to transfer",
        plan.stats.copy_count,
        plan.stats.replace_count,
        plan.stats.skip_count,
        format_size(plan.stats.total_bytes)
    );

    let sync = if config.dry_run {
        planned_stats(&plan)
    } else if !plan.has_transfers() {
        tracing::info!("Nothing to sync.");
        planned_stats(&plan)
    } else {
        transfer(&plan, config, progress)?
    };

    progress.start_stage("Summarizing");
    let quarantined = quarantined_names(config)?;
    let destination = list_directory(&config.destination)?;
    let source = list_directory(&config.source)?;
    progress.finish();

    Ok(RunReport {
        dry_run: config.dry_run,
        quarantine,
        sync,
        new_files: new_files(&destination, &quarantined),
        destination: directory_tally(&destination),
        in_progress: in_progress_tally(&source, &config.in_progress_suffix),
    })
}

/// What a plan would do, without doing it
fn planned_stats(plan: &SyncPlan) -> ExecutionStats {
    ExecutionStats {
        transferred: plan.stats.total_files,
        bytes_copied: plan.stats.total_bytes,
        copied_new: plan.stats.copy_count,
        replaced: plan.stats.replace_count,
        skipped: plan.stats.skip_count,
    }
}

fn transfer(
    plan: &SyncPlan,
    config: &Config,
    progress: &mut ProgressReporter,
) -> Result<ExecutionStats, SyncError> {
    progress.start_transfer(plan.stats.total_files as u64);
    let progress = RefCell::new(progress);

    let progress_cb = |event: &ExecutionEvent| match event {
        ExecutionEvent::ActionStart { action, record, .. } => {
            progress
                .borrow()
                .set_current_file(action, &record.name, record.size);
        }
        ExecutionEvent::ActionSuccess { bytes_copied, .. } => {
            progress.borrow_mut().complete_transfer_file(*bytes_copied);
        }
        ExecutionEvent::Checkpoint {
            transferred,
            bytes_copied,
        } => {
            progress.borrow().checkpoint(*transferred, *bytes_copied);
        }
        ExecutionEvent::ActionError {
            action,
            record,
            message,
            ..
        } => {
            progress
                .borrow()
                .transfer_error(action, &record.name, message);
        }
        ExecutionEvent::Complete { stats } => {
            progress.borrow().finish_transfer(stats);
        }
    };

    execute_plan(plan, config, Some(&progress_cb))
}

/// One-line suggestion for common failures
pub fn error_hint(error: &SyncError) -> Option<&'static str> {
    if error.is_disk_space_error() {
        return Some("Free disk space on the destination and run again.");
    }
    if error.is_permission_error() {
        return Some("Check permissions on the source and destination directories.");
    }
    match error {
        SyncError::DirectoryUnavailable { .. } => {
            Some("Check that the drive is mounted and the path is spelled correctly.")
        }
        SyncError::FileOperationFailure { source, .. } if source.kind() == ErrorKind::NotFound => {
            Some("The file changed during the run. Run again to pick up the current state.")
        }
        SyncError::FileOperationFailure { .. } => {
            Some("Run again; files already handled will not be touched twice.")
        }
        SyncError::Config(_) => Some("See --help for the available options."),
        SyncError::Io(_) => None,
    }
}
