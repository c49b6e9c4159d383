//! Executor module for file operations

pub mod copy;
pub mod quarantine;

use crate::diff::SyncPlan;
use crate::types::{FileRecord, SyncAction, SyncError};
use crate::Config;
use serde::Serialize;

pub use copy::copy_file_atomic;
pub use quarantine::{move_to_quarantine, run_quarantine_stage, QuarantineReport};

/// Transfer statistics for a sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionStats {
    /// Files copied or replaced.
    pub transferred: usize,
    /// Aggregate copied bytes.
    pub bytes_copied: u64,
    /// Files that were absent at the destination.
    pub copied_new: usize,
    /// Files whose stale destination copy went to quarantine.
    pub replaced: usize,
    /// Files already in sync.
    pub skipped: usize,
}

/// Events emitted while executing a plan.
#[derive(Debug)]
pub enum ExecutionEvent {
    /// Transfer started.
    ActionStart {
        index: usize,
        total: usize,
        action: &'static str,
        record: FileRecord,
    },
    /// Transfer succeeded.
    ActionSuccess {
        index: usize,
        total: usize,
        action: &'static str,
        record: FileRecord,
        bytes_copied: u64,
        total_bytes_copied: u64,
    },
    /// Every `progress_interval` transfers.
    Checkpoint { transferred: usize, bytes_copied: u64 },
    /// Transfer failed; execution stops after this event.
    ActionError {
        index: usize,
        total: usize,
        action: &'static str,
        record: FileRecord,
        message: String,
    },
    /// Plan execution completed.
    Complete { stats: ExecutionStats },
}

/// Optional callback used to receive execution events.
pub type ExecutionCallback<'a> = dyn Fn(&ExecutionEvent) + 'a;

/// Execute a sync plan
///
/// Transfers run sequentially in plan order. The first failure is logged with
/// the offending file name and returned; nothing after it runs. Whatever was
/// already copied or quarantined stays that way, and a re-run only acts on the
/// remaining discrepancies.
pub fn execute_plan(
    plan: &SyncPlan,
    config: &Config,
    on_event: Option<&ExecutionCallback<'_>>,
) -> Result<ExecutionStats, SyncError> {
    let mut stats = ExecutionStats {
        skipped: plan.stats.skip_count,
        ..Default::default()
    };
    let total = plan.stats.total_files;

    for (idx, action) in plan.transfers().enumerate() {
        let index = idx + 1;
        let Some(record) = action.source() else {
            continue;
        };

        emit_event(
            on_event,
            ExecutionEvent::ActionStart {
                index,
                total,
                action: action.action_name(),
                record: record.clone(),
            },
        );

        let bytes = match execute_action(action, config) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::error!("{} of {} failed: {}", action.action_name(), record.name, err);
                emit_event(
                    on_event,
                    ExecutionEvent::ActionError {
                        index,
                        total,
                        action: action.action_name(),
                        record: record.clone(),
                        message: err.to_string(),
                    },
                );
                return Err(err);
            }
        };

        stats.transferred += 1;
        stats.bytes_copied += bytes;
        match action {
            SyncAction::CopyNew(_) => stats.copied_new += 1,
            SyncAction::Replace { .. } => stats.replaced += 1,
            SyncAction::Skip => {}
        }

        emit_event(
            on_event,
            ExecutionEvent::ActionSuccess {
                index,
                total,
                action: action.action_name(),
                record: record.clone(),
                bytes_copied: bytes,
                total_bytes_copied: stats.bytes_copied,
            },
        );

        if config.progress_interval > 0 && stats.transferred % config.progress_interval == 0 {
            tracing::debug!("Processed {} files", stats.transferred);
            emit_event(
                on_event,
                ExecutionEvent::Checkpoint {
                    transferred: stats.transferred,
                    bytes_copied: stats.bytes_copied,
                },
            );
        }
    }

    emit_event(
        on_event,
        ExecutionEvent::Complete {
            stats: stats.clone(),
        },
    );

    Ok(stats)
}

fn execute_action(action: &SyncAction, config: &Config) -> Result<u64, SyncError> {
    match action {
        SyncAction::CopyNew(record) => {
            tracing::debug!("{} is not in destination, copying", record.name);
            let src_path = config.source.join(&record.name);
            let dest_path = config.destination.join(&record.name);
            copy_file_atomic(&src_path, &dest_path)
        }
        SyncAction::Replace { source, stale } => {
            tracing::debug!(
                "{} is in destination but size differs ({} -> {} bytes), replacing",
                source.name,
                stale.size,
                source.size
            );
            replace_file(&source.name, config)
        }
        SyncAction::Skip => Ok(0),
    }
}

/// Replace a stale destination file
///
/// The new content is fully written to a part file before the stale copy is
/// quarantined, so the destination is only without the file between two
/// renames.
fn replace_file(name: &str, config: &Config) -> Result<u64, SyncError> {
    let src_path = config.source.join(name);
    let dest_path = config.destination.join(name);
    let part_path = copy::part_path_for(&dest_path);

    let bytes = copy::copy_to_part(&src_path, &part_path)?;

    if let Err(err) = move_to_quarantine(&dest_path, &config.quarantine_dir()) {
        copy::discard_part(&part_path);
        return Err(err);
    }

    copy::commit_part(&part_path, &dest_path)?;
    Ok(bytes)
}

fn emit_event(on_event: Option<&ExecutionCallback<'_>>, event: ExecutionEvent) {
    if let Some(callback) = on_event {
        callback(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::generate_sync_plan;
    use crate::scanner::list_directory;
    use std::cell::RefCell;
    use std::fs;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0
                .lock()
                .map_err(|_| io::Error::other("log buffer poisoned"))?
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn plan_for(config: &Config) -> SyncPlan {
        let src = list_directory(&config.source).expect("list source");
        let dst = list_directory(&config.destination).expect("list destination");
        generate_sync_plan(&src, &dst, &config.sync_extension)
    }

    #[test]
    fn test_execute_copies_missing_files() {
        let src = TempDir::new().expect("create src");
        let dst = TempDir::new().expect("create dst");
        fs::write(src.path().join("a.zip"), vec![1u8; 100]).expect("write a.zip");
        let config = Config::new(src.path(), dst.path());

        let stats = execute_plan(&plan_for(&config), &config, None).expect("execute succeeds");

        assert_eq!(stats.transferred, 1);
        assert_eq!(stats.copied_new, 1);
        assert_eq!(stats.bytes_copied, 100);
        assert_eq!(fs::read(dst.path().join("a.zip")).expect("read copy"), vec![1u8; 100]);
    }

    #[test]
    fn test_execute_replaces_stale_file_into_quarantine() {
        let src = TempDir::new().expect("create src");
        let dst = TempDir::new().expect("create dst");
        fs::write(src.path().join("c.zip"), vec![2u8; 200]).expect("write source");
        fs::write(dst.path().join("c.zip"), vec![9u8; 100]).expect("write stale");
        let config = Config::new(src.path(), dst.path());

        let stats = execute_plan(&plan_for(&config), &config, None).expect("execute succeeds");

        assert_eq!(stats.replaced, 1);
        assert_eq!(stats.bytes_copied, 200);
        assert_eq!(fs::read(dst.path().join("c.zip")).expect("read new"), vec![2u8; 200]);
        assert_eq!(
            fs::read(config.quarantine_dir().join("c.zip")).expect("read stale"),
            vec![9u8; 100]
        );
        assert!(!dst.path().join(".c.zip.part").exists());
    }

    #[test]
    fn test_checkpoint_cadence() {
        let src = TempDir::new().expect("create src");
        let dst = TempDir::new().expect("create dst");
        for i in 0..5 {
            fs::write(src.path().join(format!("g{}.zip", i)), b"x").expect("write source");
        }
        let mut config = Config::new(src.path(), dst.path());
        config.progress_interval = 2;

        let checkpoints = RefCell::new(Vec::new());
        let callback = |event: &ExecutionEvent| {
            if let ExecutionEvent::Checkpoint { transferred, .. } = event {
                checkpoints.borrow_mut().push(*transferred);
            }
        };

        execute_plan(&plan_for(&config), &config, Some(&callback)).expect("execute succeeds");

        assert_eq!(*checkpoints.borrow(), vec![2, 4]);
    }

    #[test]
    fn test_failure_stops_execution_and_reports_name() {
        let src = TempDir::new().expect("create src");
        let dst = TempDir::new().expect("create dst");
        let config = Config::new(src.path(), dst.path());

        let mut plan = SyncPlan::new();
        plan.add_action(SyncAction::CopyNew(FileRecord::new("vanished.zip", 10)));
        plan.add_action(SyncAction::CopyNew(FileRecord::new("never.zip", 10)));

        let errors = RefCell::new(Vec::new());
        let started = RefCell::new(0usize);
        let callback = |event: &ExecutionEvent| match event {
            ExecutionEvent::ActionStart { .. } => *started.borrow_mut() += 1,
            ExecutionEvent::ActionError { record, .. } => {
                errors.borrow_mut().push(record.name.clone())
            }
            _ => {}
        };

        let err = execute_plan(&plan, &config, Some(&callback)).unwrap_err();

        assert!(matches!(err, SyncError::FileOperationFailure { .. }));
        assert_eq!(*errors.borrow(), vec!["vanished.zip".to_string()]);
        assert_eq!(*started.borrow(), 1);
    }

    #[test]
    fn test_per_file_lines_stay_below_info() {
        let src = TempDir::new().expect("create src");
        let dst = TempDir::new().expect("create dst");
        fs::write(src.path().join("quiet.zip"), b"q").expect("write source");
        let mut config = Config::new(src.path(), dst.path());
        config.progress_interval = 1;

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            execute_plan(&plan_for(&config), &config, None).expect("execute succeeds");
        });

        let output = String::from_utf8(logs.0.lock().expect("lock logs").clone())
            .expect("utf-8 logs");
        assert!(!output.contains("quiet.zip"), "unexpected log output: {}", output);
        assert!(dst.path().join("quiet.zip").exists());
    }
}
