//! Progress reporting

use super::format_size;
use crate::executor::ExecutionStats;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};

/// Progress reporter for a pipeline run
pub struct ProgressReporter {
    stage_bar: ProgressBar,
    transfer_bar: ProgressBar,
    transfer_started_at: Option<Instant>,
    transferred_bytes: u64,
}

impl ProgressReporter {
    /// Create a reporter drawing to stderr
    ///
    /// indicatif hides the bars by itself when stderr is not a terminal.
    pub fn new() -> Self {
        let stage_bar = ProgressBar::new_spinner();
        stage_bar.enable_steady_tick(Duration::from_millis(120));
        Self::with_bars(stage_bar, ProgressBar::new(0))
    }

    /// Create a reporter that never draws
    pub fn hidden() -> Self {
        Self::with_bars(ProgressBar::hidden(), ProgressBar::hidden())
    }

    fn with_bars(stage_bar: ProgressBar, transfer_bar: ProgressBar) -> Self {
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            stage_bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        }
        if let Ok(style) =
            ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} files | {msg}")
        {
            transfer_bar.set_style(style.progress_chars("=>-"));
        }

        Self {
            stage_bar,
            transfer_bar,
            transfer_started_at: None,
            transferred_bytes: 0,
        }
    }

    /// Mark start of a pipeline stage.
    pub fn start_stage(&self, label: &str) {
        self.stage_bar.set_message(format!("{}...", label));
    }

    /// Stop the spinner once every stage has run.
    pub fn finish(&self) {
        self.stage_bar.finish_and_clear();
    }

    /// Initialize transfer progress.
    pub fn start_transfer(&mut self, total_transfer_files: u64) {
        self.transfer_started_at = Some(Instant::now());
        self.transferred_bytes = 0;
        self.transfer_bar.set_length(total_transfer_files);
        self.transfer_bar.set_position(0);
        self.transfer_bar
            .set_message("Starting transfer...".to_string());
    }

    /// Update current file/action indicator.
    pub fn set_current_file(&self, action: &str, name: &str, size: u64) {
        self.transfer_bar
            .set_message(format!("{} {} ({})", action, name, format_size(size)));
    }

    /// Mark one transfer complete and refresh throughput display.
    pub fn complete_transfer_file(&mut self, bytes: u64) {
        self.transferred_bytes = self.transferred_bytes.saturating_add(bytes);
        self.transfer_bar.inc(1);

        let throughput = self.current_throughput_bps();
        self.transfer_bar.set_message(format!(
            "{} copied | {}/s",
            format_size(self.transferred_bytes),
            format_size(throughput)
        ));
    }

    /// Print a periodic checkpoint above the bar.
    pub fn checkpoint(&self, transferred: usize, bytes: u64) {
        self.transfer_bar.println(format!(
            "Processed {} files, {} copied",
            transferred,
            format_size(bytes)
        ));
    }

    /// Surface a failed transfer.
    pub fn transfer_error(&self, action: &str, name: &str, err: &str) {
        self.transfer_bar
            .println(format!("ERROR {} {}: {}", action, name, err));
        self.transfer_bar.abandon();
    }

    /// Finalize transfer progress.
    pub fn finish_transfer(&self, stats: &ExecutionStats) {
        let throughput = self.current_throughput_bps();
        self.transfer_bar.finish_with_message(format!(
            "{} copied, {} replaced | {} total | {}/s",
            stats.copied_new,
            stats.replaced,
            format_size(stats.bytes_copied),
            format_size(throughput)
        ));
    }

    fn current_throughput_bps(&self) -> u64 {
        match self.transfer_started_at {
            Some(started) => {
                let secs = started.elapsed().as_secs_f64();
                if secs > 0.0 {
                    (self.transferred_bytes as f64 / secs) as u64
                } else {
                    0
                }
            }
            None => 0,
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}
