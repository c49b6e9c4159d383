//! Text rendering of a finished run

use super::{format_size, preview_names};
use crate::report::RunReport;
use crate::Config;
use console::style;

/// How many names to show from each end of a long list
const PREVIEW_LEN: usize = 10;

/// Human-readable summary of a run, one line per fact
pub fn render_report(report: &RunReport, config: &Config) -> String {
    let mut lines = Vec::new();

    if report.dry_run {
        lines.push(style("Dry run: no changes were made.").yellow().to_string());
    }

    let moved = &report.quarantine.moved;
    let verb = if report.dry_run {
        "Would quarantine"
    } else {
        "Quarantined"
    };
    lines.push(format!(
        "{} {} files not in {}",
        verb,
        moved.len(),
        config.source.display()
    ));
    push_preview(&mut lines, moved);

    let orphans = report.quarantine.orphans;
    lines.push(format!(
        "Total {} files {} in {} are not in source",
        orphans.count,
        format_size(orphans.bytes),
        config.quarantine_dir_name
    ));

    let sync = &report.sync;
    let verb = if report.dry_run {
        "would be processed"
    } else {
        "processed"
    };
    lines.push(format!(
        "Total {} files {}, {} ({} new, {} replaced, {} unchanged)",
        sync.transferred,
        verb,
        format_size(sync.bytes_copied),
        sync.copied_new,
        sync.replaced,
        sync.skipped
    ));

    let new_files = &report.new_files;
    lines.push(format!(
        "Total {} files {} are new",
        new_files.tally.count,
        format_size(new_files.tally.bytes)
    ));
    push_preview(&mut lines, &new_files.names);

    lines.push(format!(
        "Total {} files in {}, {}",
        report.destination.count,
        config.destination.display(),
        format_size(report.destination.bytes)
    ));

    lines.push(format!(
        "Total {} files in {} are still downloading, {} left",
        report.in_progress.count,
        config.source.display(),
        format_size(report.in_progress.bytes)
    ));

    lines.join("\n")
}

fn push_preview(lines: &mut Vec<String>, names: &[String]) {
    let (head, tail) = preview_names(names, PREVIEW_LEN);
    lines.extend(head.iter().map(|name| format!("  {}", name)));
    if !tail.is_empty() {
        lines.push(format!(
            "  ... {} more ...",
            names.len() - head.len() - tail.len()
        ));
        lines.extend(tail.iter().map(|name| format!("  {}", name)));
    }
}
