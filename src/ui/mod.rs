//! Terminal output: progress bars, size formatting, report rendering

mod format;
mod progress;
mod render;

pub use format::{format_size, preview_names};
pub use progress::ProgressReporter;
pub use render::render_report;
