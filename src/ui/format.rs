//! Size and list formatting for terminal output

const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;

/// Render a byte count with a 1024 divisor and two decimals
///
/// ```
/// use romsync::ui::format_size;
///
/// assert_eq!(format_size(1023), "1023.00B");
/// assert_eq!(format_size(1024), "1.00KB");
/// assert_eq!(format_size(1536 * 1024), "1.50MB");
/// ```
pub fn format_size(bytes: u64) -> String {
    if bytes < KB {
        format!("{:.2}B", bytes as f64)
    } else if bytes < MB {
        format!("{:.2}KB", bytes as f64 / KB as f64)
    } else if bytes < GB {
        format!("{:.2}MB", bytes as f64 / MB as f64)
    } else {
        format!("{:.2}GB", bytes as f64 / GB as f64)
    }
}

/// First `n` and last `n` names of a long list
///
/// Lists of up to `2 * n` names come back whole as the head with an empty tail.
pub fn preview_names(names: &[String], n: usize) -> (&[String], &[String]) {
    if names.len() <= n * 2 {
        (names, &names[..0])
    } else {
        (&names[..n], &names[names.len() - n..])
    }
}
