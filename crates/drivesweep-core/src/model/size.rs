/// Size and percentage formatting for the inventory table and CSV export.
///
/// All internal sizes are `u64` bytes. Floating point only appears at the
/// display-formatting boundary.

const UNITS: [&str; 5] = ["KB", "MB", "GB", "TB", "PB"];

/// Format a byte count into a human-readable string.
///
/// Binary multiples (1 KB = 1024 B), one decimal below a gigabyte and two
/// above, matching what Explorer users expect to see next to a drive size.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit >= 2 {
        format!("{value:.2} {}", UNITS[unit])
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// Format a share of the volume for the table ("0.125%").
pub fn format_percent(percent: f64) -> String {
    format!("{percent:.3}%")
}

/// Format a file count with thousand separators.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
