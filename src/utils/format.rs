use unicode_width::UnicodeWidthStr;

/// Create a simple ASCII progress bar
pub fn progress_bar(filled: u32, total: u32, width: usize) -> String {
    if total == 0 {
        return "░".repeat(width);
    }
    let ratio = (filled as f64 / total as f64).min(1.0);
    let filled_count = (ratio * width as f64).round() as usize;
    let empty_count = width.saturating_sub(filled_count);
    format!("{}{}", "█".repeat(filled_count), "░".repeat(empty_count))
}

/// Completion band a day's percentage falls in; drives dot colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Full,
    High,
    Half,
    Low,
    Empty,
}

pub fn band(percentage: u8) -> Band {
    match percentage {
        100..=u8::MAX => Band::Full,
        80..=99 => Band::High,
        50..=79 => Band::Half,
        1..=49 => Band::Low,
        0 => Band::Empty,
    }
}

pub fn band_icon(b: Band) -> &'static str {
    match b {
        Band::Full => "●",
        Band::High => "◕",
        Band::Half => "◑",
        Band::Low => "◔",
        Band::Empty => "○",
    }
}

/// Center `s` in `width` terminal columns.
pub fn center(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    if w >= width {
        return s.to_string();
    }
    let left = (width - w) / 2;
    let right = width - w - left;
    format!("{}{}{}", " ".repeat(left), s, " ".repeat(right))
}

pub fn plural(n: u32, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{} {}", n, one)
    } else {
        format!("{} {}", n, many)
    }
}
