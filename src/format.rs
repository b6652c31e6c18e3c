//! human-readable renditions of measurements.

use crate::frame::Cell;


/// shown in place of a value that could not be read.
pub const NOT_AVAILABLE: &str = "n/a";

/// formats a count of bytes with one decimal place, in the largest unit up to gigabytes.
pub fn bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{value:.1}{}", UNITS[unit])
}

/// formats a span of seconds as days, hours, minutes and seconds.
pub fn uptime(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 { seconds as u64 } else { 0 };
    let (days, rest) = (total / 86_400, total % 86_400);
    let (hours, rest) = (rest / 3_600, rest % 3_600);
    let (minutes, seconds) = (rest / 60, rest % 60);

    format!("{days}d {hours:02}:{minutes:02}:{seconds:02}")
}

/// summarizes the power and throttling flags reported by the firmware.
///
/// the low bits describe conditions occurring now, and bits 16 through 19 describe conditions
/// that have occurred since boot.
pub fn throttle(flags: Option<u32>) -> String {
    const CONDITIONS: [(u32, &str); 4] = [(0, "UV"), (1, "CAP"), (2, "THR"), (3, "TMP")];
    const HISTORY: u32 = 16;

    let Some(flags) = flags else {
        return format!("PWR {NOT_AVAILABLE}");
    };
    if flags == 0 {
        return "PWR OK".to_owned();
    }

    let conditions = |offset: u32| {
        CONDITIONS
            .iter()
            .filter(|(bit, _)| flags & (1 << (bit + offset)) != 0)
            .map(|(_, name)| *name)
            .collect::<Vec<_>>()
            .join(" ")
    };
    let (now, history) = (conditions(0), conditions(HISTORY));
    let now = if now.is_empty() { "OK" } else { now.as_str() };

    if history.is_empty() {
        format!("PWR {now}")
    } else {
        format!("PWR {now} |H:{history}")
    }
}

/// returns the number of columns `text` takes when drawn.
pub fn columns(text: &str) -> usize {
    text.chars().map(|c| Cell::displayed(c).1 as usize).sum()
}

/// returns the longest start of `text` that fits in `width` columns, as drawn by a
/// [`View`](crate::frame::View).
pub fn truncate(text: &str, width: usize) -> &str {
    let mut columns = 0;
    for (end, c) in text.char_indices() {
        let (_, glyph_width) = Cell::displayed(c);
        columns += glyph_width as usize;
        if columns > width {
            return &text[..end];
        }
    }
    text
}
