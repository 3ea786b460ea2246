#![forbid(unsafe_code)]

//! Human-readable formatting for status lines.

use stui_core::Timer;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

/// Format a byte count with binary units, one decimal past KiB.
pub fn fmt_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

/// Format a transfer rate.
pub fn fmt_rate(bytes_per_sec: u64) -> String {
    format!("{}/s", fmt_bytes(bytes_per_sec))
}

/// Format completion as a percentage with one decimal.
pub fn fmt_percent(ratio: f64) -> String {
    format!("{:.1}%", (ratio * 100.0).clamp(0.0, 100.0))
}

/// Format a wall-clock timer as `HH:MM:SS` (UTC).
pub fn fmt_clock(t: Timer) -> String {
    let day_secs = t.as_secs().rem_euclid(86_400);
    format!(
        "{:02}:{:02}:{:02}",
        day_secs / 3600,
        (day_secs % 3600) / 60,
        day_secs % 60
    )
}

/// Format an estimated remaining time, `--` when the rate is zero.
pub fn fmt_eta(remaining_bytes: u64, rate: u64) -> String {
    if remaining_bytes == 0 {
        return "done".to_owned();
    }
    if rate == 0 {
        return "--".to_owned();
    }
    let secs = remaining_bytes / rate;
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m{:02}s", secs / 60, secs % 60)
    } else if secs < 86_400 {
        format!("{}h{:02}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d{:02}h", secs / 86_400, (secs % 86_400) / 3600)
    }
}

/// Clip `text` to `width` display cells and pad with spaces to exactly
/// that width. Wide glyphs never straddle the cut.
pub fn pad_to_width(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    while used < width {
        out.push(' ');
        used += 1;
    }
    out
}

/// Right-align `text` within `width` cells, clipping on the left budget.
pub fn right_align(text: &str, width: usize) -> String {
    let text_width = text.width();
    if text_width >= width {
        return pad_to_width(text, width);
    }
    let mut out = " ".repeat(width - text_width);
    out.push_str(text);
    out
}
