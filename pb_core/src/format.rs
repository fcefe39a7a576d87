//! Text rendering shared by progress edits and the status command.

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]

/// Formats a number of seconds as `1h 1m 1s`, `1m 5s` or `0s`.
#[must_use]
pub fn format_eta(seconds: f64) -> String {
    let seconds = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };

    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;

    if h > 0 {
        format!("{h}h {m}m {s}s")
    } else if m > 0 {
        format!("{m}m {s}s")
    } else {
        format!("{s}s")
    }
}

/// Renders `[███░░░░░░░] 30.0%`. `percent` is clamped to `0..=100` first.
#[must_use]
pub fn progress_bar(percent: f64, length: usize) -> String {
    let percent = if percent.is_nan() {
        0.0
    } else {
        percent.clamp(0.0, 100.0)
    };

    let filled = ((length as f64 * percent / 100.0).floor() as usize).min(length);
    let empty = length - filled;

    format!(
        "[{}{}] {percent:.1}%",
        "█".repeat(filled),
        "░".repeat(empty)
    )
}
