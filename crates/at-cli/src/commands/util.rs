//! Shared utilities for CLI commands.

use chrono::{Duration, Local, NaiveDateTime};

/// Upper bound on `--days-back`; very large windows are the caller's problem
/// to avoid, so the CLI caps them here.
pub const MAX_DAYS_BACK: u32 = 365;

/// Reporting window covering the last `days_back` calendar days, today
/// included, as a half-open local-time interval.
pub fn report_window(days_back: u32) -> (NaiveDateTime, NaiveDateTime) {
    let days_back = days_back.clamp(1, MAX_DAYS_BACK);
    let today = Local::now().date_naive();
    let start = (today - Duration::days(i64::from(days_back) - 1))
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let end = (today + Duration::days(1)).and_hms_opt(0, 0, 0).unwrap();
    (start, end)
}

/// Formats whole seconds as a duration string.
/// Returns "Xh Ym" if >= 1 hour, "Xm" if >= 1 minute, "Xs" otherwise.
/// Negative durations are treated as 0s (defensive).
pub fn format_duration(seconds: i64) -> String {
    if seconds < 0 {
        return "0s".to_string();
    }
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;

    if hours >= 1 {
        format!("{hours}h {minutes}m")
    } else if minutes >= 1 {
        format!("{minutes}m")
    } else {
        format!("{seconds}s")
    }
}

/// Generates a 10-character progress bar.
/// Values <5% of max get a single block for visibility.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn progress_bar(value: i64, max: i64) -> String {
    if max <= 0 {
        return "░░░░░░░░░░".to_string();
    }

    let ratio = value as f64 / max as f64;
    let filled = if ratio < 0.05 && value > 0 {
        1 // Minimum 1 for visibility
    } else {
        // Clamp to 10 in case value > max (shouldn't happen, but defensive)
        (ratio * 10.0).round().min(10.0) as usize
    };

    let empty = 10 - filled;
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_hours_and_minutes() {
        assert_eq!(format_duration(9000), "2h 30m");
        assert_eq!(format_duration(3600), "1h 0m");
        assert_eq!(format_duration(5400), "1h 30m");
    }

    #[test]
    fn test_format_duration_minutes_only() {
        assert_eq!(format_duration(2700), "45m");
        assert_eq!(format_duration(60), "1m");
    }

    #[test]
    fn test_format_duration_seconds_and_zero() {
        assert_eq!(format_duration(45), "45s");
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(-10), "0s");
    }

    #[test]
    fn test_progress_bar_full_and_partial() {
        assert_eq!(progress_bar(100, 100), "██████████");
        assert_eq!(progress_bar(50, 100), "█████░░░░░");
        assert_eq!(progress_bar(20, 100), "██░░░░░░░░");
    }

    #[test]
    fn test_progress_bar_minimum_and_zero() {
        assert_eq!(progress_bar(1, 100), "█░░░░░░░░░");
        assert_eq!(progress_bar(0, 0), "░░░░░░░░░░");
        assert_eq!(progress_bar(0, 100), "░░░░░░░░░░");
    }

    #[test]
    fn test_report_window_spans_requested_days() {
        let (start, end) = report_window(7);
        assert_eq!(end - start, Duration::days(7));
        // Clamped below and above.
        let (start, end) = report_window(0);
        assert_eq!(end - start, Duration::days(1));
        let (start, end) = report_window(10_000);
        assert_eq!(end - start, Duration::days(i64::from(MAX_DAYS_BACK)));
    }
}
