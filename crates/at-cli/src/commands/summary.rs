//! Per-day input counters and active time.

use std::fmt::Write;

use anyhow::Result;
use at_core::{DailySummary, report};
use at_db::Database;

use super::util::{format_duration, report_window};

#[allow(clippy::cast_possible_truncation)]
fn format_summaries(summaries: &[DailySummary]) -> String {
    let mut output = String::new();
    if summaries.is_empty() {
        writeln!(output, "No records in this window.").unwrap();
        return output;
    }

    writeln!(output, "DAILY SUMMARY").unwrap();
    writeln!(output, "─────────────").unwrap();
    for day in summaries {
        writeln!(
            output,
            "{}  active {:>7}  keys {:>6}  clicks {:>5}  mouse {}px",
            day.date,
            format_duration(day.active_seconds),
            day.key_presses,
            day.mouse_clicks,
            day.mouse_distance.round() as i64
        )
        .unwrap();
    }
    output
}

/// Runs the summary command.
pub fn run(db: &Database, days_back: u32, json: bool) -> Result<()> {
    let (start, end) = report_window(days_back);
    let summaries = report::daily_summary_report(db, start, end)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        print!("{}", format_summaries(&summaries));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_format_summaries_empty() {
        assert_eq!(format_summaries(&[]), "No records in this window.\n");
    }

    #[test]
    fn test_format_summaries_rows() {
        let summaries = [DailySummary {
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            key_presses: 1500,
            mouse_clicks: 230,
            mouse_distance: 10_432.6,
            active_seconds: 16_200,
        }];
        let output = format_summaries(&summaries);
        assert!(output.contains("2025-03-10"));
        assert!(output.contains("4h 30m"));
        assert!(output.contains("keys   1500"));
        assert!(output.contains("clicks   230"));
        assert!(output.contains("mouse 10433px"));
    }
}
