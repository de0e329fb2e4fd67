//! Usage report: per-hour or per-day duration tables.

use std::fmt::Write;

use anyhow::Result;
use at_core::{DayActivity, Granularity, UsageRow, report};
use at_db::Database;
use serde::Serialize;

use super::util::{format_duration, progress_bar, report_window};

/// JSON report structure.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    granularity: Granularity,
    rows: &'a [UsageRow],
    #[serde(skip_serializing_if = "Option::is_none")]
    days: Option<&'a [DayActivity]>,
}

/// Formats the usage table.
fn format_usage(rows: &[UsageRow]) -> String {
    let mut output = String::new();
    if rows.is_empty() {
        writeln!(output, "No activity recorded in this window.").unwrap();
        return output;
    }

    let max_seconds = rows.iter().map(|r| r.seconds).max().unwrap_or(0);
    writeln!(output, "USAGE").unwrap();
    writeln!(output, "─────").unwrap();
    for row in rows {
        let duration = format_duration(row.seconds);
        let bar = progress_bar(row.seconds, max_seconds);
        writeln!(
            output,
            "{:<16}  {:<24} {duration:>7}  {bar}",
            row.bucket, row.label
        )
        .unwrap();
    }
    output
}

/// Formats the per-day category section shown with --daily.
fn format_day_categories(days: &[DayActivity]) -> String {
    let mut output = String::new();
    if days.is_empty() {
        return output;
    }
    writeln!(output).unwrap();
    writeln!(output, "DAY CATEGORIES").unwrap();
    writeln!(output, "──────────────").unwrap();
    for day in days {
        writeln!(
            output,
            "{}  {:>7}  {}",
            day.date,
            format_duration(day.active_seconds),
            day.category.as_str()
        )
        .unwrap();
    }
    output
}

/// Runs the report command.
pub fn run(db: &Database, daily: bool, days_back: u32, json: bool) -> Result<()> {
    let (start, end) = report_window(days_back);
    let granularity = if daily {
        Granularity::Day
    } else {
        Granularity::Hour
    };

    let rows = report::usage_report(db, granularity, start, end)?;
    let days = daily
        .then(|| report::daily_activity_report(db, start, end))
        .transpose()?;

    if json {
        let output = serde_json::to_string_pretty(&JsonReport {
            granularity,
            rows: &rows,
            days: days.as_deref(),
        })?;
        println!("{output}");
    } else {
        print!("{}", format_usage(&rows));
        if let Some(days) = &days {
            print!("{}", format_day_categories(days));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use at_core::DayCategory;
    use chrono::NaiveDate;

    #[test]
    fn test_format_usage_empty() {
        assert_eq!(format_usage(&[]), "No activity recorded in this window.\n");
    }

    #[test]
    fn test_format_usage_rows() {
        let rows = [
            UsageRow {
                bucket: "2025-03-10 09:00".to_string(),
                label: "editor.exe".to_string(),
                seconds: 3600,
            },
            UsageRow {
                bucket: "2025-03-10 09:00".to_string(),
                label: "chrome.exe".to_string(),
                seconds: 900,
            },
        ];
        let output = format_usage(&rows);
        assert!(output.contains("2025-03-10 09:00"));
        assert!(output.contains("editor.exe"));
        assert!(output.contains("1h 0m"));
        assert!(output.contains("██████████"));
        assert!(output.contains("15m"));
    }

    #[test]
    fn test_format_day_categories() {
        let days = [DayActivity {
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            active_seconds: 16_200,
            category: DayCategory::Productive,
        }];
        let output = format_day_categories(&days);
        assert!(output.contains("2025-03-10"));
        assert!(output.contains("4h 30m"));
        assert!(output.contains("productive"));
    }
}
