//! Idle time distribution by hour of day.

use std::fmt::Write;

use anyhow::Result;
use at_core::{IdleBucket, report};
use at_db::Database;

use super::util::{format_duration, report_window};

fn format_idle(buckets: &[IdleBucket]) -> String {
    let mut output = String::new();
    if buckets.is_empty() {
        writeln!(output, "No idle time recorded in this window.").unwrap();
        return output;
    }

    writeln!(output, "IDLE BY HOUR").unwrap();
    writeln!(output, "────────────").unwrap();
    for bucket in buckets {
        let periods = if bucket.idle_count == 1 {
            "period"
        } else {
            "periods"
        };
        writeln!(
            output,
            "{:02}:00  {:>7}  ({} {periods})",
            bucket.hour_of_day,
            format_duration(bucket.idle_seconds),
            bucket.idle_count
        )
        .unwrap();
    }
    output
}

/// Runs the idle command.
pub fn run(db: &Database, days_back: u32, json: bool) -> Result<()> {
    let (start, end) = report_window(days_back);
    let buckets = report::idle_report(db, start, end)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&buckets)?);
    } else {
        print!("{}", format_idle(&buckets));
    }
    Ok(())
}
