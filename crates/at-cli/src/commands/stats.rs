//! Summary statistics for a window.

use std::fmt::Write;

use anyhow::Result;
use at_core::{ActivityStats, report};
use at_db::Database;

use super::util::{format_duration, report_window};

fn format_stats(stats: &ActivityStats) -> String {
    let mut output = String::new();
    writeln!(output, "SUMMARY").unwrap();
    writeln!(output, "───────").unwrap();
    writeln!(
        output,
        "Active time:  {}",
        format_duration(stats.total_active_seconds)
    )
    .unwrap();
    writeln!(
        output,
        "Sessions:     {} (avg {})",
        stats.session_count,
        format_duration(stats.average_session_seconds)
    )
    .unwrap();
    writeln!(output, "Keystrokes:   {}", stats.total_keystrokes).unwrap();
    if !stats.top_apps.is_empty() {
        writeln!(output, "Top apps:").unwrap();
        for app in &stats.top_apps {
            writeln!(output, "  {}  {}", app.app_name, format_duration(app.seconds)).unwrap();
        }
    }
    output
}

/// Runs the stats command.
pub fn run(db: &Database, days_back: u32, json: bool) -> Result<()> {
    let (start, end) = report_window(days_back);
    let stats = report::stats_report(db, start, end)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print!("{}", format_stats(&stats));
    }
    Ok(())
}
