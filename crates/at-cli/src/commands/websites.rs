//! Top websites by browser time.

use std::fmt::Write;

use anyhow::Result;
use at_core::{WebsiteActivity, report};
use at_db::Database;

use super::util::{format_duration, progress_bar, report_window};

fn format_websites(rows: &[WebsiteActivity]) -> String {
    let mut output = String::new();
    if rows.is_empty() {
        writeln!(output, "No browser activity recorded in this window.").unwrap();
        return output;
    }

    let max_seconds = rows.first().map_or(0, |r| r.seconds);
    writeln!(output, "WEBSITES").unwrap();
    writeln!(output, "────────").unwrap();
    for row in rows {
        let duration = format_duration(row.seconds);
        let bar = progress_bar(row.seconds, max_seconds);
        writeln!(output, "{:<32} {duration:>7}  {bar}", row.website).unwrap();
    }
    output
}

/// Runs the websites command.
pub fn run(db: &Database, days_back: u32, json: bool) -> Result<()> {
    let (start, end) = report_window(days_back);
    let rows = report::website_report(db, start, end)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!("{}", format_websites(&rows));
    }
    Ok(())
}
