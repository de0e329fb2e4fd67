//! Focus sessions detected from input activity.

use std::fmt::Write;

use anyhow::Result;
use at_core::{FocusConfig, FocusSession, report};
use at_db::Database;

use super::util::{format_duration, report_window};

fn format_sessions(sessions: &[FocusSession]) -> String {
    let mut output = String::new();
    if sessions.is_empty() {
        writeln!(output, "No focus sessions detected in this window.").unwrap();
        return output;
    }

    writeln!(output, "FOCUS SESSIONS").unwrap();
    writeln!(output, "──────────────").unwrap();
    for session in sessions {
        let apps = if session.apps.is_empty() {
            "-".to_string()
        } else {
            session
                .apps
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        };
        writeln!(
            output,
            "{}  {:>7}  {} keys  {apps}",
            session.start_time.format("%Y-%m-%d %H:%M"),
            format_duration(session.duration_seconds),
            session.keystrokes
        )
        .unwrap();
    }
    output
}

/// Runs the sessions command.
pub fn run(db: &Database, days_back: u32, focus: &FocusConfig, json: bool) -> Result<()> {
    let (start, end) = report_window(days_back);
    let sessions = report::focus_report(db, start, end, focus)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
    } else {
        print!("{}", format_sessions(&sessions));
    }
    Ok(())
}
