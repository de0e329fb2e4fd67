//! Day-by-hour activity heatmap.

use std::collections::BTreeMap;
use std::fmt::Write;

use anyhow::Result;
use at_core::{HeatmapCell, report};
use at_db::Database;
use chrono::NaiveDate;

use super::util::report_window;

/// Intensity glyph for a cell relative to the busiest cell.
#[allow(clippy::cast_precision_loss)]
fn intensity(seconds: i64, max: i64) -> char {
    if seconds <= 0 || max <= 0 {
        return '·';
    }
    let ratio = seconds as f64 / max as f64;
    if ratio <= 0.25 {
        '░'
    } else if ratio <= 0.5 {
        '▒'
    } else if ratio <= 0.75 {
        '▓'
    } else {
        '█'
    }
}

fn format_heatmap(cells: &[HeatmapCell]) -> String {
    let mut output = String::new();
    if cells.is_empty() {
        writeln!(output, "No activity recorded in this window.").unwrap();
        return output;
    }

    let max = cells.iter().map(|c| c.active_seconds).max().unwrap_or(0);
    let mut days: BTreeMap<NaiveDate, [i64; 24]> = BTreeMap::new();
    for cell in cells {
        let hours = days.entry(cell.day).or_insert([0; 24]);
        if let Some(slot) = hours.get_mut(cell.hour as usize) {
            *slot = cell.active_seconds;
        }
    }

    writeln!(output, "HEATMAP (hours 00-23)").unwrap();
    writeln!(output, "─────────────────────").unwrap();
    for (day, hours) in days {
        let row: String = hours.iter().map(|&s| intensity(s, max)).collect();
        writeln!(output, "{day}  {row}").unwrap();
    }
    output
}

/// Runs the heatmap command.
pub fn run(db: &Database, days_back: u32, json: bool) -> Result<()> {
    let (start, end) = report_window(days_back);
    let cells = report::heatmap_report(db, start, end)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&cells)?);
    } else {
        print!("{}", format_heatmap(&cells));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(day: u32, hour: u32, active_seconds: i64) -> HeatmapCell {
        HeatmapCell {
            day: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            hour,
            active_seconds,
        }
    }

    #[test]
    fn test_format_heatmap_empty() {
        assert_eq!(format_heatmap(&[]), "No activity recorded in this window.\n");
    }

    #[test]
    fn test_intensity_scale() {
        assert_eq!(intensity(0, 100), '·');
        assert_eq!(intensity(20, 100), '░');
        assert_eq!(intensity(50, 100), '▒');
        assert_eq!(intensity(75, 100), '▓');
        assert_eq!(intensity(100, 100), '█');
    }

    #[test]
    fn test_format_heatmap_rows_are_24_wide() {
        let cells = [cell(10, 9, 3600), cell(10, 14, 900), cell(11, 9, 1800)];
        let output = format_heatmap(&cells);
        let rows: Vec<&str> = output.lines().skip(2).collect();
        assert_eq!(rows.len(), 2);
        for row in rows {
            // "YYYY-MM-DD" + two spaces + 24 glyphs
            assert_eq!(row.chars().count(), 12 + 24);
        }
        assert!(output.contains("2025-03-10"));
        assert!(output.contains('█'));
    }
}
