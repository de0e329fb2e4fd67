//! Calendar-aligned usage aggregation.
//!
//! Composes the interval splitter and idle subtractor over a window of
//! records to produce duration-per-bucket tables and their derived shapes
//! (day categories, heatmap cells, idle distribution, daily summaries).
//!
//! Rows are clipped to the half-open query window before any splitting, so
//! re-running over overlapping windows never credits time outside the window
//! and identical inputs always produce identical output.

use std::collections::{BTreeMap, HashMap};

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::bucket::{Granularity, round_seconds, split_interval, split_spans};
use crate::records::{ActivityInterval, IdlePeriod, InputSample};
use crate::residue::active_residue;

/// Reserved label for the idle series in usage tables.
///
/// Idle time is tracked as its own series, never subtracted from itself, so
/// "what the user was doing" and "when the user was away" stay additive but
/// distinct.
pub const IDLE_LABEL: &str = "Idle";

/// One cell of a usage table: seconds credited to a label within a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRow {
    /// Bucket key (`YYYY-MM-DD HH:00` or `YYYY-MM-DD`).
    pub bucket: String,
    /// Application name, or [`IDLE_LABEL`].
    pub label: String,
    /// Whole seconds, rounded once at output.
    pub seconds: i64,
}

/// Clips `[start, end)` to `[window_start, window_end)`.
pub(crate) fn clip_to_window(
    start: NaiveDateTime,
    end: NaiveDateTime,
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let clipped_start = start.max(window_start);
    let clipped_end = end.min(window_end);
    (clipped_start < clipped_end).then_some((clipped_start, clipped_end))
}

/// Aggregates activity and idle records into a per-bucket usage table.
///
/// Activity time is idle-subtracted before bucketing; idle periods are
/// bucketed independently under [`IDLE_LABEL`]. Output is ordered ascending
/// by bucket key with ties broken by descending seconds, so the dominant
/// application per bucket sorts first.
#[must_use]
pub fn aggregate_usage(
    intervals: &[ActivityInterval],
    idle_periods: &[IdlePeriod],
    granularity: Granularity,
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
) -> Vec<UsageRow> {
    let mut totals: HashMap<(String, String), Duration> = HashMap::new();

    for interval in intervals {
        if interval.duration_seconds <= 0 {
            continue;
        }
        let Some((start, end)) = clip_to_window(
            interval.start_time,
            interval.end_time(),
            window_start,
            window_end,
        ) else {
            continue;
        };
        for (fragment_start, fragment_end) in active_residue(start, end, idle_periods) {
            for (key, overlap) in
                split_interval(fragment_start, fragment_end - fragment_start, granularity)
            {
                let entry = totals
                    .entry((key, interval.app_name.clone()))
                    .or_insert_with(Duration::zero);
                *entry = *entry + overlap;
            }
        }
    }

    for idle in idle_periods {
        let Some((idle_start, idle_end)) = idle.closed_bounds() else {
            continue;
        };
        let Some((start, end)) = clip_to_window(idle_start, idle_end, window_start, window_end)
        else {
            continue;
        };
        for (key, overlap) in split_interval(start, end - start, granularity) {
            let entry = totals
                .entry((key, IDLE_LABEL.to_string()))
                .or_insert_with(Duration::zero);
            *entry = *entry + overlap;
        }
    }

    let mut rows: Vec<UsageRow> = totals
        .into_iter()
        .map(|((bucket, label), total)| UsageRow {
            bucket,
            label,
            seconds: round_seconds(total),
        })
        .collect();
    rows.sort_by(|a, b| {
        a.bucket
            .cmp(&b.bucket)
            .then_with(|| b.seconds.cmp(&a.seconds))
            .then_with(|| a.label.cmp(&b.label))
    });
    rows
}

/// Coarse productivity category for a day's active total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayCategory {
    /// More than 4 hours of active time.
    Productive,
    /// More than 2 hours of active time.
    Neutral,
    /// Everything else.
    Idle,
}

impl DayCategory {
    const PRODUCTIVE_THRESHOLD_SECONDS: i64 = 14_400;
    const NEUTRAL_THRESHOLD_SECONDS: i64 = 7_200;

    /// Classifies a day by its total active seconds. A simple threshold
    /// policy, nothing learned.
    #[must_use]
    pub const fn classify(active_seconds: i64) -> Self {
        if active_seconds > Self::PRODUCTIVE_THRESHOLD_SECONDS {
            Self::Productive
        } else if active_seconds > Self::NEUTRAL_THRESHOLD_SECONDS {
            Self::Neutral
        } else {
            Self::Idle
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Productive => "productive",
            Self::Neutral => "neutral",
            Self::Idle => "idle",
        }
    }
}

/// A day's idle-subtracted active total and its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayActivity {
    pub date: NaiveDate,
    pub active_seconds: i64,
    pub category: DayCategory,
}

/// Per-day active totals over the window, ascending by date.
#[must_use]
pub fn daily_activity(
    intervals: &[ActivityInterval],
    idle_periods: &[IdlePeriod],
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
) -> Vec<DayActivity> {
    let mut totals: BTreeMap<NaiveDate, Duration> = BTreeMap::new();

    for interval in intervals {
        if interval.duration_seconds <= 0 {
            continue;
        }
        let Some((start, end)) = clip_to_window(
            interval.start_time,
            interval.end_time(),
            window_start,
            window_end,
        ) else {
            continue;
        };
        for (fragment_start, fragment_end) in active_residue(start, end, idle_periods) {
            for (floor, overlap) in
                split_spans(fragment_start, fragment_end - fragment_start, Granularity::Day)
            {
                let entry = totals.entry(floor.date()).or_insert_with(Duration::zero);
                *entry = *entry + overlap;
            }
        }
    }

    totals
        .into_iter()
        .map(|(date, total)| {
            let active_seconds = round_seconds(total);
            DayActivity {
                date,
                active_seconds,
                category: DayCategory::classify(active_seconds),
            }
        })
        .collect()
}

/// One day-by-hour cell of the activity heatmap.
///
/// The cell's score is its idle-subtracted active seconds; scaling for
/// display is left to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub day: NaiveDate,
    /// Hour of day, 0–23.
    pub hour: u32,
    pub active_seconds: i64,
}

/// Day × hour active totals over the window, ascending by day then hour.
#[must_use]
pub fn heatmap(
    intervals: &[ActivityInterval],
    idle_periods: &[IdlePeriod],
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
) -> Vec<HeatmapCell> {
    let mut totals: BTreeMap<(NaiveDate, u32), Duration> = BTreeMap::new();

    for interval in intervals {
        if interval.duration_seconds <= 0 {
            continue;
        }
        let Some((start, end)) = clip_to_window(
            interval.start_time,
            interval.end_time(),
            window_start,
            window_end,
        ) else {
            continue;
        };
        for (fragment_start, fragment_end) in active_residue(start, end, idle_periods) {
            for (floor, overlap) in split_spans(
                fragment_start,
                fragment_end - fragment_start,
                Granularity::Hour,
            ) {
                let entry = totals
                    .entry((floor.date(), floor.hour()))
                    .or_insert_with(Duration::zero);
                *entry = *entry + overlap;
            }
        }
    }

    totals
        .into_iter()
        .map(|((day, hour), total)| HeatmapCell {
            day,
            hour,
            active_seconds: round_seconds(total),
        })
        .collect()
}

/// Idle totals for one hour of the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdleBucket {
    /// Hour of day, 0–23.
    pub hour_of_day: u32,
    pub idle_seconds: i64,
    /// Number of idle fragments touching this hour.
    pub idle_count: i64,
}

/// Distribution of idle time across hours of the day, ascending by hour.
///
/// Only hours with recorded idle time are emitted. A single long idle period
/// counts once per hour bucket it touches.
#[must_use]
pub fn idle_distribution(
    idle_periods: &[IdlePeriod],
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
) -> Vec<IdleBucket> {
    let mut totals: BTreeMap<u32, (Duration, i64)> = BTreeMap::new();

    for idle in idle_periods {
        let Some((idle_start, idle_end)) = idle.closed_bounds() else {
            continue;
        };
        let Some((start, end)) = clip_to_window(idle_start, idle_end, window_start, window_end)
        else {
            continue;
        };
        for (floor, overlap) in split_spans(start, end - start, Granularity::Hour) {
            let entry = totals
                .entry(floor.hour())
                .or_insert((Duration::zero(), 0));
            entry.0 = entry.0 + overlap;
            entry.1 += 1;
        }
    }

    totals
        .into_iter()
        .map(|(hour_of_day, (total, idle_count))| IdleBucket {
            hour_of_day,
            idle_seconds: round_seconds(total),
            idle_count,
        })
        .collect()
}

/// Per-day input counters joined with idle-subtracted active time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub key_presses: i64,
    pub mouse_clicks: i64,
    pub mouse_distance: f64,
    pub active_seconds: i64,
}

/// Daily input totals plus active time over the window, ascending by date.
///
/// Days appear if they have either input samples or active time; missing
/// counters default to zero.
#[must_use]
pub fn daily_summaries(
    samples: &[InputSample],
    intervals: &[ActivityInterval],
    idle_periods: &[IdlePeriod],
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
) -> Vec<DailySummary> {
    let mut days: BTreeMap<NaiveDate, DailySummary> = BTreeMap::new();

    for sample in samples {
        if sample.timestamp < window_start || sample.timestamp >= window_end {
            continue;
        }
        let date = sample.timestamp.date();
        let entry = days.entry(date).or_insert(DailySummary {
            date,
            key_presses: 0,
            mouse_clicks: 0,
            mouse_distance: 0.0,
            active_seconds: 0,
        });
        entry.key_presses += sample.key_presses.max(0);
        entry.mouse_clicks += sample.mouse_clicks.max(0);
        entry.mouse_distance += sample.mouse_distance.max(0.0);
    }

    for day in daily_activity(intervals, idle_periods, window_start, window_end) {
        let entry = days.entry(day.date).or_insert(DailySummary {
            date: day.date,
            key_presses: 0,
            mouse_clicks: 0,
            mouse_distance: 0.0,
            active_seconds: 0,
        });
        entry.active_seconds = day.active_seconds;
    }

    days.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn activity(start: NaiveDateTime, app: &str, duration_seconds: i64) -> ActivityInterval {
        ActivityInterval {
            start_time: start,
            app_name: app.to_string(),
            window_title: String::new(),
            duration_seconds,
        }
    }

    fn idle(start: NaiveDateTime, end: NaiveDateTime) -> IdlePeriod {
        IdlePeriod {
            start_time: start,
            end_time: Some(end),
        }
    }

    #[test]
    fn hourly_table_splits_and_subtracts_idle() {
        // One editor interval 23:30–00:30 with a 5-minute idle gap inside the
        // first hour. The idle series is tracked independently.
        let intervals = [activity(dt(10, 23, 30, 0), "editor.exe", 3600)];
        let idles = [idle(dt(10, 23, 45, 0), dt(10, 23, 50, 0))];

        let rows = aggregate_usage(
            &intervals,
            &idles,
            Granularity::Hour,
            dt(10, 0, 0, 0),
            dt(12, 0, 0, 0),
        );

        assert_eq!(
            rows,
            vec![
                UsageRow {
                    bucket: "2025-03-10 23:00".to_string(),
                    label: "editor.exe".to_string(),
                    seconds: 1500,
                },
                UsageRow {
                    bucket: "2025-03-10 23:00".to_string(),
                    label: IDLE_LABEL.to_string(),
                    seconds: 300,
                },
                UsageRow {
                    bucket: "2025-03-11 00:00".to_string(),
                    label: "editor.exe".to_string(),
                    seconds: 1800,
                },
            ]
        );
    }

    #[test]
    fn aggregation_is_idempotent() {
        let intervals = [
            activity(dt(10, 9, 12, 30), "editor.exe", 5000),
            activity(dt(10, 10, 0, 0), "chrome.exe", 1800),
            activity(dt(10, 10, 30, 0), "editor.exe", 1800),
        ];
        let idles = [idle(dt(10, 9, 40, 0), dt(10, 9, 55, 0))];
        let window = (dt(10, 0, 0, 0), dt(11, 0, 0, 0));

        let first = aggregate_usage(&intervals, &idles, Granularity::Hour, window.0, window.1);
        let second = aggregate_usage(&intervals, &idles, Granularity::Hour, window.0, window.1);
        assert_eq!(first, second);
    }

    #[test]
    fn output_ordered_by_bucket_then_descending_seconds() {
        let intervals = [
            activity(dt(10, 9, 0, 0), "small.exe", 600),
            activity(dt(10, 9, 10, 0), "big.exe", 1800),
        ];
        let rows = aggregate_usage(
            &intervals,
            &[],
            Granularity::Hour,
            dt(10, 0, 0, 0),
            dt(11, 0, 0, 0),
        );
        assert_eq!(rows[0].label, "big.exe");
        assert_eq!(rows[1].label, "small.exe");
    }

    #[test]
    fn rows_outside_window_are_clipped() {
        // Interval straddles the window end; only the inside portion counts.
        let intervals = [activity(dt(10, 23, 0, 0), "editor.exe", 7200)];
        let rows = aggregate_usage(
            &intervals,
            &[],
            Granularity::Hour,
            dt(10, 0, 0, 0),
            dt(11, 0, 0, 0),
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].seconds, 3600);
    }

    #[test]
    fn zero_and_negative_durations_contribute_nothing() {
        let intervals = [
            activity(dt(10, 9, 0, 0), "editor.exe", 0),
            activity(dt(10, 9, 0, 0), "editor.exe", -100),
        ];
        let rows = aggregate_usage(
            &intervals,
            &[],
            Granularity::Hour,
            dt(10, 0, 0, 0),
            dt(11, 0, 0, 0),
        );
        assert!(rows.is_empty());
    }

    #[test]
    fn empty_inputs_produce_empty_table() {
        let rows = aggregate_usage(
            &[],
            &[],
            Granularity::Day,
            dt(10, 0, 0, 0),
            dt(11, 0, 0, 0),
        );
        assert!(rows.is_empty());
    }

    #[test]
    fn day_category_thresholds() {
        assert_eq!(DayCategory::classify(14_401), DayCategory::Productive);
        assert_eq!(DayCategory::classify(14_400), DayCategory::Neutral);
        assert_eq!(DayCategory::classify(7_201), DayCategory::Neutral);
        assert_eq!(DayCategory::classify(7_200), DayCategory::Idle);
        assert_eq!(DayCategory::classify(0), DayCategory::Idle);
    }

    #[test]
    fn daily_activity_classifies_each_day() {
        let intervals = [
            activity(dt(10, 9, 0, 0), "editor.exe", 5 * 3600),
            activity(dt(11, 9, 0, 0), "editor.exe", 3 * 3600),
            activity(dt(12, 9, 0, 0), "editor.exe", 600),
        ];
        let days = daily_activity(&intervals, &[], dt(10, 0, 0, 0), dt(13, 0, 0, 0));
        assert_eq!(days.len(), 3);
        assert_eq!(days[0].category, DayCategory::Productive);
        assert_eq!(days[1].category, DayCategory::Neutral);
        assert_eq!(days[2].category, DayCategory::Idle);
    }

    #[test]
    fn heatmap_accumulates_per_day_hour_cell() {
        let intervals = [
            activity(dt(10, 9, 30, 0), "editor.exe", 3600),
            activity(dt(11, 9, 0, 0), "editor.exe", 900),
        ];
        let cells = heatmap(&intervals, &[], dt(10, 0, 0, 0), dt(12, 0, 0, 0));
        assert_eq!(
            cells,
            vec![
                HeatmapCell {
                    day: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
                    hour: 9,
                    active_seconds: 1800,
                },
                HeatmapCell {
                    day: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
                    hour: 10,
                    active_seconds: 1800,
                },
                HeatmapCell {
                    day: NaiveDate::from_ymd_opt(2025, 3, 11).unwrap(),
                    hour: 9,
                    active_seconds: 900,
                },
            ]
        );
    }

    #[test]
    fn idle_distribution_groups_by_hour_of_day() {
        let idles = [
            idle(dt(10, 13, 0, 0), dt(10, 13, 10, 0)),
            idle(dt(11, 13, 30, 0), dt(11, 13, 45, 0)),
            idle(dt(10, 22, 50, 0), dt(10, 23, 10, 0)),
        ];
        let buckets = idle_distribution(&idles, dt(10, 0, 0, 0), dt(12, 0, 0, 0));
        assert_eq!(
            buckets,
            vec![
                IdleBucket {
                    hour_of_day: 13,
                    idle_seconds: 1500,
                    idle_count: 2,
                },
                IdleBucket {
                    hour_of_day: 22,
                    idle_seconds: 600,
                    idle_count: 1,
                },
                IdleBucket {
                    hour_of_day: 23,
                    idle_seconds: 600,
                    idle_count: 1,
                },
            ]
        );
    }

    #[test]
    fn daily_summaries_join_samples_and_active_time() {
        let samples = [
            InputSample {
                timestamp: dt(10, 9, 1, 0),
                key_presses: 100,
                mouse_clicks: 20,
                mouse_distance: 1500.0,
            },
            InputSample {
                timestamp: dt(10, 9, 2, 0),
                key_presses: 50,
                mouse_clicks: 5,
                mouse_distance: 300.5,
            },
            InputSample {
                timestamp: dt(11, 14, 0, 0),
                key_presses: 10,
                mouse_clicks: 1,
                mouse_distance: 42.0,
            },
        ];
        let intervals = [activity(dt(10, 9, 0, 0), "editor.exe", 1800)];

        let summaries =
            daily_summaries(&samples, &intervals, &[], dt(10, 0, 0, 0), dt(12, 0, 0, 0));
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].key_presses, 150);
        assert_eq!(summaries[0].mouse_clicks, 25);
        assert!((summaries[0].mouse_distance - 1800.5).abs() < f64::EPSILON);
        assert_eq!(summaries[0].active_seconds, 1800);
        assert_eq!(summaries[1].key_presses, 10);
        assert_eq!(summaries[1].active_seconds, 0);
    }
}
