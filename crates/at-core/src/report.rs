//! Report orchestration: fetch rows through a [`DataSource`], run the pure
//! aggregation, shape the output.
//!
//! Every function here is a synchronous, read-only computation over the
//! snapshot it fetched; concurrent calls for different windows are fully
//! independent. Bounding very large windows (e.g., capping a `--days-back`
//! argument) is the caller's job.

use chrono::NaiveDateTime;

use crate::aggregate::{
    self, DailySummary, DayActivity, HeatmapCell, IdleBucket, UsageRow,
};
use crate::bucket::Granularity;
use crate::focus::{FocusConfig, FocusSession, attach_apps, detect_sessions};
use crate::source::{DataSource, SourceError};
use crate::stats::{self, ActivityStats};
use crate::website::{self, WebsiteActivity};

/// Per-bucket usage table for the window.
pub fn usage_report<S: DataSource>(
    source: &S,
    granularity: Granularity,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<Vec<UsageRow>, SourceError> {
    tracing::debug!(%granularity, %start, %end, "building usage table");
    let intervals = source.activity_intervals(start, end)?;
    let idles = source.idle_periods(start, end)?;
    Ok(aggregate::aggregate_usage(
        &intervals,
        &idles,
        granularity,
        start,
        end,
    ))
}

/// Per-day active totals with categories.
pub fn daily_activity_report<S: DataSource>(
    source: &S,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<Vec<DayActivity>, SourceError> {
    let intervals = source.activity_intervals(start, end)?;
    let idles = source.idle_periods(start, end)?;
    Ok(aggregate::daily_activity(&intervals, &idles, start, end))
}

/// Top websites by idle-subtracted browser time.
pub fn website_report<S: DataSource>(
    source: &S,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<Vec<WebsiteActivity>, SourceError> {
    let intervals = source.activity_intervals(start, end)?;
    let idles = source.idle_periods(start, end)?;
    Ok(website::website_activity(&intervals, &idles, start, end))
}

/// Day × hour activity cells.
pub fn heatmap_report<S: DataSource>(
    source: &S,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<Vec<HeatmapCell>, SourceError> {
    let intervals = source.activity_intervals(start, end)?;
    let idles = source.idle_periods(start, end)?;
    Ok(aggregate::heatmap(&intervals, &idles, start, end))
}

/// Idle time distribution by hour of day.
pub fn idle_report<S: DataSource>(
    source: &S,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<Vec<IdleBucket>, SourceError> {
    let idles = source.idle_periods(start, end)?;
    Ok(aggregate::idle_distribution(&idles, start, end))
}

/// Per-day input counters joined with active time.
pub fn daily_summary_report<S: DataSource>(
    source: &S,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<Vec<DailySummary>, SourceError> {
    let samples = source.input_samples(start, end)?;
    let intervals = source.activity_intervals(start, end)?;
    let idles = source.idle_periods(start, end)?;
    Ok(aggregate::daily_summaries(
        &samples, &intervals, &idles, start, end,
    ))
}

/// Focus sessions with their active applications attached.
///
/// A failed sample fetch propagates; a failed activity lookup only degrades
/// the result — sessions come back with empty `apps` rather than failing the
/// whole detection.
pub fn focus_report<S: DataSource>(
    source: &S,
    start: NaiveDateTime,
    end: NaiveDateTime,
    config: &FocusConfig,
) -> Result<Vec<FocusSession>, SourceError> {
    let samples = source.input_samples(start, end)?;
    let mut sessions = detect_sessions(&samples, config);

    match source.activity_intervals(start, end) {
        Ok(intervals) => attach_apps(&mut sessions, &intervals),
        Err(error) => {
            tracing::warn!(%error, "activity lookup failed, sessions reported without apps");
        }
    }
    Ok(sessions)
}

/// Summary aggregates over the window.
pub fn stats_report<S: DataSource>(
    source: &S,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<ActivityStats, SourceError> {
    let intervals = source.activity_intervals(start, end)?;
    let samples = source.input_samples(start, end)?;
    Ok(stats::summarize(&intervals, &samples))
}
