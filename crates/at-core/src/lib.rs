//! Core aggregation logic for the activity tracker.
//!
//! This crate turns the raw rows the capture daemon writes — focus
//! intervals, idle periods, input counters — into calendar-aligned usage
//! statistics:
//! - Bucketing: splitting intervals across hour/day boundaries
//! - Idle subtraction: the active residue of a focus interval
//! - Usage tables, heatmaps, idle distribution, daily summaries
//! - Focus session detection over input samples
//! - Website extraction from browser titles

pub mod aggregate;
pub mod bucket;
pub mod focus;
pub mod records;
pub mod report;
pub mod residue;
pub mod source;
pub mod stats;
pub mod website;

pub use aggregate::{
    DailySummary, DayActivity, DayCategory, HeatmapCell, IDLE_LABEL, IdleBucket, UsageRow,
    aggregate_usage, daily_activity, daily_summaries, heatmap, idle_distribution,
};
pub use bucket::{Granularity, round_seconds, split_interval};
pub use focus::{FocusConfig, FocusSession, attach_apps, detect_sessions};
pub use records::{ActivityInterval, IdlePeriod, InputSample};
pub use residue::active_residue;
pub use source::{DataSource, SourceError};
pub use stats::{ActivityStats, AppDuration, summarize};
pub use website::{UNKNOWN_WEBSITE, WebsiteActivity, is_browser, website_activity, website_label};
