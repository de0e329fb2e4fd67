//! Calendar bucketing: keys and the interval splitter.
//!
//! An interval `[start, start + duration)` is decomposed into sub-intervals
//! that each lie fully within one calendar hour or day, so durations can be
//! accumulated per bucket without double counting. The decomposition is
//! exact: the emitted overlaps sum to the input duration, and sub-second
//! remainders survive until [`round_seconds`] is applied at output time.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// The bucketing unit for aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Calendar hour, keyed `YYYY-MM-DD HH:00`.
    Hour,
    /// Calendar day, keyed `YYYY-MM-DD`.
    Day,
}

impl Granularity {
    /// Start of the bucket containing `ts`.
    #[must_use]
    pub fn bucket_floor(self, ts: NaiveDateTime) -> NaiveDateTime {
        match self {
            Self::Hour => ts.date().and_hms_opt(ts.hour(), 0, 0).unwrap(),
            Self::Day => ts.date().and_hms_opt(0, 0, 0).unwrap(),
        }
    }

    /// End of the bucket containing `ts` (start of the next bucket).
    #[must_use]
    pub fn bucket_end(self, ts: NaiveDateTime) -> NaiveDateTime {
        match self {
            Self::Hour => self.bucket_floor(ts) + Duration::hours(1),
            Self::Day => self.bucket_floor(ts) + Duration::days(1),
        }
    }

    /// Key for the bucket containing `ts`.
    #[must_use]
    pub fn bucket_key(self, ts: NaiveDateTime) -> String {
        match self {
            Self::Hour => ts.format("%Y-%m-%d %H:00").to_string(),
            Self::Day => ts.format("%Y-%m-%d").to_string(),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = UnknownGranularity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hour" | "hourly" => Ok(Self::Hour),
            "day" | "daily" => Ok(Self::Day),
            _ => Err(UnknownGranularity(s.to_string())),
        }
    }
}

/// Error type for unknown granularity strings.
#[derive(Debug, Clone)]
pub struct UnknownGranularity(String);

impl fmt::Display for UnknownGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown granularity: {}", self.0)
    }
}

impl std::error::Error for UnknownGranularity {}

/// Splits `[start, start + duration)` into per-bucket spans.
///
/// Each emitted pair is the start of a bucket and the portion of the interval
/// falling inside it, ordered chronologically. The cursor strictly advances
/// and is bounded by the interval end, so this terminates; the overlaps sum
/// to `duration` exactly. A non-positive duration yields nothing.
#[must_use]
pub fn split_spans(
    start: NaiveDateTime,
    duration: Duration,
    granularity: Granularity,
) -> Vec<(NaiveDateTime, Duration)> {
    if duration <= Duration::zero() {
        return Vec::new();
    }

    let end = start + duration;
    let mut spans = Vec::new();
    let mut cursor = start;
    while cursor < end {
        let segment_end = granularity.bucket_end(cursor).min(end);
        let overlap = segment_end - cursor;
        if overlap > Duration::zero() {
            spans.push((granularity.bucket_floor(cursor), overlap));
        }
        cursor = segment_end;
    }
    spans
}

/// Splits `[start, start + duration)` into `(bucket key, overlap)` pairs.
#[must_use]
pub fn split_interval(
    start: NaiveDateTime,
    duration: Duration,
    granularity: Granularity,
) -> Vec<(String, Duration)> {
    split_spans(start, duration, granularity)
        .into_iter()
        .map(|(floor, overlap)| (granularity.bucket_key(floor), overlap))
        .collect()
}

/// Rounds a duration to the nearest whole second.
///
/// Applied once, at the final output step, never mid-computation.
#[must_use]
pub fn round_seconds(duration: Duration) -> i64 {
    (duration.num_milliseconds() + 500).div_euclid(1000)
}
