//! Scalar and ranked aggregates for a bounded window.
//!
//! "Session" here means a raw activity-interval row — the unit the window
//! poller writes — not a detector-derived focus session. The two are
//! independent concepts and must not be conflated.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::records::{ActivityInterval, InputSample};

/// How many applications the ranking reports.
const TOP_APPS: usize = 3;

/// Seconds credited to one application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDuration {
    pub app_name: String,
    pub seconds: i64,
}

/// Summary aggregates over a window. All sums are zero, never absent, when
/// no rows match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityStats {
    pub total_active_seconds: i64,
    pub total_keystrokes: i64,
    /// Up to three applications, ranked by descending duration.
    pub top_apps: Vec<AppDuration>,
    pub average_session_seconds: i64,
    pub session_count: i64,
}

/// Summarizes raw activity rows and input samples.
///
/// Callers pass the rows already fetched for the window; rows with a
/// non-positive duration are ignored like everywhere else.
#[must_use]
pub fn summarize(intervals: &[ActivityInterval], samples: &[InputSample]) -> ActivityStats {
    let mut total_active_seconds = 0i64;
    let mut session_count = 0i64;
    let mut per_app: HashMap<&str, i64> = HashMap::new();

    for interval in intervals {
        if interval.duration_seconds <= 0 {
            continue;
        }
        total_active_seconds += interval.duration_seconds;
        session_count += 1;
        *per_app.entry(interval.app_name.as_str()).or_insert(0) += interval.duration_seconds;
    }

    let mut top_apps: Vec<AppDuration> = per_app
        .into_iter()
        .map(|(app_name, seconds)| AppDuration {
            app_name: app_name.to_string(),
            seconds,
        })
        .collect();
    top_apps.sort_by(|a, b| {
        b.seconds
            .cmp(&a.seconds)
            .then_with(|| a.app_name.cmp(&b.app_name))
    });
    top_apps.truncate(TOP_APPS);

    let total_keystrokes = samples.iter().map(|s| s.key_presses.max(0)).sum();
    let average_session_seconds = if session_count > 0 {
        total_active_seconds / session_count
    } else {
        0
    };

    ActivityStats {
        total_active_seconds,
        total_keystrokes,
        top_apps,
        average_session_seconds,
        session_count,
    }
}
