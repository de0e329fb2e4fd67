//! Raw records produced by the capture daemon.
//!
//! These mirror the rows the tracker writes: focus intervals from the active
//! window poller, idle periods from the idle-timer, and per-minute input
//! counters. All timestamps are naive local wall-clock time — the daemon
//! records `isoformat()` without an offset, and every bucket key downstream
//! is defined in local time.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One continuous period an application held focus.
///
/// Immutable once written. Rows with a non-positive duration contribute
/// nothing to any aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityInterval {
    /// When the application gained focus.
    pub start_time: NaiveDateTime,
    /// Executable name of the focused application (e.g., `chrome.exe`).
    pub app_name: String,
    /// Window title at the time focus was gained.
    pub window_title: String,
    /// How long focus was held, in seconds.
    pub duration_seconds: i64,
}

impl ActivityInterval {
    /// Duration as a `chrono::Duration`, with negative values clamped to zero.
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::seconds(self.duration_seconds.max(0))
    }

    /// End of the interval (`start_time + duration`).
    #[must_use]
    pub fn end_time(&self) -> NaiveDateTime {
        self.start_time + self.duration()
    }
}

/// A period with no keyboard/mouse/controller input.
///
/// `end_time` is `None` while the period is still in progress; only closed
/// periods participate in aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdlePeriod {
    /// When the idle timer fired.
    pub start_time: NaiveDateTime,
    /// When input resumed, if it has.
    pub end_time: Option<NaiveDateTime>,
}

impl IdlePeriod {
    /// Returns `(start, end)` for a well-formed closed period.
    ///
    /// Open periods and periods with `end < start` yield `None` and are
    /// excluded from all aggregation. A zero-length period is returned as-is;
    /// it subtracts nothing.
    #[must_use]
    pub fn closed_bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let end = self.end_time?;
        if end < self.start_time {
            return None;
        }
        Some((self.start_time, end))
    }
}

/// Input counters for one polling period (nominally 60 s, never assumed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSample {
    /// When the counters were flushed.
    pub timestamp: NaiveDateTime,
    /// Keyboard presses during the period.
    pub key_presses: i64,
    /// Mouse clicks during the period.
    pub mouse_clicks: i64,
    /// Mouse travel in pixels during the period.
    pub mouse_distance: f64,
}
