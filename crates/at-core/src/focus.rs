//! Focus session detection over input-metric samples.
//!
//! Adjacent samples merge into one session while the gap between them stays
//! within a tolerance; sessions shorter than a minimum are discarded. A
//! focus session is a derived, never-persisted value — recomputed on every
//! query — and is distinct from a raw activity interval.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::records::{ActivityInterval, InputSample};

/// Policy knobs for session detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusConfig {
    /// Largest gap between samples that still extends a session.
    /// Default: 300 (5 minutes).
    pub max_gap_seconds: i64,

    /// Shortest session worth reporting.
    /// Default: 600 (10 minutes).
    pub min_session_seconds: i64,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            max_gap_seconds: 300,
            min_session_seconds: 600,
        }
    }
}

/// A sustained period of continuous input activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusSession {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub duration_seconds: i64,
    /// Total key presses across the merged samples.
    pub keystrokes: i64,
    /// Distinct applications active during the session window.
    pub apps: BTreeSet<String>,
}

/// Detector state: either between sessions or extending one.
enum DetectorState {
    NoSession,
    InSession {
        start: NaiveDateTime,
        end: NaiveDateTime,
        keystrokes: i64,
    },
}

/// Detects focus sessions in chronologically-ordered samples.
///
/// Sessions are returned ordered by descending duration with empty `apps`;
/// use [`attach_apps`] to fill them in. Callers needing chronological order
/// must re-sort.
#[must_use]
pub fn detect_sessions(samples: &[InputSample], config: &FocusConfig) -> Vec<FocusSession> {
    let max_gap = Duration::seconds(config.max_gap_seconds.max(0));
    let mut sessions = Vec::new();
    let mut state = DetectorState::NoSession;

    for sample in samples {
        state = match state {
            DetectorState::NoSession => DetectorState::InSession {
                start: sample.timestamp,
                end: sample.timestamp,
                keystrokes: sample.key_presses.max(0),
            },
            DetectorState::InSession {
                start,
                end,
                keystrokes,
            } => {
                if sample.timestamp - end <= max_gap {
                    DetectorState::InSession {
                        start,
                        end: end.max(sample.timestamp),
                        keystrokes: keystrokes + sample.key_presses.max(0),
                    }
                } else {
                    close_session(&mut sessions, start, end, keystrokes, config);
                    DetectorState::InSession {
                        start: sample.timestamp,
                        end: sample.timestamp,
                        keystrokes: sample.key_presses.max(0),
                    }
                }
            }
        };
    }

    if let DetectorState::InSession {
        start,
        end,
        keystrokes,
    } = state
    {
        close_session(&mut sessions, start, end, keystrokes, config);
    }

    sessions.sort_by(|a, b| {
        b.duration_seconds
            .cmp(&a.duration_seconds)
            .then_with(|| a.start_time.cmp(&b.start_time))
    });
    sessions
}

/// Emits a session if it meets the minimum duration.
fn close_session(
    sessions: &mut Vec<FocusSession>,
    start: NaiveDateTime,
    end: NaiveDateTime,
    keystrokes: i64,
    config: &FocusConfig,
) {
    let duration = end - start;
    if duration < Duration::seconds(config.min_session_seconds) {
        return;
    }
    sessions.push(FocusSession {
        start_time: start,
        end_time: end,
        duration_seconds: duration.num_seconds(),
        keystrokes,
        apps: BTreeSet::new(),
    });
}

/// Attaches the distinct applications active during each session window.
///
/// An interval counts if it overlaps `[start_time, end_time]` at all.
pub fn attach_apps(sessions: &mut [FocusSession], intervals: &[ActivityInterval]) {
    for session in sessions {
        session.apps = intervals
            .iter()
            .filter(|interval| {
                interval.duration_seconds > 0
                    && interval.start_time <= session.end_time
                    && interval.end_time() > session.start_time
            })
            .map(|interval| interval.app_name.clone())
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn sample(ts: NaiveDateTime, key_presses: i64) -> InputSample {
        InputSample {
            timestamp: ts,
            key_presses,
            mouse_clicks: 0,
            mouse_distance: 0.0,
        }
    }

    fn minute_samples(start: NaiveDateTime, count: i64) -> Vec<InputSample> {
        (0..count)
            .map(|i| sample(start + Duration::minutes(i), 10))
            .collect()
    }

    #[test]
    fn samples_within_gap_merge() {
        // Two samples 250 s apart with a 300 s tolerance: one session,
        // too short to pass the default minimum.
        let samples = [sample(dt(9, 0, 0), 5), sample(dt(9, 4, 10), 7)];
        let config = FocusConfig {
            max_gap_seconds: 300,
            min_session_seconds: 0,
        };
        let sessions = detect_sessions(&samples, &config);
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].start_time, dt(9, 0, 0));
        assert_eq!(sessions[0].end_time, dt(9, 4, 10));
        assert_eq!(sessions[0].keystrokes, 12);
    }

    #[test]
    fn samples_beyond_gap_split() {
        // Same two samples with a 200 s tolerance: two zero-length
        // sessions, both discarded by any positive minimum.
        let samples = [sample(dt(9, 0, 0), 5), sample(dt(9, 4, 10), 7)];
        let split_config = FocusConfig {
            max_gap_seconds: 200,
            min_session_seconds: 0,
        };
        let sessions = detect_sessions(&samples, &split_config);
        assert_eq!(sessions.len(), 2);

        let filtered = detect_sessions(
            &samples,
            &FocusConfig {
                max_gap_seconds: 200,
                min_session_seconds: 600,
            },
        );
        assert!(filtered.is_empty());
    }

    #[test]
    fn minimum_duration_filters_short_sessions() {
        // 15 one-minute samples: a 14-minute session.
        let samples = minute_samples(dt(9, 0, 0), 15);
        let sessions = detect_sessions(&samples, &FocusConfig::default());
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].duration_seconds, 840);
        assert_eq!(sessions[0].keystrokes, 150);

        // 5 samples: 4 minutes, under the 10-minute default.
        let short = minute_samples(dt(9, 0, 0), 5);
        assert!(detect_sessions(&short, &FocusConfig::default()).is_empty());
    }

    #[test]
    fn sessions_ordered_by_descending_duration() {
        let mut samples = minute_samples(dt(9, 0, 0), 12);
        // 20-minute gap, then a longer run.
        samples.extend(minute_samples(dt(10, 0, 0), 30));
        let sessions = detect_sessions(&samples, &FocusConfig::default());
        assert_eq!(sessions.len(), 2);
        assert!(sessions[0].duration_seconds > sessions[1].duration_seconds);
        assert_eq!(sessions[0].start_time, dt(10, 0, 0));
    }

    #[test]
    fn end_of_stream_closes_open_session() {
        let samples = minute_samples(dt(23, 0, 0), 11);
        let sessions = detect_sessions(&samples, &FocusConfig::default());
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].end_time, dt(23, 10, 0));
    }

    #[test]
    fn empty_stream_yields_no_sessions() {
        assert!(detect_sessions(&[], &FocusConfig::default()).is_empty());
    }

    #[test]
    fn attach_apps_collects_overlapping_distinct_names() {
        let samples = minute_samples(dt(9, 0, 0), 15);
        let mut sessions = detect_sessions(&samples, &FocusConfig::default());
        let intervals = [
            ActivityInterval {
                start_time: dt(9, 0, 0),
                app_name: "editor.exe".to_string(),
                window_title: String::new(),
                duration_seconds: 300,
            },
            ActivityInterval {
                start_time: dt(9, 5, 0),
                app_name: "chrome.exe".to_string(),
                window_title: String::new(),
                duration_seconds: 300,
            },
            ActivityInterval {
                start_time: dt(9, 10, 0),
                app_name: "editor.exe".to_string(),
                window_title: String::new(),
                duration_seconds: 300,
            },
            // Ends before the session starts.
            ActivityInterval {
                start_time: dt(8, 0, 0),
                app_name: "early.exe".to_string(),
                window_title: String::new(),
                duration_seconds: 600,
            },
        ];

        attach_apps(&mut sessions, &intervals);
        let apps: Vec<_> = sessions[0].apps.iter().cloned().collect();
        assert_eq!(apps, vec!["chrome.exe", "editor.exe"]);
    }

    #[test]
    fn irregular_cadence_is_tolerated() {
        // Samples at uneven spacing, all within the gap.
        let samples = [
            sample(dt(9, 0, 0), 1),
            sample(dt(9, 0, 45), 1),
            sample(dt(9, 3, 0), 1),
            sample(dt(9, 7, 30), 1),
            sample(dt(9, 12, 0), 1),
        ];
        let sessions = detect_sessions(
            &samples,
            &FocusConfig {
                max_gap_seconds: 300,
                min_session_seconds: 600,
            },
        );
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].duration_seconds, 720);
    }
}
