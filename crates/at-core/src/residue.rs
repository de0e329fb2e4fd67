//! Idle subtraction: the active residue of a focus interval.
//!
//! A focus interval reports how long a window held focus, but the user may
//! have walked away partway through. Subtracting the recorded idle periods
//! leaves the sub-intervals where the user was actually present.

use chrono::NaiveDateTime;

use crate::records::IdlePeriod;

/// Returns the portions of `[start, end)` not covered by any idle period.
///
/// Fragments are sorted, pairwise disjoint, and all have positive length.
/// The result is independent of the order of `idle_periods`; open, inverted
/// and zero-length periods subtract nothing. An idle period covering the
/// whole interval yields an empty residue.
#[must_use]
pub fn active_residue(
    start: NaiveDateTime,
    end: NaiveDateTime,
    idle_periods: &[IdlePeriod],
) -> Vec<(NaiveDateTime, NaiveDateTime)> {
    if end <= start {
        return Vec::new();
    }

    let mut segments = vec![(start, end)];
    for idle in idle_periods {
        let Some((idle_start, idle_end)) = idle.closed_bounds() else {
            continue;
        };
        if idle_end <= idle_start {
            continue;
        }

        let mut next = Vec::with_capacity(segments.len() + 1);
        for (seg_start, seg_end) in segments {
            if idle_end <= seg_start || idle_start >= seg_end {
                // Disjoint from this segment.
                next.push((seg_start, seg_end));
                continue;
            }
            if seg_start < idle_start {
                next.push((seg_start, idle_start));
            }
            if idle_end < seg_end {
                next.push((idle_end, seg_end));
            }
            // Fully covered segments produce nothing.
        }
        segments = next;
    }

    segments.sort_by_key(|&(seg_start, _)| seg_start);
    segments
}
