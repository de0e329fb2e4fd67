//! Website extraction from browser window titles.
//!
//! Browsers put the page title in the window title, usually with the site
//! name at the end and a branded suffix after it. This module pulls a
//! canonical site label out of that text. It is a best-effort heuristic, not
//! a URL parser: unrelated titles sharing a suffix will group together, and
//! that quirk is accepted — downstream views depend on the current behavior.

use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::aggregate::clip_to_window;
use crate::bucket::round_seconds;
use crate::records::{ActivityInterval, IdlePeriod};
use crate::residue::active_residue;

/// Label used when nothing usable survives normalization.
pub const UNKNOWN_WEBSITE: &str = "Unknown";

/// How many websites the activity table reports.
const TOP_WEBSITES: usize = 20;

/// Executables whose window titles carry page titles.
const BROWSER_EXECUTABLES: &[&str] = &["chrome.exe", "firefox.exe", "msedge.exe"];

/// Branded title suffixes, stripped before any other parsing.
const BROWSER_TITLE_SUFFIXES: &[&str] = &[
    " - Google Chrome",
    " - Mozilla Firefox",
    " - Microsoft Edge",
];

/// Whether `app_name` is a recognized browser executable.
///
/// Rows from any other application carry no website signal and are excluded
/// entirely by callers.
#[must_use]
pub fn is_browser(app_name: &str) -> bool {
    BROWSER_EXECUTABLES
        .iter()
        .any(|executable| app_name.eq_ignore_ascii_case(executable))
}

/// Extracts a canonical website label from a browser window title.
#[must_use]
pub fn website_label(title: &str) -> String {
    let mut remainder = title.trim();
    for suffix in BROWSER_TITLE_SUFFIXES {
        if let Some(stripped) = remainder.strip_suffix(suffix) {
            remainder = stripped.trim_end();
            break;
        }
    }

    // Titles commonly place the site name last.
    let candidate = if let Some(index) = remainder.rfind(" | ") {
        &remainder[index + 3..]
    } else if let Some(index) = remainder.rfind(" - ") {
        &remainder[index + 3..]
    } else if let Some(inner) = trailing_parenthesized(remainder) {
        inner
    } else {
        remainder
    };

    let mut site = candidate.trim();
    site = site
        .strip_prefix("https://")
        .or_else(|| site.strip_prefix("http://"))
        .unwrap_or(site);
    site = site.strip_prefix("www.").unwrap_or(site);
    if let Some(index) = site.find('/') {
        site = &site[..index];
    }

    let site = site.trim();
    if site.is_empty() {
        UNKNOWN_WEBSITE.to_string()
    } else {
        site.to_string()
    }
}

/// Content of a trailing `(...)` group, if the title ends with one.
fn trailing_parenthesized(title: &str) -> Option<&str> {
    let stripped = title.strip_suffix(')')?;
    let open = stripped.rfind('(')?;
    Some(&stripped[open + 1..])
}

/// Seconds spent per website, descending, top 20.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebsiteActivity {
    pub website: String,
    pub seconds: i64,
}

/// Aggregates idle-subtracted browser time per website over the window.
///
/// Only rows from recognized browsers participate. The sweep over intervals
/// is parallelized; large windows can hold tens of thousands of rows.
#[must_use]
pub fn website_activity(
    intervals: &[ActivityInterval],
    idle_periods: &[IdlePeriod],
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
) -> Vec<WebsiteActivity> {
    let totals: HashMap<String, Duration> = intervals
        .par_iter()
        .filter(|interval| interval.duration_seconds > 0 && is_browser(&interval.app_name))
        .fold(HashMap::new, |mut acc: HashMap<String, Duration>, interval| {
            let Some((start, end)) = clip_to_window(
                interval.start_time,
                interval.end_time(),
                window_start,
                window_end,
            ) else {
                return acc;
            };
            let label = website_label(&interval.window_title);
            for (fragment_start, fragment_end) in active_residue(start, end, idle_periods) {
                let entry = acc.entry(label.clone()).or_insert_with(Duration::zero);
                *entry = *entry + (fragment_end - fragment_start);
            }
            acc
        })
        .reduce(HashMap::new, |mut merged, partial| {
            for (label, total) in partial {
                let entry = merged.entry(label).or_insert_with(Duration::zero);
                *entry = *entry + total;
            }
            merged
        });

    let mut rows: Vec<WebsiteActivity> = totals
        .into_iter()
        .map(|(website, total)| WebsiteActivity {
            website,
            seconds: round_seconds(total),
        })
        .collect();
    rows.sort_by(|a, b| {
        b.seconds
            .cmp(&a.seconds)
            .then_with(|| a.website.cmp(&b.website))
    });
    rows.truncate(TOP_WEBSITES);
    rows
}
