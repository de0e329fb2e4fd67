//! The data-source seam.
//!
//! Aggregation never owns storage: rows arrive through this trait, so the
//! real SQLite store and in-memory test fixtures are interchangeable. All
//! methods are read-only range queries over the half-open window
//! `[start, end)`; a failed fetch propagates immediately — retry policy, if
//! any, belongs to the caller.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::records::{ActivityInterval, IdlePeriod, InputSample};

/// Errors from a data source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The store could not be reached or the query failed.
    #[error("data source unavailable: {0}")]
    Unavailable(String),
}

/// Read-only access to the raw record store.
pub trait DataSource {
    /// Activity intervals overlapping `[start, end)`.
    fn activity_intervals(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<ActivityInterval>, SourceError>;

    /// Closed idle periods overlapping `[start, end)`.
    ///
    /// Periods still in progress are excluded by the implementation.
    fn idle_periods(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<IdlePeriod>, SourceError>;

    /// Input samples within `[start, end)`, ascending by timestamp.
    fn input_samples(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<InputSample>, SourceError>;
}
