//! Storage layer for the activity tracker.
//!
//! Owns the SQLite schema the capture daemon writes into: one row per
//! focus interval (`activity_log`), one row per input-counter flush
//! (`input_metrics`), and one row per idle period (`idle_periods`).
//!
//! # Thread Safety
//!
//! [`Database`] wraps a `rusqlite::Connection`, which is `Send` but not
//! `Sync`. Move it between threads or give each thread its own instance;
//! shared access needs external synchronization.
//!
//! # Timestamp Format
//!
//! Timestamps are stored as TEXT in ISO 8601 format without an offset
//! (e.g., `2025-03-10T23:30:00`), local wall-clock time — the format the
//! daemon's `isoformat()` produces. Fractional seconds are kept when
//! present. Range predicates that must add a duration to a stored value
//! normalize both sides through SQLite's `datetime()` so the `T`/space
//! separator never affects comparison.
//!
//! Rows whose timestamps fail to parse are skipped with a warning rather
//! than aborting the query: one corrupt sample must not blank out a whole
//! day of results.

use std::path::Path;

use chrono::NaiveDateTime;
use rusqlite::{Connection, params};
use thiserror::Error;

use at_core::{ActivityInterval, DataSource, IdlePeriod, InputSample, SourceError};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection
    /// closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the schema. Idempotent.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS activity_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                app_name TEXT NOT NULL,
                window_title TEXT NOT NULL,
                duration INTEGER NOT NULL,
                created_at TEXT DEFAULT CURRENT_TIMESTAMP
            );

            CREATE TABLE IF NOT EXISTS input_metrics (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                key_presses INTEGER DEFAULT 0,
                mouse_clicks INTEGER DEFAULT 0,
                mouse_distance REAL DEFAULT 0,
                created_at TEXT DEFAULT CURRENT_TIMESTAMP
            );

            CREATE TABLE IF NOT EXISTS idle_periods (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                start_time TEXT NOT NULL,
                end_time TEXT,
                duration INTEGER,
                created_at TEXT DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_activity_timestamp ON activity_log(timestamp);
            CREATE INDEX IF NOT EXISTS idx_input_timestamp ON input_metrics(timestamp);
            CREATE INDEX IF NOT EXISTS idx_idle_start ON idle_periods(start_time);
            ",
        )?;
        Ok(())
    }

    /// Records one focus interval.
    pub fn log_activity(
        &self,
        start_time: NaiveDateTime,
        app_name: &str,
        window_title: &str,
        duration_seconds: i64,
    ) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO activity_log (timestamp, app_name, window_title, duration)
             VALUES (?, ?, ?, ?)",
            params![
                format_timestamp(start_time),
                app_name,
                window_title,
                duration_seconds
            ],
        )?;
        Ok(())
    }

    /// Records input counters for one polling period.
    pub fn log_input_metrics(
        &self,
        timestamp: NaiveDateTime,
        key_presses: i64,
        mouse_clicks: i64,
        mouse_distance: f64,
    ) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO input_metrics (timestamp, key_presses, mouse_clicks, mouse_distance)
             VALUES (?, ?, ?, ?)",
            params![
                format_timestamp(timestamp),
                key_presses,
                mouse_clicks,
                mouse_distance
            ],
        )?;
        Ok(())
    }

    /// Records the start of an idle period, returning its row ID.
    pub fn start_idle_period(&self, start_time: NaiveDateTime) -> Result<i64, DbError> {
        self.conn.execute(
            "INSERT INTO idle_periods (start_time) VALUES (?)",
            params![format_timestamp(start_time)],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Closes an idle period previously opened with [`start_idle_period`].
    ///
    /// [`start_idle_period`]: Self::start_idle_period
    pub fn end_idle_period(
        &self,
        idle_id: i64,
        end_time: NaiveDateTime,
        duration_seconds: i64,
    ) -> Result<(), DbError> {
        self.conn.execute(
            "UPDATE idle_periods SET end_time = ?, duration = ? WHERE id = ?",
            params![format_timestamp(end_time), duration_seconds, idle_id],
        )?;
        Ok(())
    }

    /// Activity intervals overlapping `[start, end)`, ascending by start.
    ///
    /// A row overlaps if it starts before the window ends and its
    /// `start + duration` reaches past the window start.
    pub fn activity_intervals(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<ActivityInterval>, DbError> {
        if end <= start {
            return Ok(Vec::new());
        }
        let mut stmt = self.conn.prepare(
            "
            SELECT timestamp, app_name, window_title, duration
            FROM activity_log
            WHERE datetime(timestamp) < datetime(?1)
              AND datetime(timestamp, '+' || MAX(duration, 0) || ' seconds') > datetime(?2)
            ORDER BY timestamp ASC, id ASC
            ",
        )?;
        let rows = stmt.query_map(
            params![format_timestamp(end), format_timestamp(start)],
            |row| {
                let timestamp: String = row.get(0)?;
                Ok((
                    timestamp,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            },
        )?;

        let mut intervals = Vec::new();
        for row in rows {
            let (timestamp, app_name, window_title, duration_seconds) = row?;
            let Some(start_time) = parse_timestamp(&timestamp) else {
                tracing::warn!(timestamp, "skipping activity row with malformed timestamp");
                continue;
            };
            intervals.push(ActivityInterval {
                start_time,
                app_name,
                window_title,
                duration_seconds,
            });
        }
        Ok(intervals)
    }

    /// Closed idle periods overlapping `[start, end)`, ascending by start.
    ///
    /// Periods still in progress (`end_time IS NULL`) are excluded.
    pub fn idle_periods(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<IdlePeriod>, DbError> {
        if end <= start {
            return Ok(Vec::new());
        }
        let mut stmt = self.conn.prepare(
            "
            SELECT start_time, end_time
            FROM idle_periods
            WHERE end_time IS NOT NULL
              AND start_time < ?1
              AND end_time > ?2
            ORDER BY start_time ASC, id ASC
            ",
        )?;
        let rows = stmt.query_map(
            params![format_timestamp(end), format_timestamp(start)],
            |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            },
        )?;

        let mut periods = Vec::new();
        for row in rows {
            let (start_text, end_text) = row?;
            let (Some(start_time), Some(end_time)) =
                (parse_timestamp(&start_text), parse_timestamp(&end_text))
            else {
                tracing::warn!(
                    start = start_text,
                    end = end_text,
                    "skipping idle row with malformed timestamp"
                );
                continue;
            };
            periods.push(IdlePeriod {
                start_time,
                end_time: Some(end_time),
            });
        }
        Ok(periods)
    }

    /// Input samples within `[start, end)`, ascending by timestamp.
    pub fn input_samples(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<InputSample>, DbError> {
        if end <= start {
            return Ok(Vec::new());
        }
        let mut stmt = self.conn.prepare(
            "
            SELECT timestamp, key_presses, mouse_clicks, mouse_distance
            FROM input_metrics
            WHERE timestamp >= ?1 AND timestamp < ?2
            ORDER BY timestamp ASC, id ASC
            ",
        )?;
        let rows = stmt.query_map(
            params![format_timestamp(start), format_timestamp(end)],
            |row| {
                let timestamp: String = row.get(0)?;
                Ok((
                    timestamp,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, f64>(3)?,
                ))
            },
        )?;

        let mut samples = Vec::new();
        for row in rows {
            let (timestamp, key_presses, mouse_clicks, mouse_distance) = row?;
            let Some(parsed) = parse_timestamp(&timestamp) else {
                tracing::warn!(timestamp, "skipping input row with malformed timestamp");
                continue;
            };
            samples.push(InputSample {
                timestamp: parsed,
                key_presses,
                mouse_clicks,
                mouse_distance,
            });
        }
        Ok(samples)
    }
}

impl DataSource for Database {
    fn activity_intervals(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<ActivityInterval>, SourceError> {
        Self::activity_intervals(self, start, end)
            .map_err(|e| SourceError::Unavailable(e.to_string()))
    }

    fn idle_periods(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<IdlePeriod>, SourceError> {
        Self::idle_periods(self, start, end).map_err(|e| SourceError::Unavailable(e.to_string()))
    }

    fn input_samples(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<InputSample>, SourceError> {
        Self::input_samples(self, start, end).map_err(|e| SourceError::Unavailable(e.to_string()))
    }
}

/// Formats a timestamp for storage and for range predicates.
fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

/// Parses a stored timestamp, tolerating both `T` and space separators and
/// optional fractional seconds.
fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}
