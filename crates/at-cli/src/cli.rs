//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Usage reports over tracked window activity, idle time and input metrics.
///
/// Reads the database the capture daemon writes and reconstructs
/// calendar-aligned statistics from it; nothing here mutates the raw rows.
#[derive(Debug, Parser)]
#[command(name = "at", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Per-hour usage table (per-day with --daily).
    Report {
        /// Aggregate per calendar day instead of per hour.
        #[arg(long)]
        daily: bool,

        /// How many days back to report over.
        #[arg(long, default_value_t = 7)]
        days_back: u32,

        /// Emit JSON instead of human-readable output.
        #[arg(long)]
        json: bool,
    },

    /// Top websites by browser time.
    Websites {
        #[arg(long, default_value_t = 7)]
        days_back: u32,

        #[arg(long)]
        json: bool,
    },

    /// Focus sessions detected from input activity.
    Sessions {
        #[arg(long, default_value_t = 7)]
        days_back: u32,

        /// Largest sample gap that still extends a session, in seconds.
        #[arg(long)]
        max_gap: Option<i64>,

        /// Shortest session worth reporting, in seconds.
        #[arg(long)]
        min_duration: Option<i64>,

        #[arg(long)]
        json: bool,
    },

    /// Summary statistics for the window.
    Stats {
        #[arg(long, default_value_t = 7)]
        days_back: u32,

        #[arg(long)]
        json: bool,
    },

    /// Per-day input counters and active time.
    Summary {
        #[arg(long, default_value_t = 7)]
        days_back: u32,

        #[arg(long)]
        json: bool,
    },

    /// Day-by-hour activity heatmap.
    Heatmap {
        #[arg(long, default_value_t = 7)]
        days_back: u32,

        #[arg(long)]
        json: bool,
    },

    /// Idle time distribution by hour of day.
    Idle {
        #[arg(long, default_value_t = 7)]
        days_back: u32,

        #[arg(long)]
        json: bool,
    },
}
