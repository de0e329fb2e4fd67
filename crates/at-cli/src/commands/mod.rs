//! CLI subcommand implementations.

pub mod heatmap;
pub mod idle;
pub mod report;
pub mod sessions;
pub mod stats;
pub mod summary;
pub mod util;
pub mod websites;
