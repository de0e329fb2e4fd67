use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use at_cli::commands::{heatmap, idle, report, sessions, stats, summary, websites};
use at_cli::{Cli, Commands, Config};

/// Load config and open the database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(at_db::Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = at_db::Database::open(&config.database_path).context("failed to open database")?;
    Ok((db, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    match &cli.command {
        Some(Commands::Report {
            daily,
            days_back,
            json,
        }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            report::run(&db, *daily, *days_back, *json)?;
        }
        Some(Commands::Websites { days_back, json }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            websites::run(&db, *days_back, *json)?;
        }
        Some(Commands::Sessions {
            days_back,
            max_gap,
            min_duration,
            json,
        }) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            let mut focus = config.focus_config();
            if let Some(max_gap) = max_gap {
                focus.max_gap_seconds = *max_gap;
            }
            if let Some(min_duration) = min_duration {
                focus.min_session_seconds = *min_duration;
            }
            sessions::run(&db, *days_back, &focus, *json)?;
        }
        Some(Commands::Stats { days_back, json }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            stats::run(&db, *days_back, *json)?;
        }
        Some(Commands::Summary { days_back, json }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            summary::run(&db, *days_back, *json)?;
        }
        Some(Commands::Heatmap { days_back, json }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            heatmap::run(&db, *days_back, *json)?;
        }
        Some(Commands::Idle { days_back, json }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            idle::run(&db, *days_back, *json)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
