//! Configuration loading and management.

use std::path::{Path, PathBuf};

use at_core::FocusConfig;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file the capture daemon writes.
    pub database_path: PathBuf,

    /// Largest sample gap that still extends a focus session, in seconds.
    pub max_gap_seconds: i64,

    /// Shortest focus session worth reporting, in seconds.
    pub min_session_seconds: i64,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        let focus = FocusConfig::default();
        Self {
            database_path: data_dir.join("tracker.db"),
            max_gap_seconds: focus.max_gap_seconds,
            min_session_seconds: focus.min_session_seconds,
        }
    }
}

impl Config {
    /// Loads configuration from default locations.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(None)
    }

    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (AT_*)
        figment = figment.merge(Env::prefixed("AT_"));

        figment.extract()
    }

    /// The focus-session policy this configuration describes.
    #[must_use]
    pub const fn focus_config(&self) -> FocusConfig {
        FocusConfig {
            max_gap_seconds: self.max_gap_seconds,
            min_session_seconds: self.min_session_seconds,
        }
    }
}

/// Returns the platform-specific config directory for at.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("at"))
}

/// Returns the platform-specific data directory for at.
///
/// On Linux: `~/.local/share/at`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("at"))
}
