//! User settings for Momentera
//!
//! Application-wide preferences: display currency, the look-ahead windows
//! used by the schedule views, the speech program override and log level.

use serde::{Deserialize, Serialize};

use super::paths::MomenteraPaths;
use crate::error::PlannerError;
use crate::storage::file_io::write_json_atomic;

/// Application settings persisted in `config.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when printing budgets
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// How many days ahead "upcoming events" looks
    #[serde(default = "default_upcoming_window")]
    pub upcoming_window_days: u32,

    /// How many days ahead "tasks due soon" looks
    #[serde(default = "default_due_window")]
    pub due_window_days: u32,

    /// Speech program to use instead of auto-detection (e.g. "espeak-ng")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speech_program: Option<String>,

    /// Log level for the diagnostic log
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "₹".to_string()
}

fn default_upcoming_window() -> u32 {
    7
}

fn default_due_window() -> u32 {
    3
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            upcoming_window_days: default_upcoming_window(),
            due_window_days: default_due_window(),
            speech_program: None,
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &MomenteraPaths) -> Result<Self, PlannerError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                PlannerError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                PlannerError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            let settings = Settings::default();
            settings.save(paths)?;
            Ok(settings)
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &MomenteraPaths) -> Result<(), PlannerError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }
}
