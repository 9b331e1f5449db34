//! Path management for Momentera
//!
//! Resolves where credentials, voice settings, per-user event files, logs
//! and exports live.
//!
//! ## Path Resolution Order
//!
//! 1. An explicit directory (the `--data-dir` flag / `MOMENTERA_DATA_DIR`)
//! 2. The platform data directory for `momentera` (via `directories`)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::PlannerError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "MOMENTERA_DATA_DIR";

/// Manages all paths used by Momentera
#[derive(Debug, Clone)]
pub struct MomenteraPaths {
    /// Base directory for all Momentera data
    base_dir: PathBuf,
}

impl MomenteraPaths {
    /// Create a new MomenteraPaths instance
    ///
    /// Uses `override_dir` when given, otherwise the platform data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new(override_dir: Option<PathBuf>) -> Result<Self, PlannerError> {
        let base_dir = match override_dir {
            Some(dir) => dir,
            None => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create MomenteraPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the directory holding one events file per user
    pub fn events_dir(&self) -> PathBuf {
        self.base_dir.join("events")
    }

    /// Get the log directory
    pub fn log_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    /// Get the directory exports are written to
    pub fn export_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the shared credentials file
    pub fn users_file(&self) -> PathBuf {
        self.base_dir.join("users.txt")
    }

    /// Get the path to the shared voice settings file
    pub fn voice_settings_file(&self) -> PathBuf {
        self.base_dir.join("voice_settings.txt")
    }

    /// Get the path to a user's events file
    pub fn user_events_file(&self, username: &str) -> PathBuf {
        self.events_dir().join(format!("{}.jsonl", username))
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), PlannerError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| PlannerError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.events_dir())
            .map_err(|e| PlannerError::Io(format!("Failed to create events directory: {}", e)))?;

        Ok(())
    }
}

/// Resolve the default data directory from the platform conventions
fn resolve_default_path() -> Result<PathBuf, PlannerError> {
    ProjectDirs::from("", "", "momentera")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| PlannerError::Config("Could not determine a home directory".into()))
}
