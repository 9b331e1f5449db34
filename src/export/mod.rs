//! Export module for Momentera
//!
//! Writes a user's events and tasks out in several formats:
//! - Text: the same report the menus print, for reading or printing
//! - CSV: one row per task (events without tasks get one row)
//! - JSON: machine-readable export with schema versioning
//! - YAML: human-readable variant of the JSON export

pub mod csv;
pub mod json;
pub mod text;
pub mod yaml;

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use log::info;

use crate::error::{PlannerError, PlannerResult};
use crate::models::Event;

pub use self::csv::export_events_csv;
pub use json::{export_events_json, EventExport, EXPORT_SCHEMA_VERSION};
pub use text::export_events_text;
pub use yaml::export_events_yaml;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Csv,
    Json,
    Yaml,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [Self::Text, Self::Csv, Self::Json, Self::Yaml];

    /// File extension used for this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "Text report"),
            Self::Csv => write!(f, "CSV"),
            Self::Json => write!(f, "JSON"),
            Self::Yaml => write!(f, "YAML"),
        }
    }
}

/// Write events in the given format
pub fn export_events<W: Write>(
    username: &str,
    events: &[Event],
    format: ExportFormat,
    symbol: &str,
    writer: &mut W,
) -> PlannerResult<()> {
    match format {
        ExportFormat::Text => export_events_text(events, symbol, writer),
        ExportFormat::Csv => export_events_csv(events, writer),
        ExportFormat::Json => export_events_json(username, events, writer, true),
        ExportFormat::Yaml => export_events_yaml(username, events, writer),
    }
}

/// Export into `dir` under a timestamped file name and return the path
pub fn export_to_dir(
    username: &str,
    events: &[Event],
    format: ExportFormat,
    symbol: &str,
    dir: &Path,
) -> PlannerResult<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| {
        PlannerError::Export(format!("Failed to create {}: {}", dir.display(), e))
    })?;

    let file_name = format!(
        "{}_events_{}.{}",
        username,
        Local::now().format("%Y%m%d-%H%M%S"),
        format.extension()
    );
    let path = dir.join(file_name);

    let file = File::create(&path).map_err(|e| {
        PlannerError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    let mut writer = BufWriter::new(file);
    export_events(username, events, format, symbol, &mut writer)?;
    writer.flush().map_err(export_error)?;

    info!(
        "event=export status=ok format={} events={}",
        format.extension(),
        events.len()
    );
    Ok(path)
}

pub(crate) fn export_error(e: impl fmt::Display) -> PlannerError {
    PlannerError::Export(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_format_parse() {
        assert_eq!(ExportFormat::parse("YML"), Some(ExportFormat::Yaml));
        assert_eq!(ExportFormat::parse("txt"), Some(ExportFormat::Text));
        assert_eq!(ExportFormat::parse("xml"), None);
    }

    #[test]
    fn test_export_to_dir_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let events = vec![Event::new(
            "Launch",
            NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
        )];

        let path = export_to_dir("alice", &events, ExportFormat::Csv, "₹", temp_dir.path()).unwrap();
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("alice_events_"));
        assert_eq!(path.extension().unwrap(), "csv");

        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.contains("Launch"));
    }
}
