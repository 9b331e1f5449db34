//! JSON export
//!
//! Exports a user's events with schema versioning and a small metadata block.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, PlannerResult};
use crate::models::Event;

use super::export_error;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Exported events plus metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub username: String,

    pub events: Vec<Event>,

    pub metadata: ExportMetadata,
}

/// Counts and date range, for a quick look without reading every event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub event_count: usize,
    pub archived_event_count: usize,
    pub task_count: usize,
    pub earliest_event: Option<String>,
    pub latest_event: Option<String>,
}

impl EventExport {
    pub fn new(username: &str, events: &[Event]) -> Self {
        let metadata = ExportMetadata {
            event_count: events.len(),
            archived_event_count: events.iter().filter(|e| e.archived).count(),
            task_count: events
                .iter()
                .map(|e| e.tasks.len() + e.archived_tasks.len())
                .sum(),
            earliest_event: events.iter().map(|e| e.date).min().map(|d| d.to_string()),
            latest_event: events.iter().map(|e| e.date).max().map(|d| d.to_string()),
        };

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            username: username.to_string(),
            events: events.to_vec(),
            metadata,
        }
    }

    /// Check that a parsed export is one this version understands
    pub fn validate(&self) -> PlannerResult<()> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(PlannerError::Export(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            )));
        }
        if self.metadata.event_count != self.events.len() {
            return Err(PlannerError::Export(format!(
                "Metadata lists {} events but the export holds {}",
                self.metadata.event_count,
                self.events.len()
            )));
        }
        Ok(())
    }
}

/// Export events to JSON
pub fn export_events_json<W: Write>(
    username: &str,
    events: &[Event],
    writer: &mut W,
    pretty: bool,
) -> PlannerResult<()> {
    let export = EventExport::new(username, events);

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(export_error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;
    use chrono::NaiveDate;

    #[test]
    fn test_json_export_parses_back() {
        let mut event = Event::new("Trip", NaiveDate::from_ymd_opt(2024, 10, 1).unwrap());
        event.tasks.push(Task::new("Book hotel"));
        event.archived_tasks.push(Task::new("Old idea"));
        let mut old = Event::new("Old trip", NaiveDate::from_ymd_opt(2023, 10, 1).unwrap());
        old.archived = true;

        let mut output = Vec::new();
        export_events_json("alice", &[event.clone(), old], &mut output, false).unwrap();

        let parsed: EventExport = serde_json::from_slice(&output).unwrap();
        parsed.validate().unwrap();
        assert_eq!(parsed.username, "alice");
        assert_eq!(parsed.events[0], event);
        assert_eq!(parsed.metadata.archived_event_count, 1);
        assert_eq!(parsed.metadata.task_count, 2);
        assert_eq!(parsed.metadata.earliest_event.as_deref(), Some("2023-10-01"));
    }

    #[test]
    fn test_validate_rejects_other_schema() {
        let mut export = EventExport::new("alice", &[]);
        export.schema_version = "0.1.0".into();
        assert!(export.validate().is_err());
    }
}
