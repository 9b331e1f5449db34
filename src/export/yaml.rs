//! YAML export

use std::io::Write;

use crate::error::PlannerResult;

use super::export_error;
use super::json::EventExport;
use crate::models::Event;

/// Export events to YAML with a short comment header
pub fn export_events_yaml<W: Write>(
    username: &str,
    events: &[Event],
    writer: &mut W,
) -> PlannerResult<()> {
    let export = EventExport::new(username, events);

    writeln!(writer, "# Momentera events export").map_err(export_error)?;
    writeln!(writer, "# User: {}", export.username).map_err(export_error)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(export_error)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(export_error)?;
    writeln!(writer).map_err(export_error)?;

    serde_yaml::to_writer(writer, &export).map_err(export_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Budget, Frequency, RecurrenceRule};
    use chrono::NaiveDate;

    #[test]
    fn test_yaml_export_round_trips() {
        let mut event = Event::new("Standup", NaiveDate::from_ymd_opt(2024, 8, 12).unwrap());
        event.budget = Budget::Invalid("lots".into());
        event.recurrence = Some(RecurrenceRule::new(Frequency::Weekly, 1).unwrap());

        let mut output = Vec::new();
        export_events_yaml("bob", &[event.clone()], &mut output).unwrap();
        let yaml = String::from_utf8(output).unwrap();
        assert!(yaml.starts_with("# Momentera events export"));

        let parsed: EventExport = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.events, vec![event]);
    }
}
