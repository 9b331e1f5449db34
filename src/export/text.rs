//! Plain-text report export

use std::io::Write;

use chrono::Local;

use crate::display::format_event_details;
use crate::error::PlannerResult;
use crate::models::Event;

use super::export_error;

/// Write every event's detail view, separated by rules
pub fn export_events_text<W: Write>(
    events: &[Event],
    symbol: &str,
    writer: &mut W,
) -> PlannerResult<()> {
    writeln!(writer, "Momentera report ({})", Local::now().format("%Y-%m-%d %H:%M"))
        .map_err(export_error)?;
    writeln!(writer, "{} event(s)", events.len()).map_err(export_error)?;

    for event in events {
        writeln!(writer, "\n{}", "-".repeat(40)).map_err(export_error)?;
        writeln!(writer, "{}", format_event_details(event, symbol)).map_err(export_error)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;
    use chrono::NaiveDate;

    #[test]
    fn test_text_report_lists_events_and_tasks() {
        let mut event = Event::new("Garden day", NaiveDate::from_ymd_opt(2024, 5, 4).unwrap());
        event.tasks.push(Task::new("Buy seeds"));

        let mut output = Vec::new();
        export_events_text(&[event], "₹", &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();

        assert!(text.contains("1 event(s)"));
        assert!(text.contains("Event: Garden day"));
        assert!(text.contains("1. Buy seeds"));
    }
}
