//! CSV export
//!
//! One row per task. Events without tasks still get a row with the task
//! columns left empty, so every event appears in the sheet.

use std::io::Write;

use crate::error::PlannerResult;
use crate::models::{Budget, Event, Task};

use super::export_error;

const HEADER: [&str; 16] = [
    "Event ID",
    "Event",
    "Date",
    "Category",
    "Event Priority",
    "Event Budget",
    "Event Tags",
    "Pinned",
    "Starred",
    "Archived",
    "Task ID",
    "Task",
    "Deadline",
    "Task Priority",
    "Progress",
    "Task Budget",
];

/// Export events and their tasks to CSV
pub fn export_events_csv<W: Write>(events: &[Event], writer: &mut W) -> PlannerResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(HEADER).map_err(export_error)?;

    for event in events {
        if event.tasks.is_empty() {
            csv_writer
                .write_record(row(event, None))
                .map_err(export_error)?;
        }
        for task in &event.tasks {
            csv_writer
                .write_record(row(event, Some(task)))
                .map_err(export_error)?;
        }
    }

    csv_writer.flush().map_err(export_error)?;
    Ok(())
}

fn row(event: &Event, task: Option<&Task>) -> Vec<String> {
    let mut record = vec![
        event.id.to_string(),
        event.name.clone(),
        event.date.to_string(),
        event.category.clone(),
        event.priority.to_string(),
        budget_cell(&event.budget),
        event.tags.join(";"),
        event.pinned.to_string(),
        event.starred.to_string(),
        event.archived.to_string(),
    ];

    match task {
        Some(task) => record.extend([
            task.id.to_string(),
            task.description.clone(),
            task.deadline.map(|d| d.to_string()).unwrap_or_default(),
            task.priority.to_string(),
            task.progress().to_string(),
            budget_cell(&task.budget),
        ]),
        None => record.extend(std::iter::repeat(String::new()).take(6)),
    }
    record
}

/// Raw invalid entries are written as-is so nothing is lost
fn budget_cell(budget: &Budget) -> String {
    match budget {
        Budget::Unset => String::new(),
        Budget::Amount(amount) => amount.to_string(),
        Budget::Invalid(raw) => raw.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;

    fn sample() -> Vec<Event> {
        let mut party = Event::new("Party, with friends", NaiveDate::from_ymd_opt(2024, 8, 15).unwrap());
        party.budget = Budget::Amount(Money::from_cents(10000));
        let mut cake = Task::new("Cake");
        cake.budget = Budget::Invalid("bad".into());
        party.tasks.push(cake);
        party.tasks.push(Task::new("Music"));

        let empty = Event::new("Dentist", NaiveDate::from_ymd_opt(2024, 9, 2).unwrap());
        vec![party, empty]
    }

    #[test]
    fn test_csv_rows_per_task() {
        let mut output = Vec::new();
        export_events_csv(&sample(), &mut output).unwrap();

        let mut reader = csv::Reader::from_reader(output.as_slice());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][1], "Party, with friends");
        assert_eq!(&rows[0][5], "100.00");
        assert_eq!(&rows[0][11], "Cake");
        assert_eq!(&rows[0][15], "bad");
        assert_eq!(&rows[2][1], "Dentist");
        assert_eq!(&rows[2][11], "");
    }
}
