//! Event display formatting
//!
//! Formats events for terminal output in table and detail views, plus the
//! schedule views (upcoming events, due tasks, reminders).

use chrono::NaiveDate;

use crate::models::Event;
use crate::services::schedule::{DueReminder, DueTask, Occurrence};

use super::task::format_task_line;
use super::{format_budget, format_duration};

/// Format a list of events as a table
pub fn format_event_list(events: &[&Event]) -> String {
    if events.is_empty() {
        return "No events found.".to_string();
    }

    let name_width = events
        .iter()
        .map(|e| e.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:>3}  {:<name_width$}  {:<10}  {:<8}  {:>5}  {}\n",
        "#",
        "Name",
        "Date",
        "Priority",
        "Tasks",
        "Flags",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:->3}  {:-<name_width$}  {:-<10}  {:-<8}  {:->5}  {:-<5}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for (i, event) in events.iter().enumerate() {
        let done = event.tasks.iter().filter(|t| t.is_completed()).count();
        output.push_str(&format!(
            "{:>3}  {:<name_width$}  {:<10}  {:<8}  {:>5}  {}\n",
            i + 1,
            event.name,
            event.date.format("%Y-%m-%d").to_string(),
            event.priority.to_string(),
            format!("{}/{}", done, event.tasks.len()),
            flags(event),
            name_width = name_width,
        ));
    }

    output.push_str(&format!("\n{} event(s)", events.len()));
    output
}

fn flags(event: &Event) -> String {
    let mut flags = Vec::new();
    if event.pinned {
        flags.push("pinned");
    }
    if event.starred {
        flags.push("starred");
    }
    if event.is_recurring() {
        flags.push("recurring");
    }
    if event.archived {
        flags.push("archived");
    }
    flags.join(", ")
}

/// Format a single event with all its details and tasks
pub fn format_event_details(event: &Event, symbol: &str) -> String {
    let mut lines = vec![
        format!("Event: {}", event.name),
        format!("Date: {}", event.date.format("%Y-%m-%d (%A)")),
    ];

    if let (Some(start), Some(end)) = (event.start_time, event.end_time) {
        let mut time = format!("Time: {}-{}", start.format("%H:%M"), end.format("%H:%M"));
        if let Some(duration) = event.duration() {
            time.push_str(&format!(" ({})", format_duration(duration)));
        }
        lines.push(time);
    }
    if !event.category.is_empty() {
        lines.push(format!("Category: {}", event.category));
    }
    lines.push(format!("Priority: {}", event.priority));
    lines.push(format!("Budget: {}", format_budget(&event.budget, symbol)));
    if !event.tags.is_empty() {
        lines.push(format!("Tags: {}", event.tags.join(", ")));
    }
    if !event.notes.is_empty() {
        lines.push(format!("Notes: {}", event.notes));
    }
    if let Some(days) = event.reminder_days {
        lines.push(format!("Reminder: {} day(s) before", days));
    }
    if let Some(rule) = &event.recurrence {
        lines.push(format!("Recurring: {}", rule));
    }
    let flags = flags(event);
    if !flags.is_empty() {
        lines.push(format!("Flags: {}", flags));
    }

    if event.tasks.is_empty() {
        lines.push("Tasks: none".to_string());
    } else {
        lines.push("Tasks:".to_string());
        for (i, task) in event.tasks.iter().enumerate() {
            lines.push(format!("  {}", format_task_line(i + 1, task, symbol)));
        }
    }
    if !event.archived_tasks.is_empty() {
        lines.push(format!("Archived tasks: {}", event.archived_tasks.len()));
    }

    lines.join("\n")
}

/// Upcoming occurrences, one per line
pub fn format_upcoming(occurrences: &[Occurrence], window_days: u32) -> String {
    if occurrences.is_empty() {
        return "No upcoming events.".to_string();
    }
    let mut lines = vec![format!("Events in the next {} days:", window_days)];
    for o in occurrences {
        let marker = if o.recurring { " (recurring)" } else { "" };
        lines.push(format!("- {}{} on {}", o.name, marker, o.date));
    }
    lines.join("\n")
}

/// Tasks due soon, one per line
pub fn format_due_tasks(due: &[DueTask], window_days: u32) -> String {
    if due.is_empty() {
        return "No urgent tasks due.".to_string();
    }
    let mut lines = vec![format!("Tasks due in the next {} days:", window_days)];
    for d in due {
        lines.push(format!("- {} ({}) due on {}", d.description, d.event_name, d.deadline));
    }
    lines.join("\n")
}

/// Open reminders, one per line
pub fn format_due_reminders(reminders: &[DueReminder], today: NaiveDate) -> String {
    if reminders.is_empty() {
        return "No reminders due.".to_string();
    }
    let mut lines = vec![format!("Reminders for {}:", today)];
    for r in reminders {
        let when = match r.days_left {
            0 => "today".to_string(),
            1 => "tomorrow".to_string(),
            n => format!("in {} days", n),
        };
        lines.push(format!("- {} is {} ({})", r.name, when, r.date));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventId, Task};
    use chrono::NaiveTime;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_format_event_list() {
        let mut event = Event::new("Birthday Party", date(2024, 8, 15));
        event.pinned = true;
        let mut done = Task::new("Cake");
        done.set_progress(100);
        event.tasks.push(done);
        event.tasks.push(Task::new("Balloons"));

        let output = format_event_list(&[&event]);
        assert!(output.contains("Birthday Party"));
        assert!(output.contains("2024-08-15"));
        assert!(output.contains("1/2"));
        assert!(output.contains("pinned"));
        assert!(output.ends_with("1 event(s)"));
    }

    #[test]
    fn test_format_event_list_empty() {
        assert_eq!(format_event_list(&[]), "No events found.");
    }

    #[test]
    fn test_format_event_details() {
        let mut event = Event::new("Meeting", date(2024, 8, 15));
        event.start_time = NaiveTime::from_hms_opt(9, 0, 0);
        event.end_time = NaiveTime::from_hms_opt(10, 30, 0);
        event.notes = "Room 4".into();
        event.reminder_days = Some(2);

        let output = format_event_details(&event, "₹");
        assert!(output.contains("Date: 2024-08-15 (Thursday)"));
        assert!(output.contains("Time: 09:00-10:30 (1h 30m)"));
        assert!(output.contains("Budget: -"));
        assert!(output.contains("Notes: Room 4"));
        assert!(output.contains("Reminder: 2 day(s) before"));
        assert!(output.contains("Tasks: none"));
    }

    #[test]
    fn test_format_schedule_views() {
        let occurrence = Occurrence {
            event_id: EventId::new(),
            name: "Standup".into(),
            date: date(2024, 8, 12),
            recurring: true,
        };
        assert_eq!(
            format_upcoming(&[occurrence], 7),
            "Events in the next 7 days:\n- Standup (recurring) on 2024-08-12"
        );
        assert_eq!(format_upcoming(&[], 7), "No upcoming events.");
        assert_eq!(format_due_tasks(&[], 3), "No urgent tasks due.");
        assert_eq!(format_due_reminders(&[], date(2024, 8, 10)), "No reminders due.");
    }
}
