//! Task menus

use std::io::{BufRead, Write};

use chrono::NaiveDate;

use crate::display::{format_due_tasks, format_task_list};
use crate::error::PlannerResult;
use crate::models::{tags, EventId, Priority, TaskStatus};
use crate::services::task::deadline_after_event;
use crate::services::{ArchiveFilter, NewTask, ScheduleService, TaskService};

use super::{pick_event, pick_task, MenuContext};

const TASK_MENU: [&str; 10] = [
    "Add New Tasks",
    "View Current Tasks",
    "Edit Task Details",
    "Delete Task",
    "Update Task Progress",
    "Archive Task",
    "View Archived Tasks",
    "Restore Archived Task",
    "View Pending Tasks (Due Soon)",
    "Sort Tasks",
];

pub fn task_menu<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    loop {
        ctx.console.menu("Task Manager", &TASK_MENU, "Back to Main Menu")?;
        let Some(choice) = ctx.console.ask("Choose an option: ")? else {
            return Ok(());
        };

        match choice.as_str() {
            "1" => add_tasks(ctx)?,
            "2" => view_tasks(ctx)?,
            "3" => edit_task(ctx)?,
            "4" => delete_task(ctx)?,
            "5" => update_progress(ctx)?,
            "6" => archive_task(ctx)?,
            "7" => view_archived(ctx)?,
            "8" => restore_task(ctx)?,
            "9" => due_soon(ctx)?,
            "10" => super::search::sort_tasks(ctx)?,
            "0" => return Ok(()),
            _ => ctx.console.say("Invalid choice.")?,
        }
        if ctx.console.is_closed() {
            return Ok(());
        }
    }
}

/// Ask for a deadline and warn (without refusing) when it falls after the event
fn ask_deadline<R: BufRead, W: Write>(
    ctx: &mut MenuContext<'_, R, W>,
    event_id: EventId,
    prompt: &str,
) -> PlannerResult<Option<NaiveDate>> {
    let deadline = ctx.console.ask_date(prompt)?;
    if let (Some(deadline), Some(event)) = (deadline, ctx.session.event(event_id)) {
        if deadline_after_event(event, deadline) {
            let warning = format!(
                "Note: this deadline is after the event date ({}).",
                event.date
            );
            ctx.console.say(&warning)?;
        }
    }
    Ok(deadline)
}

fn add_tasks<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    let Some(event_id) = pick_event(ctx, ArchiveFilter::Active)? else {
        return Ok(());
    };

    let mut added = 0;
    loop {
        let Some(description) = ctx.console.ask("Task description (blank to finish): ")? else {
            break;
        };
        if description.is_empty() {
            break;
        }

        let mut new = NewTask::new(description);
        new.deadline = ask_deadline(ctx, event_id, "Deadline YYYY-MM-DD (optional): ")?;
        if let Some(priority) = ctx.console.ask_parsed(
            "Priority (low/medium/high, blank for medium): ",
            |s| Priority::parse(s).ok_or_else(|| "Invalid priority.".to_string()),
        )? {
            new.priority = priority;
        }

        let result = TaskService::new(ctx.session).add(event_id, new);
        if ctx.report(result, "Task added.")?.is_some() {
            added += 1;
        }
    }

    ctx.console.say(&format!("{} task(s) added.", added))
}

fn view_tasks<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    let Some(event_id) = pick_event(ctx, ArchiveFilter::All)? else {
        return Ok(());
    };
    let hide_completed = ctx.console.confirm("Hide completed tasks?")?;

    let symbol = ctx.settings.currency_symbol.clone();
    let service = TaskService::new(ctx.session);
    let block = match service.list(event_id, hide_completed) {
        Ok(tasks) => format_task_list(&tasks, &symbol),
        Err(e) => format!("Error: {}", e),
    };
    ctx.console.say_block(&block)
}

fn edit_task<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    let Some(event_id) = pick_event(ctx, ArchiveFilter::Active)? else {
        return Ok(());
    };
    let Some(task_id) = pick_task(ctx, event_id, false)? else {
        return Ok(());
    };

    let Some(description) = ctx.console.ask("New description (blank to keep): ")? else {
        return Ok(());
    };
    if !description.is_empty() {
        let result = TaskService::new(ctx.session).set_description(event_id, task_id, &description);
        ctx.report(result, "Description updated.")?;
    }

    if let Some(deadline) =
        ask_deadline(ctx, event_id, "New deadline YYYY-MM-DD (blank to keep): ")?
    {
        let result = TaskService::new(ctx.session).set_deadline(event_id, task_id, Some(deadline));
        ctx.report(result, "Deadline updated.")?;
    }

    if let Some(priority) = ctx.console.ask_parsed(
        "New priority low/medium/high (blank to keep): ",
        |s| Priority::parse(s).ok_or_else(|| "Invalid priority.".to_string()),
    )? {
        let result = TaskService::new(ctx.session).set_priority(event_id, task_id, priority);
        ctx.report(result, "Priority updated.")?;
    }

    let Some(input) = ctx.console.ask("New tags, comma-separated (blank to keep): ")? else {
        return Ok(());
    };
    if !input.is_empty() {
        let result =
            TaskService::new(ctx.session).set_tags(event_id, task_id, &tags::parse_list(&input));
        ctx.report(result, "Tags updated.")?;
    }
    Ok(())
}

fn delete_task<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    let Some(event_id) = pick_event(ctx, ArchiveFilter::Active)? else {
        return Ok(());
    };
    let Some(task_id) = pick_task(ctx, event_id, false)? else {
        return Ok(());
    };
    let result = TaskService::new(ctx.session).delete(event_id, task_id);
    if let Some(task) = ctx.report(result, "")? {
        ctx.console.say(&format!("Task '{}' deleted.", task.description))?;
    }
    Ok(())
}

/// Progress can be given as a percentage or as a status word
enum ProgressInput {
    Percent(i64),
    Status(TaskStatus),
}

fn parse_progress(input: &str) -> Result<ProgressInput, String> {
    let input = input.trim().trim_end_matches('%');
    if let Ok(value) = input.parse::<i64>() {
        return Ok(ProgressInput::Percent(value));
    }
    TaskStatus::parse(input)
        .map(ProgressInput::Status)
        .ok_or_else(|| "Enter a percentage (0-100) or pending / in progress / completed.".to_string())
}

fn update_progress<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    let Some(event_id) = pick_event(ctx, ArchiveFilter::Active)? else {
        return Ok(());
    };
    let Some(task_id) = pick_task(ctx, event_id, false)? else {
        return Ok(());
    };
    let Some(input) = ctx.console.ask_parsed("Progress (0-100 or status): ", parse_progress)? else {
        return Ok(());
    };

    let mut service = TaskService::new(ctx.session);
    let result = match input {
        ProgressInput::Percent(value) => service.set_progress(event_id, task_id, value).map(|_| ()),
        ProgressInput::Status(status) => service.set_status(event_id, task_id, status),
    };
    if ctx.report(result, "")?.is_some() {
        if let Ok(task) = TaskService::new(ctx.session).get(event_id, task_id) {
            let message = format!(
                "Progress for '{}' is now {}% ({}).",
                task.description,
                task.progress(),
                task.status()
            );
            ctx.console.say(&message)?;
        }
    }
    Ok(())
}

fn archive_task<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    let Some(event_id) = pick_event(ctx, ArchiveFilter::Active)? else {
        return Ok(());
    };
    let Some(task_id) = pick_task(ctx, event_id, false)? else {
        return Ok(());
    };
    let result = TaskService::new(ctx.session).archive(event_id, task_id);
    ctx.report(result, "Task archived.")?;
    Ok(())
}

fn view_archived<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    let Some(event_id) = pick_event(ctx, ArchiveFilter::All)? else {
        return Ok(());
    };
    let symbol = ctx.settings.currency_symbol.clone();
    let service = TaskService::new(ctx.session);
    let block = match service.list_archived(event_id) {
        Ok(tasks) if tasks.is_empty() => "No archived tasks.".to_string(),
        Ok(tasks) => format_task_list(&tasks, &symbol),
        Err(e) => format!("Error: {}", e),
    };
    ctx.console.say_block(&block)
}

fn restore_task<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    let Some(event_id) = pick_event(ctx, ArchiveFilter::Active)? else {
        return Ok(());
    };
    let Some(task_id) = pick_task(ctx, event_id, true)? else {
        return Ok(());
    };
    let result = TaskService::new(ctx.session).restore(event_id, task_id);
    ctx.report(result, "Task restored.")?;
    Ok(())
}

fn due_soon<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    let window = ctx.settings.due_window_days;
    let due = ScheduleService::new(ctx.session).due_tasks(ctx.today, window);
    ctx.console.say_block(&format_due_tasks(&due, window))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::test_support::run_menu;
    use crate::models::{Event, Task, VoicePreference};
    use crate::session::Session;

    fn session() -> Session {
        let event = Event::new("Party", NaiveDate::from_ymd_opt(2024, 8, 15).unwrap());
        Session::with_events("alice", vec![event], VoicePreference::default())
    }

    #[test]
    fn test_add_tasks_warns_on_late_deadline() {
        let mut session = session();
        let input = "1\n1\nOrder cake\n2024-08-20\nhigh\nBalloons\n\n\n\n0\n";
        let out = run_menu(&mut session, input, task_menu);

        assert!(out.contains("Note: this deadline is after the event date (2024-08-15)."));
        assert!(out.contains("2 task(s) added."));
        let tasks = &session.events()[0].tasks;
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].priority, Priority::High);
    }

    #[test]
    fn test_progress_accepts_percent_or_status() {
        let mut session = session();
        session.events_mut()[0].tasks.push(Task::new("Cake"));

        let out = run_menu(&mut session, "5\n1\n1\n140\n5\n1\n1\nin progress\n0\n", task_menu);
        assert!(out.contains("Progress for 'Cake' is now 100% (Completed)."));
        assert!(out.contains("Progress for 'Cake' is now 50% (In Progress)."));
    }

    #[test]
    fn test_archive_and_restore_task() {
        let mut session = session();
        session.events_mut()[0].tasks.push(Task::new("Cake"));

        run_menu(&mut session, "6\n1\n1\n", task_menu);
        assert!(session.events()[0].tasks.is_empty());
        assert_eq!(session.events()[0].archived_tasks.len(), 1);

        run_menu(&mut session, "8\n1\n1\n", task_menu);
        assert_eq!(session.events()[0].tasks.len(), 1);
    }

    #[test]
    fn test_due_soon_view() {
        let mut session = session();
        let task = Task::new("Send invites").with_deadline(NaiveDate::from_ymd_opt(2024, 8, 3).unwrap());
        session.events_mut()[0].tasks.push(task);

        let out = run_menu(&mut session, "9\n0\n", task_menu);
        assert!(out.contains("- Send invites (Party) due on 2024-08-03"));
    }
}
