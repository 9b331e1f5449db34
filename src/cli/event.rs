//! Event menus

use std::io::{BufRead, Write};

use crate::display::{format_event_details, format_event_list, format_upcoming};
use crate::error::PlannerResult;
use crate::models::{tags, Frequency, Priority, RecurrenceRule};
use crate::services::{ArchiveFilter, EventFilter, EventService, NewEvent, ScheduleService};

use super::{pick_event, MenuContext};

const EVENT_MENU: [&str; 17] = [
    "Create New Event",
    "View All Events",
    "View Event Details",
    "Modify Existing Event",
    "Remove Event",
    "Manage Archive",
    "Set Event Priority",
    "Assign Event Category",
    "Manage Event Tags",
    "Pin / Unpin Event",
    "Star / Unstar Event",
    "Set/Edit Event Duration",
    "Schedule Reminder",
    "View Upcoming Events",
    "Countdown to Event",
    "Set Recurrence",
    "Create Next Occurrence",
];

pub fn event_menu<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    loop {
        ctx.console.menu("Event Central", &EVENT_MENU, "Back to Main Menu")?;
        let Some(choice) = ctx.console.ask("Choose an option: ")? else {
            return Ok(());
        };

        match choice.as_str() {
            "1" => create_event(ctx)?,
            "2" => view_all(ctx)?,
            "3" => view_details(ctx)?,
            "4" => edit_event(ctx)?,
            "5" => delete_event(ctx)?,
            "6" => manage_archive(ctx)?,
            "7" => set_priority(ctx)?,
            "8" => set_category(ctx)?,
            "9" => manage_tags(ctx)?,
            "10" => toggle_flag(ctx, Flag::Pin)?,
            "11" => toggle_flag(ctx, Flag::Star)?,
            "12" => set_duration(ctx)?,
            "13" => set_reminder(ctx)?,
            "14" => upcoming(ctx)?,
            "15" => countdown(ctx)?,
            "16" => set_recurrence(ctx)?,
            "17" => materialize(ctx)?,
            "0" => return Ok(()),
            _ => ctx.console.say("Invalid choice.")?,
        }
        if ctx.console.is_closed() {
            return Ok(());
        }
    }
}

fn ask_priority<R: BufRead, W: Write>(
    ctx: &mut MenuContext<'_, R, W>,
    prompt: &str,
) -> PlannerResult<Option<Priority>> {
    ctx.console.ask_parsed(prompt, |s| {
        Priority::parse(s).ok_or_else(|| "Invalid priority. Use low, medium or high.".to_string())
    })
}

fn create_event<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    let Some(name) = ctx.console.ask("Event name: ")? else {
        return Ok(());
    };
    if name.is_empty() {
        return ctx.console.say("Event name cannot be empty.");
    }
    let Some(date) = ctx.console.ask_date("Event date (YYYY-MM-DD): ")? else {
        return ctx.console.say("Event not created.");
    };

    let mut new = NewEvent::new(name, date);
    new.notes = ctx.console.ask("Notes (optional): ")?.unwrap_or_default();
    new.category = ctx.console.ask("Category (optional): ")?.unwrap_or_default();
    if let Some(priority) = ask_priority(ctx, "Priority (low/medium/high, blank for medium): ")? {
        new.priority = priority;
    }
    new.tags = tags::parse_list(
        &ctx.console
            .ask("Tags (comma-separated, optional): ")?
            .unwrap_or_default(),
    );

    let result = EventService::new(ctx.session).create(new);
    ctx.report(result, "Event created successfully.")?;
    Ok(())
}

fn view_all<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    let events = EventFilter::active().apply(ctx.session.events());
    let block = format_event_list(&events);
    ctx.console.say_block(&block)
}

fn view_details<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    let Some(id) = pick_event(ctx, ArchiveFilter::All)? else {
        return Ok(());
    };
    if let Some(event) = ctx.session.event(id) {
        let block = format_event_details(event, &ctx.settings.currency_symbol);
        ctx.console.say_block(&block)?;
    }
    Ok(())
}

fn edit_event<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    let Some(id) = pick_event(ctx, ArchiveFilter::Active)? else {
        return Ok(());
    };

    let Some(name) = ctx.console.ask("New name (blank to keep): ")? else {
        return Ok(());
    };
    if !name.is_empty() {
        let result = EventService::new(ctx.session).rename(id, &name);
        ctx.report(result, "Name updated.")?;
    }

    if let Some(date) = ctx.console.ask_date("New date YYYY-MM-DD (blank to keep): ")? {
        let today = ctx.today;
        let result = EventService::new(ctx.session).set_date(id, date, today);
        if let Some(true) = ctx.report(result, "Date updated.")? {
            ctx.console.say("The reminder no longer fits and was cleared.")?;
        }
    }

    let Some(notes) = ctx.console.ask("New notes (blank to keep, '-' to clear): ")? else {
        return Ok(());
    };
    if !notes.is_empty() {
        let notes = if notes == "-" { "" } else { notes.as_str() };
        let result = EventService::new(ctx.session).set_notes(id, notes);
        ctx.report(result, "Notes updated.")?;
    }
    Ok(())
}

fn delete_event<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    let Some(id) = pick_event(ctx, ArchiveFilter::All)? else {
        return Ok(());
    };
    if !ctx
        .console
        .confirm("Delete this event and all its tasks?")?
    {
        return ctx.console.say("Deletion cancelled.");
    }
    let result = EventService::new(ctx.session).delete(id);
    if let Some(event) = ctx.report(result, "")? {
        ctx.console.say(&format!("Event '{}' deleted.", event.name))?;
    }
    Ok(())
}

fn manage_archive<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    ctx.console.menu(
        "Event Archive",
        &["Archive an Event", "View Archived Events", "Restore an Event"],
        "Back",
    )?;
    let Some(choice) = ctx.console.ask("Choose an option: ")? else {
        return Ok(());
    };

    match choice.as_str() {
        "1" => {
            if let Some(id) = pick_event(ctx, ArchiveFilter::Active)? {
                let result = EventService::new(ctx.session).archive(id);
                ctx.report(result, "Event archived.")?;
            }
        }
        "2" => {
            let events = EventFilter::archived().apply(ctx.session.events());
            let block = format_event_list(&events);
            ctx.console.say_block(&block)?;
        }
        "3" => {
            if let Some(id) = pick_event(ctx, ArchiveFilter::Archived)? {
                let result = EventService::new(ctx.session).unarchive(id);
                ctx.report(result, "Event restored.")?;
            }
        }
        "0" => {}
        _ => ctx.console.say("Invalid choice.")?,
    }
    Ok(())
}

fn set_priority<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    let Some(id) = pick_event(ctx, ArchiveFilter::Active)? else {
        return Ok(());
    };
    let Some(priority) = ask_priority(ctx, "Priority (low/medium/high): ")? else {
        return Ok(());
    };
    let result = EventService::new(ctx.session).set_priority(id, priority);
    ctx.report(result, &format!("Priority set to {}.", priority))?;
    Ok(())
}

fn set_category<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    let Some(id) = pick_event(ctx, ArchiveFilter::Active)? else {
        return Ok(());
    };
    let Some(category) = ctx.console.ask("Category (blank to clear): ")? else {
        return Ok(());
    };
    let result = EventService::new(ctx.session).set_category(id, &category);
    ctx.report(result, "Category updated.")?;
    Ok(())
}

fn manage_tags<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    let Some(id) = pick_event(ctx, ArchiveFilter::Active)? else {
        return Ok(());
    };
    ctx.console.menu(
        "Event Tag Management",
        &["Add Tag to Event", "Remove Tag from Event", "Replace All Tags"],
        "Back",
    )?;
    let Some(choice) = ctx.console.ask("Choose an option: ")? else {
        return Ok(());
    };

    match choice.as_str() {
        "1" | "2" => {
            let Some(tag) = ctx.console.ask("Tag: ")? else {
                return Ok(());
            };
            let mut service = EventService::new(ctx.session);
            let (result, done, noop) = if choice == "1" {
                (service.add_tag(id, &tag), "Tag added.", "Tag already present.")
            } else {
                (service.remove_tag(id, &tag), "Tag removed.", "Tag not found on this event.")
            };
            if let Some(changed) = ctx.report(result, "")? {
                ctx.console.say(if changed { done } else { noop })?;
            }
        }
        "3" => {
            let Some(input) = ctx.console.ask("Tags (comma-separated): ")? else {
                return Ok(());
            };
            let result = EventService::new(ctx.session).set_tags(id, &tags::parse_list(&input));
            ctx.report(result, "Tags updated.")?;
        }
        "0" => {}
        _ => ctx.console.say("Invalid choice.")?,
    }
    Ok(())
}

#[derive(Clone, Copy)]
enum Flag {
    Pin,
    Star,
}

fn toggle_flag<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>, flag: Flag) -> PlannerResult<()> {
    let Some(id) = pick_event(ctx, ArchiveFilter::Active)? else {
        return Ok(());
    };
    let mut service = EventService::new(ctx.session);
    let (result, on, off) = match flag {
        Flag::Pin => (service.toggle_pin(id), "Event pinned.", "Event unpinned."),
        Flag::Star => (service.toggle_star(id), "Event starred.", "Event unstarred."),
    };
    if let Some(now_set) = ctx.report(result, "")? {
        ctx.console.say(if now_set { on } else { off })?;
    }
    Ok(())
}

fn set_duration<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    let Some(id) = pick_event(ctx, ArchiveFilter::Active)? else {
        return Ok(());
    };
    let Some(start) = ctx.console.ask_time("Start time HH:MM (blank to clear): ")? else {
        let result = EventService::new(ctx.session).clear_times(id);
        ctx.report(result, "Event times cleared.")?;
        return Ok(());
    };
    let Some(end) = ctx.console.ask_time("End time HH:MM: ")? else {
        return ctx.console.say("Duration not changed.");
    };
    let result = EventService::new(ctx.session).set_times(id, start, end);
    ctx.report(result, "Event duration updated.")?;
    Ok(())
}

fn set_reminder<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    let Some(id) = pick_event(ctx, ArchiveFilter::Active)? else {
        return Ok(());
    };
    let Some(days) = ctx.console.ask_parsed("Remind how many days before (blank to clear)? ", |s| {
        s.parse::<u16>()
            .map_err(|_| "Please enter a whole number of days.".to_string())
    })?
    else {
        let result = EventService::new(ctx.session).clear_reminder(id);
        ctx.report(result, "Reminder cleared.")?;
        return Ok(());
    };
    let today = ctx.today;
    let result = EventService::new(ctx.session).set_reminder(id, days, today);
    ctx.report(result, &format!("Reminder set {} day(s) before the event.", days))?;
    Ok(())
}

fn upcoming<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    let window = ctx.settings.upcoming_window_days;
    let occurrences = ScheduleService::new(ctx.session).upcoming(ctx.today, window);
    ctx.console.say_block(&format_upcoming(&occurrences, window))
}

fn countdown<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    let Some(id) = pick_event(ctx, ArchiveFilter::Active)? else {
        return Ok(());
    };
    let today = ctx.today;
    let result = ScheduleService::new(ctx.session).countdown(id, today);
    if let Some(countdown) = ctx.report(result, "")? {
        let name = ctx
            .session
            .event(id)
            .map(|e| e.name.clone())
            .unwrap_or_default();
        ctx.console.say(&countdown.message(&name))?;
    }
    Ok(())
}

fn set_recurrence<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    let Some(id) = pick_event(ctx, ArchiveFilter::Active)? else {
        return Ok(());
    };
    let Some(frequency) = ctx.console.ask_parsed(
        "Repeat daily/weekly/monthly/yearly (blank to stop repeating): ",
        |s| Frequency::parse(s).ok_or_else(|| "Invalid frequency.".to_string()),
    )?
    else {
        let result = EventService::new(ctx.session).set_recurrence(id, None);
        ctx.report(result, "Event no longer repeats.")?;
        return Ok(());
    };
    let interval = ctx
        .console
        .ask_parsed("Every how many? (blank for 1): ", |s| {
            s.parse::<u32>()
                .map_err(|_| "Please enter a whole number.".to_string())
        })?
        .unwrap_or(1);
    let until = ctx.console.ask_date("Repeat until YYYY-MM-DD (blank for no end): ")?;

    let rule = match RecurrenceRule::new(frequency, interval) {
        Ok(rule) => match until {
            Some(date) => rule.until(date),
            None => rule,
        },
        Err(e) => return ctx.console.say(&format!("Error: {}", e)),
    };
    let message = format!("Event repeats {}.", rule);
    let result = EventService::new(ctx.session).set_recurrence(id, Some(rule));
    ctx.report(result, &message)?;
    Ok(())
}

fn materialize<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    let Some(id) = pick_event(ctx, ArchiveFilter::Active)? else {
        return Ok(());
    };
    let today = ctx.today;
    let result = ScheduleService::new(ctx.session).materialize_next(id, today);
    if let Some(new_id) = ctx.report(result, "")? {
        let name = ctx
            .session
            .event(new_id)
            .map(|e| e.name.clone())
            .unwrap_or_default();
        ctx.console.say(&format!("Created '{}'.", name))?;
    }
    Ok(())
}
