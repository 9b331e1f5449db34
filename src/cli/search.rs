//! Search, filter and sort menus

use std::io::{BufRead, Write};

use crate::display::{format_event_list, format_task_list};
use crate::error::PlannerResult;
use crate::services::query::{sort_events, sort_tasks as sort_task_refs};
use crate::services::{ArchiveFilter, EventFilter, EventSort, TaskSort};

use super::{pick_event, MenuContext};

pub fn search_menu<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    loop {
        ctx.console.menu(
            "Search & Sort",
            &[
                "Search Events by Keyword",
                "Filter by Category",
                "Filter by Tag",
                "Show Starred Events",
                "Show Pinned Events",
                "Events on a Date",
                "Search Archived Events",
                "Sort Events",
            ],
            "Back to Main Menu",
        )?;
        let Some(choice) = ctx.console.ask("Choose an option: ")? else {
            return Ok(());
        };

        let filter = match choice.as_str() {
            "1" => ask_text(ctx, "Keyword: ")?.map(|k| EventFilter::active().with_keyword(k)),
            "2" => ask_text(ctx, "Category: ")?.map(|c| EventFilter::active().with_category(c)),
            "3" => ask_text(ctx, "Tag: ")?.map(|t| EventFilter::active().with_tag(t)),
            "4" => Some(EventFilter::active().starred()),
            "5" => Some(EventFilter::active().pinned()),
            "6" => ctx
                .console
                .ask_date("Date (YYYY-MM-DD): ")?
                .map(|d| EventFilter::all().on_date(d)),
            "7" => match ask_text(ctx, "Keyword (blank for all): ")? {
                Some(keyword) => Some(EventFilter::archived().with_keyword(keyword)),
                None => Some(EventFilter::archived()),
            },
            "8" => {
                sort_event_list(ctx)?;
                None
            }
            "0" => return Ok(()),
            _ => {
                ctx.console.say("Invalid choice.")?;
                None
            }
        };

        if let Some(filter) = filter {
            let events = filter.apply(ctx.session.events());
            let block = format_event_list(&events);
            ctx.console.say_block(&block)?;
        }
        if ctx.console.is_closed() {
            return Ok(());
        }
    }
}

/// Ask for free text; blank or EOF yields `None`
fn ask_text<R: BufRead, W: Write>(
    ctx: &mut MenuContext<'_, R, W>,
    prompt: &str,
) -> PlannerResult<Option<String>> {
    Ok(ctx.console.ask(prompt)?.filter(|s| !s.is_empty()))
}

/// Offer `options` as a numbered list; accepts a number or `parse_name`
fn choose<R: BufRead, W: Write, T: Copy + std::fmt::Display>(
    ctx: &mut MenuContext<'_, R, W>,
    options: &[T],
    parse_name: impl Fn(&str) -> Option<T>,
) -> PlannerResult<Option<T>> {
    for (i, option) in options.iter().enumerate() {
        ctx.console.say(&format!("{}. {}", i + 1, option))?;
    }
    ctx.console.ask_parsed("Sort by: ", |s| match s.parse::<usize>() {
        Ok(n) if (1..=options.len()).contains(&n) => Ok(options[n - 1]),
        _ => parse_name(s).ok_or_else(|| "Invalid sort option.".to_string()),
    })
}

fn sort_event_list<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    let Some(sort) = choose(ctx, &EventSort::ALL, EventSort::parse)? else {
        return Ok(());
    };
    let mut events = EventFilter::active().apply(ctx.session.events());
    sort_events(&mut events, sort);

    let block = format!("Sorted by {}:\n{}", sort, format_event_list(&events));
    ctx.console.say_block(&block)
}

/// Show one event's tasks in a chosen order
pub fn sort_tasks<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    let Some(event_id) = pick_event(ctx, ArchiveFilter::All)? else {
        return Ok(());
    };
    let Some(sort) = choose(ctx, &TaskSort::ALL, |_| None)? else {
        return Ok(());
    };

    let Some(event) = ctx.session.event(event_id) else {
        return ctx.console.say("Event not found.");
    };
    let mut tasks: Vec<_> = event.tasks.iter().collect();
    sort_task_refs(&mut tasks, sort);

    let block = format!(
        "Tasks for {} sorted by {}:\n{}",
        event.name,
        sort,
        format_task_list(&tasks, &ctx.settings.currency_symbol)
    );
    ctx.console.say_block(&block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::test_support::run_menu;
    use crate::models::{Budget, Event, Money, Task, VoicePreference};
    use crate::session::Session;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, d).unwrap()
    }

    fn session() -> Session {
        let mut party = Event::new("Party", date(20));
        party.category = "Personal".to_string();
        party.notes = "bring snacks".to_string();
        party.starred = true;
        let mut meeting = Event::new("Meeting", date(5));
        meeting.category = "Work".to_string();
        meeting.add_tag("q3");
        let mut old = Event::new("Picnic", date(2));
        old.archived = true;
        Session::with_events("alice", vec![party, meeting, old], VoicePreference::default())
    }

    #[test]
    fn test_keyword_searches_notes() {
        let mut session = session();
        let out = run_menu(&mut session, "1\nsnacks\n0\n", search_menu);
        assert!(out.contains("Party"));
        assert!(out.contains("1 event(s)"));
    }

    #[test]
    fn test_filters_exclude_archived_by_default() {
        let mut session = session();
        let out = run_menu(&mut session, "1\npic\n7\npic\n0\n", search_menu);
        assert!(out.contains("No events found."));
        assert!(out.contains("Picnic"));
    }

    #[test]
    fn test_category_and_tag_filters() {
        let mut session = session();
        let out = run_menu(&mut session, "2\nwork\n3\nQ3\n0\n", search_menu);
        assert_eq!(out.matches("Meeting").count(), 2);
        assert!(!out.contains("Party"));
    }

    #[test]
    fn test_sort_events_by_date() {
        let mut session = session();
        let out = run_menu(&mut session, "8\n2\n0\n", search_menu);
        assert!(out.contains("Sorted by Date (earliest first):"));
        let meeting = out.rfind("Meeting").unwrap();
        let party = out.rfind("Party").unwrap();
        assert!(meeting < party);
    }

    #[test]
    fn test_sort_tasks_by_budget() {
        let mut session = session();
        for (name, cents) in [("Cups", 500), ("Cake", 2000)] {
            let mut task = Task::new(name);
            task.budget = Budget::Amount(Money::from_cents(cents));
            session.events_mut()[0].tasks.push(task);
        }

        let out = run_menu(&mut session, "1\n4\n", sort_tasks);
        assert!(out.contains("Tasks for Party sorted by Budget (highest first):"));
        let cake = out.rfind("Cake").unwrap();
        let cups = out.rfind("Cups").unwrap();
        assert!(cake < cups);
    }
}
