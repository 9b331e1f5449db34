//! Date-driven views: upcoming events, due tasks, reminders, countdowns
//!
//! Every query takes `today` explicitly. Recurring events never spawn new
//! events on their own; [`ScheduleService::materialize_next`] does that on
//! request.

use chrono::{Days, NaiveDate};
use log::info;

use crate::error::{PlannerError, PlannerResult};
use crate::models::{Event, EventId, Task, TaskId};
use crate::session::Session;

/// Default look-ahead for upcoming events, in days
pub const DEFAULT_UPCOMING_WINDOW: u32 = 7;

/// Default look-ahead for due tasks, in days
pub const DEFAULT_DUE_WINDOW: u32 = 3;

/// An event occurrence inside the look-ahead window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub event_id: EventId,
    pub name: String,
    pub date: NaiveDate,
    pub recurring: bool,
}

/// A task whose deadline falls inside the look-ahead window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueTask {
    pub event_id: EventId,
    pub event_name: String,
    pub task_id: TaskId,
    pub description: String,
    pub deadline: NaiveDate,
}

/// An event whose reminder is currently open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueReminder {
    pub event_id: EventId,
    pub name: String,
    pub date: NaiveDate,
    pub days_left: i64,
}

/// Distance from today to an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    DaysLeft(i64),
    Today,
    DaysAgo(i64),
}

impl Countdown {
    pub fn between(date: NaiveDate, today: NaiveDate) -> Self {
        let days = (date - today).num_days();
        match days {
            d if d > 0 => Self::DaysLeft(d),
            0 => Self::Today,
            d => Self::DaysAgo(-d),
        }
    }

    /// Sentence for an event called `name`
    pub fn message(&self, name: &str) -> String {
        match self {
            Self::DaysLeft(days) => format!("{} day(s) left until {}.", days, name),
            Self::Today => format!("{} is today!", name),
            Self::DaysAgo(days) => format!("{} passed {} day(s) ago.", name, days),
        }
    }
}

/// Service for schedule queries over a session
pub struct ScheduleService<'a> {
    session: &'a mut Session,
}

impl<'a> ScheduleService<'a> {
    /// Create a new schedule service
    pub fn new(session: &'a mut Session) -> Self {
        Self { session }
    }

    /// Active events happening within `window_days` of `today`, soonest first
    ///
    /// A recurring event contributes its first occurrence in the window.
    pub fn upcoming(&self, today: NaiveDate, window_days: u32) -> Vec<Occurrence> {
        let Some(horizon) = today.checked_add_days(Days::new(u64::from(window_days))) else {
            return Vec::new();
        };

        let mut found: Vec<Occurrence> = self
            .active_events()
            .filter_map(|event| {
                let date = next_occurrence_on_or_after(event, today)?;
                (date <= horizon).then(|| Occurrence {
                    event_id: event.id,
                    name: event.name.clone(),
                    date,
                    recurring: event.is_recurring(),
                })
            })
            .collect();
        found.sort_by_key(|o| o.date);
        found
    }

    /// Unfinished tasks of active events due within `window_days` of `today`
    pub fn due_tasks(&self, today: NaiveDate, window_days: u32) -> Vec<DueTask> {
        let Some(horizon) = today.checked_add_days(Days::new(u64::from(window_days))) else {
            return Vec::new();
        };

        let mut due: Vec<DueTask> = self
            .active_events()
            .flat_map(|event| {
                event.tasks.iter().filter_map(move |task| {
                    let deadline = task.deadline?;
                    (!task.is_completed() && today <= deadline && deadline <= horizon).then(|| {
                        DueTask {
                            event_id: event.id,
                            event_name: event.name.clone(),
                            task_id: task.id,
                            description: task.description.clone(),
                            deadline,
                        }
                    })
                })
            })
            .collect();
        due.sort_by_key(|d| d.deadline);
        due
    }

    /// Active events whose reminder window includes `today`
    pub fn due_reminders(&self, today: NaiveDate) -> Vec<DueReminder> {
        self.active_events()
            .filter(|event| {
                event
                    .reminder_opens_on()
                    .is_some_and(|opens| opens <= today && today <= event.date)
            })
            .map(|event| DueReminder {
                event_id: event.id,
                name: event.name.clone(),
                date: event.date,
                days_left: event.days_until(today),
            })
            .collect()
    }

    /// Countdown for one event
    pub fn countdown(&self, event_id: EventId, today: NaiveDate) -> PlannerResult<Countdown> {
        let event = self
            .session
            .event(event_id)
            .ok_or_else(|| PlannerError::event_not_found(event_id.to_string()))?;
        Ok(Countdown::between(event.date, today))
    }

    /// Create the next occurrence of a recurring event as a new event
    ///
    /// The occurrence is the first one after the anchor date, on or after
    /// `today`, that has not been materialized yet, so repeated calls walk
    /// forward through the series. The copy gets new ids, a name suffixed
    /// with its date, tasks with progress reset and deadlines shifted by the
    /// same offset, and no recurrence rule of its own.
    pub fn materialize_next(
        &mut self,
        event_id: EventId,
        today: NaiveDate,
    ) -> PlannerResult<EventId> {
        let source = self
            .session
            .event(event_id)
            .ok_or_else(|| PlannerError::event_not_found(event_id.to_string()))?;
        let rule = source.recurrence.as_ref().ok_or_else(|| {
            PlannerError::Validation(format!("'{}' is not a recurring event", source.name))
        })?;
        let exhausted =
            || PlannerError::Validation(format!("'{}' has no further occurrences", source.name));

        let mut next = if today > source.date {
            rule.next_on_or_after(source.date, today)
        } else {
            rule.advance(source.date, source.date)
        }
        .ok_or_else(exhausted)?;

        // Skip occurrences that already have a copy
        while self.name_taken(&occurrence_name(source, next)) {
            next = rule.advance(source.date, next).ok_or_else(exhausted)?;
        }

        let copy = next_copy(source, next);
        let id = copy.id;
        self.session.events_mut().push(copy);
        info!("event=occurrence_materialize status=ok source={} id={}", event_id, id);
        Ok(id)
    }

    fn name_taken(&self, name: &str) -> bool {
        self.active_events().any(|e| e.has_name(name))
    }

    fn active_events(&self) -> impl Iterator<Item = &Event> {
        self.session.events().iter().filter(|e| !e.archived)
    }
}

/// The first date on or after `day` the event happens
pub fn next_occurrence_on_or_after(event: &Event, day: NaiveDate) -> Option<NaiveDate> {
    match &event.recurrence {
        Some(rule) => rule.next_on_or_after(event.date, day),
        None => (event.date >= day).then_some(event.date),
    }
}

fn occurrence_name(source: &Event, date: NaiveDate) -> String {
    format!("{} ({})", source.name, date)
}

fn next_copy(source: &Event, next: NaiveDate) -> Event {
    let offset = next - source.date;

    let mut copy = Event::new(occurrence_name(source, next), next);
    copy.notes = source.notes.clone();
    copy.category = source.category.clone();
    copy.priority = source.priority;
    copy.budget = source.budget.clone();
    copy.tags = source.tags.clone();
    copy.reminder_days = source.reminder_days;
    copy.start_time = source.start_time;
    copy.end_time = source.end_time;

    copy.tasks = source
        .tasks
        .iter()
        .map(|task| {
            let mut fresh = Task::new(task.description.clone());
            fresh.deadline = task.deadline.and_then(|d| d.checked_add_signed(offset));
            fresh.priority = task.priority;
            fresh.budget = task.budget.clone();
            fresh.tags = task.tags.clone();
            fresh
        })
        .collect();
    copy
}
