//! Event model
//!
//! An event is the top-level planning item. It owns its tasks (active and
//! archived) exclusively; deleting an event deletes them too.

use chrono::{DateTime, Days, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::budget::Budget;
use super::ids::{EventId, TaskId};
use super::priority::Priority;
use super::recurrence::RecurrenceRule;
use super::tags;
use super::task::Task;
use crate::error::{PlannerError, PlannerResult};

/// Longest reminder lead time, in days
pub const MAX_REMINDER_DAYS: u16 = 365;

/// Longest event name accepted
pub const MAX_NAME_LEN: usize = 120;

/// A dated event with its tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier
    pub id: EventId,

    /// Display name, unique per user (case-insensitive)
    pub name: String,

    /// The day the event happens (for recurring events, the anchor date)
    pub date: NaiveDate,

    #[serde(default)]
    pub notes: String,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub budget: Budget,

    /// Lowercased, de-duplicated tags in insertion order
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub pinned: bool,

    #[serde(default)]
    pub starred: bool,

    #[serde(default)]
    pub archived: bool,

    /// Days before the event a reminder becomes due
    #[serde(default)]
    pub reminder_days: Option<u16>,

    #[serde(default)]
    pub start_time: Option<NaiveTime>,

    #[serde(default)]
    pub end_time: Option<NaiveTime>,

    #[serde(default)]
    pub recurrence: Option<RecurrenceRule>,

    /// When the event was created
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub tasks: Vec<Task>,

    #[serde(default)]
    pub archived_tasks: Vec<Task>,
}

impl Event {
    /// Create a new event with default attributes
    pub fn new(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: EventId::new(),
            name: name.into().trim().to_string(),
            date,
            notes: String::new(),
            category: String::new(),
            priority: Priority::default(),
            budget: Budget::Unset,
            tags: Vec::new(),
            pinned: false,
            starred: false,
            archived: false,
            reminder_days: None,
            start_time: None,
            end_time: None,
            recurrence: None,
            created_at: Utc::now(),
            tasks: Vec::new(),
            archived_tasks: Vec::new(),
        }
    }

    /// Case-insensitive name comparison
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }

    /// Whether `query` names this event, by id or case-insensitive name
    pub fn matches(&self, query: &str) -> bool {
        self.id.matches(query) || self.has_name(query)
    }

    /// Length of the event when both times are set and end follows start
    pub fn duration(&self) -> Option<Duration> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) if end > start => Some(end - start),
            _ => None,
        }
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }

    /// Signed number of days from `today` to the event date
    pub fn days_until(&self, today: NaiveDate) -> i64 {
        (self.date - today).num_days()
    }

    /// First day the reminder is due, if one is set
    pub fn reminder_opens_on(&self) -> Option<NaiveDate> {
        let days = self.reminder_days?;
        self.date.checked_sub_days(Days::new(u64::from(days)))
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        match tags::normalize_one(tag) {
            Some(tag) => self.tags.contains(&tag),
            None => false,
        }
    }

    /// Add a tag; returns false when it was blank or already present
    pub fn add_tag(&mut self, tag: &str) -> bool {
        match tags::normalize_one(tag) {
            Some(tag) if !self.tags.contains(&tag) => {
                self.tags.push(tag);
                true
            }
            _ => false,
        }
    }

    /// Remove a tag; returns false when it was not present
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let Some(tag) = tags::normalize_one(tag) else {
            return false;
        };
        let before = self.tags.len();
        self.tags.retain(|t| *t != tag);
        self.tags.len() != before
    }

    /// Replace all tags
    pub fn set_tags<I, S>(&mut self, new_tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = tags::normalize(new_tags);
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Find an active task by id or description
    pub fn find_task(&self, query: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.matches(query))
    }

    /// Find an archived task by id or description
    pub fn find_archived_task(&self, query: &str) -> Option<&Task> {
        self.archived_tasks.iter().find(|t| t.matches(query))
    }

    /// Validate the event
    pub fn validate(&self) -> PlannerResult<()> {
        validate_name(&self.name)?;

        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if end <= start {
                return Err(PlannerError::Validation(
                    "End time must be after start time".into(),
                ));
            }
        }

        if matches!(self.reminder_days, Some(days) if days > MAX_REMINDER_DAYS) {
            return Err(PlannerError::Validation(format!(
                "Reminder cannot be more than {} days before the event",
                MAX_REMINDER_DAYS
            )));
        }

        for task in self.tasks.iter().chain(&self.archived_tasks) {
            task.validate()?;
        }

        Ok(())
    }
}

/// Check an event name for emptiness and length
pub fn validate_name(name: &str) -> PlannerResult<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PlannerError::Validation("Event name cannot be empty".into()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(PlannerError::Validation(format!(
            "Event name too long (max {} characters)",
            MAX_NAME_LEN
        )));
    }
    Ok(())
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.date.format("%Y-%m-%d"))
    }
}
