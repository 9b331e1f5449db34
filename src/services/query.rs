//! Event filtering and sorting
//!
//! All sorts are stable: items that compare equal keep their insertion
//! order.

use chrono::NaiveDate;
use std::cmp::Ordering;
use std::fmt;

use crate::models::{Event, Task};

/// Which events a filter admits by archive state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchiveFilter {
    #[default]
    Active,
    Archived,
    All,
}

/// Criteria for selecting events; the default admits every active event
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub archived: ArchiveFilter,
    /// Case-insensitive exact category
    pub category: Option<String>,
    pub tag: Option<String>,
    pub starred_only: bool,
    pub pinned_only: bool,
    /// Case-insensitive substring of the name
    pub name_contains: Option<String>,
    /// Case-insensitive substring of the name or notes
    pub keyword: Option<String>,
    pub date: Option<NaiveDate>,
}

impl EventFilter {
    /// Active events only
    pub fn active() -> Self {
        Self::default()
    }

    /// Archived events only
    pub fn archived() -> Self {
        Self {
            archived: ArchiveFilter::Archived,
            ..Self::default()
        }
    }

    /// Every event regardless of archive state
    pub fn all() -> Self {
        Self {
            archived: ArchiveFilter::All,
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name_contains = Some(name.into());
        self
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn on_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn starred(mut self) -> Self {
        self.starred_only = true;
        self
    }

    pub fn pinned(mut self) -> Self {
        self.pinned_only = true;
        self
    }

    /// Whether an event passes every criterion
    pub fn matches(&self, event: &Event) -> bool {
        let archive_ok = match self.archived {
            ArchiveFilter::Active => !event.archived,
            ArchiveFilter::Archived => event.archived,
            ArchiveFilter::All => true,
        };
        if !archive_ok {
            return false;
        }
        if self.starred_only && !event.starred {
            return false;
        }
        if self.pinned_only && !event.pinned {
            return false;
        }
        if let Some(category) = &self.category {
            if !event.category.eq_ignore_ascii_case(category.trim()) {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            if !event.has_tag(tag) {
                return false;
            }
        }
        if let Some(name) = &self.name_contains {
            if !contains_ignore_case(&event.name, name) {
                return false;
            }
        }
        if let Some(keyword) = &self.keyword {
            if !contains_ignore_case(&event.name, keyword)
                && !contains_ignore_case(&event.notes, keyword)
            {
                return false;
            }
        }
        if let Some(date) = self.date {
            if event.date != date {
                return false;
            }
        }
        true
    }

    /// Events passing the filter, in their original order
    pub fn apply<'e>(&self, events: &'e [Event]) -> Vec<&'e Event> {
        events.iter().filter(|e| self.matches(e)).collect()
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_lowercase()
        .contains(&needle.trim().to_lowercase())
}

/// Event orderings offered by the search menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSort {
    /// A-Z, case-insensitive
    Name,
    /// Earliest first
    Date,
    /// High first
    Priority,
    /// Shortest first; events without times last
    Duration,
    /// Starred first
    Starred,
    /// Pinned first
    Pinned,
}

impl EventSort {
    pub const ALL: [EventSort; 6] = [
        Self::Name,
        Self::Date,
        Self::Priority,
        Self::Duration,
        Self::Starred,
        Self::Pinned,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "name" => Some(Self::Name),
            "date" => Some(Self::Date),
            "priority" => Some(Self::Priority),
            "duration" => Some(Self::Duration),
            "starred" | "star" => Some(Self::Starred),
            "pinned" | "pin" => Some(Self::Pinned),
            _ => None,
        }
    }

    fn compare(&self, a: &Event, b: &Event) -> Ordering {
        match self {
            Self::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            Self::Date => a.date.cmp(&b.date),
            Self::Priority => b.priority.cmp(&a.priority),
            Self::Duration => none_last(a.duration(), b.duration()),
            Self::Starred => b.starred.cmp(&a.starred),
            Self::Pinned => b.pinned.cmp(&a.pinned),
        }
    }
}

impl fmt::Display for EventSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Name => "Name (A-Z)",
            Self::Date => "Date (earliest first)",
            Self::Priority => "Priority (high first)",
            Self::Duration => "Duration (shortest first)",
            Self::Starred => "Starred first",
            Self::Pinned => "Pinned first",
        };
        write!(f, "{}", label)
    }
}

/// Sort events in place; ties keep their order
pub fn sort_events(events: &mut [&Event], sort: EventSort) {
    events.sort_by(|a, b| sort.compare(a, b));
}

/// Task orderings offered by the task menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSort {
    /// Soonest first; tasks without a deadline last
    Deadline,
    /// High first
    Priority,
    /// Unfinished tasks before completed ones
    CompletedLast,
    /// Highest budget first; unset and invalid budgets last
    Budget,
}

impl TaskSort {
    pub const ALL: [TaskSort; 4] = [
        Self::Deadline,
        Self::Priority,
        Self::CompletedLast,
        Self::Budget,
    ];

    fn compare(&self, a: &Task, b: &Task) -> Ordering {
        match self {
            Self::Deadline => none_last(a.deadline, b.deadline),
            Self::Priority => b.priority.cmp(&a.priority),
            Self::CompletedLast => a.is_completed().cmp(&b.is_completed()),
            Self::Budget => match (a.budget.amount(), b.budget.amount()) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        }
    }
}

impl fmt::Display for TaskSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Deadline => "Deadline (soonest first)",
            Self::Priority => "Priority (high first)",
            Self::CompletedLast => "Completed last",
            Self::Budget => "Budget (highest first)",
        };
        write!(f, "{}", label)
    }
}

/// Sort tasks in place; ties keep their order
pub fn sort_tasks(tasks: &mut [&Task], sort: TaskSort) {
    tasks.sort_by(|a, b| sort.compare(a, b));
}

/// Ascending order with `None` after every `Some`
fn none_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Budget, Money, Priority};
    use chrono::NaiveTime;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn names(events: &[&Event]) -> Vec<String> {
        events.iter().map(|e| e.name.clone()).collect()
    }

    fn sample() -> Vec<Event> {
        let mut a = Event::new("beta", date(2024, 8, 20));
        a.category = "Work".into();
        a.add_tag("office");
        a.starred = true;

        let mut b = Event::new("Alpha", date(2024, 8, 10));
        b.notes = "Bring the cake".into();
        b.priority = Priority::High;

        let mut c = Event::new("gamma", date(2024, 8, 20));
        c.archived = true;
        c.pinned = true;

        vec![a, b, c]
    }

    #[test]
    fn test_default_filter_excludes_archived() {
        let events = sample();
        assert_eq!(names(&EventFilter::default().apply(&events)), vec!["beta", "Alpha"]);
        assert_eq!(names(&EventFilter::archived().apply(&events)), vec!["gamma"]);
        assert_eq!(EventFilter::all().apply(&events).len(), 3);
    }

    #[test]
    fn test_filter_criteria() {
        let events = sample();
        let by = |f: EventFilter| names(&f.apply(&events));

        assert_eq!(by(EventFilter::active().with_category("work")), vec!["beta"]);
        assert_eq!(by(EventFilter::active().with_tag("OFFICE")), vec!["beta"]);
        assert_eq!(by(EventFilter::active().starred()), vec!["beta"]);
        assert_eq!(by(EventFilter::all().pinned()), vec!["gamma"]);
        assert_eq!(by(EventFilter::active().with_name("ALP")), vec!["Alpha"]);
        assert_eq!(by(EventFilter::active().with_keyword("cake")), vec!["Alpha"]);
        assert_eq!(by(EventFilter::all().on_date(date(2024, 8, 20))), vec!["beta", "gamma"]);
    }

    #[test]
    fn test_sort_by_name_case_insensitive() {
        let events = sample();
        let mut refs: Vec<&Event> = events.iter().collect();
        sort_events(&mut refs, EventSort::Name);
        assert_eq!(names(&refs), vec!["Alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_sort_by_date_is_stable() {
        let events = sample();
        let mut refs: Vec<&Event> = events.iter().collect();
        sort_events(&mut refs, EventSort::Date);
        assert_eq!(names(&refs), vec!["Alpha", "beta", "gamma"]);

        let mut reversed: Vec<&Event> = events.iter().rev().collect();
        sort_events(&mut reversed, EventSort::Date);
        assert_eq!(names(&reversed), vec!["Alpha", "gamma", "beta"]);
    }

    #[test]
    fn test_sort_flags_and_priority() {
        let events = sample();
        let mut refs: Vec<&Event> = events.iter().collect();
        sort_events(&mut refs, EventSort::Priority);
        assert_eq!(refs[0].name, "Alpha");

        sort_events(&mut refs, EventSort::Pinned);
        assert_eq!(refs[0].name, "gamma");

        sort_events(&mut refs, EventSort::Starred);
        assert_eq!(refs[0].name, "beta");
    }

    #[test]
    fn test_sort_by_duration_untimed_last() {
        let t = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
        let mut long = Event::new("long", date(2024, 8, 1));
        long.start_time = Some(t(9));
        long.end_time = Some(t(17));
        let untimed = Event::new("untimed", date(2024, 8, 1));
        let mut short = Event::new("short", date(2024, 8, 1));
        short.start_time = Some(t(9));
        short.end_time = Some(t(10));

        let events = vec![untimed, long, short];
        let mut refs: Vec<&Event> = events.iter().collect();
        sort_events(&mut refs, EventSort::Duration);
        assert_eq!(names(&refs), vec!["short", "long", "untimed"]);
    }

    #[test]
    fn test_task_sorts() {
        let mut a = Task::new("a");
        a.deadline = Some(date(2024, 8, 12));
        a.budget = Budget::Amount(Money::from_cents(500));
        a.set_progress(100);
        let mut b = Task::new("b");
        b.priority = Priority::High;
        b.budget = Budget::Invalid("bad".into());
        let mut c = Task::new("c");
        c.deadline = Some(date(2024, 8, 11));
        c.budget = Budget::Amount(Money::from_cents(900));

        let tasks = vec![a, b, c];
        let order = |sort| {
            let mut refs: Vec<&Task> = tasks.iter().collect();
            sort_tasks(&mut refs, sort);
            refs.iter().map(|t| t.description.clone()).collect::<Vec<_>>()
        };

        assert_eq!(order(TaskSort::Deadline), vec!["c", "a", "b"]);
        assert_eq!(order(TaskSort::Priority), vec!["b", "a", "c"]);
        assert_eq!(order(TaskSort::CompletedLast), vec!["b", "c", "a"]);
        assert_eq!(order(TaskSort::Budget), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_event_sort_parse() {
        assert_eq!(EventSort::parse("Date"), Some(EventSort::Date));
        assert_eq!(EventSort::parse("size"), None);
    }
}
