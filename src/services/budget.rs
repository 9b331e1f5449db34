//! Budget aggregation
//!
//! Sums task budgets against event budgets. Invalid budget entries are
//! counted and skipped, never fatal.

use crate::error::{PlannerError, PlannerResult};
use crate::models::{Budget, Event, EventId, Money, TaskId};
use crate::session::Session;

/// Highest usage percentage reported
pub const MAX_USAGE_PERCENT: u32 = 999;

/// Sum the valid amounts, returning the total and the number of invalid entries
pub fn sum_valid<'b, I>(budgets: I) -> (Money, usize)
where
    I: IntoIterator<Item = &'b Budget>,
{
    budgets
        .into_iter()
        .fold((Money::zero(), 0), |(total, invalid), budget| match budget {
            Budget::Amount(amount) => (total + *amount, invalid),
            Budget::Invalid(_) => (total, invalid + 1),
            Budget::Unset => (total, invalid),
        })
}

/// Budget picture for one event
#[derive(Debug, Clone, PartialEq)]
pub struct EventBudgetSummary {
    pub event_id: EventId,
    pub name: String,
    /// The event's own budget (`Unset`/`Invalid` count as zero below)
    pub budget: Budget,
    /// Sum of the valid budgets of active tasks
    pub tasks_total: Money,
    /// Event budget minus `tasks_total`; negative when over budget
    pub remaining: Money,
    /// `tasks_total` as a percentage of the event budget, when it is positive
    pub usage_percent: Option<u32>,
    /// Task budget entries that could not be read as amounts
    pub invalid_entries: usize,
}

impl EventBudgetSummary {
    /// Summarize one event
    pub fn for_event(event: &Event) -> Self {
        let (tasks_total, invalid_entries) = sum_valid(event.tasks.iter().map(|t| &t.budget));
        let event_budget = event.budget.amount().unwrap_or_default();

        let usage_percent = (event_budget.cents() > 0).then(|| {
            let percent = i128::from(tasks_total.cents()) * 100 / i128::from(event_budget.cents());
            u32::try_from(percent.clamp(0, i128::from(MAX_USAGE_PERCENT)))
                .unwrap_or(MAX_USAGE_PERCENT)
        });

        Self {
            event_id: event.id,
            name: event.name.clone(),
            budget: event.budget.clone(),
            tasks_total,
            remaining: event_budget - tasks_total,
            usage_percent,
            invalid_entries,
        }
    }

    pub fn is_over_budget(&self) -> bool {
        self.remaining.is_negative()
    }
}

/// One task's budget line
#[derive(Debug, Clone, PartialEq)]
pub struct TaskBudgetLine {
    pub task_id: TaskId,
    pub description: String,
    pub budget: Budget,
}

/// Budgets across all of a user's events
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetOverview {
    pub events: Vec<EventBudgetSummary>,
    /// Sum of valid event budgets
    pub total_budget: Money,
    /// Sum of valid task budgets
    pub total_tasks: Money,
    /// Invalid entries skipped, event and task budgets together
    pub invalid_entries: usize,
}

impl BudgetOverview {
    pub fn remaining(&self) -> Money {
        self.total_budget - self.total_tasks
    }
}

/// Service for budget views over a session
pub struct BudgetService<'a> {
    session: &'a Session,
}

impl<'a> BudgetService<'a> {
    /// Create a new budget service
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Summary for one event
    pub fn event_summary(&self, event_id: EventId) -> PlannerResult<EventBudgetSummary> {
        Ok(EventBudgetSummary::for_event(self.event(event_id)?))
    }

    /// Each active task's budget, in task order
    pub fn task_budgets(&self, event_id: EventId) -> PlannerResult<Vec<TaskBudgetLine>> {
        Ok(self
            .event(event_id)?
            .tasks
            .iter()
            .map(|t| TaskBudgetLine {
                task_id: t.id,
                description: t.description.clone(),
                budget: t.budget.clone(),
            })
            .collect())
    }

    /// Summaries for every event, optionally including archived ones
    pub fn overview(&self, include_archived: bool) -> BudgetOverview {
        let events: Vec<&Event> = self
            .session
            .events()
            .iter()
            .filter(|e| include_archived || !e.archived)
            .collect();

        let (total_budget, invalid_event_budgets) = sum_valid(events.iter().map(|e| &e.budget));
        let summaries: Vec<EventBudgetSummary> = events
            .iter()
            .map(|e| EventBudgetSummary::for_event(e))
            .collect();
        let total_tasks: Money = summaries.iter().map(|s| s.tasks_total).sum();
        let invalid_task_budgets: usize = summaries.iter().map(|s| s.invalid_entries).sum();

        BudgetOverview {
            events: summaries,
            total_budget,
            total_tasks,
            invalid_entries: invalid_event_budgets + invalid_task_budgets,
        }
    }

    fn event(&self, event_id: EventId) -> PlannerResult<&'a Event> {
        self.session
            .event(event_id)
            .ok_or_else(|| PlannerError::event_not_found(event_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Task, VoicePreference};
    use chrono::NaiveDate;

    fn money(units: i64) -> Budget {
        Budget::Amount(Money::from_units_cents(units, 0))
    }

    fn event_with_task_budgets(budget: Budget, task_budgets: Vec<Budget>) -> Event {
        let mut event = Event::new("Party", NaiveDate::from_ymd_opt(2024, 8, 15).unwrap());
        event.budget = budget;
        for (i, b) in task_budgets.into_iter().enumerate() {
            let mut task = Task::new(format!("task {}", i));
            task.budget = b;
            event.tasks.push(task);
        }
        event
    }

    #[test]
    fn test_invalid_entries_are_skipped() {
        let budgets = vec![money(10), money(20), Budget::Invalid("bad".into()), money(5)];
        let (total, invalid) = sum_valid(&budgets);
        assert_eq!(total, Money::from_units_cents(35, 0));
        assert_eq!(invalid, 1);
    }

    #[test]
    fn test_event_summary_within_budget() {
        let event = event_with_task_budgets(money(100), vec![money(30), Budget::Unset, money(15)]);
        let summary = EventBudgetSummary::for_event(&event);

        assert_eq!(summary.tasks_total, Money::from_units_cents(45, 0));
        assert_eq!(summary.remaining, Money::from_units_cents(55, 0));
        assert_eq!(summary.usage_percent, Some(45));
        assert!(!summary.is_over_budget());
    }

    #[test]
    fn test_usage_percent_capped_and_over_budget() {
        let event = event_with_task_budgets(money(1), vec![money(50)]);
        let summary = EventBudgetSummary::for_event(&event);

        assert!(summary.is_over_budget());
        assert_eq!(summary.remaining, Money::from_units_cents(-49, 0));
        assert_eq!(summary.usage_percent, Some(MAX_USAGE_PERCENT));
    }

    #[test]
    fn test_no_usage_without_event_budget() {
        let event = event_with_task_budgets(Budget::Invalid("lots".into()), vec![money(5)]);
        let summary = EventBudgetSummary::for_event(&event);
        assert_eq!(summary.usage_percent, None);
        assert!(summary.is_over_budget());
    }

    #[test]
    fn test_service_views() {
        let active = event_with_task_budgets(money(100), vec![money(10), Budget::Invalid("x".into())]);
        let active_id = active.id;
        let mut archived = event_with_task_budgets(money(50), vec![money(20)]);
        archived.archived = true;
        let session = Session::with_events(
            "alice",
            vec![active, archived],
            VoicePreference::default(),
        );
        let service = BudgetService::new(&session);

        let lines = service.task_budgets(active_id).unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].budget.is_invalid());

        let overview = service.overview(false);
        assert_eq!(overview.events.len(), 1);
        assert_eq!(overview.total_budget, Money::from_units_cents(100, 0));
        assert_eq!(overview.total_tasks, Money::from_units_cents(10, 0));
        assert_eq!(overview.invalid_entries, 1);

        let everything = service.overview(true);
        assert_eq!(everything.total_budget, Money::from_units_cents(150, 0));
        assert_eq!(everything.remaining(), Money::from_units_cents(120, 0));

        assert!(service.event_summary(EventId::new()).is_err());
    }

    #[test]
    fn test_huge_budgets_saturate() {
        let huge = Budget::from_input("90000000000000000").unwrap();
        let event = event_with_task_budgets(Budget::Unset, vec![huge.clone(), huge]);
        let event_id = event.id;
        let session = Session::with_events("alice", vec![event], VoicePreference::default());
        let service = BudgetService::new(&session);

        let summary = service.event_summary(event_id).unwrap();
        assert_eq!(summary.tasks_total, Money::from_cents(i64::MAX));
        assert!(summary.is_over_budget());

        let overview = service.overview(false);
        assert_eq!(overview.total_tasks, Money::from_cents(i64::MAX));
        assert_eq!(overview.remaining(), Money::from_cents(-i64::MAX));
    }
}
