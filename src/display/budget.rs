//! Budget display formatting

use crate::services::budget::{BudgetOverview, EventBudgetSummary, TaskBudgetLine};

use super::format_budget;

/// Budget summary for one event
pub fn format_budget_summary(summary: &EventBudgetSummary, symbol: &str) -> String {
    let mut lines = vec![
        format!("Budget summary for {}", summary.name),
        format!("Event budget: {}", format_budget(&summary.budget, symbol)),
        format!("Task budget used: {}", summary.tasks_total.format_with_symbol(symbol)),
    ];

    if summary.is_over_budget() {
        lines.push(format!(
            "Over budget by {}.",
            summary.remaining.abs().format_with_symbol(symbol)
        ));
    } else {
        lines.push(format!(
            "Remaining: {}. Within budget.",
            summary.remaining.format_with_symbol(symbol)
        ));
    }

    if let Some(percent) = summary.usage_percent {
        lines.push(format!("Usage: {}%", percent));
    }
    if summary.invalid_entries > 0 {
        lines.push(format!(
            "Skipped {} invalid task budget(s).",
            summary.invalid_entries
        ));
    }

    lines.join("\n")
}

/// Per-task budget lines
pub fn format_task_budgets(event_name: &str, lines: &[TaskBudgetLine], symbol: &str) -> String {
    if lines.is_empty() {
        return format!("{} has no tasks.", event_name);
    }
    let mut out = vec![format!("Task budgets for {}", event_name)];
    for line in lines {
        out.push(format!(
            "- {}: {}",
            line.description,
            format_budget(&line.budget, symbol)
        ));
    }
    out.join("\n")
}

/// Every event's budget plus grand totals
pub fn format_budget_overview(overview: &BudgetOverview, symbol: &str) -> String {
    if overview.events.is_empty() {
        return "No events found.".to_string();
    }

    let name_width = overview
        .events
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(5)
        .max(5);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:>14}  {:>14}  {:>14}\n",
        "Event",
        "Budget",
        "Tasks",
        "Remaining",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:->14}  {:->14}  {:->14}\n",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for summary in &overview.events {
        output.push_str(&format!(
            "{:<name_width$}  {:>14}  {:>14}  {:>14}\n",
            summary.name,
            format_budget(&summary.budget, symbol),
            summary.tasks_total.format_with_symbol(symbol),
            summary.remaining.format_with_symbol(symbol),
            name_width = name_width,
        ));
    }

    output.push_str(&format!(
        "{:<name_width$}  {:>14}  {:>14}  {:>14}",
        "Total",
        overview.total_budget.format_with_symbol(symbol),
        overview.total_tasks.format_with_symbol(symbol),
        overview.remaining().format_with_symbol(symbol),
        name_width = name_width,
    ));

    if overview.invalid_entries > 0 {
        output.push_str(&format!(
            "\nSkipped {} invalid budget entr{}.",
            overview.invalid_entries,
            if overview.invalid_entries == 1 { "y" } else { "ies" }
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Budget, EventId, Money, TaskId};

    fn summary(budget: i64, tasks: i64) -> EventBudgetSummary {
        EventBudgetSummary {
            event_id: EventId::new(),
            name: "Party".into(),
            budget: Budget::Amount(Money::from_units_cents(budget, 0)),
            tasks_total: Money::from_units_cents(tasks, 0),
            remaining: Money::from_units_cents(budget - tasks, 0),
            usage_percent: Some(((tasks * 100) / budget) as u32),
            invalid_entries: 1,
        }
    }

    #[test]
    fn test_format_budget_summary_within() {
        let output = format_budget_summary(&summary(100, 35), "₹");
        assert!(output.contains("Event budget: ₹100.00"));
        assert!(output.contains("Task budget used: ₹35.00"));
        assert!(output.contains("Remaining: ₹65.00. Within budget."));
        assert!(output.contains("Usage: 35%"));
        assert!(output.contains("Skipped 1 invalid task budget(s)."));
    }

    #[test]
    fn test_format_budget_summary_over() {
        let output = format_budget_summary(&summary(10, 25), "$");
        assert!(output.contains("Over budget by $15.00."));
    }

    #[test]
    fn test_format_task_budgets() {
        let lines = vec![TaskBudgetLine {
            task_id: TaskId::new(),
            description: "Cake".into(),
            budget: Budget::Invalid("bad".into()),
        }];
        assert_eq!(
            format_task_budgets("Party", &lines, "₹"),
            "Task budgets for Party\n- Cake: invalid (bad)"
        );
        assert_eq!(format_task_budgets("Party", &[], "₹"), "Party has no tasks.");
    }

    #[test]
    fn test_format_budget_overview_totals() {
        let overview = BudgetOverview {
            events: vec![summary(100, 35)],
            total_budget: Money::from_units_cents(100, 0),
            total_tasks: Money::from_units_cents(35, 0),
            invalid_entries: 1,
        };
        let output = format_budget_overview(&overview, "₹");
        assert!(output.contains("Total"));
        assert!(output.contains("₹65.00"));
        assert!(output.ends_with("Skipped 1 invalid budget entry."));
    }
}
