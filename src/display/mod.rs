//! Display formatting for terminal output
//!
//! Turns events, tasks and budget summaries into the plain text the menus
//! print (and the narrator reads aloud).

pub mod budget;
pub mod event;
pub mod task;

pub use budget::{format_budget_overview, format_budget_summary, format_task_budgets};
pub use event::{
    format_due_reminders, format_due_tasks, format_event_details, format_event_list,
    format_upcoming,
};
pub use task::{format_task_line, format_task_list};

use chrono::Duration;

use crate::models::Budget;

/// Format a budget entry with a currency symbol
pub fn format_budget(budget: &Budget, symbol: &str) -> String {
    match budget {
        Budget::Unset => "-".to_string(),
        Budget::Amount(amount) => amount.format_with_symbol(symbol),
        Budget::Invalid(raw) => format!("invalid ({})", raw),
    }
}

/// Format a duration as "1h 30m"
pub fn format_duration(duration: Duration) -> String {
    let minutes = duration.num_minutes();
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    #[test]
    fn test_format_budget() {
        assert_eq!(format_budget(&Budget::Unset, "₹"), "-");
        assert_eq!(
            format_budget(&Budget::Amount(Money::from_cents(1050)), "₹"),
            "₹10.50"
        );
        assert_eq!(format_budget(&Budget::Invalid("bad".into()), "$"), "invalid (bad)");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::minutes(45)), "45m");
        assert_eq!(format_duration(Duration::minutes(120)), "2h");
        assert_eq!(format_duration(Duration::minutes(90)), "1h 30m");
    }
}
