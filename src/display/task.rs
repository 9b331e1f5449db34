//! Task display formatting

use crate::models::Task;

use super::format_budget;

/// One-line summary of a task
pub fn format_task_line(index: usize, task: &Task, symbol: &str) -> String {
    let mut line = format!("{}. {}", index, task.description);
    if let Some(deadline) = task.deadline {
        line.push_str(&format!(" | Deadline: {}", deadline.format("%Y-%m-%d")));
    }
    line.push_str(&format!(
        " | Priority: {} | Progress: {}% ({})",
        task.priority,
        task.progress(),
        task.status()
    ));
    if !task.budget.is_unset() {
        line.push_str(&format!(" | Budget: {}", format_budget(&task.budget, symbol)));
    }
    if !task.tags.is_empty() {
        line.push_str(&format!(" | Tags: {}", task.tags.join(", ")));
    }
    line
}

/// Numbered task list, or a note when there is nothing to show
pub fn format_task_list(tasks: &[&Task], symbol: &str) -> String {
    if tasks.is_empty() {
        return "No tasks found.".to_string();
    }
    tasks
        .iter()
        .enumerate()
        .map(|(i, task)| format_task_line(i + 1, task, symbol))
        .collect::<Vec<_>>()
        .join("\n")
}
