//! Task model
//!
//! Tasks always belong to an event. Progress is a percentage clamped to
//! 0..=100 and the task status is derived from it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::budget::Budget;
use super::ids::TaskId;
use super::priority::{Priority, TaskStatus};
use super::tags;
use crate::error::{PlannerError, PlannerResult};

/// A unit of work under an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,

    /// What needs doing
    pub description: String,

    /// Optional due date
    #[serde(default)]
    pub deadline: Option<NaiveDate>,

    #[serde(default)]
    pub priority: Priority,

    /// Completion percentage (0-100)
    #[serde(default, deserialize_with = "deserialize_progress")]
    progress: u8,

    #[serde(default)]
    pub budget: Budget,

    /// Lowercased, de-duplicated tags in insertion order
    #[serde(default)]
    pub tags: Vec<String>,

    /// When the task was created
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a new pending task
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: TaskId::new(),
            description: description.into().trim().to_string(),
            deadline: None,
            priority: Priority::default(),
            progress: 0,
            budget: Budget::Unset,
            tags: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Builder-style deadline
    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Set progress, clamping to 0..=100
    pub fn set_progress(&mut self, progress: i64) {
        self.progress = clamp_progress(progress);
    }

    pub fn status(&self) -> TaskStatus {
        TaskStatus::from_progress(self.progress)
    }

    /// Move the task to a status, adjusting progress to match
    ///
    /// In-progress keeps the current percentage when it already lies strictly
    /// between 0 and 100, and uses 50 otherwise.
    pub fn set_status(&mut self, status: TaskStatus) {
        self.progress = match status {
            TaskStatus::Pending => 0,
            TaskStatus::Completed => 100,
            TaskStatus::InProgress if self.status() == TaskStatus::InProgress => self.progress,
            TaskStatus::InProgress => 50,
        };
    }

    pub fn is_completed(&self) -> bool {
        self.status() == TaskStatus::Completed
    }

    /// Replace all tags
    pub fn set_tags<I, S>(&mut self, new_tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = tags::normalize(new_tags);
    }

    /// Whether `query` names this task, by id or case-insensitive description
    pub fn matches(&self, query: &str) -> bool {
        self.id.matches(query) || self.description.eq_ignore_ascii_case(query.trim())
    }

    /// Validate the task
    pub fn validate(&self) -> PlannerResult<()> {
        if self.description.trim().is_empty() {
            return Err(PlannerError::Validation(
                "Task description cannot be empty".into(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}%]", self.description, self.progress)
    }
}

/// Clamp any integer to a valid progress percentage
pub fn clamp_progress(value: i64) -> u8 {
    // The clamp guarantees the value fits in u8
    value.clamp(0, 100) as u8
}

fn deserialize_progress<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let raw = f64::deserialize(deserializer)?;
    if raw.is_nan() {
        return Ok(0);
    }
    Ok(clamp_progress(raw.round().clamp(-1.0, 101.0) as i64))
}
