//! Task service
//!
//! Tasks are always addressed through their owning event.

use chrono::NaiveDate;
use log::info;

use crate::error::{PlannerError, PlannerResult};
use crate::models::{Budget, Event, EventId, Priority, Task, TaskId, TaskStatus};
use crate::session::Session;

/// Fields for a new task
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub description: String,
    pub deadline: Option<NaiveDate>,
    pub priority: Priority,
    pub budget: Budget,
    pub tags: Vec<String>,
}

impl NewTask {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }
}

/// Service for the tasks of an event
pub struct TaskService<'a> {
    session: &'a mut Session,
}

impl<'a> TaskService<'a> {
    /// Create a new task service
    pub fn new(session: &'a mut Session) -> Self {
        Self { session }
    }

    /// Add a task to an event and return its id
    pub fn add(&mut self, event_id: EventId, new: NewTask) -> PlannerResult<TaskId> {
        let mut task = Task::new(new.description);
        task.deadline = new.deadline;
        task.priority = new.priority;
        task.budget = new.budget;
        task.set_tags(new.tags);
        task.validate()?;

        let id = task.id;
        self.event_mut(event_id)?.tasks.push(task);
        info!("event=task_add status=ok event={} task={}", event_id, id);
        Ok(id)
    }

    pub fn get(&self, event_id: EventId, task_id: TaskId) -> PlannerResult<&Task> {
        self.event(event_id)?
            .task(task_id)
            .ok_or_else(|| PlannerError::task_not_found(task_id.to_string()))
    }

    /// Find an active task by id or description
    pub fn find(&self, event_id: EventId, query: &str) -> PlannerResult<&Task> {
        self.event(event_id)?
            .find_task(query)
            .ok_or_else(|| PlannerError::task_not_found(query.trim()))
    }

    /// Find an archived task by id or description
    pub fn find_archived(&self, event_id: EventId, query: &str) -> PlannerResult<&Task> {
        self.event(event_id)?
            .find_archived_task(query)
            .ok_or_else(|| PlannerError::task_not_found(query.trim()))
    }

    /// Active tasks in insertion order, optionally without completed ones
    pub fn list(&self, event_id: EventId, hide_completed: bool) -> PlannerResult<Vec<&Task>> {
        Ok(self
            .event(event_id)?
            .tasks
            .iter()
            .filter(|t| !(hide_completed && t.is_completed()))
            .collect())
    }

    pub fn list_archived(&self, event_id: EventId) -> PlannerResult<Vec<&Task>> {
        Ok(self.event(event_id)?.archived_tasks.iter().collect())
    }

    pub fn set_description(
        &mut self,
        event_id: EventId,
        task_id: TaskId,
        description: &str,
    ) -> PlannerResult<()> {
        let description = description.trim();
        if description.is_empty() {
            return Err(PlannerError::Validation(
                "Task description cannot be empty".into(),
            ));
        }
        self.update(event_id, task_id, |t| t.description = description.to_string())
    }

    pub fn set_deadline(
        &mut self,
        event_id: EventId,
        task_id: TaskId,
        deadline: Option<NaiveDate>,
    ) -> PlannerResult<()> {
        self.update(event_id, task_id, |t| t.deadline = deadline)
    }

    pub fn set_priority(
        &mut self,
        event_id: EventId,
        task_id: TaskId,
        priority: Priority,
    ) -> PlannerResult<()> {
        self.update(event_id, task_id, |t| t.priority = priority)
    }

    /// Set progress (clamped to 0..=100); returns the stored value
    pub fn set_progress(
        &mut self,
        event_id: EventId,
        task_id: TaskId,
        progress: i64,
    ) -> PlannerResult<u8> {
        self.update(event_id, task_id, |t| {
            t.set_progress(progress);
            t.progress()
        })
    }

    pub fn set_status(
        &mut self,
        event_id: EventId,
        task_id: TaskId,
        status: TaskStatus,
    ) -> PlannerResult<()> {
        self.update(event_id, task_id, |t| t.set_status(status))
    }

    pub fn set_budget(
        &mut self,
        event_id: EventId,
        task_id: TaskId,
        budget: Budget,
    ) -> PlannerResult<()> {
        self.update(event_id, task_id, |t| t.budget = budget)
    }

    pub fn set_tags(
        &mut self,
        event_id: EventId,
        task_id: TaskId,
        tags: &[String],
    ) -> PlannerResult<()> {
        self.update(event_id, task_id, |t| t.set_tags(tags))
    }

    /// Remove a task for good, returning it
    pub fn delete(&mut self, event_id: EventId, task_id: TaskId) -> PlannerResult<Task> {
        let event = self.event_mut(event_id)?;
        let task = take_task(&mut event.tasks, task_id)?;
        info!("event=task_delete status=ok event={} task={}", event_id, task_id);
        Ok(task)
    }

    /// Move a task into the event's archived list
    pub fn archive(&mut self, event_id: EventId, task_id: TaskId) -> PlannerResult<()> {
        let event = self.event_mut(event_id)?;
        let task = take_task(&mut event.tasks, task_id)?;
        event.archived_tasks.push(task);
        info!("event=task_archive status=ok event={} task={}", event_id, task_id);
        Ok(())
    }

    /// Move an archived task back to the active list
    pub fn restore(&mut self, event_id: EventId, task_id: TaskId) -> PlannerResult<()> {
        let event = self.event_mut(event_id)?;
        let task = take_task(&mut event.archived_tasks, task_id)?;
        event.tasks.push(task);
        info!("event=task_restore status=ok event={} task={}", event_id, task_id);
        Ok(())
    }

    fn event(&self, event_id: EventId) -> PlannerResult<&Event> {
        self.session
            .event(event_id)
            .ok_or_else(|| PlannerError::event_not_found(event_id.to_string()))
    }

    fn event_mut(&mut self, event_id: EventId) -> PlannerResult<&mut Event> {
        self.session
            .event_mut(event_id)
            .ok_or_else(|| PlannerError::event_not_found(event_id.to_string()))
    }

    fn update<T, F>(&mut self, event_id: EventId, task_id: TaskId, f: F) -> PlannerResult<T>
    where
        F: FnOnce(&mut Task) -> T,
    {
        let task = self
            .event_mut(event_id)?
            .task_mut(task_id)
            .ok_or_else(|| PlannerError::task_not_found(task_id.to_string()))?;
        Ok(f(task))
    }
}

fn take_task(tasks: &mut Vec<Task>, task_id: TaskId) -> PlannerResult<Task> {
    let index = tasks
        .iter()
        .position(|t| t.id == task_id)
        .ok_or_else(|| PlannerError::task_not_found(task_id.to_string()))?;
    Ok(tasks.remove(index))
}

/// Whether a task deadline falls after its event's date
pub fn deadline_after_event(event: &Event, deadline: NaiveDate) -> bool {
    deadline > event.date
}
