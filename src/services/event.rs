//! Event service
//!
//! Create, edit, archive and delete events in a [`Session`]. Event names are
//! unique among a user's active events, compared case-insensitively.

use chrono::{NaiveDate, NaiveTime};
use log::info;

use crate::error::{PlannerError, PlannerResult};
use crate::models::event::{validate_name, MAX_REMINDER_DAYS};
use crate::models::{Budget, Event, EventId, Priority, RecurrenceRule};
use crate::session::Session;

/// Fields for a new event
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub name: String,
    pub date: NaiveDate,
    pub notes: String,
    pub category: String,
    pub priority: Priority,
    pub budget: Budget,
    pub tags: Vec<String>,
}

impl NewEvent {
    pub fn new(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            date,
            notes: String::new(),
            category: String::new(),
            priority: Priority::default(),
            budget: Budget::Unset,
            tags: Vec::new(),
        }
    }
}

/// Service for event management
pub struct EventService<'a> {
    session: &'a mut Session,
}

impl<'a> EventService<'a> {
    /// Create a new event service
    pub fn new(session: &'a mut Session) -> Self {
        Self { session }
    }

    /// Create an event and return its id
    pub fn create(&mut self, new: NewEvent) -> PlannerResult<EventId> {
        validate_name(&new.name)?;
        self.ensure_name_free(&new.name, None)?;

        let mut event = Event::new(new.name, new.date);
        event.notes = new.notes.trim().to_string();
        event.category = new.category.trim().to_string();
        event.priority = new.priority;
        event.budget = new.budget;
        event.set_tags(new.tags);
        event.validate()?;

        let id = event.id;
        self.session.events_mut().push(event);
        info!("event=event_create status=ok id={}", id);
        Ok(id)
    }

    /// Get an event by id
    pub fn get(&self, id: EventId) -> PlannerResult<&Event> {
        self.session
            .event(id)
            .ok_or_else(|| PlannerError::event_not_found(id.to_string()))
    }

    /// Find an event by name or id
    pub fn find(&self, query: &str) -> PlannerResult<&Event> {
        self.session
            .find_event(query)
            .ok_or_else(|| PlannerError::event_not_found(query.trim()))
    }

    pub fn rename(&mut self, id: EventId, name: &str) -> PlannerResult<()> {
        validate_name(name)?;
        if !self.get(id)?.archived {
            self.ensure_name_free(name, Some(id))?;
        }
        self.update(id, |e| e.name = name.trim().to_string())
    }

    /// Move the event to `date`; returns true when its reminder was dropped
    ///
    /// The date cannot move past the end of the event's recurrence. A
    /// reminder that no longer fits between `today` and the new date is
    /// cleared.
    pub fn set_date(
        &mut self,
        id: EventId,
        date: NaiveDate,
        today: NaiveDate,
    ) -> PlannerResult<bool> {
        let event = self.get(id)?;
        if let Some(until) = event.recurrence.as_ref().and_then(|r| r.until) {
            if until < date {
                return Err(PlannerError::Validation(
                    "Event date is after the recurrence end date".into(),
                ));
            }
        }

        let days_until = (date - today).num_days();
        let stale_reminder = event
            .reminder_days
            .is_some_and(|days| days_until <= 0 || i64::from(days) > days_until);

        self.update(id, |e| {
            e.date = date;
            if stale_reminder {
                e.reminder_days = None;
            }
            stale_reminder
        })
    }

    pub fn set_notes(&mut self, id: EventId, notes: &str) -> PlannerResult<()> {
        self.update(id, |e| e.notes = notes.trim().to_string())
    }

    pub fn set_category(&mut self, id: EventId, category: &str) -> PlannerResult<()> {
        self.update(id, |e| e.category = category.trim().to_string())
    }

    pub fn set_priority(&mut self, id: EventId, priority: Priority) -> PlannerResult<()> {
        self.update(id, |e| e.priority = priority)
    }

    pub fn set_budget(&mut self, id: EventId, budget: Budget) -> PlannerResult<()> {
        self.update(id, |e| e.budget = budget)
    }

    /// Set start and end time; the end must come after the start
    pub fn set_times(&mut self, id: EventId, start: NaiveTime, end: NaiveTime) -> PlannerResult<()> {
        if end <= start {
            return Err(PlannerError::Validation(
                "End time must be after start time".into(),
            ));
        }
        self.update(id, |e| {
            e.start_time = Some(start);
            e.end_time = Some(end);
        })
    }

    pub fn clear_times(&mut self, id: EventId) -> PlannerResult<()> {
        self.update(id, |e| {
            e.start_time = None;
            e.end_time = None;
        })
    }

    /// Set a reminder `days` before the event
    ///
    /// Only future events accept a reminder, and the lead time cannot reach
    /// back past `today` or beyond [`MAX_REMINDER_DAYS`].
    pub fn set_reminder(&mut self, id: EventId, days: u16, today: NaiveDate) -> PlannerResult<()> {
        let days_until = self.get(id)?.days_until(today);
        if days_until <= 0 {
            return Err(PlannerError::Validation(
                "Reminders can only be set for future events".into(),
            ));
        }

        let max = days_until.min(i64::from(MAX_REMINDER_DAYS));
        if i64::from(days) > max {
            return Err(PlannerError::Validation(format!(
                "Reminder must be between 0 and {} days before the event",
                max
            )));
        }
        self.update(id, |e| e.reminder_days = Some(days))
    }

    pub fn clear_reminder(&mut self, id: EventId) -> PlannerResult<()> {
        self.update(id, |e| e.reminder_days = None)
    }

    pub fn set_recurrence(
        &mut self,
        id: EventId,
        rule: Option<RecurrenceRule>,
    ) -> PlannerResult<()> {
        if let Some(until) = rule.as_ref().and_then(|r| r.until) {
            if until < self.get(id)?.date {
                return Err(PlannerError::Validation(
                    "Recurrence end date is before the event date".into(),
                ));
            }
        }
        self.update(id, |e| e.recurrence = rule)
    }

    /// Flip the pinned flag; returns the new value
    pub fn toggle_pin(&mut self, id: EventId) -> PlannerResult<bool> {
        self.update(id, |e| {
            e.pinned = !e.pinned;
            e.pinned
        })
    }

    /// Flip the starred flag; returns the new value
    pub fn toggle_star(&mut self, id: EventId) -> PlannerResult<bool> {
        self.update(id, |e| {
            e.starred = !e.starred;
            e.starred
        })
    }

    pub fn add_tag(&mut self, id: EventId, tag: &str) -> PlannerResult<bool> {
        self.update(id, |e| e.add_tag(tag))
    }

    pub fn remove_tag(&mut self, id: EventId, tag: &str) -> PlannerResult<bool> {
        self.update(id, |e| e.remove_tag(tag))
    }

    pub fn set_tags(&mut self, id: EventId, tags: &[String]) -> PlannerResult<()> {
        self.update(id, |e| e.set_tags(tags))
    }

    /// Move an event out of the default views
    pub fn archive(&mut self, id: EventId) -> PlannerResult<()> {
        if self.get(id)?.archived {
            return Err(PlannerError::Validation("Event is already archived".into()));
        }
        self.update(id, |e| e.archived = true)?;
        info!("event=event_archive status=ok id={}", id);
        Ok(())
    }

    /// Restore an archived event; fails if an active event now has its name
    pub fn unarchive(&mut self, id: EventId) -> PlannerResult<()> {
        let event = self.get(id)?;
        if !event.archived {
            return Err(PlannerError::Validation("Event is not archived".into()));
        }
        let name = event.name.clone();
        self.ensure_name_free(&name, Some(id))?;
        self.update(id, |e| e.archived = false)?;
        info!("event=event_restore status=ok id={}", id);
        Ok(())
    }

    /// Delete an event and its tasks, returning what was removed
    pub fn delete(&mut self, id: EventId) -> PlannerResult<Event> {
        let index = self
            .session
            .events()
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| PlannerError::event_not_found(id.to_string()))?;
        let event = self.session.events_mut().remove(index);
        info!(
            "event=event_delete status=ok id={} tasks={}",
            id,
            event.tasks.len() + event.archived_tasks.len()
        );
        Ok(event)
    }

    fn update<T, F>(&mut self, id: EventId, f: F) -> PlannerResult<T>
    where
        F: FnOnce(&mut Event) -> T,
    {
        let event = self
            .session
            .event_mut(id)
            .ok_or_else(|| PlannerError::event_not_found(id.to_string()))?;
        Ok(f(event))
    }

    fn ensure_name_free(&self, name: &str, except: Option<EventId>) -> PlannerResult<()> {
        let taken = self
            .session
            .events()
            .iter()
            .any(|e| !e.archived && Some(e.id) != except && e.has_name(name));
        if taken {
            return Err(PlannerError::duplicate_event(name.trim()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Frequency, VoicePreference};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn session() -> Session {
        Session::with_events("alice", Vec::new(), VoicePreference::default())
    }

    #[test]
    fn test_create_event() {
        let mut session = session();
        let mut service = EventService::new(&mut session);

        let mut new = NewEvent::new("Birthday Party", date(2024, 8, 15));
        new.tags = vec!["Family".into(), "family".into()];
        let id = service.create(new).unwrap();

        let event = service.get(id).unwrap();
        assert_eq!(event.name, "Birthday Party");
        assert_eq!(event.tags, vec!["family"]);
        assert!(session.is_dirty());
    }

    #[test]
    fn test_duplicate_name_rejected_case_insensitively() {
        let mut session = session();
        let mut service = EventService::new(&mut session);
        service.create(NewEvent::new("Party", date(2024, 8, 15))).unwrap();

        let err = service
            .create(NewEvent::new("PARTY", date(2024, 9, 1)))
            .unwrap_err();
        assert!(matches!(err, PlannerError::Duplicate { .. }));
        assert!(service.create(NewEvent::new(" ", date(2024, 9, 1))).is_err());
    }

    #[test]
    fn test_rename_checks_duplicates_but_allows_self() {
        let mut session = session();
        let mut service = EventService::new(&mut session);
        let a = service.create(NewEvent::new("A", date(2024, 8, 15))).unwrap();
        service.create(NewEvent::new("B", date(2024, 8, 16))).unwrap();

        assert!(service.rename(a, "b").is_err());
        service.rename(a, "a").unwrap();
        assert_eq!(service.get(a).unwrap().name, "a");
    }

    #[test]
    fn test_find_by_name_or_id() {
        let mut session = session();
        let mut service = EventService::new(&mut session);
        let id = service.create(NewEvent::new("Picnic", date(2024, 8, 15))).unwrap();

        assert_eq!(service.find("picnic").unwrap().id, id);
        assert_eq!(service.find(&id.short()).unwrap().id, id);
        assert!(service.find("nothing").unwrap_err().is_not_found());
    }

    #[test]
    fn test_set_times_validates_order() {
        let mut session = session();
        let mut service = EventService::new(&mut session);
        let id = service.create(NewEvent::new("Meeting", date(2024, 8, 15))).unwrap();

        assert!(service.set_times(id, time(10, 0), time(9, 0)).is_err());
        service.set_times(id, time(9, 0), time(10, 0)).unwrap();
        assert!(service.get(id).unwrap().duration().is_some());
        service.clear_times(id).unwrap();
        assert!(service.get(id).unwrap().duration().is_none());
    }

    #[test]
    fn test_set_reminder_bounds() {
        let mut session = session();
        let mut service = EventService::new(&mut session);
        let id = service.create(NewEvent::new("Exam", date(2024, 8, 15))).unwrap();
        let today = date(2024, 8, 10);

        service.set_reminder(id, 5, today).unwrap();
        assert_eq!(service.get(id).unwrap().reminder_days, Some(5));
        assert!(service.set_reminder(id, 6, today).is_err());
        assert!(service.set_reminder(id, 1, date(2024, 8, 15)).is_err());
        assert!(service.set_reminder(id, 1, date(2024, 8, 20)).is_err());

        let far = service.create(NewEvent::new("Far", date(2030, 1, 1))).unwrap();
        assert!(service.set_reminder(far, 366, today).is_err());
        service.set_reminder(far, 365, today).unwrap();
    }

    #[test]
    fn test_toggles_and_tags() {
        let mut session = session();
        let mut service = EventService::new(&mut session);
        let id = service.create(NewEvent::new("Trip", date(2024, 8, 15))).unwrap();

        assert!(service.toggle_pin(id).unwrap());
        assert!(!service.toggle_pin(id).unwrap());
        assert!(service.toggle_star(id).unwrap());

        assert!(service.add_tag(id, "Travel").unwrap());
        assert!(!service.add_tag(id, "travel").unwrap());
        assert!(service.remove_tag(id, "TRAVEL").unwrap());
        service.set_tags(id, &["x".into(), "y".into()]).unwrap();
        assert_eq!(service.get(id).unwrap().tags, vec!["x", "y"]);
    }

    #[test]
    fn test_recurrence_until_must_follow_date() {
        let mut session = session();
        let mut service = EventService::new(&mut session);
        let id = service.create(NewEvent::new("Standup", date(2024, 8, 15))).unwrap();

        let rule = RecurrenceRule::new(Frequency::Daily, 1).unwrap();
        assert!(service
            .set_recurrence(id, Some(rule.clone().until(date(2024, 8, 1))))
            .is_err());
        service.set_recurrence(id, Some(rule)).unwrap();
        assert!(service.get(id).unwrap().is_recurring());
        service.set_recurrence(id, None).unwrap();
        assert!(!service.get(id).unwrap().is_recurring());
    }

    #[test]
    fn test_set_date_keeps_recurrence_and_reminder_consistent() {
        let mut session = session();
        let mut service = EventService::new(&mut session);
        let id = service.create(NewEvent::new("Exam", date(2024, 8, 20))).unwrap();
        let today = date(2024, 8, 10);
        service.set_reminder(id, 7, today).unwrap();

        assert!(!service.set_date(id, date(2024, 8, 25), today).unwrap());
        assert_eq!(service.get(id).unwrap().reminder_days, Some(7));

        assert!(service.set_date(id, date(2024, 8, 12), today).unwrap());
        let event = service.get(id).unwrap();
        assert_eq!(event.date, date(2024, 8, 12));
        assert_eq!(event.reminder_days, None);

        let rule = RecurrenceRule::new(Frequency::Weekly, 1).unwrap();
        service
            .set_recurrence(id, Some(rule.until(date(2024, 9, 30))))
            .unwrap();
        let err = service.set_date(id, date(2024, 10, 1), today).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(service.get(id).unwrap().date, date(2024, 8, 12));
        service.set_date(id, date(2024, 9, 30), today).unwrap();
    }

    #[test]
    fn test_archive_and_restore() {
        let mut session = session();
        let mut service = EventService::new(&mut session);
        let old = service.create(NewEvent::new("Party", date(2024, 8, 15))).unwrap();

        service.archive(old).unwrap();
        assert!(service.archive(old).is_err());

        let new = service.create(NewEvent::new("party", date(2025, 8, 15))).unwrap();
        let err = service.unarchive(old).unwrap_err();
        assert!(matches!(err, PlannerError::Duplicate { .. }));

        service.delete(new).unwrap();
        service.unarchive(old).unwrap();
        assert!(!service.get(old).unwrap().archived);
    }

    #[test]
    fn test_delete_removes_tasks_with_event() {
        let mut session = session();
        let mut service = EventService::new(&mut session);
        let id = service.create(NewEvent::new("Party", date(2024, 8, 15))).unwrap();

        let removed = service.delete(id).unwrap();
        assert_eq!(removed.id, id);
        assert!(service.get(id).unwrap_err().is_not_found());
        assert!(service.delete(id).unwrap_err().is_not_found());
    }
}
