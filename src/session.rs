//! The logged-in user's working state
//!
//! A [`Session`] holds the user's events in memory along with a snapshot of
//! their voice preference. Services mutate it and set the dirty flag; the
//! CLI flushes it back to storage after each top-level action and on
//! logout or exit.

use log::{info, warn};

use crate::error::PlannerResult;
use crate::models::{Event, EventId, VoicePreference};
use crate::storage::PlannerStore;

/// Explicit context for one logged-in user
#[derive(Debug, Clone)]
pub struct Session {
    username: String,
    events: Vec<Event>,
    voice: VoicePreference,
    dirty: bool,
}

impl Session {
    /// Load a user's events and voice preference from storage
    pub fn open<S: PlannerStore + ?Sized>(store: &S, username: &str) -> PlannerResult<Self> {
        let events = store.load_user_data(username)?;
        let voice = store.load_voice_preference(username)?;
        info!("event=session_open status=ok events={}", events.len());
        Ok(Self::with_events(username, events, voice))
    }

    /// Build a session from data already in hand
    pub fn with_events(
        username: impl Into<String>,
        events: Vec<Event>,
        voice: VoicePreference,
    ) -> Self {
        Self {
            username: username.into(),
            events,
            voice,
            dirty: false,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// All events, active and archived, in insertion order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Mutable access to the event list; marks the session dirty
    pub fn events_mut(&mut self) -> &mut Vec<Event> {
        self.dirty = true;
        &mut self.events
    }

    pub fn event(&self, id: EventId) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Mutable access to one event; marks the session dirty when found
    pub fn event_mut(&mut self, id: EventId) -> Option<&mut Event> {
        let event = self.events.iter_mut().find(|e| e.id == id);
        if event.is_some() {
            self.dirty = true;
        }
        event
    }

    /// Find an event by id or name, preferring active events
    pub fn find_event(&self, query: &str) -> Option<&Event> {
        self.events
            .iter()
            .filter(|e| !e.archived)
            .chain(self.events.iter().filter(|e| e.archived))
            .find(|e| e.matches(query))
    }

    pub fn voice(&self) -> &VoicePreference {
        &self.voice
    }

    /// Replace the voice snapshot (persisting it is the caller's job)
    pub fn set_voice(&mut self, voice: VoicePreference) {
        self.voice = voice;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Forget unsaved changes (used once the account itself is gone)
    pub fn discard_changes(&mut self) {
        self.dirty = false;
    }

    /// Write events back if anything changed; returns whether it wrote
    pub fn flush<S: PlannerStore + ?Sized>(&mut self, store: &S) -> PlannerResult<bool> {
        if !self.dirty {
            return Ok(false);
        }
        if let Err(e) = store.save_user_data(&self.username, &self.events) {
            warn!("event=session_flush status=error reason={}", e);
            return Err(e);
        }
        self.dirty = false;
        info!("event=session_flush status=ok events={}", self.events.len());
        Ok(true)
    }
}
