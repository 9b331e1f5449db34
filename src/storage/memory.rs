//! In-memory store, used by tests and as a scratch backend

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{PlannerError, PlannerResult};
use crate::models::{Credentials, Event, VoicePreference};

use super::PlannerStore;

/// Store that keeps everything in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    events: RwLock<HashMap<String, Vec<Event>>>,
    credentials: RwLock<Credentials>,
    voices: RwLock<HashMap<String, VoicePreference>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> PlannerError {
    PlannerError::Storage(format!("Failed to acquire lock: {}", e))
}

impl PlannerStore for MemoryStore {
    fn load_user_data(&self, username: &str) -> PlannerResult<Vec<Event>> {
        let events = self.events.read().map_err(lock_error)?;
        Ok(events.get(username).cloned().unwrap_or_default())
    }

    fn save_user_data(&self, username: &str, events: &[Event]) -> PlannerResult<()> {
        let mut data = self.events.write().map_err(lock_error)?;
        data.insert(username.to_string(), events.to_vec());
        Ok(())
    }

    fn delete_user_data(&self, username: &str) -> PlannerResult<()> {
        let mut data = self.events.write().map_err(lock_error)?;
        data.remove(username);
        Ok(())
    }

    fn load_credentials(&self) -> PlannerResult<Credentials> {
        Ok(self.credentials.read().map_err(lock_error)?.clone())
    }

    fn save_credentials(&self, credentials: &Credentials) -> PlannerResult<()> {
        *self.credentials.write().map_err(lock_error)? = credentials.clone();
        Ok(())
    }

    fn load_voice_preference(&self, username: &str) -> PlannerResult<VoicePreference> {
        let voices = self.voices.read().map_err(lock_error)?;
        Ok(voices.get(username).copied().unwrap_or_default())
    }

    fn save_voice_preference(&self, username: &str, pref: &VoicePreference) -> PlannerResult<()> {
        let mut voices = self.voices.write().map_err(lock_error)?;
        voices.insert(username.to_string(), *pref);
        Ok(())
    }

    fn delete_voice_preference(&self, username: &str) -> PlannerResult<()> {
        let mut voices = self.voices.write().map_err(lock_error)?;
        voices.remove(username);
        Ok(())
    }
}
