//! Flat-file store
//!
//! Keeps the shared credentials and voice-settings files plus one events
//! file per user under the data directory. Every save rewrites the whole
//! file atomically.

use log::{debug, info};

use crate::config::paths::MomenteraPaths;
use crate::error::PlannerResult;
use crate::models::user::validate_username;
use crate::models::{Credentials, Event, VoicePreference};

use super::codec;
use super::file_io::{read_text, remove_if_exists, write_text_atomic};
use super::PlannerStore;

/// Store backed by files under a [`MomenteraPaths`] base directory
#[derive(Debug, Clone)]
pub struct FileStore {
    paths: MomenteraPaths,
}

impl FileStore {
    /// Create a store, making sure its directories exist
    pub fn new(paths: MomenteraPaths) -> PlannerResult<Self> {
        paths.ensure_directories()?;
        Ok(Self { paths })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &MomenteraPaths {
        &self.paths
    }
}

impl PlannerStore for FileStore {
    fn load_user_data(&self, username: &str) -> PlannerResult<Vec<Event>> {
        validate_username(username)?;
        let path = self.paths.user_events_file(username);
        let events = match read_text(&path)? {
            Some(contents) => codec::decode_events(&contents),
            None => Vec::new(),
        };
        debug!("event=events_load status=ok count={}", events.len());
        Ok(events)
    }

    fn save_user_data(&self, username: &str, events: &[Event]) -> PlannerResult<()> {
        validate_username(username)?;
        let contents = codec::encode_events(events)?;
        write_text_atomic(self.paths.user_events_file(username), &contents)?;
        debug!("event=events_save status=ok count={}", events.len());
        Ok(())
    }

    fn delete_user_data(&self, username: &str) -> PlannerResult<()> {
        validate_username(username)?;
        let existed = remove_if_exists(self.paths.user_events_file(username))?;
        info!("event=events_delete status=ok existed={}", existed);
        Ok(())
    }

    fn load_credentials(&self) -> PlannerResult<Credentials> {
        Ok(match read_text(self.paths.users_file())? {
            Some(contents) => codec::decode_credentials(&contents),
            None => Credentials::new(),
        })
    }

    fn save_credentials(&self, credentials: &Credentials) -> PlannerResult<()> {
        write_text_atomic(
            self.paths.users_file(),
            &codec::encode_credentials(credentials),
        )
    }

    fn load_voice_preference(&self, username: &str) -> PlannerResult<VoicePreference> {
        Ok(read_text(self.paths.voice_settings_file())?
            .and_then(|contents| codec::find_voice(&contents, username))
            .unwrap_or_default())
    }

    fn save_voice_preference(&self, username: &str, pref: &VoicePreference) -> PlannerResult<()> {
        validate_username(username)?;
        let path = self.paths.voice_settings_file();
        let contents = read_text(&path)?.unwrap_or_default();
        write_text_atomic(&path, &codec::upsert_voice_line(&contents, username, pref))
    }

    fn delete_voice_preference(&self, username: &str) -> PlannerResult<()> {
        let path = self.paths.voice_settings_file();
        if let Some(contents) = read_text(&path)? {
            write_text_atomic(&path, &codec::remove_voice_line(&contents, username))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Budget, Task};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn store() -> (TempDir, FileStore) {
        let temp_dir = TempDir::new().unwrap();
        let paths = MomenteraPaths::with_base_dir(temp_dir.path().to_path_buf());
        (temp_dir, FileStore::new(paths).unwrap())
    }

    #[test]
    fn test_store_creation() {
        let (temp_dir, _store) = store();
        assert!(temp_dir.path().join("events").exists());
    }

    #[test]
    fn test_missing_files_load_empty() {
        let (_dir, store) = store();
        assert!(store.load_user_data("alice").unwrap().is_empty());
        assert!(store.load_credentials().unwrap().is_empty());
        assert_eq!(
            store.load_voice_preference("alice").unwrap(),
            VoicePreference::default()
        );
    }

    #[test]
    fn test_events_round_trip() {
        let (_dir, store) = store();
        let mut event = Event::new("Party", NaiveDate::from_ymd_opt(2024, 8, 15).unwrap());
        event.archived = true;
        event.budget = Budget::Invalid("bad".into());
        event.tasks.push(Task::new("Cake"));

        store.save_user_data("alice", std::slice::from_ref(&event)).unwrap();
        let loaded = store.load_user_data("alice").unwrap();
        assert_eq!(loaded, vec![event]);

        store.delete_user_data("alice").unwrap();
        assert!(store.load_user_data("alice").unwrap().is_empty());
        store.delete_user_data("alice").unwrap();
    }

    #[test]
    fn test_unsafe_username_rejected() {
        let (_dir, store) = store();
        assert!(store.load_user_data("../escape").is_err());
        assert!(store.save_user_data("a/b", &[]).is_err());
    }

    #[test]
    fn test_credentials_round_trip() {
        let (_dir, store) = store();
        let mut creds = Credentials::new();
        creds.insert("alice", "pw");
        store.save_credentials(&creds).unwrap();
        assert_eq!(store.load_credentials().unwrap(), creds);
    }

    #[test]
    fn test_voice_preferences_per_user() {
        let (_dir, store) = store();
        let mut pref = VoicePreference::default();
        pref.enabled = true;
        pref.rate = 220;

        store.save_voice_preference("alice", &pref).unwrap();
        store
            .save_voice_preference("bob", &VoicePreference::default())
            .unwrap();
        assert_eq!(store.load_voice_preference("alice").unwrap(), pref);

        store.delete_voice_preference("alice").unwrap();
        assert_eq!(
            store.load_voice_preference("alice").unwrap(),
            VoicePreference::default()
        );
        assert_eq!(
            store.load_voice_preference("bob").unwrap(),
            VoicePreference::default()
        );
    }
}
