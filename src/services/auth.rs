//! Authentication service
//!
//! Account creation, login, password reset and account deletion against the
//! shared credentials file. Passwords are stored and compared in plain text.

use log::{info, warn};

use crate::error::{PlannerError, PlannerResult};
use crate::models::user::{validate_password, validate_username};
use crate::storage::PlannerStore;

/// Service for account management
pub struct AuthService<'a, S: PlannerStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: PlannerStore + ?Sized> AuthService<'a, S> {
    /// Create a new auth service
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Register a new account
    pub fn create_account(&self, username: &str, password: &str) -> PlannerResult<()> {
        let username = username.trim();
        let password = password.trim();
        validate_username(username)?;
        validate_password(password)?;

        let mut credentials = self.store.load_credentials()?;
        if credentials.contains(username) {
            warn!("event=account_create status=duplicate");
            return Err(PlannerError::DuplicateUser(username.to_string()));
        }

        credentials.insert(username, password);
        self.store.save_credentials(&credentials)?;
        info!("event=account_create status=ok");
        Ok(())
    }

    /// Check a username/password pair
    pub fn login(&self, username: &str, password: &str) -> PlannerResult<()> {
        let credentials = self.store.load_credentials()?;
        if credentials.verify(username.trim(), password.trim()) {
            info!("event=login status=ok");
            Ok(())
        } else {
            warn!("event=login status=rejected");
            Err(PlannerError::InvalidCredentials)
        }
    }

    /// Change a password after checking the current one
    pub fn reset_password(&self, username: &str, old: &str, new: &str) -> PlannerResult<()> {
        let username = username.trim();
        let mut credentials = self.store.load_credentials()?;
        if !credentials.verify(username, old.trim()) {
            warn!("event=password_reset status=rejected");
            return Err(PlannerError::InvalidCredentials);
        }

        let new = new.trim();
        validate_password(new)?;

        credentials.insert(username, new);
        self.store.save_credentials(&credentials)?;
        info!("event=password_reset status=ok");
        Ok(())
    }

    /// Remove an account together with its events and voice settings
    pub fn delete_account(&self, username: &str) -> PlannerResult<()> {
        let username = username.trim();
        let mut credentials = self.store.load_credentials()?;
        if !credentials.remove(username) {
            return Err(PlannerError::user_not_found(username));
        }

        self.store.save_credentials(&credentials)?;
        self.store.delete_user_data(username)?;
        self.store.delete_voice_preference(username)?;
        info!("event=account_delete status=ok");
        Ok(())
    }

    /// Whether an account exists
    pub fn user_exists(&self, username: &str) -> PlannerResult<bool> {
        Ok(self.store.load_credentials()?.contains(username.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Event, VoicePreference};
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;

    #[test]
    fn test_create_then_login() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);

        auth.create_account("alice", "wonderland").unwrap();
        assert!(auth.login("alice", "wonderland").is_ok());
        assert!(matches!(
            auth.login("alice", "Wonderland"),
            Err(PlannerError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("nobody", "wonderland"),
            Err(PlannerError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_inputs_are_trimmed() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);

        auth.create_account("  alice ", " pw ").unwrap();
        assert!(auth.user_exists("alice").unwrap());
        assert!(auth.login("alice", "pw").is_ok());
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);

        auth.create_account("alice", "one").unwrap();
        let err = auth.create_account("alice", "two").unwrap_err();
        assert!(matches!(err, PlannerError::DuplicateUser(ref u) if u == "alice"));
        assert!(auth.login("alice", "one").is_ok());
    }

    #[test]
    fn test_invalid_input_rejected() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);

        assert!(auth.create_account("", "pw").unwrap_err().is_validation());
        assert!(auth.create_account("alice", "  ").unwrap_err().is_validation());
        assert!(auth.create_account("al:ice", "pw").unwrap_err().is_validation());
        assert!(auth.create_account("alice", "p:w").unwrap_err().is_validation());
    }

    #[test]
    fn test_reset_password() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);
        auth.create_account("alice", "old").unwrap();

        assert!(matches!(
            auth.reset_password("alice", "wrong", "new"),
            Err(PlannerError::InvalidCredentials)
        ));
        assert!(auth.reset_password("alice", "old", "").unwrap_err().is_validation());

        auth.reset_password("alice", "old", "new").unwrap();
        assert!(auth.login("alice", "new").is_ok());
        assert!(auth.login("alice", "old").is_err());
    }

    #[test]
    fn test_delete_account_cascades() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);
        auth.create_account("alice", "pw").unwrap();

        let event = Event::new("Party", NaiveDate::from_ymd_opt(2024, 8, 15).unwrap());
        store.save_user_data("alice", &[event]).unwrap();
        let pref = VoicePreference {
            enabled: true,
            ..VoicePreference::default()
        };
        store.save_voice_preference("alice", &pref).unwrap();

        auth.delete_account("alice").unwrap();
        assert!(auth.login("alice", "pw").is_err());
        assert!(!auth.user_exists("alice").unwrap());
        assert!(store.load_user_data("alice").unwrap().is_empty());
        assert!(!store.load_voice_preference("alice").unwrap().enabled);

        assert!(auth.delete_account("alice").unwrap_err().is_not_found());
    }
}
