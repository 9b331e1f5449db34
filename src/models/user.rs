//! User account data: credentials and voice preference

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{PlannerError, PlannerResult};

/// Longest username accepted
pub const MAX_USERNAME_LEN: usize = 32;

/// Speech rate bounds, in words per minute
pub const MIN_RATE: u32 = 100;
pub const MAX_RATE: u32 = 300;

/// Check that a username is non-empty and safe to use as a file name
pub fn validate_username(username: &str) -> PlannerResult<()> {
    if username.is_empty() {
        return Err(PlannerError::Validation("Username cannot be empty".into()));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(PlannerError::Validation(format!(
            "Username too long (max {} characters)",
            MAX_USERNAME_LEN
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        || username.starts_with('.')
    {
        return Err(PlannerError::Validation(
            "Username may only contain letters, digits, '_', '.' and '-' and may not start with '.'"
                .into(),
        ));
    }
    Ok(())
}

/// Check that a password is non-empty and storable in the credentials file
pub fn validate_password(password: &str) -> PlannerResult<()> {
    if password.is_empty() {
        return Err(PlannerError::Validation("Password cannot be empty".into()));
    }
    if password.contains(':') || password.contains('\n') || password.contains('\r') {
        return Err(PlannerError::Validation(
            "Password cannot contain ':' or line breaks".into(),
        ));
    }
    Ok(())
}

/// All known accounts, keyed by username
///
/// Passwords are kept in plain text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    accounts: BTreeMap<String, String>,
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, username: &str) -> bool {
        self.accounts.contains_key(username)
    }

    /// Whether the stored password for `username` equals `password`
    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.accounts
            .get(username)
            .is_some_and(|stored| stored == password)
    }

    /// Insert or replace an account
    pub fn insert(&mut self, username: impl Into<String>, password: impl Into<String>) {
        self.accounts.insert(username.into(), password.into());
    }

    /// Remove an account; returns false when it did not exist
    pub fn remove(&mut self, username: &str) -> bool {
        self.accounts.remove(username).is_some()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Iterate `(username, password)` pairs in username order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.accounts.iter().map(|(u, p)| (u.as_str(), p.as_str()))
    }
}

/// Per-user speech settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoicePreference {
    pub enabled: bool,

    /// Words per minute
    pub rate: u32,

    /// 0.0 (silent) to 1.0 (full)
    pub volume: f32,

    /// Index into the engine's voice list
    pub voice_index: usize,
}

impl Default for VoicePreference {
    fn default() -> Self {
        Self {
            enabled: false,
            rate: 150,
            volume: 1.0,
            voice_index: 0,
        }
    }
}

impl VoicePreference {
    /// Set the rate, rejecting values outside the supported range
    pub fn set_rate(&mut self, rate: u32) -> PlannerResult<()> {
        if !(MIN_RATE..=MAX_RATE).contains(&rate) {
            return Err(PlannerError::Validation(format!(
                "Rate must be between {} and {}",
                MIN_RATE, MAX_RATE
            )));
        }
        self.rate = rate;
        Ok(())
    }

    /// Set the volume, rejecting values outside 0.0..=1.0
    ///
    /// Kept to hundredths, the precision the settings file stores.
    pub fn set_volume(&mut self, volume: f32) -> PlannerResult<()> {
        if !(0.0..=1.0).contains(&volume) {
            return Err(PlannerError::Validation(
                "Volume must be between 0.0 and 1.0".into(),
            ));
        }
        self.volume = (volume * 100.0).round() / 100.0;
        Ok(())
    }
}
