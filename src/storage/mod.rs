//! Storage layer for Momentera
//!
//! The [`PlannerStore`] trait is the seam between the planner and its
//! persistence. [`FileStore`] keeps flat text files with atomic writes;
//! [`MemoryStore`] keeps everything in memory.

pub mod codec;
pub mod file_io;
pub mod file_store;
pub mod memory;

pub use file_store::FileStore;
pub use memory::MemoryStore;

use crate::error::PlannerResult;
use crate::models::{Credentials, Event, VoicePreference};

/// Persistence operations the planner needs
pub trait PlannerStore {
    /// Load a user's events; a user with no file has no events
    fn load_user_data(&self, username: &str) -> PlannerResult<Vec<Event>>;

    /// Replace a user's events wholesale
    fn save_user_data(&self, username: &str, events: &[Event]) -> PlannerResult<()>;

    /// Remove a user's events; removing nothing is fine
    fn delete_user_data(&self, username: &str) -> PlannerResult<()>;

    fn load_credentials(&self) -> PlannerResult<Credentials>;

    fn save_credentials(&self, credentials: &Credentials) -> PlannerResult<()>;

    /// A user's voice preference, or the default when none is stored
    fn load_voice_preference(&self, username: &str) -> PlannerResult<VoicePreference>;

    fn save_voice_preference(&self, username: &str, pref: &VoicePreference) -> PlannerResult<()>;

    fn delete_voice_preference(&self, username: &str) -> PlannerResult<()>;
}
