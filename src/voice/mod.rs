//! Voice feedback
//!
//! Speech is an optional mirror of the text output. Business logic never
//! depends on it: the [`Narrator`] prints every line and only forwards it to
//! a [`SpeechEngine`] when the user's preference is enabled.

pub mod engine;
pub mod narrator;

pub use engine::{select_engine, CommandEngine, SilentEngine};
pub use narrator::Narrator;

use crate::error::PlannerResult;
use crate::models::VoicePreference;

/// Something that can read text aloud
pub trait SpeechEngine {
    /// Speak `text` synchronously using the given settings
    fn speak(&mut self, text: &str, pref: &VoicePreference) -> PlannerResult<()>;

    /// Names of the available voices; a preference's `voice_index` points here
    fn voices(&self) -> Vec<String>;

    /// Short name for status displays
    fn name(&self) -> String;

    /// Whether this engine never produces sound
    fn is_silent(&self) -> bool {
        false
    }
}
