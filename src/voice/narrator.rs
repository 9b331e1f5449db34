//! Text output with optional speech

use std::io::Write;

use log::warn;

use crate::error::PlannerResult;
use crate::logging::sanitize_message;
use crate::models::VoicePreference;

use super::SpeechEngine;

const MAX_REASON_CHARS: usize = 160;

/// Writes user-facing text and speaks it when the preference says so
///
/// If the engine fails once, the narrator says so and stays text-only for
/// the rest of the process.
pub struct Narrator<W: Write> {
    out: W,
    engine: Box<dyn SpeechEngine>,
    voice: VoicePreference,
    speech_failed: bool,
}

impl<W: Write> Narrator<W> {
    /// Create a narrator with the default (disabled) voice preference
    pub fn new(out: W, engine: Box<dyn SpeechEngine>) -> Self {
        Self {
            out,
            engine,
            voice: VoicePreference::default(),
            speech_failed: false,
        }
    }

    pub fn voice(&self) -> &VoicePreference {
        &self.voice
    }

    /// Replace the preference snapshot used for speaking
    pub fn set_voice(&mut self, voice: VoicePreference) {
        self.voice = voice;
    }

    /// Whether text will currently be spoken
    pub fn speaking(&self) -> bool {
        self.voice.enabled && !self.speech_failed && !self.engine.is_silent()
    }

    pub fn engine_name(&self) -> String {
        self.engine.name()
    }

    pub fn voices(&self) -> Vec<String> {
        self.engine.voices()
    }

    /// Print a line and speak it
    pub fn say(&mut self, text: &str) -> PlannerResult<()> {
        writeln!(self.out, "{}", text)?;
        self.out.flush()?;
        self.speak(text);
        Ok(())
    }

    /// Print text without a trailing newline (for input prompts) and speak it
    pub fn prompt(&mut self, text: &str) -> PlannerResult<()> {
        write!(self.out, "{}", text)?;
        self.out.flush()?;
        self.speak(text);
        Ok(())
    }

    /// Print a blank line
    pub fn blank(&mut self) -> PlannerResult<()> {
        writeln!(self.out)?;
        Ok(())
    }

    /// Print a multi-line block, speaking it line by line
    pub fn say_block(&mut self, block: &str) -> PlannerResult<()> {
        for line in block.lines() {
            self.say(line)?;
        }
        Ok(())
    }

    /// Get the underlying writer back
    pub fn into_inner(self) -> W {
        self.out
    }

    fn speak(&mut self, text: &str) {
        if !self.speaking() {
            return;
        }
        let spoken = spoken_form(text);
        if spoken.is_empty() {
            return;
        }
        if let Err(e) = self.engine.speak(&spoken, &self.voice) {
            warn!(
                "event=speech_failed status=degraded engine={} reason={}",
                self.engine.name(),
                sanitize_message(&e.to_string(), MAX_REASON_CHARS)
            );
            self.speech_failed = true;
            let _ = writeln!(
                self.out,
                "Voice output is unavailable ({}). Continuing with text only.",
                e
            );
        }
    }
}

/// Text as it should be read aloud: symbols and decorations dropped
fn spoken_form(text: &str) -> String {
    let kept: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || ",.:;!?'()%-/".contains(*c))
        .collect();
    kept.split_whitespace()
        .filter(|word| word.chars().any(char::is_alphanumeric))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlannerError;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct RecordingEngine {
        spoken: Rc<RefCell<Vec<String>>>,
        fail: bool,
    }

    impl SpeechEngine for RecordingEngine {
        fn speak(&mut self, text: &str, _pref: &VoicePreference) -> PlannerResult<()> {
            if self.fail {
                return Err(PlannerError::SpeechUnavailable("device busy".into()));
            }
            self.spoken.borrow_mut().push(text.to_string());
            Ok(())
        }

        fn voices(&self) -> Vec<String> {
            vec!["en".into()]
        }

        fn name(&self) -> String {
            "recording".into()
        }
    }

    fn enabled() -> VoicePreference {
        VoicePreference {
            enabled: true,
            ..VoicePreference::default()
        }
    }

    #[test]
    fn test_disabled_preference_prints_without_speaking() {
        let engine = RecordingEngine::default();
        let spoken = engine.spoken.clone();
        let mut narrator = Narrator::new(Vec::new(), Box::new(engine));

        narrator.say("Event created.").unwrap();
        assert!(spoken.borrow().is_empty());
        assert_eq!(String::from_utf8(narrator.into_inner()).unwrap(), "Event created.\n");
    }

    #[test]
    fn test_enabled_preference_prints_same_text_and_speaks() {
        let engine = RecordingEngine::default();
        let spoken = engine.spoken.clone();
        let mut narrator = Narrator::new(Vec::new(), Box::new(engine));
        narrator.set_voice(enabled());

        narrator.say("✅ Event created.").unwrap();
        narrator.prompt("Choice: ").unwrap();
        assert_eq!(*spoken.borrow(), vec!["Event created.", "Choice:"]);
        assert_eq!(
            String::from_utf8(narrator.into_inner()).unwrap(),
            "✅ Event created.\nChoice: "
        );
    }

    #[test]
    fn test_engine_failure_degrades_to_text_once() {
        let engine = RecordingEngine {
            fail: true,
            ..RecordingEngine::default()
        };
        let mut narrator = Narrator::new(Vec::new(), Box::new(engine));
        narrator.set_voice(enabled());

        narrator.say("one").unwrap();
        assert!(!narrator.speaking());
        narrator.say("two").unwrap();

        let out = String::from_utf8(narrator.into_inner()).unwrap();
        assert_eq!(out.matches("Voice output is unavailable").count(), 1);
        assert!(out.contains("one\n"));
        assert!(out.contains("two\n"));
    }

    #[test]
    fn test_spoken_form_drops_decorations() {
        assert_eq!(spoken_form("=== Main Menu ==="), "Main Menu");
        assert_eq!(spoken_form("1. Manage Events"), "1. Manage Events");
        assert_eq!(spoken_form("❌ Invalid choice."), "Invalid choice.");
    }
}
