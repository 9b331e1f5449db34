//! Speech engines
//!
//! [`CommandEngine`] drives a text-to-speech program found in `PATH`;
//! [`SilentEngine`] swallows everything.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use log::{debug, info};
use once_cell::unsync::OnceCell;

use crate::error::{PlannerError, PlannerResult};
use crate::models::VoicePreference;

use super::SpeechEngine;

/// Programs tried, in order, when no override is configured
pub const KNOWN_PROGRAMS: [&str; 4] = ["espeak-ng", "espeak", "say", "spd-say"];

/// Argument dialect of a speech program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    Espeak,
    Say,
    SpeechDispatcher,
    /// Unknown program: text on stdin, no arguments
    Plain,
}

impl Dialect {
    fn for_program(name: &str) -> Self {
        match name {
            "espeak-ng" | "espeak" => Self::Espeak,
            "say" => Self::Say,
            "spd-say" => Self::SpeechDispatcher,
            _ => Self::Plain,
        }
    }
}

/// Engine that runs a system speech program once per utterance
pub struct CommandEngine {
    program: PathBuf,
    dialect: Dialect,
    voices: OnceCell<Vec<String>>,
}

impl CommandEngine {
    /// Find a speech program: the override when given, otherwise the first
    /// known program in `PATH`
    pub fn detect(override_program: Option<&str>) -> PlannerResult<Self> {
        let candidates: Vec<&str> = match override_program {
            Some(program) => vec![program],
            None => KNOWN_PROGRAMS.to_vec(),
        };

        for name in &candidates {
            if let Ok(program) = which::which(name) {
                info!("event=speech_detect status=ok program={}", name);
                return Ok(Self::with_program(program));
            }
        }

        Err(PlannerError::SpeechUnavailable(format!(
            "no speech program found (tried {})",
            candidates.join(", ")
        )))
    }

    /// Use a specific program
    pub fn with_program(program: PathBuf) -> Self {
        let name = program
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            dialect: Dialect::for_program(&name),
            program,
            voices: OnceCell::new(),
        }
    }

    fn args(&self, pref: &VoicePreference) -> Vec<String> {
        let voice = self.voices().get(pref.voice_index).cloned();
        let mut args = Vec::new();
        match self.dialect {
            Dialect::Espeak => {
                args.extend(["-s".to_string(), pref.rate.to_string()]);
                args.extend(["-a".to_string(), espeak_amplitude(pref.volume).to_string()]);
                if let Some(voice) = voice {
                    args.extend(["-v".to_string(), voice]);
                }
                args.push("--stdin".to_string());
            }
            Dialect::Say => {
                args.extend(["-r".to_string(), pref.rate.to_string()]);
                if let Some(voice) = voice {
                    args.extend(["-v".to_string(), voice]);
                }
                args.extend(["-f".to_string(), "-".to_string()]);
            }
            Dialect::SpeechDispatcher => {
                args.extend(["-r".to_string(), dispatcher_rate(pref.rate).to_string()]);
                args.extend(["-i".to_string(), dispatcher_volume(pref.volume).to_string()]);
                if let Some(voice) = voice {
                    args.extend(["-y".to_string(), voice]);
                }
                args.extend(["-w".to_string(), "-e".to_string()]);
            }
            Dialect::Plain => {}
        }
        args
    }

    fn list_voices(&self) -> Vec<String> {
        let flag = match self.dialect {
            Dialect::Espeak => &["--voices"][..],
            Dialect::Say => &["-v", "?"][..],
            Dialect::SpeechDispatcher => &["-L"][..],
            Dialect::Plain => return Vec::new(),
        };

        let output = match Command::new(&self.program)
            .args(flag)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
        {
            Ok(output) if output.status.success() => output,
            _ => return Vec::new(),
        };

        let listing = String::from_utf8_lossy(&output.stdout);
        parse_voice_listing(self.dialect, &listing)
    }
}

impl SpeechEngine for CommandEngine {
    fn speak(&mut self, text: &str, pref: &VoicePreference) -> PlannerResult<()> {
        let args = self.args(pref);
        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                PlannerError::SpeechUnavailable(format!(
                    "failed to start {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(text.as_bytes()) {
                // Reap the child before giving up on it
                drop(stdin);
                let _ = child.kill();
                let _ = child.wait();
                return Err(PlannerError::SpeechUnavailable(format!(
                    "failed to send text: {}",
                    e
                )));
            }
        }

        let status = child
            .wait()
            .map_err(|e| PlannerError::SpeechUnavailable(e.to_string()))?;
        if !status.success() {
            return Err(PlannerError::SpeechUnavailable(format!(
                "{} exited with status {}",
                self.program.display(),
                status.code().unwrap_or(-1)
            )));
        }
        debug!("event=speech_utterance status=ok chars={}", text.chars().count());
        Ok(())
    }

    fn voices(&self) -> Vec<String> {
        self.voices.get_or_init(|| self.list_voices()).clone()
    }

    fn name(&self) -> String {
        self.program
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.display().to_string())
    }
}

/// Engine that never makes a sound
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentEngine;

impl SpeechEngine for SilentEngine {
    fn speak(&mut self, _text: &str, _pref: &VoicePreference) -> PlannerResult<()> {
        Ok(())
    }

    fn voices(&self) -> Vec<String> {
        Vec::new()
    }

    fn name(&self) -> String {
        "silent".to_string()
    }

    fn is_silent(&self) -> bool {
        true
    }
}

/// Pick an engine: silent when speech is switched off or nothing is installed
pub fn select_engine(disabled: bool, override_program: Option<&str>) -> Box<dyn SpeechEngine> {
    if disabled {
        info!("event=speech_detect status=disabled");
        return Box::new(SilentEngine);
    }
    match CommandEngine::detect(override_program) {
        Ok(engine) => Box::new(engine),
        Err(e) => {
            info!("event=speech_detect status=unavailable reason={}", e);
            Box::new(SilentEngine)
        }
    }
}

/// espeak amplitude runs 0..=200 with 100 as normal
fn espeak_amplitude(volume: f32) -> u32 {
    (volume.clamp(0.0, 1.0) * 100.0).round() as u32
}

/// speech-dispatcher rate runs -100..=100 with 0 as normal
fn dispatcher_rate(rate: u32) -> i64 {
    ((i64::from(rate) - 150) * 100 / 150).clamp(-100, 100)
}

/// speech-dispatcher volume runs -100..=100
fn dispatcher_volume(volume: f32) -> i64 {
    ((volume.clamp(0.0, 1.0) * 200.0).round() as i64) - 100
}

fn parse_voice_listing(dialect: Dialect, listing: &str) -> Vec<String> {
    match dialect {
        // "Pty Language Age/Gender VoiceName File Other" header, then rows
        Dialect::Espeak => listing
            .lines()
            .skip(1)
            .filter_map(|line| line.split_whitespace().nth(1))
            .map(str::to_string)
            .collect(),
        // "Alex   en_US   # Most people recognize me by my voice."
        Dialect::Say => listing
            .lines()
            .filter_map(|line| line.split_whitespace().next())
            .map(str::to_string)
            .collect(),
        // "NAME LANGUAGE VARIANT" header, then rows
        Dialect::SpeechDispatcher => listing
            .lines()
            .skip(1)
            .filter_map(|line| line.split_whitespace().next())
            .map(str::to_string)
            .collect(),
        Dialect::Plain => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_for_program() {
        assert_eq!(Dialect::for_program("espeak-ng"), Dialect::Espeak);
        assert_eq!(Dialect::for_program("say"), Dialect::Say);
        assert_eq!(Dialect::for_program("spd-say"), Dialect::SpeechDispatcher);
        assert_eq!(Dialect::for_program("festival"), Dialect::Plain);
    }

    #[test]
    fn test_missing_override_is_unavailable() {
        let err = CommandEngine::detect(Some("momentera-no-such-speaker")).err().unwrap();
        assert!(matches!(err, PlannerError::SpeechUnavailable(_)));
    }

    #[test]
    fn test_select_engine_disabled_is_silent() {
        assert!(select_engine(true, None).is_silent());
        assert!(select_engine(false, Some("momentera-no-such-speaker")).is_silent());
    }

    #[test]
    fn test_scaling() {
        assert_eq!(espeak_amplitude(1.0), 100);
        assert_eq!(espeak_amplitude(0.5), 50);
        assert_eq!(dispatcher_rate(150), 0);
        assert_eq!(dispatcher_rate(300), 100);
        assert_eq!(dispatcher_rate(100), -33);
        assert_eq!(dispatcher_volume(1.0), 100);
        assert_eq!(dispatcher_volume(0.0), -100);
    }

    #[test]
    fn test_parse_espeak_voices() {
        let listing = "Pty Language       Age/Gender VoiceName          File                 Other Languages\n 5  af              --/M      Afrikaans          gmw/af\n 5  en-us           --/M      English_(America)  gmw/en-US\n";
        assert_eq!(
            parse_voice_listing(Dialect::Espeak, listing),
            vec!["af", "en-us"]
        );
    }

    #[test]
    fn test_parse_say_voices() {
        let listing = "Alex                en_US    # Most people recognize me by my voice.\nDaniel              en_GB    # Hello, my name is Daniel.\n";
        assert_eq!(parse_voice_listing(Dialect::Say, listing), vec!["Alex", "Daniel"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_speak_through_plain_program() {
        let Ok(cat) = which::which("cat") else {
            return;
        };
        let mut engine = CommandEngine::with_program(cat);
        assert!(engine.voices().is_empty());
        engine.speak("hello", &VoicePreference::default()).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_speak_fails_when_program_ignores_input() {
        let Ok(program) = which::which("true") else {
            return;
        };
        let mut engine = CommandEngine::with_program(program);
        let text = "x".repeat(1 << 20);

        let err = engine.speak(&text, &VoicePreference::default()).unwrap_err();
        assert!(matches!(err, PlannerError::SpeechUnavailable(ref m) if m.contains("send text")));
    }

    #[test]
    fn test_espeak_args() {
        let engine = CommandEngine {
            program: PathBuf::from("/usr/bin/espeak-ng"),
            dialect: Dialect::Espeak,
            voices: OnceCell::with_value(vec!["en-us".to_string()]),
        };
        let pref = VoicePreference {
            enabled: true,
            rate: 180,
            volume: 0.8,
            voice_index: 0,
        };
        assert_eq!(
            engine.args(&pref),
            vec!["-s", "180", "-a", "80", "-v", "en-us", "--stdin"]
        );

        let out_of_range = VoicePreference {
            voice_index: 5,
            ..pref
        };
        assert!(!engine.args(&out_of_range).contains(&"-v".to_string()));
    }
}
