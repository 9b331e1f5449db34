//! Line formats of the persisted files
//!
//! - credentials: `username:password`
//! - voice settings: `username:enabled,rate,volume,voice_index`
//! - events: one JSON-encoded event per line
//!
//! Decoding is best effort. A line that cannot be decoded is logged and
//! skipped; it never fails the whole file.

use log::warn;

use crate::error::{PlannerError, PlannerResult};
use crate::logging::sanitize_message;
use crate::models::{Credentials, Event, VoicePreference};

const MAX_REASON_CHARS: usize = 120;

/// Non-blank lines with their 1-based line numbers
fn numbered_lines(contents: &str) -> impl Iterator<Item = (usize, &str)> {
    contents
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty())
}

fn parse_error(line: usize, reason: impl Into<String>) -> PlannerError {
    PlannerError::Parse {
        line,
        reason: reason.into(),
    }
}

fn log_skipped(file: &str, err: &PlannerError) {
    warn!(
        "event=line_skipped status=warn file={} reason={}",
        file,
        sanitize_message(&err.to_string(), MAX_REASON_CHARS)
    );
}

/// Decode one credentials line
pub fn decode_credential(line_no: usize, line: &str) -> PlannerResult<(String, String)> {
    let (username, password) = line
        .split_once(':')
        .ok_or_else(|| parse_error(line_no, "missing ':' separator"))?;
    if password.contains(':') {
        return Err(parse_error(line_no, "more than one ':' separator"));
    }
    if username.is_empty() {
        return Err(parse_error(line_no, "empty username"));
    }
    Ok((username.to_string(), password.to_string()))
}

/// Decode a whole credentials file
pub fn decode_credentials(contents: &str) -> Credentials {
    let mut credentials = Credentials::new();
    for (line_no, line) in numbered_lines(contents) {
        match decode_credential(line_no, line) {
            Ok((username, password)) => credentials.insert(username, password),
            Err(e) => log_skipped("users", &e),
        }
    }
    credentials
}

/// Encode all credentials, one account per line
pub fn encode_credentials(credentials: &Credentials) -> String {
    credentials
        .iter()
        .map(|(username, password)| format!("{}:{}\n", username, password))
        .collect()
}

/// Username a raw voice-settings line belongs to, if it has one
pub fn voice_line_owner(line: &str) -> Option<&str> {
    line.split_once(':').map(|(username, _)| username)
}

/// Decode one voice-settings line
pub fn decode_voice(line_no: usize, line: &str) -> PlannerResult<(String, VoicePreference)> {
    let (username, fields) = line
        .split_once(':')
        .ok_or_else(|| parse_error(line_no, "missing ':' separator"))?;
    if username.is_empty() {
        return Err(parse_error(line_no, "empty username"));
    }

    let parts: Vec<&str> = fields.split(',').map(str::trim).collect();
    let [enabled, rate, volume, voice_index] = parts.as_slice() else {
        return Err(parse_error(
            line_no,
            format!("expected 4 fields, found {}", parts.len()),
        ));
    };

    let enabled = match enabled.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" => false,
        other => return Err(parse_error(line_no, format!("bad enabled flag '{}'", other))),
    };
    let rate: u32 = rate
        .parse()
        .map_err(|_| parse_error(line_no, format!("bad rate '{}'", rate)))?;
    let volume: f32 = volume
        .parse()
        .map_err(|_| parse_error(line_no, format!("bad volume '{}'", volume)))?;
    if !volume.is_finite() {
        return Err(parse_error(line_no, "volume is not a number"));
    }
    let voice_index: usize = voice_index
        .parse()
        .map_err(|_| parse_error(line_no, format!("bad voice index '{}'", voice_index)))?;

    Ok((
        username.to_string(),
        VoicePreference {
            enabled,
            rate,
            volume: volume.clamp(0.0, 1.0),
            voice_index,
        },
    ))
}

/// Find a user's preference in a voice-settings file
pub fn find_voice(contents: &str, username: &str) -> Option<VoicePreference> {
    numbered_lines(contents)
        .filter(|(_, line)| voice_line_owner(line) == Some(username))
        .find_map(|(line_no, line)| match decode_voice(line_no, line) {
            Ok((_, pref)) => Some(pref),
            Err(e) => {
                log_skipped("voice_settings", &e);
                None
            }
        })
}

/// Encode one voice-settings line (without the trailing newline)
pub fn encode_voice(username: &str, pref: &VoicePreference) -> String {
    format!(
        "{}:{},{},{:.2},{}",
        username, pref.enabled, pref.rate, pref.volume, pref.voice_index
    )
}

/// Replace (or append) a user's line, keeping everyone else's lines verbatim
pub fn upsert_voice_line(contents: &str, username: &str, pref: &VoicePreference) -> String {
    let replacement = encode_voice(username, pref);
    let mut found = false;
    let mut out = String::new();

    for line in contents.lines().map(|l| l.trim_end_matches('\r')) {
        if line.trim().is_empty() {
            continue;
        }
        if voice_line_owner(line) == Some(username) {
            if !found {
                out.push_str(&replacement);
                out.push('\n');
                found = true;
            }
            continue;
        }
        out.push_str(line);
        out.push('\n');
    }

    if !found {
        out.push_str(&replacement);
        out.push('\n');
    }
    out
}

/// Drop a user's line, keeping everyone else's lines verbatim
pub fn remove_voice_line(contents: &str, username: &str) -> String {
    contents
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty() && voice_line_owner(line) != Some(username))
        .map(|line| format!("{}\n", line))
        .collect()
}

/// Decode one event line
pub fn decode_event(line_no: usize, line: &str) -> PlannerResult<Event> {
    serde_json::from_str(line).map_err(|e| parse_error(line_no, e.to_string()))
}

/// Decode a whole events file, skipping lines that fail to decode
pub fn decode_events(contents: &str) -> Vec<Event> {
    numbered_lines(contents)
        .filter_map(|(line_no, line)| match decode_event(line_no, line) {
            Ok(event) => Some(event),
            Err(e) => {
                log_skipped("events", &e);
                None
            }
        })
        .collect()
}

/// Encode events, one JSON object per line
pub fn encode_events(events: &[Event]) -> PlannerResult<String> {
    let mut out = String::new();
    for event in events {
        out.push_str(&serde_json::to_string(event)?);
        out.push('\n');
    }
    Ok(out)
}
