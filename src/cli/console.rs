//! Prompt helpers over a line reader and the narrator
//!
//! Every prompt goes through the [`Narrator`], so it is printed and (when
//! enabled) spoken. End of input is sticky: once the reader is exhausted
//! every later prompt returns `None` and the menus unwind to exit.

use std::io::{BufRead, Write};

use chrono::{NaiveDate, NaiveTime};
use log::debug;

use crate::error::{PlannerError, PlannerResult};
use crate::voice::Narrator;

/// Interactive console: input lines plus narrated output
pub struct Console<R: BufRead, W: Write> {
    input: R,
    narrator: Narrator<W>,
    hide_passwords: bool,
    closed: bool,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, narrator: Narrator<W>) -> Self {
        Self {
            input,
            narrator,
            hide_passwords: false,
            closed: false,
        }
    }

    /// Read passwords without echo (only meaningful on a real terminal)
    pub fn hide_passwords(mut self, hide: bool) -> Self {
        self.hide_passwords = hide;
        self
    }

    pub fn narrator(&self) -> &Narrator<W> {
        &self.narrator
    }

    pub fn narrator_mut(&mut self) -> &mut Narrator<W> {
        &mut self.narrator
    }

    /// Whether input has run out
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn say(&mut self, text: &str) -> PlannerResult<()> {
        self.narrator.say(text)
    }

    pub fn say_block(&mut self, block: &str) -> PlannerResult<()> {
        self.narrator.say_block(block)
    }

    pub fn blank(&mut self) -> PlannerResult<()> {
        self.narrator.blank()
    }

    /// Print a menu: title, numbered options, then "0. <back>"
    pub fn menu(&mut self, title: &str, options: &[&str], back: &str) -> PlannerResult<()> {
        self.blank()?;
        self.say(&format!("=== {} ===", title))?;
        for (i, option) in options.iter().enumerate() {
            self.say(&format!("{}. {}", i + 1, option))?;
        }
        self.say(&format!("0. {}", back))
    }

    /// Ask for a line; `None` once input is exhausted
    pub fn ask(&mut self, prompt: &str) -> PlannerResult<Option<String>> {
        if self.closed {
            return Ok(None);
        }
        self.narrator.prompt(prompt)?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line)?;
        if read == 0 {
            debug!("event=input_closed status=ok");
            self.closed = true;
            self.narrator.blank()?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Ask for a password, hiding it on a terminal
    pub fn ask_password(&mut self, prompt: &str) -> PlannerResult<Option<String>> {
        if !self.hide_passwords {
            return self.ask(prompt);
        }
        if self.closed {
            return Ok(None);
        }
        self.narrator.prompt(prompt)?;
        match rpassword::read_password() {
            Ok(password) => Ok(Some(password.trim().to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                self.closed = true;
                Ok(None)
            }
            Err(e) => Err(PlannerError::Io(format!("Failed to read password: {}", e))),
        }
    }

    /// Yes/no question; anything but y/yes is no
    pub fn confirm(&mut self, prompt: &str) -> PlannerResult<bool> {
        Ok(self
            .ask(&format!("{} (y/n): ", prompt))?
            .map(|answer| matches!(answer.to_lowercase().as_str(), "y" | "yes"))
            .unwrap_or(false))
    }

    /// Ask until `parse` accepts the answer; blank or end of input gives `None`
    pub fn ask_parsed<T, F>(&mut self, prompt: &str, mut parse: F) -> PlannerResult<Option<T>>
    where
        F: FnMut(&str) -> Result<T, String>,
    {
        loop {
            let Some(answer) = self.ask(prompt)? else {
                return Ok(None);
            };
            if answer.is_empty() {
                return Ok(None);
            }
            match parse(&answer) {
                Ok(value) => return Ok(Some(value)),
                Err(message) => self.say(&message)?,
            }
        }
    }

    pub fn ask_date(&mut self, prompt: &str) -> PlannerResult<Option<NaiveDate>> {
        self.ask_parsed(prompt, parse_date)
    }

    pub fn ask_time(&mut self, prompt: &str) -> PlannerResult<Option<NaiveTime>> {
        self.ask_parsed(prompt, parse_time)
    }

    /// Consume the console, returning the output writer
    pub fn into_output(self) -> W {
        self.narrator.into_inner()
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(input: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| "Invalid date. Use YYYY-MM-DD.".to_string())
}

/// Parse an `HH:MM` time
pub fn parse_time(input: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(input.trim(), "%H:%M")
        .map_err(|_| "Invalid time. Use HH:MM (24-hour).".to_string())
}
