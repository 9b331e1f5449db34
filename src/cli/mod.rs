//! Interactive menus
//!
//! The [`App`] drives the welcome screen and, once a user is logged in, the
//! main menu. Each area (events, tasks, budgets, search, export, settings)
//! lives in its own submodule as a function over a [`MenuContext`].
//! Service errors are reported as messages; they never end the loop.

pub mod account;
pub mod budget;
pub mod console;
pub mod event;
pub mod export;
pub mod search;
pub mod settings;
pub mod task;

use std::io::{BufRead, Write};

use chrono::{Local, NaiveDate};
use log::{info, warn};

use crate::config::paths::MomenteraPaths;
use crate::config::settings::Settings;
use crate::error::PlannerResult;
use crate::models::{EventId, TaskId, VoicePreference};
use crate::services::{ArchiveFilter, EventFilter};
use crate::session::Session;
use crate::storage::PlannerStore;

pub use console::Console;

/// Everything a menu needs while a user is logged in
pub struct MenuContext<'a, R: BufRead, W: Write> {
    pub console: &'a mut Console<R, W>,
    pub session: &'a mut Session,
    pub store: &'a dyn PlannerStore,
    pub settings: &'a Settings,
    pub paths: &'a MomenteraPaths,
    pub today: NaiveDate,
}

impl<R: BufRead, W: Write> MenuContext<'_, R, W> {
    pub fn symbol(&self) -> &str {
        &self.settings.currency_symbol
    }

    /// Print a service result: the success message, or the error
    pub fn report<T>(&mut self, result: PlannerResult<T>, success: &str) -> PlannerResult<Option<T>> {
        report(self.console, result, success)
    }
}

/// How a logged-in session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Back to the welcome screen
    Logout,
    /// Leave the program
    Exit,
}

/// The interactive application
pub struct App<R: BufRead, W: Write> {
    store: Box<dyn PlannerStore>,
    settings: Settings,
    paths: MomenteraPaths,
    console: Console<R, W>,
    today: Option<NaiveDate>,
    /// Preference chosen on the welcome screen, before anyone logged in
    guest_voice: VoicePreference,
}

impl<R: BufRead, W: Write> App<R, W> {
    pub fn new(
        store: Box<dyn PlannerStore>,
        settings: Settings,
        paths: MomenteraPaths,
        console: Console<R, W>,
    ) -> Self {
        Self {
            store,
            settings,
            paths,
            console,
            today: None,
            guest_voice: VoicePreference::default(),
        }
    }

    /// Pin "today" to a fixed date instead of the system clock
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Run until the user exits or input ends
    pub fn run(&mut self) -> PlannerResult<()> {
        self.console.blank()?;
        self.console.say("Momentera")?;
        self.console.say("Your event planning companion")?;
        self.console.say("Where moments become milestones.")?;
        self.check_users()?;

        loop {
            self.console.menu(
                "Welcome! Choose an option",
                &["Log In", "Create Account", "Configure Voice Settings"],
                "Exit",
            )?;
            let Some(choice) = self.console.ask("Choose an option: ")? else {
                break;
            };

            let user = match choice.as_str() {
                "1" => account::login(&mut self.console, self.store.as_ref())?,
                "2" => account::create_account(&mut self.console, self.store.as_ref())?,
                "3" => {
                    settings::configure_voice(&mut self.console, &mut self.guest_voice)?;
                    None
                }
                "0" => {
                    self.console.say("Goodbye!")?;
                    break;
                }
                _ => {
                    self.console.say("Invalid choice.")?;
                    None
                }
            };

            if let Some(user) = user {
                if self.logged_in(&user)? == SessionEnd::Exit {
                    break;
                }
            }
            if self.console.is_closed() {
                break;
            }
        }

        info!("event=app_exit status=ok");
        Ok(())
    }

    /// Consume the app, returning the output writer
    pub fn into_output(self) -> W {
        self.console.into_output()
    }

    fn check_users(&mut self) -> PlannerResult<()> {
        match self.store.load_credentials() {
            Ok(credentials) if credentials.is_empty() => self
                .console
                .say("No users found. You need to create an account first."),
            Ok(_) => Ok(()),
            Err(e) => {
                warn!("event=credentials_check status=error reason={}", e);
                self.console.say("Failed to read the user file.")
            }
        }
    }

    fn logged_in(&mut self, username: &str) -> PlannerResult<SessionEnd> {
        let mut session = match Session::open(self.store.as_ref(), username) {
            Ok(session) => session,
            Err(e) => {
                self.console.say(&format!("Could not load your data: {}", e))?;
                return Ok(SessionEnd::Logout);
            }
        };
        self.console.narrator_mut().set_voice(*session.voice());

        let today = self.today();
        let end = {
            let mut ctx = MenuContext {
                console: &mut self.console,
                session: &mut session,
                store: self.store.as_ref(),
                settings: &self.settings,
                paths: &self.paths,
                today,
            };
            main_menu(&mut ctx)?
        };

        flush(&mut self.console, self.store.as_ref(), &mut session)?;
        self.console.narrator_mut().set_voice(self.guest_voice);
        Ok(end)
    }
}

fn main_menu<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<SessionEnd> {
    show_reminders(ctx)?;

    loop {
        ctx.console.menu(
            "Main Menu",
            &[
                "Manage Events",
                "Manage Tasks",
                "Manage Budgets",
                "Search & Sort",
                "Export Data",
                "Settings",
            ],
            "Exit",
        )?;
        let Some(choice) = ctx.console.ask("Choose an option: ")? else {
            return Ok(SessionEnd::Exit);
        };

        let end = match choice.as_str() {
            "1" => event::event_menu(ctx).map(|_| None),
            "2" => task::task_menu(ctx).map(|_| None),
            "3" => budget::budget_menu(ctx).map(|_| None),
            "4" => search::search_menu(ctx).map(|_| None),
            "5" => export::export_menu(ctx).map(|_| None),
            "6" => settings::settings_menu(ctx),
            "0" => {
                ctx.console.say("Exiting Momentera. Goodbye!")?;
                return Ok(SessionEnd::Exit);
            }
            _ => {
                ctx.console.say("Invalid choice.")?;
                Ok(None)
            }
        }?;

        flush(ctx.console, ctx.store, ctx.session)?;
        if let Some(end) = end {
            return Ok(end);
        }
        if ctx.console.is_closed() {
            return Ok(SessionEnd::Exit);
        }
    }
}

fn show_reminders<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    let reminders = crate::services::ScheduleService::new(ctx.session).due_reminders(ctx.today);
    if !reminders.is_empty() {
        let block = crate::display::format_due_reminders(&reminders, ctx.today);
        ctx.console.say_block(&block)?;
    }
    Ok(())
}

/// Save the session if it changed, reporting failures without aborting
pub(crate) fn flush<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    store: &dyn PlannerStore,
    session: &mut Session,
) -> PlannerResult<()> {
    if let Err(e) = session.flush(store) {
        console.say(&format!("Failed to save your data: {}", e))?;
    }
    Ok(())
}

/// Print `success` or the error message; hand back the value on success
pub(crate) fn report<R: BufRead, W: Write, T>(
    console: &mut Console<R, W>,
    result: PlannerResult<T>,
    success: &str,
) -> PlannerResult<Option<T>> {
    match result {
        Ok(value) => {
            if !success.is_empty() {
                console.say(success)?;
            }
            Ok(Some(value))
        }
        Err(e) => {
            console.say(&format!("Error: {}", e))?;
            Ok(None)
        }
    }
}

/// List events in `scope` and let the user pick one by number, name or id
pub(crate) fn pick_event<R: BufRead, W: Write>(
    ctx: &mut MenuContext<'_, R, W>,
    scope: ArchiveFilter,
) -> PlannerResult<Option<EventId>> {
    let filter = EventFilter {
        archived: scope,
        ..EventFilter::default()
    };
    let candidates: Vec<(EventId, String, NaiveDate)> = filter
        .apply(ctx.session.events())
        .into_iter()
        .map(|e| (e.id, e.name.clone(), e.date))
        .collect();

    if candidates.is_empty() {
        ctx.console.say(match scope {
            ArchiveFilter::Archived => "No archived events.",
            _ => "No events found. Please create one first.",
        })?;
        return Ok(None);
    }

    ctx.console.say("Available events:")?;
    for (i, (_, name, date)) in candidates.iter().enumerate() {
        ctx.console.say(&format!("{}. {} ({})", i + 1, name, date))?;
    }

    let Some(answer) = ctx.console.ask("Event name or number (blank to cancel): ")? else {
        return Ok(None);
    };
    if answer.is_empty() {
        return Ok(None);
    }

    let picked = match answer.parse::<usize>() {
        Ok(n) if (1..=candidates.len()).contains(&n) => Some(candidates[n - 1].0),
        _ => candidates
            .iter()
            .find(|(id, name, _)| name.eq_ignore_ascii_case(&answer) || id.matches(&answer))
            .map(|(id, _, _)| *id),
    };
    if picked.is_none() {
        ctx.console.say("Event not found.")?;
    }
    Ok(picked)
}

/// Let the user pick a task of an event (active or archived list)
pub(crate) fn pick_task<R: BufRead, W: Write>(
    ctx: &mut MenuContext<'_, R, W>,
    event_id: EventId,
    archived: bool,
) -> PlannerResult<Option<TaskId>> {
    let Some(event) = ctx.session.event(event_id) else {
        ctx.console.say("Event not found.")?;
        return Ok(None);
    };
    let list = if archived {
        &event.archived_tasks
    } else {
        &event.tasks
    };
    let candidates: Vec<(TaskId, String)> =
        list.iter().map(|t| (t.id, t.description.clone())).collect();

    if candidates.is_empty() {
        ctx.console.say(if archived {
            "No archived tasks."
        } else {
            "No tasks found."
        })?;
        return Ok(None);
    }

    for (i, (_, description)) in candidates.iter().enumerate() {
        ctx.console.say(&format!("{}. {}", i + 1, description))?;
    }
    let Some(answer) = ctx.console.ask("Task number or description (blank to cancel): ")? else {
        return Ok(None);
    };
    if answer.is_empty() {
        return Ok(None);
    }

    let picked = match answer.parse::<usize>() {
        Ok(n) if (1..=candidates.len()).contains(&n) => Some(candidates[n - 1].0),
        _ => candidates
            .iter()
            .find(|(id, description)| {
                description.eq_ignore_ascii_case(&answer) || id.matches(&answer)
            })
            .map(|(id, _)| *id),
    };
    if picked.is_none() {
        ctx.console.say("Task not found.")?;
    }
    Ok(picked)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Event;
    use crate::storage::MemoryStore;
    use crate::voice::{Narrator, SilentEngine};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn app(input: &str, store: MemoryStore) -> (TempDir, App<Cursor<Vec<u8>>, Vec<u8>>) {
        let temp_dir = TempDir::new().unwrap();
        let paths = MomenteraPaths::with_base_dir(temp_dir.path().to_path_buf());
        let console = Console::new(
            Cursor::new(input.as_bytes().to_vec()),
            Narrator::new(Vec::new(), Box::new(SilentEngine)),
        );
        let app = App::new(Box::new(store), Settings::default(), paths, console)
            .with_today(NaiveDate::from_ymd_opt(2024, 8, 1).unwrap());
        (temp_dir, app)
    }

    #[test]
    fn test_invalid_choice_then_eof_exits() {
        let (_dir, mut app) = app("9\n", MemoryStore::new());
        app.run().unwrap();
        let out = String::from_utf8(app.into_output()).unwrap();
        assert!(out.contains("No users found."));
        assert!(out.contains("Invalid choice."));
    }

    #[test]
    fn test_create_account_and_exit() {
        let (_dir, mut app) = app("2\nalice\npw\n0\n", MemoryStore::new());
        app.run().unwrap();
        let out = String::from_utf8(app.into_output()).unwrap();
        assert!(out.contains("Account created and logged in as alice."));
        assert!(out.contains("Exiting Momentera. Goodbye!"));
    }

    #[test]
    fn test_pick_event_by_number_and_name() {
        let date = NaiveDate::from_ymd_opt(2024, 8, 15).unwrap();
        let first = Event::new("Picnic", date);
        let second = Event::new("Concert", date);
        let second_id = second.id;
        let mut session =
            Session::with_events("alice", vec![first, second], VoicePreference::default());

        let mut picked = Vec::new();
        test_support::run_menu(&mut session, "2\nconcert\nnope\n", |ctx| {
            picked.push(pick_event(ctx, ArchiveFilter::Active)?);
            picked.push(pick_event(ctx, ArchiveFilter::Active)?);
            picked.push(pick_event(ctx, ArchiveFilter::Active)?);
            Ok(())
        });
        assert_eq!(picked, vec![Some(second_id), Some(second_id), None]);
    }
}
