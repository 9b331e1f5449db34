//! Settings menu: voice, help tour, demo data, about, account

use std::io::{BufRead, Write};

use chrono::{NaiveDate, NaiveTime};
use log::{info, warn};

use crate::error::{PlannerError, PlannerResult};
use crate::logging::logging_status;
use crate::models::{Budget, Money, Priority, TaskStatus, VoicePreference};
use crate::services::{EventService, NewEvent, NewTask, TaskService};

use super::{account, Console, MenuContext, SessionEnd};

/// Name of the sample event created by "Load Demo Data"
pub const DEMO_EVENT: &str = "Birthday Party";

const TOUR: [&str; 14] = [
    "Welcome to Momentera!",
    "Here's a quick tour:",
    "- Manage Events: create events with a name, date and notes, then view, edit or delete them.",
    "- Set a priority and a category, pin or star events, and tag them.",
    "- Give an event start and end times, a reminder, or a weekly/monthly/yearly repeat.",
    "- Manage Tasks: add tasks to an event, track their progress, archive and restore them.",
    "- Manage Budgets: set a budget per event and per task and compare the two.",
    "- Search & Sort: find events by keyword, category, tag or date, and sort events or tasks.",
    "- Export Data: write your events as a text report, CSV, JSON or YAML.",
    "- Archive old events to keep your lists clean.",
    "- Countdown shows how many days remain until an event.",
    "- Upcoming and due-soon views list what needs attention this week.",
    "- Voice settings read every line aloud when a speech program is installed.",
    "Tip: load the demo data to see how it all fits together!",
];

pub fn settings_menu<R: BufRead, W: Write>(
    ctx: &mut MenuContext<'_, R, W>,
) -> PlannerResult<Option<SessionEnd>> {
    loop {
        ctx.console.menu(
            "Settings",
            &[
                "Configure Voice Settings",
                "Help & Tour",
                "Load Demo Data",
                "About Momentera",
                "Account Settings",
            ],
            "Back to Main Menu",
        )?;
        let Some(choice) = ctx.console.ask("Choose an option: ")? else {
            return Ok(None);
        };

        match choice.as_str() {
            "1" => user_voice(ctx)?,
            "2" => help_and_tour(ctx)?,
            "3" => load_demo_data(ctx)?,
            "4" => about(ctx.console)?,
            "5" => {
                if let Some(end) = account::account_menu(ctx)? {
                    return Ok(Some(end));
                }
            }
            "0" => return Ok(None),
            _ => ctx.console.say("Invalid choice.")?,
        }
        if ctx.console.is_closed() {
            return Ok(None);
        }
    }
}

/// Walk through the voice settings on a copy of `pref`
///
/// The narrator speaks with the edited settings while the user tries them
/// out. On confirmation `pref` is overwritten and `true` is returned;
/// otherwise the narrator goes back to the old settings.
pub fn configure_voice<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    pref: &mut VoicePreference,
) -> PlannerResult<bool> {
    let original = *pref;
    let mut edited = *pref;

    console.blank()?;
    console.say("=== Voice Settings ===")?;
    let engine = console.narrator().engine_name();
    console.say(&format!(
        "Voice currently: {} (speech engine: {})",
        if pref.enabled { "enabled" } else { "disabled" },
        engine
    ))?;

    let Some(toggle) = console.ask("Turn voice ON or OFF? (on/off, blank to cancel): ")? else {
        return Ok(false);
    };
    match toggle.to_lowercase().as_str() {
        "" | "cancel" => {
            console.say("Cancelled voice settings.")?;
            return Ok(false);
        }
        "on" => edited.enabled = true,
        "off" => edited.enabled = false,
        _ => {
            console.say("Invalid choice. Voice settings unchanged.")?;
            return Ok(false);
        }
    }
    console.narrator_mut().set_voice(edited);

    if edited.enabled {
        if engine == "silent" {
            console.say("No speech program was found; text will be shown but not spoken.")?;
        }
        ask_rate(console, &mut edited)?;
        ask_volume(console, &mut edited)?;
        ask_voice(console, &mut edited)?;
        console.narrator_mut().set_voice(edited);

        if console.confirm("Play a test phrase?")? {
            console.say("Hello! This is how Momentera sounds.")?;
        }
    }

    if console.confirm("Save these voice settings?")? {
        *pref = edited;
        console.narrator_mut().set_voice(edited);
        info!(
            "event=voice_configure status=ok enabled={} rate={} volume={:.2}",
            edited.enabled, edited.rate, edited.volume
        );
        console.say("Voice settings saved.")?;
        Ok(true)
    } else {
        console.narrator_mut().set_voice(original);
        console.say("Voice settings not saved.")?;
        Ok(false)
    }
}

fn ask_rate<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    pref: &mut VoicePreference,
) -> PlannerResult<()> {
    let prompt = format!("Set rate (100-300, current is {}): ", pref.rate);
    let Some(input) = console.ask(&prompt)? else {
        return Ok(());
    };
    if input.is_empty() {
        return Ok(());
    }
    let result = input
        .parse::<u32>()
        .map_err(|_| PlannerError::Validation("Rate must be a whole number".into()))
        .and_then(|rate| pref.set_rate(rate));
    match result {
        Ok(()) => console.say(&format!("Speech rate set to {}.", pref.rate)),
        Err(e) => console.say(&format!("{}. Keeping rate {}.", e, pref.rate)),
    }
}

fn ask_volume<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    pref: &mut VoicePreference,
) -> PlannerResult<()> {
    let prompt = format!("Set volume (0.0 to 1.0, current is {:.2}): ", pref.volume);
    let Some(input) = console.ask(&prompt)? else {
        return Ok(());
    };
    if input.is_empty() {
        return Ok(());
    }
    let result = input
        .parse::<f32>()
        .map_err(|_| PlannerError::Validation("Volume must be a number".into()))
        .and_then(|volume| pref.set_volume(volume));
    match result {
        Ok(()) => console.say(&format!("Volume set to {:.2}.", pref.volume)),
        Err(e) => console.say(&format!("{}. Keeping volume {:.2}.", e, pref.volume)),
    }
}

fn ask_voice<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    pref: &mut VoicePreference,
) -> PlannerResult<()> {
    let voices = console.narrator().voices();
    if voices.is_empty() {
        return console.say("The speech engine lists no voices; using its default voice.");
    }

    console.say("Available voices:")?;
    for (i, name) in voices.iter().enumerate() {
        console.say(&format!("{}: {}", i, name))?;
    }
    let prompt = format!("Choose voice index (current is {}): ", pref.voice_index);
    let Some(input) = console.ask(&prompt)? else {
        return Ok(());
    };
    if input.is_empty() {
        return Ok(());
    }
    match input.parse::<usize>() {
        Ok(index) if index < voices.len() => {
            pref.voice_index = index;
            console.say(&format!("Voice changed to {}.", voices[index]))
        }
        _ => console.say("Invalid voice index. Keeping current."),
    }
}

/// Voice settings for the logged-in user, persisted on save
fn user_voice<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    let mut pref = *ctx.session.voice();
    if !configure_voice(ctx.console, &mut pref)? {
        return Ok(());
    }
    ctx.session.set_voice(pref);
    if let Err(e) = ctx.store.save_voice_preference(ctx.session.username(), &pref) {
        warn!("event=voice_save status=error reason={}", e);
        ctx.console.say(&format!("Could not store voice settings: {}", e))?;
    }
    Ok(())
}

fn help_and_tour<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    ctx.console.blank()?;
    for line in TOUR {
        ctx.console.say(line)?;
    }
    if ctx.console.confirm("Would you like to load a sample event to explore?")? {
        load_demo_data(ctx)?;
    }
    Ok(())
}

fn about<R: BufRead, W: Write>(console: &mut Console<R, W>) -> PlannerResult<()> {
    console.blank()?;
    console.say_block(&format!(
        "About Momentera\n\
         Version {}\n\
         Momentera is your calm, cozy event planning companion.\n\
         Organize events, tasks, budgets, and reminders.\n\
         Built with care to help you turn moments into milestones.",
        env!("CARGO_PKG_VERSION")
    ))?;
    if let Some((level, dir)) = logging_status() {
        console.say(&format!("Logs ({}): {}", level, dir.display()))?;
    }
    Ok(())
}

/// Add the sample birthday party with a few tasks and a budget
fn load_demo_data<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    match create_demo_event(ctx) {
        Ok(()) => ctx.console.say("Demo event loaded! Explore the features freely."),
        Err(PlannerError::Duplicate { .. }) => ctx
            .console
            .say(&format!("An event named '{}' already exists.", DEMO_EVENT)),
        Err(e) => ctx.console.say(&format!("Error: {}", e)),
    }
}

fn create_demo_event<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    let date = NaiveDate::from_ymd_opt(2024, 8, 15)
        .ok_or_else(|| PlannerError::Validation("invalid demo date".into()))?;
    let start = NaiveTime::from_hms_opt(19, 0, 0)
        .ok_or_else(|| PlannerError::Validation("invalid demo time".into()))?;
    let end = NaiveTime::from_hms_opt(23, 0, 0)
        .ok_or_else(|| PlannerError::Validation("invalid demo time".into()))?;

    let mut new = NewEvent::new(DEMO_EVENT, date);
    new.notes = "Celebrate Sarah's 30th!".to_string();
    new.category = "Personal".to_string();
    new.priority = Priority::High;
    new.budget = Budget::Amount(Money::from_units_cents(1500, 0));

    let mut events = EventService::new(ctx.session);
    let id = events.create(new)?;
    events.set_times(id, start, end)?;
    events.toggle_star(id)?;
    // Only accepted while the demo date is still ahead
    if events.set_reminder(id, 2, ctx.today).is_err() {
        info!("event=demo_reminder status=skipped");
    }

    let mut tasks = TaskService::new(ctx.session);
    for (description, status) in [
        ("Book venue", TaskStatus::Completed),
        ("Send invitations", TaskStatus::Pending),
        ("Order cake", TaskStatus::Pending),
    ] {
        let task_id = tasks.add(id, NewTask::new(description))?;
        tasks.set_status(id, task_id, status)?;
    }

    info!("event=demo_load status=ok id={}", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::test_support::run_menu;
    use crate::session::Session;
    use crate::voice::{Narrator, SilentEngine};
    use std::io::Cursor;

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(
            Cursor::new(input.as_bytes().to_vec()),
            Narrator::new(Vec::new(), Box::new(SilentEngine)),
        )
    }

    #[test]
    fn test_configure_voice_saves_on_confirm() {
        let mut c = console("on\n200\n0.5\nn\ny\n");
        let mut pref = VoicePreference::default();

        assert!(configure_voice(&mut c, &mut pref).unwrap());
        assert!(pref.enabled);
        assert_eq!(pref.rate, 200);
        assert_eq!(pref.volume, 0.5);
        assert_eq!(*c.narrator().voice(), pref);
    }

    #[test]
    fn test_configure_voice_rejects_bad_values() {
        let mut c = console("on\n999\nloud\nn\ny\n");
        let mut pref = VoicePreference::default();

        assert!(configure_voice(&mut c, &mut pref).unwrap());
        assert_eq!(pref.rate, 150);
        assert_eq!(pref.volume, 1.0);
        let out = String::from_utf8(c.into_output()).unwrap();
        assert!(out.contains("Keeping rate 150."));
        assert!(out.contains("Keeping volume 1.00."));
    }

    #[test]
    fn test_configure_voice_declined_restores_narrator() {
        let mut c = console("on\n\n\nn\nn\n");
        let mut pref = VoicePreference::default();

        assert!(!configure_voice(&mut c, &mut pref).unwrap());
        assert!(!pref.enabled);
        assert!(!c.narrator().voice().enabled);
    }

    #[test]
    fn test_load_demo_data() {
        let mut session = Session::with_events("alice", Vec::new(), VoicePreference::default());
        let out = run_menu(&mut session, "3\n3\n0\n", |ctx| settings_menu(ctx).map(|_| ()));

        assert!(out.contains("Demo event loaded! Explore the features freely."));
        assert!(out.contains("An event named 'Birthday Party' already exists."));

        let event = &session.events()[0];
        assert_eq!(event.name, DEMO_EVENT);
        assert!(event.starred);
        assert_eq!(event.tasks.len(), 3);
        assert!(event.tasks[0].is_completed());
        assert_eq!(event.budget.amount(), Some(Money::from_units_cents(1500, 0)));
        // the test clock sits before the party, so the reminder sticks
        assert_eq!(event.reminder_days, Some(2));
    }

    #[test]
    fn test_account_logout_ends_session() {
        let mut session = Session::with_events("alice", Vec::new(), VoicePreference::default());
        let mut ended = None;
        let out = run_menu(&mut session, "5\n2\n", |ctx| {
            ended = settings_menu(ctx)?;
            Ok(())
        });
        assert_eq!(ended, Some(SessionEnd::Logout));
        assert!(out.contains("Logged out. Goodbye, alice!"));
    }
}
