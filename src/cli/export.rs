//! Export menu
//!
//! Writes every event of the logged-in user (archived ones included) to a
//! timestamped file under the exports directory.

use std::io::{BufRead, Write};

use crate::error::PlannerResult;
use crate::export::{export_to_dir, ExportFormat};

use super::MenuContext;

pub fn export_menu<R: BufRead, W: Write>(ctx: &mut MenuContext<'_, R, W>) -> PlannerResult<()> {
    let labels: Vec<String> = ExportFormat::ALL.iter().map(|f| f.to_string()).collect();
    let labels: Vec<&str> = labels.iter().map(String::as_str).collect();

    loop {
        ctx.console.menu("Export Data", &labels, "Back to Main Menu")?;
        let Some(choice) = ctx.console.ask("Choose a format: ")? else {
            return Ok(());
        };
        if choice == "0" {
            return Ok(());
        }

        let format = match choice.parse::<usize>() {
            Ok(n) if (1..=ExportFormat::ALL.len()).contains(&n) => Some(ExportFormat::ALL[n - 1]),
            _ => ExportFormat::parse(&choice),
        };
        let Some(format) = format else {
            ctx.console.say("Invalid choice.")?;
            continue;
        };

        if ctx.session.events().is_empty() {
            ctx.console.say("No events to export.")?;
            continue;
        }

        let result = export_to_dir(
            ctx.session.username(),
            ctx.session.events(),
            format,
            &ctx.settings.currency_symbol,
            &ctx.paths.export_dir(),
        );
        match result {
            Ok(path) => ctx
                .console
                .say(&format!("Events exported to: {}", path.display()))?,
            Err(e) => ctx.console.say(&format!("Error: {}", e))?,
        }
        return Ok(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::test_support::run_menu;
    use crate::models::{Event, VoicePreference};
    use crate::session::Session;
    use chrono::NaiveDate;

    #[test]
    fn test_export_reports_path() {
        let event = Event::new("Party", NaiveDate::from_ymd_opt(2024, 8, 15).unwrap());
        let mut session = Session::with_events("alice", vec![event], VoicePreference::default());

        let out = run_menu(&mut session, "csv\n", export_menu);
        assert!(out.contains("Events exported to: "));
        assert!(out.contains("alice_events_"));
        assert!(out.contains(".csv"));
    }

    #[test]
    fn test_nothing_to_export() {
        let mut session = Session::with_events("alice", Vec::new(), VoicePreference::default());
        let out = run_menu(&mut session, "3\n0\n", export_menu);
        assert!(out.contains("No events to export."));
    }

    #[test]
    fn test_unknown_format() {
        let mut session = Session::with_events("alice", Vec::new(), VoicePreference::default());
        let out = run_menu(&mut session, "xml\n0\n", export_menu);
        assert!(out.contains("Invalid choice."));
    }
}
