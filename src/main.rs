use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use momentera::cli::{App, Console};
use momentera::config::{paths::MomenteraPaths, settings::Settings};
use momentera::logging::init_logging;
use momentera::storage::FileStore;
use momentera::voice::{select_engine, Narrator};

#[derive(Parser)]
#[command(
    name = "momentera",
    version,
    about = "Terminal event planner with tasks, budgets and reminders",
    long_about = "Momentera keeps your events, their tasks and budgets in plain \
                  text files and walks you through them with interactive menus. \
                  Every line can be read aloud when a speech program such as \
                  espeak-ng is installed."
)]
struct Cli {
    /// Directory holding users, events, settings and logs
    #[arg(long, env = "MOMENTERA_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Never speak, even if a user enabled voice
    #[arg(long)]
    no_speech: bool,

    /// Log level (error, warn, info, debug, trace); overrides config.json
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = MomenteraPaths::new(cli.data_dir)?;
    paths
        .ensure_directories()
        .context("Failed to create the data directory")?;
    let settings = Settings::load_or_create(&paths)?;

    let level = cli.log_level.as_deref().unwrap_or(&settings.log_level);
    if let Err(e) = init_logging(level, &paths.log_dir()) {
        eprintln!("Logging disabled: {}", e);
    }

    let store = FileStore::new(paths.clone())?;
    let engine = select_engine(cli.no_speech, settings.speech_program.as_deref());

    let stdin = io::stdin();
    let hide_passwords = stdin.is_terminal();
    let narrator = Narrator::new(io::stdout(), engine);
    let console = Console::new(stdin.lock(), narrator).hide_passwords(hide_passwords);

    let mut app = App::new(Box::new(store), settings, paths, console);
    app.run()?;
    Ok(())
}
