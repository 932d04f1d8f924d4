mod app;
mod args;
mod ui;
mod vocabulary;

use anyhow::{Context, Result, anyhow};
use autocomplete_entry_config::Config;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::LevelFilter;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    env,
    fs::OpenOptions,
    io::{Stdout, stdout},
    path::Path,
    process,
};

use crate::app::App;
use crate::args::{CliArgs, USAGE};

fn main() -> Result<()> {
    let args = match CliArgs::parse(env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE}");
            process::exit(2);
        }
    };
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    }
    .unwrap_or_default();

    // The terminal belongs to the editor, so logs only go to a file
    let log_file = args.log_file.as_deref().or(config.log_file.as_deref());
    if let Some(log_file) = log_file {
        init_logging(log_file, config.log_level.as_deref())?;
    }

    let vocabulary = vocabulary::resolve(args.vocabulary.as_deref(), &config)?;
    let deferred = args.deferred || config.deferred_evaluation;
    log::info!(
        "autocomplete-entry starting with {} suggestions{}",
        vocabulary.len(),
        if deferred { ", deferred evaluation" } else { "" }
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(vocabulary, deferred);
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("{err:?}");
        println!("{err:?}");
    }

    Ok(())
}

fn init_logging(path: &Path, level: Option<&str>) -> Result<()> {
    let level = match level {
        Some(level) => level
            .parse::<LevelFilter>()
            .map_err(|_| anyhow!("Invalid log level '{level}'"))?,
        None => LevelFilter::Info,
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    // RUST_LOG still overrides the configured level
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;
        while app.after_draw() {
            terminal.draw(|f| ui::draw(f, app))?;
        }

        match event::read()? {
            Event::Key(key) => app.on_key(key),
            Event::Mouse(mouse) => app.on_mouse(mouse),
            _ => {}
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}
