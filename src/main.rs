//! user-roster binary entry point.
//!
//! Parses the endpoint configuration, starts the API worker thread,
//! initializes the terminal in raw mode, runs the TUI event loop,
//! and restores the terminal state on exit.
//!
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Context, Result};

mod api;
mod app;
mod error;
mod ui;

#[derive(Parser, Debug)]
#[command(name = "user-roster", version, about)]
struct Args {
    /// Base endpoint of the user API, e.g. http://localhost:3000/users
    #[arg(long, env = "ROSTER_API_URL")]
    api_url: String,

    /// Per-request HTTP timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// File receiving structured logs; the terminal belongs to the TUI
    #[arg(long, default_value = "user-roster.log")]
    log_file: PathBuf,
}

/// Route `tracing` output to a file, filtered by `RUST_LOG`.
fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_ctx(|| format!("open log file {}", path.display()))?;
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("user_roster=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file)?;

    let api = api::RestUserApi::new(&args.api_url, Duration::from_secs(args.timeout_secs))?;
    let (requests, events) = api::worker::spawn(api);

    let mut terminal = init_terminal().map_err(|e| format!("init terminal: {}", e))?;
    let mut state = app::AppState::new(requests);

    let res = app::run(&mut terminal, &mut state, &events);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        eprintln!("application error: {err}");
    }
    Ok(())
}
