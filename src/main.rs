//! user-console binary entry point.
//!
//! Parses settings, starts the async runtime for API calls, initializes the
//! terminal in raw mode, runs the TUI event loop, and restores the terminal
//! state on exit.
//!
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use user_console::Result;
use user_console::api::HttpUserApi;
use user_console::app::{self, AppState, tasks::Tasks};
use user_console::config::{Cli, Settings, init_tracing};

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let settings = Settings::from_cli(Cli::parse());
    init_tracing(settings.log_file.as_deref());
    tracing::info!(api_url = %settings.api_url, page_size = settings.page_size, "starting user-console");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("start async runtime")?;
    let api = Arc::new(HttpUserApi::new(&settings.api_url, settings.timeout).context("build http client")?);
    let (tasks, mut events) = Tasks::new(runtime.handle().clone(), api);
    let mut state = AppState::new(&settings);

    let mut terminal = init_terminal().context("init terminal")?;

    let res = app::run(&mut terminal, &mut state, &tasks, &mut events);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err}");
    }
    runtime.shutdown_background();
    Ok(())
}
