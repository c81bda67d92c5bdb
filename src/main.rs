use std::io::stdout;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use ratatui::{
    backend::CrosstermBackend,
    crossterm::{
        event::{DisableMouseCapture, EnableMouseCapture},
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    },
    Terminal,
};

use cells::cli::CliArgs;
use cells::config::{default_config_dir, ConfigManager};
use cells::persistence::PendingPersistence;
use cells::report::TaskwarriorSource;
use cells::{logging, App};

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    let config_dir = default_config_dir();
    if let Err(e) = logging::init(&config_dir) {
        eprintln!("Warning: Could not initialize file logging: {:#}", e);
    }

    let mut config_manager = match &args.config {
        Some(path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(&config_dir),
    };
    config_manager.load()?;
    let opts = args.into_run_opts(config_manager.get_config(), std::env::var_os("TASKDATA"));

    let source = TaskwarriorSource::new(opts.report_width, opts.task_data_dir.clone());
    // Load before touching the terminal so errors print normally
    let app = App::with_report(&opts, Arc::new(source), Arc::new(PendingPersistence)).await?;

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = app.run(&mut terminal).await;

    // Restore the terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        ratatui::crossterm::cursor::Show
    )?;

    result.context("taskcell exited with an error")
}
