//! Log file setup
//!
//! The terminal belongs to the UI, so logs only go to a daily-rotated file
//! under `<config_dir>/taskcell/logs/taskcell.log`. Filtering follows
//! `RUST_LOG` (`RUST_LOG=cells::report=trace`), defaulting to `info`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Create the log directory below `config_dir`
pub fn ensure_logs_dir(config_dir: &Path) -> Result<PathBuf> {
    let logs_dir = config_dir.join("logs");
    std::fs::create_dir_all(&logs_dir)
        .with_context(|| format!("Could not create log directory {}", logs_dir.display()))?;
    Ok(logs_dir)
}

/// Install the global tracing subscriber
pub fn init(config_dir: &Path) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let logs_dir = ensure_logs_dir(config_dir)?;
    let file_appender = tracing_appender::rolling::daily(logs_dir, "taskcell.log");

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .try_init()
        .context("Logging was already initialized")?;
    Ok(())
}
