//! File logging. The terminal belongs to the TUI, so nothing is written to
//! stdout or stderr once the app is running.

use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Env var holding the tracing filter, e.g. `JIRADASH_LOG=jiradash=debug`
pub const LOG_ENV: &str = "JIRADASH_LOG";

/// `$XDG_DATA_HOME/jiradash/logs`
pub fn log_dir() -> Option<PathBuf> {
  dirs::data_dir().map(|d| d.join("jiradash").join("logs"))
}

/// Install a daily-rolling file subscriber.
///
/// Returns `None` when there is no data directory. The guard must be kept
/// alive until exit or buffered lines are lost.
pub fn init() -> Result<Option<WorkerGuard>> {
  let Some(dir) = log_dir() else {
    return Ok(None);
  };
  std::fs::create_dir_all(&dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", dir.display(), e))?;

  let appender = tracing_appender::rolling::daily(&dir, "jiradash.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);

  let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(writer)
    .with_ansi(false)
    .try_init()
    .map_err(|e| eyre!("Failed to initialize logging: {}", e))?;

  Ok(Some(guard))
}
