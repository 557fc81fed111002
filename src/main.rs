mod app;
mod cache;
mod config;
mod dashboard;
mod event;
mod jira;
mod logging;
#[cfg(test)]
mod testutil;
mod ui;

use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use tracing::info;

use crate::config::{Config, EnvSecrets, FileSecrets};
use crate::jira::{ChainedSecrets, Connection};

#[derive(Parser, Debug)]
#[command(name = "jiradash")]
#[command(about = "A terminal dashboard for Jira Cloud issues")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/jiradash/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Jira base URL, overrides the config file
  #[arg(short, long)]
  url: Option<String>,

  /// Issue ID to show on startup, e.g. TEST-5
  #[arg(short, long)]
  issue: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let _log_guard = logging::init()?;

  // Load configuration, a URL on the command line is enough on its own
  let mut config = match (Config::try_load(args.config.as_deref())?, &args.url) {
    (Some(config), _) => config,
    (None, Some(url)) => Config::from_url(url),
    (None, None) => Config::load(None)?,
  };
  if let Some(url) = args.url {
    config.jira.url = url;
  }

  // Environment first, then secrets.yaml
  let mut secrets = ChainedSecrets::new().with(EnvSecrets);
  if let Some(path) = config.secrets_path() {
    secrets = secrets.with(FileSecrets::load(&path)?);
  }

  let conn = Connection::connect(
    &config.jira.url,
    config.credentials.clone(),
    &secrets,
    config.connect_options(),
  )
  .map_err(|e| eyre!("Failed to connect to {}: {}", config.jira.url, e))?;
  info!(url = %config.jira.url, "connected");

  let mut app = app::App::new(conn, &config, args.issue);
  app.run().await?;

  Ok(())
}
