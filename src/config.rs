use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::dashboard::{RecentQuery, RECENT_JQL};
use crate::jira::{ConnectOptions, Credentials, SecretStore};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub jira: JiraConfig,
  #[serde(default)]
  pub cache: CacheConfig,
  #[serde(default)]
  pub dashboard: DashboardConfig,
  /// Inline credentials; when absent they come from the secret store
  pub credentials: Option<Credentials>,
  /// Where this config was loaded from
  #[serde(skip)]
  pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JiraConfig {
  /// Base URL, e.g. https://your-domain.atlassian.net
  pub url: String,
  /// Per-request timeout in seconds
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
  /// TTL for queries outside the dashboard panels, e.g. the project list
  #[serde(default = "default_ttl_secs")]
  pub default_ttl_secs: u64,
  #[serde(default = "default_max_entries")]
  pub max_entries: usize,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      default_ttl_secs: default_ttl_secs(),
      max_entries: default_max_entries(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
  /// Issue shown when the dashboard opens
  pub default_issue: Option<String>,
  #[serde(default = "default_recent_jql")]
  pub recent_jql: String,
  #[serde(default = "default_max_results")]
  pub max_results: u32,
  /// TTL for dashboard queries; 0 refetches on every refresh
  #[serde(default)]
  pub ttl_secs: u64,
}

impl Default for DashboardConfig {
  fn default() -> Self {
    Self {
      default_issue: None,
      recent_jql: default_recent_jql(),
      max_results: default_max_results(),
      ttl_secs: 0,
    }
  }
}

fn default_timeout_secs() -> u64 {
  30
}

fn default_ttl_secs() -> u64 {
  600
}

fn default_max_entries() -> usize {
  crate::cache::DEFAULT_MAX_ENTRIES
}

fn default_recent_jql() -> String {
  RECENT_JQL.to_string()
}

fn default_max_results() -> u32 {
  50
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./jiradash.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/jiradash/config.yaml
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    Self::try_load(explicit_path)?.ok_or_else(|| {
      eyre!(
        "No configuration file found. Create one at ~/.config/jiradash/config.yaml\n\
                 or pass --url."
      )
    })
  }

  /// Like [`Config::load`], but `Ok(None)` when no file was found by searching.
  /// A missing explicit path is still an error.
  pub fn try_load(explicit_path: Option<&Path>) -> Result<Option<Self>> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    path.map(|p| Self::load_from_path(&p)).transpose()
  }

  /// Defaults for everything but the URL.
  pub fn from_url(url: &str) -> Self {
    Self {
      jira: JiraConfig {
        url: url.to_string(),
        timeout_secs: default_timeout_secs(),
      },
      cache: CacheConfig::default(),
      dashboard: DashboardConfig::default(),
      credentials: None,
      source: None,
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("jiradash.yaml");
    if local.exists() {
      return Some(local);
    }

    let xdg_path = Self::config_dir()?.join("config.yaml");
    if xdg_path.exists() {
      return Some(xdg_path);
    }

    None
  }

  fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("jiradash"))
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    let mut config: Config = serde_yaml::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;
    config.source = Some(path.to_path_buf());

    Ok(config)
  }

  /// `secrets.yaml` next to the loaded config, else in the config directory.
  pub fn secrets_path(&self) -> Option<PathBuf> {
    let beside_config = self
      .source
      .as_deref()
      .and_then(Path::parent)
      .map(|dir| dir.join("secrets.yaml"));

    match beside_config {
      Some(p) if p.exists() => Some(p),
      _ => Self::config_dir().map(|d| d.join("secrets.yaml")),
    }
  }

  pub fn connect_options(&self) -> ConnectOptions {
    ConnectOptions {
      timeout: Duration::from_secs(self.jira.timeout_secs),
      max_cache_entries: self.cache.max_entries,
    }
  }

  pub fn default_ttl(&self) -> Duration {
    Duration::from_secs(self.cache.default_ttl_secs)
  }

  pub fn recent_query(&self) -> RecentQuery {
    RecentQuery {
      jql: self.dashboard.recent_jql.clone(),
      max_results: self.dashboard.max_results,
      ttl: Duration::from_secs(self.dashboard.ttl_secs),
    }
  }
}

/// Secrets read from a YAML file, looked up by dotted path.
///
/// ```yaml
/// credentials:
///   username: me@example.com
///   password: api-token
/// ```
pub struct FileSecrets {
  root: serde_yaml::Value,
}

impl Default for FileSecrets {
  fn default() -> Self {
    Self {
      root: serde_yaml::Value::Null,
    }
  }
}

impl FileSecrets {
  /// Load `path`; a missing file is an empty store.
  pub fn load(path: &Path) -> Result<Self> {
    if !path.exists() {
      return Ok(Self::default());
    }

    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read secrets file {}: {}", path.display(), e))?;
    Self::parse(&contents)
      .map_err(|e| eyre!("Failed to parse secrets file {}: {}", path.display(), e))
  }

  pub fn parse(contents: &str) -> Result<Self, serde_yaml::Error> {
    let root = serde_yaml::from_str(contents)?;
    Ok(Self { root })
  }
}

impl SecretStore for FileSecrets {
  fn get(&self, key: &str) -> Option<String> {
    let mut node = &self.root;
    for part in key.split('.') {
      node = node.get(part)?;
    }
    match node {
      serde_yaml::Value::String(s) => Some(s.clone()),
      serde_yaml::Value::Number(n) => Some(n.to_string()),
      _ => None,
    }
  }
}

/// Secrets from environment variables.
///
/// `credentials.username` is read from `JIRADASH_CREDENTIALS_USERNAME`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecrets;

impl EnvSecrets {
  pub fn var_name(key: &str) -> String {
    format!("JIRADASH_{}", key.replace('.', "_").to_uppercase())
  }
}

impl SecretStore for EnvSecrets {
  fn get(&self, key: &str) -> Option<String> {
    std::env::var(Self::var_name(key)).ok()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::jira::{PASSWORD_KEY, USERNAME_KEY};
  use std::io::Write;

  fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("jiradash.yaml");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
  }

  #[test]
  fn test_load_minimal_config_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "jira:\n  url: https://x.atlassian.net\n");

    let config = Config::load(Some(path.as_path())).unwrap();
    assert_eq!(config.jira.url, "https://x.atlassian.net");
    assert_eq!(config.jira.timeout_secs, 30);
    assert_eq!(config.cache.default_ttl_secs, 600);
    assert_eq!(config.dashboard.recent_jql, RECENT_JQL);
    assert_eq!(config.dashboard.ttl_secs, 0);
    assert!(config.credentials.is_none());
    assert_eq!(config.source.as_deref(), Some(path.as_path()));
  }

  #[test]
  fn test_load_full_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
      dir.path(),
      r#"
jira:
  url: https://x.atlassian.net
  timeout_secs: 5
cache:
  default_ttl_secs: 60
  max_entries: 16
dashboard:
  default_issue: TEST-5
  recent_jql: project = TEST
  max_results: 20
  ttl_secs: 30
credentials:
  username: me@example.com
  password: token
"#,
    );

    let config = Config::load(Some(path.as_path())).unwrap();
    assert_eq!(config.connect_options().timeout, Duration::from_secs(5));
    assert_eq!(config.connect_options().max_cache_entries, 16);
    assert_eq!(config.default_ttl(), Duration::from_secs(60));
    assert_eq!(config.dashboard.default_issue.as_deref(), Some("TEST-5"));

    let recent = config.recent_query();
    assert_eq!(recent.jql, "project = TEST");
    assert_eq!(recent.max_results, 20);
    assert_eq!(recent.ttl, Duration::from_secs(30));

    assert_eq!(
      config.credentials,
      Some(Credentials::new("me@example.com", "token"))
    );
  }

  #[test]
  fn test_load_missing_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.yaml");
    let err = Config::load(Some(missing.as_path())).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
  }

  #[test]
  fn test_load_rejects_missing_url() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "cache:\n  max_entries: 3\n");
    assert!(Config::load(Some(path.as_path())).is_err());
  }

  #[test]
  fn test_secrets_path_prefers_file_beside_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "jira:\n  url: https://x.atlassian.net\n");
    std::fs::write(dir.path().join("secrets.yaml"), "credentials: {}\n").unwrap();

    let config = Config::load(Some(path.as_path())).unwrap();
    assert_eq!(config.secrets_path(), Some(dir.path().join("secrets.yaml")));
  }

  #[test]
  fn test_file_secrets_dotted_lookup() {
    let secrets =
      FileSecrets::parse("credentials:\n  username: me@example.com\n  password: 12345\n").unwrap();
    assert_eq!(secrets.get(USERNAME_KEY).as_deref(), Some("me@example.com"));
    assert_eq!(secrets.get(PASSWORD_KEY).as_deref(), Some("12345"));
    assert_eq!(secrets.get("credentials"), None);
    assert_eq!(secrets.get("other.key"), None);
  }

  #[test]
  fn test_file_secrets_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let secrets = FileSecrets::load(&dir.path().join("secrets.yaml")).unwrap();
    assert_eq!(secrets.get(USERNAME_KEY), None);
  }

  #[test]
  fn test_credentials_from_file_secrets() {
    let secrets = FileSecrets::parse("credentials:\n  username: me\n  password: pw\n").unwrap();
    let credentials = Credentials::from_store(&secrets).unwrap();
    assert_eq!(credentials, Credentials::new("me", "pw"));
  }

  #[test]
  fn test_env_var_name() {
    assert_eq!(
      EnvSecrets::var_name(USERNAME_KEY),
      "JIRADASH_CREDENTIALS_USERNAME"
    );
    assert_eq!(
      EnvSecrets::var_name(PASSWORD_KEY),
      "JIRADASH_CREDENTIALS_PASSWORD"
    );
  }
}
