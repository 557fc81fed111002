//! Credential pair and the secret stores it can be read from.

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

use super::error::{JiraError, Result};

/// Secret store key for the username.
pub const USERNAME_KEY: &str = "credentials.username";
/// Secret store key for the password or API token.
pub const PASSWORD_KEY: &str = "credentials.password";

/// Lookup of secrets by dotted key (e.g. `credentials.username`).
pub trait SecretStore: Send + Sync {
  fn get(&self, key: &str) -> Option<String>;
}

impl SecretStore for HashMap<String, String> {
  fn get(&self, key: &str) -> Option<String> {
    HashMap::get(self, key).cloned()
  }
}

/// Tries each store in order; first non-empty value wins.
#[derive(Default)]
pub struct ChainedSecrets {
  stores: Vec<Box<dyn SecretStore>>,
}

impl ChainedSecrets {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with(mut self, store: impl SecretStore + 'static) -> Self {
    self.stores.push(Box::new(store));
    self
  }
}

impl SecretStore for ChainedSecrets {
  fn get(&self, key: &str) -> Option<String> {
    self
      .stores
      .iter()
      .filter_map(|s| s.get(key))
      .find(|v| !v.trim().is_empty())
  }
}

/// Username plus password or API token, sent as HTTP basic auth.
#[derive(Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Credentials {
  #[serde(default)]
  pub username: String,
  #[serde(default)]
  pub password: String,
}

impl Credentials {
  pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
    Self {
      username: username.into(),
      password: password.into(),
    }
  }

  /// Read both fields from a secret store.
  pub fn from_store(store: &dyn SecretStore) -> Result<Self> {
    let credentials = Self::new(
      store.get(USERNAME_KEY).unwrap_or_default(),
      store.get(PASSWORD_KEY).unwrap_or_default(),
    );
    credentials.validate()?;
    Ok(credentials)
  }

  /// Use explicit credentials if given, else fall back to the store.
  pub fn resolve(explicit: Option<Credentials>, store: &dyn SecretStore) -> Result<Self> {
    match explicit {
      Some(credentials) => {
        credentials.validate()?;
        Ok(credentials)
      }
      None => Self::from_store(store),
    }
  }

  /// Both fields must be non-blank.
  pub fn validate(&self) -> Result<()> {
    let missing: Vec<&str> = [("username", &self.username), ("password", &self.password)]
      .into_iter()
      .filter(|(_, v)| v.trim().is_empty())
      .map(|(name, _)| name)
      .collect();

    if missing.is_empty() {
      Ok(())
    } else {
      Err(JiraError::Credential(format!(
        "{} must not be empty",
        missing.join(" and ")
      )))
    }
  }
}

impl fmt::Debug for Credentials {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Credentials")
      .field("username", &self.username)
      .field("password", &"<redacted>")
      .finish()
  }
}
