//! Error type shared by every Jira query.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, JiraError>;

#[derive(Debug, Error)]
pub enum JiraError {
  /// Username or password missing or blank
  #[error("Invalid or missing credentials: {0}")]
  Credential(String),

  /// Request rejected before anything was sent
  #[error("Invalid request: {0}")]
  Validation(String),

  /// Remote answered with a non-success status
  #[error("HTTP error {status} for {url}")]
  Http { status: u16, url: String },

  /// Connection, TLS or timeout failure
  #[error("Request failed: {0}")]
  Transport(String),

  /// Response body was not the JSON we expected
  #[error("Failed to decode response: {0}")]
  Decode(String),

  #[error("Invalid return type '{0}', expected one of: count, json, dataframe")]
  InvalidReturnType(String),

  #[error("Invalid URL: {0}")]
  Url(#[from] url::ParseError),
}

impl JiraError {
  /// True for errors that came back from the server as a status code.
  pub fn is_http(&self) -> bool {
    matches!(self, JiraError::Http { .. })
  }
}

impl From<serde_json::Error> for JiraError {
  fn from(e: serde_json::Error) -> Self {
    JiraError::Decode(e.to_string())
  }
}

/// Opt-in conversion of HTTP status failures into "no data".
pub trait ResultExt<T> {
  /// `Ok(v)` becomes `Ok(Some(v))`, an HTTP status error becomes `Ok(None)`,
  /// anything else is passed through.
  fn not_found_as_none(self) -> Result<Option<T>>;
}

impl<T> ResultExt<T> for Result<T> {
  fn not_found_as_none(self) -> Result<Option<T>> {
    match self {
      Ok(value) => Ok(Some(value)),
      Err(e) if e.is_http() => Ok(None),
      Err(e) => Err(e),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_not_found_as_none_maps_http_errors() {
    let failed: Result<u32> = Err(JiraError::Http {
      status: 404,
      url: "https://x/rest/api/3/issue/NOPE-1".into(),
    });
    assert!(matches!(failed.not_found_as_none(), Ok(None)));
  }

  #[test]
  fn test_not_found_as_none_keeps_other_errors() {
    let failed: Result<u32> = Err(JiraError::Transport("connection refused".into()));
    assert!(matches!(
      failed.not_found_as_none(),
      Err(JiraError::Transport(_))
    ));
  }

  #[test]
  fn test_not_found_as_none_wraps_success() {
    let ok: Result<u32> = Ok(7);
    assert_eq!(ok.not_found_as_none().unwrap(), Some(7));
  }
}
