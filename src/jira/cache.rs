//! Cache keys for Jira API calls.

use serde_json::Value;
use sha2::{Digest, Sha256};
use url::form_urlencoded;

/// Every argument that changes the response of a call.
#[derive(Clone, Debug)]
pub enum JiraQueryKey<'a> {
  /// Generic GET on an endpoint
  Get {
    endpoint: &'a str,
    params: &'a [(&'a str, &'a str)],
  },
  /// Get a single issue by id or key
  Issue {
    id: &'a str,
    params: &'a [(&'a str, &'a str)],
  },
  /// JQL search, keyed on the full request body
  Search { body: &'a Value },
}

impl JiraQueryKey<'_> {
  pub fn cache_hash(&self) -> String {
    let input = match self {
      Self::Get { endpoint, params } => format!("get:{}?{}", endpoint, encode_params(params)),
      Self::Issue { id, params } => format!("issue:{}?{}", id, encode_params(params)),
      // serde_json maps are sorted, so this is canonical
      Self::Search { body } => format!("search:{}", body),
    };

    // SHA256 hash for stable, fixed-length keys
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let result = hasher.finalize();
    hex::encode(result)
  }

  pub fn description(&self) -> String {
    match self {
      Self::Get { endpoint, .. } => format!("GET {}", endpoint),
      Self::Issue { id, .. } => format!("issue {}", id),
      Self::Search { body } => format!(
        "search: {}",
        body.get("jql").and_then(Value::as_str).unwrap_or_default()
      ),
    }
  }
}

/// Params are form-encoded the same way the request URL is, so a `&` or `=`
/// inside a value can't be mistaken for a separator. Order is kept;
/// `a=1&b=2` and `b=2&a=1` are different keys.
fn encode_params(params: &[(&str, &str)]) -> String {
  form_urlencoded::Serializer::new(String::new())
    .extend_pairs(params)
    .finish()
}
