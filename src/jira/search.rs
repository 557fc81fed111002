//! JQL search request and its output shapes.

use serde::Deserialize;
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

use super::error::{JiraError, Result};
use super::table::Table;

/// Path of the search endpoint, relative to the base URL.
pub const SEARCH_ENDPOINT: &str = "/rest/api/3/search";

/// Output shape of a JQL search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReturnType {
  /// The `total` field of the response
  #[default]
  Count,
  /// The raw `issues` array
  Json,
  /// `issues` flattened into a table
  Table,
}

impl FromStr for ReturnType {
  type Err = JiraError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_lowercase().as_str() {
      "count" => Ok(Self::Count),
      "json" => Ok(Self::Json),
      "dataframe" | "table" => Ok(Self::Table),
      _ => Err(JiraError::InvalidReturnType(s.to_string())),
    }
  }
}

impl fmt::Display for ReturnType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::Count => "count",
      Self::Json => "json",
      Self::Table => "dataframe",
    };
    f.write_str(name)
  }
}

/// A single page of a JQL search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
  pub jql: String,
  pub expand: Vec<String>,
  pub fields: Vec<String>,
  pub max_results: u32,
  pub start_at: u32,
  pub return_type: ReturnType,
}

impl SearchRequest {
  pub fn new(jql: impl Into<String>) -> Self {
    Self {
      jql: jql.into(),
      expand: vec!["changelog".to_string()],
      fields: vec!["summary".to_string(), "status".to_string()],
      max_results: 10,
      start_at: 0,
      return_type: ReturnType::Count,
    }
  }

  pub fn fields<I, S>(mut self, fields: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.fields = fields.into_iter().map(Into::into).collect();
    self
  }

  pub fn max_results(mut self, max_results: u32) -> Self {
    self.max_results = max_results;
    self
  }

  pub fn return_type(mut self, return_type: ReturnType) -> Self {
    self.return_type = return_type;
    self
  }

  /// Reject requests that would be pointless to send.
  pub fn validate(&self) -> Result<()> {
    if self.jql.trim().is_empty() {
      return Err(JiraError::Validation("'jql' is required".to_string()));
    }
    Ok(())
  }

  /// JSON body for `POST /rest/api/3/search`.
  pub fn body(&self) -> Value {
    json!({
      "expand": self.expand,
      "fields": self.fields,
      "fieldsByKeys": false,
      "jql": self.jql,
      "maxResults": self.max_results,
      "startAt": self.start_at,
    })
  }
}

/// The parts of a search response we read.
#[derive(Debug, Deserialize)]
pub struct ApiSearchResponse {
  pub total: u64,
  #[serde(default)]
  pub issues: Vec<Value>,
}

/// Result of a search, in the shape the request asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutput {
  Count(u64),
  Issues(Vec<Value>),
  Table(Table),
}

impl SearchOutput {
  /// Shape a decoded response.
  pub fn shape(response: ApiSearchResponse, return_type: ReturnType) -> Self {
    match return_type {
      ReturnType::Count => Self::Count(response.total),
      ReturnType::Json => Self::Issues(response.issues),
      ReturnType::Table => Self::Table(Table::from_records(&response.issues)),
    }
  }

  pub fn into_table(self) -> Option<Table> {
    match self {
      Self::Table(table) => Some(table),
      _ => None,
    }
  }
}
