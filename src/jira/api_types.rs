//! Serde-deserializable views of Jira issue JSON.
//!
//! Queries return raw `serde_json::Value`s. These types pick out the few
//! fields the dashboard reads, leaving everything else alone.

use serde::Deserialize;
use serde_json::Value;

use super::error::Result;
use super::types::{IssueDetail, UNASSIGNED};

#[derive(Debug, Deserialize)]
pub struct ApiStatus {
  #[serde(default)]
  pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiUser {
  #[serde(rename = "displayName", default)]
  pub display_name: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct ApiIssueFields {
  #[serde(default)]
  pub summary: String,
  pub status: Option<ApiStatus>,
  pub assignee: Option<ApiUser>,
}

#[derive(Debug, Deserialize)]
pub struct ApiIssue {
  #[serde(default)]
  pub key: String,
  #[serde(default)]
  pub fields: ApiIssueFields,
}

impl ApiIssue {
  pub fn from_json(value: &Value) -> Result<Self> {
    Ok(Self::deserialize(value)?)
  }

  pub fn into_detail(self) -> IssueDetail {
    let f = self.fields;
    IssueDetail {
      key: self.key,
      summary: f.summary,
      assignee: f
        .assignee
        .map(|u| u.display_name)
        .unwrap_or_else(|| UNASSIGNED.to_string()),
      status: f.status.map(|s| s.name).unwrap_or_default(),
    }
  }
}
