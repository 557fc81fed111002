//! Dashboard figures derived from a recent-issues search.

use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

use crate::jira::api_types::ApiIssue;
use crate::jira::types::{IssueDetail, IssueRow};
use crate::jira::{Connection, Result, ReturnType, SearchRequest, Table};

pub const KEY_COLUMN: &str = "key";
pub const SUMMARY_COLUMN: &str = "fields.summary";
pub const STATUS_COLUMN: &str = "fields.status.name";
pub const ASSIGNEE_COLUMN: &str = "fields.assignee.displayName";

pub const DONE: &str = "Done";
pub const IN_PROGRESS: &str = "In Progress";

/// Default query for the recent-issues panel.
pub const RECENT_JQL: &str = "created >= -30d order by created ASC";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metrics {
  pub total: usize,
  pub completed: usize,
  pub in_progress: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCount {
  pub status: String,
  pub count: usize,
}

/// Everything the dashboard tab shows about recent issues.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dashboard {
  pub rows: Vec<IssueRow>,
  pub metrics: Metrics,
  pub status_counts: Vec<StatusCount>,
  pub backlog: Vec<IssueRow>,
}

impl Dashboard {
  pub fn from_table(table: &Table) -> Self {
    let rows = issue_rows(table);
    Self::from_rows(rows)
  }

  pub fn from_rows(rows: Vec<IssueRow>) -> Self {
    let status_counts = status_counts(&rows);
    let metrics = metrics(&rows, &status_counts);
    let backlog = unassigned_backlog(&rows).into_iter().cloned().collect();
    Self {
      rows,
      metrics,
      status_counts,
      backlog,
    }
  }

  pub fn is_empty(&self) -> bool {
    self.rows.is_empty()
  }
}

/// Settings for `load_recent`.
#[derive(Debug, Clone)]
pub struct RecentQuery {
  pub jql: String,
  pub max_results: u32,
  pub ttl: Duration,
}

impl Default for RecentQuery {
  fn default() -> Self {
    Self {
      jql: RECENT_JQL.to_string(),
      max_results: 50,
      ttl: Duration::ZERO,
    }
  }
}

/// Run the recent-issues search and summarize it.
pub async fn load_recent(conn: &Connection, query: &RecentQuery) -> Result<Dashboard> {
  let request = SearchRequest::new(query.jql.clone())
    .fields(["summary", "status", "assignee"])
    .max_results(query.max_results)
    .return_type(ReturnType::Table);

  let table = conn
    .query_jql(&request, query.ttl)
    .await?
    .into_table()
    .unwrap_or_default();
  debug!(rows = table.len(), columns = table.columns().len(), "recent issues");

  Ok(Dashboard::from_table(&table))
}

/// Look up one issue; `None` when Jira doesn't know it.
pub async fn load_issue(
  conn: &Connection,
  issue_id: &str,
  ttl: Duration,
) -> Result<Option<IssueDetail>> {
  match conn.query_issue(issue_id, &[], ttl).await? {
    Some(value) => Ok(Some(ApiIssue::from_json(&value)?.into_detail())),
    None => Ok(None),
  }
}

/// Project the table onto the four columns the dashboard shows.
pub fn issue_rows(table: &Table) -> Vec<IssueRow> {
  let projected = table.select(&[KEY_COLUMN, SUMMARY_COLUMN, STATUS_COLUMN, ASSIGNEE_COLUMN]);

  projected
    .rows()
    .iter()
    .map(|row| IssueRow {
      key: text(&row[0]).unwrap_or_default(),
      summary: text(&row[1]).unwrap_or_default(),
      status: text(&row[2]),
      assignee: text(&row[3]),
    })
    .collect()
}

fn text(value: &Value) -> Option<String> {
  match value {
    Value::Null => None,
    Value::String(s) => Some(s.clone()),
    other => Some(other.to_string()),
  }
}

/// Issue counts per status, sorted by status name. Rows without a status
/// are left out.
pub fn status_counts(rows: &[IssueRow]) -> Vec<StatusCount> {
  let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
  for status in rows.iter().filter_map(|r| r.status.as_deref()) {
    *counts.entry(status).or_default() += 1;
  }

  counts
    .into_iter()
    .map(|(status, count)| StatusCount {
      status: status.to_string(),
      count,
    })
    .collect()
}

pub fn metrics(rows: &[IssueRow], counts: &[StatusCount]) -> Metrics {
  let count_of = |name: &str| {
    counts
      .iter()
      .find(|c| c.status == name)
      .map(|c| c.count)
      .unwrap_or(0)
  };

  Metrics {
    total: rows.len(),
    completed: count_of(DONE),
    in_progress: count_of(IN_PROGRESS),
  }
}

pub fn unassigned_backlog(rows: &[IssueRow]) -> Vec<&IssueRow> {
  rows.iter().filter(|r| r.assignee.is_none()).collect()
}
