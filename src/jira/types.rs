/// Shown in place of a missing assignee
pub const UNASSIGNED: &str = "Unassigned";

/// What the single-issue view shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueDetail {
  pub key: String,
  pub summary: String,
  pub assignee: String,
  pub status: String,
}

/// One row of the recent-issues table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRow {
  pub key: String,
  pub summary: String,
  pub status: Option<String>,
  pub assignee: Option<String>,
}
