//! Shared test fixtures.

use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use url::Url;

use crate::cache::CacheLayer;
use crate::jira::{Connection, JiraError, Result, Transport};

pub const BASE_URL: &str = "https://test.atlassian.net";

/// A request the mock saw.
#[derive(Debug, Clone)]
pub struct Recorded {
  pub method: &'static str,
  pub url: Url,
  pub body: Option<Value>,
}

#[derive(Debug, Clone)]
enum Reply {
  Json(Value),
  Status(u16),
}

/// Transport that answers from a fixed route table and records every call.
///
/// Routes match on method and URL path. Unrouted paths answer 404.
#[derive(Default)]
pub struct MockTransport {
  routes: Mutex<HashMap<(&'static str, String), Reply>>,
  calls: Mutex<Vec<Recorded>>,
}

impl MockTransport {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn on_get(self, path: &str, body: Value) -> Self {
    self.route("GET", path, Reply::Json(body))
  }

  pub fn on_get_status(self, path: &str, status: u16) -> Self {
    self.route("GET", path, Reply::Status(status))
  }

  pub fn on_post(self, path: &str, body: Value) -> Self {
    self.route("POST", path, Reply::Json(body))
  }

  pub fn on_post_status(self, path: &str, status: u16) -> Self {
    self.route("POST", path, Reply::Status(status))
  }

  fn route(self, method: &'static str, path: &str, reply: Reply) -> Self {
    self
      .routes
      .lock()
      .unwrap()
      .insert((method, path.to_string()), reply);
    self
  }

  pub fn calls(&self) -> Vec<Recorded> {
    self.calls.lock().unwrap().clone()
  }

  pub fn call_count(&self) -> usize {
    self.calls.lock().unwrap().len()
  }

  fn respond(&self, method: &'static str, url: &Url, body: Option<Value>) -> Result<Value> {
    self.calls.lock().unwrap().push(Recorded {
      method,
      url: url.clone(),
      body,
    });

    let reply = self
      .routes
      .lock()
      .unwrap()
      .get(&(method, url.path().to_string()))
      .cloned()
      .unwrap_or(Reply::Status(404));

    match reply {
      Reply::Json(value) => Ok(value),
      Reply::Status(status) => Err(JiraError::Http {
        status,
        url: url.to_string(),
      }),
    }
  }
}

impl Transport for MockTransport {
  fn get<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<Value>> {
    let result = self.respond("GET", url, None);
    async move { result }.boxed()
  }

  fn post_json<'a>(&'a self, url: &'a Url, body: &'a Value) -> BoxFuture<'a, Result<Value>> {
    let result = self.respond("POST", url, Some(body.clone()));
    async move { result }.boxed()
  }
}

/// Connection over `transport` with a fresh cache.
pub fn connection(transport: Arc<MockTransport>) -> Connection {
  Connection::with_transport(BASE_URL, transport, CacheLayer::default()).unwrap()
}

pub fn issue(key: &str, summary: &str, status: &str, assignee: Option<&str>) -> Value {
  json!({
    "key": key,
    "fields": {
      "summary": summary,
      "status": { "name": status },
      "assignee": assignee.map(|name| json!({ "displayName": name })),
    }
  })
}

/// One Done, one In Progress, one unassigned To Do.
pub fn project_issues() -> Vec<Value> {
  vec![
    issue("TEST-1", "Set up CI", "Done", Some("Ada Lovelace")),
    issue("TEST-2", "Write parser", "In Progress", Some("Alan Turing")),
    issue("TEST-3", "Triage backlog", "To Do", None),
  ]
}

pub fn search_response(issues: Vec<Value>) -> Value {
  json!({
    "startAt": 0,
    "maxResults": 50,
    "total": issues.len(),
    "issues": issues,
  })
}
