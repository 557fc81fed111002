use crate::config::Config;
use crate::dashboard::{self, Dashboard, RecentQuery};
use crate::event::{Event, EventHandler};
use crate::jira::types::IssueDetail;
use crate::jira::Connection;
use crate::ui;
use crate::ui::components::{InputResult, TextInput};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::collections::VecDeque;
use std::io::stdout;
use std::time::Duration;
use tracing::{info, warn};

/// Top-level tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
  Dashboard,
  CredentialSetup,
}

impl Tab {
  pub const ALL: [Tab; 2] = [Tab::Dashboard, Tab::CredentialSetup];

  pub fn title(self) -> &'static str {
    match self {
      Tab::Dashboard => "Dashboard",
      Tab::CredentialSetup => "Credential Setup",
    }
  }

  pub fn next(self) -> Self {
    match self {
      Tab::Dashboard => Tab::CredentialSetup,
      Tab::CredentialSetup => Tab::Dashboard,
    }
  }
}

/// Input mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  Normal,
  EditingIssue,
}

/// State of the single-issue panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueLookup {
  Idle,
  Loading(String),
  Found(IssueDetail),
  NotFound(String),
  Failed(String),
}

/// State of the recent-issues panels
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecentIssues {
  Loading,
  Loaded(Dashboard),
  Failed(String),
}

/// Result of listing projects, shown on the credential tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionCheck {
  Pending,
  Ok { projects: usize },
  Failed(String),
}

/// Work queued by a key press, run by the main loop after the next draw
#[derive(Debug, Clone, PartialEq, Eq)]
enum Request {
  Issue(String),
  Recent,
  Projects,
}

/// Main application state
pub struct App {
  conn: Connection,
  recent_query: RecentQuery,
  issue_ttl: Duration,
  projects_ttl: Duration,

  tab: Tab,
  mode: Mode,
  issue_input: TextInput,
  /// Input value before editing started, restored on cancel
  submitted_issue: String,
  issue: IssueLookup,
  recent: RecentIssues,
  connection_check: ConnectionCheck,
  queue: VecDeque<Request>,
  status: Option<String>,
  should_quit: bool,
}

impl App {
  pub fn new(conn: Connection, config: &Config, initial_issue: Option<String>) -> Self {
    let recent_query = config.recent_query();
    let issue_ttl = recent_query.ttl;

    let mut app = Self {
      conn,
      recent_query,
      issue_ttl,
      projects_ttl: config.default_ttl(),
      tab: Tab::Dashboard,
      mode: Mode::Normal,
      issue_input: TextInput::new(),
      submitted_issue: String::new(),
      issue: IssueLookup::Idle,
      recent: RecentIssues::Loading,
      connection_check: ConnectionCheck::Pending,
      queue: VecDeque::new(),
      status: None,
      should_quit: false,
    };

    if let Some(id) = initial_issue.or_else(|| config.dashboard.default_issue.clone()) {
      app.request_issue(id);
    }
    app.queue.push_back(Request::Recent);
    app.queue.push_back(Request::Projects);
    app
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut events = EventHandler::new(Duration::from_millis(250));
    let result = self.event_loop(&mut terminal, &mut events).await;

    // Cleanup terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop<B: Backend>(
    &mut self,
    terminal: &mut Terminal<B>,
    events: &mut EventHandler,
  ) -> Result<()> {
    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      // Queued requests run after a draw so their loading state is visible
      if self.process_next().await {
        continue;
      }

      match events.next().await {
        Some(event) => self.handle_event(event),
        None => break,
      }
    }
    Ok(())
  }

  /// Run one queued request. Returns false when the queue was empty.
  pub async fn process_next(&mut self) -> bool {
    let Some(request) = self.queue.pop_front() else {
      return false;
    };

    match request {
      Request::Issue(id) => {
        self.issue = match dashboard::load_issue(&self.conn, &id, self.issue_ttl).await {
          Ok(Some(detail)) => IssueLookup::Found(detail),
          Ok(None) => IssueLookup::NotFound(id),
          Err(e) => {
            warn!(issue = %id, error = %e, "issue lookup failed");
            IssueLookup::Failed(e.to_string())
          }
        };
      }
      Request::Recent => {
        self.recent = match dashboard::load_recent(&self.conn, &self.recent_query).await {
          Ok(summary) => {
            info!(issues = summary.metrics.total, "recent issues loaded");
            RecentIssues::Loaded(summary)
          }
          Err(e) => {
            warn!(error = %e, "recent issues query failed");
            RecentIssues::Failed(e.to_string())
          }
        };
        let stats = self.conn.cache_stats();
        self.status = Some(format!(
          "cache: {} hits, {} misses, {} entries",
          stats.hits, stats.misses, stats.entries
        ));
      }
      Request::Projects => {
        self.connection_check = match self.conn.query_projects(&[], self.projects_ttl).await {
          Ok(projects) => ConnectionCheck::Ok {
            projects: projects.as_array().map_or(0, Vec::len),
          },
          Err(e) => {
            warn!(error = %e, "project list failed");
            ConnectionCheck::Failed(e.to_string())
          }
        };
      }
    }
    true
  }

  fn request_issue(&mut self, id: String) {
    let id = id.trim().to_string();
    self.issue_input.set_value(&id);
    self.submitted_issue = id.clone();
    if id.is_empty() {
      self.issue = IssueLookup::Idle;
      return;
    }
    self.issue = IssueLookup::Loading(id.clone());
    self.queue.push_back(Request::Issue(id));
  }

  fn request_refresh(&mut self) {
    self.recent = RecentIssues::Loading;
    self.queue.push_back(Request::Recent);
    self.queue.push_back(Request::Projects);
    self.request_issue(self.submitted_issue.clone());
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Resize | Event::Tick => {} // redraw happens every loop
    }
  }

  pub fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    match self.mode {
      Mode::Normal => self.handle_normal_mode_key(key),
      Mode::EditingIssue => self.handle_editing_key(key),
    }
  }

  fn handle_normal_mode_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('q') => self.should_quit = true,
      KeyCode::Tab | KeyCode::BackTab => self.tab = self.tab.next(),
      KeyCode::Char('1') => self.tab = Tab::Dashboard,
      KeyCode::Char('2') => self.tab = Tab::CredentialSetup,
      KeyCode::Char('i') | KeyCode::Char('/') | KeyCode::Enter if self.tab == Tab::Dashboard => {
        self.mode = Mode::EditingIssue;
      }
      KeyCode::Char('r') if self.tab == Tab::Dashboard => self.request_refresh(),
      _ => {}
    }
  }

  fn handle_editing_key(&mut self, key: KeyEvent) {
    match self.issue_input.handle_key(key) {
      InputResult::Submitted(id) => {
        self.mode = Mode::Normal;
        self.request_issue(id);
      }
      InputResult::Cancelled => {
        self.mode = Mode::Normal;
        self.issue_input.set_value(&self.submitted_issue);
      }
      InputResult::Consumed | InputResult::NotHandled => {}
    }
  }

  // Accessors for rendering

  pub fn jira_url(&self) -> &str {
    self.conn.base_url()
  }

  pub fn tab(&self) -> Tab {
    self.tab
  }

  pub fn mode(&self) -> Mode {
    self.mode
  }

  pub fn issue_input(&self) -> &TextInput {
    &self.issue_input
  }

  pub fn issue(&self) -> &IssueLookup {
    &self.issue
  }

  pub fn recent(&self) -> &RecentIssues {
    &self.recent
  }

  pub fn connection_check(&self) -> &ConnectionCheck {
    &self.connection_check
  }

  pub fn status(&self) -> Option<&str> {
    self.status.as_deref()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testutil::{self, MockTransport};
  use serde_json::json;
  use std::sync::Arc;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn transport() -> Arc<MockTransport> {
    Arc::new(
      MockTransport::new()
        .on_get(
          "/rest/api/3/issue/TEST-5",
          testutil::issue("TEST-5", "Fix login", "Done", Some("Grace Hopper")),
        )
        .on_post(
          "/rest/api/3/search",
          testutil::search_response(testutil::project_issues()),
        )
        .on_get("/rest/api/3/project", json!([{ "key": "TEST" }])),
    )
  }

  fn app(transport: Arc<MockTransport>, initial: Option<&str>) -> App {
    let config = Config::from_url(testutil::BASE_URL);
    App::new(
      testutil::connection(transport),
      &config,
      initial.map(String::from),
    )
  }

  async fn drain(app: &mut App) {
    while app.process_next().await {}
  }

  #[tokio::test]
  async fn test_startup_loads_issue_and_recent() {
    let mut app = app(transport(), Some("TEST-5"));
    assert_eq!(app.issue(), &IssueLookup::Loading("TEST-5".into()));
    assert_eq!(app.recent(), &RecentIssues::Loading);

    drain(&mut app).await;

    match app.issue() {
      IssueLookup::Found(detail) => assert_eq!(detail.summary, "Fix login"),
      other => panic!("unexpected {:?}", other),
    }
    match app.recent() {
      RecentIssues::Loaded(summary) => {
        assert_eq!(summary.metrics.total, 3);
        assert_eq!(summary.backlog.len(), 1);
      }
      other => panic!("unexpected {:?}", other),
    }
    assert!(app.status().is_some());
  }

  #[tokio::test]
  async fn test_unknown_issue_shows_not_found() {
    let mut app = app(transport(), None);
    app.handle_key(key(KeyCode::Char('i')));
    assert_eq!(app.mode(), Mode::EditingIssue);

    for c in "NOPE-1".chars() {
      app.handle_key(key(KeyCode::Char(c)));
    }
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.mode(), Mode::Normal);

    drain(&mut app).await;
    assert_eq!(app.issue(), &IssueLookup::NotFound("NOPE-1".into()));
  }

  #[tokio::test]
  async fn test_search_failure_is_reported() {
    let transport = Arc::new(MockTransport::new().on_post_status("/rest/api/3/search", 503));
    let mut app = app(transport, None);

    drain(&mut app).await;
    assert!(matches!(app.recent(), RecentIssues::Failed(msg) if msg.contains("503")));
  }

  #[tokio::test]
  async fn test_refresh_refetches_with_zero_ttl() {
    let transport = transport();
    let mut app = app(transport.clone(), Some("TEST-5"));
    drain(&mut app).await;
    assert_eq!(transport.call_count(), 3);

    app.handle_key(key(KeyCode::Char('r')));
    assert_eq!(app.recent(), &RecentIssues::Loading);
    drain(&mut app).await;

    // Issue and search refetch; the project list is still cached
    assert_eq!(transport.call_count(), 5);
  }

  #[tokio::test]
  async fn test_connection_check_counts_projects() {
    let mut app = app(transport(), None);
    assert_eq!(app.connection_check(), &ConnectionCheck::Pending);

    drain(&mut app).await;
    assert_eq!(app.connection_check(), &ConnectionCheck::Ok { projects: 1 });
  }

  #[tokio::test]
  async fn test_connection_check_reports_failure() {
    let transport = Arc::new(MockTransport::new().on_get_status("/rest/api/3/project", 401));
    let mut app = app(transport, None);

    drain(&mut app).await;
    assert!(matches!(app.connection_check(), ConnectionCheck::Failed(msg) if msg.contains("401")));
  }

  #[tokio::test]
  async fn test_cancelled_edit_does_not_leak_into_refresh() {
    let transport = transport();
    let mut app = app(transport.clone(), Some("TEST-5"));
    drain(&mut app).await;

    app.handle_key(key(KeyCode::Char('i')));
    for c in "NOPE-1".chars() {
      app.handle_key(key(KeyCode::Char(c)));
    }
    app.handle_key(key(KeyCode::Esc));
    assert_eq!(app.issue_input().value(), "TEST-5");

    app.handle_key(key(KeyCode::Char('r')));
    assert_eq!(app.issue(), &IssueLookup::Loading("TEST-5".into()));
    drain(&mut app).await;

    let issue_paths: Vec<String> = transport
      .calls()
      .iter()
      .map(|c| c.url.path().to_string())
      .filter(|p| p.starts_with("/rest/api/3/issue/"))
      .collect();
    assert_eq!(issue_paths, vec!["/rest/api/3/issue/TEST-5"; 2]);
  }

  #[tokio::test]
  async fn test_empty_search_loads_empty_dashboard() {
    let transport = Arc::new(
      MockTransport::new().on_post("/rest/api/3/search", json!({ "total": 0, "issues": [] })),
    );
    let mut app = app(transport, None);
    drain(&mut app).await;

    assert!(matches!(app.recent(), RecentIssues::Loaded(d) if d.is_empty()));
    assert_eq!(app.issue(), &IssueLookup::Idle);
  }

  #[test]
  fn test_tab_switching_and_quit() {
    let mut app = app(transport(), None);
    app.handle_key(key(KeyCode::Tab));
    assert_eq!(app.tab(), Tab::CredentialSetup);

    // editing keys do nothing off the dashboard
    app.handle_key(key(KeyCode::Char('i')));
    assert_eq!(app.mode(), Mode::Normal);

    app.handle_key(key(KeyCode::Char('1')));
    assert_eq!(app.tab(), Tab::Dashboard);

    app.handle_key(key(KeyCode::Char('q')));
    assert!(app.should_quit);
  }

  #[test]
  fn test_escape_cancels_editing() {
    let mut app = app(transport(), Some("TEST-5"));
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(key(KeyCode::Char('9')));
    app.handle_key(key(KeyCode::Esc));

    assert_eq!(app.mode(), Mode::Normal);
    assert_eq!(app.issue(), &IssueLookup::Loading("TEST-5".into()));
  }

  #[test]
  fn test_ctrl_c_quits_while_editing() {
    let mut app = app(transport(), None);
    app.handle_key(key(KeyCode::Char('/')));
    app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(app.should_quit);
  }
}
