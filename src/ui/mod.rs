pub mod components;
mod renderfns;
mod views;

use crate::app::{App, Mode, Tab};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Main content
      Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

  renderfns::draw_header(frame, chunks[0], app.jira_url(), app.tab());

  match app.tab() {
    Tab::Dashboard => views::draw_dashboard(
      frame,
      chunks[1],
      app.issue_input(),
      app.mode(),
      app.issue(),
      app.recent(),
    ),
    Tab::CredentialSetup => {
      views::draw_credential_setup(frame, chunks[1], app.connection_check())
    }
  }

  draw_status_bar(frame, chunks[2], app);
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
  let hint = match (app.mode(), app.tab()) {
    (Mode::EditingIssue, _) => " Enter:look up  Esc:cancel",
    (Mode::Normal, Tab::Dashboard) => " i:issue  r:refresh  Tab:switch  q:quit",
    (Mode::Normal, Tab::CredentialSetup) => " Tab:switch  q:quit",
  };

  let mut spans = vec![Span::styled(hint, Style::default().fg(Color::DarkGray))];
  if let Some(status) = app.status() {
    spans.push(Span::styled(
      format!("  │ {}", status),
      Style::default().fg(Color::DarkGray),
    ));
  }

  frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
