use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::ConnectionCheck;

const CONFIG_EXAMPLE: &[&str] = &[
  "jira:",
  "  url: https://your-domain.atlassian.net",
  "credentials:",
  "  username: user@email.com          # email of the Jira user",
  "  password: password_or_api_token   # password or API token",
];

const SECRETS_EXAMPLE: &[&str] = &[
  "credentials:",
  "  username: user@email.com",
  "  password: password_or_api_token",
];

const ENV_EXAMPLE: &[&str] = &[
  "export JIRADASH_CREDENTIALS_USERNAME=user@email.com",
  "export JIRADASH_CREDENTIALS_PASSWORD=password_or_api_token",
];

/// Help screen describing where credentials can come from
pub fn draw_credential_setup(frame: &mut Frame, area: Rect, check: &ConnectionCheck) {
  let heading = Style::default().fg(Color::Yellow).bold();
  let code = Style::default().fg(Color::Cyan);
  let note = Style::default().fg(Color::DarkGray);

  let status = match check {
    ConnectionCheck::Pending => Line::styled("Checking connection...", note),
    ConnectionCheck::Ok { projects } => Line::styled(
      format!("Connected, {} projects visible", projects),
      Style::default().fg(Color::Green),
    ),
    ConnectionCheck::Failed(e) => Line::styled(
      format!("Connection check failed: {}", e),
      Style::default().fg(Color::Red),
    ),
  };

  let mut lines = vec![
    status,
    Line::raw(""),
    Line::styled("Inline, in config.yaml", heading),
    Line::styled(
      "~/.config/jiradash/config.yaml or ./jiradash.yaml",
      note,
    ),
  ];
  lines.extend(CONFIG_EXAMPLE.iter().map(|l| Line::styled(*l, code)));

  lines.push(Line::raw(""));
  lines.push(Line::styled("Using a secrets file", heading));
  lines.push(Line::styled(
    "secrets.yaml next to config.yaml, used when config has no credentials",
    note,
  ));
  lines.extend(SECRETS_EXAMPLE.iter().map(|l| Line::styled(*l, code)));

  lines.push(Line::raw(""));
  lines.push(Line::styled("Using environment variables", heading));
  lines.push(Line::styled("These take precedence over secrets.yaml", note));
  lines.extend(ENV_EXAMPLE.iter().map(|l| Line::styled(*l, code)));

  let block = Block::default()
    .title(" Credential Setup ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  let paragraph = Paragraph::new(lines)
    .block(block)
    .wrap(Wrap { trim: false });
  frame.render_widget(paragraph, area);
}
