use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::Tab;

/// Draw the header bar with logo, Jira domain and the tab strip
pub fn draw_header(frame: &mut Frame, area: Rect, jira_url: &str, active: Tab) {
  let domain = extract_domain(jira_url);

  let mut spans = vec![
    Span::styled(" jiradash ", Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", domain), Style::default().fg(Color::White)),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
  ];

  for (i, tab) in Tab::ALL.iter().enumerate() {
    let style = if *tab == active {
      Style::default().fg(Color::Yellow).bold()
    } else {
      Style::default().fg(Color::DarkGray)
    };
    spans.push(Span::raw(" "));
    spans.push(Span::styled(format!("<{}>", i + 1), Style::default().fg(Color::Cyan)));
    spans.push(Span::styled(format!(" {} ", tab.title()), style));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}

/// Extract domain from Jira URL
fn extract_domain(url: &str) -> &str {
  url
    .strip_prefix("https://")
    .or_else(|| url.strip_prefix("http://"))
    .unwrap_or(url)
    .split('/')
    .next()
    .unwrap_or(url)
}
