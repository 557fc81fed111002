use ratatui::prelude::Color;

/// Truncate a string to at most `max_len` chars, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Get the display color for a Jira issue status
pub fn status_color(status: &str) -> Color {
  match status {
    "Done" | "Closed" | "Resolved" => Color::Green,
    "In Progress" | "In Review" => Color::Yellow,
    _ => Color::White,
  }
}
