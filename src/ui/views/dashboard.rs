use ratatui::prelude::*;
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Row, Table};

use crate::app::{IssueLookup, Mode, RecentIssues};
use crate::dashboard::{Dashboard, Metrics, StatusCount};
use crate::jira::types::IssueRow;
use crate::ui::components::TextInput;
use crate::ui::renderfns::{status_color, truncate};

pub fn draw_dashboard(
  frame: &mut Frame,
  area: Rect,
  input: &TextInput,
  mode: Mode,
  issue: &IssueLookup,
  recent: &RecentIssues,
) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(5), // Single issue view
      Constraint::Min(8),    // Recent issues
    ])
    .split(area);

  draw_single_issue(frame, chunks[0], input, mode, issue);

  match recent {
    RecentIssues::Loading => draw_message(
      frame,
      chunks[1],
      " Recent Issues ",
      "Loading recent issues...",
      Color::DarkGray,
    ),
    RecentIssues::Failed(e) => draw_message(frame, chunks[1], " Recent Issues ", e, Color::Red),
    RecentIssues::Loaded(summary) if summary.is_empty() => draw_message(
      frame,
      chunks[1],
      " Recent Issues ",
      "No issues found",
      Color::Red,
    ),
    RecentIssues::Loaded(summary) => draw_recent(frame, chunks[1], summary),
  }
}

fn draw_single_issue(
  frame: &mut Frame,
  area: Rect,
  input: &TextInput,
  mode: Mode,
  issue: &IssueLookup,
) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
    .split(area);

  let editing = mode == Mode::EditingIssue;
  let border = if editing { Color::Yellow } else { Color::Blue };
  let input_block = Block::default()
    .title(" Issue ID ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border));

  let hint = if editing {
    "Enter: look up  Esc: cancel"
  } else {
    "i: enter an issue ID, e.g. TEST-5"
  };
  let lines = vec![
    Line::from(input.value()),
    Line::styled(hint, Style::default().fg(Color::DarkGray)),
  ];
  frame.render_widget(Paragraph::new(lines).block(input_block), cols[0]);

  if editing {
    // +1 for the border
    let offset = u16::try_from(input.cursor_position()).unwrap_or(u16::MAX);
    let x = cols[0]
      .x
      .saturating_add(1)
      .saturating_add(offset)
      .min(cols[0].right().saturating_sub(2));
    frame.set_cursor_position(Position::new(x, cols[0].y + 1));
  }

  let detail_block = Block::default()
    .title(" Single Issue ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  let (text, color) = match issue {
    IssueLookup::Found(detail) => {
      let rows = vec![Row::new(vec![
        detail.summary.clone(),
        detail.assignee.clone(),
        detail.status.clone(),
      ])
      .style(Style::default().fg(status_color(&detail.status)))];
      let table = Table::new(
        rows,
        [
          Constraint::Min(20),
          Constraint::Length(20),
          Constraint::Length(14),
        ],
      )
      .header(header_row(&["Summary", "Assignee", "Status"]))
      .block(detail_block);
      frame.render_widget(table, cols[1]);
      return;
    }
    IssueLookup::Idle => (String::new(), Color::DarkGray),
    IssueLookup::Loading(id) => (format!("Loading {}...", id), Color::DarkGray),
    IssueLookup::NotFound(id) => (format!("Issue not found: {}", id), Color::Red),
    IssueLookup::Failed(e) => (e.clone(), Color::Red),
  };

  let paragraph = Paragraph::new(text)
    .style(Style::default().fg(color))
    .block(detail_block);
  frame.render_widget(paragraph, cols[1]);
}

fn draw_recent(frame: &mut Frame, area: Rect, summary: &Dashboard) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(3), Constraint::Min(5)])
    .split(area);

  draw_metrics(frame, rows[0], &summary.metrics);

  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
    .split(rows[1]);

  draw_status_breakdown(frame, cols[0], &summary.status_counts);
  draw_backlog(frame, cols[1], &summary.backlog);
}

fn draw_metrics(frame: &mut Frame, area: Rect, metrics: &Metrics) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([
      Constraint::Ratio(1, 3),
      Constraint::Ratio(1, 3),
      Constraint::Ratio(1, 3),
    ])
    .split(area);

  let cards = [
    ("Total Issues", metrics.total, Color::Cyan),
    ("Completed", metrics.completed, Color::Green),
    ("In Progress", metrics.in_progress, Color::Yellow),
  ];

  for ((label, value, color), area) in cards.into_iter().zip(cols.iter()) {
    let block = Block::default()
      .title(format!(" {} ", label))
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::DarkGray));
    let paragraph = Paragraph::new(value.to_string())
      .style(Style::default().fg(color).bold())
      .alignment(Alignment::Center)
      .block(block);
    frame.render_widget(paragraph, *area);
  }
}

fn draw_status_breakdown(frame: &mut Frame, area: Rect, counts: &[StatusCount]) {
  let bars: Vec<Bar> = counts
    .iter()
    .map(|c| {
      Bar::default()
        .value(c.count as u64)
        .label(Line::from(truncate(&c.status, 12)))
        .style(Style::default().fg(status_color(&c.status)))
    })
    .collect();

  let chart = BarChart::default()
    .block(
      Block::default()
        .title(" Status Breakdown ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue)),
    )
    .data(BarGroup::default().bars(&bars))
    .bar_width(12)
    .bar_gap(2);

  frame.render_widget(chart, area);
}

fn draw_backlog(frame: &mut Frame, area: Rect, backlog: &[IssueRow]) {
  let block = Block::default()
    .title(format!(" Unassigned Backlog ({}) ", backlog.len()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  let rows: Vec<Row> = backlog
    .iter()
    .map(|issue| {
      let status = issue.status.as_deref().unwrap_or("-");
      Row::new(vec![
        Span::styled(issue.key.clone(), Style::default().fg(Color::Cyan)),
        Span::raw(truncate(&issue.summary, 60)),
        Span::styled(status.to_string(), Style::default().fg(status_color(status))),
      ])
    })
    .collect();

  let table = Table::new(
    rows,
    [
      Constraint::Length(12),
      Constraint::Min(20),
      Constraint::Length(14),
    ],
  )
  .header(header_row(&["Key", "Summary", "Status"]))
  .block(block);

  frame.render_widget(table, area);
}

fn header_row(titles: &[&'static str]) -> Row<'static> {
  Row::new(titles.to_vec()).style(
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  )
}

fn draw_message(frame: &mut Frame, area: Rect, title: &str, message: &str, color: Color) {
  let block = Block::default()
    .title(title.to_string())
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));
  let paragraph = Paragraph::new(message.to_string())
    .style(Style::default().fg(color))
    .block(block);
  frame.render_widget(paragraph, area);
}
