//! TUI rendering: header, status tabs, list and detail panes, status bar.

pub mod contract_detail;
pub mod contract_list;
pub mod format;

use doris_core::{
  contract::{ContractStatus, RiskLevel},
  query::SortBy,
};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Tabs},
};
use strum::IntoEnumIterator;

use crate::app::{App, Focus};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Length(1), // status tabs
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(f.area());

  draw_header(f, rows[0], app);
  draw_tabs(f, rows[1], app);
  draw_body(f, rows[2], app);
  draw_status(f, rows[3], app);
}

/// Barometer colour for a risk score.
pub fn risk_color(score: Option<u8>) -> Color {
  match score.map(RiskLevel::of) {
    Some(RiskLevel::High) => Color::Red,
    Some(RiskLevel::Medium) => Color::Yellow,
    Some(RiskLevel::Low) => Color::Green,
    None => Color::DarkGray,
  }
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let left = Span::styled(
    " doris  [/] hledat  [x] zrušit filtry  [q] konec",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(filter_summary(app), Style::default().fg(Color::Gray));

  let left_width = left.content.chars().count() as u16;
  let right_width = right.content.chars().count() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

fn filter_summary(app: &App) -> String {
  let filters = &app.filters;
  let or_all = |s: &str| if s.is_empty() { "vše".to_owned() } else { s.to_owned() };
  let value = match (filters.value_category(), filters.value_min(), filters.value_max()) {
    (Some(category), ..) => category.label().to_owned(),
    (None, None, None) => "vše".to_owned(),
    (None, min, max) => format!(
      "{} až {}",
      min.map(format::money).unwrap_or_default(),
      max.map(format::money).unwrap_or_default()
    ),
  };
  let sort = if filters.sort_by == SortBy::None { "-" } else { filters.sort_by.label() };
  format!(
    "[s] {}  [r] {}  [v] {value}  [o] {sort} ",
    or_all(&filters.sector),
    or_all(&filters.region),
  )
}

// ─── Tabs ─────────────────────────────────────────────────────────────────────

fn draw_tabs(f: &mut Frame, area: Rect, app: &App) {
  let partitions = app.partitions();
  let titles: Vec<Line> = ContractStatus::iter()
    .map(|status| Line::from(format!(" {} ({}) ", status.label(), partitions.count(status))))
    .collect();
  let selected = ContractStatus::iter().position(|s| s == app.tab).unwrap_or(0);

  let tabs = Tabs::new(titles)
    .select(selected)
    .divider("│")
    .style(Style::default().fg(Color::Gray))
    .highlight_style(
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    );
  f.render_widget(tabs, area);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
    .split(area);

  contract_list::draw(f, cols[0], app);

  if app.selected().is_some() {
    contract_detail::draw(f, cols[1], app);
  } else {
    draw_empty_detail(f, cols[1]);
  }
}

fn draw_empty_detail(f: &mut Frame, area: Rect) {
  let block = Block::default()
    .title(" Detail ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(
    Paragraph::new(Line::from(vec![Span::styled(
      "Vyberte zakázku a stiskněte Enter.",
      Style::default().fg(Color::DarkGray),
    )])),
    inner,
  );
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match app.focus {
    Focus::List if app.query_active => ("HLEDAT", "Pište dotaz  Esc zrušit  Enter potvrdit"),
    Focus::List => (
      "SEZNAM",
      "↑↓/jk pohyb  Tab záložky  Enter detail  b/h/c stav  K/J přesun  s/r/v/o filtry",
    ),
    Focus::Detail => (
      "DETAIL",
      "↑↓/jk posun  1/2/3 analýza  d dokumenty  [ ] výběr  w stáhnout  b/h/c stav  Esc zpět",
    ),
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(format!("  {status}"), Style::default().fg(Color::DarkGray));

  f.render_widget(
    Paragraph::new(Line::from(vec![mode_span, hint_span])).style(Style::default().bg(Color::Black)),
    area,
  );
}
