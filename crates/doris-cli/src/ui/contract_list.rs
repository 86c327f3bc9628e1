//! Contract list pane (left panel).

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::{format, risk_color};
use crate::app::{App, Focus};

/// Render the contract list into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let visible = app.visible();
  let in_tab = app.partitions().count(app.tab);

  let title = if app.query_active || !app.query.is_empty() {
    format!(" {} ({}/{}) ", app.tab.label(), visible.len(), in_tab)
  } else {
    format!(" {} ({}) ", app.tab.label(), in_tab)
  };

  let border = if app.focus == Focus::List { Color::Cyan } else { Color::DarkGray };
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border));

  let title_width = usize::from(area.width.saturating_sub(9));
  let items: Vec<ListItem> = visible
    .iter()
    .map(|contract| {
      let badge = match contract.risk_score {
        Some(score) => format!("{score:>3} "),
        None => "  - ".to_owned(),
      };
      let badge_style = Style::default()
        .fg(risk_color(contract.risk_score))
        .add_modifier(Modifier::BOLD);

      let subtitle = format!(
        "     {} · {} · {}",
        format::ellipsize(&contract.contracting_authority, title_width.saturating_sub(24)),
        format::money(contract.value),
        format::date(contract.deadline),
      );

      ListItem::new(vec![
        Line::from(vec![
          Span::styled(badge, badge_style),
          Span::raw(format::ellipsize(&contract.title, title_width)),
        ]),
        Line::from(Span::styled(subtitle, Style::default().fg(Color::DarkGray))),
      ])
    })
    .collect();

  let mut inner_area = block.inner(area);
  f.render_widget(block, area);

  // Quick-find bar at the bottom of the pane.
  if (app.query_active || !app.query.is_empty()) && inner_area.height > 2 {
    let query_area = Rect {
      x:      inner_area.x,
      y:      inner_area.y + inner_area.height - 1,
      width:  inner_area.width,
      height: 1,
    };
    inner_area.height = inner_area.height.saturating_sub(1);

    let query_text = if app.query_active {
      format!("/{}_", app.query)
    } else {
      format!("/{}", app.query)
    };
    f.render_widget(
      Paragraph::new(query_text).style(Style::default().fg(Color::Yellow)),
      query_area,
    );
  }

  if visible.is_empty() {
    f.render_widget(
      Paragraph::new("Žádné zakázky neodpovídají filtrům.")
        .style(Style::default().fg(Color::DarkGray)),
      inner_area,
    );
    return;
  }

  let mut state = ListState::default();
  state.select(Some(app.list_cursor));

  f.render_stateful_widget(
    List::new(items).highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    inner_area,
    &mut state,
  );
}
