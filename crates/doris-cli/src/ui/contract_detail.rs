//! Contract detail pane (right panel).
//!
//! One view for every status; only the header badge changes with the
//! contract's bucket.

use doris_core::{
  analysis::{AnalysisTarget, is_placeholder},
  contract::{Contract, Severity},
};
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};
use strum::IntoEnumIterator;

use super::{format, risk_color};
use crate::app::{App, Focus};

const BAROMETER_WIDTH: usize = 20;

// ─── Public entry ─────────────────────────────────────────────────────────────

/// Render the detail pane into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let Some(contract) = app.selected() else { return };

  let border = if app.focus == Focus::Detail { Color::Cyan } else { Color::DarkGray };
  let block = Block::default()
    .title(format!(" {} · {} ", contract.id, contract.status.label()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let mut lines: Vec<Line> = Vec::new();
  overview(&mut lines, contract);
  findings(&mut lines, contract);
  recommendations(&mut lines, contract);
  similar(&mut lines, app);
  documents(&mut lines, app);
  analyses(&mut lines, app, contract);

  let para = Paragraph::new(lines)
    .wrap(Wrap { trim: false })
    .scroll((app.detail_scroll, 0));
  f.render_widget(para, inner);
}

// ─── Sections ─────────────────────────────────────────────────────────────────

fn heading(lines: &mut Vec<Line<'static>>, text: &str) {
  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled(
    text.to_owned(),
    Style::default()
      .fg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  )));
}

fn field(lines: &mut Vec<Line<'static>>, label: &str, value: String) {
  lines.push(Line::from(vec![
    Span::styled(format!("{label:<14}"), Style::default().fg(Color::Gray)),
    Span::raw(value),
  ]));
}

fn dim(text: impl Into<String>) -> Line<'static> {
  Line::from(Span::styled(text.into(), Style::default().fg(Color::DarkGray)))
}

fn overview(lines: &mut Vec<Line<'static>>, contract: &Contract) {
  lines.push(Line::from(Span::styled(
    contract.title.clone(),
    Style::default().add_modifier(Modifier::BOLD),
  )));
  lines.push(Line::from(""));

  field(lines, "Zadavatel", contract.contracting_authority.clone());
  if let Some(supplier) = &contract.supplier {
    field(lines, "Dodavatel", supplier.clone());
  }
  if let Some(administrator) = &contract.administrator {
    field(lines, "Administrátor", administrator.clone());
  }
  field(lines, "Sektor", contract.sector.clone());
  field(lines, "Kraj", contract.region.clone());
  field(
    lines,
    "Hodnota",
    format!("{} ({})", format::money(contract.value), contract.value_category().label()),
  );
  field(lines, "Termín", format::date(contract.deadline));
  field(lines, "Vytvořeno", format::date(contract.created_at));

  let barometer = match (contract.risk_score, contract.risk_level()) {
    (Some(score), Some(level)) => Line::from(vec![
      Span::styled(format!("{:<14}", "Riziko"), Style::default().fg(Color::Gray)),
      Span::styled(
        format::barometer(score, BAROMETER_WIDTH),
        Style::default().fg(risk_color(Some(score))),
      ),
      Span::styled(
        format!(" {score} {}", level.label()),
        Style::default()
          .fg(risk_color(Some(score)))
          .add_modifier(Modifier::BOLD),
      ),
    ]),
    _ => dim(format!("{:<14}nehodnoceno", "Riziko")),
  };
  lines.push(barometer);

  if !contract.description.is_empty() {
    heading(lines, "Popis");
    lines.push(Line::from(contract.description.clone()));
  }
  if let Some(info) = &contract.additional_info {
    heading(lines, "Další informace");
    lines.push(Line::from(info.clone()));
  }
}

fn findings(lines: &mut Vec<Line<'static>>, contract: &Contract) {
  let [low, medium, high] = contract.severity_counts();
  heading(
    lines,
    &format!("Nálezy  (vysoká {high} · střední {medium} · nízká {low})"),
  );
  if contract.findings.is_empty() {
    lines.push(dim("Bez nálezů."));
    return;
  }
  for finding in &contract.findings {
    let color = match finding.severity {
      Severity::High => Color::Red,
      Severity::Medium => Color::Yellow,
      Severity::Low => Color::Green,
    };
    lines.push(Line::from(vec![
      Span::styled(
        format!("[{}] ", finding.severity.label()),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
      ),
      Span::styled(finding.category.clone(), Style::default().add_modifier(Modifier::BOLD)),
    ]));
    lines.push(Line::from(format!("  {}", finding.description)));
  }
}

fn recommendations(lines: &mut Vec<Line<'static>>, contract: &Contract) {
  if contract.recommendations.is_empty() {
    return;
  }
  heading(lines, "Doporučení");
  for rec in &contract.recommendations {
    lines.push(Line::from(format!("• {rec}")));
  }
}

fn similar(lines: &mut Vec<Line<'static>>, app: &App) {
  heading(lines, "Podobné zakázky");
  let similar = app.similar();
  if similar.is_empty() {
    lines.push(dim("Žádné zakázky ve stejném sektoru."));
    return;
  }
  for entry in similar {
    lines.push(Line::from(vec![
      Span::raw(format!("{}  ", entry.contract.title)),
      Span::styled(format::money(entry.contract.value), Style::default().fg(Color::Gray)),
    ]));
    lines.push(dim(format!(
      "  sektor {} · cena {:.0} · závažnost {}",
      entry.score.sector, entry.score.price, entry.score.severity
    )));
  }
}

fn documents(lines: &mut Vec<Line<'static>>, app: &App) {
  heading(lines, "Dokumenty");
  if !app.documents_configured() {
    lines.push(dim("Úložiště dokumentů není nakonfigurováno."));
    return;
  }
  if app.documents_loading {
    lines.push(dim("Načítám…"));
    return;
  }
  if app.documents_for != app.selected_id {
    lines.push(dim("[d] načíst dokumenty"));
    return;
  }
  if app.documents.is_empty() {
    lines.push(dim("Žádné dokumenty."));
    return;
  }
  for (i, doc) in app.documents.iter().enumerate() {
    let marker = if i == app.document_cursor { "▶ " } else { "  " };
    lines.push(Line::from(vec![
      Span::styled(marker, Style::default().fg(Color::Cyan)),
      Span::raw(doc.name.clone()),
      Span::styled(
        format!(
          "  {} · {}",
          format::file_size(doc.size_bytes),
          doc.uploaded_at.format("%-d. %-m. %Y %H:%M")
        ),
        Style::default().fg(Color::DarkGray),
      ),
    ]));
  }
}

fn analyses(lines: &mut Vec<Line<'static>>, app: &App, contract: &Contract) {
  heading(lines, "Hloubková analýza");
  for (key, target) in ('1'..).zip(AnalysisTarget::iter()) {
    let Some(name) = target.subject_name(contract) else { continue };
    lines.push(Line::from(vec![
      Span::styled(format!("[{key}] "), Style::default().fg(Color::Cyan)),
      Span::styled(
        format!("{}: {name}", target.label()),
        Style::default().add_modifier(Modifier::BOLD),
      ),
    ]));

    if app.is_analysing(&contract.id, target) {
      lines.push(dim("  Probíhá analýza…"));
      continue;
    }
    match target.report(contract) {
      Some(report) if is_placeholder(report) => {
        lines.push(Line::from(Span::styled(
          format!("  {report}"),
          Style::default().fg(Color::Yellow),
        )));
      }
      Some(report) => {
        lines.extend(report.lines().map(|l| Line::from(format!("  {l}"))));
      }
      None => lines.push(dim("  Analýza zatím nebyla spuštěna.")),
    }
  }
}
