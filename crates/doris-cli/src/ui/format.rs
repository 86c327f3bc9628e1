//! Display formatting shared by the panes and the plain-text subcommands.

use chrono::NaiveDate;

/// Czech short form of a CZK amount: `2.5 mil. Kč`, `750 tis. Kč`, `900 Kč`.
pub fn money(value: f64) -> String {
  if value >= 1_000_000.0 {
    format!("{:.1} mil. Kč", value / 1_000_000.0)
  } else if value >= 1_000.0 {
    format!("{:.0} tis. Kč", value / 1_000.0)
  } else {
    format!("{value} Kč")
  }
}

/// Human-readable byte count with at most two decimals, trailing zeros
/// dropped: `0 Bytes`, `1.5 KB`, `2 MB`.
pub fn file_size(bytes: u64) -> String {
  const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
  if bytes == 0 {
    return "0 Bytes".into();
  }
  let mut size = bytes as f64;
  let mut unit = 0;
  while size >= 1024.0 && unit < UNITS.len() - 1 {
    size /= 1024.0;
    unit += 1;
  }
  let rounded = format!("{size:.2}");
  let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
  format!("{trimmed} {}", UNITS[unit])
}

pub fn date(date: NaiveDate) -> String { date.format("%-d. %-m. %Y").to_string() }

/// Fixed-width barometer: filled cells proportional to `score` out of 100.
pub fn barometer(score: u8, width: usize) -> String {
  let filled = (usize::from(score.min(100)) * width).div_ceil(100);
  format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Truncate to `max` characters, marking the cut with an ellipsis.
pub fn ellipsize(text: &str, max: usize) -> String {
  if text.chars().count() <= max {
    return text.to_owned();
  }
  let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
  out.push('…');
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn money_tiers() {
    assert_eq!(money(2_500_000.0), "2.5 mil. Kč");
    assert_eq!(money(1_000_000.0), "1.0 mil. Kč");
    assert_eq!(money(750_000.0), "750 tis. Kč");
    assert_eq!(money(1_000.0), "1 tis. Kč");
    assert_eq!(money(999.0), "999 Kč");
    assert_eq!(money(0.0), "0 Kč");
  }

  #[test]
  fn file_sizes() {
    assert_eq!(file_size(0), "0 Bytes");
    assert_eq!(file_size(512), "512 Bytes");
    assert_eq!(file_size(1024), "1 KB");
    assert_eq!(file_size(1536), "1.5 KB");
    assert_eq!(file_size(5 * 1024 * 1024), "5 MB");
    assert_eq!(file_size(3 * 1024 * 1024 * 1024 * 1024), "3072 GB");
  }

  #[test]
  fn czech_date() {
    let d = NaiveDate::from_ymd_opt(2024, 7, 5).unwrap();
    assert_eq!(date(d), "5. 7. 2024");
  }

  #[test]
  fn barometer_fills_proportionally() {
    assert_eq!(barometer(0, 10), "░░░░░░░░░░");
    assert_eq!(barometer(100, 10), "██████████");
    assert_eq!(barometer(41, 10), "█████░░░░░");
    assert_eq!(barometer(50, 4), "██░░");
  }

  #[test]
  fn ellipsize_keeps_short_text() {
    assert_eq!(ellipsize("Brno", 10), "Brno");
    assert_eq!(ellipsize("Všeobecná nemocnice", 8), "Všeobec…");
  }
}
