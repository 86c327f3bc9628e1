//! Contract types for the public-procurement record under review.
//!
//! A contract is created externally (seed data or a future backend) and is
//! loaded wholesale. The reviewer only ever changes its [`ContractStatus`]
//! and, once a deep search resolves, one of its analysis fields.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::{Error, Result};

// ─── Workflow status ─────────────────────────────────────────────────────────

/// The reviewer's workflow bucket for a contract. Exactly one at a time.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContractStatus {
  #[default]
  Active,
  Bookmarked,
  Hidden,
  Completed,
}

impl ContractStatus {
  /// Parse a status name, rejecting anything outside the four buckets.
  pub fn parse(s: &str) -> Result<Self> {
    s.parse().map_err(|_| Error::UnknownStatus(s.to_owned()))
  }

  /// The status a toggle button produces: pressing the button for the
  /// status the contract already has returns it to `Active`.
  pub fn toggled(self, target: ContractStatus) -> ContractStatus {
    if self == target { ContractStatus::Active } else { target }
  }

  /// Tab label shown in the dashboard.
  pub fn label(self) -> &'static str {
    match self {
      Self::Active => "Aktivní",
      Self::Bookmarked => "Záložky",
      Self::Hidden => "Skryté",
      Self::Completed => "Zkontrolované",
    }
  }
}

// ─── Value tier ──────────────────────────────────────────────────────────────

/// Upper bound (inclusive) of the `Low` value tier.
pub const LOW_VALUE_LIMIT: f64 = 500_000.0;
/// Upper bound (inclusive) of the `Medium` value tier.
pub const MEDIUM_VALUE_LIMIT: f64 = 5_000_000.0;

/// Derived value tier of a contract.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ValueCategory {
  Low,
  Medium,
  High,
}

impl ValueCategory {
  pub fn of(value: f64) -> Self {
    if value <= LOW_VALUE_LIMIT {
      Self::Low
    } else if value <= MEDIUM_VALUE_LIMIT {
      Self::Medium
    } else {
      Self::High
    }
  }

  /// Inclusive `(min, max)` value bounds covering exactly this tier, in the
  /// shape accepted by [`crate::query::FilterState::set_value_range`].
  pub fn bounds(self) -> (Option<f64>, Option<f64>) {
    match self {
      Self::Low => (None, Some(LOW_VALUE_LIMIT)),
      Self::Medium => (Some(just_above(LOW_VALUE_LIMIT)), Some(MEDIUM_VALUE_LIMIT)),
      Self::High => (Some(just_above(MEDIUM_VALUE_LIMIT)), None),
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::Low => "Do 500 tisíc Kč",
      Self::Medium => "Do 5 milionů Kč",
      Self::High => "Nad 5 milionů Kč",
    }
  }
}

/// The smallest `f64` strictly greater than a positive finite `x`.
fn just_above(x: f64) -> f64 { f64::from_bits(x.to_bits() + 1) }

// ─── Risk barometer ──────────────────────────────────────────────────────────

/// Barometer zone of a 0–100 risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RiskLevel {
  Low,
  Medium,
  High,
}

impl RiskLevel {
  pub fn of(score: u8) -> Self {
    match score {
      71.. => Self::High,
      41..=70 => Self::Medium,
      _ => Self::Low,
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::Low => "Nízké riziko",
      Self::Medium => "Střední riziko",
      Self::High => "Vysoké riziko",
    }
  }
}

// ─── Findings ────────────────────────────────────────────────────────────────

/// Severity of an audit finding. Czech spellings are accepted on input.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
  #[serde(alias = "nízká")]
  Low,
  #[serde(alias = "střední")]
  Medium,
  #[serde(alias = "vysoká")]
  High,
}

impl Severity {
  /// Ordinal weight used when comparing finding profiles.
  pub fn weight(self) -> u8 {
    match self {
      Self::Low => 1,
      Self::Medium => 2,
      Self::High => 3,
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::Low => "nízká",
      Self::Medium => "střední",
      Self::High => "vysoká",
    }
  }
}

/// A single risk finding from the audit of a contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
  pub severity:    Severity,
  pub category:    String,
  pub description: String,
}

// ─── Contract ────────────────────────────────────────────────────────────────

/// A public-procurement contract as seen by the reviewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
  pub id:                     String,
  pub title:                  String,
  #[serde(default)]
  pub description:            String,
  pub sector:                 String,
  pub region:                 String,
  #[serde(alias = "contractingAuthority")]
  pub contracting_authority:  String,
  #[serde(default)]
  pub supplier:               Option<String>,
  #[serde(default)]
  pub administrator:          Option<String>,
  /// Contract value in CZK; never negative.
  #[serde(deserialize_with = "non_negative")]
  pub value:                  f64,
  pub deadline:               NaiveDate,
  #[serde(alias = "createdAt")]
  pub created_at:             NaiveDate,
  #[serde(default)]
  pub status:                 ContractStatus,
  /// Barometer score, clamped to `0..=100` on input.
  #[serde(default, alias = "riskScore", deserialize_with = "clamped_risk_score")]
  pub risk_score:             Option<u8>,
  #[serde(default)]
  pub findings:               Vec<Finding>,
  #[serde(default)]
  pub recommendations:        Vec<String>,
  /// Deep-search report on the contracting authority (markdown).
  #[serde(default)]
  pub analysis:               Option<String>,
  #[serde(default, alias = "supplierAnalysis")]
  pub supplier_analysis:      Option<String>,
  #[serde(default, alias = "administratorAnalysis")]
  pub administrator_analysis: Option<String>,
  #[serde(default, alias = "additionalInfo")]
  pub additional_info:        Option<String>,
}

impl Contract {
  pub fn value_category(&self) -> ValueCategory { ValueCategory::of(self.value) }

  pub fn risk_level(&self) -> Option<RiskLevel> { self.risk_score.map(RiskLevel::of) }

  /// Count of findings at each severity, `[low, medium, high]`.
  pub fn severity_counts(&self) -> [usize; 3] {
    let mut counts = [0; 3];
    for finding in &self.findings {
      counts[usize::from(finding.severity.weight() - 1)] += 1;
    }
    counts
  }
}

// ─── Serde helpers ───────────────────────────────────────────────────────────

fn clamped_risk_score<'de, D>(deserializer: D) -> std::result::Result<Option<u8>, D::Error>
where
  D: Deserializer<'de>,
{
  let raw: Option<f64> = Option::deserialize(deserializer)?;
  Ok(raw.filter(|v| v.is_finite()).map(|v| v.round().clamp(0.0, 100.0) as u8))
}

fn non_negative<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
  D: Deserializer<'de>,
{
  let raw = f64::deserialize(deserializer)?;
  if raw.is_finite() && raw >= 0.0 {
    Ok(raw)
  } else {
    Err(serde::de::Error::custom(format!("contract value must be a non-negative number, got {raw}")))
  }
}
