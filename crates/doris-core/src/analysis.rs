//! Deep search: third-party analysis of the parties to a contract.
//!
//! An [`Analyzer`] turns a subject name into a markdown report. Failures
//! never reach the UI as errors; [`analyze_or_placeholder`] converts them
//! into a visible placeholder string.

use std::{fmt, future::Future};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::contract::Contract;

/// Prefix of the text stored in place of a failed analysis.
pub const PLACEHOLDER_PREFIX: &str = "⚠️ Analýza není dostupná";

/// Which party of a contract a deep search is about.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AnalysisTarget {
  Authority,
  Supplier,
  Administrator,
}

impl AnalysisTarget {
  /// Name of the party to search for, if the contract records one.
  pub fn subject_name(self, contract: &Contract) -> Option<&str> {
    let name = match self {
      Self::Authority => Some(contract.contracting_authority.as_str()),
      Self::Supplier => contract.supplier.as_deref(),
      Self::Administrator => contract.administrator.as_deref(),
    };
    name.filter(|name| !name.trim().is_empty())
  }

  /// The stored report for this party.
  pub fn report(self, contract: &Contract) -> Option<&str> {
    match self {
      Self::Authority => contract.analysis.as_deref(),
      Self::Supplier => contract.supplier_analysis.as_deref(),
      Self::Administrator => contract.administrator_analysis.as_deref(),
    }
  }

  /// Merge a finished report into the matching field.
  pub fn assign(self, contract: &mut Contract, markdown: String) {
    let slot = match self {
      Self::Authority => &mut contract.analysis,
      Self::Supplier => &mut contract.supplier_analysis,
      Self::Administrator => &mut contract.administrator_analysis,
    };
    *slot = Some(markdown);
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::Authority => "Zadavatel",
      Self::Supplier => "Dodavatel",
      Self::Administrator => "Administrátor",
    }
  }
}

/// Abstraction over the natural-language analysis collaborator.
pub trait Analyzer: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn analyze<'a>(
    &'a self,
    subject_name: &'a str,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;
}

/// Placeholder text for a failed analysis.
pub fn placeholder(reason: impl fmt::Display) -> String { format!("{PLACEHOLDER_PREFIX}: {reason}") }

/// Whether `report` is a placeholder rather than a real analysis.
pub fn is_placeholder(report: &str) -> bool { report.starts_with(PLACEHOLDER_PREFIX) }

/// Run one best-effort analysis; errors become a placeholder string.
pub async fn analyze_or_placeholder<A: Analyzer>(analyzer: &A, subject_name: &str) -> String {
  match analyzer.analyze(subject_name).await {
    Ok(report) if !report.trim().is_empty() => report,
    Ok(_) => placeholder("prázdná odpověď"),
    Err(e) => placeholder(e),
  }
}
