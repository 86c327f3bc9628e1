//! Pairwise contract similarity and the "similar contracts" list.
//!
//! A [`SimilarityScore`] has three axes, each in `0..=100`:
//!
//! - `sector`: 100 on an exact sector match, otherwise 0.
//! - `price`: relative closeness of the two values.
//! - `severity`: supplied by a pluggable [`SeverityMeasure`]. The default,
//!   [`IdHashSeverity`], is a placeholder that hashes the two ids and does
//!   not look at findings at all. [`FindingsSeverity`] compares the finding
//!   profiles instead and can be swapped in without touching callers.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::contract::Contract;

// ─── Score ───────────────────────────────────────────────────────────────────

/// Derived, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimilarityScore {
  pub sector:   u8,
  pub price:    f64,
  pub severity: u8,
}

/// Closeness of two non-negative values: 100 when equal, falling linearly to
/// 0 as the difference reaches the larger value.
pub fn price_closeness(a: f64, b: f64) -> f64 {
  if a == b {
    return 100.0;
  }
  let larger = a.max(b);
  (100.0 - (a - b).abs() / larger * 100.0).clamp(0.0, 100.0)
}

// ─── Severity measures ───────────────────────────────────────────────────────

/// Strategy for the `severity` axis.
pub trait SeverityMeasure {
  fn severity(&self, reference: &Contract, candidate: &Contract) -> u8;
}

/// Placeholder severity: a SHA-256 of the two ids folded into `40..100`.
///
/// Deterministic and order-independent, but carries no meaning about the
/// contracts' findings.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdHashSeverity;

impl SeverityMeasure for IdHashSeverity {
  fn severity(&self, reference: &Contract, candidate: &Contract) -> u8 {
    let (first, second) = if reference.id <= candidate.id {
      (&reference.id, &candidate.id)
    } else {
      (&candidate.id, &reference.id)
    };

    let mut hasher = Sha256::new();
    hasher.update(first.as_bytes());
    hasher.update([0u8]);
    hasher.update(second.as_bytes());
    let digest = hasher.finalize();

    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(head) % 60) as u8 + 40
  }
}

/// Compares the mean severity weight of the two contracts' findings.
///
/// Two contracts without findings score 100; one without findings against
/// one with findings scores 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct FindingsSeverity;

impl FindingsSeverity {
  fn mean_weight(contract: &Contract) -> Option<f64> {
    if contract.findings.is_empty() {
      return None;
    }
    let total: u32 = contract.findings.iter().map(|f| u32::from(f.severity.weight())).sum();
    Some(f64::from(total) / contract.findings.len() as f64)
  }
}

impl SeverityMeasure for FindingsSeverity {
  fn severity(&self, reference: &Contract, candidate: &Contract) -> u8 {
    match (Self::mean_weight(reference), Self::mean_weight(candidate)) {
      (None, None) => 100,
      (Some(_), None) | (None, Some(_)) => 0,
      // Weights span 1..=3, so the largest possible gap is 2.
      (Some(a), Some(b)) => (100.0 - (a - b).abs() / 2.0 * 100.0).round() as u8,
    }
  }
}

// ─── Scorer ──────────────────────────────────────────────────────────────────

/// A candidate shown in the "similar contracts" section.
#[derive(Debug, Clone, Copy)]
pub struct SimilarContract<'a> {
  pub contract: &'a Contract,
  pub score:    SimilarityScore,
}

/// Scores contract pairs with a chosen [`SeverityMeasure`].
#[derive(Debug, Clone, Default)]
pub struct SimilarityScorer<M = IdHashSeverity> {
  measure: M,
}

impl<M: SeverityMeasure> SimilarityScorer<M> {
  pub fn new(measure: M) -> Self { Self { measure } }

  /// Score `candidate` against `reference`. Returns `None` for the same id.
  pub fn score(&self, reference: &Contract, candidate: &Contract) -> Option<SimilarityScore> {
    if reference.id == candidate.id {
      return None;
    }
    Some(SimilarityScore {
      sector:   if reference.sector == candidate.sector { 100 } else { 0 },
      price:    price_closeness(reference.value, candidate.value),
      severity: self.measure.severity(reference, candidate),
    })
  }

  /// Contracts in exactly the reference's sector, excluding the reference,
  /// ranked by price closeness (ties keep canonical order).
  pub fn similar<'a, I>(
    &self,
    reference: &Contract,
    contracts: I,
    limit: Option<usize>,
  ) -> Vec<SimilarContract<'a>>
  where
    I: IntoIterator<Item = &'a Contract>,
  {
    let mut found: Vec<SimilarContract<'a>> = contracts
      .into_iter()
      .filter(|c| c.sector == reference.sector)
      .filter_map(|c| self.score(reference, c).map(|score| SimilarContract { contract: c, score }))
      .collect();

    found.sort_by(|a, b| b.score.price.total_cmp(&a.score.price));
    if let Some(n) = limit {
      found.truncate(n);
    }
    found
  }
}

/// Score a pair with the default (placeholder) severity measure.
pub fn similarity(reference: &Contract, candidate: &Contract) -> Option<SimilarityScore> {
  SimilarityScorer::<IdHashSeverity>::default().score(reference, candidate)
}

/// The "similar contracts" list with the default scorer.
pub fn similar_contracts<'a, I>(
  reference: &Contract,
  contracts: I,
  limit: Option<usize>,
) -> Vec<SimilarContract<'a>>
where
  I: IntoIterator<Item = &'a Contract>,
{
  SimilarityScorer::<IdHashSeverity>::default().similar(reference, contracts, limit)
}
