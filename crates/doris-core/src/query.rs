//! The contract list pipeline: filter → sort → partition.
//!
//! All functions borrow from a canonical contract list and return fresh
//! vectors of references. Nothing here writes an ordering back; manual
//! reordering happens only in the store (see
//! [`crate::store::ContractStore::move_contract`]).

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::contract::{Contract, ContractStatus, ValueCategory};

// ─── Sort key ────────────────────────────────────────────────────────────────

/// Selectable list ordering. `None` keeps the canonical order.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SortBy {
  #[default]
  None,
  RiskLow,
  RiskHigh,
  ValueLow,
  ValueHigh,
}

impl SortBy {
  /// Parse a sort key; empty or unrecognised input means no sorting.
  pub fn parse_lossy(s: &str) -> Self { s.trim().parse().unwrap_or_default() }

  pub fn label(self) -> &'static str {
    match self {
      Self::None => "Výchozí pořadí",
      Self::RiskLow => "Riziko ↑",
      Self::RiskHigh => "Riziko ↓",
      Self::ValueLow => "Hodnota ↑",
      Self::ValueHigh => "Hodnota ↓",
    }
  }
}

// ─── Filter state ────────────────────────────────────────────────────────────

/// Transient query state for the contract list.
///
/// Empty `sector`/`region` strings and `None` bounds mean "no constraint".
/// The value bounds are kept ordered: [`FilterState::set_value_range`] swaps
/// them if a caller passes `min > max`, and drops non-finite bounds.
/// Deserialization goes through the same normalisation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawFilterState")]
pub struct FilterState {
  pub sector:  String,
  pub region:  String,
  value_min:   Option<f64>,
  value_max:   Option<f64>,
  pub sort_by: SortBy,
}

/// Wire shape of [`FilterState`] before the value range is normalised.
#[derive(Deserialize)]
struct RawFilterState {
  #[serde(default)]
  sector:    String,
  #[serde(default)]
  region:    String,
  #[serde(default)]
  value_min: Option<f64>,
  #[serde(default)]
  value_max: Option<f64>,
  #[serde(default)]
  sort_by:   SortBy,
}

impl From<RawFilterState> for FilterState {
  fn from(raw: RawFilterState) -> Self {
    let filters = FilterState {
      sector: raw.sector,
      region: raw.region,
      sort_by: raw.sort_by,
      ..FilterState::default()
    };
    filters.with_value_range(raw.value_min, raw.value_max)
  }
}

impl FilterState {
  pub fn value_min(&self) -> Option<f64> { self.value_min }

  pub fn value_max(&self) -> Option<f64> { self.value_max }

  /// Set both value bounds, normalising an inverted range by swapping.
  /// NaN and infinite bounds are dropped.
  pub fn set_value_range(&mut self, min: Option<f64>, max: Option<f64>) {
    let min = min.filter(|v| v.is_finite());
    let max = max.filter(|v| v.is_finite());
    let (min, max) = match (min, max) {
      (Some(lo), Some(hi)) if lo > hi => (Some(hi), Some(lo)),
      other => other,
    };
    self.value_min = min;
    self.value_max = max;
  }

  /// Builder form of [`FilterState::set_value_range`].
  pub fn with_value_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
    self.set_value_range(min, max);
    self
  }

  /// Restrict the value range to one [`ValueCategory`], or lift it.
  pub fn set_value_category(&mut self, category: Option<ValueCategory>) {
    let (min, max) = category.map(ValueCategory::bounds).unwrap_or((None, None));
    self.set_value_range(min, max);
  }

  /// The category whose bounds the current range exactly matches, if any.
  pub fn value_category(&self) -> Option<ValueCategory> {
    [ValueCategory::Low, ValueCategory::Medium, ValueCategory::High]
      .into_iter()
      .find(|c| c.bounds() == (self.value_min, self.value_max))
  }

  /// True when no predicate constrains the list.
  pub fn is_unconstrained(&self) -> bool {
    self.sector.is_empty()
      && self.region.is_empty()
      && self.value_min.is_none()
      && self.value_max.is_none()
  }

  /// Drop every predicate; the sort key is kept.
  pub fn clear(&mut self) {
    self.sector.clear();
    self.region.clear();
    self.value_min = None;
    self.value_max = None;
  }
}

// ─── Filter ──────────────────────────────────────────────────────────────────

/// Whether `contract` passes every predicate in `filters`.
pub fn matches(contract: &Contract, filters: &FilterState) -> bool {
  if !filters.sector.is_empty() && contract.sector != filters.sector {
    return false;
  }
  if !filters.region.is_empty() && contract.region != filters.region {
    return false;
  }
  if filters.value_min.is_some_and(|min| contract.value < min) {
    return false;
  }
  if filters.value_max.is_some_and(|max| contract.value > max) {
    return false;
  }
  true
}

/// Contracts that pass `filters`, in input order.
pub fn filter_contracts<'a, I>(contracts: I, filters: &FilterState) -> Vec<&'a Contract>
where
  I: IntoIterator<Item = &'a Contract>,
{
  contracts.into_iter().filter(|c| matches(c, filters)).collect()
}

// ─── Sort ────────────────────────────────────────────────────────────────────

/// Return a new, stably sorted ordering of `list`.
///
/// Contracts without a risk score sort after scored ones under both risk
/// orderings.
pub fn sort_contracts<'a>(list: &[&'a Contract], sort_by: SortBy) -> Vec<&'a Contract> {
  let mut sorted = list.to_vec();
  match sort_by {
    SortBy::None => {}
    SortBy::RiskLow => sorted.sort_by(|a, b| cmp_risk(a.risk_score, b.risk_score, false)),
    SortBy::RiskHigh => sorted.sort_by(|a, b| cmp_risk(a.risk_score, b.risk_score, true)),
    SortBy::ValueLow => sorted.sort_by(|a, b| a.value.total_cmp(&b.value)),
    SortBy::ValueHigh => sorted.sort_by(|a, b| b.value.total_cmp(&a.value)),
  }
  sorted
}

fn cmp_risk(a: Option<u8>, b: Option<u8>, descending: bool) -> Ordering {
  match (a, b) {
    (Some(x), Some(y)) if descending => y.cmp(&x),
    (Some(x), Some(y)) => x.cmp(&y),
    (Some(_), None) => Ordering::Less,
    (None, Some(_)) => Ordering::Greater,
    (None, None) => Ordering::Equal,
  }
}

// ─── Partition ───────────────────────────────────────────────────────────────

/// The four status views of a contract list.
#[derive(Debug, Clone, Default)]
pub struct Partitions<'a> {
  pub active:     Vec<&'a Contract>,
  pub bookmarked: Vec<&'a Contract>,
  pub hidden:     Vec<&'a Contract>,
  pub completed:  Vec<&'a Contract>,
}

impl<'a> Partitions<'a> {
  pub fn get(&self, status: ContractStatus) -> &[&'a Contract] {
    match status {
      ContractStatus::Active => &self.active,
      ContractStatus::Bookmarked => &self.bookmarked,
      ContractStatus::Hidden => &self.hidden,
      ContractStatus::Completed => &self.completed,
    }
  }

  /// Badge count for a tab.
  pub fn count(&self, status: ContractStatus) -> usize { self.get(status).len() }

  /// Total contracts across all four views.
  pub fn len(&self) -> usize {
    self.active.len() + self.bookmarked.len() + self.hidden.len() + self.completed.len()
  }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}

/// Split `list` by status, keeping the order of the input within each view.
pub fn partition<'a, I>(list: I) -> Partitions<'a>
where
  I: IntoIterator<Item = &'a Contract>,
{
  let mut parts = Partitions::default();
  for contract in list {
    match contract.status {
      ContractStatus::Active => parts.active.push(contract),
      ContractStatus::Bookmarked => parts.bookmarked.push(contract),
      ContractStatus::Hidden => parts.hidden.push(contract),
      ContractStatus::Completed => parts.completed.push(contract),
    }
  }
  parts
}

/// Run the whole pipeline over the canonical list.
pub fn apply<'a>(contracts: &'a [Contract], filters: &FilterState) -> Partitions<'a> {
  let filtered = filter_contracts(contracts, filters);
  let sorted = sort_contracts(&filtered, filters.sort_by);
  partition(sorted)
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use strum::IntoEnumIterator;

  use super::*;

  fn contract(id: &str, sector: &str, region: &str, value: f64, risk: Option<u8>) -> Contract {
    let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    Contract {
      id: id.into(),
      title: format!("Zakázka {id}"),
      description: String::new(),
      sector: sector.into(),
      region: region.into(),
      contracting_authority: "Město Brno".into(),
      supplier: None,
      administrator: None,
      value,
      deadline: date,
      created_at: date,
      status: ContractStatus::Active,
      risk_score: risk,
      findings: vec![],
      recommendations: vec![],
      analysis: None,
      supplier_analysis: None,
      administrator_analysis: None,
      additional_info: None,
    }
  }

  fn sample() -> Vec<Contract> {
    vec![
      contract("1", "ICT", "Praha", 1_000_000.0, Some(82)),
      contract("2", "ICT", "Brno", 1_200_000.0, Some(61)),
      contract("3", "Stavebnictví", "Praha", 1_000_000.0, None),
      contract("4", "Doprava", "Ostrava", 450_000.0, Some(18)),
      contract("5", "ICT", "Praha", 8_500_000.0, Some(61)),
    ]
  }

  fn ids(list: &[&Contract]) -> Vec<String> { list.iter().map(|c| c.id.clone()).collect() }

  // ── Filter ───────────────────────────────────────────────────────────────

  #[test]
  fn empty_filter_matches_everything() {
    let all = sample();
    assert_eq!(filter_contracts(&all, &FilterState::default()).len(), all.len());
  }

  #[test]
  fn sector_filter_is_exact_and_case_sensitive() {
    let all = sample();
    let f = FilterState { sector: "ICT".into(), ..Default::default() };
    assert_eq!(ids(&filter_contracts(&all, &f)), ["1", "2", "5"]);

    let f = FilterState { sector: "ict".into(), ..Default::default() };
    assert!(filter_contracts(&all, &f).is_empty());
  }

  #[test]
  fn value_bounds_are_inclusive() {
    let all = sample();
    let f = FilterState::default().with_value_range(Some(1_000_000.0), Some(1_200_000.0));
    assert_eq!(ids(&filter_contracts(&all, &f)), ["1", "2", "3"]);
  }

  #[test]
  fn inverted_range_is_swapped() {
    let f = FilterState::default().with_value_range(Some(9.0), Some(3.0));
    assert_eq!(f.value_min(), Some(3.0));
    assert_eq!(f.value_max(), Some(9.0));
  }

  #[test]
  fn deserialized_range_is_normalised() {
    let f: FilterState =
      serde_json::from_str(r#"{"sector": "ICT", "value_min": 9.0, "value_max": 3.0}"#).unwrap();
    assert_eq!(f.sector, "ICT");
    assert_eq!(f.value_min(), Some(3.0));
    assert_eq!(f.value_max(), Some(9.0));
  }

  #[test]
  fn non_finite_bounds_are_dropped() {
    let f = FilterState::default().with_value_range(Some(f64::NAN), Some(5.0));
    assert_eq!(f.value_min(), None);
    assert_eq!(f.value_max(), Some(5.0));

    let f = FilterState::default().with_value_range(Some(1.0), Some(f64::INFINITY));
    assert_eq!(f.value_min(), Some(1.0));
    assert_eq!(f.value_max(), None);
  }

  #[test]
  fn filter_is_idempotent() {
    let all = sample();
    let f = FilterState { region: "Praha".into(), ..Default::default() }
      .with_value_range(Some(500_000.0), None);
    let once = filter_contracts(&all, &f);
    let twice = filter_contracts(once.iter().copied(), &f);
    assert_eq!(ids(&once), ids(&twice));
  }

  #[test]
  fn filter_predicates_commute() {
    let all = sample();
    let full = FilterState { sector: "ICT".into(), region: "Praha".into(), ..Default::default() }
      .with_value_range(None, Some(2_000_000.0));

    let sector_only = FilterState { sector: "ICT".into(), ..Default::default() };
    let region_only = FilterState { region: "Praha".into(), ..Default::default() };
    let value_only = FilterState::default().with_value_range(None, Some(2_000_000.0));

    let a = filter_contracts(
      filter_contracts(filter_contracts(&all, &sector_only), &region_only),
      &value_only,
    );
    let b = filter_contracts(
      filter_contracts(filter_contracts(&all, &value_only), &sector_only),
      &region_only,
    );
    assert_eq!(ids(&a), ids(&filter_contracts(&all, &full)));
    assert_eq!(ids(&a), ids(&b));
  }

  #[test]
  fn category_preset_round_trips_through_filter_state() {
    let mut f = FilterState::default();
    f.set_value_category(Some(ValueCategory::Medium));
    assert_eq!(f.value_category(), Some(ValueCategory::Medium));
    f.set_value_category(None);
    assert!(f.is_unconstrained());
  }

  // ── Sort ─────────────────────────────────────────────────────────────────

  #[test]
  fn value_low_is_stable_for_equal_values() {
    let all = sample();
    let first_three: Vec<&Contract> = all.iter().take(3).collect();
    assert_eq!(ids(&sort_contracts(&first_three, SortBy::ValueLow)), ["1", "3", "2"]);
  }

  #[test]
  fn value_high_orders_descending() {
    let all = sample();
    let refs: Vec<&Contract> = all.iter().collect();
    assert_eq!(ids(&sort_contracts(&refs, SortBy::ValueHigh)), ["5", "2", "1", "3", "4"]);
  }

  #[test]
  fn missing_risk_sorts_last_in_both_directions() {
    let all = sample();
    let refs: Vec<&Contract> = all.iter().collect();
    assert_eq!(ids(&sort_contracts(&refs, SortBy::RiskHigh)), ["1", "2", "5", "4", "3"]);
    assert_eq!(ids(&sort_contracts(&refs, SortBy::RiskLow)), ["4", "2", "5", "1", "3"]);
  }

  #[test]
  fn unsorted_keeps_input_order_and_does_not_mutate() {
    let all = sample();
    let refs: Vec<&Contract> = all.iter().rev().collect();
    let out = sort_contracts(&refs, SortBy::None);
    assert_eq!(ids(&out), ids(&refs));
    let _ = sort_contracts(&refs, SortBy::ValueLow);
    assert_eq!(ids(&refs), ["5", "4", "3", "2", "1"]);
  }

  #[test]
  fn unknown_sort_key_is_a_no_op() {
    assert_eq!(SortBy::parse_lossy(""), SortBy::None);
    assert_eq!(SortBy::parse_lossy("by_magic"), SortBy::None);
    assert_eq!(SortBy::parse_lossy("risk_high"), SortBy::RiskHigh);
  }

  // ── Partition ────────────────────────────────────────────────────────────

  #[test]
  fn partition_is_exhaustive_and_disjoint() {
    let mut all = sample();
    all[0].status = ContractStatus::Bookmarked;
    all[2].status = ContractStatus::Hidden;
    all[3].status = ContractStatus::Completed;

    let parts = partition(&all);
    assert_eq!(parts.len(), all.len());
    for c in &all {
      let hits = ContractStatus::iter()
        .filter(|s| parts.get(*s).iter().any(|p| p.id == c.id))
        .count();
      assert_eq!(hits, 1, "contract {} appears in {hits} partitions", c.id);
    }
    assert_eq!(ids(&parts.active), ["2", "5"]);
    assert_eq!(parts.count(ContractStatus::Completed), 1);
  }

  #[test]
  fn apply_sorts_within_each_partition() {
    let mut all = sample();
    all[1].status = ContractStatus::Bookmarked;
    let f = FilterState { sector: "ICT".into(), sort_by: SortBy::ValueHigh, ..Default::default() };
    let parts = apply(&all, &f);
    assert_eq!(ids(&parts.active), ["5", "1"]);
    assert_eq!(ids(&parts.bookmarked), ["2"]);
    assert!(parts.hidden.is_empty());
  }
}
