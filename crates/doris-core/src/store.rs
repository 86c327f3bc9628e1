//! The `ContractStore` trait: the repository in front of the contract list.
//!
//! The store owns the single canonical ordering of contracts. Filtering and
//! sorting are read-time projections over [`ContractStore::list`] and are
//! never written back; only [`ContractStore::move_contract`] changes the
//! order.

use std::future::Future;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{
  analysis::AnalysisTarget,
  contract::{Contract, ContractStatus},
};

/// Direction of a manual reorder step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MoveDirection {
  Up,
  Down,
}

/// Abstraction over a contract repository.
///
/// All methods return `Send` futures so a network-backed implementation can
/// be substituted without touching the pipeline or the UI.
pub trait ContractStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Snapshot of every contract in canonical order.
  fn list(&self) -> impl Future<Output = Result<Vec<Contract>, Self::Error>> + Send + '_;

  /// A single contract by id. Returns `None` if not found.
  fn get<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Contract>, Self::Error>> + Send + 'a;

  /// Replace the status of `id` in place and return the updated contract.
  ///
  /// Returns a not-found error for unknown ids.
  fn set_status<'a>(
    &'a self,
    id: &'a str,
    status: ContractStatus,
  ) -> impl Future<Output = Result<Contract, Self::Error>> + Send + 'a;

  /// Swap `id` with its neighbour in canonical order. A no-op at either end.
  ///
  /// Returns a not-found error for unknown ids.
  fn move_contract<'a>(
    &'a self,
    id: &'a str,
    direction: MoveDirection,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Merge a finished deep-search report into the contract.
  fn set_analysis<'a>(
    &'a self,
    id: &'a str,
    target: AnalysisTarget,
    markdown: String,
  ) -> impl Future<Output = Result<Contract, Self::Error>> + Send + 'a;
}
