//! [`MemoryStore`], the in-memory implementation of [`ContractStore`].

use std::{path::Path, sync::Arc};

use doris_core::{
  analysis::AnalysisTarget,
  contract::{Contract, ContractStatus},
  store::{ContractStore, MoveDirection},
};
use tokio::sync::RwLock;

use crate::{
  Result,
  seed::{BUILTIN_SEED, ensure_unique_ids, parse_seed},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// The canonical contract list, shared behind an async lock.
///
/// Clones share the same list.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
  contracts: Arc<RwLock<Vec<Contract>>>,
}

impl MemoryStore {
  /// Build a store from already-parsed contracts, rejecting duplicate ids.
  pub fn from_contracts(contracts: Vec<Contract>) -> Result<Self> {
    ensure_unique_ids(&contracts)?;
    Ok(Self { contracts: Arc::new(RwLock::new(contracts)) })
  }

  /// Parse a JSON seed into a store.
  pub fn from_json(json: &str) -> Result<Self> { Self::from_contracts(parse_seed(json)?) }

  /// Load a JSON seed file.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path).await?;
    let contracts = parse_seed(&raw)?;
    tracing::info!(path = %path.display(), count = contracts.len(), "loaded contracts");
    Self::from_contracts(contracts)
  }

  /// A store preloaded with the built-in demo contracts.
  pub fn builtin() -> Result<Self> { Self::from_json(BUILTIN_SEED) }

  /// Append a contract at the end of the canonical order.
  pub async fn insert(&self, contract: Contract) -> Result<()> {
    let mut contracts = self.contracts.write().await;
    if contracts.iter().any(|c| c.id == contract.id) {
      return Err(doris_core::Error::DuplicateContract(contract.id).into());
    }
    contracts.push(contract);
    Ok(())
  }

  pub async fn len(&self) -> usize { self.contracts.read().await.len() }

  pub async fn is_empty(&self) -> bool { self.contracts.read().await.is_empty() }

  /// Apply `update` to the contract with `id` and return the result.
  async fn update<F>(&self, id: &str, update: F) -> Result<Contract>
  where
    F: FnOnce(&mut Contract),
  {
    let mut contracts = self.contracts.write().await;
    let contract = contracts
      .iter_mut()
      .find(|c| c.id == id)
      .ok_or_else(|| doris_core::Error::ContractNotFound(id.to_owned()))?;
    update(contract);
    Ok(contract.clone())
  }
}

// ─── ContractStore impl ──────────────────────────────────────────────────────

impl ContractStore for MemoryStore {
  type Error = crate::Error;

  async fn list(&self) -> Result<Vec<Contract>> { Ok(self.contracts.read().await.clone()) }

  async fn get(&self, id: &str) -> Result<Option<Contract>> {
    Ok(self.contracts.read().await.iter().find(|c| c.id == id).cloned())
  }

  async fn set_status(&self, id: &str, status: ContractStatus) -> Result<Contract> {
    let updated = self.update(id, |c| c.status = status).await?;
    tracing::debug!(id, %status, "contract status changed");
    Ok(updated)
  }

  async fn move_contract(&self, id: &str, direction: MoveDirection) -> Result<()> {
    let mut contracts = self.contracts.write().await;
    let index = contracts
      .iter()
      .position(|c| c.id == id)
      .ok_or_else(|| doris_core::Error::ContractNotFound(id.to_owned()))?;

    let neighbour = match direction {
      MoveDirection::Up => index.checked_sub(1),
      MoveDirection::Down => Some(index + 1).filter(|&n| n < contracts.len()),
    };
    if let Some(neighbour) = neighbour {
      contracts.swap(index, neighbour);
      tracing::debug!(id, %direction, from = index, to = neighbour, "contract moved");
    }
    Ok(())
  }

  async fn set_analysis(
    &self,
    id:       &str,
    target:   AnalysisTarget,
    markdown: String,
  ) -> Result<Contract> {
    self.update(id, |c| target.assign(c, markdown)).await
  }
}
