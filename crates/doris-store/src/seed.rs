//! Seed ingestion.
//!
//! A seed is a JSON array of contracts. Malformed records, unknown status
//! strings and duplicate ids are rejected here so the store never holds a
//! contract outside the four status buckets.

use std::collections::HashSet;

use doris_core::contract::Contract;

use crate::Result;

/// The demo data set compiled into the binary.
pub const BUILTIN_SEED: &str = include_str!("../data/contracts.json");

/// Parse and validate a JSON seed.
pub fn parse_seed(json: &str) -> Result<Vec<Contract>> {
  let contracts: Vec<Contract> = serde_json::from_str(json)?;
  ensure_unique_ids(&contracts)?;
  tracing::debug!(count = contracts.len(), "parsed contract seed");
  Ok(contracts)
}

pub(crate) fn ensure_unique_ids(contracts: &[Contract]) -> Result<()> {
  let mut seen = HashSet::with_capacity(contracts.len());
  for contract in contracts {
    if !seen.insert(contract.id.as_str()) {
      return Err(doris_core::Error::DuplicateContract(contract.id.clone()).into());
    }
  }
  Ok(())
}
