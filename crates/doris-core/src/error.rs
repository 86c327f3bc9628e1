//! Error types for `doris-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("contract not found: {0}")]
  ContractNotFound(String),

  #[error("duplicate contract id: {0}")]
  DuplicateContract(String),

  #[error("unknown contract status: {0:?}")]
  UnknownStatus(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
