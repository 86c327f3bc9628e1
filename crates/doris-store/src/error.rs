//! Error type for `doris-store`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] doris_core::Error),

  #[error("seed is not valid contract JSON: {0}")]
  Json(#[from] serde_json::Error),

  #[error("reading seed file: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
