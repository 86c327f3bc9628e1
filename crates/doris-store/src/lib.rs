//! In-memory backend for the Doris contract store.
//!
//! Holds the canonical contract list behind an async lock and loads it from
//! a JSON seed. A built-in seed ships with the crate for demos and tests.

mod seed;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use seed::{BUILTIN_SEED, parse_seed};
pub use store::MemoryStore;

#[cfg(test)]
mod tests;
