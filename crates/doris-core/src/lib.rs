//! Domain model of the Doris contract review dashboard.
//!
//! Holds no HTTP, terminal or storage code. The list pipeline (filter,
//! sort, partition) and the similarity scorer are pure functions over
//! borrowed contracts; the store and the two external collaborators are
//! traits implemented elsewhere.

// Trait methods spell out `+ Send` on their futures; impls use `async fn`.
#![allow(async_fn_in_trait)]

pub mod analysis;
pub mod contract;
pub mod document;
pub mod error;
pub mod query;
pub mod similarity;
pub mod store;

pub use error::{Error, Result};
