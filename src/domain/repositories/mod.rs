//! Storage trait definitions for the domain layer.
//!
//! The domain owns the [`LinkStore`] contract; backends live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for unit tests.

pub mod link_store;

pub use link_store::{InsertOutcome, LinkStore, StoreError};

#[cfg(test)]
pub use link_store::MockLinkStore;
