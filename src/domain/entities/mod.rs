//! Core domain entities.
//!
//! The service persists a single entity, [`Link`]: the mapping from a short code
//! to its target URL together with its creation time, optional expiry and hit
//! counter.

pub mod link;

pub use link::Link;
