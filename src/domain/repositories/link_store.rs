//! Storage contract for short links.

use crate::domain::entities::Link;
use async_trait::async_trait;

/// Result of a conditional insert.
///
/// A key collision is an expected outcome of allocation rather than a failure,
/// so it is reported as a value and never routed through [`StoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The record was written.
    Inserted,
    /// A record with the same code already exists; nothing was written.
    AlreadyExists,
}

/// Errors raised by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Temporary condition (timeout, dropped connection, throttling).
    /// Safe to retry.
    #[error("Transient storage error: {0}")]
    Transient(String),

    /// Any other backend failure. Not retried.
    #[error("Storage error: {0}")]
    Backend(String),

    /// A stored record could not be decoded.
    #[error("Corrupt record for code '{code}': {reason}")]
    Corrupt { code: String, reason: String },
}

impl StoreError {
    /// Returns true if the operation may succeed when attempted again.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

/// Key-value store holding [`Link`] records keyed by `code`.
///
/// Implementations must keep these guarantees across every process sharing the
/// backend, not just within one instance:
///
/// - [`insert_if_absent`](LinkStore::insert_if_absent) is a compare-and-swap;
///   an existing record is never overwritten and the full record is written
///   at once or not at all
/// - [`increment_hits`](LinkStore::increment_hits) is an atomic add that loses
///   no concurrent updates
///
/// Backend-native expiry (TTL purge) is allowed but advisory. Callers must
/// still check [`Link::is_expired_at`] on every read.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::MemoryLinkStore`] - in-process map
/// - [`crate::infrastructure::persistence::PgLinkStore`] - PostgreSQL
/// - [`crate::infrastructure::persistence::RedisLinkStore`] - Redis
/// - [`crate::infrastructure::persistence::RetryingStore`] - retry decorator
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Writes `link` unless a record with the same code exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] only for backend failures. A taken code is
    /// [`InsertOutcome::AlreadyExists`].
    async fn insert_if_absent(&self, link: &Link) -> Result<InsertOutcome, StoreError>;

    /// Point lookup by code.
    ///
    /// Returns `Ok(None)` when no record exists. Expired records that have not
    /// been purged yet are returned as-is.
    async fn get(&self, code: &str) -> Result<Option<Link>, StoreError>;

    /// Atomically adds one to the hit counter, treating a missing counter as 0.
    async fn increment_hits(&self, code: &str) -> Result<(), StoreError>;

    /// Checks whether the backend is reachable.
    async fn health_check(&self) -> bool;
}
