//! In-process link store.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::entities::Link;
use crate::domain::repositories::{InsertOutcome, LinkStore, StoreError};

/// Link store backed by a `HashMap` behind an async `RwLock`.
///
/// Conditional inserts and increments happen under the write lock, which gives
/// the [`LinkStore`] guarantees within a single process. Several service
/// instances each get their own map, so use PostgreSQL or Redis for anything
/// horizontally scaled. Expired links are never purged.
#[derive(Default)]
pub struct MemoryLinkStore {
    links: RwLock<HashMap<String, Link>>,
}

impl MemoryLinkStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored links, expired ones included.
    pub async fn len(&self) -> usize {
        self.links.read().await.len()
    }

    /// Returns true if no links are stored.
    pub async fn is_empty(&self) -> bool {
        self.links.read().await.is_empty()
    }

    /// Overwrites the expiry of an existing link.
    ///
    /// Operational hook for reaping and maintenance tooling; the service itself
    /// never changes a stored link. Returns `false` if the code is unknown.
    pub async fn set_expires_at(&self, code: &str, expires_at: Option<i64>) -> bool {
        match self.links.write().await.get_mut(code) {
            Some(link) => {
                link.expires_at = expires_at;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl LinkStore for MemoryLinkStore {
    async fn insert_if_absent(&self, link: &Link) -> Result<InsertOutcome, StoreError> {
        match self.links.write().await.entry(link.code.clone()) {
            Entry::Occupied(_) => Ok(InsertOutcome::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(link.clone());
                Ok(InsertOutcome::Inserted)
            }
        }
    }

    async fn get(&self, code: &str) -> Result<Option<Link>, StoreError> {
        Ok(self.links.read().await.get(code).cloned())
    }

    async fn increment_hits(&self, code: &str) -> Result<(), StoreError> {
        if let Some(link) = self.links.write().await.get_mut(code) {
            link.hits += 1;
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
