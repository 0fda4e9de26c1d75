//! Retry decorator for link stores.

use std::time::Duration;

use async_trait::async_trait;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::warn;

use crate::domain::entities::Link;
use crate::domain::repositories::{InsertOutcome, LinkStore, StoreError};

/// Default number of attempts per operation, the first one included.
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// Default delay before the first retry.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(50);

const MAX_DELAY: Duration = Duration::from_secs(1);

/// Wraps a [`LinkStore`] and retries [`StoreError::Transient`] failures with
/// jittered exponential backoff.
///
/// Only transient errors are retried. [`InsertOutcome::AlreadyExists`] is a
/// successful result and goes straight back to the caller, as do all other
/// errors.
pub struct RetryingStore<S> {
    inner: S,
    max_attempts: usize,
    base_delay: Duration,
}

impl<S: LinkStore> RetryingStore<S> {
    /// Wraps `inner` with the default policy (3 attempts, 50 ms base delay).
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }

    /// Sets the total number of attempts. Values below 1 are treated as 1.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Sets the delay before the first retry; later delays double.
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    fn strategy(&self) -> impl Iterator<Item = Duration> + Send {
        let base_ms = self.base_delay.as_millis().max(1) as u64;

        // from_millis(2) yields 2, 4, 8 ...; factor scales that to base, 2*base, 4*base.
        ExponentialBackoff::from_millis(2)
            .factor(base_ms.div_ceil(2))
            .max_delay(MAX_DELAY)
            .map(jitter)
            .take(self.max_attempts - 1)
    }
}

fn should_retry(operation: &'static str) -> impl FnMut(&StoreError) -> bool {
    move |e: &StoreError| {
        let transient = e.is_transient();
        if transient {
            warn!(operation, error = %e, "Transient storage error");
        }
        transient
    }
}

#[async_trait]
impl<S: LinkStore> LinkStore for RetryingStore<S> {
    async fn insert_if_absent(&self, link: &Link) -> Result<InsertOutcome, StoreError> {
        RetryIf::start(
            self.strategy(),
            || self.inner.insert_if_absent(link),
            should_retry("insert_if_absent"),
        )
        .await
    }

    async fn get(&self, code: &str) -> Result<Option<Link>, StoreError> {
        RetryIf::start(
            self.strategy(),
            || self.inner.get(code),
            should_retry("get"),
        )
        .await
    }

    async fn increment_hits(&self, code: &str) -> Result<(), StoreError> {
        RetryIf::start(
            self.strategy(),
            || self.inner.increment_hits(code),
            should_retry("increment_hits"),
        )
        .await
    }

    async fn health_check(&self) -> bool {
        self.inner.health_check().await
    }
}
