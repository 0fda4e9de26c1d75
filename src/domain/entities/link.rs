//! Link entity representing a shortened URL mapping.

use serde::{Deserialize, Serialize};

/// A shortened URL link with metadata.
///
/// Timestamps are unix seconds. Everything except `hits` is fixed at creation;
/// `hits` only ever grows through [`crate::domain::repositories::LinkStore::increment_hits`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub code: String,
    pub long_url: String,
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub hits: i64,
}

impl Link {
    /// Creates a fresh link with a zero hit counter.
    pub fn new(code: String, long_url: String, created_at: i64, expires_at: Option<i64>) -> Self {
        Self {
            code,
            long_url,
            created_at,
            expires_at,
            hits: 0,
        }
    }

    /// Returns true if the link is past its expiry at the given unix time.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|e| now >= e)
    }
}
