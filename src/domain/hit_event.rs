//! Hit event model for asynchronous hit counting.

use chrono::Utc;

/// A successful resolve waiting to be counted.
///
/// Sent from [`crate::application::services::LinkService::record_hit`] to the
/// background worker over a bounded channel so that redirects never wait on
/// the counter write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitEvent {
    pub code: String,
    /// Unix seconds at which the redirect was served.
    pub resolved_at: i64,
}

impl HitEvent {
    /// Creates an event stamped with the current time.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            resolved_at: Utc::now().timestamp(),
        }
    }

    /// Seconds between the redirect and `now`, never negative.
    pub fn lag_secs(&self, now: i64) -> i64 {
        (now - self.resolved_at).max(0)
    }
}
