//! Background worker applying hit events to the store.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::domain::hit_event::HitEvent;
use crate::domain::repositories::LinkStore;

/// Consumes hit events until every sender is dropped.
///
/// Each event becomes one [`LinkStore::increment_hits`] call. Failures are
/// logged and counted but never retried here; the store decorator already
/// retried transient errors and a lost hit is acceptable.
pub async fn run_hit_worker<S>(mut rx: mpsc::Receiver<HitEvent>, store: Arc<S>)
where
    S: LinkStore + ?Sized,
{
    while let Some(event) = rx.recv().await {
        match store.increment_hits(&event.code).await {
            Ok(()) => debug!(
                code = %event.code,
                lag_secs = event.lag_secs(Utc::now().timestamp()),
                "Hit recorded"
            ),
            Err(e) => {
                metrics::counter!("link_hit_failures_total").increment(1);
                warn!(
                    code = %event.code,
                    resolved_at = event.resolved_at,
                    error = %e,
                    "Failed to record hit"
                );
            }
        }
    }

    info!("Hit worker stopped");
}
