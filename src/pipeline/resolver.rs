use super::counters::DeliveryCounters;
use crate::delivery::Outcome;
use crate::spool::{QueueState, SpoolStore};
use chrono::Utc;
use tracing::{debug, error, warn};

/// Files one delivery outcome: completed bucket on success, retry state on
/// failure. These are the only two terminal actions after an attempt.
///
/// A failed relocation is logged and the record stays where the failed move
/// left it; the startup reconciliation sweep picks it up on the next run.
pub(crate) fn resolve(
    store: &SpoolStore,
    counters: &DeliveryCounters,
    uid: &str,
    outcome: Outcome,
) {
    match outcome {
        Outcome::Delivered => {
            if let Err(e) = store.complete(uid, Utc::now().date_naive()) {
                error!("delivered {uid} but failed to file it as done: {e}");
            } else {
                debug!("completed {uid}");
            }
            counters.record_success();
        }
        Outcome::Failed => {
            if let Err(e) = store.relocate(QueueState::InFlight, uid, QueueState::RetryPending) {
                error!("failed to demote {uid} to retry: {e}");
            } else {
                warn!("delivery of {uid} failed, queued for retry");
            }
            counters.record_failure();
        }
    }
}
