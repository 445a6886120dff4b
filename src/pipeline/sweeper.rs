use crate::spool::{QueueState, SpoolStore};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

/// Requeues records stranded by a previous process instance.
///
/// Everything left in `in` or `wip` is swept into `retry`, so a record
/// caught mid-pipeline by a crash re-enters the normal retry cycle on the
/// next sweep tick instead of being lost or re-attempted with stale
/// in-flight status. Runs once, before the listeners start.
pub fn reconcile_on_startup(store: &SpoolStore) {
    for from in [QueueState::Incoming, QueueState::InFlight] {
        match store.sweep(from, QueueState::RetryPending) {
            Ok(0) => {}
            Ok(n) => info!("requeued {n} record(s) left in {}", from.dir_name()),
            Err(e) => warn!("startup sweep of {} failed: {e}", from.dir_name()),
        }
    }
}

/// Periodically moves everything in `retry` back to `wip` for another
/// delivery attempt, pushing each requeued uid onto the in-flight channel.
pub async fn run_retry_sweeper(
    store: SpoolStore,
    inflight: UnboundedSender<String>,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    // The first tick of a tokio interval fires immediately; consume it so
    // sweeps happen one full period apart from startup.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let uids = match store.list(QueueState::RetryPending) {
            Ok(uids) => uids,
            Err(e) => {
                warn!("retry sweep could not list the retry state: {e}");
                continue;
            }
        };
        for uid in uids {
            match store.relocate(QueueState::RetryPending, &uid, QueueState::InFlight) {
                Ok(()) => {
                    let _ = inflight.send(uid);
                }
                Err(e) => warn!("failed to requeue {uid}: {e}"),
            }
        }
    }
}
