use super::counters::DeliveryCounters;
use super::resolver::resolve;
use crate::delivery::{DeliveryAttempter, Outcome};
use crate::record::Record;
use crate::spool::{QueueState, SpoolError, SpoolStore};
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};

/// Promotes freshly accepted records from `in` to `wip`.
///
/// Each promoted uid is pushed onto the in-flight channel, so the delivery
/// loop triggers identically whether a record arrived live or was requeued
/// by the retry sweeper. A record whose promotion fails stays in `in` and is
/// recovered by the next startup reconciliation.
pub async fn run_promoter(
    store: SpoolStore,
    mut arrivals: UnboundedReceiver<String>,
    inflight: UnboundedSender<String>,
) {
    while let Some(uid) = arrivals.recv().await {
        match store.relocate(QueueState::Incoming, &uid, QueueState::InFlight) {
            Ok(()) => {
                let _ = inflight.send(uid);
            }
            Err(e) => warn!("failed to promote {uid}: {e}"),
        }
    }
    info!("promotion loop stopped");
}

/// Delivers in-flight records and files their outcomes.
///
/// Faults in one record's handling never abort the loop or affect any other
/// record.
pub async fn run_deliverer(
    store: SpoolStore,
    mut inflight: UnboundedReceiver<String>,
    attempter: Arc<DeliveryAttempter>,
    counters: Arc<DeliveryCounters>,
) {
    while let Some(uid) = inflight.recv().await {
        if let Err(e) = handle_inflight(&store, &attempter, &counters, &uid).await {
            warn!("failed to dispatch {uid}: {e}");
        }
    }
    info!("delivery loop stopped");
}

/// Attempts delivery of one in-flight record.
///
/// A uid that is no longer resident was already moved by a previous attempt
/// and is a no-op. A record is only ever handed to the attempter from here,
/// and only after confirming residency, so attempts for one record are
/// serialized.
pub(crate) async fn handle_inflight(
    store: &SpoolStore,
    attempter: &DeliveryAttempter,
    counters: &DeliveryCounters,
    uid: &str,
) -> Result<(), SpoolError> {
    let Some(raw) = store.read_if_resident(QueueState::InFlight, uid)? else {
        return Ok(());
    };

    let outcome = match serde_json::from_slice::<Record>(&raw) {
        Ok(record) => attempter.deliver(&record, &raw).await,
        Err(e) => {
            // Undecodable spool content cannot be published; treat it like
            // any other failed attempt so it is never silently dropped.
            warn!("spooled record {uid} does not decode: {e}");
            Outcome::Failed
        }
    };
    resolve(store, counters, uid, outcome);
    Ok(())
}
