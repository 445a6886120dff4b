use super::counters::DeliveryCounters;
use crate::ingest::IngestSink;
use crate::record::Record;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Periodically emits the accumulated delivery counts as a synthetic record.
///
/// The report is submitted through the ingestion sink, so operational health
/// data travels the same durable pipeline as application messages. Counters
/// are drained on every tick, zeroes included; a quiet relay still reports,
/// which doubles as a liveness signal.
pub async fn run_counter_reporter(
    sink: IngestSink,
    counters: Arc<DeliveryCounters>,
    device_name: String,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let snapshot = counters.drain();
        let report = Record::new(
            device_name.clone(),
            json!({
                "successes": snapshot.successes,
                "failures": snapshot.failures,
            }),
        );
        if let Err(e) = sink.accept(report) {
            warn!("failed to spool counter report: {e}");
        }
    }
}
