use crate::record::Record;
use crate::spool::{QueueState, SpoolError, SpoolStore, is_valid_uid};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

/// Errors raised while accepting a submission.
///
/// The first two are validation failures the protocol adapters map to a
/// client-visible rejection; no file is created for them.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("record is missing a source identifier")]
    MissingSource,
    #[error("record uid {0:?} cannot be used as a spool filename")]
    InvalidUid(String),
    #[error("failed to spool record: {0}")]
    Storage(#[from] SpoolError),
    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The single entry point through which records enter the pipeline.
///
/// Accepting a record stamps its identity, writes it into the `in` state and
/// notifies the promotion loop. The sink is cheap to clone into each adapter.
#[derive(Debug, Clone)]
pub struct IngestSink {
    store: SpoolStore,
    arrivals: UnboundedSender<String>,
}

impl IngestSink {
    pub fn new(store: SpoolStore, arrivals: UnboundedSender<String>) -> Self {
        Self { store, arrivals }
    }

    /// Validates, stamps and durably spools a record, returning its uid.
    pub fn accept(&self, mut record: Record) -> Result<String, IngestError> {
        if record.source.trim().is_empty() {
            return Err(IngestError::MissingSource);
        }
        if let Some(uid) = &record.uid {
            if !is_valid_uid(uid) {
                return Err(IngestError::InvalidUid(uid.clone()));
            }
        }

        let uid = record.stamp();
        let content = serde_json::to_vec(&record)?;
        self.store.put(QueueState::Incoming, &uid, &content)?;
        debug!("accepted {uid} from {}", record.source);

        // The promotion loop only shuts down when the whole process does, so
        // a closed channel here is not worth surfacing to the submitter.
        let _ = self.arrivals.send(uid.clone());
        Ok(uid)
    }
}
