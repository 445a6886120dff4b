use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Represents one message unit moving through the relay.
///
/// A record consists of the identifier of the originating device or channel,
/// an opaque payload carried to the destination unmodified, and two identity
/// fields stamped on ingestion if not already present.
///
/// This structure is serialized to JSON both for spooling on disk and for
/// forwarding to the gateway.
///
/// # Fields
///
/// - `source` - The identifier of the originating device or channel.
/// - `payload` - The message content, an arbitrary JSON value or raw string.
/// - `received` - Unix timestamp (fractional seconds) of first acceptance.
/// - `uid` - Unique id of the record; also its filename in every spool state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub source: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

impl Record {
    /// Creates a new unstamped record from a source identifier and payload.
    pub fn new(source: impl Into<String>, payload: Value) -> Self {
        Self {
            source: source.into(),
            payload,
            received: None,
            uid: None,
        }
    }

    /// Stamps receipt time and uid if absent and returns the uid.
    ///
    /// Existing values are never overwritten, so resubmitting an already
    /// stamped record keeps its identity. A generated uid is the receipt
    /// time plus a random suffix, which makes collisions practically
    /// impossible even for records accepted in the same microsecond.
    pub fn stamp(&mut self) -> String {
        let received = *self.received.get_or_insert_with(unix_now);
        match &self.uid {
            Some(uid) => uid.clone(),
            None => {
                let uid = format!("{received:.6}-{}", Uuid::new_v4().simple());
                self.uid = Some(uid.clone());
                uid
            }
        }
    }

    /// Builds a record from a flat map of submitted fields.
    ///
    /// This is the single rule applied to every HTTP submission shape: the
    /// reserved keys `source`, `received` and `uid` are lifted out of the
    /// map, an explicit `payload` key is used verbatim, and otherwise the
    /// remaining keys become the payload object. Returns `None` when
    /// `source` is missing or not a string.
    pub fn from_fields(mut fields: Map<String, Value>) -> Option<Self> {
        let source = match fields.remove("source") {
            Some(Value::String(s)) => s,
            _ => return None,
        };
        let received = fields.remove("received").and_then(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        });
        let uid = match fields.remove("uid") {
            Some(Value::String(s)) => Some(s),
            _ => None,
        };
        let payload = fields
            .remove("payload")
            .unwrap_or(Value::Object(fields));
        Some(Self {
            source,
            payload,
            received,
            uid,
        })
    }
}

fn unix_now() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
