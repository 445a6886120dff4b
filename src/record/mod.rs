//! The `record` module defines the message record flowing through the relay.
//!
//! A record is created by a protocol adapter (or by the counter reporter),
//! stamped with a receipt time and a unique id on ingestion, and from then on
//! only ever moves between spool directories; its content is never rewritten.

mod message;

pub use message::Record;
