//! The `spool` module provides the durable on-disk queue backing the relay.
//!
//! Every accepted record is one file, named by its uid, sitting in exactly
//! one of four queue-state directories under the spool base. Records move
//! between states by rename only, so a crash at any point leaves each record
//! discoverable in a well-defined directory.

mod store;

pub use store::{QueueState, SpoolError, SpoolStore, is_valid_uid};

#[cfg(test)]
mod tests;
