//! # edgerelay
//!
//! `edgerelay` is a small store-and-forward relay for field devices. It accepts
//! telemetry messages over UDP and HTTP, spools each one as a file on local
//! storage, and forwards it at-least-once to a remote collector (an HTTP
//! gateway and/or an MQTT broker), retrying until delivery succeeds.
//!
//! ## Core Modules
//!
//! The library is structured into several modules, each with a distinct responsibility:
//!
//! - `record`: The message record flowing through the relay, and how identity is stamped onto it.
//! - `spool`: The durable on-disk queue, four directories acting as queue states with one file per record.
//! - `ingest`: The ingestion sink plus the UDP and HTTP listeners that feed it.
//! - `delivery`: The outbound transports (HTTP gateway, MQTT) and the per-record delivery attempt.
//! - `pipeline`: Promotion and dispatch loops, outcome resolution, the retry sweeper, and the counter reporter.
//! - `config`: Handles loading and managing relay configuration.
//! - `utils`: Shared utilities such as logging setup.

pub mod config;
pub mod delivery;
pub mod ingest;
pub mod pipeline;
pub mod record;
pub mod spool;
pub mod utils;
