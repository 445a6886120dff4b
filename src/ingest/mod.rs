//! The `ingest` module is responsible for accepting submissions into the relay.
//!
//! It contains the ingestion sink, the single entry point through which every
//! record (live submission or synthetic counter report) enters the spool, and
//! the two thin protocol adapters that feed it: a UDP datagram listener and an
//! HTTP listener. An adapter only parses its input into a `Record` and asks
//! the sink to store it; acceptance is acknowledged as soon as the record is
//! durably spooled, never waiting for delivery.

mod http;
mod sink;
mod udp;

pub use http::{run_http_listener, serve_http, submission_router};
pub use sink::{IngestError, IngestSink};
pub use udp::{run_udp_listener, serve_udp};
