//! The `pipeline` module drives records through the spool to delivery.
//!
//! It contains the two dispatch loops (promotion of fresh arrivals, delivery
//! of in-flight records), the outcome resolver that files each record as
//! completed or retry-pending, the periodic retry sweeper, and the counter
//! reporter that feeds delivery statistics back through the ingestion sink.
//!
//! Arrival notification is carried on in-process channels owned by these
//! loops rather than filesystem watch events; anything a crash strands on
//! disk is recovered by the startup reconciliation sweep.

mod counters;
mod dispatcher;
mod reporter;
mod resolver;
mod sweeper;

pub use counters::{CounterSnapshot, DeliveryCounters};
pub use dispatcher::{run_deliverer, run_promoter};
pub use reporter::run_counter_reporter;
pub use sweeper::{reconcile_on_startup, run_retry_sweeper};
