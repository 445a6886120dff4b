//! The `delivery` module forwards spooled records to the remote collector.
//!
//! Configuration enumerates zero or more outbound transports (an HTTP gateway
//! and an MQTT broker); every configured transport is attempted for every
//! record, and the attempt as a whole fails if any transport fails. Each
//! attempt is bounded by a send timeout so a hung exchange cannot stall the
//! dispatch loop.

mod attempter;
mod gateway;
mod mqtt;

pub use attempter::{DeliveryAttempter, DeliveryError, Outcome};
pub use gateway::HttpGateway;
pub use mqtt::MqttPublisher;

#[cfg(test)]
mod tests;
