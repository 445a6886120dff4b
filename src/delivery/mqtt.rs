use super::attempter::DeliveryError;
use crate::record::Record;
use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use std::time::Duration;
use uuid::Uuid;

/// Publishes a record's payload on a topic equal to the record's source.
///
/// Each attempt opens a fresh session, publishes at QoS 1 and waits for the
/// broker's acknowledgement, so success genuinely means the broker took the
/// message. The whole exchange is bounded by the configured send timeout.
#[derive(Debug, Clone)]
pub struct MqttPublisher {
    host: String,
    port: u16,
    client_id: String,
    timeout: Duration,
}

impl MqttPublisher {
    pub fn new(host: String, port: u16, device_name: &str, timeout: Duration) -> Self {
        Self {
            host,
            port,
            client_id: device_name.to_string(),
            timeout,
        }
    }

    pub async fn publish(&self, record: &Record) -> Result<(), DeliveryError> {
        tokio::time::timeout(self.timeout, self.publish_once(record))
            .await
            .map_err(|_| DeliveryError::Timeout)?
    }

    async fn publish_once(&self, record: &Record) -> Result<(), DeliveryError> {
        // A random suffix keeps concurrent attempts from kicking each other
        // off the broker over a duplicate client id.
        let session_id = format!("{}-{}", self.client_id, Uuid::new_v4().simple());
        let mut options = MqttOptions::new(session_id, &self.host, self.port);
        options.set_keep_alive(Duration::from_secs(5));

        let (client, mut eventloop) = AsyncClient::new(options, 8);
        client
            .publish(
                &record.source,
                QoS::AtLeastOnce,
                false,
                payload_bytes(record)?,
            )
            .await?;

        loop {
            match eventloop.poll().await? {
                Event::Incoming(Packet::PubAck(_)) => break,
                _ => continue,
            }
        }
        let _ = client.disconnect().await;
        Ok(())
    }
}

/// String payloads go on the wire as-is; structured payloads are JSON.
pub(crate) fn payload_bytes(record: &Record) -> Result<Vec<u8>, DeliveryError> {
    match &record.payload {
        serde_json::Value::String(s) => Ok(s.as_bytes().to_vec()),
        other => Ok(serde_json::to_vec(other)?),
    }
}
