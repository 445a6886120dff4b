use super::gateway::HttpGateway;
use super::mqtt::MqttPublisher;
use crate::config::DeliverySettings;
use crate::record::Record;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Errors raised by a single transport attempt. Every variant is handled the
/// same way by the resolver: the record is demoted to the retry state.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("gateway request failed: {0}")]
    Gateway(#[from] reqwest::Error),
    #[error("gateway returned status {0}")]
    GatewayStatus(u16),
    #[error("mqtt publish failed: {0}")]
    MqttClient(#[from] rumqttc::ClientError),
    #[error("mqtt connection failed: {0}")]
    MqttConnection(#[from] rumqttc::ConnectionError),
    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("delivery attempt timed out")]
    Timeout,
}

/// Classification of one delivery attempt for the whole transport set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Delivered,
    Failed,
}

/// Attempts forwarding of one record through every configured transport.
#[derive(Debug)]
pub struct DeliveryAttempter {
    gateway: Option<HttpGateway>,
    mqtt: Option<MqttPublisher>,
}

impl DeliveryAttempter {
    pub fn new(gateway: Option<HttpGateway>, mqtt: Option<MqttPublisher>) -> Self {
        Self { gateway, mqtt }
    }

    /// Builds the transport set from configuration. A transport with no
    /// configured address is simply absent, not an error.
    pub fn from_settings(
        settings: &DeliverySettings,
        device_name: &str,
    ) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_secs(settings.send_timeout_secs);
        let gateway = match &settings.gateway_url {
            Some(url) => Some(HttpGateway::new(
                url.clone(),
                settings.api_key.clone(),
                settings.success_status,
                timeout,
            )?),
            None => None,
        };
        let mqtt = settings
            .mqtt_host
            .as_ref()
            .map(|host| MqttPublisher::new(host.clone(), settings.mqtt_port, device_name, timeout));
        Ok(Self::new(gateway, mqtt))
    }

    pub fn transport_count(&self) -> usize {
        usize::from(self.gateway.is_some()) + usize::from(self.mqtt.is_some())
    }

    /// Attempts every configured transport for one record.
    ///
    /// A failing transport does not stop the remaining ones from being
    /// attempted, but the attempt as a whole is failed if any transport
    /// failed. With no transports configured the attempt trivially succeeds.
    pub async fn deliver(&self, record: &Record, raw: &[u8]) -> Outcome {
        let uid = record.uid.as_deref().unwrap_or("<unstamped>");
        let mut failed = false;

        if let Some(gateway) = &self.gateway {
            if let Err(e) = gateway.forward(raw).await {
                warn!("failed to relay {uid} to {}: {e}", gateway.url());
                failed = true;
            }
        }
        if let Some(mqtt) = &self.mqtt {
            if let Err(e) = mqtt.publish(record).await {
                warn!("failed to publish {uid} on {:?}: {e}", record.source);
                failed = true;
            }
        }

        if failed { Outcome::Failed } else { Outcome::Delivered }
    }
}
