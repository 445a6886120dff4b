use super::attempter::DeliveryError;
use std::time::Duration;

/// Forwards raw serialized records to the collector's HTTP gateway.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    success_status: u16,
}

impl HttpGateway {
    pub fn new(
        url: String,
        api_key: Option<String>,
        success_status: u16,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            url,
            api_key,
            success_status,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POSTs the record and succeeds only on the configured success status.
    pub async fn forward(&self, raw: &[u8]) -> Result<(), DeliveryError> {
        let mut request = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(raw.to_vec());
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        if status == self.success_status {
            Ok(())
        } else {
            Err(DeliveryError::GatewayStatus(status))
        }
    }
}
