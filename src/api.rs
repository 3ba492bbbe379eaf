use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::ConvertError;
use crate::model::{ConversionRequest, RawResponse};

/// Outbound side of a conversion. Implementations report whatever the server
/// answered; only a request that never completes is an error here.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send_conversion(&self, request: &ConversionRequest) -> Result<RawResponse, ConvertError>;
}

#[derive(Deserialize)]
struct HealthResponse {
    status: String,
}

#[derive(Clone)]
pub struct ReqwestClient {
    client: Client,
    base_url: String,
}

impl ReqwestClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ConvertError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the `status` the service reports, e.g. `"healthy"`.
    pub async fn health(&self) -> Result<String, ConvertError> {
        let url = format!("{}/health", self.base_url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ConvertError::server_status(status.as_u16()));
        }

        let health: HealthResponse = response
            .json()
            .await
            .map_err(|e| ConvertError::MalformedBody(e.to_string()))?;
        Ok(health.status)
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn send_conversion(&self, request: &ConversionRequest) -> Result<RawResponse, ConvertError> {
        let url = format!("{}/api/convert", self.base_url);
        tracing::debug!(%url, recipient = request.target().as_str(), "sending conversion request");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        tracing::debug!(status, bytes = body.len(), "conversion response received");

        Ok(RawResponse { status, body })
    }
}
