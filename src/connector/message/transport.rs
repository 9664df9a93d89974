use crate::connector::{ConnectorError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// Delivery channel to the orchestrator.
///
/// `Ok(None)` means nobody answered; it is not an error.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn deliver(&self, message: Value) -> Result<Option<Value>>;
}

/// Transport that POSTs each message as JSON to an orchestrator endpoint
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    /// Create a transport for `endpoint`, e.g. `http://127.0.0.1:7171/messages`
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("media-connector/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(ConnectorError::Network)?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Map an HTTP reply to an optional JSON body
    async fn handle_response(response: reqwest::Response) -> Result<Option<Value>> {
        let status = response.status();

        if matches!(
            status,
            StatusCode::NO_CONTENT | StatusCode::NOT_FOUND | StatusCode::SERVICE_UNAVAILABLE
        ) {
            return Ok(None);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ConnectorError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await.map_err(ConnectorError::Network)?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| ConnectorError::Parse(format!("JSON parse error: {e}")))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn deliver(&self, message: Value) -> Result<Option<Value>> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Accept", "application/json")
            .json(&message)
            .send()
            .await
            .map_err(ConnectorError::Network)?;

        Self::handle_response(response).await
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}
