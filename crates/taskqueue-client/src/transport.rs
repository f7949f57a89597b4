//! HTTP transport seam.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use taskqueue_config::BackendConfig;
use taskqueue_protocol::{RawResponse, SignedRequest};

use crate::error::ClientError;

/// Sends signed requests to the backend.
///
/// Implementations never fail outright: a request that produced no HTTP
/// response is reported as [`RawResponse::transport_failure`].
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn post(&self, request: SignedRequest) -> RawResponse;
}

/// [`HttpTransport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &BackendConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("taskqueue/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::HttpClient(e.to_string()))?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post(&self, request: SignedRequest) -> RawResponse {
        let mut builder = self.client.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = match builder.body(request.body).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!(url = %request.url, error = %e, "Task queue request failed");
                return RawResponse::transport_failure(e.to_string());
            }
        };

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        match response.bytes().await {
            Ok(body) => RawResponse::new(status, headers, body),
            Err(e) => RawResponse::transport_failure(e.to_string()),
        }
    }
}
