//! HTTP client for making requests to search providers

use crate::providers::{ProviderRequest, ProviderResponse};
use crate::results::ProviderFailure;
use anyhow::Result;
use reqwest::{Client, Response};
use std::collections::HashMap;
use std::time::Duration;

const USER_AGENT: &str = concat!("unisearch/", env!("CARGO_PKG_VERSION"));

/// Thin wrapper over reqwest that executes provider requests and maps
/// transport errors into the provider failure taxonomy. Per-call
/// timeouts are enforced by the caller; this client only carries a
/// conservative connection-level ceiling.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }

    /// Execute a provider request. Transport-level problems come back
    /// already classified; HTTP status interpretation is left to the
    /// provider, which knows its API's conventions.
    pub async fn execute(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderFailure> {
        let mut req_builder = self
            .client
            .get(&request.url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json");

        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }

        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }

        let response = req_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderFailure::Timeout
            } else {
                ProviderFailure::NetworkError
            }
        })?;

        Self::read_response(response).await
    }

    async fn read_response(
        response: Response,
    ) -> std::result::Result<ProviderResponse, ProviderFailure> {
        let status = response.status().as_u16();
        let url = response.url().to_string();

        let mut headers = HashMap::new();
        for (key, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(key.to_string(), v.to_string());
            }
        }

        let text = response
            .text()
            .await
            .map_err(|_| ProviderFailure::NetworkError)?;

        Ok(ProviderResponse {
            status,
            headers,
            text,
            url,
        })
    }
}
