//! Provider traits and request/response types

use super::RawResult;
use crate::config::SearchConfig;
use crate::network::HttpClient;
use crate::query::{RewrittenQueries, SearchQuery};
use crate::results::{ProviderFailure, ProviderKind};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// HTTP request to be made on behalf of a provider
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    /// URL to request
    pub url: String,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Query parameters
    pub params: HashMap<String, String>,
}

impl ProviderRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
            params: HashMap::new(),
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// HTTP response handed back to the provider for parsing
#[derive(Debug)]
pub struct ProviderResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HashMap<String, String>,
    /// Response body as text
    pub text: String,
    /// Response URL (after redirects)
    pub url: String,
}

impl ProviderResponse {
    /// Parse the body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> anyhow::Result<T> {
        Ok(serde_json::from_str(&self.text)?)
    }

    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Contract every search provider implements. Three independent
/// variants share it; there is no base implementation beyond the
/// provided `fetch`.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider name used in reports and logs
    fn name(&self) -> &'static str;

    /// Which kind of results this provider yields
    fn kind(&self) -> ProviderKind;

    /// Build the HTTP request for this query. A missing credential is a
    /// build-time `AuthInvalid`, caught before any network traffic.
    fn request(
        &self,
        queries: &RewrittenQueries,
        query: &SearchQuery,
        config: &SearchConfig,
    ) -> Result<ProviderRequest, ProviderFailure>;

    /// Map a successful HTTP exchange into raw results
    fn parse(&self, response: ProviderResponse) -> Result<Vec<RawResult>, ProviderFailure>;

    /// Fetch raw results for one query under `timeout`. Never panics
    /// past this boundary and never retries: classification happens
    /// here, retry/fallback policy belongs to the aggregator.
    async fn fetch(
        &self,
        client: &HttpClient,
        queries: &RewrittenQueries,
        query: &SearchQuery,
        config: &SearchConfig,
        timeout: Duration,
    ) -> Result<Vec<RawResult>, ProviderFailure> {
        let request = self.request(queries, query, config)?;

        debug!(provider = self.name(), url = %request.url, ?timeout, "dispatching provider request");

        let response = match tokio::time::timeout(timeout, client.execute(request)).await {
            Ok(result) => result?,
            Err(_) => return Err(ProviderFailure::Timeout),
        };

        classify_status(response.status)?;
        self.parse(response)
    }
}

/// Map HTTP status codes onto the failure taxonomy. 2xx passes through;
/// auth and quota statuses are non-retryable within a tier.
fn classify_status(status: u16) -> Result<(), ProviderFailure> {
    match status {
        200..=299 => Ok(()),
        401 | 403 => Err(ProviderFailure::AuthInvalid),
        429 => Err(ProviderFailure::QuotaExceeded),
        _ => Err(ProviderFailure::NetworkError),
    }
}
