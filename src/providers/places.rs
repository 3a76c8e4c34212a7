//! Geocoded places provider (Google Places text-search style API)

use super::traits::{Provider, ProviderRequest, ProviderResponse};
use super::RawResult;
use crate::config::{ProviderCredentials, SearchConfig};
use crate::query::{RewrittenQueries, SearchQuery};
use crate::results::{ProviderFailure, ProviderKind};
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place/textsearch/json";

/// One place as returned by the places API
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceHit {
    pub name: Option<String>,
    pub website: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u64>,
    pub price_level: Option<u8>,
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PlacesEnvelope {
    status: Option<String>,
    #[serde(default)]
    results: Vec<PlaceHit>,
}

/// Geocoded places search provider
pub struct PlacesProvider {
    api_key: Option<String>,
    base_url: String,
}

impl PlacesProvider {
    pub fn new(credentials: &ProviderCredentials) -> Self {
        Self {
            api_key: credentials.places_api_key.clone(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the provider at a different endpoint (tests)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

impl Provider for PlacesProvider {
    fn name(&self) -> &'static str {
        "places"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Places
    }

    fn request(
        &self,
        queries: &RewrittenQueries,
        _query: &SearchQuery,
        _config: &SearchConfig,
    ) -> Result<ProviderRequest, ProviderFailure> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ProviderFailure::AuthInvalid)?;

        Ok(ProviderRequest::get(&self.base_url)
            .param("query", &queries.places)
            .param("type", "establishment")
            .param("key", api_key))
    }

    fn parse(&self, response: ProviderResponse) -> Result<Vec<RawResult>, ProviderFailure> {
        let envelope: PlacesEnvelope = response
            .json()
            .map_err(|_| ProviderFailure::MalformedResponse)?;

        // This API reports errors in-band through `status`, not HTTP codes.
        match envelope.status.as_deref() {
            Some("OK") | None => {}
            Some("ZERO_RESULTS") => return Ok(Vec::new()),
            Some("OVER_QUERY_LIMIT") => return Err(ProviderFailure::QuotaExceeded),
            Some("REQUEST_DENIED") => return Err(ProviderFailure::AuthInvalid),
            Some(_) => return Err(ProviderFailure::MalformedResponse),
        }

        Ok(envelope.results.into_iter().map(RawResult::Places).collect())
    }
}
