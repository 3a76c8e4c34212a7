//! Web-search provider (Google Custom Search style JSON API)

use super::traits::{Provider, ProviderRequest, ProviderResponse};
use super::RawResult;
use crate::config::{ProviderCredentials, SearchConfig};
use crate::query::{RewrittenQueries, SearchQuery};
use crate::results::{ProviderFailure, ProviderKind};
use serde::Deserialize;
use std::collections::HashMap;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/customsearch/v1";

// The API serves at most 10 items per request.
const MAX_PER_REQUEST: usize = 10;

/// One web result as returned by the search API
#[derive(Debug, Clone, Deserialize)]
pub struct WebHit {
    pub title: Option<String>,
    pub snippet: Option<String>,
    pub link: Option<String>,
    #[serde(rename = "displayLink")]
    pub display_link: Option<String>,
    pub pagemap: Option<PageMap>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageMap {
    #[serde(default)]
    pub metatags: Vec<HashMap<String, String>>,
}

impl WebHit {
    /// First matching meta tag value, if the page exposed one
    pub fn metatag(&self, key: &str) -> Option<&str> {
        self.pagemap
            .as_ref()?
            .metatags
            .iter()
            .find_map(|tags| tags.get(key))
            .map(String::as_str)
    }
}

#[derive(Debug, Deserialize)]
struct WebEnvelope {
    #[serde(default)]
    items: Vec<WebHit>,
}

/// General web-search provider
pub struct WebSearchProvider {
    api_key: Option<String>,
    engine_id: Option<String>,
    base_url: String,
}

impl WebSearchProvider {
    pub fn new(credentials: &ProviderCredentials) -> Self {
        Self {
            api_key: credentials.web_api_key.clone(),
            engine_id: credentials.web_engine_id.clone(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the provider at a different endpoint (tests)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

impl Provider for WebSearchProvider {
    fn name(&self) -> &'static str {
        "web_search"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Web
    }

    fn request(
        &self,
        queries: &RewrittenQueries,
        query: &SearchQuery,
        config: &SearchConfig,
    ) -> Result<ProviderRequest, ProviderFailure> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ProviderFailure::AuthInvalid)?;
        let engine_id = self
            .engine_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(ProviderFailure::AuthInvalid)?;

        let num = query
            .count()
            .unwrap_or(config.max_results)
            .clamp(1, MAX_PER_REQUEST);

        Ok(ProviderRequest::get(&self.base_url)
            .param("key", api_key)
            .param("cx", engine_id)
            .param("q", &queries.web)
            .param("num", num.to_string())
            .param("safe", "active"))
    }

    fn parse(&self, response: ProviderResponse) -> Result<Vec<RawResult>, ProviderFailure> {
        let envelope: WebEnvelope = response
            .json()
            .map_err(|_| ProviderFailure::MalformedResponse)?;

        Ok(envelope.items.into_iter().map(RawResult::Web).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::rewrite;

    fn provider() -> WebSearchProvider {
        WebSearchProvider::new(
            &ProviderCredentials::new().with_web_search("test-key", "engine-1"),
        )
    }

    #[test]
    fn test_request_caps_num() {
        let query = SearchQuery::builder("rust async tutorial").count(25).build();
        let queries = rewrite(&query);

        let request = provider()
            .request(&queries, &query, &SearchConfig::default())
            .unwrap();

        assert_eq!(request.params.get("num").map(String::as_str), Some("10"));
        assert_eq!(request.params.get("cx").map(String::as_str), Some("engine-1"));
        assert_eq!(request.params.get("safe").map(String::as_str), Some("active"));
    }

    #[test]
    fn test_missing_engine_id_is_auth_invalid() {
        let credentials = ProviderCredentials::new().with_web_search("key", "");
        let provider = WebSearchProvider::new(&credentials);
        let query = SearchQuery::builder("anything").build();
        let queries = rewrite(&query);

        assert_eq!(
            provider
                .request(&queries, &query, &SearchConfig::default())
                .unwrap_err(),
            ProviderFailure::AuthInvalid
        );
    }

    #[test]
    fn test_parse_items_and_metatags() {
        let body = r#"{
            "items": [
                {
                    "title": "Async Rust Guide",
                    "snippet": "Learn async rust.",
                    "link": "https://example.com/async",
                    "displayLink": "example.com",
                    "pagemap": {
                        "metatags": [
                            {"article:published_time": "2025-06-01T12:00:00Z"}
                        ]
                    }
                }
            ]
        }"#;

        let response = ProviderResponse {
            status: 200,
            headers: Default::default(),
            text: body.to_string(),
            url: DEFAULT_BASE_URL.to_string(),
        };

        let raws = provider().parse(response).unwrap();
        assert_eq!(raws.len(), 1);
        match &raws[0] {
            RawResult::Web(hit) => {
                assert_eq!(hit.title.as_deref(), Some("Async Rust Guide"));
                assert_eq!(
                    hit.metatag("article:published_time"),
                    Some("2025-06-01T12:00:00Z")
                );
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }
}
