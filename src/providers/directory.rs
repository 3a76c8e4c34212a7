//! Business-directory provider (Yelp Fusion style API)

use super::traits::{Provider, ProviderRequest, ProviderResponse};
use super::RawResult;
use crate::config::{ProviderCredentials, SearchConfig};
use crate::query::{RewrittenQueries, SearchQuery};
use crate::results::{ProviderFailure, ProviderKind};
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://api.yelp.com/v3/businesses/search";

// The API rejects limits above 50.
const MAX_LIMIT: usize = 50;

/// One business listing as returned by the directory API
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryBusiness {
    pub name: Option<String>,
    pub url: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<u64>,
    pub price: Option<String>,
    #[serde(default)]
    pub categories: Vec<DirectoryCategory>,
    pub location: Option<DirectoryLocation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryCategory {
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryLocation {
    pub address1: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DirectoryEnvelope {
    #[serde(default)]
    businesses: Vec<DirectoryBusiness>,
}

/// Business-directory search provider
pub struct DirectoryProvider {
    api_key: Option<String>,
    base_url: String,
}

impl DirectoryProvider {
    pub fn new(credentials: &ProviderCredentials) -> Self {
        Self {
            api_key: credentials.directory_api_key.clone(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the provider at a different endpoint (tests)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

impl Provider for DirectoryProvider {
    fn name(&self) -> &'static str {
        "directory"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Directory
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

        let limit = query
            .count()
            .unwrap_or(config.max_results)
            .clamp(1, MAX_LIMIT);

        let mut request = ProviderRequest::get(&self.base_url)
            .header("Authorization", format!("Bearer {}", api_key))
            .param("term", &queries.directory)
            .param("limit", limit.to_string())
            .param("sort_by", "rating");

        if let Some(location) = query.location() {
            request = request.param("location", location);
        }

        Ok(request)
    }

    fn parse(&self, response: ProviderResponse) -> Result<Vec<RawResult>, ProviderFailure> {
        let envelope: DirectoryEnvelope = response
            .json()
            .map_err(|_| ProviderFailure::MalformedResponse)?;

        Ok(envelope
            .businesses
            .into_iter()
            .map(RawResult::Directory)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::rewrite;

    fn provider() -> DirectoryProvider {
        DirectoryProvider::new(
            &ProviderCredentials::new().with_directory_api_key("test-key"),
        )
    }

    #[test]
    fn test_request_construction() {
        let query = SearchQuery::builder("coffee shops")
            .location("San Francisco, CA")
            .count(5)
            .build();
        let queries = rewrite(&query);

        let request = provider()
            .request(&queries, &query, &SearchConfig::default())
            .unwrap();

        assert!(request.url.contains("businesses/search"));
        assert_eq!(
            request.headers.get("Authorization").map(String::as_str),
            Some("Bearer test-key")
        );
        assert_eq!(request.params.get("limit").map(String::as_str), Some("5"));
        assert_eq!(
            request.params.get("location").map(String::as_str),
            Some("San Francisco, CA")
        );
    }

    #[test]
    fn test_missing_key_is_auth_invalid() {
        let provider = DirectoryProvider::new(&ProviderCredentials::new());
        let query = SearchQuery::builder("coffee").build();
        let queries = rewrite(&query);

        assert_eq!(
            provider
                .request(&queries, &query, &SearchConfig::default())
                .unwrap_err(),
            ProviderFailure::AuthInvalid
        );
    }

    #[test]
    fn test_parse_envelope() {
        let body = r#"{
            "businesses": [
                {
                    "name": "Blue Bottle Coffee",
                    "url": "https://www.yelp.com/biz/blue-bottle",
                    "rating": 4.5,
                    "review_count": 812,
                    "price": "$$",
                    "categories": [{"title": "Coffee & Tea"}],
                    "location": {"address1": "66 Mint St", "city": "San Francisco"}
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
            RawResult::Directory(b) => {
                assert_eq!(b.name.as_deref(), Some("Blue Bottle Coffee"));
                assert_eq!(b.review_count, Some(812));
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_parse_garbage_is_malformed() {
        let response = ProviderResponse {
            status: 200,
            headers: Default::default(),
            text: "<html>not json</html>".to_string(),
            url: DEFAULT_BASE_URL.to_string(),
        };

        assert_eq!(
            provider().parse(response).unwrap_err(),
            ProviderFailure::MalformedResponse
        );
    }
}
