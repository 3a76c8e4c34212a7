//! Configuration structures
//!
//! Configuration is injected by the caller per aggregation pass. Nothing
//! here reads the environment: credential loading belongs to the
//! embedding application, and `SearchConfig` is immutable once built.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default per-provider timeout in seconds
pub const DEFAULT_PROVIDER_TIMEOUT: f64 = 10.0;

/// Maximum per-provider timeout that can be configured
pub const MAX_PROVIDER_TIMEOUT: f64 = 30.0;

/// Tunables for gating, scoring and selection. Every option has a
/// default; weights are deliberately not required to sum to 1, so the
/// composite score is an un-normalized weighted sum.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Hard floor for text relevance; results below it are dropped
    pub min_relevance_score: f64,
    /// Per-domain cap in the final output
    pub max_domain_repeats: usize,
    /// Output length cap
    pub max_results: usize,

    /// Weight of text relevance in the composite score
    pub text_relevance_weight: f64,
    /// Weight of freshness
    pub freshness_weight: f64,
    /// Weight of domain authority
    pub authority_weight: f64,
    /// Weight of rating/review engagement
    pub engagement_weight: f64,
    /// Weight of the pre-enforcement diversity signal
    pub diversity_weight: f64,

    /// Half-life in days for freshness decay
    pub freshness_half_life_days: f64,
    /// Per-provider call timeout in seconds
    pub provider_timeout_secs: f64,

    /// Freshness assigned to undated results
    pub neutral_freshness: f64,
    /// Engagement assigned to results with neither rating nor reviews
    pub neutral_engagement: f64,
    /// Authority assigned to unknown domains without a TLD default
    pub neutral_authority: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_relevance_score: 0.2,
            max_domain_repeats: 2,
            max_results: 15,
            text_relevance_weight: 0.4,
            freshness_weight: 0.2,
            authority_weight: 0.2,
            engagement_weight: 0.1,
            diversity_weight: 0.1,
            freshness_half_life_days: 180.0,
            provider_timeout_secs: DEFAULT_PROVIDER_TIMEOUT,
            neutral_freshness: 0.5,
            neutral_engagement: 0.5,
            neutral_authority: 0.5,
        }
    }
}

impl SearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_relevance_score(mut self, score: f64) -> Self {
        self.min_relevance_score = score;
        self
    }

    pub fn with_max_domain_repeats(mut self, repeats: usize) -> Self {
        self.max_domain_repeats = repeats;
        self
    }

    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    pub fn with_provider_timeout(mut self, secs: f64) -> Self {
        self.provider_timeout_secs = secs.min(MAX_PROVIDER_TIMEOUT);
        self
    }

    /// Per-provider timeout as a `Duration`
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.provider_timeout_secs.min(MAX_PROVIDER_TIMEOUT))
    }
}

/// Opaque per-provider secrets, injected by the caller. A provider whose
/// credential is absent fails its call with `AuthInvalid` instead of
/// falling back to ambient process state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderCredentials {
    /// Bearer token for the business-directory API
    pub directory_api_key: Option<String>,
    /// API key for the geocoded places API
    pub places_api_key: Option<String>,
    /// API key for the web-search API
    pub web_api_key: Option<String>,
    /// Custom search engine id for the web-search API
    pub web_engine_id: Option<String>,
}

impl ProviderCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_directory_api_key(mut self, key: impl Into<String>) -> Self {
        self.directory_api_key = Some(key.into());
        self
    }

    pub fn with_places_api_key(mut self, key: impl Into<String>) -> Self {
        self.places_api_key = Some(key.into());
        self
    }

    pub fn with_web_search(
        mut self,
        key: impl Into<String>,
        engine_id: impl Into<String>,
    ) -> Self {
        self.web_api_key = Some(key.into());
        self.web_engine_id = Some(engine_id.into());
        self
    }
}
