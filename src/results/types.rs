//! Result type definitions

use crate::query::RewrittenQueries;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which backend produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Business-directory API (rated listings with addresses)
    Directory,
    /// Geocoded places API
    Places,
    /// General web-search API
    Web,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Directory => "directory",
            Self::Places => "places",
            Self::Web => "web",
        }
    }

    /// Whether results of this kind carry structured business fields
    /// (address, rating) that location-bound queries can require.
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Directory | Self::Places)
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A provider-agnostic search result. This is the uniform shape every
/// provider payload is mapped into; downstream stages see nothing else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedResult {
    /// Result title (business name or page title)
    pub title: String,
    /// Result URL, tracking parameters stripped
    pub url: String,
    /// Host derived from `url`, lowercased, `www.` removed.
    /// Empty when the URL did not parse.
    pub domain: String,
    /// Content snippet or synthesized description
    pub snippet: String,
    /// Star rating, if the provider reports one
    pub rating: Option<f64>,
    /// Number of reviews behind the rating
    pub review_count: Option<u64>,
    /// Price indicator (e.g. "$$")
    pub price: Option<String>,
    /// Street address for directory/places results
    pub address: Option<String>,
    /// Publication timestamp, when one could be extracted
    pub published_at: Option<DateTime<Utc>>,
    /// Provider that returned this result
    pub provider: ProviderKind,
    /// False when a required field was malformed (unparsable URL,
    /// empty title). Invalid results are excluded before scoring,
    /// not dropped during normalization.
    pub is_valid: bool,
}

/// Per-component scores, each clamped to `[0, 1]` before weighting.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ComponentScores {
    pub text_relevance: f64,
    pub freshness: f64,
    pub authority: f64,
    pub engagement: f64,
    pub diversity_signal: f64,
}

/// A normalized result with its component scores and final composite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredResult {
    pub result: NormalizedResult,
    pub scores: ComponentScores,
    /// Weighted sum of the components. Not re-clamped: weights are
    /// un-normalized, so this can exceed 1.0.
    pub composite_score: f64,
    /// Index of the tier that discovered this result (0 = highest priority)
    pub tier: usize,
    /// Discovery order across the whole aggregation pass
    pub seq: usize,
}

impl ScoredResult {
    pub fn domain(&self) -> &str {
        &self.result.domain
    }
}

/// Classified technical failure from a single provider call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderFailure {
    #[error("invalid or missing credentials")]
    AuthInvalid,
    #[error("provider quota exceeded")]
    QuotaExceeded,
    #[error("network error")]
    NetworkError,
    #[error("request timed out")]
    Timeout,
    #[error("malformed provider response")]
    MalformedResponse,
}

/// Lifecycle of one provider call within an aggregation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderState {
    Pending,
    Fetching,
    /// Terminal: the call returned, with this many post-gate results
    Succeeded(usize),
    /// Terminal: the call failed with a classified error
    Failed(ProviderFailure),
}

impl ProviderState {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Record of one provider call: terminal state plus timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderReport {
    pub provider: String,
    pub kind: ProviderKind,
    pub tier: usize,
    pub state: ProviderState,
    pub elapsed_ms: u64,
}

/// Final outcome of one aggregation pass. The four categories are
/// distinct on purpose: an empty list from healthy providers
/// (`NoMatches`) is not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregatorOutcome {
    /// Results returned and no provider failed technically
    Success,
    /// Results returned, but at least one provider failed
    PartialSuccess,
    /// Every attempted provider answered, none yielded a qualifying result
    NoMatches,
    /// Every attempted provider failed technically
    AllProvidersFailed,
}

/// Ordered ranked results plus the outcome tag, per-provider reports and
/// the rewritten queries the pass actually sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutput {
    pub results: Vec<ScoredResult>,
    pub outcome: AggregatorOutcome,
    pub reports: Vec<ProviderReport>,
    /// What each provider was asked, after rewriting. Echoed so callers
    /// can display or debug the query that produced these results.
    pub queries: RewrittenQueries,
}

impl SearchOutput {
    /// Names of providers that ended in a failed state.
    pub fn failed_providers(&self) -> Vec<&str> {
        self.reports
            .iter()
            .filter(|r| r.state.is_failed())
            .map(|r| r.provider.as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
