//! Unisearch: tiered multi-provider search aggregation
//!
//! Aggregates results from heterogeneous search providers (business
//! directory, geocoded places, web search), normalizes them into one
//! schema, filters for relevance, ranks them with a weighted composite
//! score, enforces source diversity, and degrades gracefully through
//! priority tiers when providers fail.
//!
//! The pipeline is pure per invocation: the caller hands in a
//! [`SearchQuery`], a [`SearchConfig`] and [`ProviderCredentials`], and
//! receives an ordered result list plus an outcome tag. Nothing here
//! reads ambient process state or keeps durable state between calls.

pub mod config;
pub mod network;
pub mod normalize;
pub mod providers;
pub mod query;
pub mod ranking;
pub mod results;
pub mod search;

pub use config::{ProviderCredentials, SearchConfig};
pub use network::HttpClient;
pub use providers::{Provider, RawResult};
pub use query::{QueryIntent, RewrittenQueries, SearchQuery};
pub use results::{
    AggregatorOutcome, NormalizedResult, ProviderFailure, ProviderKind, ProviderReport,
    ProviderState, ScoredResult, SearchOutput,
};
pub use search::{Aggregator, Tier};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
