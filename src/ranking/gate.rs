//! Relevance gate
//!
//! Computes text relevance and applies the hard gates. Rejections are
//! silent per-result drops; the gate never fails a whole batch.

use crate::config::SearchConfig;
use crate::query::{self, SearchQuery};
use crate::results::NormalizedResult;
use std::collections::HashSet;

/// Per-result admission filter built once per aggregation pass.
pub struct RelevanceGate {
    query_tokens: HashSet<String>,
    location_bound: bool,
    min_relevance: f64,
}

impl RelevanceGate {
    pub fn new(query: &SearchQuery, config: &SearchConfig) -> Self {
        Self {
            query_tokens: query::tokenize(query.raw()),
            location_bound: query.is_location_bound(),
            min_relevance: config.min_relevance_score,
        }
    }

    /// Admit a result, returning its text relevance, or `None` when a
    /// hard gate drops it.
    pub fn admit(&self, result: &NormalizedResult) -> Option<f64> {
        if !result.is_valid {
            return None;
        }

        // Location-bound queries need structured results to prove they
        // are about a place: an address or a rating.
        if self.location_bound
            && result.provider.is_structured()
            && result.address.is_none()
            && result.rating.is_none()
        {
            return None;
        }

        let relevance = self.relevance(result);
        if relevance < self.min_relevance {
            return None;
        }

        Some(relevance)
    }

    /// Jaccard overlap between query tokens and title+snippet tokens.
    /// Bounded to `[0, 1]` and monotonic in shared-term count.
    pub fn relevance(&self, result: &NormalizedResult) -> f64 {
        if self.query_tokens.is_empty() {
            return 0.0;
        }

        let text = format!("{} {}", result.title, result.snippet);
        let result_tokens = query::tokenize(&text);

        let shared = self.query_tokens.intersection(&result_tokens).count();
        let union = self.query_tokens.union(&result_tokens).count();

        if union == 0 {
            0.0
        } else {
            shared as f64 / union as f64
        }
    }
}
