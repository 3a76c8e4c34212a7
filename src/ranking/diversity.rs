//! Diversity limiter
//!
//! Greedy rank-order selection with an absolute per-domain cap. A
//! candidate from a capped domain is skipped, never re-admitted; the
//! walk continues so lower-scored candidates from other domains can
//! still fill the remaining slots.

use super::scorer::compare;
use crate::config::SearchConfig;
use crate::results::ScoredResult;
use std::collections::HashMap;
use tracing::debug;

/// Enforces `max_domain_repeats` and `max_results` over scored results.
pub struct DiversityLimiter {
    max_domain_repeats: usize,
    max_results: usize,
}

impl DiversityLimiter {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            max_domain_repeats: config.max_domain_repeats,
            max_results: config.max_results,
        }
    }

    /// Cap the output length (a query may ask for fewer than the
    /// configured maximum).
    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Select the final ordered output. Input order does not matter;
    /// candidates are re-sorted by composite score with deterministic
    /// tie-breaks (higher-priority tier, then discovery order).
    pub fn select(&self, mut candidates: Vec<ScoredResult>) -> Vec<ScoredResult> {
        candidates.sort_by(compare);

        let mut domain_counts: HashMap<String, usize> = HashMap::new();
        let mut selected = Vec::with_capacity(self.max_results.min(candidates.len()));
        let mut skipped = 0usize;

        for candidate in candidates {
            if selected.len() >= self.max_results {
                break;
            }

            let count = domain_counts
                .entry(candidate.result.domain.clone())
                .or_insert(0);
            if *count >= self.max_domain_repeats {
                skipped += 1;
                continue;
            }

            *count += 1;
            selected.push(candidate);
        }

        if skipped > 0 {
            debug!(skipped, "domain cap dropped over-represented results");
        }

        selected
    }
}
