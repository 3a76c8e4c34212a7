//! Composite scoring
//!
//! `composite = w_text * text_relevance + w_fresh * freshness
//!            + w_auth * authority + w_engage * engagement
//!            + w_div * diversity_signal`
//!
//! Every component is clamped to `[0, 1]` before weighting. The
//! composite itself is not re-clamped: weights are un-normalized, so a
//! sum above 1.0 is legitimate.

use super::Candidate;
use crate::config::SearchConfig;
use crate::results::{ComponentScores, ScoredResult};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use std::collections::HashMap;

// Review counts saturate the log scale here; one viral listing cannot
// dominate the component.
const REVIEW_SATURATION: f64 = 10_000.0;

static DOMAIN_AUTHORITY: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    HashMap::from([
        ("stackoverflow.com", 0.9),
        ("github.com", 0.9),
        ("docs.microsoft.com", 0.8),
        ("developer.mozilla.org", 0.8),
        ("python.org", 0.8),
        ("reactjs.org", 0.8),
        ("vuejs.org", 0.8),
        ("angular.io", 0.8),
        ("blog.logrocket.com", 0.7),
        ("css-tricks.com", 0.7),
        ("smashingmagazine.com", 0.7),
        ("alistapart.com", 0.7),
        ("medium.com", 0.6),
        ("dev.to", 0.6),
        ("hashnode.dev", 0.6),
    ])
});

/// Scores gated candidates with the weighted multi-factor formula.
pub struct CompositeScorer<'a> {
    config: &'a SearchConfig,
    now: DateTime<Utc>,
}

impl<'a> CompositeScorer<'a> {
    pub fn new(config: &'a SearchConfig) -> Self {
        Self {
            config,
            now: Utc::now(),
        }
    }

    /// Fix the reference time for freshness (tests)
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Score all candidates. The diversity signal is computed against a
    /// provisional ranking of the other components: each candidate sees
    /// how many higher-ranked results already share its domain. Actual
    /// diversity enforcement happens later, in the limiter.
    pub fn score_all(&self, candidates: Vec<Candidate>) -> Vec<ScoredResult> {
        let c = self.config;

        let mut partial: Vec<(Candidate, ComponentScores, f64)> = candidates
            .into_iter()
            .map(|candidate| {
                let scores = ComponentScores {
                    text_relevance: clamp(candidate.text_relevance),
                    freshness: self.freshness(candidate.result.published_at),
                    authority: authority(&candidate.result.domain, c.neutral_authority),
                    engagement: engagement(
                        candidate.result.rating,
                        candidate.result.review_count,
                        c.neutral_engagement,
                    ),
                    diversity_signal: 0.0,
                };
                let base = c.text_relevance_weight * scores.text_relevance
                    + c.freshness_weight * scores.freshness
                    + c.authority_weight * scores.authority
                    + c.engagement_weight * scores.engagement;
                (candidate, scores, base)
            })
            .collect();

        // Provisional order for the diversity signal: base score
        // descending, tier and discovery order as tie-breaks.
        partial.sort_by(|a, b| {
            b.2.partial_cmp(&a.2)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.tier.cmp(&b.0.tier))
                .then_with(|| a.0.seq.cmp(&b.0.seq))
        });

        let mut seen_domains: HashMap<String, usize> = HashMap::new();
        let mut scored: Vec<ScoredResult> = partial
            .into_iter()
            .map(|(candidate, mut scores, base)| {
                let prior = seen_domains
                    .entry(candidate.result.domain.clone())
                    .or_insert(0);
                scores.diversity_signal = 1.0 / (1.0 + *prior as f64);
                *prior += 1;

                ScoredResult {
                    composite_score: base + c.diversity_weight * scores.diversity_signal,
                    scores,
                    result: candidate.result,
                    tier: candidate.tier,
                    seq: candidate.seq,
                }
            })
            .collect();

        scored.sort_by(compare);
        scored
    }

    /// Exponential half-life decay on result age; undated results score
    /// the configured neutral value, not zero.
    fn freshness(&self, published_at: Option<DateTime<Utc>>) -> f64 {
        let Some(ts) = published_at else {
            return clamp(self.config.neutral_freshness);
        };

        let age_days = (self.now - ts).num_seconds().max(0) as f64 / 86_400.0;
        clamp(0.5_f64.powf(age_days / self.config.freshness_half_life_days))
    }
}

/// Ordering for scored results: composite descending, then tier
/// priority, then discovery order. Total and deterministic.
pub(crate) fn compare(a: &ScoredResult, b: &ScoredResult) -> std::cmp::Ordering {
    b.composite_score
        .partial_cmp(&a.composite_score)
        .unwrap_or(std::cmp::Ordering::Equal)
        .then_with(|| a.tier.cmp(&b.tier))
        .then_with(|| a.seq.cmp(&b.seq))
}

/// Static authority lookup with TLD-based defaults; unknown domains get
/// the configured neutral value.
fn authority(domain: &str, neutral: f64) -> f64 {
    if domain.is_empty() {
        return clamp(neutral);
    }
    if let Some(&score) = DOMAIN_AUTHORITY.get(domain) {
        return score;
    }
    if domain.ends_with(".gov") {
        0.8
    } else if domain.ends_with(".edu") || domain.ends_with(".org") {
        0.7
    } else if domain.ends_with(".com") {
        0.6
    } else {
        clamp(neutral)
    }
}

/// Bounded blend of rating (linear in the 5-star scale) and log-scaled
/// review volume. Results with neither signal get the neutral value,
/// which also stands in for whichever half is missing.
fn engagement(rating: Option<f64>, review_count: Option<u64>, neutral: f64) -> f64 {
    let neutral = clamp(neutral);
    if rating.is_none() && review_count.is_none() {
        return neutral;
    }

    let rating_part = rating.map_or(neutral, |r| clamp(r / 5.0));
    let review_part = review_count.map_or(neutral, |n| {
        clamp(((1.0 + n as f64).ln()) / (1.0 + REVIEW_SATURATION).ln())
    });

    clamp(0.6 * rating_part + 0.4 * review_part)
}

fn clamp(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
