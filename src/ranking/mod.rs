//! Relevance gating, deduplication, composite scoring and diversity
//! limiting

mod dedup;
mod diversity;
mod gate;
mod scorer;

pub use dedup::dedup;
pub use diversity::DiversityLimiter;
pub use gate::RelevanceGate;
pub use scorer::CompositeScorer;

use crate::results::NormalizedResult;

/// A gated result awaiting scoring. `tier` and `seq` record where and
/// in what order the aggregation pass discovered it; both feed the
/// deterministic tie-breaks downstream.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub result: NormalizedResult,
    pub text_relevance: f64,
    pub tier: usize,
    pub seq: usize,
}
