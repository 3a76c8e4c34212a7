//! Cross-provider deduplication
//!
//! Providers overlap: the same page can come back from two sources, or
//! the same business from directory and places. Duplicates are detected
//! by exact normalized-URL match first, then by fuzzy title overlap.
//! The first occurrence wins, so a higher-priority tier keeps its copy.

use super::Candidate;
use std::collections::HashSet;
use tracing::debug;

// Jaccard similarity at or above this marks two titles as the same item.
const TITLE_SIMILARITY_THRESHOLD: f64 = 0.8;

/// Drop candidates that duplicate an earlier one. Input order is
/// discovery order and is preserved; `seq` values keep their gaps.
pub fn dedup(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut kept: Vec<Candidate> = Vec::with_capacity(candidates.len());
    let mut dropped = 0usize;

    for candidate in candidates {
        let url = candidate
            .result
            .url
            .trim_end_matches('/')
            .to_lowercase();
        if !url.is_empty() && !seen_urls.insert(url) {
            dropped += 1;
            continue;
        }

        if kept
            .iter()
            .any(|k| similar_titles(&k.result.title, &candidate.result.title))
        {
            dropped += 1;
            continue;
        }

        kept.push(candidate);
    }

    if dropped > 0 {
        debug!(dropped, kept = kept.len(), "deduplication dropped repeats");
    }

    kept
}

/// Jaccard overlap of lowercased whitespace tokens at or above the
/// threshold. Titles are compared as written; no stopword filtering,
/// so short business names still compare meaningfully.
fn similar_titles(a: &str, b: &str) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let tokens_a: HashSet<&str> = a.split_whitespace().collect();
    let tokens_b: HashSet<&str> = b.split_whitespace().collect();

    let union = tokens_a.union(&tokens_b).count();
    if union == 0 {
        return false;
    }
    let shared = tokens_a.intersection(&tokens_b).count();

    shared as f64 / union as f64 >= TITLE_SIMILARITY_THRESHOLD
}
