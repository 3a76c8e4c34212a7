//! Tiered fallback aggregation
//!
//! Providers are organized into priority tiers. Providers within one
//! tier run concurrently; tiers run strictly in sequence, and a lower
//! tier is only attempted after the one above it proved insufficient.
//! Partial results are merged, never discarded.

use crate::config::{ProviderCredentials, SearchConfig};
use crate::network::HttpClient;
use crate::providers::{
    DirectoryProvider, PlacesProvider, Provider, WebSearchProvider,
};
use crate::query::{self, QueryIntent, SearchQuery};
use crate::ranking::{dedup, Candidate, CompositeScorer, DiversityLimiter, RelevanceGate};
use crate::results::{
    AggregatorOutcome, ProviderReport, ProviderState, SearchOutput,
};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::normalize::normalize;

/// One priority tier: the providers it queries concurrently.
pub struct Tier {
    providers: Vec<Arc<dyn Provider>>,
}

impl Tier {
    pub fn of(providers: Vec<Arc<dyn Provider>>) -> Self {
        Self { providers }
    }

    pub fn single(provider: Arc<dyn Provider>) -> Self {
        Self {
            providers: vec![provider],
        }
    }

    pub fn providers(&self) -> &[Arc<dyn Provider>] {
        &self.providers
    }
}

/// Build the standard tier plan for a query intent.
pub fn plan_tiers(credentials: &ProviderCredentials, intent: QueryIntent) -> Vec<Tier> {
    let directory = || Arc::new(DirectoryProvider::new(credentials)) as Arc<dyn Provider>;
    let places = || Arc::new(PlacesProvider::new(credentials)) as Arc<dyn Provider>;
    let web = || Arc::new(WebSearchProvider::new(credentials)) as Arc<dyn Provider>;

    match intent {
        QueryIntent::LocalBusiness => vec![
            Tier::single(directory()),
            Tier::single(places()),
            Tier::single(web()),
        ],
        QueryIntent::Research => vec![
            Tier::of(vec![places(), web()]),
            Tier::single(directory()),
        ],
        QueryIntent::General => vec![Tier::single(web())],
    }
}

/// Coordinates one aggregation pass: rewrite, fetch tier by tier, gate,
/// score, diversity-limit, classify the outcome.
pub struct Aggregator {
    client: HttpClient,
    config: SearchConfig,
    tiers: Vec<Tier>,
}

impl Aggregator {
    /// Build an aggregator over an explicit tier plan.
    pub fn new(client: HttpClient, config: SearchConfig, tiers: Vec<Tier>) -> Self {
        Self {
            client,
            config,
            tiers,
        }
    }

    /// Build an aggregator with the standard tier plan for an intent.
    pub fn for_intent(
        client: HttpClient,
        config: SearchConfig,
        credentials: &ProviderCredentials,
        intent: QueryIntent,
    ) -> Self {
        let tiers = plan_tiers(credentials, intent);
        Self::new(client, config, tiers)
    }

    /// Run one aggregation pass.
    ///
    /// Cancellation: dropping the returned future cancels every
    /// in-flight provider call and discards all accumulation; there is
    /// no partial-response contract.
    pub async fn run(&self, query: &SearchQuery) -> SearchOutput {
        let queries = query::rewrite(query);
        let gate = RelevanceGate::new(query, &self.config);
        let target = query
            .count()
            .unwrap_or(self.config.max_results)
            .min(self.config.max_results);
        let timeout = self.config.provider_timeout();

        info!(
            query = %query.raw(),
            intent = ?query.intent(),
            tiers = self.tiers.len(),
            target,
            "starting aggregation"
        );

        let mut candidates: Vec<Candidate> = Vec::new();
        let mut reports: Vec<ProviderReport> = Vec::new();
        let mut seq = 0usize;

        for (tier_idx, tier) in self.tiers.iter().enumerate() {
            // Sufficiency check: a lower tier exists precisely to avoid
            // unnecessary calls when the one above it delivered.
            if candidates.len() >= target {
                debug!(tier = tier_idx, "sufficient results, skipping remaining tiers");
                break;
            }

            let futures: Vec<_> = tier
                .providers()
                .iter()
                .map(|provider| {
                    let provider = Arc::clone(provider);
                    let queries = &queries;
                    let client = &self.client;
                    let config = &self.config;
                    async move {
                        let start = Instant::now();
                        let outcome = provider
                            .fetch(client, queries, query, config, timeout)
                            .await;
                        (provider, start.elapsed(), outcome)
                    }
                })
                .collect();

            // The accumulation below is the single owner of tier
            // output; nothing is shared while calls are in flight.
            for (provider, elapsed, outcome) in join_all(futures).await {
                let elapsed_ms = elapsed.as_millis() as u64;
                let state = match outcome {
                    Ok(raws) => {
                        let fetched = raws.len();
                        let mut kept = 0usize;
                        for raw in raws {
                            let normalized = normalize(raw);
                            if let Some(relevance) = gate.admit(&normalized) {
                                candidates.push(Candidate {
                                    result: normalized,
                                    text_relevance: relevance,
                                    tier: tier_idx,
                                    seq,
                                });
                                seq += 1;
                                kept += 1;
                            }
                        }
                        debug!(
                            provider = provider.name(),
                            tier = tier_idx,
                            fetched,
                            kept,
                            elapsed_ms,
                            "provider returned"
                        );
                        ProviderState::Succeeded(kept)
                    }
                    Err(kind) => {
                        warn!(
                            provider = provider.name(),
                            tier = tier_idx,
                            error = %kind,
                            elapsed_ms,
                            "provider failed"
                        );
                        ProviderState::Failed(kind)
                    }
                };

                reports.push(ProviderReport {
                    provider: provider.name().to_string(),
                    kind: provider.kind(),
                    tier: tier_idx,
                    state,
                    elapsed_ms,
                });
            }

            // Providers overlap; collapse repeats now so the sufficiency
            // check above counts unique results only.
            candidates = dedup(candidates);
        }

        let scored = CompositeScorer::new(&self.config).score_all(candidates);
        let results = DiversityLimiter::new(&self.config)
            .with_max_results(target)
            .select(scored);

        let outcome = classify(!results.is_empty(), &reports);

        info!(
            ?outcome,
            results = results.len(),
            failed = reports.iter().filter(|r| r.state.is_failed()).count(),
            "aggregation finished"
        );

        SearchOutput {
            results,
            outcome,
            reports,
            queries,
        }
    }
}

/// Outcome classification. The four categories stay distinct: an empty
/// list from healthy providers is `NoMatches`, not a failure.
fn classify(has_results: bool, reports: &[ProviderReport]) -> AggregatorOutcome {
    let any_failed = reports.iter().any(|r| r.state.is_failed());
    let any_succeeded = reports
        .iter()
        .any(|r| matches!(r.state, ProviderState::Succeeded(_)));

    if has_results {
        if any_failed {
            AggregatorOutcome::PartialSuccess
        } else {
            AggregatorOutcome::Success
        }
    } else if any_failed && !any_succeeded {
        AggregatorOutcome::AllProvidersFailed
    } else {
        AggregatorOutcome::NoMatches
    }
}
