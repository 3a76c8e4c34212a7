//! Result types shared across the pipeline

mod types;

pub use types::{
    AggregatorOutcome, ComponentScores, NormalizedResult, ProviderFailure, ProviderKind,
    ProviderReport, ProviderState, ScoredResult, SearchOutput,
};
