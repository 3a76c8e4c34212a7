//! Search orchestration

mod aggregator;

pub use aggregator::{plan_tiers, Aggregator, Tier};
