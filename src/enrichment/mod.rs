//! Smart-update decision engine, event fold, and the public enrichment
//! facades.

pub mod decision;
pub mod facade;
pub mod fold;

pub use decision::{compare_with_cached, plan_update, CachedComparison, UpdatePlan};
pub use facade::{
    CachingEnrichmentFacade, EnrichmentError, EnrichmentFacade, RoundTripEnrichmentFacade,
};
pub use fold::{fold_events, FoldOutcome};
