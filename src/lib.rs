//! Node-local signal-enrichment cache.
//!
//! Keeps a selector-restricted JSON projection of each remote thing and
//! folds the authoritative change events arriving alongside enrichment
//! requests into it, so most requests are answered without an upstream
//! round-trip. The caller supplies the authoritative retrieval as a
//! [`ProjectionLoader`]; the [`CachingEnrichmentFacade`] decides per request
//! whether the cached projection can be used as-is, patched locally from the
//! event run, or must be reloaded.

pub mod cache;
pub mod enrichment;
pub mod event;
pub mod json;

pub use cache::{
    prefixed_metric, CacheConfig, EnrichmentCacheKey, EnrichmentContext, EnrichmentTelemetry,
    EnrichmentTelemetrySnapshot, EntityId, LoaderError, ProjectionCache, ProjectionLoader,
    CACHE_EVICTION_TOTAL, CACHE_EXPIRATION_TOTAL, CACHE_HIT_TOTAL, CACHE_INVALIDATION_TOTAL,
    CACHE_JOINED_LOAD_TOTAL, CACHE_LOAD_FAILURE_TOTAL, CACHE_MISS_TOTAL, CACHE_PUT_TOTAL,
    UPDATE_FOLD_TOTAL, UPDATE_POLICY_INVALIDATION_TOTAL, UPDATE_RELOAD_TOTAL,
    UPDATE_SERVED_FROM_CACHE_TOTAL,
};
pub use enrichment::{
    compare_with_cached, fold_events, plan_update, CachedComparison, CachingEnrichmentFacade,
    EnrichmentError, EnrichmentFacade, FoldOutcome, RoundTripEnrichmentFacade, UpdatePlan,
};
pub use event::{
    classify_signals, last_headers, validate_run, ChangeKind, ClassifiedRun, Headers,
    RunRejection, SequenceVerdict, Signal, ThingEvent, CORRELATION_ID_HEADER,
};
pub use json::{
    apply_merge, delete_at, expand_at, merge_at, overlay_at, policy_id_of, revision_of, value_at,
    FieldSelector, JsonObject, Pointer, POLICY_ID_FIELD, REVISION_FIELD,
};
