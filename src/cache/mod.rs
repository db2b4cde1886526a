//! Async single-flight projection cache: keys, configuration, loader
//! contract, the cell map itself, and its counters.

pub mod config;
pub mod key;
pub mod loader;
pub mod single_flight;
pub mod telemetry;

pub use config::CacheConfig;
pub use key::{EnrichmentCacheKey, EnrichmentContext, EntityId};
pub use loader::{LoaderError, ProjectionLoader};
pub use single_flight::ProjectionCache;
pub use telemetry::{
    prefixed_metric, EnrichmentTelemetry, EnrichmentTelemetrySnapshot, CACHE_EVICTION_TOTAL,
    CACHE_EXPIRATION_TOTAL, CACHE_HIT_TOTAL, CACHE_INVALIDATION_TOTAL, CACHE_JOINED_LOAD_TOTAL,
    CACHE_LOAD_FAILURE_TOTAL, CACHE_MISS_TOTAL, CACHE_PUT_TOTAL, UPDATE_FOLD_TOTAL,
    UPDATE_POLICY_INVALIDATION_TOTAL, UPDATE_RELOAD_TOTAL, UPDATE_SERVED_FROM_CACHE_TOTAL,
};
