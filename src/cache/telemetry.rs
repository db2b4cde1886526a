use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Metric name suffix counting cache hits.
pub const CACHE_HIT_TOTAL: &str = "cache_hit_total";
/// Metric name suffix counting loads started (misses).
pub const CACHE_MISS_TOTAL: &str = "cache_miss_total";
/// Metric name suffix counting callers that joined an in-flight load.
pub const CACHE_JOINED_LOAD_TOTAL: &str = "cache_joined_load_total";
/// Metric name suffix counting direct projection installs.
pub const CACHE_PUT_TOTAL: &str = "cache_put_total";
/// Metric name suffix counting invalidations.
pub const CACHE_INVALIDATION_TOTAL: &str = "cache_invalidation_total";
/// Metric name suffix counting capacity evictions.
pub const CACHE_EVICTION_TOTAL: &str = "cache_eviction_total";
/// Metric name suffix counting expired entries dropped on access.
pub const CACHE_EXPIRATION_TOTAL: &str = "cache_expiration_total";
/// Metric name suffix counting failed loads.
pub const CACHE_LOAD_FAILURE_TOTAL: &str = "cache_load_failure_total";
/// Metric name suffix counting smart updates answered from cache.
pub const UPDATE_SERVED_FROM_CACHE_TOTAL: &str = "update_served_from_cache_total";
/// Metric name suffix counting smart updates resolved by folding events.
pub const UPDATE_FOLD_TOTAL: &str = "update_fold_total";
/// Metric name suffix counting smart updates that had to reload.
pub const UPDATE_RELOAD_TOTAL: &str = "update_reload_total";
/// Metric name suffix counting folds aborted by a policy change.
pub const UPDATE_POLICY_INVALIDATION_TOTAL: &str = "update_policy_invalidation_total";

/// Joins the configured cache-name prefix with a stable metric suffix.
pub fn prefixed_metric(prefix: &str, suffix: &str) -> String {
    format!("{prefix}_{suffix}")
}

/// Counter set shared by the projection cache and the enrichment facade.
#[derive(Debug, Default)]
pub struct EnrichmentTelemetry {
    hits: AtomicU64,
    misses: AtomicU64,
    joined_loads: AtomicU64,
    puts: AtomicU64,
    invalidations: AtomicU64,
    evictions: AtomicU64,
    expirations: AtomicU64,
    load_failures: AtomicU64,
    served_from_cache: AtomicU64,
    folds: AtomicU64,
    reloads: AtomicU64,
    policy_invalidations: AtomicU64,
}

impl EnrichmentTelemetry {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_joined_load(&self) {
        self.joined_loads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_put(&self) {
        self.puts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_invalidation(&self) {
        self.invalidations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_expiration(&self) {
        self.expirations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_load_failure(&self) {
        self.load_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_served_from_cache(&self) {
        self.served_from_cache.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fold(&self) {
        self.folds.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_reload(&self) {
        self.reloads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_policy_invalidation(&self) {
        self.policy_invalidations.fetch_add(1, Ordering::Relaxed);
    }

    /// Captures a consistent-enough snapshot for scraping or assertions.
    pub fn snapshot(&self) -> EnrichmentTelemetrySnapshot {
        EnrichmentTelemetrySnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            joined_loads: self.joined_loads.load(Ordering::Relaxed),
            puts: self.puts.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
            load_failures: self.load_failures.load(Ordering::Relaxed),
            served_from_cache: self.served_from_cache.load(Ordering::Relaxed),
            folds: self.folds.load(Ordering::Relaxed),
            reloads: self.reloads.load(Ordering::Relaxed),
            policy_invalidations: self.policy_invalidations.load(Ordering::Relaxed),
        }
    }
}

/// Plain counter snapshot suitable for `/metrics`-style publishing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EnrichmentTelemetrySnapshot {
    pub hits: u64,
    pub misses: u64,
    pub joined_loads: u64,
    pub puts: u64,
    pub invalidations: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub load_failures: u64,
    pub served_from_cache: u64,
    pub folds: u64,
    pub reloads: u64,
    pub policy_invalidations: u64,
}
