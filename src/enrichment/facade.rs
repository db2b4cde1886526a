use super::decision::{compare_with_cached, plan_update, CachedComparison, UpdatePlan};
use super::fold::{fold_events, FoldOutcome};
use crate::cache::{
    CacheConfig, EnrichmentCacheKey, EnrichmentContext, EnrichmentTelemetry,
    EnrichmentTelemetrySnapshot, EntityId, LoaderError, ProjectionCache, ProjectionLoader,
};
use crate::event::{last_headers, Headers, Signal, ThingEvent};
use crate::json::{revision_of, FieldSelector, JsonObject};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Failure surfaced to enrichment callers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EnrichmentError {
    /// The authoritative retrieval behind a cache load failed.
    #[error(transparent)]
    Loader(#[from] LoaderError),
    /// An event fold replaced the document root with a non-object value;
    /// the result is returned to no one and the cache stays untouched.
    #[error("event fold produced a non-object document root")]
    NonObjectProjection,
}

/// Retrieval of selector-shaped views of things, enriched by the signals
/// already in the caller's hands.
#[async_trait]
pub trait EnrichmentFacade: Send + Sync {
    /// Retrieves the fields selected by `selector`, using `concerned_signal`
    /// to avoid an authoritative round-trip where possible. Absent data
    /// yields the empty object, never a failure.
    async fn retrieve_partial(
        &self,
        entity_id: &EntityId,
        selector: &FieldSelector,
        headers: Headers,
        concerned_signal: Option<Signal>,
    ) -> Result<JsonObject, EnrichmentError>;
}

/// Parameters steering one smart update.
#[derive(Debug, Clone)]
struct UpdateParams {
    signals: Vec<Signal>,
    invalidate_on_policy_change: bool,
    min_acceptable_revision: i64,
}

/// Read-through enrichment facade backed by the single-flight projection
/// cache. Instantiated once per node so the cache accumulates across all
/// enrichments running on it.
pub struct CachingEnrichmentFacade {
    cache: ProjectionCache,
    telemetry: Arc<EnrichmentTelemetry>,
}

impl CachingEnrichmentFacade {
    pub fn new(loader: Arc<dyn ProjectionLoader>, config: CacheConfig) -> Self {
        let telemetry = Arc::new(EnrichmentTelemetry::default());
        let cache = ProjectionCache::new(loader, config, Arc::clone(&telemetry));
        Self { cache, telemetry }
    }

    /// The cache backing this facade.
    pub fn cache(&self) -> &ProjectionCache {
        &self.cache
    }

    /// Counter snapshot covering the cache and the smart-update outcomes.
    pub fn telemetry(&self) -> EnrichmentTelemetrySnapshot {
        self.telemetry.snapshot()
    }

    /// Retrieves the whole thing, folding `signals` into the cached
    /// projection where the revision run allows it.
    ///
    /// A negative `min_acceptable_revision` forces an invalidate-and-reload;
    /// otherwise the result is guaranteed to reflect at least that revision.
    pub async fn retrieve_full(
        &self,
        entity_id: &EntityId,
        signals: &[Signal],
        min_acceptable_revision: i64,
    ) -> Result<JsonObject, EnrichmentError> {
        let key = EnrichmentCacheKey::new(
            entity_id.clone(),
            EnrichmentContext::new(Headers::empty(), None),
        );
        let params = UpdateParams {
            signals: signals.to_vec(),
            invalidate_on_policy_change: false,
            min_acceptable_revision,
        };
        self.smart_update(&key, params).await
    }

    async fn smart_update(
        &self,
        key: &EnrichmentCacheKey,
        params: UpdateParams,
    ) -> Result<JsonObject, EnrichmentError> {
        let headers = last_headers(&params.signals);
        if params.min_acceptable_revision < 0 {
            // forced refresh: skip classification entirely
            return self.reload(key, &headers).await;
        }
        match plan_update(&params.signals, params.min_acceptable_revision) {
            UpdatePlan::Reject(rejection) => {
                debug!(key = %key, ?rejection, "event run rejected");
                self.reload(key, &headers).await
            }
            UpdatePlan::LookupOnly => {
                self.telemetry.record_served_from_cache();
                Ok(self.cache.get(key, &headers).await?)
            }
            UpdatePlan::FoldFromEmpty(events) => {
                self.fold_and_store(key, JsonObject::new(), &events, &params)
                    .await
            }
            UpdatePlan::CompareWithCached(events) => {
                let cached = self.cache.get(key, &headers).await?;
                match compare_with_cached(revision_of(&cached), events) {
                    CachedComparison::UseCached => {
                        self.telemetry.record_served_from_cache();
                        Ok(cached)
                    }
                    CachedComparison::FoldFrom(events) => {
                        self.fold_and_store(key, cached, &events, &params).await
                    }
                    CachedComparison::Reload => self.reload(key, &headers).await,
                }
            }
        }
    }

    async fn fold_and_store(
        &self,
        key: &EnrichmentCacheKey,
        base: JsonObject,
        events: &[ThingEvent],
        params: &UpdateParams,
    ) -> Result<JsonObject, EnrichmentError> {
        match fold_events(base, events, params.invalidate_on_policy_change) {
            FoldOutcome::PolicyChanged(event_headers) => {
                debug!(key = %key, "policy reference changed mid-fold");
                self.telemetry.record_policy_invalidation();
                self.cache.invalidate(key);
                Ok(self.cache.get(key, &event_headers).await?)
            }
            FoldOutcome::NonObjectRoot => Err(EnrichmentError::NonObjectProjection),
            FoldOutcome::Folded(projection) => {
                self.telemetry.record_fold();
                let projection = match key.context().enhanced_selector() {
                    Some(selector) => selector.project(&projection),
                    None => projection,
                };
                self.cache.put(key, projection.clone());
                Ok(projection)
            }
        }
    }

    async fn reload(
        &self,
        key: &EnrichmentCacheKey,
        headers: &Headers,
    ) -> Result<JsonObject, EnrichmentError> {
        self.telemetry.record_reload();
        self.cache.invalidate(key);
        Ok(self.cache.get(key, headers).await?)
    }
}

#[async_trait]
impl EnrichmentFacade for CachingEnrichmentFacade {
    async fn retrieve_partial(
        &self,
        entity_id: &EntityId,
        selector: &FieldSelector,
        headers: Headers,
        concerned_signal: Option<Signal>,
    ) -> Result<JsonObject, EnrichmentError> {
        let enhanced = selector.with_revision();
        let key = EnrichmentCacheKey::new(
            entity_id.clone(),
            EnrichmentContext::new(headers, Some(enhanced)),
        );
        let params = UpdateParams {
            signals: concerned_signal.into_iter().collect(),
            invalidate_on_policy_change: true,
            min_acceptable_revision: 0,
        };
        let enriched = self.smart_update(&key, params).await?;
        // hand back only what the caller originally asked for
        Ok(selector.project(&enriched))
    }
}

/// Enrichment facade that skips caching entirely: every request is one
/// authoritative retrieval. Useful where staleness is unacceptable or as a
/// baseline in tests.
pub struct RoundTripEnrichmentFacade {
    loader: Arc<dyn ProjectionLoader>,
}

impl RoundTripEnrichmentFacade {
    pub fn new(loader: Arc<dyn ProjectionLoader>) -> Self {
        Self { loader }
    }
}

#[async_trait]
impl EnrichmentFacade for RoundTripEnrichmentFacade {
    async fn retrieve_partial(
        &self,
        entity_id: &EntityId,
        selector: &FieldSelector,
        headers: Headers,
        _concerned_signal: Option<Signal>,
    ) -> Result<JsonObject, EnrichmentError> {
        let loaded = self
            .loader
            .load(entity_id, Some(selector), &headers)
            .await?;
        Ok(selector.project(&loaded))
    }
}
