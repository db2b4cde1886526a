use super::config::CacheConfig;
use super::key::EnrichmentCacheKey;
use super::loader::{LoaderError, ProjectionLoader};
use super::telemetry::EnrichmentTelemetry;
use crate::event::Headers;
use crate::json::JsonObject;
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::debug;

type LoadResult = Result<JsonObject, LoaderError>;
type SharedLoad = Shared<BoxFuture<'static, LoadResult>>;

/// Projection installed in the cache, stamped for expiry and eviction.
#[derive(Debug, Clone)]
struct ReadyEntry {
    projection: JsonObject,
    written_at: Instant,
    last_access: Instant,
}

impl ReadyEntry {
    fn new(projection: JsonObject) -> Self {
        let now = Instant::now();
        Self {
            projection,
            written_at: now,
            last_access: now,
        }
    }

    fn is_expired(&self, config: &CacheConfig) -> bool {
        if self.written_at.elapsed() > config.expire_after_write() {
            return true;
        }
        match config.expire_after_access() {
            Some(window) => self.last_access.elapsed() > window,
            None => false,
        }
    }
}

/// Per-key cell: either a load in flight or an installed projection.
enum CacheCell {
    InFlight {
        load: SharedLoad,
        load_id: u64,
        store_on_completion: bool,
    },
    Ready(ReadyEntry),
}

/// Read-through projection cache with at most one loader call in flight per
/// key.
///
/// Concurrent readers of an absent key share a single load; `put` installs
/// a projection immediately and supersedes the stored result of any load
/// still in flight for the key; `invalidate` drops ready entries and marks
/// in-flight loads store-nothing without orphaning their awaiters. Failed
/// loads are never cached, so the next reader retries. Only ready entries
/// are subject to expiry and capacity eviction.
pub struct ProjectionCache {
    loader: Arc<dyn ProjectionLoader>,
    config: CacheConfig,
    telemetry: Arc<EnrichmentTelemetry>,
    cells: Mutex<HashMap<EnrichmentCacheKey, CacheCell>>,
    load_counter: AtomicU64,
}

impl ProjectionCache {
    pub fn new(
        loader: Arc<dyn ProjectionLoader>,
        config: CacheConfig,
        telemetry: Arc<EnrichmentTelemetry>,
    ) -> Self {
        Self {
            loader,
            config,
            telemetry,
            cells: Mutex::new(HashMap::new()),
            load_counter: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns the cached projection, joining or starting a load as needed.
    ///
    /// `headers` carry the caller's correlation context; they reach the
    /// loader only when this call is the one that starts the load. Must be
    /// called within a Tokio runtime.
    pub async fn get(
        &self,
        key: &EnrichmentCacheKey,
        headers: &Headers,
    ) -> LoadResult {
        debug!(key = %key, correlation_id = ?headers.correlation_id(), "cache lookup");
        let (load, load_id) = {
            let mut cells = self.cells.lock().unwrap();
            let expired = matches!(
                cells.get(key),
                Some(CacheCell::Ready(entry)) if entry.is_expired(&self.config)
            );
            if expired {
                cells.remove(key);
                self.telemetry.record_expiration();
            }
            match cells.get_mut(key) {
                Some(CacheCell::Ready(entry)) => {
                    entry.last_access = Instant::now();
                    self.telemetry.record_hit();
                    return Ok(entry.projection.clone());
                }
                Some(CacheCell::InFlight { load, load_id, .. }) => {
                    self.telemetry.record_joined_load();
                    (load.clone(), *load_id)
                }
                None => self.start_load(&mut cells, key, headers),
            }
        };
        let result = load.await;
        self.finish_load(key, load_id, result)
    }

    /// Installs `projection` for `key`, superseding any in-flight load's
    /// stored result. Awaiters of such a load still receive the loader's
    /// value.
    pub fn put(&self, key: &EnrichmentCacheKey, projection: JsonObject) {
        let mut cells = self.cells.lock().unwrap();
        cells.insert(key.clone(), CacheCell::Ready(ReadyEntry::new(projection)));
        self.telemetry.record_put();
        self.enforce_capacity(&mut cells);
    }

    /// Drops the ready entry for `key`. A load in flight keeps serving its
    /// awaiters but its result is not stored on completion.
    pub fn invalidate(&self, key: &EnrichmentCacheKey) {
        let mut cells = self.cells.lock().unwrap();
        let drop_ready = match cells.get_mut(key) {
            Some(CacheCell::Ready(_)) => true,
            Some(CacheCell::InFlight {
                store_on_completion,
                ..
            }) => {
                *store_on_completion = false;
                self.telemetry.record_invalidation();
                debug!(key = %key, "invalidated in-flight load");
                false
            }
            None => false,
        };
        if drop_ready {
            cells.remove(key);
            self.telemetry.record_invalidation();
            debug!(key = %key, "invalidated ready entry");
        }
    }

    /// Number of ready entries currently installed.
    pub fn ready_len(&self) -> usize {
        let cells = self.cells.lock().unwrap();
        cells
            .values()
            .filter(|cell| matches!(cell, CacheCell::Ready(_)))
            .count()
    }

    /// Reads the installed projection without loading or touching access
    /// stamps.
    pub fn peek(&self, key: &EnrichmentCacheKey) -> Option<JsonObject> {
        let cells = self.cells.lock().unwrap();
        match cells.get(key) {
            Some(CacheCell::Ready(entry)) if !entry.is_expired(&self.config) => {
                Some(entry.projection.clone())
            }
            _ => None,
        }
    }

    fn start_load(
        &self,
        cells: &mut HashMap<EnrichmentCacheKey, CacheCell>,
        key: &EnrichmentCacheKey,
        headers: &Headers,
    ) -> (SharedLoad, u64) {
        let load_id = self.load_counter.fetch_add(1, Ordering::Relaxed);
        let loader = Arc::clone(&self.loader);
        let entity_id = key.entity_id().clone();
        let selector = key.context().enhanced_selector().cloned();
        let headers = headers.clone();
        // Detached task: an abandoned caller must not cancel a load that
        // other awaiters of the same key may still join.
        let task = tokio::spawn(async move {
            loader
                .load(&entity_id, selector.as_ref(), &headers)
                .await
        });
        let entity_id = key.entity_id().clone();
        let load: SharedLoad = async move {
            match task.await {
                Ok(result) => result,
                Err(join_error) => Err(LoaderError::Interrupted {
                    entity_id: entity_id.to_string(),
                    message: join_error.to_string(),
                }),
            }
        }
        .boxed()
        .shared();
        cells.insert(
            key.clone(),
            CacheCell::InFlight {
                load: load.clone(),
                load_id,
                store_on_completion: true,
            },
        );
        self.telemetry.record_miss();
        (load, load_id)
    }

    /// Settles the cell once its load resolved. Every awaiter runs this;
    /// only the first to find its own in-flight cell still installed acts.
    fn finish_load(
        &self,
        key: &EnrichmentCacheKey,
        load_id: u64,
        result: LoadResult,
    ) -> LoadResult {
        let mut cells = self.cells.lock().unwrap();
        let own_cell = match cells.get(key) {
            Some(CacheCell::InFlight {
                load_id: id,
                store_on_completion,
                ..
            }) if *id == load_id => Some(*store_on_completion),
            _ => None,
        };
        match (own_cell, &result) {
            (Some(true), Ok(projection)) => {
                cells.insert(
                    key.clone(),
                    CacheCell::Ready(ReadyEntry::new(projection.clone())),
                );
                self.enforce_capacity(&mut cells);
            }
            (Some(false), Ok(_)) => {
                cells.remove(key);
            }
            (Some(_), Err(_)) => {
                cells.remove(key);
                self.telemetry.record_load_failure();
            }
            (None, _) => {}
        }
        result
    }

    /// Evicts least-recently-accessed ready entries above the size cap.
    /// In-flight cells are never evicted.
    fn enforce_capacity(&self, cells: &mut HashMap<EnrichmentCacheKey, CacheCell>) {
        loop {
            let ready_count = cells
                .values()
                .filter(|cell| matches!(cell, CacheCell::Ready(_)))
                .count();
            if ready_count <= self.config.maximum_size() {
                return;
            }
            let oldest = cells
                .iter()
                .filter_map(|(key, cell)| match cell {
                    CacheCell::Ready(entry) => Some((key.clone(), entry.last_access)),
                    CacheCell::InFlight { .. } => None,
                })
                .min_by_key(|(_, last_access)| *last_access)
                .map(|(key, _)| key);
            match oldest {
                Some(key) => {
                    cells.remove(&key);
                    self.telemetry.record_eviction();
                }
                None => return,
            }
        }
    }
}
