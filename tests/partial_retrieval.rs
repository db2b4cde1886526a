use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use twincache::{
    CacheConfig, CachingEnrichmentFacade, EnrichmentFacade, EntityId, FieldSelector, Headers,
    JsonObject, LoaderError, Pointer, ProjectionLoader, Signal, ThingEvent,
};

fn obj(value: Value) -> JsonObject {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

/// Loader that pops scripted responses and records the selectors it saw.
struct ScriptedLoader {
    responses: Mutex<VecDeque<JsonObject>>,
    calls: AtomicU64,
    selectors: Mutex<Vec<Option<FieldSelector>>>,
}

impl ScriptedLoader {
    fn new(responses: impl IntoIterator<Item = Value>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().map(obj).collect()),
            calls: AtomicU64::new(0),
            selectors: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    fn selectors(&self) -> Vec<Option<FieldSelector>> {
        self.selectors.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProjectionLoader for ScriptedLoader {
    async fn load(
        &self,
        _entity_id: &EntityId,
        selector: Option<&FieldSelector>,
        _headers: &Headers,
    ) -> Result<JsonObject, LoaderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.selectors.lock().unwrap().push(selector.cloned());
        let response = self.responses.lock().unwrap().pop_front();
        Ok(response.unwrap_or_default())
    }
}

#[tokio::test]
async fn result_contains_only_the_requested_fields() {
    let loader = ScriptedLoader::new([json!({"revision": 7, "policy_id": "pol-a", "x": 1})]);
    let facade = CachingEnrichmentFacade::new(loader.clone(), CacheConfig::default());
    let entity = EntityId::from("thing-1");
    let selector = FieldSelector::of(["/x"]);

    let result = facade
        .retrieve_partial(&entity, &selector, Headers::empty(), None)
        .await
        .unwrap();

    // the revision travels with the cache entry but is stripped for the
    // caller who never asked for it
    assert_eq!(Value::Object(result), json!({"x": 1}));

    // the loader saw the enhanced selector including the revision
    let seen = loader.selectors();
    assert_eq!(seen.len(), 1);
    let enhanced = seen[0].clone().expect("selector propagated");
    assert!(enhanced.contains(&Pointer::parse("/revision")));
    assert!(enhanced.contains(&Pointer::parse("/x")));
}

#[tokio::test]
async fn requested_revision_is_kept() {
    let loader = ScriptedLoader::new([json!({"revision": 7, "x": 1})]);
    let facade = CachingEnrichmentFacade::new(loader.clone(), CacheConfig::default());
    let entity = EntityId::from("thing-1");
    let selector = FieldSelector::of(["/x", "/revision"]);

    let result = facade
        .retrieve_partial(&entity, &selector, Headers::empty(), None)
        .await
        .unwrap();
    assert_eq!(Value::Object(result), json!({"revision": 7, "x": 1}));
}

#[tokio::test]
async fn concerned_event_folds_into_the_partial_projection() {
    let loader = ScriptedLoader::new([json!({"revision": 7, "x": 1})]);
    let facade = CachingEnrichmentFacade::new(loader.clone(), CacheConfig::default());
    let entity = EntityId::from("thing-1");
    let selector = FieldSelector::of(["/x"]);

    // first request seeds the cache
    facade
        .retrieve_partial(&entity, &selector, Headers::empty(), None)
        .await
        .unwrap();
    assert_eq!(loader.calls(), 1);

    // the next-expected event is folded locally, no round-trip
    let event = Signal::from(ThingEvent::modified(8, "/x", json!(2)));
    let result = facade
        .retrieve_partial(&entity, &selector, Headers::empty(), Some(event))
        .await
        .unwrap();
    assert_eq!(Value::Object(result), json!({"x": 2}));
    assert_eq!(loader.calls(), 1);
}

#[tokio::test]
async fn policy_change_mid_fold_reloads() {
    let loader = ScriptedLoader::new([
        json!({"revision": 7, "policy_id": "pol-a", "x": 1}),
        json!({"revision": 8, "policy_id": "pol-b", "x": 2}),
    ]);
    let facade = CachingEnrichmentFacade::new(loader.clone(), CacheConfig::default());
    let entity = EntityId::from("thing-1");
    let selector = FieldSelector::of(["/policy_id", "/x"]);

    facade
        .retrieve_partial(&entity, &selector, Headers::empty(), None)
        .await
        .unwrap();
    assert_eq!(loader.calls(), 1);

    let event = Signal::from(ThingEvent::merged(8, "", json!({"policy_id": "pol-b"})));
    let result = facade
        .retrieve_partial(&entity, &selector, Headers::empty(), Some(event))
        .await
        .unwrap();

    // the partial fold was discarded in favor of the fresh snapshot
    assert_eq!(
        Value::Object(result),
        json!({"policy_id": "pol-b", "x": 2})
    );
    assert_eq!(loader.calls(), 2);
    assert_eq!(facade.telemetry().policy_invalidations, 1);
}

#[tokio::test]
async fn unchanged_policy_folds_without_reload() {
    let loader = ScriptedLoader::new([json!({"revision": 7, "policy_id": "pol-a", "x": 1})]);
    let facade = CachingEnrichmentFacade::new(loader.clone(), CacheConfig::default());
    let entity = EntityId::from("thing-1");
    let selector = FieldSelector::of(["/policy_id", "/x"]);

    facade
        .retrieve_partial(&entity, &selector, Headers::empty(), None)
        .await
        .unwrap();

    let event = Signal::from(ThingEvent::merged(8, "/x", json!(5)));
    let result = facade
        .retrieve_partial(&entity, &selector, Headers::empty(), Some(event))
        .await
        .unwrap();
    assert_eq!(
        Value::Object(result),
        json!({"policy_id": "pol-a", "x": 5})
    );
    assert_eq!(loader.calls(), 1);
}

#[tokio::test]
async fn absent_thing_yields_the_empty_object() {
    let loader = ScriptedLoader::new([]);
    let facade = CachingEnrichmentFacade::new(loader.clone(), CacheConfig::default());
    let entity = EntityId::from("ghost");
    let selector = FieldSelector::of(["/x"]);

    let result = facade
        .retrieve_partial(&entity, &selector, Headers::empty(), None)
        .await
        .unwrap();
    assert!(result.is_empty());
}

#[tokio::test]
async fn distinct_selectors_are_distinct_cache_entries() {
    let loader = ScriptedLoader::new([
        json!({"revision": 7, "x": 1}),
        json!({"revision": 7, "y": 2}),
    ]);
    let facade = CachingEnrichmentFacade::new(loader.clone(), CacheConfig::default());
    let entity = EntityId::from("thing-1");

    facade
        .retrieve_partial(&entity, &FieldSelector::of(["/x"]), Headers::empty(), None)
        .await
        .unwrap();
    facade
        .retrieve_partial(&entity, &FieldSelector::of(["/y"]), Headers::empty(), None)
        .await
        .unwrap();
    assert_eq!(loader.calls(), 2);
    assert_eq!(facade.cache().ready_len(), 2);
}
