use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use twincache::{
    prefixed_metric, CacheConfig, CachingEnrichmentFacade, EntityId, FieldSelector, Headers,
    JsonObject, LoaderError, ProjectionLoader, Signal, ThingEvent, CACHE_HIT_TOTAL,
    UPDATE_FOLD_TOTAL,
};

fn obj(value: Value) -> JsonObject {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

struct FixedLoader {
    response: JsonObject,
}

#[async_trait]
impl ProjectionLoader for FixedLoader {
    async fn load(
        &self,
        _entity_id: &EntityId,
        _selector: Option<&FieldSelector>,
        _headers: &Headers,
    ) -> Result<JsonObject, LoaderError> {
        Ok(self.response.clone())
    }
}

#[test]
fn metric_names_carry_the_configured_prefix() {
    assert_eq!(
        prefixed_metric("enrichment", CACHE_HIT_TOTAL),
        "enrichment_cache_hit_total"
    );
    assert_eq!(
        prefixed_metric("gateway", UPDATE_FOLD_TOTAL),
        "gateway_update_fold_total"
    );
}

#[tokio::test]
async fn counters_track_a_request_sequence() {
    let loader = Arc::new(FixedLoader {
        response: obj(json!({"revision": 7, "x": 1})),
    });
    let facade = CachingEnrichmentFacade::new(loader, CacheConfig::default());
    let entity = EntityId::from("thing-1");

    // 1: empty run with a demanded minimum -> reload (miss, load)
    facade.retrieve_full(&entity, &[], 0).await.unwrap();
    // 2: stale event -> served from cache (hit)
    let stale = [Signal::from(ThingEvent::modified(6, "/x", json!(0)))];
    facade.retrieve_full(&entity, &stale, 0).await.unwrap();
    // 3: next expected event -> fold + put (hit for the base lookup)
    let next = [Signal::from(ThingEvent::modified(8, "/x", json!(2)))];
    facade.retrieve_full(&entity, &next, 0).await.unwrap();
    // 4: gapped event -> invalidate + reload (miss, load)
    let gapped = [Signal::from(ThingEvent::modified(12, "/x", json!(3)))];
    facade.retrieve_full(&entity, &gapped, 0).await.unwrap();

    let snapshot = facade.telemetry();
    assert_eq!(snapshot.misses, 2);
    assert_eq!(snapshot.hits, 2);
    assert_eq!(snapshot.reloads, 2);
    assert_eq!(snapshot.served_from_cache, 1);
    assert_eq!(snapshot.folds, 1);
    assert_eq!(snapshot.puts, 1);
    assert_eq!(snapshot.invalidations, 1);
    assert_eq!(snapshot.load_failures, 0);
    assert_eq!(snapshot.policy_invalidations, 0);
}
