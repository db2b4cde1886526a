use crate::event::{ChangeKind, Headers, ThingEvent};
use crate::json::{
    delete_at, merge_at, overlay_at, policy_id_of, JsonObject, REVISION_FIELD,
};
use serde_json::Value;

/// Result of folding an event run over a base projection.
#[derive(Debug, Clone, PartialEq)]
pub enum FoldOutcome {
    /// All events applied; the revision field carries the final event's
    /// revision.
    Folded(JsonObject),
    /// The policy reference changed mid-fold; the partial result was
    /// discarded and the caller must reload using these headers.
    PolicyChanged(Headers),
    /// An overlay at the document root replaced the projection with a
    /// non-object value; nothing sane can be cached.
    NonObjectRoot,
}

/// Folds `events` (a validated, contiguous run) over `base` in order.
///
/// With `watch_policy_change` set, the policy reference captured from the
/// base before the first event is compared against the projection after
/// every applied event; the first mismatch aborts the fold.
pub fn fold_events(
    base: JsonObject,
    events: &[ThingEvent],
    watch_policy_change: bool,
) -> FoldOutcome {
    let base_policy_id = policy_id_of(&base).map(str::to_string);
    let mut value = Value::Object(base);
    for event in events {
        value = apply_event(value, event);
        if watch_policy_change && policy_changed(&value, base_policy_id.as_deref()) {
            return FoldOutcome::PolicyChanged(event.headers().clone());
        }
    }
    let mut projection = match value {
        Value::Object(map) => map,
        _ => return FoldOutcome::NonObjectRoot,
    };
    if let Some(last) = events.last() {
        projection.insert(REVISION_FIELD.to_string(), Value::from(last.revision()));
    }
    FoldOutcome::Folded(projection)
}

fn apply_event(value: Value, event: &ThingEvent) -> Value {
    match event.kind() {
        ChangeKind::Merged => match event.payload() {
            Some(payload) => merge_at(&value, event.resource_path(), payload),
            None => value,
        },
        ChangeKind::Deleted => match value {
            Value::Object(map) => Value::Object(delete_at(&map, event.resource_path())),
            _ if event.resource_path().is_root() => Value::Object(JsonObject::new()),
            // a deletion below a non-object root cannot address anything
            other => other,
        },
        ChangeKind::Created | ChangeKind::Modified => match event.payload() {
            Some(payload) => overlay_at(value, event.resource_path(), payload),
            None => value,
        },
    }
}

fn policy_changed(value: &Value, base_policy_id: Option<&str>) -> bool {
    let Some(base_policy_id) = base_policy_id else {
        return false;
    };
    let current = match value {
        Value::Object(map) => policy_id_of(map),
        _ => None,
    };
    matches!(current, Some(current) if current != base_policy_id)
}
