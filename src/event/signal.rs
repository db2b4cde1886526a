use crate::json::Pointer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Header key carrying the caller's correlation id.
pub const CORRELATION_ID_HEADER: &str = "correlation-id";

/// Opaque caller context attached to signals and propagated to loads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Headers {
    entries: BTreeMap<String, String>,
}

impl Headers {
    /// Returns the empty header set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds a header, returning the extended set.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(name.into(), value.into());
        self
    }

    /// Shorthand for a header set carrying only a correlation id.
    pub fn correlated(correlation_id: impl Into<String>) -> Self {
        Self::empty().with(CORRELATION_ID_HEADER, correlation_id)
    }

    /// Looks up a header value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// The correlation id, if the caller supplied one.
    pub fn correlation_id(&self) -> Option<&str> {
        self.get(CORRELATION_ID_HEADER)
    }

    /// True when no headers are present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Change category assigned by the authority to a persisted thing event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// The thing came into existence; prior history is irrelevant.
    Created,
    /// The thing (or a subtree) was removed.
    Deleted,
    /// A merge patch was applied at the resource path.
    Merged,
    /// The subtree at the resource path was replaced.
    Modified,
}

/// Authoritative change notification for a thing.
#[derive(Debug, Clone, PartialEq)]
pub struct ThingEvent {
    kind: ChangeKind,
    revision: u64,
    resource_path: Pointer,
    payload: Option<Value>,
    headers: Headers,
    live: bool,
}

impl ThingEvent {
    fn new(
        kind: ChangeKind,
        revision: u64,
        resource_path: Pointer,
        payload: Option<Value>,
    ) -> Self {
        Self {
            kind,
            revision,
            resource_path,
            payload,
            headers: Headers::empty(),
            live: false,
        }
    }

    /// Creation event; the payload is the initial thing state at the root.
    pub fn created(revision: u64, payload: Value) -> Self {
        Self::new(ChangeKind::Created, revision, Pointer::root(), Some(payload))
    }

    /// Deletion event for the subtree at `resource_path` (root deletes the
    /// whole thing). Deletions carry no payload.
    pub fn deleted(revision: u64, resource_path: impl Into<Pointer>) -> Self {
        Self::new(ChangeKind::Deleted, revision, resource_path.into(), None)
    }

    /// Merge event applying `payload` at `resource_path` with merge-patch
    /// semantics.
    pub fn merged(revision: u64, resource_path: impl Into<Pointer>, payload: Value) -> Self {
        Self::new(ChangeKind::Merged, revision, resource_path.into(), Some(payload))
    }

    /// Modification event replacing the subtree at `resource_path`.
    pub fn modified(revision: u64, resource_path: impl Into<Pointer>, payload: Value) -> Self {
        Self::new(ChangeKind::Modified, revision, resource_path.into(), Some(payload))
    }

    /// Attaches caller headers.
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    /// Marks the event as live. Live events reflect transient messages, not
    /// persisted state, and are ignored by enrichment.
    pub fn live(mut self) -> Self {
        self.live = true;
        self
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn resource_path(&self) -> &Pointer {
        &self.resource_path
    }

    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    /// True for events that reset the thing lifecycle and make prior
    /// history irrelevant.
    pub fn is_lifecycle_boundary(&self) -> bool {
        matches!(self.kind, ChangeKind::Created | ChangeKind::Deleted)
    }
}

/// Signal accompanying an enrichment request.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// A thing change notification (persisted or live).
    Event(ThingEvent),
    /// Any other signal kind (commands, responses, acknowledgements);
    /// carries headers but never contributes to the fold.
    Unrelated(Headers),
}

impl Signal {
    /// The caller context attached to the signal.
    pub fn headers(&self) -> &Headers {
        match self {
            Signal::Event(event) => event.headers(),
            Signal::Unrelated(headers) => headers,
        }
    }
}

impl From<ThingEvent> for Signal {
    fn from(event: ThingEvent) -> Self {
        Signal::Event(event)
    }
}
