use super::key::EntityId;
use crate::event::Headers;
use crate::json::{FieldSelector, JsonObject};
use async_trait::async_trait;
use thiserror::Error;

/// Failure of an authoritative retrieval.
///
/// Cloneable so a single in-flight load can fan its failure out to every
/// awaiter of the same cache cell.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoaderError {
    /// The upstream store reported an error (network, server, timeout).
    #[error("authoritative retrieval failed for {entity_id}: {message}")]
    Upstream { entity_id: String, message: String },
    /// The detached load task died before producing a result.
    #[error("load task for {entity_id} aborted: {message}")]
    Interrupted { entity_id: String, message: String },
}

impl LoaderError {
    /// Builds an upstream failure for `entity_id`.
    pub fn upstream(entity_id: &EntityId, message: impl Into<String>) -> Self {
        Self::Upstream {
            entity_id: entity_id.to_string(),
            message: message.into(),
        }
    }
}

/// One authoritative retrieval of a thing projection.
///
/// An unknown entity resolves to the empty object, never an error; errors
/// are reserved for transport and server failures. Implementations are
/// expected to honor `selector` (absent means the whole thing) and may use
/// `headers` for correlation.
#[async_trait]
pub trait ProjectionLoader: Send + Sync {
    async fn load(
        &self,
        entity_id: &EntityId,
        selector: Option<&FieldSelector>,
        headers: &Headers,
    ) -> Result<JsonObject, LoaderError>;
}
