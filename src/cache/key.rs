use crate::event::Headers;
use crate::json::FieldSelector;
use std::fmt;

/// Opaque identifier of the thing whose projection is cached.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Caller context bound to a cache key: headers plus the enhanced selector
/// (absent means the whole thing is projected).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EnrichmentContext {
    headers: Headers,
    enhanced_selector: Option<FieldSelector>,
}

impl EnrichmentContext {
    pub fn new(headers: Headers, enhanced_selector: Option<FieldSelector>) -> Self {
        Self {
            headers,
            enhanced_selector,
        }
    }

    /// The selector bound to the key; always includes the revision field
    /// when present.
    pub fn enhanced_selector(&self) -> Option<&FieldSelector> {
        self.enhanced_selector.as_ref()
    }
}

/// Cache key: entity id plus context. Two keys are equal iff the entity id,
/// headers, and enhanced selector all are.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnrichmentCacheKey {
    entity_id: EntityId,
    context: EnrichmentContext,
}

impl EnrichmentCacheKey {
    pub fn new(entity_id: EntityId, context: EnrichmentContext) -> Self {
        Self { entity_id, context }
    }

    pub fn entity_id(&self) -> &EntityId {
        &self.entity_id
    }

    pub fn context(&self) -> &EnrichmentContext {
        &self.context
    }
}

impl fmt::Display for EnrichmentCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.context.enhanced_selector() {
            Some(selector) => {
                write!(f, "{}#", self.entity_id)?;
                for (index, pointer) in selector.pointers().iter().enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{pointer}")?;
                }
                Ok(())
            }
            None => write!(f, "{}", self.entity_id),
        }
    }
}
