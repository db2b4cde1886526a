use super::patch::{value_at, JsonObject, REVISION_FIELD};
use super::pointer::Pointer;
use serde_json::{Map, Value};

/// Ordered set of pointers describing the fields a caller asked for.
///
/// Projection copies the addressed subtrees into a fresh object, preserving
/// their nesting; everything else is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldSelector {
    pointers: Vec<Pointer>,
}

impl FieldSelector {
    /// Builds a selector from pointers, dropping duplicates.
    pub fn new(pointers: impl IntoIterator<Item = Pointer>) -> Self {
        let mut deduped: Vec<Pointer> = Vec::new();
        for pointer in pointers {
            if !deduped.contains(&pointer) {
                deduped.push(pointer);
            }
        }
        Self { pointers: deduped }
    }

    /// Convenience constructor from textual pointers.
    pub fn of<'a>(fields: impl IntoIterator<Item = &'a str>) -> Self {
        Self::new(fields.into_iter().map(Pointer::parse))
    }

    /// The selected pointers in caller order.
    pub fn pointers(&self) -> &[Pointer] {
        &self.pointers
    }

    /// True when `pointer` is selected verbatim.
    pub fn contains(&self, pointer: &Pointer) -> bool {
        self.pointers.contains(pointer)
    }

    /// Returns the selector extended to always include the revision field,
    /// so cached projections can validate themselves against event runs.
    pub fn with_revision(&self) -> Self {
        let revision = Pointer::parse(REVISION_FIELD);
        if self.contains(&revision) {
            return self.clone();
        }
        let mut pointers = self.pointers.clone();
        pointers.push(revision);
        Self { pointers }
    }

    /// Copies the selected subtrees of `object` into a fresh object.
    ///
    /// A root pointer selects every field; missing paths are skipped.
    pub fn project(&self, object: &JsonObject) -> JsonObject {
        let mut result: JsonObject = Map::new();
        for pointer in &self.pointers {
            if pointer.is_root() {
                for (field, value) in object {
                    result.insert(field.clone(), value.clone());
                }
                continue;
            }
            if let Some(value) = value_at(object, pointer) {
                let merged = super::patch::overlay_at(
                    Value::Object(result),
                    pointer,
                    value,
                );
                result = match merged {
                    Value::Object(map) => map,
                    // overlay below the root always yields an object
                    _ => Map::new(),
                };
            }
        }
        result
    }
}
