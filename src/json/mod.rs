//! Pure JSON kernel: pointers, field selectors, and the patch operations the
//! event fold is built from.

pub mod patch;
pub mod pointer;
pub mod selector;

pub use patch::{
    apply_merge, delete_at, expand_at, merge_at, overlay_at, policy_id_of, revision_of, value_at,
    JsonObject, POLICY_ID_FIELD, REVISION_FIELD,
};
pub use pointer::Pointer;
pub use selector::FieldSelector;
