//! # Reconciliation
//!
//! Keeps the layer tree and the render tree in step. Export regenerates the
//! root container's content from the layers on every call; import reads
//! layers back from drawable elements. The two are near-inverses: ids
//! synthesized by import and attributes without a mapping do not survive
//! exactly.

mod element_kind;
mod export;
mod import;
mod options;

pub use element_kind::{
    is_managed_attribute, ElementKind, COMMON_ATTRIBUTES, DEFINITION_TAGS, DRAWABLE_TAGS,
};
pub use export::{export_to_render_tree, export_tree, ExportOutcome, ExportReport};
pub use import::{import_from_render_tree, import_tree, SYNTHETIC_ID_PREFIX};
pub use options::{
    ReconcileOptions, DEFAULT_BACKGROUND_FILL, DEFAULT_BACKGROUND_ID, DEFAULT_ROOT_CONTAINER_ID,
    DEFAULT_VIEW_BOX,
};
