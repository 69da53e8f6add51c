//! # VectorForge Document
//!
//! The canonical layer model: a tree of [`Layer`]s (rectangles, ellipses,
//! text, node-based paths and groups) with tree-wide unique ids, an id index,
//! structural validation and the semantic [`Mutation`]s the editor issues.

pub mod document;
pub mod index;
pub mod layer;
pub mod mutations;
pub mod sanitize;
pub mod validator;

pub use document::Document;
pub use index::{find_path, layer_at, layer_at_mut, ChildList, LayerIndex, LayerPath};
pub use layer::{walk_layers, BlendMode, Layer, Shape, DEFAULT_FILL, DEFAULT_STROKE};
pub use mutations::{Mutation, MutationError, StylePatch};
pub use sanitize::{sanitize, sanitize_layers, sanitize_node, sanitize_shape};
pub use validator::{validate, validate_nodes, ValidationError};

pub use vectorforge_path::{GeometricNode, NodeKind, Point};
