//! # VectorForge Render
//!
//! The render tree is the renderable mirror of a layer document: an SVG-like
//! element tree with a background and a root container. This crate holds its
//! value model, a markup lexer/parser/writer, and the reconciliation engine
//! that derives the render tree from layers (export) and layers from a render
//! tree (import).
//!
//! ```rust
//! use vectorforge_document::{Layer, Shape};
//! use vectorforge_render::{export_to_render_tree, import_from_render_tree, ReconcileOptions};
//!
//! let options = ReconcileOptions::default();
//! let layers = vec![Layer::new("sky", Shape::rect(0.0, 0.0, 512.0, 256.0))];
//!
//! let outcome = export_to_render_tree(&layers, "", &options);
//! assert!(outcome.is_ok());
//!
//! let imported = import_from_render_tree(&outcome.markup, &options).unwrap();
//! assert_eq!(imported[0].shape, layers[0].shape);
//! ```

pub mod error;
pub mod lexer;
pub mod parser;
pub mod reconcile;
pub mod tree;
pub mod writer;

#[cfg(test)]
mod tests_reconcile;

#[cfg(feature = "pretty-errors")]
pub use error::format_errors;
pub use error::{ExportError, MarkupError, MarkupResult, Span};
pub use parser::{decode_entities, parse_markup};
pub use reconcile::{
    export_to_render_tree, export_tree, import_from_render_tree, import_tree, ElementKind,
    ExportOutcome, ExportReport, ReconcileOptions, DEFAULT_BACKGROUND_ID,
    DEFAULT_ROOT_CONTAINER_ID,
};
pub use tree::{RenderElement, RenderNode, RenderTree};
pub use writer::{write_markup, write_markup_with, WriteOptions};
