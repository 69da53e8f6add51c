//! # VectorForge Editor
//!
//! Whole-document editing on top of the layer model and the reconciler.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ render: markup → render tree → layers       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Document lifecycle + mutations      │
//! │  - Open / revert / new document             │
//! │  - Apply mutations atomically               │
//! │  - Export after every mutation              │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ render: layers → render tree → markup       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The layer list is the source of truth. The render tree is derived from
//! it, apart from the protected background and root container.
//!
//! ## Usage
//!
//! ```rust
//! use vectorforge_document::{Layer, Mutation, Shape};
//! use vectorforge_editor::Editor;
//!
//! let mut editor = Editor::default();
//! let result = editor.apply(Mutation::InsertLayer {
//!     parent_id: None,
//!     index: 0,
//!     layer: Layer::new("sun", Shape::ellipse(400.0, 100.0, 40.0, 40.0)),
//! })?;
//!
//! assert_eq!(result.version, 1);
//! assert!(editor.markup().contains("<ellipse id=\"sun\""));
//! # Ok::<(), vectorforge_editor::EditorError>(())
//! ```

mod diagnostics;
mod errors;
mod pipeline;

pub use diagnostics::Diagnostic;
pub use errors::EditorError;
pub use pipeline::{EditResult, Editor};

// Re-export common types for convenience
pub use vectorforge_document::{Document, Layer, Mutation, MutationError};
pub use vectorforge_render::{ExportReport, ReconcileOptions, RenderTree};
