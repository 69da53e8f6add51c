//! # Editing Pipeline
//!
//! Coordinates the document lifecycle: Open → Mutate → Export
//!
//! Every mutation is followed by an export in the same call, so the render
//! tree a caller reads always derives from the document snapshot the
//! mutation produced. When an export fails the layers keep the mutation, the
//! previous render tree stays in place and a [`Diagnostic`] records the
//! divergence until the next successful export.

use crate::diagnostics::Diagnostic;
use crate::EditorError;
use serde::Serialize;
use tracing::{info, warn};
use vectorforge_document::{Document, Layer, Mutation};
use vectorforge_render::{
    export_tree, import_tree, parse_markup, write_markup, ExportError, ExportReport,
    ReconcileOptions, RenderTree,
};

/// Owns a document and the render tree derived from it
#[derive(Debug, Clone)]
pub struct Editor {
    options: ReconcileOptions,
    document: Document,
    render_tree: RenderTree,
    markup: String,
    diagnostics: Vec<Diagnostic>,
    /// False while the render tree lags behind the layers
    in_sync: bool,
}

/// Result of applying one mutation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditResult {
    /// Document version after the mutation
    pub version: u64,

    /// Export counts, absent when the export was contained
    pub report: Option<ExportReport>,

    /// Set when the export failed
    pub diagnostic: Option<Diagnostic>,
}

impl Editor {
    /// Empty document over the default skeleton
    pub fn new(options: ReconcileOptions) -> Self {
        let render_tree = options.default_tree();
        let markup = write_markup(&render_tree);
        Self {
            options,
            document: Document::new(),
            render_tree,
            markup,
            diagnostics: Vec::new(),
            in_sync: true,
        }
    }

    /// Open existing markup, importing its layers.
    pub fn open(markup: &str, options: ReconcileOptions) -> Result<Self, EditorError> {
        let render_tree = parse_markup(markup)?;
        let layers = import_tree(&render_tree, &options);
        let document = Document::from_layers(layers)?;

        let mut editor = Self {
            options,
            document,
            markup: write_markup(&render_tree),
            render_tree,
            diagnostics: Vec::new(),
            in_sync: true,
        };
        // A layer the writer cannot map leaves the parsed tree in place.
        let _ = editor.export();

        info!(layers = editor.document.layer_count(), "Opened document");
        Ok(editor)
    }

    /// Apply a mutation, then export.
    ///
    /// A rejected mutation changes nothing and returns the error. A failed
    /// export does not fail the call; see [`EditResult::diagnostic`].
    pub fn apply(&mut self, mutation: Mutation) -> Result<EditResult, EditorError> {
        let version = self.document.apply(&mutation)?;

        let result = match self.export() {
            Ok(report) => EditResult {
                version,
                report: Some(report),
                diagnostic: None,
            },
            Err(diagnostic) => EditResult {
                version,
                report: None,
                diagnostic: Some(diagnostic),
            },
        };
        Ok(result)
    }

    /// Replace the whole document with layers read from `markup`.
    pub fn revert(&mut self, markup: &str) -> Result<u64, EditorError> {
        let render_tree = parse_markup(markup)?;
        let layers = import_tree(&render_tree, &self.options);
        let version = self.document.replace_layers(layers)?;

        self.markup = write_markup(&render_tree);
        self.render_tree = render_tree;
        self.in_sync = true;
        // Best effort; a failure is kept as a diagnostic.
        let _ = self.export();

        info!(version, "Reverted document");
        Ok(version)
    }

    /// Replace the whole document with a layer list.
    pub fn replace_layers(&mut self, layers: Vec<Layer>) -> Result<EditResult, EditorError> {
        let version = self.document.replace_layers(layers)?;
        let (report, diagnostic) = match self.export() {
            Ok(report) => (Some(report), None),
            Err(diagnostic) => (None, Some(diagnostic)),
        };
        Ok(EditResult {
            version,
            report,
            diagnostic,
        })
    }

    /// Start over with no layers and a fresh skeleton.
    pub fn new_document(&mut self) -> u64 {
        self.render_tree = self.options.default_tree();
        self.markup = write_markup(&self.render_tree);
        self.in_sync = true;

        // An empty layer list always validates.
        let version = self
            .document
            .replace_layers(Vec::new())
            .unwrap_or_else(|_| self.document.version());
        info!(version, "Started new document");
        version
    }

    /// Export again from the current layers, e.g. to recover after a
    /// contained failure.
    pub fn render(&mut self) -> Result<ExportReport, EditorError> {
        self.export().map_err(|diagnostic| diagnostic.error.into())
    }

    fn export(&mut self) -> Result<ExportReport, Diagnostic> {
        match export_tree(self.document.layers(), &self.render_tree, &self.options) {
            Ok((tree, report)) => {
                self.markup = write_markup(&tree);
                self.render_tree = tree;
                self.in_sync = true;
                Ok(report)
            }
            Err(error) => Err(self.record_failure(error)),
        }
    }

    fn record_failure(&mut self, error: ExportError) -> Diagnostic {
        warn!(
            %error,
            version = self.document.version(),
            "Export failed, render tree kept"
        );
        let diagnostic = Diagnostic::export_failed(self.document.version(), error);
        self.diagnostics.push(diagnostic.clone());
        self.in_sync = false;
        diagnostic
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn layers(&self) -> &[Layer] {
        self.document.layers()
    }

    pub fn version(&self) -> u64 {
        self.document.version()
    }

    pub fn render_tree(&self) -> &RenderTree {
        &self.render_tree
    }

    /// Serialized render tree
    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    /// True when the render tree reflects the current layers
    pub fn is_in_sync(&self) -> bool {
        self.in_sync
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(ReconcileOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vectorforge_document::Shape;

    fn insert(id: &str, shape: Shape) -> Mutation {
        Mutation::InsertLayer {
            parent_id: None,
            index: 0,
            layer: Layer::new(id, shape),
        }
    }

    #[test]
    fn test_new_editor_has_skeleton() {
        let editor = Editor::default();

        assert_eq!(editor.version(), 0);
        assert!(editor.layers().is_empty());
        assert_eq!(editor.render_tree().count_id("bg"), 1);
        assert_eq!(editor.render_tree().count_id("workspace_root"), 1);
    }

    #[test]
    fn test_mutation_exports_in_same_step() {
        let mut editor = Editor::default();
        let result = editor
            .apply(insert("a", Shape::rect(0.0, 0.0, 5.0, 5.0)))
            .unwrap();

        assert_eq!(result.version, 1);
        assert_eq!(result.report.map(|r| r.created), Some(1));
        assert!(editor.render_tree().find_by_id("a").is_some());
        assert!(editor.markup().contains("id=\"a\""));
    }

    #[test]
    fn test_rejected_mutation_changes_nothing() {
        let mut editor = Editor::default();
        let markup = editor.markup().to_string();

        let result = editor.apply(Mutation::RemoveLayer {
            layer_id: "missing".into(),
        });

        assert!(matches!(result, Err(EditorError::Mutation(_))));
        assert_eq!(editor.markup(), markup);
        assert_eq!(editor.version(), 0);
    }

    #[test]
    fn test_failed_export_keeps_tree_and_records_diagnostic() {
        let mut editor = Editor::default();
        editor.apply(insert("a", Shape::rect(0.0, 0.0, 5.0, 5.0))).unwrap();
        let markup = editor.markup().to_string();

        let result = editor.apply(insert("odd", Shape::Unknown)).unwrap();

        assert_eq!(result.version, 2);
        assert!(result.report.is_none());
        assert!(result.diagnostic.is_some());
        assert_eq!(editor.markup(), markup);
        assert_eq!(editor.layers().len(), 2);
        assert!(!editor.is_in_sync());
        assert_eq!(editor.diagnostics().len(), 1);

        editor
            .apply(Mutation::RemoveLayer {
                layer_id: "odd".into(),
            })
            .unwrap();
        assert!(editor.is_in_sync());
        assert_eq!(editor.take_diagnostics().len(), 1);
        assert!(editor.diagnostics().is_empty());
    }

    #[test]
    fn test_new_document_resets() {
        let mut editor = Editor::default();
        editor.apply(insert("a", Shape::rect(0.0, 0.0, 5.0, 5.0))).unwrap();

        let version = editor.new_document();

        assert_eq!(version, 2);
        assert!(editor.layers().is_empty());
        assert!(editor.render_tree().find_by_id("a").is_none());
    }

    #[test]
    fn test_render_surfaces_export_error() {
        let mut editor = Editor::default();
        editor.apply(insert("odd", Shape::Unknown)).unwrap();

        assert!(matches!(editor.render(), Err(EditorError::Export(_))));
        assert_eq!(editor.diagnostics().len(), 2);
    }
}
