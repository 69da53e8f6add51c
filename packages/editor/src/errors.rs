//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("Markup error: {0}")]
    Markup(#[from] vectorforge_render::MarkupError),

    #[error("Validation error: {0}")]
    Validation(#[from] vectorforge_document::ValidationError),

    #[error("Mutation error: {0}")]
    Mutation(#[from] vectorforge_document::MutationError),

    #[error("Export error: {0}")]
    Export(#[from] vectorforge_render::ExportError),
}
