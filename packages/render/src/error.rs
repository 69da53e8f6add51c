//! Error types for markup parsing and export

use std::ops::Range;
use thiserror::Error;
use vectorforge_document::ValidationError;

/// Byte range in the markup source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }
}

pub type MarkupResult<T> = Result<T, MarkupError>;

/// Markup parse error with location
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarkupError {
    #[error("Unexpected token at {span:?}: expected {expected}, found {found}")]
    UnexpectedToken {
        span: Span,
        expected: String,
        found: String,
    },

    #[error("Unexpected end of input: expected {expected}")]
    UnexpectedEof { expected: String },

    #[error("Mismatched closing tag at {span:?}: expected </{expected}>, found </{found}>")]
    MismatchedTag {
        span: Span,
        expected: String,
        found: String,
    },

    #[error("Element <{tag}> opened at {span:?} is never closed")]
    UnclosedElement { span: Span, tag: String },

    #[error("Content outside the root element at {span:?}")]
    OutsideRoot { span: Span },

    #[error("Document has no root element")]
    MissingRoot,

    #[error("Lexer error at {span:?}: {message}")]
    LexError { span: Span, message: String },
}

impl MarkupError {
    pub fn unexpected_token(span: Span, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::UnexpectedToken {
            span,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn unexpected_eof(expected: impl Into<String>) -> Self {
        Self::UnexpectedEof {
            expected: expected.into(),
        }
    }

    pub fn lex_error(span: Span, message: impl Into<String>) -> Self {
        Self::LexError {
            span,
            message: message.into(),
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            MarkupError::UnexpectedToken { span, .. }
            | MarkupError::MismatchedTag { span, .. }
            | MarkupError::UnclosedElement { span, .. }
            | MarkupError::OutsideRoot { span }
            | MarkupError::LexError { span, .. } => Some(*span),
            MarkupError::UnexpectedEof { .. } | MarkupError::MissingRoot => None,
        }
    }

    #[cfg(feature = "pretty-errors")]
    fn label(&self) -> String {
        match self {
            MarkupError::UnexpectedToken { expected, .. } | MarkupError::UnexpectedEof { expected } => {
                format!("expected {}", expected)
            }
            MarkupError::MismatchedTag { expected, .. } => format!("expected </{}>", expected),
            MarkupError::UnclosedElement { tag, .. } => format!("<{}> opened here", tag),
            MarkupError::OutsideRoot { .. } => "outside the root element".to_string(),
            MarkupError::MissingRoot => "no root element".to_string(),
            MarkupError::LexError { message, .. } => message.clone(),
        }
    }
}

/// Why an export was abandoned. The previous render tree stays in place.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExportError {
    #[error("Previous render tree is not well-formed: {0}")]
    Markup(#[from] MarkupError),

    #[error("Invalid layer tree: {0}")]
    Validation(#[from] ValidationError),

    #[error("Layer {layer_id} has no element mapping for shape kind {kind}")]
    UnmappedShape { layer_id: String, kind: String },

    #[error("Layer id {0} collides with a protected element")]
    ProtectedId(String),
}

/// Pretty-print markup errors with source context using ariadne
#[cfg(feature = "pretty-errors")]
pub fn format_errors(source: &str, filename: &str, errors: &[MarkupError]) -> String {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let mut output = Vec::new();

    for error in errors {
        let span = error.span().unwrap_or(Span {
            start: source.len().saturating_sub(1),
            end: source.len(),
        });

        let report = Report::build(ReportKind::Error, filename, span.start)
            .with_message(error.to_string())
            .with_label(
                Label::new((filename, span.start..span.end))
                    .with_color(Color::Red)
                    .with_message(error.label()),
            )
            .finish();

        if report.write((filename, Source::from(source)), &mut output).is_err() {
            output.extend_from_slice(error.to_string().as_bytes());
            output.push(b'\n');
        }
    }

    String::from_utf8(output).unwrap_or_else(|_| "Error formatting failed".to_string())
}

#[cfg(all(test, feature = "pretty-errors"))]
mod tests {
    use super::*;

    #[test]
    fn test_format_errors_mentions_message() {
        let source = "<svg><g></svg>";
        let error = MarkupError::MismatchedTag {
            span: Span { start: 8, end: 14 },
            expected: "g".into(),
            found: "svg".into(),
        };

        let text = format_errors(source, "doc.svg", &[error]);
        assert!(text.contains("Mismatched closing tag"));
        assert!(text.contains("doc.svg"));
    }
}
