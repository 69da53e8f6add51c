use serde::Serialize;
use vectorforge_render::ExportError;

/// A contained failure the surrounding application should report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// Document version the failure was observed at
    pub version: u64,
    pub message: String,
    #[serde(skip)]
    pub error: ExportError,
}

impl Diagnostic {
    pub fn export_failed(version: u64, error: ExportError) -> Self {
        Self {
            version,
            message: error.to_string(),
            error,
        }
    }
}
