pub mod check;
pub mod export;
pub mod import;
pub mod path;

pub use check::{check, CheckArgs};
pub use export::{export, ExportArgs};
pub use import::{import, ImportArgs};
pub use path::{normalize, parse, NormalizeArgs, ParseArgs};

use anyhow::{anyhow, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;
use vectorforge_render::{format_errors, parse_markup, MarkupError, RenderTree};

/// Parse markup, turning syntax errors into a pretty report
pub(crate) fn read_markup(file: &Path) -> Result<(String, RenderTree)> {
    let source = fs::read_to_string(file)
        .map_err(|e| anyhow!("Cannot read {}: {}", file.display(), e))?;
    let tree = parse_markup(&source).map_err(|e| pretty_error(file, &source, e))?;
    Ok((source, tree))
}

pub(crate) fn pretty_error(file: &Path, source: &str, error: MarkupError) -> anyhow::Error {
    let file_name = file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");
    anyhow!("\n{}", format_errors(source, file_name, &[error]))
}

/// Write to `output`, or stdout when absent
pub(crate) fn emit(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(path, content)?;
            eprintln!("  {} {}", "✓".green(), path.display());
            Ok(())
        }
        None => {
            println!("{}", content);
            Ok(())
        }
    }
}
