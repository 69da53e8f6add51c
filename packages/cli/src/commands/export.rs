use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use vectorforge_document::Layer;
use vectorforge_render::export_to_render_tree;

use super::emit;
use crate::config::Config;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Layers JSON file
    pub layers: PathBuf,

    /// Markup to export over; the default skeleton when absent
    #[arg(long)]
    pub previous: Option<PathBuf>,

    /// Write the markup here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn export(args: ExportArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;

    let content = fs::read_to_string(&args.layers)
        .map_err(|e| anyhow!("Cannot read {}: {}", args.layers.display(), e))?;
    let layers: Vec<Layer> = serde_json::from_str(&content)?;

    let previous = match &args.previous {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| anyhow!("Cannot read {}: {}", path.display(), e))?,
        None => String::new(),
    };

    let outcome = export_to_render_tree(&layers, &previous, &config.reconcile_options());
    if let Some(error) = outcome.error {
        // The previous markup comes back untouched; nothing is written.
        return Err(anyhow!("Export failed: {}", error));
    }

    eprintln!(
        "{} {} layers ({} new, {} reused)",
        "Exported".green().bold(),
        outcome.report.layers,
        outcome.report.created,
        outcome.report.reused
    );
    emit(args.output.as_deref(), &outcome.markup)
}
