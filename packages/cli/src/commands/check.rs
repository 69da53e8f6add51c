use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use vectorforge_document::{validate, walk_layers, Shape};
use vectorforge_render::import_tree;

use super::read_markup;
use crate::config::Config;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Markup file to check
    pub input: PathBuf,
}

pub fn check(args: CheckArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let options = config.reconcile_options();

    println!("🔍 {} {}", "Checking".green().bold(), args.input.display());

    let (_, tree) = read_markup(&args.input)?;
    let layers = import_tree(&tree, &options);
    let index = validate(&layers).map_err(|e| anyhow!("Invalid layer tree: {}", e))?;

    let mut groups = 0;
    let mut paths = 0;
    let mut nodes = 0;
    walk_layers(&layers, &mut |layer| match &layer.shape {
        Shape::Group { .. } => groups += 1,
        Shape::Path { nodes: path } => {
            paths += 1;
            nodes += path.len();
        }
        _ => {}
    });

    let missing: Vec<_> = [options.background_id.as_str(), options.root_container_id.as_str()]
        .into_iter()
        .filter(|id| tree.find_by_id(id).is_none())
        .collect();

    println!("   Layers: {} ({} top level)", index.len(), layers.len());
    println!("   Groups: {}", groups);
    println!("   Paths:  {} ({} nodes)", paths, nodes);

    if missing.is_empty() {
        println!("{} Document is well-formed", "✅".green());
    } else {
        println!(
            "{} Missing {} (created on next export)",
            "⚠️".yellow(),
            missing.join(", ")
        );
    }

    Ok(())
}
