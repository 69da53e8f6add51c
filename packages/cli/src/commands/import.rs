use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use vectorforge_render::import_tree;

use super::{emit, read_markup};
use crate::config::Config;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Markup file to read layers from
    pub input: PathBuf,

    /// Write the layers JSON here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn import(args: ImportArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let (_, tree) = read_markup(&args.input)?;

    let layers = import_tree(&tree, &config.reconcile_options());
    let json = serde_json::to_string_pretty(&layers)?;

    emit(args.output.as_deref(), &json)
}
