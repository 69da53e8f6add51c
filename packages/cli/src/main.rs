mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    check, export, import, normalize, parse, CheckArgs, ExportArgs, ImportArgs, NormalizeArgs,
    ParseArgs,
};
use tracing_subscriber::EnvFilter;

/// VectorForge CLI - path data and layer documents
#[derive(Parser, Debug)]
#[command(name = "vectorforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interpret path data and print its nodes as JSON
    Parse(ParseArgs),

    /// Rewrite path data in canonical absolute form
    Normalize(NormalizeArgs),

    /// Read layers from a markup file
    Import(ImportArgs),

    /// Write layers into markup
    Export(ExportArgs),

    /// Import and validate a markup file
    Check(CheckArgs),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?.display().to_string();

    match cli.command {
        Command::Parse(args) => parse(args, &cwd),
        Command::Normalize(args) => normalize(args, &cwd),
        Command::Import(args) => import(args, &cwd),
        Command::Export(args) => export(args, &cwd),
        Command::Check(args) => check(args, &cwd),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
