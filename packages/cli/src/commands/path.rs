use anyhow::Result;
use clap::Args;
use vectorforge_path::{parse_with_options, GeometricNode, Serializer};

use crate::config::Config;

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Path data, e.g. "M 0 0 L 10 10"
    pub data: String,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Repeat a command for extra coordinate groups
    #[arg(long)]
    pub implicit_repeat: bool,

    /// Elevate quadratics with distinct control points
    #[arg(long)]
    pub exact_quadratic: bool,
}

#[derive(Debug, Args)]
pub struct NormalizeArgs {
    /// Path data to rewrite in canonical form
    pub data: String,

    /// Decimal places (overrides config)
    #[arg(short, long)]
    pub precision: Option<usize>,
}

pub fn parse(args: ParseArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let mut options = config.parse_options();
    options.implicit_repeat |= args.implicit_repeat;
    options.exact_quadratic |= args.exact_quadratic;

    let nodes = parse_with_options(&args.data, options);
    tracing::debug!(nodes = nodes.len(), "Parsed path data");

    let json = if args.pretty {
        serde_json::to_string_pretty(&nodes)?
    } else {
        serde_json::to_string(&nodes)?
    };
    println!("{}", json);
    Ok(())
}

pub fn normalize(args: NormalizeArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let nodes = parse_with_options(&args.data, config.parse_options());

    println!("{}", canonical(&nodes, args.precision.or(config.precision)));
    Ok(())
}

fn canonical(nodes: &[GeometricNode], precision: Option<usize>) -> String {
    match precision {
        Some(precision) => Serializer::with_precision(precision).serialize(nodes),
        None => Serializer::new().serialize(nodes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vectorforge_path::parse;

    #[test]
    fn test_canonical_form() {
        let nodes = parse("m10,10 h5 v5 z");
        assert_eq!(canonical(&nodes, None), "M 10 10 L 15 10 L 15 15 Z");
    }

    #[test]
    fn test_canonical_precision() {
        let nodes = parse("M 0 0 Q 10 10 20 0");
        assert_eq!(canonical(&nodes, Some(0)), "M 0 0 C 13 7 13 7 20 0");
    }
}
