//! # VectorForge Path
//!
//! Interprets the path-drawing mini-language (`M L H V C S Q T A Z`, absolute
//! and relative) into a canonical node sequence of four kinds (`Move`, `Line`,
//! `Cubic`, `Close`) and serializes that sequence back into path data.
//!
//! ```rust
//! use vectorforge_path::{parse, serialize};
//!
//! let nodes = parse("M 10 20 L 30 40 Z");
//! assert_eq!(nodes.len(), 3);
//! assert_eq!(serialize(&nodes), "M 10 20 L 30 40 Z");
//! ```
//!
//! The interpreter is lenient: unknown characters, truncated argument groups
//! and drawing commands issued before the first move are dropped instead of
//! raising an error.

pub mod id_generator;
pub mod node;
pub mod parser;
pub mod serializer;
pub mod tokenizer;

#[cfg(test)]
mod tests_round_trip;

pub use id_generator::IDGenerator;
pub use node::{GeometricNode, NodeKind, Point};
pub use parser::{parse, parse_with_options, ParseOptions, Parser};
pub use serializer::{format_number, serialize, Serializer};
pub use tokenizer::{parse_number, segments, Segment, Token};
