use crate::node::{GeometricNode, NodeKind};
use std::fmt::Write;

/// Serializer converts canonical nodes back to path data
///
/// Each node has exactly one emission: `M x y`, `L x y`,
/// `C cx1 cy1 cx2 cy2 x y` or `Z`. Tokens are joined by single spaces. Nodes
/// whose endpoint is not finite are skipped; serialization never fails.
#[derive(Debug, Clone, Default)]
pub struct Serializer {
    precision: Option<usize>,
}

impl Serializer {
    pub fn new() -> Self {
        Self { precision: None }
    }

    /// Round every coordinate to `precision` decimals, trimming trailing zeros.
    pub fn with_precision(precision: usize) -> Self {
        Self {
            precision: Some(precision),
        }
    }

    pub fn serialize(&self, nodes: &[GeometricNode]) -> String {
        let mut output = String::new();

        for node in nodes {
            let start = output.len();
            if start > 0 {
                output.push(' ');
            }
            if !self.write_node(node, &mut output) {
                output.truncate(start);
            }
        }

        output
    }

    /// Append one node's emission. Returns false if the node was skipped.
    fn write_node(&self, node: &GeometricNode, output: &mut String) -> bool {
        if node.kind == NodeKind::Close {
            output.push('Z');
            return true;
        }

        if !node.is_finite() {
            return false;
        }

        output.push(node.kind.letter());
        if node.kind == NodeKind::Cubic {
            let c1 = node.control1();
            let c2 = node.control2();
            for value in [c1.x, c1.y, c2.x, c2.y] {
                self.write_number(value, output);
            }
        }
        self.write_number(node.x, output);
        self.write_number(node.y, output);
        true
    }

    fn write_number(&self, value: f64, output: &mut String) {
        output.push(' ');
        output.push_str(&self.format_number(value));
    }

    pub fn format_number(&self, value: f64) -> String {
        match self.precision {
            Some(precision) => {
                let mut text = String::new();
                let _ = write!(text, "{:.*}", precision, value);
                if text.contains('.') {
                    let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
                    text.truncate(trimmed);
                }
                if text == "-0" {
                    text = "0".to_string();
                }
                text
            }
            None => format_number(value),
        }
    }
}

/// Serialize nodes to path data.
pub fn serialize(nodes: &[GeometricNode]) -> String {
    Serializer::new().serialize(nodes)
}

/// Shortest round-trip representation of a coordinate (`-0` prints as `0`).
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}
