//! Canonical geometric node schema.

use serde::{Deserialize, Serialize};

/// A 2D point in document space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Mirror `other` about `self` (`2 * self - other`).
    pub fn reflect(self, other: Point) -> Point {
        Point::new(2.0 * self.x - other.x, 2.0 * self.y - other.y)
    }

    /// Point at `t` along the segment from `self` to `other`.
    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    pub fn midpoint(self, other: Point) -> Point {
        self.lerp(other, 0.5)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// The four canonical drawing instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Move,
    Line,
    Cubic,
    Close,
}

impl NodeKind {
    /// Command letter emitted by the serializer
    pub fn letter(self) -> char {
        match self {
            NodeKind::Move => 'M',
            NodeKind::Line => 'L',
            NodeKind::Cubic => 'C',
            NodeKind::Close => 'Z',
        }
    }
}

/// One drawing instruction with absolute coordinates.
///
/// Control points are only meaningful for [`NodeKind::Cubic`]. They are kept
/// optional so that hand-authored or deserialized nodes with missing controls
/// still serialize (missing controls fall back to the endpoint).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometricNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cx1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cy1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cx2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cy2: Option<f64>,
}

impl GeometricNode {
    fn plain(id: impl Into<String>, kind: NodeKind, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            kind,
            x,
            y,
            cx1: None,
            cy1: None,
            cx2: None,
            cy2: None,
        }
    }

    pub fn move_to(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self::plain(id, NodeKind::Move, x, y)
    }

    pub fn line_to(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self::plain(id, NodeKind::Line, x, y)
    }

    pub fn cubic_to(id: impl Into<String>, c1: Point, c2: Point, end: Point) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Cubic,
            x: end.x,
            y: end.y,
            cx1: Some(c1.x),
            cy1: Some(c1.y),
            cx2: Some(c2.x),
            cy2: Some(c2.y),
        }
    }

    /// `Close` carries the coordinates of the subpath's `Move`.
    pub fn close(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self::plain(id, NodeKind::Close, x, y)
    }

    pub fn endpoint(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// First control point, defaulting to the endpoint when missing or non-finite.
    pub fn control1(&self) -> Point {
        Point::new(
            finite_or(self.cx1, self.x),
            finite_or(self.cy1, self.y),
        )
    }

    /// Second control point, defaulting to the endpoint when missing or non-finite.
    pub fn control2(&self) -> Point {
        Point::new(
            finite_or(self.cx2, self.x),
            finite_or(self.cy2, self.y),
        )
    }

    pub fn is_finite(&self) -> bool {
        self.endpoint().is_finite()
    }

    /// Apply a translation to the endpoint and any control points.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
        for value in [&mut self.cx1, &mut self.cx2].into_iter().flatten() {
            *value += dx;
        }
        for value in [&mut self.cy1, &mut self.cy2].into_iter().flatten() {
            *value += dy;
        }
    }
}

fn finite_or(value: Option<f64>, fallback: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect_about_current_point() {
        let current = Point::new(30.0, 0.0);
        let previous = Point::new(20.0, 10.0);
        assert_eq!(current.reflect(previous), Point::new(40.0, -10.0));
    }

    #[test]
    fn test_controls_default_to_endpoint() {
        let mut node = GeometricNode::line_to("n", 5.0, 6.0);
        node.kind = NodeKind::Cubic;
        node.cx1 = Some(f64::NAN);
        node.cy2 = Some(3.0);

        assert_eq!(node.control1(), Point::new(5.0, 6.0));
        assert_eq!(node.control2(), Point::new(5.0, 3.0));
    }

    #[test]
    fn test_node_json_shape() {
        let node = GeometricNode::move_to("node-1", 1.0, 2.0);
        let json = serde_json::to_value(&node).unwrap();

        assert_eq!(json["type"], "move");
        assert!(json.get("cx1").is_none());

        let back: GeometricNode = serde_json::from_value(json).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn test_translate_moves_controls() {
        let mut node = GeometricNode::cubic_to(
            "c",
            Point::new(1.0, 1.0),
            Point::new(2.0, 2.0),
            Point::new(3.0, 3.0),
        );
        node.translate(10.0, -1.0);

        assert_eq!(node.endpoint(), Point::new(13.0, 2.0));
        assert_eq!(node.control1(), Point::new(11.0, 0.0));
        assert_eq!(node.control2(), Point::new(12.0, 1.0));
    }
}
