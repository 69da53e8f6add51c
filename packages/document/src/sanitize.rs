//! Coerce loosely-produced layers into well-formed ones

use crate::layer::{Layer, Shape};
use vectorforge_path::{GeometricNode, NodeKind};

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

fn non_negative(value: f64) -> f64 {
    finite_or(value, 0.0).max(0.0)
}

/// Clamp styles and geometry into range, recursively.
///
/// Opacity ends up in `[0, 1]` (non-finite becomes 1), stroke width and
/// geometric sizes are at least 0, other non-finite numbers become 0.
pub fn sanitize(mut layer: Layer) -> Layer {
    layer.stroke_width = non_negative(layer.stroke_width);
    layer.opacity = finite_or(layer.opacity, 1.0).clamp(0.0, 1.0);
    layer.shape = sanitize_shape(layer.shape);
    layer.children = layer.children.map(sanitize_layers);
    layer
}

pub fn sanitize_layers(layers: Vec<Layer>) -> Vec<Layer> {
    layers.into_iter().map(sanitize).collect()
}

pub fn sanitize_shape(shape: Shape) -> Shape {
    match shape {
        Shape::Rect {
            x,
            y,
            width,
            height,
            corner_radius,
        } => Shape::Rect {
            x: finite_or(x, 0.0),
            y: finite_or(y, 0.0),
            width: non_negative(width),
            height: non_negative(height),
            corner_radius: non_negative(corner_radius),
        },
        Shape::Ellipse {
            cx,
            cy,
            radius_x,
            radius_y,
        } => Shape::Ellipse {
            cx: finite_or(cx, 0.0),
            cy: finite_or(cy, 0.0),
            radius_x: non_negative(radius_x),
            radius_y: non_negative(radius_y),
        },
        Shape::Text {
            x,
            y,
            content,
            font_family,
            font_size,
            font_weight,
            font_style,
        } => Shape::Text {
            x: finite_or(x, 0.0),
            y: finite_or(y, 0.0),
            content,
            font_family,
            font_size: font_size.filter(|size| size.is_finite()).map(|size| size.max(0.0)),
            font_weight,
            font_style,
        },
        Shape::Path { nodes } => Shape::Path {
            nodes: nodes.into_iter().map(sanitize_node).collect(),
        },
        Shape::Group { children } => Shape::Group {
            children: sanitize_layers(children),
        },
        Shape::Unknown => Shape::Unknown,
    }
}

/// Replace non-finite coordinates; cubic nodes get explicit controls.
pub fn sanitize_node(mut node: GeometricNode) -> GeometricNode {
    node.x = finite_or(node.x, 0.0);
    node.y = finite_or(node.y, 0.0);

    if node.kind == NodeKind::Cubic {
        let c1 = node.control1();
        let c2 = node.control2();
        node.cx1 = Some(c1.x);
        node.cy1 = Some(c1.y);
        node.cx2 = Some(c2.x);
        node.cy2 = Some(c2.y);
    }
    node
}
