//! Render tree → layer tree

use super::element_kind::{ElementKind, COMMON_ATTRIBUTES, DEFINITION_TAGS};
use super::options::ReconcileOptions;
use crate::error::MarkupResult;
use crate::parser::parse_markup;
use crate::tree::{RenderElement, RenderTree};
use std::collections::HashSet;
use tracing::{debug, info, instrument, trace};
use vectorforge_document::{sanitize_layers, BlendMode, Layer, Shape};
use vectorforge_path::{parse_number, parse_with_options};

/// Prefix of ids synthesized for elements without one
pub const SYNTHETIC_ID_PREFIX: &str = "layer";

/// Parse markup and read its layers.
#[instrument(skip_all, fields(bytes = markup.len()))]
pub fn import_from_render_tree(markup: &str, options: &ReconcileOptions) -> MarkupResult<Vec<Layer>> {
    let tree = parse_markup(markup)?;
    Ok(import_tree(&tree, options))
}

/// Read layers from the root container, or from the document root when the
/// tree has no container.
#[instrument(skip_all)]
pub fn import_tree(tree: &RenderTree, options: &ReconcileOptions) -> Vec<Layer> {
    let source = tree
        .find_by_id(&options.root_container_id)
        .unwrap_or(&tree.root);

    let mut importer = Importer::new(tree, options);
    let layers = sanitize_layers(importer.import_children(source, SYNTHETIC_ID_PREFIX));

    info!(
        layers = layers.len(),
        total = importer.claimed.len(),
        "Imported layers"
    );
    layers
}

struct Importer<'a> {
    options: &'a ReconcileOptions,
    /// Every id written anywhere in the tree
    reserved: HashSet<String>,
    /// Ids handed out so far
    claimed: HashSet<String>,
}

impl<'a> Importer<'a> {
    fn new(tree: &RenderTree, options: &'a ReconcileOptions) -> Self {
        let mut reserved = HashSet::new();
        collect_ids(&tree.root, &mut reserved);
        Self {
            options,
            reserved,
            claimed: HashSet::new(),
        }
    }

    fn import_children(&mut self, parent: &RenderElement, prefix: &str) -> Vec<Layer> {
        let mut layers = Vec::new();
        for (position, child) in parent.elements().enumerate() {
            self.import_element(child, &format!("{}-{}", prefix, position), &mut layers);
        }
        layers
    }

    fn import_element(&mut self, element: &RenderElement, position: &str, out: &mut Vec<Layer>) {
        if let Some(id) = element.id().filter(|id| self.options.is_protected(id)) {
            trace!(id, "Skipping protected element");
            return;
        }
        if DEFINITION_TAGS.contains(&element.tag.as_str()) {
            trace!(tag = %element.tag, "Skipping definition element");
            return;
        }

        let Some(shape) = self.read_shape(element) else {
            // Unknown container: its drawables belong to the enclosing list
            for (index, child) in element.elements().enumerate() {
                self.import_element(child, &format!("{}-{}", position, index), out);
            }
            return;
        };

        let id = self.claim_id(element, position);
        let mut layer = read_common(element, Layer::new(id, shape));

        match &mut layer.shape {
            Shape::Group { children } => *children = self.import_children(element, position),
            _ => {
                let nested = self.import_children(element, position);
                if !nested.is_empty() {
                    layer.children = Some(nested);
                }
            }
        }

        debug!(layer_id = %layer.id, tag = %element.tag, "Imported layer");
        out.push(layer);
    }

    /// Geometry of a drawable element; None for anything else
    fn read_shape(&self, element: &RenderElement) -> Option<Shape> {
        let number = |name: &str| element.attr(name).and_then(parse_number).unwrap_or(0.0);

        let shape = match element.tag.as_str() {
            "rect" => Shape::Rect {
                x: number("x"),
                y: number("y"),
                width: number("width"),
                height: number("height"),
                corner_radius: element
                    .attr("rx")
                    .or_else(|| element.attr("ry"))
                    .and_then(parse_number)
                    .unwrap_or(0.0),
            },
            "ellipse" => Shape::ellipse(number("cx"), number("cy"), number("rx"), number("ry")),
            "circle" => Shape::ellipse(number("cx"), number("cy"), number("r"), number("r")),
            "text" => Shape::Text {
                x: number("x"),
                y: number("y"),
                content: element.own_text(),
                font_family: element.attr("font-family").map(str::to_string),
                font_size: element.attr("font-size").and_then(parse_number),
                font_weight: element.attr("font-weight").map(str::to_string),
                font_style: element.attr("font-style").map(str::to_string),
            },
            "path" => self.path(element.attr("d").unwrap_or_default()),
            "line" => self.path(&format!(
                "M {} {} L {} {}",
                number("x1"),
                number("y1"),
                number("x2"),
                number("y2")
            )),
            "polyline" | "polygon" => {
                let mut data = polyline_data(element.attr("points").unwrap_or_default());
                if element.tag == "polygon" && !data.is_empty() {
                    data.push_str(" Z");
                }
                self.path(&data)
            }
            "g" => Shape::group(Vec::new()),
            _ => return None,
        };
        Some(shape)
    }

    fn path(&self, data: &str) -> Shape {
        Shape::Path {
            nodes: parse_with_options(data, self.options.parse_options),
        }
    }

    /// The element's own id on first use, otherwise one derived from its
    /// position, suffixed until unique.
    fn claim_id(&mut self, element: &RenderElement, position: &str) -> String {
        if let Some(id) = element.id().filter(|id| !id.is_empty()) {
            if self.claimed.insert(id.to_string()) {
                return id.to_string();
            }
            debug!(id, "Repeated element id, synthesizing a new one");
        }

        let mut candidate = position.to_string();
        let mut suffix = 2;
        while self.reserved.contains(&candidate) || self.claimed.contains(&candidate) {
            candidate = format!("{}-{}", position, suffix);
            suffix += 1;
        }
        self.claimed.insert(candidate.clone());
        candidate
    }
}

fn read_common(element: &RenderElement, mut layer: Layer) -> Layer {
    layer.name = element
        .attr("data-name")
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| layer.id.clone());
    layer.visible = element.attr("display") != Some("none");
    layer.locked = element.attr("data-locked") == Some("true");

    if let Some(fill) = element.attr("fill") {
        layer.fill_color = fill.to_string();
    }
    if let Some(stroke) = element.attr("stroke") {
        layer.stroke_color = stroke.to_string();
    }
    layer.stroke_width = element
        .attr("stroke-width")
        .and_then(parse_number)
        .unwrap_or(0.0);
    layer.opacity = element.attr("opacity").and_then(parse_number).unwrap_or(1.0);
    layer.blend_mode = element
        .attr("data-blend-mode")
        .map(BlendMode::from)
        .unwrap_or_default();
    layer.clip_mask_id = element.attr("clip-path").and_then(clip_reference);

    let consumed = consumed_attributes(&element.tag);
    for (name, value) in &element.attributes {
        if !COMMON_ATTRIBUTES.contains(&name.as_str()) && !consumed.contains(&name.as_str()) {
            layer.attributes.insert(name.clone(), value.clone());
        }
    }
    layer
}

/// Geometry attributes read into the shape for `tag`
fn consumed_attributes(tag: &str) -> &'static [&'static str] {
    match tag {
        "circle" => &["cx", "cy", "r"],
        "line" => &["x1", "y1", "x2", "y2"],
        "polyline" | "polygon" => &["points"],
        other => ElementKind::from_tag(other)
            .map(ElementKind::geometry_attributes)
            .unwrap_or(&[]),
    }
}

/// `url(#id)` → `id`
fn clip_reference(value: &str) -> Option<String> {
    let inner = value.trim().strip_prefix("url(")?.strip_suffix(')')?;
    let id = inner.trim().trim_matches(|c| c == '"' || c == '\'').strip_prefix('#')?;
    (!id.is_empty()).then(|| id.to_string())
}

/// `points` list → path data with one move followed by lines
fn polyline_data(points: &str) -> String {
    let numbers: Vec<f64> = points
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .filter_map(parse_number)
        .collect();

    numbers
        .chunks_exact(2)
        .enumerate()
        .map(|(index, pair)| {
            let command = if index == 0 { 'M' } else { 'L' };
            format!("{} {} {}", command, pair[0], pair[1])
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn collect_ids(element: &RenderElement, ids: &mut HashSet<String>) {
    if let Some(id) = element.id() {
        ids.insert(id.to_string());
    }
    for child in element.elements() {
        collect_ids(child, ids);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vectorforge_path::{serialize, NodeKind};

    fn import(markup: &str) -> Vec<Layer> {
        import_from_render_tree(markup, &ReconcileOptions::default()).unwrap()
    }

    fn ids(layers: &[Layer]) -> Vec<&str> {
        layers.iter().map(|l| l.id.as_str()).collect()
    }

    #[test]
    fn test_initial_document() {
        let layers = import(
            r##"<svg viewBox="0 0 512 512" xmlns="http://www.w3.org/2000/svg">
  <rect id="bg" width="100%" height="100%" fill="#0a0b0e"/>
  <g id="workspace_root">
    <path id="prime_path" d="M 156 156 L 356 156 L 356 356 L 156 356 Z" fill="#FF9800" fill-opacity="0.1" stroke="#FF9800" stroke-width="2" />
  </g>
</svg>"##,
        );

        assert_eq!(layers.len(), 1);
        let layer = &layers[0];
        assert_eq!(layer.id, "prime_path");
        assert_eq!(layer.name, "prime_path");
        assert_eq!(layer.fill_color, "#FF9800");
        assert_eq!(layer.stroke_width, 2.0);
        assert_eq!(layer.opacity, 1.0);
        assert_eq!(layer.attributes.get("fill-opacity").map(String::as_str), Some("0.1"));
        match &layer.shape {
            Shape::Path { nodes } => {
                assert_eq!(nodes.len(), 5);
                assert_eq!(nodes[4].kind, NodeKind::Close);
                assert_eq!(serialize(nodes), "M 156 156 L 356 156 L 356 356 L 156 356 Z");
            }
            other => panic!("expected path, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_for_missing_attributes() {
        let layers = import(r#"<svg><g id="workspace_root"><ellipse id="e" rx="5"/></g></svg>"#);
        let layer = &layers[0];

        assert!(layer.visible);
        assert!(!layer.locked);
        assert_eq!(layer.fill_color, "#ffffff");
        assert_eq!(layer.stroke_color, "#000000");
        assert_eq!(layer.stroke_width, 0.0);
        assert_eq!(layer.shape, Shape::ellipse(0.0, 0.0, 5.0, 0.0));
    }

    #[test]
    fn test_synthetic_ids_are_positional_and_unique() {
        let layers = import(
            r#"<svg><g id="workspace_root">
                <rect/>
                <rect id="layer-1"/>
                <rect id="dup"/>
                <rect id="dup"/>
            </g></svg>"#,
        );

        assert_eq!(ids(&layers), vec!["layer-0", "layer-1", "dup", "layer-3"]);
    }

    #[test]
    fn test_synthetic_id_avoids_explicit_ids() {
        let layers = import(r#"<svg><g id="workspace_root"><rect/><rect id="layer-0"/></g></svg>"#);
        assert_eq!(ids(&layers), vec!["layer-0-2", "layer-0"]);
    }

    #[test]
    fn test_skips_protected_and_definitions() {
        let layers = import(
            r#"<svg>
                <defs><path id="hidden" d="M 0 0"/></defs>
                <rect id="bg"/>
                <title>t</title>
                <a><circle id="c" r="2"/></a>
            </svg>"#,
        );

        assert_eq!(ids(&layers), vec!["c"]);
        assert_eq!(layers[0].shape, Shape::ellipse(0.0, 0.0, 2.0, 2.0));
    }

    #[test]
    fn test_groups_and_nested_children() {
        let layers = import(
            r#"<svg><g id="workspace_root">
                <g id="grp" data-name="Group"><rect id="r"/></g>
                <path id="p" d="M 0 0"><rect id="inner"/></path>
            </g></svg>"#,
        );

        assert_eq!(layers[0].name, "Group");
        assert_eq!(layers[0].shape, Shape::group(vec![read_common(
            &RenderElement::new("rect").with_attr("id", "r"),
            Layer::new("r", Shape::rect(0.0, 0.0, 0.0, 0.0)),
        )]));
        assert_eq!(ids(layers[1].children.as_deref().unwrap()), vec!["inner"]);
    }

    #[test]
    fn test_common_flags() {
        let layers = import(
            r#"<svg><g id="workspace_root"><text id="t" x="4" font-size="12px" display="none" data-locked="true" data-blend-mode="screen" clip-path="url(#m)" opacity="7">Hi <tspan>there</tspan></text></g></svg>"#,
        );
        let layer = &layers[0];

        assert!(!layer.visible);
        assert!(layer.locked);
        assert_eq!(layer.blend_mode, BlendMode::Screen);
        assert_eq!(layer.clip_mask_id.as_deref(), Some("m"));
        assert_eq!(layer.opacity, 1.0);
        match &layer.shape {
            Shape::Text { x, content, font_size, .. } => {
                assert_eq!(*x, 4.0);
                assert_eq!(content, "Hi there");
                assert_eq!(*font_size, Some(12.0));
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn test_polygon_and_line() {
        let layers = import(
            r#"<svg><polygon id="pg" points="0,0 10,0 10,10"/><line id="ln" x1="1" y1="2" x2="3" y2="4"/></svg>"#,
        );

        let data: Vec<String> = layers
            .iter()
            .map(|layer| match &layer.shape {
                Shape::Path { nodes } => serialize(nodes),
                other => panic!("expected path, got {other:?}"),
            })
            .collect();
        assert_eq!(data, vec!["M 0 0 L 10 0 L 10 10 Z", "M 1 2 L 3 4"]);
    }

    #[test]
    fn test_clip_reference() {
        assert_eq!(clip_reference("url(#a)"), Some("a".to_string()));
        assert_eq!(clip_reference(" url('#b') "), Some("b".to_string()));
        assert_eq!(clip_reference("none"), None);
    }
}
