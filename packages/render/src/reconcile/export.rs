//! Layer tree → render tree
//!
//! Every export rebuilds the root container from the layer list. Only the
//! protected elements (background, root container and any extra protected
//! ids) carry over from the previous tree, together with content outside the
//! root container that no layer claims. A tree without a root container had
//! its layers read from the document root, so drawables there are replaced
//! too. Failures are contained: the caller gets the previous tree back
//! untouched.

use super::element_kind::{is_managed_attribute, ElementKind, DEFINITION_TAGS, DRAWABLE_TAGS};
use super::options::ReconcileOptions;
use crate::error::ExportError;
use crate::parser::parse_markup;
use crate::tree::{RenderElement, RenderNode, RenderTree};
use crate::writer::write_markup;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};
use vectorforge_document::{validate, walk_layers, Layer, Shape};
use vectorforge_path::Serializer;

/// Counts from a successful export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    /// Layers written, at any depth
    pub layers: usize,
    /// Layers with no element of the same id in the previous tree
    pub created: usize,
    /// Layers whose id matched an element of the previous tree
    pub reused: usize,
}

/// Result of a contained export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOutcome {
    /// The rebuilt markup, or the previous markup verbatim if the export failed
    pub markup: String,
    pub report: ExportReport,
    pub error: Option<ExportError>,
}

impl ExportOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_result(self) -> Result<(String, ExportReport), ExportError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok((self.markup, self.report)),
        }
    }
}

/// Export layers over previously written markup.
///
/// Blank `previous` markup means there is no tree yet and the default
/// skeleton is used. This never fails: on error the outcome carries the
/// previous markup unchanged along with the error.
#[instrument(skip_all, fields(layers = layers.len()))]
pub fn export_to_render_tree(
    layers: &[Layer],
    previous: &str,
    options: &ReconcileOptions,
) -> ExportOutcome {
    let previous_tree = if previous.trim().is_empty() {
        Ok(options.default_tree())
    } else {
        parse_markup(previous).map_err(ExportError::from)
    };

    match previous_tree.and_then(|tree| export_tree(layers, &tree, options)) {
        Ok((tree, report)) => ExportOutcome {
            markup: write_markup(&tree),
            report,
            error: None,
        },
        Err(error) => {
            warn!(%error, "Export failed, keeping previous render tree");
            ExportOutcome {
                markup: previous.to_string(),
                report: ExportReport::default(),
                error: Some(error),
            }
        }
    }
}

/// Rebuild `previous` from `layers`, returning a new tree.
#[instrument(skip_all, fields(layers = layers.len()))]
pub fn export_tree(
    layers: &[Layer],
    previous: &RenderTree,
    options: &ReconcileOptions,
) -> Result<(RenderTree, ExportReport), ExportError> {
    check_layers(layers, options)?;

    // Build every element before touching the tree so a failure leaves
    // nothing half-written.
    let exporter = Exporter::new(options);
    let elements = layers
        .iter()
        .map(|layer| exporter.layer_element(layer))
        .collect::<Result<Vec<_>, _>>()?;

    let mut tree = previous.clone();
    let mut previous_ids = HashSet::new();
    if tree.find_by_id(&options.root_container_id).is_none() {
        // Without a container the document root holds the layers
        detach_drawables(&mut tree.root, options, &mut previous_ids);
    }
    ensure_structure(&mut tree, options);

    let mut layer_ids = HashSet::new();
    walk_layers(layers, &mut |layer| {
        layer_ids.insert(layer.id.as_str());
    });

    if let Some(container) = tree.find_by_id_mut(&options.root_container_id) {
        for child in std::mem::take(&mut container.children) {
            let RenderNode::Element(element) = child else {
                continue;
            };
            if is_protected_element(&element, options) {
                container.children.push(element.into());
                continue;
            }
            collect_ids(&element, &mut previous_ids);
            // Protected elements nested in stale content stay in the container
            let mut kept = Vec::new();
            lift_protected(element, options, &mut kept);
            container.children.extend(kept.into_iter().map(RenderNode::Element));
        }
    }
    detach_claimed(&mut tree.root, &layer_ids, options, &mut previous_ids);

    let mut report = ExportReport {
        layers: layer_ids.len(),
        ..Default::default()
    };
    for id in &layer_ids {
        if previous_ids.contains(*id) {
            report.reused += 1;
        } else {
            report.created += 1;
        }
    }

    if let Some(container) = tree.find_by_id_mut(&options.root_container_id) {
        container
            .children
            .extend(elements.into_iter().map(RenderNode::Element));
    }

    info!(
        layers = report.layers,
        created = report.created,
        reused = report.reused,
        "Exported render tree"
    );
    Ok((tree, report))
}

fn check_layers(layers: &[Layer], options: &ReconcileOptions) -> Result<(), ExportError> {
    validate(layers)?;

    let mut collision = None;
    walk_layers(layers, &mut |layer| {
        if collision.is_none() && options.is_protected(&layer.id) {
            collision = Some(layer.id.clone());
        }
    });
    match collision {
        Some(id) => Err(ExportError::ProtectedId(id)),
        None => Ok(()),
    }
}

/// Create the background and root container if the tree lacks them.
fn ensure_structure(tree: &mut RenderTree, options: &ReconcileOptions) {
    if tree.find_by_id(&options.root_container_id).is_none() {
        debug!(id = %options.root_container_id, "Creating root container");
        tree.root
            .children
            .push(RenderNode::Element(options.root_container_element()));
    }
    if tree.find_by_id(&options.background_id).is_none() {
        debug!(id = %options.background_id, "Creating background");
        tree.root
            .children
            .insert(0, RenderNode::Element(options.background_element()));
    }
}

fn is_protected_element(element: &RenderElement, options: &ReconcileOptions) -> bool {
    element.id().is_some_and(|id| options.is_protected(id))
}

fn contains_protected(element: &RenderElement, options: &ReconcileOptions) -> bool {
    options
        .protected_ids()
        .any(|id| element.find_by_id(id).is_some())
}

/// Remove every element import would read as a layer below `element`.
fn detach_drawables(
    element: &mut RenderElement,
    options: &ReconcileOptions,
    previous_ids: &mut HashSet<String>,
) {
    for node in std::mem::take(&mut element.children) {
        let mut child = match node {
            RenderNode::Element(child) => child,
            other => {
                element.children.push(other);
                continue;
            }
        };
        let tag = child.tag.as_str();
        if is_protected_element(&child, options) || DEFINITION_TAGS.contains(&tag) {
            element.children.push(child.into());
        } else if DRAWABLE_TAGS.contains(&tag) {
            collect_ids(&child, previous_ids);
            let mut kept = Vec::new();
            lift_protected(child, options, &mut kept);
            element.children.extend(kept.into_iter().map(RenderNode::Element));
        } else {
            detach_drawables(&mut child, options, previous_ids);
            element.children.push(child.into());
        }
    }
}

/// Drop `element`, keeping its outermost protected descendants.
fn lift_protected(
    element: RenderElement,
    options: &ReconcileOptions,
    kept: &mut Vec<RenderElement>,
) {
    for child in element.children {
        if let RenderNode::Element(child) = child {
            if is_protected_element(&child, options) {
                kept.push(child);
            } else {
                lift_protected(child, options, kept);
            }
        }
    }
}

fn collect_ids(element: &RenderElement, ids: &mut HashSet<String>) {
    if let Some(id) = element.id() {
        ids.insert(id.to_string());
    }
    for child in element.elements() {
        collect_ids(child, ids);
    }
}

/// Remove elements outside the root container whose id a layer now owns.
/// Protected elements and anything holding one are left alone.
fn detach_claimed(
    element: &mut RenderElement,
    layer_ids: &HashSet<&str>,
    options: &ReconcileOptions,
    previous_ids: &mut HashSet<String>,
) {
    element.children.retain_mut(|child| {
        let RenderNode::Element(child) = child else {
            return true;
        };
        if is_protected_element(child, options) {
            return true;
        }

        let claimed = child.id().is_some_and(|id| layer_ids.contains(id));
        if claimed && !contains_protected(child, options) {
            collect_ids(child, previous_ids);
            return false;
        }

        detach_claimed(child, layer_ids, options, previous_ids);
        true
    });
}

struct Exporter {
    serializer: Serializer,
}

impl Exporter {
    fn new(options: &ReconcileOptions) -> Self {
        Self {
            serializer: options.serializer(),
        }
    }

    fn number(&self, value: f64) -> String {
        self.serializer.format_number(value)
    }

    fn layer_element(&self, layer: &Layer) -> Result<RenderElement, ExportError> {
        let kind = ElementKind::for_shape(&layer.shape);
        let mut element = RenderElement::new(kind.tag()).with_attr("id", &layer.id);

        self.write_geometry(layer, &mut element)?;
        self.write_common(layer, kind, &mut element);

        if let Shape::Group { children } = &layer.shape {
            for child in children {
                element.children.push(self.layer_element(child)?.into());
            }
        }
        if let Some(children) = &layer.children {
            for child in children {
                element.children.push(self.layer_element(child)?.into());
            }
        }

        debug!(layer_id = %layer.id, kind = kind.tag(), "Exported layer");
        Ok(element)
    }

    fn write_geometry(&self, layer: &Layer, element: &mut RenderElement) -> Result<(), ExportError> {
        match &layer.shape {
            Shape::Rect {
                x,
                y,
                width,
                height,
                corner_radius,
            } => {
                element.set_attr("x", self.number(*x));
                element.set_attr("y", self.number(*y));
                element.set_attr("width", self.number(*width));
                element.set_attr("height", self.number(*height));
                if *corner_radius != 0.0 {
                    element.set_attr("rx", self.number(*corner_radius));
                }
            }

            Shape::Ellipse {
                cx,
                cy,
                radius_x,
                radius_y,
            } => {
                element.set_attr("cx", self.number(*cx));
                element.set_attr("cy", self.number(*cy));
                element.set_attr("rx", self.number(*radius_x));
                element.set_attr("ry", self.number(*radius_y));
            }

            Shape::Text {
                x,
                y,
                content,
                font_family,
                font_size,
                font_weight,
                font_style,
            } => {
                element.set_attr("x", self.number(*x));
                element.set_attr("y", self.number(*y));
                if let Some(family) = font_family {
                    element.set_attr("font-family", family.as_str());
                }
                if let Some(size) = font_size {
                    element.set_attr("font-size", self.number(*size));
                }
                if let Some(weight) = font_weight {
                    element.set_attr("font-weight", weight.as_str());
                }
                if let Some(style) = font_style {
                    element.set_attr("font-style", style.as_str());
                }
                if !content.is_empty() {
                    element.children.push(RenderNode::text(content.as_str()));
                }
            }

            Shape::Path { nodes } => {
                element.set_attr("d", self.serializer.serialize(nodes));
            }

            Shape::Group { .. } => {}

            Shape::Unknown => {
                return Err(ExportError::UnmappedShape {
                    layer_id: layer.id.clone(),
                    kind: layer.shape.kind_name().to_string(),
                })
            }
        }
        Ok(())
    }

    fn write_common(&self, layer: &Layer, kind: ElementKind, element: &mut RenderElement) {
        element.set_attr("data-name", layer.name.as_str());
        element.set_attr("fill", layer.fill_color.as_str());
        element.set_attr("stroke", layer.stroke_color.as_str());
        element.set_attr("stroke-width", self.number(layer.stroke_width));
        element.set_attr("opacity", self.number(layer.opacity));

        if !layer.visible {
            element.set_attr("display", "none");
        }
        if layer.locked {
            element.set_attr("data-locked", "true");
        }
        if !layer.blend_mode.is_normal() {
            element.set_attr("data-blend-mode", layer.blend_mode.as_str());
        }
        if let Some(mask) = &layer.clip_mask_id {
            element.set_attr("clip-path", format!("url(#{})", mask));
        }

        for (name, value) in &layer.attributes {
            if !is_managed_attribute(kind, name) {
                element.set_attr(name.as_str(), value.as_str());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vectorforge_path::parse;

    fn options() -> ReconcileOptions {
        ReconcileOptions::default()
    }

    #[test]
    fn test_export_into_blank_previous_uses_skeleton() {
        let layers = vec![Layer::new("a", Shape::rect(1.0, 2.0, 3.0, 4.0))];
        let outcome = export_to_render_tree(&layers, "", &options());

        assert!(outcome.is_ok());
        let tree = parse_markup(&outcome.markup).unwrap();
        assert_eq!(tree.count_id("bg"), 1);
        let container = tree.find_by_id("workspace_root").unwrap();
        let rect = container.elements().next().unwrap();
        assert_eq!(rect.tag, "rect");
        assert_eq!(rect.attr("width"), Some("3"));
        assert_eq!(outcome.report, ExportReport { layers: 1, created: 1, reused: 0 });
    }

    #[test]
    fn test_common_attributes() {
        let layer = Layer::new("p", Shape::path(parse("M 0 0 L 10 10 Z")))
            .with_name("Outline")
            .with_visible(false)
            .with_locked(true)
            .with_blend_mode(vectorforge_document::BlendMode::Multiply)
            .with_clip_mask("mask-1")
            .with_attribute("fill-opacity", "0.1")
            .with_attribute("fill", "#ignored");

        let element = Exporter::new(&options()).layer_element(&layer).unwrap();

        assert_eq!(element.attr("d"), Some("M 0 0 L 10 10 Z"));
        assert_eq!(element.attr("data-name"), Some("Outline"));
        assert_eq!(element.attr("fill"), Some("#ffffff"));
        assert_eq!(element.attr("display"), Some("none"));
        assert_eq!(element.attr("data-locked"), Some("true"));
        assert_eq!(element.attr("data-blend-mode"), Some("multiply"));
        assert_eq!(element.attr("clip-path"), Some("url(#mask-1)"));
        assert_eq!(element.attr("fill-opacity"), Some("0.1"));
    }

    #[test]
    fn test_nested_children_recurse() {
        let layer = Layer::new(
            "g",
            Shape::group(vec![Layer::new("m", Shape::ellipse(0.0, 0.0, 1.0, 2.0))]),
        )
        .with_child(Layer::new("n", Shape::text(0.0, 0.0, "label")));

        let element = Exporter::new(&options()).layer_element(&layer).unwrap();
        let ids: Vec<_> = element.elements().filter_map(RenderElement::id).collect();

        assert_eq!(element.tag, "g");
        assert_eq!(ids, vec!["m", "n"]);
        assert_eq!(element.find_by_id("n").unwrap().text_content(), "label");
    }

    #[test]
    fn test_rebuild_replaces_old_children_and_counts_reuse() {
        let previous = parse_markup(
            r#"<svg><rect id="bg"/><g id="workspace_root"><path id="a" d="M 0 0"/><path id="stale"/></g></svg>"#,
        )
        .unwrap();
        let layers = vec![
            Layer::new("a", Shape::path(parse("M 1 1"))),
            Layer::new("b", Shape::path(vec![])),
        ];

        let (tree, report) = export_tree(&layers, &previous, &options()).unwrap();

        assert_eq!(tree.count_id("stale"), 0);
        assert_eq!(tree.find_by_id("a").unwrap().attr("d"), Some("M 1 1"));
        assert_eq!(report, ExportReport { layers: 2, created: 1, reused: 1 });
    }

    #[test]
    fn test_claimed_elements_outside_container_move_in() {
        let previous = parse_markup(r#"<svg><path id="a" d="M 0 0"/><defs/></svg>"#).unwrap();
        let layers = vec![Layer::new("a", Shape::path(vec![]))];

        let (tree, report) = export_tree(&layers, &previous, &options()).unwrap();

        assert_eq!(tree.count_id("a"), 1);
        assert_eq!(report.reused, 1);
        let tags: Vec<_> = tree.root.elements().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, vec!["rect", "defs", "g"]);
    }

    #[test]
    fn test_protected_id_collision() {
        let layers = vec![Layer::new("bg", Shape::rect(0.0, 0.0, 1.0, 1.0))];
        let outcome = export_to_render_tree(&layers, "", &options());

        assert_eq!(outcome.error, Some(ExportError::ProtectedId("bg".into())));
        assert_eq!(outcome.markup, "");
    }
}
