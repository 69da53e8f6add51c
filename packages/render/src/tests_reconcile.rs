//! Export/import guarantees

use crate::error::ExportError;
use crate::parser::parse_markup;
use crate::reconcile::{export_to_render_tree, import_from_render_tree, ReconcileOptions};
use vectorforge_document::{BlendMode, Layer, Shape};
use vectorforge_path::parse;

fn options() -> ReconcileOptions {
    ReconcileOptions::default()
}

fn flat_layers() -> Vec<Layer> {
    vec![
        Layer::new("sky", Shape::rect(0.0, 0.0, 512.0, 256.0))
            .with_name("Sky")
            .with_fill("#3366ff")
            .with_opacity(0.5),
        Layer::new("sun", Shape::ellipse(400.0, 100.0, 40.0, 30.5))
            .with_stroke("#ffcc00", 2.5)
            .with_blend_mode(BlendMode::Screen)
            .with_locked(true),
        Layer::new(
            "ground",
            Shape::Rect {
                x: 0.0,
                y: 256.0,
                width: 512.0,
                height: 256.0,
                corner_radius: 8.0,
            },
        )
        .with_visible(false)
        .with_clip_mask("sky"),
    ]
}

#[test]
fn test_flat_layers_round_trip() {
    let layers = flat_layers();
    let outcome = export_to_render_tree(&layers, "", &options());
    assert!(outcome.is_ok(), "{:?}", outcome.error);

    let imported = import_from_render_tree(&outcome.markup, &options()).unwrap();
    assert_eq!(imported, layers);
}

#[test]
fn test_protected_elements_survive_any_layer_list() {
    let previous = r##"<svg viewBox="0 0 100 100">
  <rect id="bg" width="100%" height="100%" fill="#123456" data-note="keep"/>
  <g id="workspace_root">
    <path id="old" d="M 0 0"/>
  </g>
</svg>"##;

    for layers in [Vec::new(), flat_layers()] {
        let outcome = export_to_render_tree(&layers, previous, &options());
        let tree = parse_markup(&outcome.markup).unwrap();

        assert_eq!(tree.count_id("bg"), 1);
        assert_eq!(tree.count_id("workspace_root"), 1);
        assert_eq!(tree.count_id("old"), 0);
        assert_eq!(
            tree.find_by_id("bg"),
            parse_markup(previous).unwrap().find_by_id("bg")
        );
    }
}

#[test]
fn test_empty_layer_list_from_nothing() {
    let outcome = export_to_render_tree(&[], "   ", &options());
    let tree = parse_markup(&outcome.markup).unwrap();

    assert_eq!(tree.count_id("bg"), 1);
    assert_eq!(tree.count_id("workspace_root"), 1);
    assert_eq!(tree.find_by_id("workspace_root").unwrap().children.len(), 0);
}

#[test]
fn test_missing_structure_is_created() {
    let outcome = export_to_render_tree(&flat_layers(), "<svg><desc>x</desc></svg>", &options());
    let tree = parse_markup(&outcome.markup).unwrap();

    let tags: Vec<_> = tree.root.elements().map(|e| e.tag.as_str()).collect();
    assert_eq!(tags, vec!["rect", "desc", "g"]);
    assert_eq!(tree.find_by_id("workspace_root").unwrap().elements().count(), 3);
}

#[test]
fn test_failed_export_returns_previous_byte_for_byte() {
    let previous = export_to_render_tree(&flat_layers(), "", &options()).markup;

    let mut broken = flat_layers();
    broken.push(Layer::new("mystery", Shape::Unknown));
    let outcome = export_to_render_tree(&broken, &previous, &options());

    assert_eq!(outcome.markup, previous);
    assert_eq!(
        outcome.error,
        Some(ExportError::UnmappedShape {
            layer_id: "mystery".into(),
            kind: "unknown".into(),
        })
    );
}

#[test]
fn test_unmapped_nested_shape_also_contained() {
    let previous = "<svg>\n<!-- hand written -->\n</svg>";
    let layers = vec![Layer::new("g", Shape::group(vec![Layer::new("x", Shape::Unknown)]))];

    let outcome = export_to_render_tree(&layers, previous, &options());
    assert_eq!(outcome.markup, previous);
    assert!(!outcome.is_ok());
}

#[test]
fn test_malformed_previous_is_contained() {
    let previous = "<svg><g id=\"workspace_root\">";
    let outcome = export_to_render_tree(&flat_layers(), previous, &options());

    assert_eq!(outcome.markup, previous);
    assert!(matches!(outcome.error, Some(ExportError::Markup(_))));
}

#[test]
fn test_duplicate_ids_abort_export() {
    let layers = vec![
        Layer::new("a", Shape::path(parse("M 0 0"))),
        Layer::new("b", Shape::path(vec![])).with_child(Layer::new("a", Shape::path(vec![]))),
    ];

    let outcome = export_to_render_tree(&layers, "", &options());
    assert!(matches!(outcome.error, Some(ExportError::Validation(_))));
    assert_eq!(outcome.markup, "");
}

#[test]
fn test_export_is_a_function_of_layers() {
    let a = r#"<svg><rect id="bg"/><g id="workspace_root"><rect id="x"/><circle/></g></svg>"#;
    let b = r#"<svg><rect id="bg"/><g id="workspace_root"><path id="sky" d="M 9 9"/></g></svg>"#;

    let from_a = export_to_render_tree(&flat_layers(), a, &options());
    let from_b = export_to_render_tree(&flat_layers(), b, &options());
    assert_eq!(from_a.markup, from_b.markup);
    assert_eq!(from_a.report.reused, 0);
    assert_eq!(from_b.report.reused, 1);

    let again = export_to_render_tree(&flat_layers(), &from_a.markup, &options());
    assert_eq!(again.markup, from_a.markup);
    assert_eq!(again.report.reused, 3);
}

#[test]
fn test_protected_element_inside_stale_content_survives() {
    let previous =
        r##"<svg><g id="workspace_root"><g id="old"><rect id="bg" fill="#123"/></g></g></svg>"##;

    let outcome = export_to_render_tree(&[], previous, &options());
    assert!(outcome.is_ok());

    let tree = parse_markup(&outcome.markup).unwrap();
    assert_eq!(tree.count_id("bg"), 1);
    assert_eq!(tree.count_id("old"), 0);
    assert_eq!(tree.find_by_id("bg").unwrap().attr("fill"), Some("#123"));
}

#[test]
fn test_container_less_drawables_are_replaced() {
    let previous =
        r#"<svg><defs><clipPath id="c"/></defs><rect width="5" height="5"/><a><circle r="1"/></a></svg>"#;
    let layers = import_from_render_tree(previous, &options()).unwrap();
    assert_eq!(layers.len(), 2);

    let outcome = export_to_render_tree(&layers, previous, &options());
    let tree = parse_markup(&outcome.markup).unwrap();

    let tags: Vec<_> = tree.root.elements().map(|e| e.tag.as_str()).collect();
    assert_eq!(tags, vec!["rect", "defs", "a", "g"]);
    assert_eq!(tree.root.elements().nth(2).unwrap().children.len(), 0);
    assert_eq!(tree.find_by_id("workspace_root").unwrap().elements().count(), 2);
    assert_eq!(import_from_render_tree(&outcome.markup, &options()).unwrap(), layers);
}

#[test]
fn test_text_content_excludes_nested_layers() {
    let layers = vec![Layer::new("t", Shape::text(0.0, 0.0, "a"))
        .with_child(Layer::new("c", Shape::text(0.0, 0.0, "b")))];

    let outcome = export_to_render_tree(&layers, "", &options());
    let imported = import_from_render_tree(&outcome.markup, &options()).unwrap();

    assert_eq!(imported, layers);
}
