//! Layer and shape schema

use crate::index::ChildList;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use vectorforge_path::GeometricNode;

pub const DEFAULT_FILL: &str = "#ffffff";
pub const DEFAULT_STROKE: &str = "#000000";

/// A visual element of the document
///
/// `id` must be unique across the whole layer tree, including nested
/// `children` and group members: the reconciler correlates layers and render
/// elements by id alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default = "default_fill")]
    pub fill_color: String,
    #[serde(default = "default_stroke")]
    pub stroke_color: String,
    #[serde(default)]
    pub stroke_width: f64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub blend_mode: BlendMode,
    pub shape: Shape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Layer>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip_mask_id: Option<String>,
    /// Render attributes with no dedicated field, passed through untouched
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

fn default_true() -> bool {
    true
}

fn default_fill() -> String {
    DEFAULT_FILL.to_string()
}

fn default_stroke() -> String {
    DEFAULT_STROKE.to_string()
}

fn default_opacity() -> f64 {
    1.0
}

impl Layer {
    pub fn new(id: impl Into<String>, shape: Shape) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            visible: true,
            locked: false,
            fill_color: default_fill(),
            stroke_color: default_stroke(),
            stroke_width: 0.0,
            opacity: 1.0,
            blend_mode: BlendMode::Normal,
            shape,
            children: None,
            clip_mask_id: None,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_fill(mut self, color: impl Into<String>) -> Self {
        self.fill_color = color.into();
        self
    }

    pub fn with_stroke(mut self, color: impl Into<String>, width: f64) -> Self {
        self.stroke_color = color.into();
        self.stroke_width = width;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_blend_mode(mut self, blend_mode: BlendMode) -> Self {
        self.blend_mode = blend_mode;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    pub fn with_clip_mask(mut self, mask_id: impl Into<String>) -> Self {
        self.clip_mask_id = Some(mask_id.into());
        self
    }

    pub fn with_child(mut self, child: Layer) -> Self {
        self.children.get_or_insert_with(Vec::new).push(child);
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Child list of the given kind, if this layer has one
    pub fn child_list(&self, list: ChildList) -> Option<&Vec<Layer>> {
        match list {
            ChildList::Group => match &self.shape {
                Shape::Group { children } => Some(children),
                _ => None,
            },
            ChildList::Nested => self.children.as_ref(),
        }
    }

    pub fn child_list_mut(&mut self, list: ChildList) -> Option<&mut Vec<Layer>> {
        match list {
            ChildList::Group => match &mut self.shape {
                Shape::Group { children } => Some(children),
                _ => None,
            },
            ChildList::Nested => self.children.as_mut(),
        }
    }

    /// Like [`Self::child_list_mut`], creating an empty nested list on demand.
    /// Group lists only exist on group shapes.
    pub fn ensure_child_list_mut(&mut self, list: ChildList) -> Option<&mut Vec<Layer>> {
        match list {
            ChildList::Nested => Some(self.children.get_or_insert_with(Vec::new)),
            ChildList::Group => self.child_list_mut(ChildList::Group),
        }
    }

    /// Where new children go by default: group members for groups, nested
    /// children otherwise.
    pub fn default_child_list(&self) -> ChildList {
        match self.shape {
            Shape::Group { .. } => ChildList::Group,
            _ => ChildList::Nested,
        }
    }

    /// Group members first, then nested children
    pub fn child_lists(&self) -> impl Iterator<Item = (ChildList, &Vec<Layer>)> {
        [ChildList::Group, ChildList::Nested]
            .into_iter()
            .filter_map(move |list| self.child_list(list).map(|children| (list, children)))
    }

    /// Pre-order visit of this layer and every descendant
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Layer)) {
        visit(self);
        for (_, children) in self.child_lists() {
            for child in children {
                child.walk(visit);
            }
        }
    }
}

/// Pre-order visit of every layer in the tree
pub fn walk_layers<'a>(layers: &'a [Layer], visit: &mut impl FnMut(&'a Layer)) {
    for layer in layers {
        layer.walk(visit);
    }
}

/// Geometry of a layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    #[serde(rename_all = "camelCase")]
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        #[serde(default)]
        corner_radius: f64,
    },

    #[serde(rename_all = "camelCase")]
    Ellipse {
        cx: f64,
        cy: f64,
        radius_x: f64,
        radius_y: f64,
    },

    #[serde(rename_all = "camelCase")]
    Text {
        x: f64,
        y: f64,
        #[serde(default)]
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font_family: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font_size: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font_weight: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font_style: Option<String>,
    },

    Path {
        #[serde(default)]
        nodes: Vec<GeometricNode>,
    },

    Group {
        #[serde(default)]
        children: Vec<Layer>,
    },

    /// Any kind this version does not know. Kept so documents from newer
    /// producers still load; the reconciler refuses to render it.
    #[serde(other)]
    Unknown,
}

impl Shape {
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Shape::Rect {
            x,
            y,
            width,
            height,
            corner_radius: 0.0,
        }
    }

    pub fn ellipse(cx: f64, cy: f64, radius_x: f64, radius_y: f64) -> Self {
        Shape::Ellipse {
            cx,
            cy,
            radius_x,
            radius_y,
        }
    }

    pub fn text(x: f64, y: f64, content: impl Into<String>) -> Self {
        Shape::Text {
            x,
            y,
            content: content.into(),
            font_family: None,
            font_size: None,
            font_weight: None,
            font_style: None,
        }
    }

    pub fn path(nodes: Vec<GeometricNode>) -> Self {
        Shape::Path { nodes }
    }

    pub fn group(children: Vec<Layer>) -> Self {
        Shape::Group { children }
    }

    /// Tag used in serialized documents
    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Rect { .. } => "rect",
            Shape::Ellipse { .. } => "ellipse",
            Shape::Text { .. } => "text",
            Shape::Path { .. } => "path",
            Shape::Group { .. } => "group",
            Shape::Unknown => "unknown",
        }
    }
}

/// Compositing mode of a layer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
    /// Unrecognized mode, carried verbatim
    Other(String),
}

impl BlendMode {
    pub fn as_str(&self) -> &str {
        match self {
            BlendMode::Normal => "normal",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::Overlay => "overlay",
            BlendMode::Darken => "darken",
            BlendMode::Lighten => "lighten",
            BlendMode::ColorDodge => "color-dodge",
            BlendMode::ColorBurn => "color-burn",
            BlendMode::HardLight => "hard-light",
            BlendMode::SoftLight => "soft-light",
            BlendMode::Difference => "difference",
            BlendMode::Exclusion => "exclusion",
            BlendMode::Hue => "hue",
            BlendMode::Saturation => "saturation",
            BlendMode::Color => "color",
            BlendMode::Luminosity => "luminosity",
            BlendMode::Other(value) => value,
        }
    }

    pub fn is_normal(&self) -> bool {
        *self == BlendMode::Normal
    }
}

impl From<&str> for BlendMode {
    fn from(value: &str) -> Self {
        match value.trim() {
            "" | "normal" => BlendMode::Normal,
            "multiply" => BlendMode::Multiply,
            "screen" => BlendMode::Screen,
            "overlay" => BlendMode::Overlay,
            "darken" => BlendMode::Darken,
            "lighten" => BlendMode::Lighten,
            "color-dodge" => BlendMode::ColorDodge,
            "color-burn" => BlendMode::ColorBurn,
            "hard-light" => BlendMode::HardLight,
            "soft-light" => BlendMode::SoftLight,
            "difference" => BlendMode::Difference,
            "exclusion" => BlendMode::Exclusion,
            "hue" => BlendMode::Hue,
            "saturation" => BlendMode::Saturation,
            "color" => BlendMode::Color,
            "luminosity" => BlendMode::Luminosity,
            other => BlendMode::Other(other.to_string()),
        }
    }
}

impl From<String> for BlendMode {
    fn from(value: String) -> Self {
        BlendMode::from(value.as_str())
    }
}

impl From<BlendMode> for String {
    fn from(mode: BlendMode) -> Self {
        mode.as_str().to_string()
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
