use vectorforge_document::Shape;

/// Concrete render element a layer is written as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Rect,
    Ellipse,
    Text,
    Path,
    Group,
}

impl ElementKind {
    /// Element kind for a shape. Unknown kinds land on `Path` on purpose; they
    /// still have no geometry mapping and fail when written.
    pub fn for_shape(shape: &Shape) -> Self {
        match shape {
            Shape::Rect { .. } => ElementKind::Rect,
            Shape::Ellipse { .. } => ElementKind::Ellipse,
            Shape::Text { .. } => ElementKind::Text,
            Shape::Path { .. } => ElementKind::Path,
            Shape::Group { .. } => ElementKind::Group,
            Shape::Unknown => ElementKind::Path,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            ElementKind::Rect => "rect",
            ElementKind::Ellipse => "ellipse",
            ElementKind::Text => "text",
            ElementKind::Path => "path",
            ElementKind::Group => "g",
        }
    }

    /// Kind written for `tag`, if it is one the exporter produces
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "rect" => Some(ElementKind::Rect),
            "ellipse" => Some(ElementKind::Ellipse),
            "text" => Some(ElementKind::Text),
            "path" => Some(ElementKind::Path),
            "g" => Some(ElementKind::Group),
            _ => None,
        }
    }

    /// Geometry attributes owned by this kind
    pub fn geometry_attributes(self) -> &'static [&'static str] {
        match self {
            ElementKind::Rect => &["x", "y", "width", "height", "rx"],
            ElementKind::Ellipse => &["cx", "cy", "rx", "ry"],
            ElementKind::Text => &[
                "x",
                "y",
                "font-family",
                "font-size",
                "font-weight",
                "font-style",
            ],
            ElementKind::Path => &["d"],
            ElementKind::Group => &[],
        }
    }
}

/// Attributes every exported element may carry
pub const COMMON_ATTRIBUTES: &[&str] = &[
    "id",
    "data-name",
    "fill",
    "stroke",
    "stroke-width",
    "opacity",
    "display",
    "data-locked",
    "data-blend-mode",
    "clip-path",
];

/// Elements holding definitions rather than drawables; import skips them
/// Tags import turns into layers
pub const DRAWABLE_TAGS: &[&str] = &[
    "rect", "ellipse", "circle", "text", "path", "line", "polyline", "polygon", "g",
];

pub const DEFINITION_TAGS: &[&str] = &[
    "defs",
    "clipPath",
    "mask",
    "style",
    "script",
    "title",
    "desc",
    "metadata",
    "linearGradient",
    "radialGradient",
    "pattern",
    "symbol",
    "marker",
    "filter",
];

/// True if the exporter writes `name` itself for this kind
pub fn is_managed_attribute(kind: ElementKind, name: &str) -> bool {
    COMMON_ATTRIBUTES.contains(&name) || kind.geometry_attributes().contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mapping_is_closed() {
        assert_eq!(ElementKind::for_shape(&Shape::rect(0.0, 0.0, 1.0, 1.0)), ElementKind::Rect);
        assert_eq!(ElementKind::for_shape(&Shape::group(vec![])).tag(), "g");
        assert_eq!(ElementKind::for_shape(&Shape::Unknown), ElementKind::Path);
    }

    #[test]
    fn test_tags_round_trip() {
        for kind in [
            ElementKind::Rect,
            ElementKind::Ellipse,
            ElementKind::Text,
            ElementKind::Path,
            ElementKind::Group,
        ] {
            assert_eq!(ElementKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(ElementKind::from_tag("circle"), None);
    }

    #[test]
    fn test_managed_attributes() {
        assert!(is_managed_attribute(ElementKind::Path, "d"));
        assert!(is_managed_attribute(ElementKind::Rect, "opacity"));
        assert!(!is_managed_attribute(ElementKind::Path, "fill-opacity"));
        assert!(!is_managed_attribute(ElementKind::Group, "x"));
    }
}
