use crate::tree::{RenderElement, RenderTree};
use serde::{Deserialize, Serialize};
use vectorforge_path::{ParseOptions, Serializer};

pub const DEFAULT_ROOT_CONTAINER_ID: &str = "workspace_root";
pub const DEFAULT_BACKGROUND_ID: &str = "bg";
pub const DEFAULT_BACKGROUND_FILL: &str = "#0a0b0e";
pub const DEFAULT_VIEW_BOX: &str = "0 0 512 512";
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Options shared by export and import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReconcileOptions {
    /// Element whose children mirror the layer list
    pub root_container_id: String,
    pub background_id: String,
    /// Further ids that survive every rebuild
    pub extra_protected_ids: Vec<String>,
    /// Interpreter switches used when importing path data
    pub parse_options: ParseOptions,
    /// Decimal places for written path data and coordinates
    pub precision: Option<usize>,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            root_container_id: DEFAULT_ROOT_CONTAINER_ID.to_string(),
            background_id: DEFAULT_BACKGROUND_ID.to_string(),
            extra_protected_ids: Vec::new(),
            parse_options: ParseOptions::default(),
            precision: None,
        }
    }
}

impl ReconcileOptions {
    pub fn protected_ids(&self) -> impl Iterator<Item = &str> {
        [self.background_id.as_str(), self.root_container_id.as_str()]
            .into_iter()
            .chain(self.extra_protected_ids.iter().map(String::as_str))
    }

    pub fn is_protected(&self, id: &str) -> bool {
        self.protected_ids().any(|protected| protected == id)
    }

    pub fn serializer(&self) -> Serializer {
        match self.precision {
            Some(precision) => Serializer::with_precision(precision),
            None => Serializer::new(),
        }
    }

    pub fn format_number(&self, value: f64) -> String {
        self.serializer().format_number(value)
    }

    pub fn background_element(&self) -> RenderElement {
        RenderElement::new("rect")
            .with_attr("id", self.background_id.as_str())
            .with_attr("width", "100%")
            .with_attr("height", "100%")
            .with_attr("fill", DEFAULT_BACKGROUND_FILL)
    }

    pub fn root_container_element(&self) -> RenderElement {
        RenderElement::new("g").with_attr("id", self.root_container_id.as_str())
    }

    /// The tree a fresh document starts from: background plus empty container
    pub fn default_tree(&self) -> RenderTree {
        RenderTree::new(
            RenderElement::new("svg")
                .with_attr("viewBox", DEFAULT_VIEW_BOX)
                .with_attr("xmlns", SVG_NAMESPACE)
                .with_child(self.background_element())
                .with_child(self.root_container_element()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_ids() {
        let options = ReconcileOptions {
            extra_protected_ids: vec!["grid".into()],
            ..Default::default()
        };

        assert!(options.is_protected("bg"));
        assert!(options.is_protected("workspace_root"));
        assert!(options.is_protected("grid"));
        assert!(!options.is_protected("layer-1"));
    }

    #[test]
    fn test_default_tree_has_protected_elements() {
        let tree = ReconcileOptions::default().default_tree();

        assert_eq!(tree.count_id("bg"), 1);
        assert_eq!(tree.count_id("workspace_root"), 1);
        assert_eq!(tree.root.attr("viewBox"), Some("0 0 512 512"));
    }

    #[test]
    fn test_options_from_partial_json() {
        let options: ReconcileOptions =
            serde_json::from_str(r#"{ "rootContainerId": "stage", "precision": 2 }"#).unwrap();

        assert_eq!(options.root_container_id, "stage");
        assert_eq!(options.background_id, "bg");
        assert_eq!(options.format_number(1.0 / 3.0), "0.33");
    }
}
