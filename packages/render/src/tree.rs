use serde::{Deserialize, Serialize};

/// A parsed markup document: everything before the root element, then the
/// root element itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderTree {
    /// Declarations, doctype and comments preceding the root, kept verbatim
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prolog: Vec<RenderNode>,
    pub root: RenderElement,
}

impl RenderTree {
    pub fn new(root: RenderElement) -> Self {
        Self {
            prolog: Vec::new(),
            root,
        }
    }

    pub fn find_by_id(&self, id: &str) -> Option<&RenderElement> {
        self.root.find_by_id(id)
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut RenderElement> {
        self.root.find_by_id_mut(id)
    }

    /// Number of elements carrying `id`
    pub fn count_id(&self, id: &str) -> usize {
        self.root.count_id(id)
    }
}

/// Render tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RenderNode {
    Element(RenderElement),

    /// Decoded character data
    Text { content: String },

    /// Comment, CDATA section, doctype or processing instruction, verbatim
    Raw { content: String },
}

impl RenderNode {
    pub fn text(content: impl Into<String>) -> Self {
        RenderNode::Text {
            content: content.into(),
        }
    }

    pub fn raw(content: impl Into<String>) -> Self {
        RenderNode::Raw {
            content: content.into(),
        }
    }

    pub fn as_element(&self) -> Option<&RenderElement> {
        match self {
            RenderNode::Element(element) => Some(element),
            _ => None,
        }
    }
}

impl From<RenderElement> for RenderNode {
    fn from(element: RenderElement) -> Self {
        RenderNode::Element(element)
    }
}

/// Element with attributes in document order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderElement {
    pub tag: String,
    #[serde(default)]
    pub attributes: Vec<(String, String)>,
    #[serde(default)]
    pub children: Vec<RenderNode>,
}

impl RenderElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_child(mut self, child: impl Into<RenderNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, keeping its position if it already exists.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let position = self.attributes.iter().position(|(key, _)| key == name)?;
        Some(self.attributes.remove(position).1)
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn elements(&self) -> impl Iterator<Item = &RenderElement> {
        self.children.iter().filter_map(RenderNode::as_element)
    }

    /// Text held directly by this element, ignoring child elements
    pub fn own_text(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child {
                RenderNode::Text { content } => Some(content.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Concatenated text of all descendants
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, text: &mut String) {
        for child in &self.children {
            match child {
                RenderNode::Text { content } => text.push_str(content),
                RenderNode::Element(element) => element.collect_text(text),
                RenderNode::Raw { .. } => {}
            }
        }
    }

    /// Depth-first search including this element
    pub fn find_by_id(&self, id: &str) -> Option<&RenderElement> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.elements().find_map(|child| child.find_by_id(id))
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut RenderElement> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| match child {
            RenderNode::Element(element) => element.find_by_id_mut(id),
            _ => None,
        })
    }

    pub fn count_id(&self, id: &str) -> usize {
        let own = usize::from(self.id() == Some(id));
        own + self.elements().map(|child| child.count_id(id)).sum::<usize>()
    }
}
