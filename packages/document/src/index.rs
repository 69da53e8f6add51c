use crate::layer::Layer;
use crate::validator::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which child list of a layer a step descends into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChildList {
    /// Members of a group shape
    Group,
    /// The layer's own `children`
    Nested,
}

/// Position of a layer in the tree: a root index followed by child steps
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LayerPath {
    pub root: usize,
    pub steps: Vec<(ChildList, usize)>,
}

impl LayerPath {
    pub fn root(index: usize) -> Self {
        Self {
            root: index,
            steps: Vec::new(),
        }
    }

    pub fn child(&self, list: ChildList, index: usize) -> Self {
        let mut steps = self.steps.clone();
        steps.push((list, index));
        Self {
            root: self.root,
            steps,
        }
    }

    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    /// Parent path and the step taken from it, or None for a root layer
    pub fn split_last(&self) -> Option<(LayerPath, ChildList, usize)> {
        let (&(list, index), rest) = self.steps.split_last()?;
        Some((
            LayerPath {
                root: self.root,
                steps: rest.to_vec(),
            },
            list,
            index,
        ))
    }

    /// Position within the containing list
    pub fn position(&self) -> usize {
        self.steps.last().map(|(_, index)| *index).unwrap_or(self.root)
    }

    /// True if `self` is `other` or lies underneath it
    pub fn is_within(&self, other: &LayerPath) -> bool {
        self.root == other.root && self.steps.starts_with(&other.steps)
    }
}

/// Lookup from layer id to position, covering every layer in the tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerIndex {
    paths: HashMap<String, LayerPath>,
}

impl LayerIndex {
    /// Index a layer tree, rejecting empty and duplicate ids.
    pub fn build(layers: &[Layer]) -> Result<Self, ValidationError> {
        let mut index = Self::default();
        for (position, layer) in layers.iter().enumerate() {
            index.insert(layer, LayerPath::root(position))?;
        }
        Ok(index)
    }

    fn insert(&mut self, layer: &Layer, path: LayerPath) -> Result<(), ValidationError> {
        if layer.id.is_empty() {
            return Err(ValidationError::EmptyId);
        }
        if self.paths.contains_key(&layer.id) {
            return Err(ValidationError::DuplicateId(layer.id.clone()));
        }

        self.paths.insert(layer.id.clone(), path.clone());

        for (list, children) in layer.child_lists() {
            for (position, child) in children.iter().enumerate() {
                self.insert(child, path.child(list, position))?;
            }
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&LayerPath> {
        self.paths.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.paths.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.paths.keys().map(String::as_str)
    }
}

/// Resolve a path to the layer it names.
pub fn layer_at<'a>(layers: &'a [Layer], path: &LayerPath) -> Option<&'a Layer> {
    let mut layer = layers.get(path.root)?;
    for &(list, index) in &path.steps {
        layer = layer.child_list(list)?.get(index)?;
    }
    Some(layer)
}

pub fn layer_at_mut<'a>(layers: &'a mut [Layer], path: &LayerPath) -> Option<&'a mut Layer> {
    let mut layer = layers.get_mut(path.root)?;
    for &(list, index) in &path.steps {
        layer = layer.child_list_mut(list)?.get_mut(index)?;
    }
    Some(layer)
}

/// Linear search for a layer's current position
pub fn find_path(layers: &[Layer], id: &str) -> Option<LayerPath> {
    fn search(layer: &Layer, id: &str, path: LayerPath) -> Option<LayerPath> {
        if layer.id == id {
            return Some(path);
        }
        for (list, children) in layer.child_lists() {
            for (position, child) in children.iter().enumerate() {
                if let Some(found) = search(child, id, path.child(list, position)) {
                    return Some(found);
                }
            }
        }
        None
    }

    layers
        .iter()
        .enumerate()
        .find_map(|(position, layer)| search(layer, id, LayerPath::root(position)))
}
