//! # Document Handle
//!
//! The layer tree plus its id index and a version counter. The layer list
//! is the single source of truth; the render tree is always derived from it.

use crate::index::{layer_at, LayerIndex, LayerPath};
use crate::layer::{walk_layers, Layer};
use crate::mutations::{Mutation, MutationError};
use crate::validator::{validate, ValidationError};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    layers: Vec<Layer>,
    index: LayerIndex,

    /// Current version number (increments on each successful mutation)
    version: u64,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and wrap a layer tree.
    pub fn from_layers(layers: Vec<Layer>) -> Result<Self, ValidationError> {
        let index = validate(&layers)?;
        Ok(Self {
            layers,
            index,
            version: 0,
        })
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn into_layers(self) -> Vec<Layer> {
        self.layers
    }

    pub fn index(&self) -> &LayerIndex {
        &self.index
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of layers at any depth
    pub fn layer_count(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Layer> {
        layer_at(&self.layers, self.index.get(id)?)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains(id)
    }

    pub fn path_of(&self, id: &str) -> Option<&LayerPath> {
        self.index.get(id)
    }

    /// Id of the layer holding `id`, or None for root layers and unknown ids
    pub fn parent_id(&self, id: &str) -> Option<&str> {
        let (parent, _, _) = self.index.get(id)?.split_last()?;
        layer_at(&self.layers, &parent).map(|layer| layer.id.as_str())
    }

    /// All layers in pre-order
    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        let mut all = Vec::with_capacity(self.index.len());
        walk_layers(&self.layers, &mut |layer| all.push(layer));
        all.into_iter()
    }

    /// Apply a mutation atomically.
    ///
    /// The mutation runs against a copy of the tree; the copy replaces the
    /// current tree only if both the mutation and a full re-validation
    /// succeed. Returns the new version.
    pub fn apply(&mut self, mutation: &Mutation) -> Result<u64, MutationError> {
        let mut layers = self.layers.clone();
        mutation.apply(&mut layers, &self.index)?;
        let index = validate(&layers)?;

        self.layers = layers;
        self.index = index;
        self.version += 1;

        debug!(
            layer_id = mutation.layer_id(),
            version = self.version,
            "Applied mutation"
        );
        Ok(self.version)
    }

    /// Replace the whole tree, e.g. after re-importing markup.
    pub fn replace_layers(&mut self, layers: Vec<Layer>) -> Result<u64, ValidationError> {
        self.index = validate(&layers)?;
        self.layers = layers;
        self.version += 1;
        Ok(self.version)
    }
}
