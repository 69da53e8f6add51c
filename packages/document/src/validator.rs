//! Structural checks on a layer tree
//!
//! A valid tree has non-empty, globally unique layer ids, and every path
//! layer's node list starts with a move and carries unique node ids.

use crate::index::LayerIndex;
use crate::layer::{walk_layers, Layer, Shape};
use std::collections::HashSet;
use thiserror::Error;
use vectorforge_path::{GeometricNode, NodeKind};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Layer id must not be empty")]
    EmptyId,

    #[error("Duplicate layer id: {0}")]
    DuplicateId(String),

    #[error("Path of layer {layer_id} must start with a move, found {found:?}")]
    PathMustStartWithMove { layer_id: String, found: NodeKind },

    #[error("Duplicate node id {node_id} in layer {layer_id}")]
    DuplicateNodeId { layer_id: String, node_id: String },
}

/// Validate a layer tree, returning its id index on success.
pub fn validate(layers: &[Layer]) -> Result<LayerIndex, ValidationError> {
    let index = LayerIndex::build(layers)?;

    let mut result = Ok(());
    walk_layers(layers, &mut |layer| {
        if result.is_err() {
            return;
        }
        if let Shape::Path { nodes } = &layer.shape {
            result = validate_nodes(&layer.id, nodes);
        }
    });
    result?;

    Ok(index)
}

/// Check a single path layer's node list.
pub fn validate_nodes(layer_id: &str, nodes: &[GeometricNode]) -> Result<(), ValidationError> {
    if let Some(first) = nodes.first() {
        if first.kind != NodeKind::Move {
            return Err(ValidationError::PathMustStartWithMove {
                layer_id: layer_id.to_string(),
                found: first.kind,
            });
        }
    }

    let mut seen = HashSet::new();
    for node in nodes {
        if !seen.insert(node.id.as_str()) {
            return Err(ValidationError::DuplicateNodeId {
                layer_id: layer_id.to_string(),
                node_id: node.id.clone(),
            });
        }
    }

    Ok(())
}
