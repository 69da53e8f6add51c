//! # Layer Mutations
//!
//! Semantic edits of a layer tree. Every mutation validates against the
//! current tree before touching it; [`crate::Document::apply`] additionally
//! runs on a copy and only swaps the result in when the whole tree still
//! validates, so a failed mutation never leaves partial edits behind.
//!
//! ### Move
//! - Relocates a layer (with its descendants) under a new parent, or to the
//!   root list when no parent is given
//! - Fails if the new parent is the layer itself or one of its descendants
//!
//! ### Remove
//! - Removes the layer and all descendants

use crate::index::{find_path, layer_at, layer_at_mut, LayerIndex, LayerPath};
use crate::layer::{BlendMode, Layer, Shape};
use crate::validator::ValidationError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vectorforge_path::{parse_with_options, ParseOptions};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Insert a new layer under `parent_id` (or at the root) at `index`
    InsertLayer {
        parent_id: Option<String>,
        index: usize,
        layer: Layer,
    },

    RemoveLayer {
        layer_id: String,
    },

    /// Reparent a layer. `index` is read after the layer has been detached.
    MoveLayer {
        layer_id: String,
        new_parent_id: Option<String>,
        index: usize,
    },

    /// Change a layer's position within its current list
    ReorderLayer {
        layer_id: String,
        index: usize,
    },

    SetVisibility {
        layer_id: String,
        visible: bool,
    },

    SetLocked {
        layer_id: String,
        locked: bool,
    },

    RenameLayer {
        layer_id: String,
        name: String,
    },

    /// Partial style update, absent fields keep their value
    SetStyle {
        layer_id: String,
        style: StylePatch,
    },

    SetShape {
        layer_id: String,
        shape: Shape,
    },

    /// Replace a path layer's nodes by interpreting `path_data`
    SetPathData {
        layer_id: String,
        path_data: String,
        #[serde(default)]
        options: ParseOptions,
    },

    SetClipMask {
        layer_id: String,
        clip_mask_id: Option<String>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<BlendMode>,
}

impl StylePatch {
    fn apply_to(&self, layer: &mut Layer) {
        if let Some(fill) = &self.fill_color {
            layer.fill_color = fill.clone();
        }
        if let Some(stroke) = &self.stroke_color {
            layer.stroke_color = stroke.clone();
        }
        if let Some(width) = self.stroke_width {
            layer.stroke_width = width;
        }
        if let Some(opacity) = self.opacity {
            layer.opacity = opacity;
        }
        if let Some(mode) = &self.blend_mode {
            layer.blend_mode = mode.clone();
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Layer not found: {0}")]
    LayerNotFound(String),

    #[error("Parent not found: {0}")]
    ParentNotFound(String),

    #[error("Would create cycle")]
    CycleDetected,

    #[error("Layer id already in use: {0}")]
    DuplicateId(String),

    #[error("Index {index} out of bounds for list of {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Layer is not a path: {0}")]
    NotAPath(String),

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
}

impl Mutation {
    /// Id of the layer the mutation edits (or inserts)
    pub fn layer_id(&self) -> &str {
        match self {
            Mutation::InsertLayer { layer, .. } => &layer.id,
            Mutation::RemoveLayer { layer_id }
            | Mutation::MoveLayer { layer_id, .. }
            | Mutation::ReorderLayer { layer_id, .. }
            | Mutation::SetVisibility { layer_id, .. }
            | Mutation::SetLocked { layer_id, .. }
            | Mutation::RenameLayer { layer_id, .. }
            | Mutation::SetStyle { layer_id, .. }
            | Mutation::SetShape { layer_id, .. }
            | Mutation::SetPathData { layer_id, .. }
            | Mutation::SetClipMask { layer_id, .. } => layer_id,
        }
    }

    /// Apply to a layer tree with validation. `index` must describe `layers`.
    pub fn apply(&self, layers: &mut Vec<Layer>, index: &LayerIndex) -> Result<(), MutationError> {
        self.validate(layers, index)?;

        match self {
            Mutation::InsertLayer {
                parent_id,
                index: position,
                layer,
            } => Self::apply_insert(layers, parent_id.as_deref(), *position, layer.clone()),

            Mutation::RemoveLayer { layer_id } => {
                let path = Self::path_of(index, layer_id)?;
                Self::detach(layers, path).map(|_| ())
            }

            Mutation::MoveLayer {
                layer_id,
                new_parent_id,
                index: position,
            } => {
                let path = Self::path_of(index, layer_id)?;
                let layer = Self::detach(layers, path)?;
                Self::apply_insert(layers, new_parent_id.as_deref(), *position, layer)
            }

            Mutation::ReorderLayer {
                layer_id,
                index: position,
            } => {
                let path = Self::path_of(index, layer_id)?;
                let list = Self::containing_list_mut(layers, path)?;
                let layer = list.remove(path.position());
                list.insert(*position, layer);
                Ok(())
            }

            Mutation::SetVisibility { layer_id, visible } => {
                Self::layer_mut(layers, index, layer_id)?.visible = *visible;
                Ok(())
            }

            Mutation::SetLocked { layer_id, locked } => {
                Self::layer_mut(layers, index, layer_id)?.locked = *locked;
                Ok(())
            }

            Mutation::RenameLayer { layer_id, name } => {
                Self::layer_mut(layers, index, layer_id)?.name = name.clone();
                Ok(())
            }

            Mutation::SetStyle { layer_id, style } => {
                style.apply_to(Self::layer_mut(layers, index, layer_id)?);
                Ok(())
            }

            Mutation::SetShape { layer_id, shape } => {
                Self::layer_mut(layers, index, layer_id)?.shape = shape.clone();
                Ok(())
            }

            Mutation::SetPathData {
                layer_id,
                path_data,
                options,
            } => {
                let nodes = parse_with_options(path_data, *options);
                Self::layer_mut(layers, index, layer_id)?.shape = Shape::Path { nodes };
                Ok(())
            }

            Mutation::SetClipMask {
                layer_id,
                clip_mask_id,
            } => {
                Self::layer_mut(layers, index, layer_id)?.clip_mask_id = clip_mask_id.clone();
                Ok(())
            }
        }
    }

    /// Check that the mutation can apply without touching the tree.
    pub fn validate(&self, layers: &[Layer], index: &LayerIndex) -> Result<(), MutationError> {
        match self {
            Mutation::InsertLayer {
                parent_id,
                index: position,
                layer,
            } => {
                let incoming = LayerIndex::build(std::slice::from_ref(layer))?;
                if let Some(taken) = incoming.ids().find(|id| index.contains(id)) {
                    return Err(MutationError::DuplicateId(taken.to_string()));
                }
                let len = Self::target_len(layers, index, parent_id.as_deref())?;
                Self::check_position(*position, len)
            }

            Mutation::MoveLayer {
                layer_id,
                new_parent_id,
                index: position,
            } => {
                let path = Self::path_of(index, layer_id)?;
                let mut len = Self::target_len(layers, index, new_parent_id.as_deref())?;

                if let Some(parent_id) = new_parent_id {
                    let parent_path = Self::parent_path_of(index, parent_id)?;
                    if parent_path.is_within(path) {
                        return Err(MutationError::CycleDetected);
                    }
                }
                if Self::same_list(layers, path, index, new_parent_id.as_deref()) {
                    len -= 1;
                }
                Self::check_position(*position, len)
            }

            Mutation::ReorderLayer {
                layer_id,
                index: position,
            } => {
                let path = Self::path_of(index, layer_id)?;
                let len = Self::containing_len(layers, path)?;
                Self::check_position(*position, len.saturating_sub(1))
            }

            Mutation::SetPathData { layer_id, .. } => {
                let path = Self::path_of(index, layer_id)?;
                match layer_at(layers, path).map(|layer| &layer.shape) {
                    Some(Shape::Path { .. }) => Ok(()),
                    Some(_) => Err(MutationError::NotAPath(layer_id.clone())),
                    None => Err(MutationError::LayerNotFound(layer_id.clone())),
                }
            }

            Mutation::SetClipMask {
                layer_id,
                clip_mask_id,
            } => {
                Self::path_of(index, layer_id)?;
                match clip_mask_id {
                    Some(mask) if mask.is_empty() => Err(MutationError::InvalidStructure(
                        "Clip mask id must not be empty".to_string(),
                    )),
                    _ => Ok(()),
                }
            }

            Mutation::RemoveLayer { layer_id }
            | Mutation::SetVisibility { layer_id, .. }
            | Mutation::SetLocked { layer_id, .. }
            | Mutation::RenameLayer { layer_id, .. }
            | Mutation::SetStyle { layer_id, .. }
            | Mutation::SetShape { layer_id, .. } => Self::path_of(index, layer_id).map(|_| ()),
        }
    }

    // Helper methods

    fn path_of<'a>(index: &'a LayerIndex, layer_id: &str) -> Result<&'a LayerPath, MutationError> {
        index
            .get(layer_id)
            .ok_or_else(|| MutationError::LayerNotFound(layer_id.to_string()))
    }

    fn parent_path_of<'a>(
        index: &'a LayerIndex,
        parent_id: &str,
    ) -> Result<&'a LayerPath, MutationError> {
        index
            .get(parent_id)
            .ok_or_else(|| MutationError::ParentNotFound(parent_id.to_string()))
    }

    fn layer_mut<'a>(
        layers: &'a mut [Layer],
        index: &LayerIndex,
        layer_id: &str,
    ) -> Result<&'a mut Layer, MutationError> {
        let path = Self::path_of(index, layer_id)?;
        layer_at_mut(layers, path).ok_or_else(|| MutationError::LayerNotFound(layer_id.to_string()))
    }

    fn check_position(position: usize, len: usize) -> Result<(), MutationError> {
        if position > len {
            return Err(MutationError::IndexOutOfBounds {
                index: position,
                len,
            });
        }
        Ok(())
    }

    /// Length of the list an insert under `parent_id` would land in
    fn target_len(
        layers: &[Layer],
        index: &LayerIndex,
        parent_id: Option<&str>,
    ) -> Result<usize, MutationError> {
        let Some(parent_id) = parent_id else {
            return Ok(layers.len());
        };
        let path = Self::parent_path_of(index, parent_id)?;
        let parent = layer_at(layers, path)
            .ok_or_else(|| MutationError::ParentNotFound(parent_id.to_string()))?;
        Ok(parent
            .child_list(parent.default_child_list())
            .map(Vec::len)
            .unwrap_or(0))
    }

    fn containing_len(layers: &[Layer], path: &LayerPath) -> Result<usize, MutationError> {
        match path.split_last() {
            None => Ok(layers.len()),
            Some((parent, list, _)) => layer_at(layers, &parent)
                .and_then(|layer| layer.child_list(list))
                .map(Vec::len)
                .ok_or_else(|| MutationError::InvalidStructure("Dangling layer path".to_string())),
        }
    }

    /// True if detaching the layer at `path` shortens the list an insert under
    /// `parent_id` targets
    fn same_list(
        layers: &[Layer],
        path: &LayerPath,
        index: &LayerIndex,
        parent_id: Option<&str>,
    ) -> bool {
        match (path.split_last(), parent_id) {
            (None, None) => true,
            (Some((parent_path, list, _)), Some(parent_id)) => {
                index.get(parent_id) == Some(&parent_path)
                    && layer_at(layers, &parent_path)
                        .map(|parent| parent.default_child_list() == list)
                        .unwrap_or(false)
            }
            _ => false,
        }
    }

    fn containing_list_mut<'a>(
        layers: &'a mut Vec<Layer>,
        path: &LayerPath,
    ) -> Result<&'a mut Vec<Layer>, MutationError> {
        match path.split_last() {
            None => Ok(layers),
            Some((parent, list, _)) => layer_at_mut(layers, &parent)
                .and_then(|layer| layer.child_list_mut(list))
                .ok_or_else(|| MutationError::InvalidStructure("Dangling layer path".to_string())),
        }
    }

    fn detach(layers: &mut Vec<Layer>, path: &LayerPath) -> Result<Layer, MutationError> {
        let list = Self::containing_list_mut(layers, path)?;
        let position = path.position();
        if position >= list.len() {
            return Err(MutationError::InvalidStructure("Dangling layer path".to_string()));
        }
        Ok(list.remove(position))
    }

    /// Insert into the parent's default child list. Positions shift after a
    /// detach, so the parent is looked up again by id.
    fn apply_insert(
        layers: &mut Vec<Layer>,
        parent_id: Option<&str>,
        position: usize,
        layer: Layer,
    ) -> Result<(), MutationError> {
        let list = match parent_id {
            None => layers,
            Some(parent_id) => {
                let path = find_path(layers, parent_id)
                    .ok_or_else(|| MutationError::ParentNotFound(parent_id.to_string()))?;
                let parent = layer_at_mut(layers, &path)
                    .ok_or_else(|| MutationError::ParentNotFound(parent_id.to_string()))?;
                let list = parent.default_child_list();
                parent.ensure_child_list_mut(list).ok_or_else(|| {
                    MutationError::InvalidStructure(format!("{parent_id} cannot hold {list:?} children"))
                })?
            }
        };

        if position > list.len() {
            return Err(MutationError::IndexOutOfBounds {
                index: position,
                len: list.len(),
            });
        }
        list.insert(position, layer);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::ChildList;

    fn layers() -> Vec<Layer> {
        vec![
            Layer::new("a", Shape::rect(0.0, 0.0, 10.0, 10.0)),
            Layer::new("b", Shape::ellipse(5.0, 5.0, 2.0, 2.0)),
            Layer::new("g", Shape::group(vec![Layer::new("g1", Shape::path(vec![]))])),
        ]
    }

    fn apply(layers: &mut Vec<Layer>, mutation: Mutation) -> Result<(), MutationError> {
        let index = LayerIndex::build(layers).unwrap();
        mutation.apply(layers, &index)
    }

    fn root_ids(layers: &[Layer]) -> Vec<&str> {
        layers.iter().map(|l| l.id.as_str()).collect()
    }

    #[test]
    fn test_insert_root_layer() {
        let mut layers = layers();
        apply(
            &mut layers,
            Mutation::InsertLayer {
                parent_id: None,
                index: 1,
                layer: Layer::new("c", Shape::path(vec![])),
            },
        )
        .unwrap();

        assert_eq!(root_ids(&layers), vec!["a", "c", "b", "g"]);
    }

    #[test]
    fn test_insert_rejects_taken_id() {
        let mut layers = layers();
        let result = apply(
            &mut layers,
            Mutation::InsertLayer {
                parent_id: None,
                index: 0,
                layer: Layer::new("g1", Shape::path(vec![])),
            },
        );

        assert_eq!(result, Err(MutationError::DuplicateId("g1".into())));
    }

    #[test]
    fn test_insert_into_non_group_nests() {
        let mut layers = layers();
        apply(
            &mut layers,
            Mutation::InsertLayer {
                parent_id: Some("a".into()),
                index: 0,
                layer: Layer::new("child", Shape::path(vec![])),
            },
        )
        .unwrap();

        assert_eq!(layers[0].children.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_move_into_group() {
        let mut layers = layers();
        apply(
            &mut layers,
            Mutation::MoveLayer {
                layer_id: "a".into(),
                new_parent_id: Some("g".into()),
                index: 1,
            },
        )
        .unwrap();

        assert_eq!(root_ids(&layers), vec!["b", "g"]);
        let members = layers[1].child_list(ChildList::Group).unwrap();
        assert_eq!(root_ids(members), vec!["g1", "a"]);
    }

    #[test]
    fn test_move_into_own_descendant_is_cycle() {
        let mut layers = layers();
        let result = apply(
            &mut layers,
            Mutation::MoveLayer {
                layer_id: "g".into(),
                new_parent_id: Some("g1".into()),
                index: 0,
            },
        );
        assert_eq!(result, Err(MutationError::CycleDetected));

        let result = apply(
            &mut layers,
            Mutation::MoveLayer {
                layer_id: "g".into(),
                new_parent_id: Some("g".into()),
                index: 0,
            },
        );
        assert_eq!(result, Err(MutationError::CycleDetected));
    }

    #[test]
    fn test_move_within_root_list() {
        let mut layers = layers();
        apply(
            &mut layers,
            Mutation::MoveLayer {
                layer_id: "a".into(),
                new_parent_id: None,
                index: 2,
            },
        )
        .unwrap();

        assert_eq!(root_ids(&layers), vec!["b", "g", "a"]);
    }

    #[test]
    fn test_reorder() {
        let mut layers = layers();
        apply(
            &mut layers,
            Mutation::ReorderLayer {
                layer_id: "g".into(),
                index: 0,
            },
        )
        .unwrap();
        assert_eq!(root_ids(&layers), vec!["g", "a", "b"]);

        let result = apply(
            &mut layers,
            Mutation::ReorderLayer {
                layer_id: "g".into(),
                index: 3,
            },
        );
        assert_eq!(result, Err(MutationError::IndexOutOfBounds { index: 3, len: 2 }));
    }

    #[test]
    fn test_remove_nested() {
        let mut layers = layers();
        apply(&mut layers, Mutation::RemoveLayer { layer_id: "g1".into() }).unwrap();

        assert_eq!(layers[2].shape, Shape::group(vec![]));
    }

    #[test]
    fn test_style_patch_keeps_absent_fields() {
        let mut layers = layers();
        apply(
            &mut layers,
            Mutation::SetStyle {
                layer_id: "b".into(),
                style: StylePatch {
                    fill_color: Some("#ff0000".into()),
                    blend_mode: Some(BlendMode::Multiply),
                    ..Default::default()
                },
            },
        )
        .unwrap();

        assert_eq!(layers[1].fill_color, "#ff0000");
        assert_eq!(layers[1].stroke_color, "#000000");
        assert_eq!(layers[1].blend_mode, BlendMode::Multiply);
    }

    #[test]
    fn test_set_path_data_requires_path() {
        let mut layers = layers();
        let result = apply(
            &mut layers,
            Mutation::SetPathData {
                layer_id: "a".into(),
                path_data: "M 0 0 L 1 1".into(),
                options: ParseOptions::default(),
            },
        );
        assert_eq!(result, Err(MutationError::NotAPath("a".into())));

        apply(
            &mut layers,
            Mutation::SetPathData {
                layer_id: "g1".into(),
                path_data: "M 0 0 L 1 1".into(),
                options: ParseOptions::default(),
            },
        )
        .unwrap();
        match &layers[2].shape {
            Shape::Group { children } => match &children[0].shape {
                Shape::Path { nodes } => assert_eq!(nodes.len(), 2),
                other => panic!("expected path, got {other:?}"),
            },
            other => panic!("expected group, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_layer() {
        let mut layers = layers();
        let result = apply(
            &mut layers,
            Mutation::SetVisibility {
                layer_id: "missing".into(),
                visible: false,
            },
        );
        assert_eq!(result, Err(MutationError::LayerNotFound("missing".into())));
    }
}
