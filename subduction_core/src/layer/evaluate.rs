// Copyright 2026 the Subduction Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame evaluation and change tracking.
//!
//! Evaluation follows a drain-recompute pattern for each dirty channel:
//!
//! 1. **TRANSFORM**: Drain dirty indices, recompute each layer's
//!    `world_transform` as `parent_world * local_transform` and
//!    `effective_hidden` as `parent_effective_hidden || flags.hidden`.
//! 2. **CLIP** / **CONTENT** / **EFFECT**: Drain dirty indices (no
//!    per-layer recomputation; they feed the bounds pass below).
//! 3. **TOPOLOGY**: Drain and discard (the traversal order was already
//!    rebuilt at the start of evaluation if needed).
//! 4. **Bounds**: If anything changed, walk the traversal order in reverse
//!    (children before parents) and recompute `subtree_bounds` and
//!    `transformed_bounds`.
//!
//! `PAINT` and `SUBTREE` are not drained here; they belong to the repaint
//! passes.
//!
//! [`FrameChanges`] uses raw slot indices (`u32`) rather than [`LayerId`]
//! handles so that passes can index directly into the store's SoA arrays
//! via the `*_at()` accessors (e.g.
//! [`transformed_bounds_at`](super::LayerStore::transformed_bounds_at)) without
//! paying for generation checks on every access.
//!
//! [`LayerId`]: super::LayerId

use alloc::vec::Vec;

use super::id::INVALID;
use super::store::LayerStore;
use crate::dirty;
use crate::transform::Transform3d;

/// The set of changes produced by a single [`LayerStore::evaluate`] call.
///
/// Each field contains the raw slot indices of layers that changed in the
/// corresponding category.
#[derive(Clone, Debug, Default)]
pub struct FrameChanges {
    /// Layers whose world transform was recomputed.
    pub transforms: Vec<u32>,
    /// Layers whose clip shape changed.
    pub clips: Vec<u32>,
    /// Layers whose content bounds changed.
    pub content: Vec<u32>,
    /// Layers whose effect changed.
    pub effects: Vec<u32>,
    /// Layers that transitioned from visible to effectively hidden.
    pub hidden: Vec<u32>,
    /// Layers that transitioned from effectively hidden to visible.
    pub unhidden: Vec<u32>,
    /// Layers added since the last evaluate.
    pub added: Vec<u32>,
    /// Layers removed since the last evaluate.
    pub removed: Vec<u32>,
    /// Whether the tree topology changed (traversal order was rebuilt).
    pub topology_changed: bool,
}

impl FrameChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.transforms.clear();
        self.clips.clear();
        self.content.clear();
        self.effects.clear();
        self.hidden.clear();
        self.unhidden.clear();
        self.added.clear();
        self.removed.clear();
        self.topology_changed = false;
    }

    /// Returns whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
            && self.clips.is_empty()
            && self.content.is_empty()
            && self.effects.is_empty()
            && self.hidden.is_empty()
            && self.unhidden.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
            && !self.topology_changed
    }
}

impl LayerStore {
    /// Evaluates the layer tree, recomputing dirty properties and returning
    /// the set of changes.
    ///
    /// This rebuilds the traversal order if topology changed, drains each
    /// dirty channel, recomputes world transforms in parent-before-child
    /// order, then recomputes bounds in child-before-parent order.
    pub fn evaluate(&mut self) -> FrameChanges {
        let mut changes = FrameChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided buffer
    /// to avoid allocation.
    pub fn evaluate_into(&mut self, changes: &mut FrameChanges) {
        changes.clear();

        // Rebuild traversal order if needed.
        if self.traversal_dirty {
            self.rebuild_traversal_order();
            changes.topology_changed = true;
            self.traversal_dirty = false;
        }

        // Drain TRANSFORM channel, collect dirty indices, then recompute.
        let dirty_transforms: Vec<u32> = self
            .dirty
            .drain(dirty::TRANSFORM)
            .affected()
            .deterministic()
            .run()
            .collect();
        for &idx in &dirty_transforms {
            let parent_idx = self.parent[idx as usize];
            let parent_world = if parent_idx != INVALID {
                self.world_transform[parent_idx as usize]
            } else {
                Transform3d::IDENTITY
            };
            self.world_transform[idx as usize] = parent_world * self.local_transform[idx as usize];

            let parent_hidden = parent_idx != INVALID && self.effective_hidden[parent_idx as usize];
            let new_hidden = parent_hidden || self.flags[idx as usize].hidden;
            let old_hidden = self.effective_hidden[idx as usize];
            if new_hidden != old_hidden {
                if new_hidden {
                    changes.hidden.push(idx);
                } else {
                    changes.unhidden.push(idx);
                }
                self.effective_hidden[idx as usize] = new_hidden;
            }
        }
        changes.transforms = dirty_transforms;

        changes.clips = self
            .dirty
            .drain(dirty::CLIP)
            .deterministic()
            .run()
            .collect();

        changes.content = self
            .dirty
            .drain(dirty::CONTENT)
            .deterministic()
            .run()
            .collect();

        changes.effects = self
            .dirty
            .drain(dirty::EFFECT)
            .deterministic()
            .run()
            .collect();

        // Drain TOPOLOGY channel (just consume, changes are structural).
        let _: Vec<u32> = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();

        // Move lifecycle lists.
        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);

        if !changes.is_empty() {
            self.recompute_bounds();
        }
    }

    /// Returns the current traversal order (depth-first pre-order).
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called at least
    /// once (or if the traversal has been manually rebuilt).
    #[must_use]
    pub fn traversal_order(&self) -> &[u32] {
        &self.traversal_order
    }

    /// Recomputes subtree and transformed bounds for every live layer.
    fn recompute_bounds(&mut self) {
        for i in (0..self.traversal_order.len()).rev() {
            let idx = self.traversal_order[i];

            let mut subtree = self.content_bounds[idx as usize];
            let mut child = self.first_child[idx as usize];
            while child != INVALID {
                subtree.union_with(self.transformed_bounds[child as usize]);
                child = self.next_sibling[child as usize];
            }
            self.subtree_bounds[idx as usize] = subtree;
            self.transformed_bounds[idx as usize] = self.footprint_at(idx, subtree);
        }
    }

    /// Rebuilds the depth-first pre-order traversal of all live layers.
    fn rebuild_traversal_order(&mut self) {
        self.traversal_order.clear();
        // Start from roots.
        for idx in 0..self.len {
            if self.parent[idx as usize] == INVALID && !self.free_list.contains(&idx) {
                self.dfs_collect(idx);
            }
        }
    }

    /// Depth-first pre-order collection starting from `idx`.
    fn dfs_collect(&mut self, idx: u32) {
        self.traversal_order.push(idx);
        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            self.dfs_collect(child);
            child = self.next_sibling[child as usize];
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;

    use super::*;
    use crate::bounds::Bounds;
    use crate::effect::Effect;
    use crate::layer::{ClipShape, LayerFlags};

    #[test]
    fn evaluate_computes_world_transforms() {
        let mut store = LayerStore::new();
        let parent = store.create_layer();
        let child = store.create_layer();

        let parent_xf = Transform3d::from_translation(10.0, 0.0, 0.0);
        let child_xf = Transform3d::from_translation(0.0, 5.0, 0.0);

        store.set_transform(parent, parent_xf);
        store.set_transform(child, child_xf);
        store.add_child(parent, child);

        let _changes = store.evaluate();

        assert_eq!(store.world_transform(parent), parent_xf);
        let expected = parent_xf * child_xf;
        assert_eq!(store.world_transform(child), expected);
    }

    #[test]
    fn no_change_evaluate_returns_empty() {
        let mut store = LayerStore::new();
        let _root = store.create_layer();

        // First evaluate processes initial creation.
        let _ = store.evaluate();

        // Second evaluate should have no changes.
        let changes = store.evaluate();
        assert!(changes.is_empty());
    }

    #[test]
    fn traversal_order_is_depth_first() {
        let mut store = LayerStore::new();
        let a = store.create_layer();
        let b = store.create_layer();
        let c = store.create_layer();
        let d = store.create_layer();

        // Tree: a -> [b -> [d], c]
        store.add_child(a, b);
        store.add_child(a, c);
        store.add_child(b, d);

        let _ = store.evaluate();

        let order = store.traversal_order();
        assert_eq!(order, &[a.idx, b.idx, d.idx, c.idx]);
    }

    #[test]
    fn evaluate_tracks_clip_content_and_effect_changes() {
        let mut store = LayerStore::new();
        let id = store.create_layer();
        let _ = store.evaluate();

        store.set_clip(id, Some(ClipShape::Rect(Rect::new(0.0, 0.0, 50.0, 50.0))));
        store.set_content_bounds(id, Bounds::new(0.0, 0.0, 10.0, 10.0));
        store.set_effect(id, Some(Effect::gaussian_blur(2.0)));
        let changes = store.evaluate();
        assert!(changes.clips.contains(&id.idx));
        assert!(changes.content.contains(&id.idx));
        assert!(changes.effects.contains(&id.idx));
    }

    #[test]
    fn bounds_roll_up_through_transforms() {
        let mut store = LayerStore::new();
        let root = store.create_layer();
        let group = store.create_layer();
        let leaf = store.create_layer();
        store.add_child(root, group);
        store.add_child(group, leaf);

        store.set_content_bounds(leaf, Bounds::new(0.0, 0.0, 10.0, 10.0));
        store.set_transform(leaf, Transform3d::from_translation(5.0, 0.0, 0.0));
        store.set_transform(group, Transform3d::from_translation(0.0, 20.0, 0.0));
        store.set_content_bounds(root, Bounds::new(0.0, 0.0, 1.0, 1.0));
        let _ = store.evaluate();

        assert_eq!(
            store.transformed_bounds(leaf),
            Bounds::new(5.0, 0.0, 15.0, 10.0)
        );
        assert_eq!(
            store.subtree_bounds(group),
            Bounds::new(5.0, 0.0, 15.0, 10.0)
        );
        assert_eq!(
            store.transformed_bounds(group),
            Bounds::new(5.0, 20.0, 15.0, 30.0)
        );
        assert_eq!(store.subtree_bounds(root), Bounds::new(0.0, 0.0, 15.0, 30.0));
        assert_eq!(store.world_bounds(leaf), Bounds::new(5.0, 20.0, 15.0, 30.0));
    }

    #[test]
    fn effect_then_clip_shape_the_footprint() {
        let mut store = LayerStore::new();
        let id = store.create_layer();
        store.set_content_bounds(id, Bounds::new(10.0, 10.0, 20.0, 20.0));
        store.set_effect(id, Some(Effect::gaussian_blur(3.0)));
        let _ = store.evaluate();
        assert_eq!(
            store.transformed_bounds(id),
            Bounds::new(7.0, 7.0, 23.0, 23.0)
        );

        store.set_clip(id, Some(ClipShape::Rect(Rect::new(0.0, 0.0, 15.0, 100.0))));
        let _ = store.evaluate();
        assert_eq!(
            store.transformed_bounds(id),
            Bounds::new(7.0, 7.0, 15.0, 23.0)
        );
    }

    #[test]
    fn hidden_layer_has_no_footprint() {
        let mut store = LayerStore::new();
        let parent = store.create_layer();
        let child = store.create_layer();
        store.add_child(parent, child);
        store.set_content_bounds(child, Bounds::new(0.0, 0.0, 10.0, 10.0));
        let _ = store.evaluate();
        assert!(!store.transformed_bounds(parent).is_empty());

        store.set_flags(child, LayerFlags { hidden: true });
        let _ = store.evaluate();
        assert!(store.transformed_bounds(child).is_empty());
        assert!(store.transformed_bounds(parent).is_empty());
    }

    #[test]
    fn evaluate_added_and_removed_lifecycle() {
        let mut store = LayerStore::new();
        let id = store.create_layer();

        // First evaluate: layer should appear in `added`.
        let changes = store.evaluate();
        assert!(changes.added.contains(&id.idx));
        assert!(changes.removed.is_empty());

        // Second evaluate: no lifecycle events.
        let changes = store.evaluate();
        assert!(changes.added.is_empty());
        assert!(changes.removed.is_empty());

        // Destroy: should appear in `removed` on next evaluate.
        store.destroy_layer(id);
        let changes = store.evaluate();
        assert!(changes.removed.contains(&id.idx));
        assert!(changes.added.is_empty());
    }

    #[test]
    fn hidden_propagates_to_children() {
        let mut store = LayerStore::new();
        let parent = store.create_layer();
        let child = store.create_layer();
        store.add_child(parent, child);
        let _ = store.evaluate();

        store.set_flags(parent, LayerFlags { hidden: true });
        let changes = store.evaluate();

        assert!(store.effective_hidden(parent));
        assert!(store.effective_hidden(child));
        assert!(changes.hidden.contains(&parent.idx));
        assert!(changes.hidden.contains(&child.idx));
    }

    #[test]
    fn unhide_restores_visibility() {
        let mut store = LayerStore::new();
        let root = store.create_layer();
        let _ = store.evaluate();

        store.set_flags(root, LayerFlags { hidden: true });
        let _ = store.evaluate();
        assert!(store.effective_hidden(root));

        store.set_flags(root, LayerFlags { hidden: false });
        let changes = store.evaluate();

        assert!(!store.effective_hidden(root));
        assert!(changes.unhidden.contains(&root.idx));
        assert!(changes.hidden.is_empty());
    }

    #[test]
    fn topology_reparent_recomputes_inherited_properties_for_subtree() {
        let mut store = LayerStore::new();
        let old_parent = store.create_layer();
        let new_parent = store.create_layer();
        let child = store.create_layer();
        let grandchild = store.create_layer();

        store.add_child(child, grandchild);
        store.add_child(old_parent, child);

        store.set_transform(old_parent, Transform3d::from_translation(10.0, 0.0, 0.0));
        store.set_flags(old_parent, LayerFlags { hidden: true });
        store.set_transform(new_parent, Transform3d::from_translation(25.0, 0.0, 0.0));
        let _ = store.evaluate();

        store.reparent(child, new_parent);
        let changes = store.evaluate();

        assert!(changes.transforms.contains(&child.idx));
        assert!(changes.transforms.contains(&grandchild.idx));
        assert!(changes.unhidden.contains(&child.idx));
        assert!(changes.unhidden.contains(&grandchild.idx));
        assert_eq!(
            store.world_transform(grandchild),
            Transform3d::from_translation(25.0, 0.0, 0.0)
        );
        assert!(!store.effective_hidden(grandchild));
    }

    #[test]
    fn removal_shrinks_parent_bounds() {
        let mut store = LayerStore::new();
        let parent = store.create_layer();
        let a = store.create_layer();
        let b = store.create_layer();
        store.add_child(parent, a);
        store.add_child(parent, b);
        store.set_content_bounds(a, Bounds::new(0.0, 0.0, 10.0, 10.0));
        store.set_content_bounds(b, Bounds::new(50.0, 50.0, 60.0, 60.0));
        let _ = store.evaluate();
        assert_eq!(store.subtree_bounds(parent), Bounds::new(0.0, 0.0, 60.0, 60.0));

        store.remove_from_parent(b);
        let _ = store.evaluate();
        assert_eq!(store.subtree_bounds(parent), Bounds::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn evaluate_into_reuses_buffer() {
        let mut store = LayerStore::new();
        let a = store.create_layer();
        let b = store.create_layer();

        let mut changes = FrameChanges::default();

        // First evaluate: both layers added.
        store.evaluate_into(&mut changes);
        assert_eq!(changes.added.len(), 2);

        store.set_content_bounds(a, Bounds::new(0.0, 0.0, 1.0, 1.0));
        store.evaluate_into(&mut changes);

        // Buffer should be cleared and refilled (not accumulating).
        assert!(changes.added.is_empty(), "added should be cleared");
        assert!(changes.content.contains(&a.idx));
        assert!(!changes.content.contains(&b.idx));
    }
}
