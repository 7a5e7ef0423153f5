// Copyright 2026 the Subduction Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Repaint plan: the draw items for each dirty region of one frame.

use alloc::vec::Vec;

use subduction_core::bounds::Bounds;
use subduction_core::layer::{ClipShape, LayerId, LayerStore};
use subduction_core::transform::Transform3d;

use crate::cull::{CullMap, CullState};

/// A single draw command in a region pass.
///
/// Items are produced in back-to-front order, matching the layer tree's
/// paint order.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawItem {
    /// The layer this item originates from.
    pub layer_id: LayerId,
    /// Depth below the pass root (the root is 0).
    pub depth: u32,
    /// Layer-to-pass-space transform.
    pub world_transform: Transform3d,
    /// Clip shape in local coordinates, if any.
    pub clip: Option<ClipShape>,
    /// The layer straddles the region's edge and must be drawn clipped to it.
    pub needs_clip: bool,
}

/// The draw items that intersect one dirty region.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RegionPass {
    /// The dirty region, in pass space.
    pub region: Bounds,
    /// Draw items in back-to-front order.
    pub items: Vec<DrawItem>,
}

/// An ordered list of region passes for a single frame.
///
/// An empty plan means nothing needs repainting.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RepaintPlan {
    /// One pass per dirty region, in region order.
    pub passes: Vec<RegionPass>,
}

impl RepaintPlan {
    /// Creates an empty plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the plan for reuse.
    pub fn clear(&mut self) {
        self.passes.clear();
    }

    /// Returns `true` if there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Total number of draw items across all passes.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.passes.iter().map(|p| p.items.len()).sum()
    }

    /// Rebuilds the plan from a marked [`CullMap`].
    ///
    /// Each region gets one pass listing every visible layer under `root`
    /// that is not `Outside` that region. Hidden layers and subtrees
    /// outside the region are skipped.
    pub fn build(&mut self, store: &LayerStore, root: LayerId, cull: &CullMap) {
        assert!(store.is_alive(root), "stale LayerId: {root:?}");
        self.passes.clear();
        for (i, &region) in cull.regions().iter().enumerate() {
            let mut pass = RegionPass {
                region,
                items: Vec::new(),
            };
            collect(store, cull, i, root, 0, &Transform3d::IDENTITY, &mut pass.items);
            self.passes.push(pass);
        }
    }
}

fn collect(
    store: &LayerStore,
    cull: &CullMap,
    region: usize,
    layer_id: LayerId,
    depth: u32,
    tx: &Transform3d,
    items: &mut Vec<DrawItem>,
) {
    let idx = layer_id.index();
    if store.effective_hidden_at(idx) {
        return;
    }
    let state = cull.state_at(idx, region);
    if state == CullState::Outside {
        return;
    }
    let render_tx = *tx * store.local_transform_at(idx);
    items.push(DrawItem {
        layer_id,
        depth,
        world_transform: render_tx,
        clip: store.clip_at(idx),
        needs_clip: state == CullState::Partial,
    });
    for child in store.children_at(idx) {
        collect(store, cull, region, child, depth + 1, &render_tx, items);
    }
}

#[cfg(test)]
mod tests {
    use subduction_core::layer::LayerFlags;
    use subduction_core::region::DirtyRegions;

    use super::*;

    fn leaf(store: &mut LayerStore, parent: LayerId, bounds: Bounds) -> LayerId {
        let id = store.create_layer();
        store.add_child(parent, id);
        store.set_content_bounds(id, bounds);
        id
    }

    fn plan_for(store: &mut LayerStore, root: LayerId, regions: &[Bounds]) -> RepaintPlan {
        let _ = store.evaluate();
        let mut dirty = DirtyRegions::new(6);
        for &r in regions {
            dirty.add_dirty_region(r);
        }
        let mut cull = CullMap::new();
        cull.mark(store, root, &dirty, None);
        let mut plan = RepaintPlan::new();
        plan.build(store, root, &cull);
        plan
    }

    fn ids(pass: &RegionPass) -> Vec<LayerId> {
        pass.items.iter().map(|i| i.layer_id).collect()
    }

    #[test]
    fn no_regions_no_passes() {
        let mut store = LayerStore::new();
        let root = store.create_layer();
        let _ = leaf(&mut store, root, Bounds::new(0.0, 0.0, 10.0, 10.0));
        let plan = plan_for(&mut store, root, &[]);
        assert!(plan.is_empty());
        assert_eq!(plan.item_count(), 0);
    }

    #[test]
    fn pass_lists_intersecting_layers_in_paint_order() {
        let mut store = LayerStore::new();
        let root = store.create_layer();
        let a = leaf(&mut store, root, Bounds::new(0.0, 0.0, 10.0, 10.0));
        let _far = leaf(&mut store, root, Bounds::new(80.0, 80.0, 90.0, 90.0));
        let b = leaf(&mut store, root, Bounds::new(5.0, 5.0, 30.0, 30.0));

        let plan = plan_for(&mut store, root, &[Bounds::new(0.0, 0.0, 20.0, 20.0)]);
        assert_eq!(plan.passes.len(), 1);
        let pass = &plan.passes[0];
        assert_eq!(ids(pass), [root, a, b]);
        assert!(pass.items[0].needs_clip);
        assert!(!pass.items[1].needs_clip);
        assert!(pass.items[2].needs_clip);
        assert_eq!(pass.items[1].depth, 1);
    }

    #[test]
    fn hidden_subtrees_are_skipped() {
        let mut store = LayerStore::new();
        let root = store.create_layer();
        let group = store.create_layer();
        store.add_child(root, group);
        let a = leaf(&mut store, group, Bounds::new(0.0, 0.0, 10.0, 10.0));
        let b = leaf(&mut store, root, Bounds::new(0.0, 0.0, 10.0, 10.0));
        store.set_flags(group, LayerFlags { hidden: true });

        let plan = plan_for(&mut store, root, &[Bounds::new(0.0, 0.0, 20.0, 20.0)]);
        let listed = ids(&plan.passes[0]);
        assert!(!listed.contains(&group));
        assert!(!listed.contains(&a));
        assert_eq!(listed, [root, b]);
    }

    #[test]
    fn one_pass_per_region() {
        let mut store = LayerStore::new();
        let root = store.create_layer();
        let a = leaf(&mut store, root, Bounds::new(0.0, 0.0, 10.0, 10.0));
        let b = leaf(&mut store, root, Bounds::new(50.0, 50.0, 60.0, 60.0));

        let plan = plan_for(
            &mut store,
            root,
            &[
                Bounds::new(0.0, 0.0, 20.0, 20.0),
                Bounds::new(45.0, 45.0, 70.0, 70.0),
            ],
        );
        assert_eq!(plan.passes.len(), 2);
        assert_eq!(ids(&plan.passes[0]), [root, a]);
        assert_eq!(ids(&plan.passes[1]), [root, b]);
        assert_eq!(plan.item_count(), 4);
    }

    #[test]
    fn items_carry_pass_space_transforms() {
        let mut store = LayerStore::new();
        let root = store.create_layer();
        store.set_transform(root, Transform3d::from_translation(10.0, 0.0, 0.0));
        let a = leaf(&mut store, root, Bounds::new(0.0, 0.0, 10.0, 10.0));
        store.set_transform(a, Transform3d::from_translation(0.0, 5.0, 0.0));

        let plan = plan_for(&mut store, root, &[Bounds::new(0.0, 0.0, 100.0, 100.0)]);
        let item = &plan.passes[0].items[1];
        assert_eq!(item.layer_id, a);
        assert_eq!(
            item.world_transform,
            Transform3d::from_translation(10.0, 5.0, 0.0)
        );
    }
}
