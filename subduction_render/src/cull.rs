// Copyright 2026 the Subduction Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Marking each layer against the frame's dirty regions.
//!
//! [`CullMap::mark`] walks the tree once and records, for every visited
//! layer and every dirty region, whether the layer's painted footprint lies
//! [`Outside`](CullState::Outside), [`Inside`](CullState::Inside), or
//! [`Partial`](CullState::Partial)ly across that region. The draw plan reads
//! the result: `Outside` subtrees are skipped and `Partial` layers are drawn
//! with the region as a clip.
//!
//! A decision made for a parent is inherited without a geometry test: if a
//! layer is outside a region so are its descendants, and if it is inside a
//! region so are they. Descendants of a layer with an effect inherit its
//! state verbatim, since the effect may move their output anywhere inside
//! its footprint.

use alloc::vec::Vec;

use subduction_core::bounds::Bounds;
use subduction_core::layer::{LayerId, LayerStore};
use subduction_core::region::DirtyRegions;
use subduction_core::transform::Transform3d;

/// A layer's relation to one dirty region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CullState {
    /// The layer paints nothing inside the region.
    #[default]
    Outside,
    /// The layer's footprint lies entirely within the region.
    Inside,
    /// The layer's footprint overlaps the region's edge.
    Partial,
}

/// Work counters from the last [`CullMap::mark`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CullStats {
    /// Layers whose state was written.
    pub nodes_visited: u32,
    /// Layer-versus-region geometry tests performed.
    pub geometry_tests: u32,
    /// Decisions inherited from a parent that was inside.
    pub inherited_inside: u32,
    /// Decisions inherited from a parent that was outside.
    pub inherited_outside: u32,
    /// Visited layers outside every region.
    pub culled: u32,
}

/// Per-layer, per-region culling state for one frame.
///
/// Indexed by raw slot index ([`LayerId::index`]). Layers the walk never
/// reached read as `Outside`.
#[derive(Clone, Debug, Default)]
pub struct CullMap {
    states: Vec<CullState>,
    regions: Vec<Bounds>,
    slots: usize,
    stats: CullStats,
}

impl CullMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of regions the map was marked against.
    #[inline]
    #[must_use]
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// The regions the map was marked against, in pass space.
    #[inline]
    #[must_use]
    pub fn regions(&self) -> &[Bounds] {
        &self.regions
    }

    /// Counters from the last walk.
    #[inline]
    #[must_use]
    pub fn stats(&self) -> CullStats {
        self.stats
    }

    /// Returns the state of `id` against region `region`.
    ///
    /// # Panics
    ///
    /// Panics if `region >= self.region_count()`.
    #[must_use]
    pub fn state(&self, id: LayerId, region: usize) -> CullState {
        self.state_at(id.index(), region)
    }

    /// Returns the state of raw slot `idx` against region `region`.
    ///
    /// # Panics
    ///
    /// Panics if `region >= self.region_count()`.
    #[must_use]
    pub fn state_at(&self, idx: u32, region: usize) -> CullState {
        assert!(
            region < self.regions.len(),
            "region index {region} out of range (len {})",
            self.regions.len()
        );
        self.states_at(idx).get(region).copied().unwrap_or_default()
    }

    /// Returns the states of raw slot `idx` against every region, or an
    /// empty slice for slots the map does not cover.
    #[must_use]
    pub fn states_at(&self, idx: u32) -> &[CullState] {
        let idx = idx as usize;
        if idx >= self.slots {
            return &[];
        }
        let n = self.regions.len();
        &self.states[idx * n..(idx + 1) * n]
    }

    /// Returns `true` if the layer can be skipped entirely.
    ///
    /// With no regions nothing is culled: the caller has no damage to go on
    /// and must draw everything.
    #[must_use]
    pub fn is_culled(&self, id: LayerId) -> bool {
        self.is_culled_at(id.index())
    }

    /// Raw-index form of [`is_culled`](Self::is_culled).
    #[must_use]
    pub fn is_culled_at(&self, idx: u32) -> bool {
        if self.regions.is_empty() {
            return false;
        }
        let states = self.states_at(idx);
        states.is_empty() || states.iter().all(|s| *s == CullState::Outside)
    }

    /// Marks every layer under `root` against `regions`.
    ///
    /// Footprints are mapped into pass space (the root's parent space) and
    /// narrowed by `clip` when given.
    pub fn mark(
        &mut self,
        store: &LayerStore,
        root: LayerId,
        regions: &DirtyRegions,
        clip: Option<Bounds>,
    ) {
        self.regions.clear();
        self.regions.extend(regions.iter());
        self.run(store, root, clip);
    }

    /// Like [`mark`](Self::mark), for an arbitrary list of regions.
    ///
    /// An empty entry constrains nothing: every layer tested against it is
    /// marked `Partial`.
    pub fn mark_bounds(
        &mut self,
        store: &LayerStore,
        root: LayerId,
        regions: &[Bounds],
        clip: Option<Bounds>,
    ) {
        self.regions.clear();
        self.regions.extend_from_slice(regions);
        self.run(store, root, clip);
    }

    fn run(&mut self, store: &LayerStore, root: LayerId, clip: Option<Bounds>) {
        assert!(store.is_alive(root), "stale LayerId: {root:?}");
        self.slots = store.slot_count() as usize;
        self.states.clear();
        self.states
            .resize(self.slots * self.regions.len(), CullState::Outside);
        self.stats = CullStats::default();
        if self.regions.is_empty() {
            return;
        }

        let mut walk = Walk {
            store,
            map: self,
            clip,
        };
        walk.layer(root.index(), &Transform3d::IDENTITY, None);
    }
}

struct Walk<'a> {
    store: &'a LayerStore,
    map: &'a mut CullMap,
    clip: Option<Bounds>,
}

impl Walk<'_> {
    /// `tx` maps the layer's parent space to pass space. `parent` is the
    /// slot whose states this layer inherits, or `None` at the root.
    fn layer(&mut self, idx: u32, tx: &Transform3d, parent: Option<u32>) {
        let store = self.store;
        let n = self.map.regions.len();
        let base = idx as usize * n;

        let mut bounds = store.transformed_bounds_at(idx).transform_by(tx);
        if let Some(clip) = self.clip {
            bounds.intersect_with(clip);
        }

        let map = &mut *self.map;
        map.stats.nodes_visited += 1;
        for i in 0..n {
            let inherited = parent.map(|p| map.states[p as usize * n + i]);
            let state = match inherited {
                Some(CullState::Outside) => {
                    map.stats.inherited_outside += 1;
                    CullState::Outside
                }
                Some(CullState::Inside) => {
                    map.stats.inherited_inside += 1;
                    CullState::Inside
                }
                Some(CullState::Partial) | None => {
                    let region = map.regions[i];
                    if region.is_empty() {
                        CullState::Partial
                    } else {
                        map.stats.geometry_tests += 1;
                        classify(&bounds, &region)
                    }
                }
            };
            map.states[base + i] = state;
        }

        if map.states[base..base + n]
            .iter()
            .all(|s| *s == CullState::Outside)
        {
            map.stats.culled += 1;
            return;
        }

        if store.effect_at(idx).is_some() {
            self.inherit_subtree(idx);
            return;
        }

        let render_tx = *tx * store.local_transform_at(idx);
        for child in store.children_at(idx) {
            self.layer(child.index(), &render_tx, Some(idx));
        }
    }

    /// Copies the states of `idx` onto every descendant without testing.
    fn inherit_subtree(&mut self, idx: u32) {
        let store = self.store;
        let n = self.map.regions.len();
        let src = idx as usize * n;
        for child in store.children_at(idx) {
            let dst = child.index() as usize * n;
            self.map.states.copy_within(src..src + n, dst);
            self.map.stats.nodes_visited += 1;
            self.inherit_subtree(child.index());
        }
    }
}

fn classify(bounds: &Bounds, region: &Bounds) -> CullState {
    if !region.intersects(bounds) {
        CullState::Outside
    } else if region.contains(bounds) {
        CullState::Inside
    } else {
        CullState::Partial
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use subduction_core::effect::Effect;

    fn leaf(store: &mut LayerStore, parent: LayerId, bounds: Bounds) -> LayerId {
        let id = store.create_layer();
        store.add_child(parent, id);
        store.set_content_bounds(id, bounds);
        id
    }

    fn regions(list: &[Bounds]) -> DirtyRegions {
        let mut r = DirtyRegions::new(6);
        for &b in list {
            r.add_dirty_region(b);
        }
        r
    }

    #[test]
    fn no_regions_culls_nothing() {
        let mut store = LayerStore::new();
        let root = store.create_layer();
        let a = leaf(&mut store, root, Bounds::new(0.0, 0.0, 10.0, 10.0));
        let _ = store.evaluate();

        let mut map = CullMap::new();
        map.mark(&store, root, &regions(&[]), None);
        assert_eq!(map.region_count(), 0);
        assert!(!map.is_culled(root));
        assert!(!map.is_culled(a));
        assert_eq!(map.stats().nodes_visited, 0);
    }

    #[test]
    fn outside_subtree_is_skipped() {
        let mut store = LayerStore::new();
        let root = store.create_layer();
        let near = leaf(&mut store, root, Bounds::new(0.0, 0.0, 10.0, 10.0));
        let group = store.create_layer();
        store.add_child(root, group);
        let far = leaf(&mut store, group, Bounds::new(200.0, 200.0, 210.0, 210.0));
        let _ = store.evaluate();

        let mut map = CullMap::new();
        map.mark(&store, root, &regions(&[Bounds::new(0.0, 0.0, 20.0, 20.0)]), None);
        assert_eq!(map.state(near, 0), CullState::Inside);
        assert_eq!(map.state(group, 0), CullState::Outside);
        assert!(map.is_culled(group));
        assert!(map.is_culled(far));
        // root, near, group: `far` is never visited.
        assert_eq!(map.stats().nodes_visited, 3);
        assert_eq!(map.stats().culled, 1);
    }

    #[test]
    fn inside_is_inherited_without_tests() {
        let mut store = LayerStore::new();
        let root = store.create_layer();
        let group = store.create_layer();
        store.add_child(root, group);
        store.set_content_bounds(group, Bounds::new(0.0, 0.0, 20.0, 20.0));
        let a = leaf(&mut store, group, Bounds::new(0.0, 0.0, 5.0, 5.0));
        let b = leaf(&mut store, group, Bounds::new(10.0, 10.0, 15.0, 15.0));
        let _ = store.evaluate();

        let mut map = CullMap::new();
        map.mark(&store, root, &regions(&[Bounds::new(0.0, 0.0, 30.0, 30.0)]), None);
        for id in [root, group, a, b] {
            assert_eq!(map.state(id, 0), CullState::Inside);
        }
        let stats = map.stats();
        assert_eq!(stats.geometry_tests, 1);
        assert_eq!(stats.inherited_inside, 3);
    }

    #[test]
    fn partial_parent_tests_children() {
        let mut store = LayerStore::new();
        let root = store.create_layer();
        let a = leaf(&mut store, root, Bounds::new(0.0, 0.0, 10.0, 10.0));
        let b = leaf(&mut store, root, Bounds::new(15.0, 0.0, 30.0, 10.0));
        let c = leaf(&mut store, root, Bounds::new(50.0, 0.0, 60.0, 10.0));
        let _ = store.evaluate();

        let mut map = CullMap::new();
        map.mark(&store, root, &regions(&[Bounds::new(0.0, 0.0, 20.0, 20.0)]), None);
        assert_eq!(map.state(root, 0), CullState::Partial);
        assert_eq!(map.state(a, 0), CullState::Inside);
        assert_eq!(map.state(b, 0), CullState::Partial);
        assert_eq!(map.state(c, 0), CullState::Outside);
        assert_eq!(map.stats().geometry_tests, 4);
    }

    #[test]
    fn regions_are_tracked_independently() {
        let mut store = LayerStore::new();
        let root = store.create_layer();
        let a = leaf(&mut store, root, Bounds::new(0.0, 0.0, 10.0, 10.0));
        let b = leaf(&mut store, root, Bounds::new(50.0, 50.0, 60.0, 60.0));
        let _ = store.evaluate();

        let mut map = CullMap::new();
        let dirty = regions(&[
            Bounds::new(0.0, 0.0, 20.0, 20.0),
            Bounds::new(40.0, 40.0, 70.0, 70.0),
        ]);
        map.mark(&store, root, &dirty, None);
        assert_eq!(map.states_at(a.index()), &[CullState::Inside, CullState::Outside]);
        assert_eq!(map.states_at(b.index()), &[CullState::Outside, CullState::Inside]);
        assert!(!map.is_culled(a));
        assert!(!map.is_culled(b));
    }

    #[test]
    fn effect_descendants_follow_the_effect_layer() {
        let mut store = LayerStore::new();
        let root = store.create_layer();
        let group = store.create_layer();
        store.add_child(root, group);
        store.set_effect(group, Some(Effect::offset(50.0, 0.0)));
        let a = leaf(&mut store, group, Bounds::new(0.0, 0.0, 10.0, 10.0));
        let _ = store.evaluate();

        let mut map = CullMap::new();
        map.mark(&store, root, &regions(&[Bounds::new(45.0, 0.0, 55.0, 10.0)]), None);
        // `a` itself lies outside the region, but the offset moves its output
        // into it.
        assert_eq!(map.state(group, 0), CullState::Partial);
        assert_eq!(map.state(a, 0), CullState::Partial);
        assert!(!map.is_culled(a));
    }

    #[test]
    fn effect_states_reach_every_descendant() {
        let mut store = LayerStore::new();
        let root = store.create_layer();
        let group = store.create_layer();
        store.add_child(root, group);
        store.set_effect(group, Some(Effect::offset(50.0, 0.0)));
        let mid = store.create_layer();
        store.add_child(group, mid);
        let a = leaf(&mut store, mid, Bounds::new(0.0, 0.0, 10.0, 10.0));
        let _ = store.evaluate();

        let dirty = regions(&[
            Bounds::new(45.0, 0.0, 55.0, 10.0),
            Bounds::new(200.0, 200.0, 210.0, 210.0),
        ]);
        let mut map = CullMap::new();
        map.mark(&store, root, &dirty, None);
        for id in [group, mid, a] {
            assert_eq!(map.states_at(id.index()), [CullState::Partial, CullState::Outside]);
        }
        assert_eq!(map.stats().nodes_visited, 4);
        // Two tests at the root, one at the effect layer, none below it.
        assert_eq!(map.stats().geometry_tests, 3);
    }

    #[test]
    fn clip_narrows_footprints() {
        let mut store = LayerStore::new();
        let root = store.create_layer();
        let a = leaf(&mut store, root, Bounds::new(90.0, 0.0, 150.0, 10.0));
        let _ = store.evaluate();

        let dirty = regions(&[Bounds::new(80.0, 0.0, 100.0, 10.0)]);
        let mut map = CullMap::new();
        map.mark(&store, root, &dirty, None);
        assert_eq!(map.state(a, 0), CullState::Partial);

        map.mark(&store, root, &dirty, Some(Bounds::new(0.0, 0.0, 100.0, 100.0)));
        assert_eq!(map.state(a, 0), CullState::Inside);
    }

    #[test]
    fn empty_region_excludes_nothing() {
        let mut store = LayerStore::new();
        let root = store.create_layer();
        let a = leaf(&mut store, root, Bounds::new(0.0, 0.0, 10.0, 10.0));
        let _ = store.evaluate();

        let mut map = CullMap::new();
        map.mark_bounds(
            &store,
            root,
            &[Bounds::new(500.0, 500.0, 510.0, 510.0), Bounds::EMPTY],
            None,
        );
        assert_eq!(map.state(a, 0), CullState::Outside);
        assert_eq!(map.state(a, 1), CullState::Partial);
        assert!(!map.is_culled(a));
    }

    #[test]
    fn transforms_place_layers_in_pass_space() {
        use subduction_core::transform::Transform3d;

        let mut store = LayerStore::new();
        let root = store.create_layer();
        let group = store.create_layer();
        store.add_child(root, group);
        store.set_transform(group, Transform3d::from_translation(100.0, 0.0, 0.0));
        let a = leaf(&mut store, group, Bounds::new(0.0, 0.0, 10.0, 10.0));
        let _ = store.evaluate();

        let mut map = CullMap::new();
        map.mark(&store, root, &regions(&[Bounds::new(95.0, 0.0, 120.0, 20.0)]), None);
        assert_eq!(map.state(a, 0), CullState::Inside);
    }

    #[test]
    #[should_panic(expected = "region index 1 out of range")]
    fn state_for_missing_region_panics() {
        let mut store = LayerStore::new();
        let root = store.create_layer();
        let _ = store.evaluate();
        let mut map = CullMap::new();
        map.mark(&store, root, &regions(&[Bounds::new(0.0, 0.0, 1.0, 1.0)]), None);
        let _ = map.state(root, 1);
    }
}
