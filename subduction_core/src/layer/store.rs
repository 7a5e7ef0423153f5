// Copyright 2026 the Subduction Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays layer storage with allocation, topology, and property management.

use alloc::vec::Vec;

use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use crate::bounds::Bounds;
use crate::effect::Effect;
use crate::transform::Transform3d;

use super::clip::ClipShape;
use super::id::{INVALID, LayerId};
use super::traverse::Children;
use crate::dirty;

/// Per-layer boolean flags.
///
/// Setting [`hidden`](Self::hidden) suppresses all visual contribution of the
/// layer and its entire subtree. Properties can still be mutated while hidden.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LayerFlags {
    /// Whether the layer (and its subtree) is hidden.
    pub hidden: bool,
}

/// Struct-of-arrays storage for all layers.
///
/// Layers are addressed by [`LayerId`] handles. Internally, each layer occupies
/// a slot in parallel arrays. Destroyed layers are recycled via a free list,
/// and generation counters prevent stale handle access.
#[derive(Debug)]
pub struct LayerStore {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Local properties (set by callers) --
    pub(crate) local_transform: Vec<Transform3d>,
    pub(crate) content_bounds: Vec<Bounds>,
    pub(crate) clip: Vec<Option<ClipShape>>,
    pub(crate) effect: Vec<Option<Effect>>,
    pub(crate) flags: Vec<LayerFlags>,

    // -- Computed properties (written by evaluate) --
    pub(crate) world_transform: Vec<Transform3d>,
    pub(crate) effective_hidden: Vec<bool>,
    /// Content plus children, local space, before effect and clip.
    pub(crate) subtree_bounds: Vec<Bounds>,
    /// Painted footprint in the parent's space.
    pub(crate) transformed_bounds: Vec<Bounds>,

    // -- Repaint state (cleared by clear_repaint) --
    /// Footprints, in the parent's space, painted before pending changes.
    pub(crate) dirty_bounds: Vec<Bounds>,
    /// Footprints of detached children, in this layer's space.
    pub(crate) removed_bounds: Vec<Vec<Bounds>>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Traversal cache --
    pub(crate) traversal_order: Vec<u32>,
    pub(crate) traversal_dirty: bool,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,
}

impl Default for LayerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerStore {
    /// Creates an empty layer store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            local_transform: Vec::new(),
            content_bounds: Vec::new(),
            clip: Vec::new(),
            effect: Vec::new(),
            flags: Vec::new(),
            world_transform: Vec::new(),
            effective_hidden: Vec::new(),
            subtree_bounds: Vec::new(),
            transformed_bounds: Vec::new(),
            dirty_bounds: Vec::new(),
            removed_bounds: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            traversal_order: Vec::new(),
            traversal_dirty: true,
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
        }
    }

    // -- Allocation API --

    /// Creates a new layer and returns its handle.
    ///
    /// The layer starts with an identity transform, empty content bounds, no
    /// clip, no effect, and no parent.
    pub fn create_layer(&mut self) -> LayerId {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            let i = idx as usize;
            self.generation[i] += 1;
            self.parent[i] = INVALID;
            self.first_child[i] = INVALID;
            self.next_sibling[i] = INVALID;
            self.prev_sibling[i] = INVALID;
            self.local_transform[i] = Transform3d::IDENTITY;
            self.content_bounds[i] = Bounds::EMPTY;
            self.clip[i] = None;
            self.effect[i] = None;
            self.flags[i] = LayerFlags::default();
            self.world_transform[i] = Transform3d::IDENTITY;
            self.effective_hidden[i] = false;
            self.subtree_bounds[i] = Bounds::EMPTY;
            self.transformed_bounds[i] = Bounds::EMPTY;
            self.dirty_bounds[i] = Bounds::EMPTY;
            self.removed_bounds[i].clear();
            idx
        } else {
            // Allocate a new slot.
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.local_transform.push(Transform3d::IDENTITY);
            self.content_bounds.push(Bounds::EMPTY);
            self.clip.push(None);
            self.effect.push(None);
            self.flags.push(LayerFlags::default());
            self.world_transform.push(Transform3d::IDENTITY);
            self.effective_hidden.push(false);
            self.subtree_bounds.push(Bounds::EMPTY);
            self.transformed_bounds.push(Bounds::EMPTY);
            self.dirty_bounds.push(Bounds::EMPTY);
            self.removed_bounds.push(Vec::new());
            self.generation.push(0);
            idx
        };

        self.traversal_dirty = true;
        self.pending_added.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);
        self.dirty.mark(idx, dirty::TRANSFORM);
        self.mark_repaint(idx);

        LayerId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys a layer, freeing its slot for reuse.
    ///
    /// If the layer is attached, its footprint is left on the parent so the
    /// vacated area repaints.
    ///
    /// # Panics
    ///
    /// Panics if the layer has children (remove them first) or if the handle
    /// is stale.
    pub fn destroy_layer(&mut self, id: LayerId) {
        self.validate(id);
        let idx = id.idx;
        assert!(
            self.first_child[idx as usize] == INVALID,
            "cannot destroy layer with children"
        );

        if self.parent[idx as usize] != INVALID {
            self.detach(idx);
        }

        // Remove dirty tracking dependencies and marks.
        self.dirty.remove_key(idx);
        self.dirty_bounds[idx as usize] = Bounds::EMPTY;
        self.removed_bounds[idx as usize].clear();

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;

        self.free_list.push(idx);
        self.traversal_dirty = true;
        self.pending_removed.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);
    }

    /// Returns whether the given handle refers to a live layer.
    #[must_use]
    pub fn is_alive(&self, id: LayerId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    /// Returns the number of allocated slots, live or free.
    ///
    /// Per-layer pass output indexed by [`LayerId::index`] needs this many
    /// entries.
    #[inline]
    #[must_use]
    pub fn slot_count(&self) -> u32 {
        self.len
    }

    // -- Topology API --

    /// Adds `child` as the last child of `parent`.
    ///
    /// The child's subtree is marked for transform recomputation and its new
    /// footprint for repaint.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, or if `child` already has a parent.
    pub fn add_child(&mut self, parent: LayerId, child: LayerId) {
        self.validate(parent);
        self.validate(child);
        assert!(
            self.parent[child.idx as usize] == INVALID,
            "child already has a parent"
        );
        self.append(parent.idx, child.idx);
    }

    /// Removes `child` from its current parent.
    ///
    /// The child's last footprint is left on the old parent so the vacated
    /// area repaints.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the layer has no parent.
    pub fn remove_from_parent(&mut self, child: LayerId) {
        self.validate(child);
        let c = child.idx;
        assert!(self.parent[c as usize] != INVALID, "layer has no parent");
        self.detach(c);
        self.dirty.mark_with(c, dirty::TRANSFORM, &EagerPolicy);
    }

    /// Moves `child` to be the last child of `new_parent`.
    ///
    /// If `child` already has a parent, it is removed first.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn reparent(&mut self, child: LayerId, new_parent: LayerId) {
        self.validate(child);
        self.validate(new_parent);
        if self.parent[child.idx as usize] != INVALID {
            self.detach(child.idx);
        }
        self.append(new_parent.idx, child.idx);
    }

    /// Inserts `child` before `sibling` in the sibling list.
    ///
    /// `child` must not already have a parent. `sibling` must have a parent.
    ///
    /// # Panics
    ///
    /// Panics if handles are stale, `child` already has a parent, or `sibling`
    /// has no parent.
    pub fn insert_before(&mut self, child: LayerId, sibling: LayerId) {
        self.validate(child);
        self.validate(sibling);
        let c = child.idx;
        let s = sibling.idx;
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );
        let p = self.parent[s as usize];
        assert!(p != INVALID, "sibling has no parent");

        self.parent[c as usize] = p;
        self.next_sibling[c as usize] = s;
        self.prev_sibling[c as usize] = self.prev_sibling[s as usize];

        if self.prev_sibling[s as usize] != INVALID {
            self.next_sibling[self.prev_sibling[s as usize] as usize] = c;
        } else {
            // `sibling` was the first child.
            self.first_child[p as usize] = c;
        }
        self.prev_sibling[s as usize] = c;

        self.attached(p, c);
    }

    /// Returns the parent of a layer, if any.
    #[must_use]
    pub fn parent(&self, id: LayerId) -> Option<LayerId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        if p == INVALID {
            None
        } else {
            Some(LayerId {
                idx: p,
                generation: self.generation[p as usize],
            })
        }
    }

    /// Returns an iterator over the direct children of a layer.
    #[must_use]
    pub fn children(&self, id: LayerId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.idx as usize])
    }

    /// Returns the root layers (those with no parent).
    #[must_use]
    pub fn roots(&self) -> Vec<LayerId> {
        let mut roots = Vec::new();
        for idx in 0..self.len {
            if self.parent[idx as usize] == INVALID && !self.free_list.contains(&idx) {
                roots.push(LayerId {
                    idx,
                    generation: self.generation[idx as usize],
                });
            }
        }
        roots
    }

    // -- Property getters (read-only, no dirty marking) --

    /// Returns the local transform of a layer.
    #[must_use]
    pub fn local_transform(&self, id: LayerId) -> Transform3d {
        self.validate(id);
        self.local_transform[id.idx as usize]
    }

    /// Returns the bounds of the layer's own content, in local space.
    #[must_use]
    pub fn content_bounds(&self, id: LayerId) -> Bounds {
        self.validate(id);
        self.content_bounds[id.idx as usize]
    }

    /// Returns the clip shape of a layer.
    #[must_use]
    pub fn clip(&self, id: LayerId) -> Option<ClipShape> {
        self.validate(id);
        self.clip[id.idx as usize]
    }

    /// Returns the effect attached to a layer.
    #[must_use]
    pub fn effect(&self, id: LayerId) -> Option<&Effect> {
        self.validate(id);
        self.effect[id.idx as usize].as_ref()
    }

    /// Returns the flags of a layer.
    #[must_use]
    pub fn flags(&self, id: LayerId) -> LayerFlags {
        self.validate(id);
        self.flags[id.idx as usize]
    }

    /// Returns the computed world transform of a layer.
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called.
    #[must_use]
    pub fn world_transform(&self, id: LayerId) -> Transform3d {
        self.validate(id);
        self.world_transform[id.idx as usize]
    }

    /// Returns whether the layer is effectively hidden (including by an
    /// ancestor's hidden flag).
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called.
    #[must_use]
    pub fn effective_hidden(&self, id: LayerId) -> bool {
        self.validate(id);
        self.effective_hidden[id.idx as usize]
    }

    /// Returns the union of the layer's content and its children's
    /// footprints, in local space, before effect and clip.
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called.
    #[must_use]
    pub fn subtree_bounds(&self, id: LayerId) -> Bounds {
        self.validate(id);
        self.subtree_bounds[id.idx as usize]
    }

    /// Returns the area the layer paints, in its parent's space.
    ///
    /// Empty when the layer is effectively hidden. Only valid after
    /// [`evaluate`](Self::evaluate) has been called.
    #[must_use]
    pub fn transformed_bounds(&self, id: LayerId) -> Bounds {
        self.validate(id);
        self.transformed_bounds[id.idx as usize]
    }

    /// Returns the area the layer paints, in world space.
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called.
    #[must_use]
    pub fn world_bounds(&self, id: LayerId) -> Bounds {
        self.validate(id);
        let idx = id.idx as usize;
        let p = self.parent[idx];
        if p == INVALID {
            self.transformed_bounds[idx]
        } else {
            self.transformed_bounds[idx].transform_by(&self.world_transform[p as usize])
        }
    }

    // -- Repaint state --

    /// Returns whether the layer's whole footprint must be repainted.
    #[must_use]
    pub fn needs_repaint(&self, id: LayerId) -> bool {
        self.validate(id);
        self.dirty.is_dirty(id.idx, dirty::PAINT)
    }

    /// Returns whether the layer or a descendant must be repainted.
    #[must_use]
    pub fn has_dirty_subtree(&self, id: LayerId) -> bool {
        self.validate(id);
        self.dirty.is_dirty(id.idx, dirty::SUBTREE)
    }

    /// Returns the footprint, in the parent's space, the layer painted before
    /// its pending changes.
    #[must_use]
    pub fn dirty_bounds(&self, id: LayerId) -> Bounds {
        self.validate(id);
        self.dirty_bounds[id.idx as usize]
    }

    /// Clears all repaint state after a frame has been drawn.
    pub fn clear_repaint(&mut self) {
        self.dirty.clear(dirty::PAINT);
        self.dirty.clear(dirty::SUBTREE);
        for b in &mut self.dirty_bounds {
            b.make_empty();
        }
        for removed in &mut self.removed_bounds {
            removed.clear();
        }
    }

    // -- Mutation API (auto-marks dirty) --

    /// Sets the local transform of a layer.
    ///
    /// Marks the TRANSFORM channel dirty with eager propagation to descendants.
    pub fn set_transform(&mut self, id: LayerId, transform: Transform3d) {
        self.validate(id);
        self.local_transform[id.idx as usize] = transform;
        self.dirty.mark_with(id.idx, dirty::TRANSFORM, &EagerPolicy);
        self.mark_repaint(id.idx);
    }

    /// Sets the bounds of the layer's own content, in local space.
    pub fn set_content_bounds(&mut self, id: LayerId, bounds: Bounds) {
        self.validate(id);
        self.content_bounds[id.idx as usize] = bounds;
        self.dirty.mark(id.idx, dirty::CONTENT);
        self.mark_repaint(id.idx);
    }

    /// Sets the clip shape of a layer.
    pub fn set_clip(&mut self, id: LayerId, clip: Option<ClipShape>) {
        self.validate(id);
        self.clip[id.idx as usize] = clip;
        self.dirty.mark(id.idx, dirty::CLIP);
        self.mark_repaint(id.idx);
    }

    /// Sets the effect of a layer.
    pub fn set_effect(&mut self, id: LayerId, effect: Option<Effect>) {
        self.validate(id);
        self.effect[id.idx as usize] = effect;
        self.dirty.mark(id.idx, dirty::EFFECT);
        self.mark_repaint(id.idx);
    }

    /// Sets the flags of a layer.
    pub fn set_flags(&mut self, id: LayerId, flags: LayerFlags) {
        self.validate(id);
        self.flags[id.idx as usize] = flags;
        // Hidden state is inherited, so it rides the TRANSFORM channel.
        self.dirty.mark_with(id.idx, dirty::TRANSFORM, &EagerPolicy);
        self.mark_repaint(id.idx);
    }

    /// Marks the layer's content as changed without changing its bounds.
    pub fn invalidate(&mut self, id: LayerId) {
        self.validate(id);
        self.mark_repaint(id.idx);
    }

    // -- Raw-index accessors for passes --
    //
    // These accept raw slot indices (as found in `FrameChanges`,
    // `traversal_order()`, or `Children`) rather than `LayerId` handles,
    // skipping generation validation.

    /// Returns the local transform at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn local_transform_at(&self, idx: u32) -> Transform3d {
        self.check_index(idx);
        self.local_transform[idx as usize]
    }

    /// Returns the computed world transform at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn world_transform_at(&self, idx: u32) -> Transform3d {
        self.check_index(idx);
        self.world_transform[idx as usize]
    }

    /// Returns whether the layer at raw slot `idx` is effectively hidden.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn effective_hidden_at(&self, idx: u32) -> bool {
        self.check_index(idx);
        self.effective_hidden[idx as usize]
    }

    /// Returns the clip shape at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn clip_at(&self, idx: u32) -> Option<ClipShape> {
        self.check_index(idx);
        self.clip[idx as usize]
    }

    /// Returns the effect at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn effect_at(&self, idx: u32) -> Option<&Effect> {
        self.check_index(idx);
        self.effect[idx as usize].as_ref()
    }

    /// Returns the content bounds at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn content_bounds_at(&self, idx: u32) -> Bounds {
        self.check_index(idx);
        self.content_bounds[idx as usize]
    }

    /// Returns the subtree bounds at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn subtree_bounds_at(&self, idx: u32) -> Bounds {
        self.check_index(idx);
        self.subtree_bounds[idx as usize]
    }

    /// Returns the painted footprint, in the parent's space, at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn transformed_bounds_at(&self, idx: u32) -> Bounds {
        self.check_index(idx);
        self.transformed_bounds[idx as usize]
    }

    /// Maps `local` (in the layer's own space, before effect and clip) to the
    /// area it paints in the parent's space at raw slot `idx`.
    ///
    /// Applies the layer's effect footprint, then its clip, then its local
    /// transform. Empty when the layer is effectively hidden.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn footprint_at(&self, idx: u32, local: Bounds) -> Bounds {
        self.check_index(idx);
        let i = idx as usize;
        if self.effective_hidden[i] {
            return Bounds::EMPTY;
        }
        let mut painted = match &self.effect[i] {
            Some(effect) => effect.bounds(local),
            None => local,
        };
        if let Some(clip) = &self.clip[i] {
            painted.intersect_with(clip.bounds());
        }
        painted.transform_by(&self.local_transform[i])
    }

    /// Returns the pre-change footprint at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn dirty_bounds_at(&self, idx: u32) -> Bounds {
        self.check_index(idx);
        self.dirty_bounds[idx as usize]
    }

    /// Returns the footprints of children detached from raw slot `idx` since
    /// the last [`clear_repaint`](Self::clear_repaint), in that layer's space.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn removed_bounds_at(&self, idx: u32) -> &[Bounds] {
        self.check_index(idx);
        &self.removed_bounds[idx as usize]
    }

    /// Returns whether the layer at raw slot `idx` must be repainted whole.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn needs_repaint_at(&self, idx: u32) -> bool {
        self.check_index(idx);
        self.dirty.is_dirty(idx, dirty::PAINT)
    }

    /// Returns whether the layer at raw slot `idx` or a descendant must be
    /// repainted.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn has_dirty_subtree_at(&self, idx: u32) -> bool {
        self.check_index(idx);
        self.dirty.is_dirty(idx, dirty::SUBTREE)
    }

    /// Returns an iterator over the children of raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn children_at(&self, idx: u32) -> Children<'_> {
        self.check_index(idx);
        Children::new(self, self.first_child[idx as usize])
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    fn validate(&self, id: LayerId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale LayerId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    /// Panics if `idx` is not an allocated slot.
    fn check_index(&self, idx: u32) {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
    }

    /// Records the current footprint as dirty and marks the layer for
    /// repaint, along with the trail of ancestors leading to it.
    fn mark_repaint(&mut self, idx: u32) {
        let old = self.transformed_bounds[idx as usize];
        self.dirty_bounds[idx as usize].union_with(old);
        self.dirty.mark(idx, dirty::PAINT);
        self.dirty.mark_with(idx, dirty::SUBTREE, &EagerPolicy);
    }

    /// Links `c` as the last child of `p`.
    fn append(&mut self, p: u32, c: u32) {
        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = INVALID;

        if self.first_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            // Walk to last child.
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }

        self.attached(p, c);
    }

    /// Dependency edges and dirty marks for a freshly linked child.
    fn attached(&mut self, p: u32, c: u32) {
        // Child depends on parent for TRANSFORM; parent on child for SUBTREE.
        let _ = self.dirty.add_dependency(c, p, dirty::TRANSFORM);
        let _ = self.dirty.add_dependency(p, c, dirty::SUBTREE);

        // Whatever `c` painted before belonged to another parent's space.
        self.dirty_bounds[c as usize] = Bounds::EMPTY;
        self.dirty.mark_with(c, dirty::TRANSFORM, &EagerPolicy);
        self.dirty.mark(c, dirty::PAINT);
        self.dirty.mark_with(c, dirty::SUBTREE, &EagerPolicy);

        self.traversal_dirty = true;
        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    /// Unlinks `c` from its parent, leaving its footprint behind for repaint.
    fn detach(&mut self, c: u32) {
        let p = self.parent[c as usize];
        let footprint = self.transformed_bounds[c as usize].union(self.dirty_bounds[c as usize]);
        if !footprint.is_empty() {
            self.removed_bounds[p as usize].push(footprint);
        }
        self.dirty_bounds[c as usize] = Bounds::EMPTY;

        self.unlink_from_parent(c);
        self.dirty.remove_dependency(c, p, dirty::TRANSFORM);
        self.dirty.remove_dependency(p, c, dirty::SUBTREE);

        self.dirty.mark_with(p, dirty::SUBTREE, &EagerPolicy);
        self.traversal_dirty = true;
        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    /// Removes `idx` from its parent's child list without touching dirty state.
    fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            // Was first child.
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }
}
