// Copyright 2026 the Subduction Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-region accumulation.
//!
//! Collects the areas that changed since the last frame into a
//! [`DirtyRegions`] container in pass space (the root's parent space).
//!
//! The walk follows the `SUBTREE` trail down from the root and only enters
//! branches that contain a repainted layer:
//!
//! - A layer marked for repaint contributes its old and new footprints (and
//!   those of any detached children) and the walk does not descend further.
//! - A group whose children contributed more than the configured threshold
//!   contributes its whole footprint instead.
//! - A group with an effect accumulates its children in its own space into a
//!   pooled container, maps that through the effect, its clip, and its
//!   transform, and merges the result. Child damage is only clipped after
//!   the effect has been applied, since offsets, shadows and blur margins
//!   can carry damage from outside the pass into it. Effects that keep every
//!   pixel in place are clipped early.
//! - A group with a clip accumulates its children against the narrowed clip
//!   into a pooled container. If a child covers that clip, the group's whole
//!   footprint is used instead.
//!
//! Whenever a contribution covers the whole pass clip the walk stops early
//! with [`Accumulation::ContainsClip`].

use subduction_core::bounds::Bounds;
use subduction_core::effect::Effect;
use subduction_core::layer::{LayerId, LayerStore};
use subduction_core::pool::RegionPool;
use subduction_core::region::DirtyRegions;
use subduction_core::transform::Transform3d;

/// Outcome of an accumulation walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Accumulation {
    /// The dirty area was added to the container.
    Ok,
    /// Some dirty area covers the whole clip. The container may be partially
    /// filled and should be replaced by the clip.
    ContainsClip,
}

/// Accumulates the dirty area of the tree under `root` into `regions`.
///
/// `clip` bounds the pass (usually the viewport) and every stored rectangle
/// is clipped to it. Containers borrowed from `pool` are returned before
/// this returns. Groups with more than `dirty_children_threshold` dirty
/// children contribute their whole footprint.
pub fn accumulate(
    store: &LayerStore,
    root: LayerId,
    clip: Bounds,
    regions: &mut DirtyRegions,
    pool: &mut RegionPool,
    dirty_children_threshold: usize,
) -> Accumulation {
    assert!(store.is_alive(root), "stale LayerId: {root:?}");
    let mut acc = Accumulator {
        store,
        pool,
        threshold: dirty_children_threshold,
    };
    acc.layer(root.index(), Some(clip), &Transform3d::IDENTITY, regions)
}

struct Accumulator<'a> {
    store: &'a LayerStore,
    pool: &'a mut RegionPool,
    threshold: usize,
}

impl Accumulator<'_> {
    /// `tx` maps the layer's parent space to pass space. A `clip` of `None`
    /// keeps every contribution whole.
    fn layer(
        &mut self,
        idx: u32,
        clip: Option<Bounds>,
        tx: &Transform3d,
        out: &mut DirtyRegions,
    ) -> Accumulation {
        if !self.store.has_dirty_subtree_at(idx) {
            return Accumulation::Ok;
        }
        if self.store.needs_repaint_at(idx) {
            return self.node(idx, clip, tx, out);
        }
        self.group(idx, clip, tx, out)
    }

    fn node(
        &self,
        idx: u32,
        clip: Option<Bounds>,
        tx: &Transform3d,
        out: &mut DirtyRegions,
    ) -> Accumulation {
        add_clipped(node_dirty_bounds(self.store, idx).transform_by(tx), clip, out)
    }

    fn group(
        &mut self,
        idx: u32,
        clip: Option<Bounds>,
        tx: &Transform3d,
        out: &mut DirtyRegions,
    ) -> Accumulation {
        let store = self.store;
        let dirty_children = store
            .children_at(idx)
            .filter(|c| store.has_dirty_subtree_at(c.index()))
            .count()
            + store.removed_bounds_at(idx).len();
        if dirty_children > self.threshold {
            return self.node(idx, clip, tx, out);
        }

        let render_tx = *tx * store.local_transform_at(idx);

        if let Some(effect) = store.effect_at(idx) {
            return self.effect_group(idx, effect, clip, tx, &render_tx, out);
        }

        if let Some(shape) = store.clip_at(idx) {
            let shape = shape.bounds().transform_by(&render_tx);
            let narrowed = match clip {
                Some(clip) => shape.intersect(clip),
                None => shape,
            };
            return self.pool.with_lease(|pool, scratch| {
                let mut inner = Accumulator {
                    store,
                    pool,
                    threshold: self.threshold,
                };
                match inner.children(idx, Some(narrowed), &render_tx, scratch) {
                    Accumulation::ContainsClip => inner.node(idx, clip, tx, out),
                    Accumulation::Ok => {
                        out.merge(scratch);
                        Accumulation::Ok
                    }
                }
            });
        }

        self.children(idx, clip, &render_tx, out)
    }

    fn effect_group(
        &mut self,
        idx: u32,
        effect: &Effect,
        clip: Option<Bounds>,
        tx: &Transform3d,
        render_tx: &Transform3d,
        out: &mut DirtyRegions,
    ) -> Accumulation {
        // Children are gathered in the group's own space, and the result is
        // mapped back out; that needs an invertible 2-D transform.
        let Some(affine) = render_tx
            .to_affine()
            .filter(|a| a.determinant() != 0.0 && a.determinant().is_finite())
        else {
            return self.node(idx, clip, tx, out);
        };
        let local_clip = if effect.moves_pixels() {
            None
        } else {
            clip.map(|c| c.transform_affine(affine.inverse()))
        };

        let store = self.store;
        let threshold = self.threshold;
        self.pool.with_lease(|pool, gathered| {
            let mut inner = Accumulator {
                store,
                pool,
                threshold,
            };
            if inner.children(idx, local_clip, &Transform3d::IDENTITY, gathered)
                == Accumulation::ContainsClip
            {
                return Accumulation::ContainsClip;
            }
            inner.pool.with_lease(|pool, mapped| {
                effect.propagate(store.subtree_bounds_at(idx), gathered, mapped, pool);
                if let Some(shape) = store.clip_at(idx) {
                    mapped.intersect_with(shape.bounds());
                }
                mapped.transform_by(render_tx);
                let Some(clip) = clip else {
                    out.merge(mapped);
                    return Accumulation::Ok;
                };
                if mapped.iter().any(|r| r.contains(&clip)) {
                    return Accumulation::ContainsClip;
                }
                mapped.intersect_with(clip);
                out.merge(mapped);
                Accumulation::Ok
            })
        })
    }

    /// Detached children first, then live children in paint order.
    fn children(
        &mut self,
        idx: u32,
        clip: Option<Bounds>,
        tx: &Transform3d,
        out: &mut DirtyRegions,
    ) -> Accumulation {
        let store = self.store;
        for removed in store.removed_bounds_at(idx).iter().rev() {
            if add_clipped(removed.transform_by(tx), clip, out) == Accumulation::ContainsClip {
                return Accumulation::ContainsClip;
            }
        }
        for child in store.children_at(idx) {
            if self.layer(child.index(), clip, tx, out) == Accumulation::ContainsClip {
                return Accumulation::ContainsClip;
            }
        }
        Accumulation::Ok
    }
}

/// Old and new footprint of a layer in its parent's space, including the
/// footprints of its detached children.
fn node_dirty_bounds(store: &LayerStore, idx: u32) -> Bounds {
    let mut bounds = store
        .dirty_bounds_at(idx)
        .union(store.transformed_bounds_at(idx));
    for &removed in store.removed_bounds_at(idx) {
        bounds.union_with(store.footprint_at(idx, removed));
    }
    bounds
}

fn add_clipped(region: Bounds, clip: Option<Bounds>, out: &mut DirtyRegions) -> Accumulation {
    let Some(clip) = clip else {
        out.add_dirty_region(region);
        return Accumulation::Ok;
    };
    if region.is_empty() || !region.intersects(&clip) {
        return Accumulation::Ok;
    }
    if region.contains(&clip) {
        return Accumulation::ContainsClip;
    }
    out.add_dirty_region(region.intersect(clip));
    Accumulation::Ok
}
