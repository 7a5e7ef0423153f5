// Copyright 2026 the Subduction Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame orchestration of the repaint passes.
//!
//! A [`Repainter`] owns everything that survives between frames: the
//! configuration, the region pool, the finalized region container, the cull
//! map and the draw plan. Each frame runs:
//!
//! 1. **Evaluate**: [`LayerStore::evaluate_into`] recomputes transforms and
//!    bounds.
//! 2. **Accumulate**: [`accumulate`] collects the dirty area into a pooled
//!    container, together with any [`invalidate`](Repainter::invalidate)d
//!    rectangles. Damage covering the viewport becomes a full repaint.
//! 3. **Cull**: [`CullMap::mark`] classifies every layer against each
//!    region.
//! 4. **Plan**: [`RepaintPlan::build`] lists the layers to draw per region.
//!
//! [`finish_frame`](Repainter::finish_frame) clears the store's repaint state
//! once the plan has been drawn.

use alloc::vec::Vec;

use subduction_core::bounds::Bounds;
use subduction_core::layer::{FrameChanges, LayerId, LayerStore};
use subduction_core::pool::RegionPool;
use subduction_core::region::DirtyRegions;
use subduction_core::trace::{
    CullSummaryEvent, FrameSummary, PhaseBeginEvent, PhaseEndEvent, PhaseKind, RegionsEvent,
    Tracer,
};

use crate::accumulate::{Accumulation, accumulate};
use crate::config::RepaintConfig;
use crate::cull::CullMap;
use crate::damage::DamageRegion;
use crate::plan::RepaintPlan;

/// Drives the repaint passes for one layer tree.
#[derive(Debug)]
pub struct Repainter {
    config: RepaintConfig,
    pool: RegionPool,
    regions: DirtyRegions,
    previous: DirtyRegions,
    previous_full: bool,
    invalidations: Vec<Bounds>,
    changes: FrameChanges,
    cull: CullMap,
    plan: RepaintPlan,
    damage: DamageRegion,
    full_repaint: bool,
    frame_index: u64,
}

impl Repainter {
    /// Creates a repainter.
    ///
    /// # Panics
    ///
    /// Panics if `config.region_capacity` is zero.
    #[must_use]
    pub fn new(config: RepaintConfig) -> Self {
        Self {
            config,
            pool: RegionPool::new(config.pool_slots, config.region_capacity),
            regions: DirtyRegions::new(config.region_capacity),
            previous: DirtyRegions::new(config.region_capacity),
            previous_full: false,
            invalidations: Vec::new(),
            changes: FrameChanges::default(),
            cull: CullMap::new(),
            plan: RepaintPlan::new(),
            damage: DamageRegion::None,
            full_repaint: false,
            frame_index: 0,
        }
    }

    /// Returns the configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &RepaintConfig {
        &self.config
    }

    /// Index of the frame being prepared, counting from 0.
    #[inline]
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Queues rectangles, in pass space, to repaint next frame regardless of
    /// layer changes. Empty bounds are ignored.
    pub fn invalidate(&mut self, bounds: &[Bounds]) {
        self.invalidations
            .extend(bounds.iter().copied().filter(|b| !b.is_empty()));
    }

    /// The finalized dirty regions of the last prepared frame.
    #[must_use]
    pub fn regions(&self) -> &DirtyRegions {
        &self.regions
    }

    /// Whether the last prepared frame repaints the whole viewport.
    #[must_use]
    pub fn is_full_repaint(&self) -> bool {
        self.full_repaint
    }

    /// The cull map of the last prepared frame.
    #[must_use]
    pub fn cull_map(&self) -> &CullMap {
        &self.cull
    }

    /// The draw plan of the last prepared frame.
    #[must_use]
    pub fn plan(&self) -> &RepaintPlan {
        &self.plan
    }

    /// The output damage of the last prepared frame.
    #[must_use]
    pub fn damage(&self) -> &DamageRegion {
        &self.damage
    }

    /// The layer changes found by the last evaluation.
    #[must_use]
    pub fn changes(&self) -> &FrameChanges {
        &self.changes
    }

    /// Runs evaluate, accumulate, cull and plan for the tree under `root`.
    ///
    /// `viewport` is the visible area in pass space (the root's parent
    /// space). Returns the draw plan; an empty plan means nothing needs
    /// repainting.
    pub fn prepare_frame(
        &mut self,
        store: &mut LayerStore,
        root: LayerId,
        viewport: Bounds,
        tracer: &mut Tracer<'_>,
    ) -> &RepaintPlan {
        let frame_index = self.frame_index;

        begin(tracer, frame_index, PhaseKind::Evaluate);
        store.evaluate_into(&mut self.changes);
        end(tracer, frame_index, PhaseKind::Evaluate);
        #[cfg(feature = "trace-rich")]
        emit_layer_changes(tracer, frame_index, &self.changes);

        begin(tracer, frame_index, PhaseKind::Accumulate);
        let full = self.accumulate(store, root, viewport);
        end(tracer, frame_index, PhaseKind::Accumulate);
        self.full_repaint = full;
        tracer.regions(&RegionsEvent {
            frame_index,
            region_count: count(self.regions.len()),
            capacity: count(self.regions.max_space()),
            full_repaint: full,
        });

        begin(tracer, frame_index, PhaseKind::Cull);
        self.cull.mark(store, root, &self.regions, Some(viewport));
        end(tracer, frame_index, PhaseKind::Cull);
        let stats = self.cull.stats();
        tracer.cull_summary(&CullSummaryEvent {
            frame_index,
            nodes_visited: stats.nodes_visited,
            geometry_tests: stats.geometry_tests,
            inherited_inside: stats.inherited_inside,
            inherited_outside: stats.inherited_outside,
            culled: stats.culled,
        });

        begin(tracer, frame_index, PhaseKind::Plan);
        self.plan.build(store, root, &self.cull);
        end(tracer, frame_index, PhaseKind::Plan);

        self.damage = if full {
            DamageRegion::Full
        } else {
            DamageRegion::from_regions(&self.regions, viewport)
        };
        #[cfg(feature = "trace-rich")]
        {
            let rects: Vec<_> = self
                .regions
                .iter()
                .filter_map(subduction_core::trace::DamageRect::from_bounds)
                .collect();
            tracer.damage_rects(frame_index, &rects);
        }

        tracer.frame_summary(&FrameSummary {
            frame_index,
            changed_layers: count(changed_layers(&self.changes)),
            region_count: count(self.regions.len()),
            dirty_area: self.regions.iter().map(|r| r.area()).sum(),
            full_repaint: full,
            draw_items: count(self.plan.item_count()),
        });

        &self.plan
    }

    /// Clears the store's repaint state after the plan has been drawn and
    /// advances the frame index.
    pub fn finish_frame(&mut self, store: &mut LayerStore) {
        store.clear_repaint();
        self.frame_index += 1;
    }

    /// Fills `self.regions` for this frame. Returns whether the whole
    /// viewport must be repainted.
    fn accumulate(&mut self, store: &LayerStore, root: LayerId, viewport: Bounds) -> bool {
        let threshold = self.config.dirty_children_threshold;
        let carry = self.config.carry_previous_damage;
        self.pool.with_lease(|pool, scratch| {
            let mut status = accumulate(store, root, viewport, scratch, pool, threshold);
            for b in self.invalidations.drain(..) {
                if status == Accumulation::ContainsClip {
                    break;
                }
                if b.contains(&viewport) {
                    status = Accumulation::ContainsClip;
                } else {
                    scratch.add_dirty_region(b.intersect(viewport));
                }
            }

            let mut full = status == Accumulation::ContainsClip;
            if carry {
                // `previous` takes this frame's own damage; `scratch` is left
                // with the last frame's, then gets this frame's merged back in.
                core::mem::swap(&mut self.previous, scratch);
                scratch.merge(&self.previous);
                full |= self.previous_full;
                self.previous_full = status == Accumulation::ContainsClip;
            }

            if full {
                self.regions.derive_with_new_region(viewport);
            } else {
                self.regions.derive_with_container(scratch);
            }
            full
        })
    }
}

impl Default for Repainter {
    fn default() -> Self {
        Self::new(RepaintConfig::default())
    }
}

fn begin(tracer: &mut Tracer<'_>, frame_index: u64, phase: PhaseKind) {
    tracer.phase_begin(&PhaseBeginEvent { frame_index, phase });
}

fn end(tracer: &mut Tracer<'_>, frame_index: u64, phase: PhaseKind) {
    tracer.phase_end(&PhaseEndEvent { frame_index, phase });
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

fn changed_layers(changes: &FrameChanges) -> usize {
    changes.transforms.len()
        + changes.clips.len()
        + changes.content.len()
        + changes.effects.len()
        + changes.hidden.len()
        + changes.unhidden.len()
        + changes.added.len()
        + changes.removed.len()
}

#[cfg(feature = "trace-rich")]
fn emit_layer_changes(tracer: &mut Tracer<'_>, frame_index: u64, changes: &FrameChanges) {
    use subduction_core::trace::{LayerChange, LayerField};

    let groups: [(&[u32], LayerField); 8] = [
        (&changes.transforms, LayerField::Transform),
        (&changes.clips, LayerField::Clip),
        (&changes.content, LayerField::Content),
        (&changes.effects, LayerField::Effect),
        (&changes.hidden, LayerField::Flags),
        (&changes.unhidden, LayerField::Flags),
        (&changes.added, LayerField::Topology),
        (&changes.removed, LayerField::Topology),
    ];
    let mut out = Vec::new();
    for (indices, field) in groups {
        out.extend(indices.iter().map(|&layer_index| LayerChange { layer_index, field }));
    }
    tracer.layer_changes(frame_index, &out);
}
