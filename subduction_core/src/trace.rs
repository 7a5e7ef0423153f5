// Copyright 2026 the Subduction Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the repaint passes.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! the repaint passes call at each stage. All method bodies default to
//! no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates [`LayerChange`] and [`DamageRect`]
//!   events plus the corresponding `TraceSink` methods.

#[cfg(all(feature = "trace-rich", not(feature = "std")))]
use kurbo::common::FloatFuncs as _;

#[cfg(feature = "trace-rich")]
use crate::bounds::Bounds;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which phase of the repaint pipeline is being measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Layer tree evaluation (dirty propagation, world transforms, bounds).
    Evaluate,
    /// Dirty-region accumulation over the changed subtrees.
    Accumulate,
    /// Marking each layer against the frame's dirty regions.
    Cull,
    /// Building the per-region draw lists.
    Plan,
}

/// Which property of a layer changed.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerField {
    /// Local or world transform.
    Transform,
    /// Clip region.
    Clip,
    /// Content bounds.
    Content,
    /// Attached effect.
    Effect,
    /// Layer flags.
    Flags,
    /// Topology (parent/child relationships).
    Topology,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Marks the beginning of a repaint phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseBeginEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which phase is starting.
    pub phase: PhaseKind,
}

/// Marks the end of a repaint phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseEndEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which phase is ending.
    pub phase: PhaseKind,
}

/// Emitted once the frame's dirty regions are final.
#[derive(Clone, Copy, Debug)]
pub struct RegionsEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Number of dirty regions.
    pub region_count: u32,
    /// Region capacity of the container.
    pub capacity: u32,
    /// Whether a single region covers the whole viewport.
    pub full_repaint: bool,
}

/// Work counters from the cull pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CullSummaryEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Layers whose state was written.
    pub nodes_visited: u32,
    /// Layer-versus-region geometry tests performed.
    pub geometry_tests: u32,
    /// Decisions inherited from a parent that was fully inside.
    pub inherited_inside: u32,
    /// Decisions inherited from a parent that was fully outside.
    pub inherited_outside: u32,
    /// Layers outside every region.
    pub culled: u32,
}

/// Per-frame summary emitted after the draw plan is built.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameSummary {
    /// Frame counter.
    pub frame_index: u64,
    /// Layers touched by evaluation.
    pub changed_layers: u32,
    /// Number of dirty regions.
    pub region_count: u32,
    /// Sum of region areas.
    pub dirty_area: f64,
    /// Whether a single region covers the whole viewport.
    pub full_repaint: bool,
    /// Draw items across all region passes.
    pub draw_items: u32,
}

/// A per-frame layer change record.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct LayerChange {
    /// Index of the layer that changed.
    pub layer_index: u32,
    /// Which field changed.
    pub field: LayerField,
}

/// An axis-aligned damage rectangle in whole pixels.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

#[cfg(feature = "trace-rich")]
impl DamageRect {
    /// Snaps `bounds` outward to whole pixels, or `None` when empty.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "damage is reported in pixel units"
    )]
    pub fn from_bounds(bounds: Bounds) -> Option<Self> {
        let r = bounds.rect()?;
        let x0 = r.x0.floor();
        let y0 = r.y0.floor();
        Some(Self {
            x: x0 as i32,
            y: y0 as i32,
            width: (r.x1.ceil() - x0) as u32,
            height: (r.y1.ceil() - y0) as u32,
        })
    }
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the repaint passes.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called at the beginning of a repaint phase.
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        _ = e;
    }

    /// Called at the end of a repaint phase.
    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        _ = e;
    }

    /// Called once the frame's dirty regions are final.
    fn on_regions(&mut self, e: &RegionsEvent) {
        _ = e;
    }

    /// Called with the cull pass counters.
    fn on_cull_summary(&mut self, e: &CullSummaryEvent) {
        _ = e;
    }

    /// Called with a per-frame summary.
    fn on_frame_summary(&mut self, s: &FrameSummary) {
        _ = s;
    }

    /// Called with per-frame layer changes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_layer_changes(&mut self, frame_index: u64, changes: &[LayerChange]) {
        _ = (frame_index, changes);
    }

    /// Called with per-frame damage rectangles (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_damage_rects(&mut self, frame_index: u64, rects: &[DamageRect]) {
        _ = (frame_index, rects);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`PhaseBeginEvent`].
    #[inline]
    pub fn phase_begin(&mut self, e: &PhaseBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseEndEvent`].
    #[inline]
    pub fn phase_end(&mut self, e: &PhaseEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RegionsEvent`].
    #[inline]
    pub fn regions(&mut self, e: &RegionsEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_regions(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CullSummaryEvent`].
    #[inline]
    pub fn cull_summary(&mut self, e: &CullSummaryEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_cull_summary(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameSummary`].
    #[inline]
    pub fn frame_summary(&mut self, s: &FrameSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_frame_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits layer changes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn layer_changes(&mut self, frame_index: u64, changes: &[LayerChange]) {
        if let Some(s) = &mut self.sink {
            s.on_layer_changes(frame_index, changes);
        }
    }

    /// Emits damage rectangles (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn damage_rects(&mut self, frame_index: u64, rects: &[DamageRect]) {
        if let Some(s) = &mut self.sink {
            s.on_damage_rects(frame_index, rects);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
