// Copyright 2026 the Subduction Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Repaint configuration.

/// Configuration for the [`Repainter`](crate::Repainter).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RepaintConfig {
    /// Maximum number of dirty rectangles per frame.
    ///
    /// More rectangles fit damage more tightly; each one costs a pass over the
    /// tree when drawing.
    pub region_capacity: usize,
    /// Number of region containers preallocated for effect and clip groups.
    ///
    /// The pool grows past this when a frame nests deeper.
    pub pool_slots: usize,
    /// A group with more dirty children than this contributes its whole
    /// footprint instead of walking the children.
    pub dirty_children_threshold: usize,
    /// Whether each frame also repaints the previous frame's damage.
    ///
    /// Needed when presenting alternates between two buffers, so each buffer
    /// catches up on what changed while the other was shown.
    pub carry_previous_damage: bool,
}

impl RepaintConfig {
    /// Default number of dirty rectangles per frame.
    pub const DEFAULT_REGION_CAPACITY: usize = 6;

    /// Default dirty-children threshold.
    pub const DEFAULT_DIRTY_CHILDREN_THRESHOLD: usize = 12;

    /// Configuration for a target whose contents persist between frames.
    #[must_use]
    pub const fn single_buffered() -> Self {
        Self {
            region_capacity: Self::DEFAULT_REGION_CAPACITY,
            pool_slots: 4,
            dirty_children_threshold: Self::DEFAULT_DIRTY_CHILDREN_THRESHOLD,
            carry_previous_damage: false,
        }
    }

    /// Configuration for a target that flips between two buffers.
    #[must_use]
    pub const fn double_buffered() -> Self {
        Self {
            carry_previous_damage: true,
            ..Self::single_buffered()
        }
    }
}

impl Default for RepaintConfig {
    fn default() -> Self {
        Self::single_buffered()
    }
}
