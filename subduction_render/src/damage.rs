// Copyright 2026 the Subduction Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatial damage tracking for partial re-rendering.

use alloc::vec::Vec;

use subduction_core::bounds::Bounds;
use subduction_core::region::DirtyRegions;

/// A region of the output that needs re-rendering.
///
/// Presenters can use this to limit buffer updates to the areas that
/// changed since the last frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum DamageRegion {
    /// The entire output needs redrawing.
    #[default]
    Full,
    /// A list of axis-aligned rectangles that need redrawing.
    ///
    /// Each rectangle is `[x, y, width, height]` in output-space pixels.
    Rects(Vec<[f32; 4]>),
    /// Nothing changed; the previous frame can be reused.
    None,
}

impl DamageRegion {
    /// Converts a frame's dirty regions into output damage.
    ///
    /// Rectangles are snapped outward to whole pixels. Damage that covers
    /// `viewport` is reported as [`Full`](Self::Full).
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "damage is reported in f32 pixel units"
    )]
    pub fn from_regions(regions: &DirtyRegions, viewport: Bounds) -> Self {
        if regions.is_empty() {
            return Self::None;
        }
        if regions.iter().any(|r| r.contains(&viewport)) {
            return Self::Full;
        }
        let rects = regions
            .as_slice()
            .iter()
            .map(|r| {
                let r = r.expand();
                [
                    r.x0 as f32,
                    r.y0 as f32,
                    r.width() as f32,
                    r.height() as f32,
                ]
            })
            .collect();
        Self::Rects(rects)
    }

    /// Returns `true` if no region needs redrawing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Merges another damage region into this one.
    pub fn merge(&mut self, other: &Self) {
        match (&*self, other) {
            (Self::Full, _) | (_, Self::Full) => *self = Self::Full,
            (Self::None, _) => *self = other.clone(),
            (_, Self::None) => {}
            (Self::Rects(a), Self::Rects(b)) => {
                let mut merged = a.clone();
                merged.extend_from_slice(b);
                *self = Self::Rects(merged);
            }
        }
    }
}
