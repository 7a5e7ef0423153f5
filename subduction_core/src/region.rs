// Copyright 2026 the Subduction Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-capacity sets of non-overlapping dirty rectangles.
//!
//! A [`DirtyRegions`] container approximates the union of everything that
//! was invalidated during a pass with at most [`max_space`] rectangles. The
//! container alone maintains its invariants:
//!
//! - stored rectangles never overlap or touch (an incoming rectangle absorbs
//!   every stored rectangle it meets, repeatedly, until it meets none);
//! - the count never exceeds [`max_space`]. When the container is full, an
//!   incoming rectangle is merged into the stored rectangle whose bounding
//!   union with it wastes the least area.
//!
//! Neither rule ever shrinks the covered area. Precision degrades when
//! capacity runs out; coverage does not.
//!
//! [`max_space`]: DirtyRegions::max_space

use alloc::vec::Vec;
use core::fmt;

use kurbo::Rect;

use crate::bounds::Bounds;
use crate::transform::Transform3d;

/// Error returned by fallible indexed access into a [`DirtyRegions`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegionError {
    /// The index was not in `0..len`.
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of stored regions.
        len: usize,
    },
}

impl fmt::Display for RegionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "region index {index} out of range (len {len})")
            }
        }
    }
}

impl core::error::Error for RegionError {}

/// A capacity-bounded set of non-overlapping dirty rectangles.
///
/// Order carries no meaning beyond determinism.
#[derive(Clone, Debug, PartialEq)]
pub struct DirtyRegions {
    regions: Vec<Rect>,
    max_space: usize,
}

impl DirtyRegions {
    /// Creates an empty container holding at most `max_space` rectangles.
    ///
    /// # Panics
    ///
    /// Panics if `max_space` is zero.
    #[must_use]
    pub fn new(max_space: usize) -> Self {
        assert!(max_space > 0, "region capacity must be at least 1");
        Self {
            regions: Vec::with_capacity(max_space + 1),
            max_space,
        }
    }

    /// Returns the fixed capacity.
    #[inline]
    #[must_use]
    pub const fn max_space(&self) -> usize {
        self.max_space
    }

    /// Returns the number of stored rectangles.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Returns `true` if nothing is dirty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Returns the stored rectangle at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[must_use]
    pub fn dirty_region(&self, index: usize) -> Bounds {
        match self.try_dirty_region(index) {
            Ok(b) => b,
            Err(e) => panic!("{e}"),
        }
    }

    /// Returns the stored rectangle at `index`, or an error if out of range.
    pub fn try_dirty_region(&self, index: usize) -> Result<Bounds, RegionError> {
        self.regions
            .get(index)
            .map(|r| Bounds::from_rect(*r))
            .ok_or(RegionError::IndexOutOfRange {
                index,
                len: self.regions.len(),
            })
    }

    /// Returns the stored rectangle at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Bounds> {
        self.regions.get(index).map(|r| Bounds::from_rect(*r))
    }

    /// Returns the stored rectangles.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Rect] {
        &self.regions
    }

    /// Iterates over the stored rectangles.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Bounds> + '_ {
        self.regions.iter().map(|r| Bounds::from_rect(*r))
    }

    /// Returns the bounding box of every stored rectangle.
    #[must_use]
    pub fn union_bounds(&self) -> Bounds {
        self.iter().fold(Bounds::EMPTY, Bounds::union)
    }

    /// Removes every stored rectangle.
    #[inline]
    pub fn reset(&mut self) {
        self.regions.clear();
    }

    /// Replaces the contents with `regions`, merged down to capacity.
    ///
    /// `None` or an empty slice means "no new information": the current
    /// contents are kept.
    pub fn derive_with_new_regions(&mut self, regions: Option<&[Bounds]>) {
        let Some(regions) = regions else {
            return;
        };
        if regions.is_empty() {
            return;
        }
        self.regions.clear();
        for &region in regions {
            self.add_dirty_region(region);
        }
    }

    /// Replaces the contents with a single rectangle.
    pub fn derive_with_new_region(&mut self, region: Bounds) {
        self.regions.clear();
        self.add_dirty_region(region);
    }

    /// Replaces the contents with those of `other`, merged down to this
    /// container's capacity.
    pub fn derive_with_container(&mut self, other: &Self) {
        self.regions.clear();
        self.merge(other);
    }

    /// Adds one rectangle, keeping the set non-overlapping and within
    /// capacity. Empty bounds are ignored.
    pub fn add_dirty_region(&mut self, region: Bounds) {
        if let Some(rect) = region.rect() {
            self.insert(rect);
        }
    }

    /// Adds every rectangle of `other`.
    pub fn merge(&mut self, other: &Self) {
        for &rect in &other.regions {
            self.insert(rect);
        }
    }

    /// Grows every rectangle by `h` horizontally and `v` vertically on each
    /// side, merging any that come to overlap.
    pub fn grow(&mut self, h: f64, v: f64) {
        if h == 0.0 && v == 0.0 {
            return;
        }
        self.rebuild(|r| Bounds::from_rect(r).inflate(h, v));
    }

    /// Moves every rectangle by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        self.rebuild(|r| Bounds::from_rect(r).translate(dx, dy));
    }

    /// Clips every rectangle to `clip`, dropping those left empty.
    pub fn intersect_with(&mut self, clip: Bounds) {
        let Some(clip) = clip.rect() else {
            self.regions.clear();
            return;
        };
        self.regions.retain_mut(|r| {
            let i = r.intersect(clip);
            if Bounds::from_rect(i).is_empty() {
                false
            } else {
                *r = i;
                true
            }
        });
    }

    /// Maps every rectangle through `transform`, taking bounding boxes and
    /// merging any that come to overlap.
    pub fn transform_by(&mut self, transform: &Transform3d) {
        if transform.is_identity() {
            return;
        }
        self.rebuild(|r| Bounds::from_rect(r).transform_by(transform));
    }

    /// Re-inserts every rectangle after mapping it through `f`.
    fn rebuild(&mut self, f: impl Fn(Rect) -> Bounds) {
        let old = core::mem::take(&mut self.regions);
        for rect in old {
            if let Some(mapped) = f(rect).rect() {
                self.insert(mapped);
            }
        }
    }

    fn insert(&mut self, rect: Rect) {
        let mut rect = self.absorb_overlapping(rect);
        if self.regions.len() == self.max_space {
            let nearest = self.cheapest_neighbour(rect);
            let stored = self.regions.swap_remove(nearest);
            rect = self.absorb_overlapping(rect.union(stored));
        }
        self.regions.push(rect);
    }

    /// Removes every stored rectangle that meets `rect`, returning the
    /// bounding union. Repeats until the union meets nothing, since each
    /// absorption can grow it into rectangles skipped earlier.
    fn absorb_overlapping(&mut self, mut rect: Rect) -> Rect {
        loop {
            let mut absorbed = false;
            let mut i = 0;
            while i < self.regions.len() {
                if touches(rect, self.regions[i]) {
                    rect = rect.union(self.regions.swap_remove(i));
                    absorbed = true;
                } else {
                    i += 1;
                }
            }
            if !absorbed {
                return rect;
            }
        }
    }

    /// Returns the index of the stored rectangle whose union with `rect`
    /// wastes the least area. Ties go to the lowest index.
    fn cheapest_neighbour(&self, rect: Rect) -> usize {
        let mut best = 0;
        let mut best_cost = f64::INFINITY;
        for (i, &stored) in self.regions.iter().enumerate() {
            let cost = rect.union(stored).area() - rect.area() - stored.area();
            if cost < best_cost {
                best_cost = cost;
                best = i;
            }
        }
        best
    }
}

fn touches(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}
