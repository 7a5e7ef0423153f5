// Copyright 2026 the Subduction Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned bounds with an explicit empty state.
//!
//! [`Bounds`] is the geometric currency of the repaint pipeline. Every
//! operation treats degenerate input (zero area, inverted edges, NaN, or
//! infinities produced by a transform) as [`Bounds::EMPTY`] instead of
//! failing. Empty is absorbed by [`union`](Bounds::union) and absorbs in
//! [`intersect`](Bounds::intersect), so callers never special-case it.

use kurbo::{Affine, Point, Rect};

use crate::transform::Transform3d;

/// An axis-aligned rectangle, or nothing.
///
/// Equality compares coordinates; all empty bounds are equal.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds(Option<Rect>);

impl Bounds {
    /// Bounds that cover nothing.
    pub const EMPTY: Self = Self(None);

    /// Creates bounds from edge coordinates.
    ///
    /// Yields [`EMPTY`](Self::EMPTY) unless `x0 < x1` and `y0 < y1` and all
    /// four values are finite.
    #[must_use]
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::from_rect(Rect::new(x0, y0, x1, y1))
    }

    /// Creates bounds from a [`Rect`] without normalizing it.
    ///
    /// A rect with inverted or coincident edges is empty.
    #[must_use]
    pub fn from_rect(rect: Rect) -> Self {
        if rect.is_finite() && rect.x0 < rect.x1 && rect.y0 < rect.y1 {
            Self(Some(rect))
        } else {
            Self::EMPTY
        }
    }

    /// Returns the underlying rectangle, or `None` when empty.
    #[inline]
    #[must_use]
    pub const fn rect(self) -> Option<Rect> {
        self.0
    }

    /// Returns `true` if these bounds cover nothing.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Resets to [`EMPTY`](Self::EMPTY).
    #[inline]
    pub fn make_empty(&mut self) {
        self.0 = None;
    }

    /// Returns the area covered, `0.0` when empty.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.0.map_or(0.0, |r| r.area())
    }

    /// Returns the smallest bounds containing both.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        match (self.0, other.0) {
            (Some(a), Some(b)) => Self(Some(a.union(b))),
            (Some(_), None) => self,
            (None, _) => other,
        }
    }

    /// Grows `self` to contain `other`.
    #[inline]
    pub fn union_with(&mut self, other: Self) {
        *self = self.union(other);
    }

    /// Returns the overlap of both bounds.
    ///
    /// Disjoint or merely touching bounds intersect to empty.
    #[must_use]
    pub fn intersect(self, other: Self) -> Self {
        match (self.0, other.0) {
            (Some(a), Some(b)) => Self::from_rect(a.intersect(b)),
            _ => Self::EMPTY,
        }
    }

    /// Shrinks `self` to its overlap with `other`.
    #[inline]
    pub fn intersect_with(&mut self, other: Self) {
        *self = self.intersect(other);
    }

    /// Returns `true` if the two bounds overlap or share an edge.
    ///
    /// Empty bounds intersect nothing.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        match (self.0, other.0) {
            (Some(a), Some(b)) => {
                a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
            }
            _ => false,
        }
    }

    /// Returns `true` if `other` lies entirely within `self`.
    ///
    /// Empty bounds neither contain nor are contained by anything.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        match (self.0, other.0) {
            (Some(a), Some(b)) => a.x0 <= b.x0 && a.y0 <= b.y0 && b.x1 <= a.x1 && b.y1 <= a.y1,
            _ => false,
        }
    }

    /// Moves the bounds by `(dx, dy)`.
    #[must_use]
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        match self.0 {
            Some(r) => Self::from_rect(r + kurbo::Vec2::new(dx, dy)),
            None => self,
        }
    }

    /// Grows each edge outward by `dx` horizontally and `dy` vertically.
    ///
    /// Negative values shrink; shrinking past zero size yields empty.
    #[must_use]
    pub fn inflate(self, dx: f64, dy: f64) -> Self {
        match self.0 {
            Some(r) => Self::from_rect(Rect::new(r.x0 - dx, r.y0 - dy, r.x1 + dx, r.y1 + dy)),
            None => self,
        }
    }

    /// Returns the axis-aligned bounding box of the four corners mapped by a
    /// 2-D affine transform.
    #[must_use]
    pub fn transform_affine(self, affine: Affine) -> Self {
        match self.0 {
            Some(r) => Self::from_rect(affine.transform_rect_bbox(r)),
            None => self,
        }
    }

    /// Returns the axis-aligned bounding box of the four corners mapped by
    /// `transform`, including the perspective divide.
    ///
    /// If any corner projects behind the eye plane or to a non-finite point,
    /// the result is empty.
    #[must_use]
    pub fn transform_by(self, transform: &Transform3d) -> Self {
        let Some(r) = self.0 else {
            return self;
        };
        if let Some(affine) = transform.to_affine() {
            return self.transform_affine(affine);
        }
        let corners = [
            Point::new(r.x0, r.y0),
            Point::new(r.x1, r.y0),
            Point::new(r.x1, r.y1),
            Point::new(r.x0, r.y1),
        ];
        let mut out: Option<Rect> = None;
        for corner in corners {
            let Some(p) = transform.transform_point(corner) else {
                return Self::EMPTY;
            };
            out = Some(match out {
                Some(acc) => acc.union_pt(p),
                None => Rect::from_points(p, p),
            });
        }
        out.map_or(Self::EMPTY, Self::from_rect)
    }
}

impl From<Rect> for Bounds {
    fn from(rect: Rect) -> Self {
        Self::from_rect(rect)
    }
}
