// Copyright 2026 the Subduction Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clip shape types for layer clipping.

use kurbo::Shape;

use crate::bounds::Bounds;

/// A shape used to clip a layer's content and descendants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClipShape {
    /// An axis-aligned rectangle.
    Rect(kurbo::Rect),
    /// A rectangle with rounded corners.
    RoundedRect(kurbo::RoundedRect),
}

impl ClipShape {
    /// Returns the axis-aligned bounds of the clip in the layer's local space.
    ///
    /// Rounded corners are ignored, so the result may over-approximate.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        match self {
            Self::Rect(r) => Bounds::from_rect(*r),
            Self::RoundedRect(rr) => Bounds::from_rect(rr.bounding_box()),
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Rect, RoundedRect};

    use super::*;

    #[test]
    fn rounded_rect_uses_outer_box() {
        let clip = ClipShape::RoundedRect(RoundedRect::new(0.0, 0.0, 40.0, 20.0, 5.0));
        assert_eq!(clip.bounds(), Bounds::new(0.0, 0.0, 40.0, 20.0));
        assert_eq!(
            ClipShape::Rect(Rect::new(1.0, 2.0, 3.0, 4.0)).bounds(),
            Bounds::new(1.0, 2.0, 3.0, 4.0)
        );
    }
}
