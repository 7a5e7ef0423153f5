// Copyright 2026 the Subduction Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visual effects and their spatial footprint.
//!
//! An [`Effect`] is a tree: most kinds wrap one input, [`Effect::Blend`]
//! wraps two and [`Effect::Merge`] any number. [`Effect::Source`] is the
//! leaf standing for the layer's own rendered content.
//!
//! Pixel-level rendering is out of scope. This module only answers two
//! geometric questions:
//!
//! - [`Effect::bounds`]: where can the effect paint, given the content
//!   bounds?
//! - [`Effect::propagate`]: which output pixels can change, given the dirty
//!   rectangles of the content?
//!
//! Propagation is pure and composes innermost first: every variant
//! propagates its input(s) before applying its own kernel.
//!
//! # Kernel margins
//!
//! | Kind | Horizontal / vertical pad |
//! |---|---|
//! | Gaussian blur | `ceil(radius)` |
//! | Box blur | `((size - 1) * iterations + 1) / 2`, `size = round(width \| height)` |
//! | Motion blur | `ceil(abs(cos a) * r)` / `ceil(abs(sin a) * r)` |
//! | Shadows | `ceil(radius + spread)`, after shifting by the offset |

use alloc::boxed::Box;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::bounds::Bounds;
use crate::pool::RegionPool;
use crate::region::DirtyRegions;

/// Slack subtracted before rounding a margin up, so that values such as
/// `cos(90°) * r` do not round to a whole pixel.
const PAD_EPSILON: f64 = 1e-9;

/// How a [`Effect::Blend`] combines its inputs.
///
/// The footprint of every mode is the union of both inputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Standard source-over alpha compositing.
    #[default]
    SourceOver,
    /// Multiply blend.
    Multiply,
    /// Screen blend.
    Screen,
    /// Overlay blend.
    Overlay,
    /// Keep the darker of the two inputs.
    Darken,
    /// Keep the lighter of the two inputs.
    Lighten,
    /// Additive blend.
    Add,
    /// Absolute difference.
    Difference,
}

/// Shared parameters of the shadow family.
#[derive(Clone, Debug, PartialEq)]
pub struct ShadowParams {
    /// Blur radius of the shadow, in pixels.
    pub radius: f64,
    /// Extra growth of the shadow shape, in pixels.
    pub spread: f64,
    /// Horizontal shift of the shadow.
    pub offset_x: f64,
    /// Vertical shift of the shadow.
    pub offset_y: f64,
    /// The shadow's input.
    pub input: Box<Effect>,
}

impl ShadowParams {
    /// Creates parameters over the layer content.
    #[must_use]
    pub fn new(radius: f64, spread: f64, offset_x: f64, offset_y: f64) -> Self {
        Self {
            radius,
            spread,
            offset_x,
            offset_y,
            input: Box::new(Effect::Source),
        }
    }

    fn pad(&self) -> f64 {
        kernel_pad(self.radius + self.spread)
    }
}

/// A node in an effect tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Effect {
    /// The layer's own content.
    #[default]
    Source,
    /// Gaussian blur.
    GaussianBlur {
        /// Blur radius in pixels.
        radius: f64,
        /// Input effect.
        input: Box<Self>,
    },
    /// Repeated box blur.
    BoxBlur {
        /// Kernel width in pixels.
        width: f64,
        /// Kernel height in pixels.
        height: f64,
        /// Number of passes.
        iterations: u32,
        /// Input effect.
        input: Box<Self>,
    },
    /// Directional blur.
    MotionBlur {
        /// Blur length in pixels.
        radius: f64,
        /// Direction in degrees.
        angle: f64,
        /// Input effect.
        input: Box<Self>,
    },
    /// Content plus a blurred, shifted copy behind it.
    DropShadow(ShadowParams),
    /// Shadow painted inside the content's own bounds.
    InnerShadow(ShadowParams),
    /// Blurred silhouette replacing the content.
    Shadow {
        /// Blur radius in pixels.
        radius: f64,
        /// Extra growth in pixels.
        spread: f64,
        /// Input effect.
        input: Box<Self>,
    },
    /// Brightens the content in place.
    Glow {
        /// Glow intensity.
        level: f64,
        /// Input effect.
        input: Box<Self>,
    },
    /// Per-pixel color adjustment.
    ColorAdjust {
        /// Hue shift.
        hue: f64,
        /// Saturation change.
        saturation: f64,
        /// Brightness change.
        brightness: f64,
        /// Contrast change.
        contrast: f64,
        /// Input effect.
        input: Box<Self>,
    },
    /// Sepia toning.
    SepiaTone {
        /// Toning intensity.
        level: f64,
        /// Input effect.
        input: Box<Self>,
    },
    /// Restricts the input to a rectangle.
    Crop {
        /// Visible area.
        rect: Bounds,
        /// Input effect.
        input: Box<Self>,
    },
    /// Shifts the input.
    Offset {
        /// Horizontal shift.
        dx: f64,
        /// Vertical shift.
        dy: f64,
        /// Input effect.
        input: Box<Self>,
    },
    /// Composites `top` over `bottom`.
    Blend {
        /// Compositing mode.
        mode: BlendMode,
        /// Upper input.
        top: Box<Self>,
        /// Lower input.
        bottom: Box<Self>,
    },
    /// Composites every input in order.
    Merge {
        /// Inputs, bottom first.
        inputs: Vec<Self>,
    },
    /// The input with a mirrored copy below it.
    Reflection {
        /// Gap between the input and its reflection.
        top_offset: f64,
        /// Fraction of the input height that is reflected, `0.0..=1.0`.
        fraction: f64,
        /// Input effect.
        input: Box<Self>,
    },
    /// A constant-color rectangle; ignores the content.
    ColorInput {
        /// Painted area.
        rect: Bounds,
    },
}

impl Effect {
    /// Gaussian blur of the content.
    #[must_use]
    pub fn gaussian_blur(radius: f64) -> Self {
        Self::GaussianBlur {
            radius,
            input: Box::new(Self::Source),
        }
    }

    /// Box blur of the content.
    #[must_use]
    pub fn box_blur(width: f64, height: f64, iterations: u32) -> Self {
        Self::BoxBlur {
            width,
            height,
            iterations,
            input: Box::new(Self::Source),
        }
    }

    /// Motion blur of the content.
    #[must_use]
    pub fn motion_blur(radius: f64, angle: f64) -> Self {
        Self::MotionBlur {
            radius,
            angle,
            input: Box::new(Self::Source),
        }
    }

    /// Drop shadow of the content.
    #[must_use]
    pub fn drop_shadow(radius: f64, spread: f64, offset_x: f64, offset_y: f64) -> Self {
        Self::DropShadow(ShadowParams::new(radius, spread, offset_x, offset_y))
    }

    /// Crop of the content.
    #[must_use]
    pub fn crop(rect: Bounds) -> Self {
        Self::Crop {
            rect,
            input: Box::new(Self::Source),
        }
    }

    /// Offset of the content.
    #[must_use]
    pub fn offset(dx: f64, dy: f64) -> Self {
        Self::Offset {
            dx,
            dy,
            input: Box::new(Self::Source),
        }
    }

    /// Blend of two effects.
    #[must_use]
    pub fn blend(mode: BlendMode, top: Self, bottom: Self) -> Self {
        Self::Blend {
            mode,
            top: Box::new(top),
            bottom: Box::new(bottom),
        }
    }

    /// Returns the area this effect can paint when the content occupies
    /// `content`.
    #[must_use]
    pub fn bounds(&self, content: Bounds) -> Bounds {
        match self {
            Self::Source => content,
            Self::GaussianBlur { radius, input } => {
                let pad = kernel_pad(*radius);
                input.bounds(content).inflate(pad, pad)
            }
            Self::BoxBlur {
                width,
                height,
                iterations,
                input,
            } => input.bounds(content).inflate(
                box_pad(*width, *iterations),
                box_pad(*height, *iterations),
            ),
            Self::MotionBlur {
                radius,
                angle,
                input,
            } => {
                let (h, v) = motion_pad(*radius, *angle);
                input.bounds(content).inflate(h, v)
            }
            Self::DropShadow(s) => {
                let inner = s.input.bounds(content);
                let pad = s.pad();
                inner.union(inner.translate(s.offset_x, s.offset_y).inflate(pad, pad))
            }
            Self::InnerShadow(s) => s.input.bounds(content),
            Self::Shadow {
                radius,
                spread,
                input,
            } => {
                let pad = kernel_pad(radius + spread);
                input.bounds(content).inflate(pad, pad)
            }
            Self::Glow { input, .. }
            | Self::ColorAdjust { input, .. }
            | Self::SepiaTone { input, .. } => input.bounds(content),
            Self::Crop { rect, input } => input.bounds(content).intersect(*rect),
            Self::Offset { dx, dy, input } => input.bounds(content).translate(*dx, *dy),
            Self::Blend { top, bottom, .. } => bottom.bounds(content).union(top.bounds(content)),
            Self::Merge { inputs } => inputs
                .iter()
                .fold(Bounds::EMPTY, |acc, e| acc.union(e.bounds(content))),
            Self::Reflection {
                top_offset,
                fraction,
                input,
            } => {
                let inner = input.bounds(content);
                inner.union(reflection_area(inner, *top_offset, *fraction))
            }
            Self::ColorInput { rect } => *rect,
        }
    }

    /// Maps the content's dirty rectangles to the rectangles of this
    /// effect's output that must be repainted, replacing the contents of
    /// `out`.
    ///
    /// `content` is the bounds of the layer's content and `dirty` the
    /// rectangles that changed within it, both in the layer's local space.
    /// Scratch containers come from `pool`.
    pub fn propagate(
        &self,
        content: Bounds,
        dirty: &DirtyRegions,
        out: &mut DirtyRegions,
        pool: &mut RegionPool,
    ) {
        match self {
            Self::Source => out.derive_with_container(dirty),
            Self::GaussianBlur { radius, input } => {
                input.propagate(content, dirty, out, pool);
                let pad = kernel_pad(*radius);
                out.grow(pad, pad);
            }
            Self::BoxBlur {
                width,
                height,
                iterations,
                input,
            } => {
                input.propagate(content, dirty, out, pool);
                out.grow(box_pad(*width, *iterations), box_pad(*height, *iterations));
            }
            Self::MotionBlur {
                radius,
                angle,
                input,
            } => {
                input.propagate(content, dirty, out, pool);
                let (h, v) = motion_pad(*radius, *angle);
                out.grow(h, v);
            }
            Self::DropShadow(s) => {
                s.input.propagate(content, dirty, out, pool);
                pool.with_lease(|_, shadow| {
                    shadow.derive_with_container(out);
                    shadow.translate(s.offset_x, s.offset_y);
                    let pad = s.pad();
                    shadow.grow(pad, pad);
                    out.merge(shadow);
                });
            }
            Self::InnerShadow(s) => {
                s.input.propagate(content, dirty, out, pool);
                pool.with_lease(|_, shadow| {
                    shadow.derive_with_container(out);
                    shadow.translate(s.offset_x, s.offset_y);
                    out.merge(shadow);
                });
                let pad = s.pad();
                out.grow(pad, pad);
                out.intersect_with(s.input.bounds(content));
            }
            Self::Shadow {
                radius,
                spread,
                input,
            } => {
                input.propagate(content, dirty, out, pool);
                let pad = kernel_pad(radius + spread);
                out.grow(pad, pad);
            }
            Self::Glow { input, .. }
            | Self::ColorAdjust { input, .. }
            | Self::SepiaTone { input, .. } => input.propagate(content, dirty, out, pool),
            Self::Crop { rect, input } => {
                input.propagate(content, dirty, out, pool);
                out.intersect_with(*rect);
            }
            Self::Offset { dx, dy, input } => {
                input.propagate(content, dirty, out, pool);
                out.translate(*dx, *dy);
            }
            Self::Blend { top, bottom, .. } => {
                bottom.propagate(content, dirty, out, pool);
                pool.with_lease(|pool, upper| {
                    top.propagate(content, dirty, upper, pool);
                    out.merge(upper);
                });
            }
            Self::Merge { inputs } => {
                out.reset();
                for input in inputs {
                    pool.with_lease(|pool, part| {
                        input.propagate(content, dirty, part, pool);
                        out.merge(part);
                    });
                }
            }
            Self::Reflection {
                top_offset,
                fraction,
                input,
            } => {
                input.propagate(content, dirty, out, pool);
                let inner = input.bounds(content);
                let area = reflection_area(inner, *top_offset, *fraction);
                if let (Some(src), false) = (inner.rect(), area.is_empty()) {
                    let axis = 2.0 * src.y1 + top_offset;
                    pool.with_lease(|_, mirrored| {
                        for region in out.iter() {
                            if let Some(r) = region.rect() {
                                let flipped = Bounds::new(r.x0, axis - r.y1, r.x1, axis - r.y0);
                                mirrored.add_dirty_region(flipped.intersect(area));
                            }
                        }
                        out.merge(mirrored);
                    });
                }
            }
            Self::ColorInput { .. } => out.reset(),
        }
    }

    /// Whether this effect can paint a changed content pixel anywhere other
    /// than where that pixel is, or can paint outside the content.
    #[must_use]
    pub fn moves_pixels(&self) -> bool {
        match self {
            Self::Source => false,
            Self::GaussianBlur { radius, input } => {
                kernel_pad(*radius) > 0.0 || input.moves_pixels()
            }
            Self::BoxBlur {
                width,
                height,
                iterations,
                input,
            } => {
                box_pad(*width, *iterations) > 0.0
                    || box_pad(*height, *iterations) > 0.0
                    || input.moves_pixels()
            }
            Self::MotionBlur {
                radius,
                angle,
                input,
            } => motion_pad(*radius, *angle) != (0.0, 0.0) || input.moves_pixels(),
            Self::DropShadow(_) | Self::InnerShadow(_) | Self::Reflection { .. } => true,
            Self::Blend { top, bottom, .. } => top.moves_pixels() || bottom.moves_pixels(),
            Self::Merge { inputs } => inputs.iter().any(Self::moves_pixels),
            Self::Shadow {
                radius,
                spread,
                input,
            } => kernel_pad(radius + spread) > 0.0 || input.moves_pixels(),
            Self::Glow { input, .. }
            | Self::ColorAdjust { input, .. }
            | Self::SepiaTone { input, .. }
            | Self::Crop { input, .. } => input.moves_pixels(),
            Self::Offset { dx, dy, input } => *dx != 0.0 || *dy != 0.0 || input.moves_pixels(),
            Self::ColorInput { .. } => false,
        }
    }
}

/// Rounds a kernel extent up to whole pixels.
fn kernel_pad(extent: f64) -> f64 {
    (extent - PAD_EPSILON).max(0.0).ceil()
}

fn box_pad(size: f64, iterations: u32) -> f64 {
    let size = size.max(0.0).round();
    if size <= 1.0 {
        return 0.0;
    }
    (((size - 1.0) * f64::from(iterations) + 1.0) / 2.0).floor()
}

fn motion_pad(radius: f64, angle_degrees: f64) -> (f64, f64) {
    let radians = angle_degrees.to_radians();
    let radius = radius.max(0.0);
    (
        kernel_pad(radians.cos().abs() * radius),
        kernel_pad(radians.sin().abs() * radius),
    )
}

/// The strip below `inner` that a reflection paints into.
fn reflection_area(inner: Bounds, top_offset: f64, fraction: f64) -> Bounds {
    let Some(r) = inner.rect() else {
        return Bounds::EMPTY;
    };
    let fraction = fraction.clamp(0.0, 1.0);
    let top = r.y1 + top_offset;
    Bounds::new(r.x0, top, r.x1, top + r.height() * fraction)
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn b(x0: f64, y0: f64, x1: f64, y1: f64) -> Bounds {
        Bounds::new(x0, y0, x1, y1)
    }

    fn dirty(rects: &[Bounds]) -> DirtyRegions {
        let mut d = DirtyRegions::new(8);
        d.derive_with_new_regions(Some(rects));
        d
    }

    fn run(effect: &Effect, content: Bounds, rects: &[Bounds]) -> Vec<Bounds> {
        let mut pool = RegionPool::new(4, 8);
        let mut out = DirtyRegions::new(8);
        effect.propagate(content, &dirty(rects), &mut out, &mut pool);
        assert_eq!(pool.outstanding(), 0);
        out.iter().collect()
    }

    const CONTENT: Bounds = Bounds::EMPTY;

    #[test]
    fn zero_radius_blur_is_identity() {
        let rects = [b(10.0, 10.0, 20.0, 20.0)];
        assert_eq!(run(&Effect::gaussian_blur(0.0), CONTENT, &rects), rects);
        assert_eq!(run(&Effect::box_blur(1.0, 1.0, 3), CONTENT, &rects), rects);
        assert_eq!(run(&Effect::motion_blur(0.0, 30.0), CONTENT, &rects), rects);
    }

    #[test]
    fn gaussian_blur_grows_by_rounded_radius() {
        let rects = [b(10.0, 10.0, 20.0, 20.0)];
        assert_eq!(
            run(&Effect::gaussian_blur(2.5), CONTENT, &rects),
            vec![b(7.0, 7.0, 23.0, 23.0)]
        );
    }

    #[test]
    fn blurred_regions_merge_when_they_meet() {
        let rects = [b(0.0, 0.0, 10.0, 10.0), b(15.0, 0.0, 25.0, 10.0)];
        assert_eq!(run(&Effect::gaussian_blur(2.0), CONTENT, &rects).len(), 2);
        assert_eq!(
            run(&Effect::gaussian_blur(3.0), CONTENT, &rects),
            vec![b(-3.0, -3.0, 28.0, 13.0)]
        );
    }

    #[test]
    fn box_blur_pad_depends_on_iterations() {
        let rects = [b(10.0, 10.0, 20.0, 20.0)];
        // Horizontal: ((5 - 1) * 3 + 1) / 2 = 6, vertical: ((3 - 1) * 3 + 1) / 2 = 3.
        assert_eq!(
            run(&Effect::box_blur(5.0, 3.0, 3), CONTENT, &rects),
            vec![b(4.0, 7.0, 26.0, 23.0)]
        );
    }

    #[test]
    fn motion_blur_is_directional() {
        let rects = [b(10.0, 10.0, 20.0, 20.0)];
        assert_eq!(
            run(&Effect::motion_blur(4.0, 0.0), CONTENT, &rects),
            vec![b(6.0, 10.0, 24.0, 20.0)]
        );
        assert_eq!(
            run(&Effect::motion_blur(4.0, 90.0), CONTENT, &rects),
            vec![b(10.0, 6.0, 20.0, 24.0)]
        );
    }

    #[test]
    fn drop_shadow_adds_shifted_grown_copy() {
        let rects = [b(0.0, 0.0, 10.0, 10.0)];
        assert_eq!(
            run(&Effect::drop_shadow(2.0, 0.0, 5.0, 5.0), CONTENT, &rects),
            vec![b(0.0, 0.0, 17.0, 17.0)]
        );
        // Far offset keeps the shadow separate.
        let far = run(&Effect::drop_shadow(1.0, 1.0, 50.0, 0.0), CONTENT, &rects);
        assert_eq!(far.len(), 2);
        assert!(far.contains(&b(48.0, -2.0, 62.0, 12.0)));
    }

    #[test]
    fn inner_shadow_stays_inside_content() {
        let content = b(0.0, 0.0, 100.0, 100.0);
        let effect = Effect::InnerShadow(ShadowParams::new(3.0, 0.0, 4.0, 0.0));
        assert_eq!(
            run(&effect, content, &[b(90.0, 0.0, 100.0, 10.0)]),
            vec![b(87.0, 0.0, 100.0, 13.0)]
        );
        assert_eq!(effect.bounds(content), content);
    }

    #[test]
    fn color_effects_are_identity() {
        let rects = [b(0.0, 0.0, 10.0, 10.0), b(40.0, 0.0, 50.0, 10.0)];
        let glow = Effect::Glow {
            level: 0.3,
            input: Box::new(Effect::Source),
        };
        let sepia = Effect::SepiaTone {
            level: 1.0,
            input: Box::new(glow.clone()),
        };
        assert_eq!(run(&glow, CONTENT, &rects), rects);
        assert_eq!(run(&sepia, CONTENT, &rects), rects);
    }

    #[test]
    fn crop_outside_yields_empty() {
        let crop = Effect::crop(b(0.0, 0.0, 50.0, 50.0));
        assert!(run(&crop, CONTENT, &[b(60.0, 60.0, 70.0, 70.0)]).is_empty());
        assert_eq!(
            run(&crop, CONTENT, &[b(40.0, 40.0, 70.0, 70.0)]),
            vec![b(40.0, 40.0, 50.0, 50.0)]
        );
    }

    #[test]
    fn offset_translates() {
        assert_eq!(
            run(&Effect::offset(5.0, -3.0), CONTENT, &[b(0.0, 0.0, 10.0, 10.0)]),
            vec![b(5.0, -3.0, 15.0, 7.0)]
        );
    }

    #[test]
    fn blend_unions_independent_inputs() {
        let rects = [b(0.0, 0.0, 10.0, 10.0)];
        let top = Effect::offset(100.0, 0.0);
        let bottom = Effect::Source;
        let blended = run(
            &Effect::blend(BlendMode::Multiply, top.clone(), bottom.clone()),
            CONTENT,
            &rects,
        );
        let mut expected = dirty(&run(&bottom, CONTENT, &rects));
        expected.merge(&dirty(&run(&top, CONTENT, &rects)));
        assert_eq!(blended, expected.iter().collect::<Vec<_>>());
        assert_eq!(blended.len(), 2);

        // Overlapping inputs collapse into one rectangle.
        let overlapping = run(
            &Effect::blend(BlendMode::Screen, Effect::gaussian_blur(2.0), Effect::Source),
            CONTENT,
            &rects,
        );
        assert_eq!(overlapping, vec![b(-2.0, -2.0, 12.0, 12.0)]);
    }

    #[test]
    fn nested_effects_apply_innermost_first() {
        let rects = [b(0.0, 0.0, 10.0, 10.0)];
        let offset_of_crop = Effect::Offset {
            dx: 20.0,
            dy: 0.0,
            input: Box::new(Effect::crop(b(0.0, 0.0, 5.0, 10.0))),
        };
        let crop_of_offset = Effect::Crop {
            rect: b(0.0, 0.0, 5.0, 10.0),
            input: Box::new(Effect::offset(20.0, 0.0)),
        };
        assert_eq!(
            run(&offset_of_crop, CONTENT, &rects),
            vec![b(20.0, 0.0, 25.0, 10.0)]
        );
        assert!(run(&crop_of_offset, CONTENT, &rects).is_empty());
    }

    #[test]
    fn propagation_is_idempotent() {
        let effect = Effect::blend(
            BlendMode::SourceOver,
            Effect::drop_shadow(3.0, 1.0, 2.0, 2.0),
            Effect::motion_blur(6.0, 45.0),
        );
        let rects = [b(0.0, 0.0, 10.0, 10.0), b(50.0, 50.0, 60.0, 60.0)];
        assert_eq!(run(&effect, CONTENT, &rects), run(&effect, CONTENT, &rects));
    }

    #[test]
    fn merge_unions_all_inputs() {
        let merge = Effect::Merge {
            inputs: vec![Effect::Source, Effect::offset(0.0, 40.0)],
        };
        let out = run(&merge, CONTENT, &[b(0.0, 0.0, 10.0, 10.0)]);
        assert_eq!(out, vec![b(0.0, 0.0, 10.0, 10.0), b(0.0, 40.0, 10.0, 50.0)]);
        let none = Effect::Merge { inputs: vec![] };
        assert!(run(&none, CONTENT, &[b(0.0, 0.0, 10.0, 10.0)]).is_empty());
    }

    #[test]
    fn reflection_mirrors_rows_near_the_bottom() {
        let content = b(0.0, 0.0, 100.0, 100.0);
        let reflection = Effect::Reflection {
            top_offset: 0.0,
            fraction: 0.5,
            input: Box::new(Effect::Source),
        };
        assert_eq!(
            run(&reflection, content, &[b(0.0, 90.0, 10.0, 100.0)]),
            vec![b(0.0, 90.0, 10.0, 110.0)]
        );
        // Rows above the reflected fraction do not reappear.
        assert_eq!(
            run(&reflection, content, &[b(0.0, 0.0, 10.0, 10.0)]),
            vec![b(0.0, 0.0, 10.0, 10.0)]
        );
        assert_eq!(reflection.bounds(content), b(0.0, 0.0, 100.0, 150.0));
    }

    #[test]
    fn color_input_has_no_dirty_area() {
        let flood = Effect::ColorInput {
            rect: b(0.0, 0.0, 30.0, 30.0),
        };
        assert!(run(&flood, CONTENT, &[b(0.0, 0.0, 10.0, 10.0)]).is_empty());
        assert_eq!(flood.bounds(Bounds::EMPTY), b(0.0, 0.0, 30.0, 30.0));
    }

    #[test]
    fn pointwise_effects_keep_pixels_in_place() {
        assert!(!Effect::Source.moves_pixels());
        assert!(!Effect::gaussian_blur(0.0).moves_pixels());
        assert!(!Effect::crop(b(0.0, 0.0, 5.0, 5.0)).moves_pixels());
        assert!(!Effect::blend(BlendMode::Multiply, Effect::Source, Effect::Source).moves_pixels());
        assert!(Effect::gaussian_blur(0.5).moves_pixels());
        assert!(Effect::offset(0.0, 1.0).moves_pixels());
        assert!(Effect::drop_shadow(0.0, 0.0, 0.0, 0.0).moves_pixels());
        let cropped_offset = Effect::Crop {
            rect: b(0.0, 0.0, 5.0, 5.0),
            input: Box::new(Effect::offset(3.0, 0.0)),
        };
        assert!(cropped_offset.moves_pixels());
    }

    #[test]
    fn bounds_follow_footprints() {
        let content = b(0.0, 0.0, 10.0, 10.0);
        assert_eq!(
            Effect::gaussian_blur(2.0).bounds(content),
            b(-2.0, -2.0, 12.0, 12.0)
        );
        assert_eq!(
            Effect::drop_shadow(1.0, 0.0, 4.0, 4.0).bounds(content),
            b(0.0, 0.0, 15.0, 15.0)
        );
        assert_eq!(
            Effect::crop(b(5.0, 5.0, 50.0, 50.0)).bounds(content),
            b(5.0, 5.0, 10.0, 10.0)
        );
        assert_eq!(Effect::Source.bounds(Bounds::EMPTY), Bounds::EMPTY);
    }
}
