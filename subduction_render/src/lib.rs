// Copyright 2026 the Subduction Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame repaint passes for subduction.
//!
//! This crate turns the change state recorded by [`subduction_core`]'s layer
//! tree into the work needed to repaint one frame:
//!
//! - [`accumulate`] collects the dirty area into a bounded set of
//!   rectangles, aggregating groups with effects and clips
//! - [`CullMap`] classifies every layer against each dirty rectangle
//! - [`RepaintPlan`] lists, per rectangle, the layers to draw
//! - [`DamageRegion`] reports the damaged area to the presenter
//! - [`Repainter`] runs the passes in order and owns their buffers
//!
//! ```
//! use subduction_core::bounds::Bounds;
//! use subduction_core::layer::LayerStore;
//! use subduction_core::trace::Tracer;
//! use subduction_render::Repainter;
//!
//! let mut store = LayerStore::new();
//! let root = store.create_layer();
//! let card = store.create_layer();
//! store.add_child(root, card);
//! store.set_content_bounds(card, Bounds::new(10.0, 10.0, 50.0, 30.0));
//!
//! let mut repainter = Repainter::default();
//! let viewport = Bounds::new(0.0, 0.0, 800.0, 600.0);
//! let plan = repainter.prepare_frame(&mut store, root, viewport, &mut Tracer::none());
//! assert_eq!(plan.passes.len(), 1);
//! repainter.finish_frame(&mut store);
//!
//! // Nothing changed, nothing to draw.
//! let plan = repainter.prepare_frame(&mut store, root, viewport, &mut Tracer::none());
//! assert!(plan.is_empty());
//! ```

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

mod accumulate;
mod config;
mod cull;
mod damage;
mod plan;
mod repaint;

pub use accumulate::{Accumulation, accumulate};
pub use config::RepaintConfig;
pub use cull::{CullMap, CullState, CullStats};
pub use damage::DamageRegion;
pub use plan::{DrawItem, RegionPass, RepaintPlan};
pub use repaint::Repainter;
