// Copyright 2026 the Subduction Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained layer tree, dirty regions, and effect footprints for incremental
//! repaint.
//!
//! `subduction_core` provides the data structures that decide *what* must be
//! redrawn after a scene changes. It is `no_std` compatible (with `alloc`)
//! and uses array-based struct-of-arrays storage with index handles for
//! cache-friendly traversal.
//!
//! # Architecture
//!
//! ```text
//!   set_transform / set_content_bounds / set_effect / ...
//!       │  (marks dirty channels, records old footprint)
//!       ▼
//!   LayerStore::evaluate() ──► FrameChanges
//!       │  (world transforms, post-order bounds)
//!       ▼
//!   accumulate (subduction_render) ──► DirtyRegions
//!       │  (effects propagate dirty areas via RegionPool leases)
//!       ▼
//!   cull / plan (subduction_render) ──► draw lists
//! ```
//!
//! **[`bounds`]**: Axis-aligned rectangle with an explicit empty state.
//!
//! **[`region`]**: [`DirtyRegions`](region::DirtyRegions), a capacity-bounded
//! set of non-overlapping dirty rectangles that merges rather than drops.
//!
//! **[`pool`]**: [`RegionPool`](pool::RegionPool), which lends containers out
//! for the duration of a closure and takes them back when it returns.
//!
//! **[`effect`]**: The closed [`Effect`](effect::Effect) tree and how each
//! kind maps a dirty area in its input to a dirty area in its output.
//!
//! **[`layer`]**: Struct-of-arrays layer tree with generational handles.
//! Properties (transform, content bounds, clip, effect, flags) are set by the
//! caller; world transforms and footprints are computed by evaluation.
//!
//! **[`dirty`]**: Multi-channel dirty tracking via `understory_dirty`.
//!
//! **[`transform`]**: 4×4 transform type for layer positioning, with
//! perspective.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! repaint instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-layer
//!   change and damage-rect events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod bounds;
pub mod dirty;
pub mod effect;
pub mod layer;
pub mod pool;
pub mod region;
pub mod trace;
pub mod transform;
