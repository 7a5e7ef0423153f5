// Copyright 2026 the Subduction Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Subduction uses multi-channel dirty tracking (via [`understory_dirty`]) to
//! propagate invalidation through the layer tree. Each channel represents an
//! independent category of change.
//!
//! # Propagation semantics
//!
//! - **Downward**: [`TRANSFORM`] uses
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) with dependency edges from
//!   child to parent, so marking a layer marks its whole subtree. World
//!   transforms and effective hidden state are inherited. (Hidden-flag
//!   changes are routed through [`TRANSFORM`].)
//!
//! - **Upward**: [`SUBTREE`] uses `EagerPolicy` with edges from parent to
//!   child, so marking a layer marks every ancestor. It is the trail the
//!   accumulation pass follows from the root down to repainted layers.
//!
//! - **Local-only**: [`CLIP`], [`CONTENT`], [`EFFECT`], and [`PAINT`] are
//!   marked with the default policy. [`PAINT`] means the layer's whole
//!   footprint (old and new) must be repainted.
//!
//! - **Structural**: [`TOPOLOGY`] is marked on topology mutations and
//!   triggers a traversal-order rebuild during evaluation.
//!
//! # Consumption
//!
//! [`LayerStore::evaluate`](crate::layer::LayerStore::evaluate) drains
//! `TRANSFORM`, `CLIP`, `CONTENT`, `EFFECT`, and `TOPOLOGY` into
//! [`FrameChanges`](crate::layer::FrameChanges). `PAINT` and `SUBTREE` survive
//! evaluation; the repaint passes read them and
//! [`LayerStore::clear_repaint`](crate::layer::LayerStore::clear_repaint)
//! resets them once the frame is drawn.

use understory_dirty::Channel;

/// Transform or hidden flag changed; requires world transform and effective
/// hidden recomputation for descendants.
pub const TRANSFORM: Channel = Channel::new(0);

/// Clip shape changed.
pub const CLIP: Channel = Channel::new(1);

/// Content bounds changed.
pub const CONTENT: Channel = Channel::new(2);

/// Effect changed.
pub const EFFECT: Channel = Channel::new(3);

/// Tree topology changed; triggers traversal order rebuild.
pub const TOPOLOGY: Channel = Channel::new(4);

/// The layer must be repainted over its old and new footprint.
pub const PAINT: Channel = Channel::new(5);

/// The layer or one of its descendants must be repainted.
pub const SUBTREE: Channel = Channel::new(6);
