// Copyright 2026 the Subduction Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer tree data model.
//!
//! A *layer* is a node in a retained scene tree. Each layer has:
//!
//! - An identity ([`LayerId`]): a generational handle that becomes stale when
//!   the layer is destroyed, preventing use-after-free bugs at the API level.
//! - Topology: parent, first-child, and sibling links forming an ordered tree.
//!   Children paint in sibling order, back to front.
//! - **Local properties** set by the caller: [`transform`](LayerStore::set_transform),
//!   [`content bounds`](LayerStore::set_content_bounds),
//!   [`clip`](LayerStore::set_clip), [`effect`](LayerStore::set_effect), and
//!   [`flags`](LayerStore::set_flags).
//! - **Computed properties** produced by [`evaluate`](LayerStore::evaluate):
//!   `world_transform` (product of ancestor local transforms),
//!   `effective_hidden`, and the layer's painted footprint
//!   (content ∪ children → effect → clip → local transform).
//! - **Repaint state**: the footprint painted before pending mutations, and
//!   the footprints of detached children.
//!
//! Layers are stored in struct-of-arrays layout with index-based handles
//! for cache-friendly traversal.
//!
//! # Dirty tracking
//!
//! Property mutations automatically mark the corresponding dirty channel
//! (see [`dirty`](crate::dirty)), and every visual mutation marks the layer
//! for repaint:
//!
//! - **TRANSFORM**: propagates to all descendants, since world transforms
//!   and hidden state are inherited.
//! - **CLIP** / **CONTENT** / **EFFECT**: local-only.
//! - **TOPOLOGY**: structural changes (add/remove child, create/destroy
//!   layer) that trigger a traversal-order rebuild.
//! - **PAINT** / **SUBTREE**: the repainted layer and the ancestor trail
//!   leading to it. Cleared by [`LayerStore::clear_repaint`].

mod clip;
mod evaluate;
mod id;
mod store;
mod traverse;

pub use clip::ClipShape;
pub use evaluate::FrameChanges;
pub use id::{INVALID, LayerId};
pub use store::{LayerFlags, LayerStore};
pub use traverse::Children;
