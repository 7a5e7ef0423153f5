// Copyright 2026 the Subduction Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and tree dumps for subduction repaint diagnostics.
//!
//! - [`pretty::PrettyPrintSink`]: a [`TraceSink`](subduction_core::trace::TraceSink)
//!   writing one human-readable line per event.
//! - [`dump::dump_tree`]: a text dump of each layer's bounds, repaint state
//!   and per-region cull state.

pub mod dump;
pub mod pretty;
