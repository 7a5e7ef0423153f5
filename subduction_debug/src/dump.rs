// Copyright 2026 the Subduction Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text dumps of a layer tree's repaint state.
//!
//! One line per layer, indented by depth:
//!
//! ```text
//! #0 bounds=(0,0)-(100,60) subtree
//!   #1 bounds=(10,10)-(30,30) dirty=(0,10)-(20,30) paint cull=[I -]
//!   #2 bounds=(70,10)-(90,30) cull=[- P]
//! ```
//!
//! `paint` marks a layer repainted whole, `subtree` a layer on the trail to
//! one. With a [`CullMap`], each layer ends with its state per region: `I`
//! inside, `P` partial, `-` outside.

use std::fmt::{self, Write};

use subduction_core::bounds::Bounds;
use subduction_core::layer::{LayerId, LayerStore};
use subduction_render::{CullMap, CullState};

/// Returns the dump of the tree under `root` as a string.
#[must_use]
pub fn dump_tree(store: &LayerStore, root: LayerId, cull: Option<&CullMap>) -> String {
    let mut out = String::new();
    let _ = write_tree(&mut out, store, root, cull);
    out
}

/// Writes the dump of the tree under `root` to `out`.
pub fn write_tree(
    out: &mut impl Write,
    store: &LayerStore,
    root: LayerId,
    cull: Option<&CullMap>,
) -> fmt::Result {
    write_layer(out, store, root, cull, 0)
}

fn write_layer(
    out: &mut impl Write,
    store: &LayerStore,
    id: LayerId,
    cull: Option<&CullMap>,
    depth: usize,
) -> fmt::Result {
    let idx = id.index();
    write!(out, "{:indent$}#{idx} bounds=", "", indent = depth * 2)?;
    write_bounds(out, store.transformed_bounds_at(idx))?;

    let dirty = store.dirty_bounds_at(idx);
    if !dirty.is_empty() {
        out.write_str(" dirty=")?;
        write_bounds(out, dirty)?;
    }
    let removed = store.removed_bounds_at(idx).len();
    if removed > 0 {
        write!(out, " removed={removed}")?;
    }
    if store.needs_repaint_at(idx) {
        out.write_str(" paint")?;
    } else if store.has_dirty_subtree_at(idx) {
        out.write_str(" subtree")?;
    }
    if store.effective_hidden_at(idx) {
        out.write_str(" hidden")?;
    }
    if store.effect_at(idx).is_some() {
        out.write_str(" effect")?;
    }
    if store.clip_at(idx).is_some() {
        out.write_str(" clip")?;
    }
    if let Some(cull) = cull.filter(|c| c.region_count() > 0) {
        out.write_str(" cull=[")?;
        for (i, state) in cull.states_at(idx).iter().enumerate() {
            if i > 0 {
                out.write_char(' ')?;
            }
            out.write_char(match state {
                CullState::Inside => 'I',
                CullState::Partial => 'P',
                CullState::Outside => '-',
            })?;
        }
        out.write_char(']')?;
    }
    out.write_char('\n')?;

    for child in store.children(id) {
        write_layer(out, store, child, cull, depth + 1)?;
    }
    Ok(())
}

fn write_bounds(out: &mut impl Write, bounds: Bounds) -> fmt::Result {
    match bounds.rect() {
        Some(r) => write!(out, "({},{})-({},{})", r.x0, r.y0, r.x1, r.y1),
        None => out.write_str("empty"),
    }
}

#[cfg(test)]
mod tests {
    use subduction_core::region::DirtyRegions;
    use subduction_core::transform::Transform3d;

    use super::*;

    fn sample() -> (LayerStore, LayerId, LayerId, LayerId) {
        let mut store = LayerStore::new();
        let root = store.create_layer();
        let a = store.create_layer();
        let b = store.create_layer();
        store.add_child(root, a);
        store.add_child(root, b);
        store.set_content_bounds(a, Bounds::new(0.0, 0.0, 20.0, 20.0));
        store.set_content_bounds(b, Bounds::new(60.0, 0.0, 80.0, 20.0));
        let _ = store.evaluate();
        store.clear_repaint();
        (store, root, a, b)
    }

    #[test]
    fn clean_tree() {
        let (store, root, _, _) = sample();
        assert_eq!(
            dump_tree(&store, root, None),
            "#0 bounds=(0,0)-(80,20)\n  #1 bounds=(0,0)-(20,20)\n  #2 bounds=(60,0)-(80,20)\n"
        );
    }

    #[test]
    fn dirty_layer_and_trail() {
        let (mut store, root, a, _) = sample();
        store.set_transform(a, Transform3d::from_translation(10.0, 0.0, 0.0));
        let _ = store.evaluate();
        let dump = dump_tree(&store, root, None);
        let lines: Vec<_> = dump.lines().collect();
        assert_eq!(lines[0], "#0 bounds=(10,0)-(80,20) subtree");
        assert_eq!(lines[1], "  #1 bounds=(10,0)-(30,20) dirty=(0,0)-(20,20) paint");
    }

    #[test]
    fn cull_states_per_region() {
        let (store, root, _, _) = sample();
        let mut regions = DirtyRegions::new(6);
        regions.add_dirty_region(Bounds::new(0.0, 0.0, 30.0, 30.0));
        regions.add_dirty_region(Bounds::new(70.0, 0.0, 100.0, 30.0));
        let mut cull = CullMap::new();
        cull.mark(&store, root, &regions, None);

        let dump = dump_tree(&store, root, Some(&cull));
        let lines: Vec<_> = dump.lines().collect();
        assert!(lines[0].ends_with("cull=[P P]"), "got: {dump}");
        assert!(lines[1].ends_with("cull=[I -]"), "got: {dump}");
        assert!(lines[2].ends_with("cull=[- P]"), "got: {dump}");
    }
}
