// Copyright 2026 the Subduction Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use subduction_core::trace::{
    CullSummaryEvent, DamageRect, FrameSummary, LayerChange, LayerField, PhaseBeginEvent,
    PhaseEndEvent, PhaseKind, RegionsEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    verbose: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self {
            writer,
            verbose: false,
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            verbose: false,
        }
    }

    /// Also lists every changed layer and damage rectangle, not just counts.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Consumes the sink, returning the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn phase_name(phase: PhaseKind) -> &'static str {
    match phase {
        PhaseKind::Evaluate => "eval",
        PhaseKind::Accumulate => "accumulate",
        PhaseKind::Cull => "cull",
        PhaseKind::Plan => "plan",
    }
}

fn field_name(field: LayerField) -> &'static str {
    match field {
        LayerField::Transform => "transform",
        LayerField::Clip => "clip",
        LayerField::Content => "content",
        LayerField::Effect => "effect",
        LayerField::Flags => "flags",
        LayerField::Topology => "topology",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:begin] frame={} {}",
            e.frame_index,
            phase_name(e.phase),
        );
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:end] frame={} {}",
            e.frame_index,
            phase_name(e.phase),
        );
    }

    fn on_regions(&mut self, e: &RegionsEvent) {
        let full = if e.full_repaint { " FULL" } else { "" };
        let _ = writeln!(
            self.writer,
            "[regions] frame={} count={}/{}{full}",
            e.frame_index, e.region_count, e.capacity,
        );
    }

    fn on_cull_summary(&mut self, e: &CullSummaryEvent) {
        let _ = writeln!(
            self.writer,
            "[cull] frame={} visited={} tests={} inherited={}in/{}out culled={}",
            e.frame_index,
            e.nodes_visited,
            e.geometry_tests,
            e.inherited_inside,
            e.inherited_outside,
            e.culled,
        );
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        let mode = if s.full_repaint { "full" } else { "partial" };
        let _ = writeln!(
            self.writer,
            "[summary] frame={} changed={} regions={} area={:.0} items={} repaint={mode}",
            s.frame_index, s.changed_layers, s.region_count, s.dirty_area, s.draw_items,
        );
    }

    fn on_layer_changes(&mut self, frame_index: u64, changes: &[LayerChange]) {
        let _ = writeln!(
            self.writer,
            "[layers] frame={frame_index} changes={}",
            changes.len(),
        );
        if self.verbose {
            for c in changes {
                let _ = writeln!(
                    self.writer,
                    "  layer {} {}",
                    c.layer_index,
                    field_name(c.field)
                );
            }
        }
    }

    fn on_damage_rects(&mut self, frame_index: u64, rects: &[DamageRect]) {
        let _ = writeln!(
            self.writer,
            "[damage] frame={frame_index} rects={}",
            rects.len(),
        );
        if self.verbose {
            for r in rects {
                let _ = writeln!(
                    self.writer,
                    "  {}x{} at ({}, {})",
                    r.width, r.height, r.x, r.y
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(sink: PrettyPrintSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn pretty_print_regions() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_regions(&RegionsEvent {
            frame_index: 3,
            region_count: 2,
            capacity: 6,
            full_repaint: false,
        });
        let output = output(sink);
        assert!(output.contains("[regions]"), "got: {output}");
        assert!(output.contains("frame=3"), "got: {output}");
        assert!(output.contains("count=2/6"), "got: {output}");
        assert!(!output.contains("FULL"), "got: {output}");
    }

    #[test]
    fn pretty_print_phases() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_phase_begin(&PhaseBeginEvent {
            frame_index: 0,
            phase: PhaseKind::Cull,
        });
        sink.on_phase_end(&PhaseEndEvent {
            frame_index: 0,
            phase: PhaseKind::Cull,
        });
        let output = output(sink);
        assert_eq!(
            output,
            "[phase:begin] frame=0 cull\n[phase:end] frame=0 cull\n"
        );
    }

    #[test]
    fn verbose_lists_damage() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new()).verbose(true);
        sink.on_damage_rects(
            1,
            &[DamageRect {
                x: 4,
                y: 5,
                width: 10,
                height: 20,
            }],
        );
        let output = output(sink);
        assert!(output.contains("rects=1"), "got: {output}");
        assert!(output.contains("10x20 at (4, 5)"), "got: {output}");
    }

    #[test]
    fn summary_reports_full_repaint() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_frame_summary(&FrameSummary {
            frame_index: 9,
            full_repaint: true,
            ..FrameSummary::default()
        });
        let output = output(sink);
        assert!(output.contains("repaint=full"), "got: {output}");
    }
}
