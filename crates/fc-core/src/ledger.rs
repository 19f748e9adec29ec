//! Style override ledger: the authored-vs-rendered bookkeeping for edges.
//!
//! Every edge keeps two style records. `original_style` is the restore
//! target and only moves on authored edits ([`commit_edit`]). Transient
//! feedback such as the selection highlight is computed with
//! [`apply_highlight`] and undone with [`restore`]; neither touches
//! `original_style`.

use crate::model::{ACCENT, Color, EdgeEntity};
use crate::style::{EdgeStyle, fill_unset_edge_style, merge_edge_style};
use serde::{Deserialize, Serialize};

/// Stroke width assumed when neither style record carries one.
const FALLBACK_STROKE_WIDTH: f32 = 2.0;

/// Transient overlay drawn on the selected edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Highlight {
    /// Stroke (and arrow head) color while selected.
    pub stroke: Color,
    /// Added to the authored stroke width while selected.
    pub width_delta: f32,
}

impl Default for Highlight {
    fn default() -> Self {
        Self {
            stroke: ACCENT,
            width_delta: 1.0,
        }
    }
}

/// Seed every unset attribute of `original_style` from `render_style`.
///
/// Only valid while `render_style` is authored, i.e. before any transient
/// overlay has been drawn. The store calls it once, when an edge is
/// committed. Returns true if anything was seeded.
pub fn snapshot_if_absent(edge: &mut EdgeEntity) -> bool {
    fill_unset_edge_style(&mut edge.original_style, &edge.render_style)
}

/// Render style for `edge` with `highlight` laid over it.
///
/// The width is derived from the authored width, so highlighting an edge
/// that is already highlighted yields the same result.
pub fn apply_highlight(edge: &EdgeEntity, highlight: &Highlight) -> EdgeStyle {
    let base_width = edge
        .original_style
        .stroke_width
        .unwrap_or(FALLBACK_STROKE_WIDTH);

    let mut style = edge.render_style.clone();
    style.stroke = Some(highlight.stroke);
    style.stroke_width = Some(base_width + highlight.width_delta);
    style.marker_end = style.marker_end.map(|m| m.with_color(highlight.stroke));
    style
}

/// Render style that puts `edge` back to exactly what the user authored.
pub fn restore(edge: &EdgeEntity) -> EdgeStyle {
    edge.original_style.clone()
}

/// Record an authored edit: the patch lands in both style records.
///
/// Attributes outside the patch keep their per-record values, so a
/// highlight in `render_style` never leaks into `original_style`.
pub fn commit_edit(edge: &mut EdgeEntity, patch: &EdgeStyle) {
    merge_edge_style(&mut edge.render_style, patch);
    merge_edge_style(&mut edge.original_style, patch);
}

/// True when nothing transient is drawn on `edge`.
pub fn is_restored(edge: &EdgeEntity) -> bool {
    edge.render_style == edge.original_style
}
