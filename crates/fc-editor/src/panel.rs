//! Property panel adapters.
//!
//! The panel edits one attribute at a time and sends `(key, value)` string
//! pairs. These helpers turn a pair into a single-attribute style patch, or
//! reject it. Keys follow the panel's camelCase names; a few legacy aliases
//! (`nodeWidth`, `selectedIcon`, `strokeDasharray`, ...) are accepted too.

use crate::selection::Selection;
use fc_core::{
    Color, CurveKind, DEFAULT_ARROW_SIZE, DashPattern, Dimension, EdgeEntity, EdgeStyle,
    ElementId, ElementStore, MarkerSpec, NEUTRAL_GRAY, NodeStyle, ResolvedNodeStyle, ShapeKind,
    TextAlign,
};
use serde::Serialize;

/// What the panel shows for the current selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PanelProps {
    Node {
        id: ElementId,
        shape: ShapeKind,
        /// Attributes as stored.
        style: NodeStyle,
        /// Attributes with fallbacks applied.
        resolved: ResolvedNodeStyle,
    },
    /// Edges show their authored style, never the highlight.
    Edge {
        id: ElementId,
        source: ElementId,
        target: ElementId,
        style: EdgeStyle,
    },
}

/// Snapshot for the panel, or `None` when nothing is selected.
pub fn props_for(store: &ElementStore, selection: Selection) -> Option<PanelProps> {
    match selection {
        Selection::Idle => None,
        Selection::Node(id) => store.node(id).map(|node| PanelProps::Node {
            id,
            shape: node.shape,
            style: node.style.clone(),
            resolved: node.style.resolve(node.shape),
        }),
        Selection::Edge(id) => store.edge(id).map(|edge| PanelProps::Edge {
            id,
            source: edge.source,
            target: edge.target,
            style: edge.original_style.clone(),
        }),
    }
}

// ─── Value parsing ───────────────────────────────────────────────────────

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Some(true),
        "false" | "0" | "off" | "no" => Some(false),
        _ => None,
    }
}

/// A finite, non-negative number.
fn parse_len(value: &str) -> Option<f32> {
    let value = value.trim();
    let digits = value.strip_suffix("px").unwrap_or(value).trim();
    digits
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

/// Opacity-like values clamp into [0, 1].
fn parse_unit(value: &str) -> Option<f32> {
    value
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(0.0, 1.0))
}

fn parse_align(value: &str) -> Option<TextAlign> {
    match value.trim().to_ascii_lowercase().as_str() {
        "left" => Some(TextAlign::Left),
        "center" => Some(TextAlign::Center),
        "right" => Some(TextAlign::Right),
        _ => None,
    }
}

// ─── Nodes ───────────────────────────────────────────────────────────────

/// Build a one-attribute node patch. `None` for unknown keys or bad values.
pub fn node_patch(key: &str, value: &str) -> Option<NodeStyle> {
    let mut patch = NodeStyle::default();
    match key {
        "text" | "label" => patch.text = Some(value.to_string()),
        "backgroundColor" => patch.background_color = Some(Color::from_hex(value)?),
        "borderColor" => patch.border_color = Some(Color::from_hex(value)?),
        "borderWidth" => patch.border_width = Some(parse_len(value)?),
        "borderRadius" => patch.border_radius = Some(parse_len(value)?),
        "textColor" => patch.text_color = Some(Color::from_hex(value)?),
        "fontSize" => patch.font_size = Some(parse_len(value)?).filter(|v| *v > 0.0),
        "fontFamily" => patch.font_family = Some(value.trim().to_string()).filter(|f| !f.is_empty()),
        "textAlign" => patch.text_align = Some(parse_align(value)?),
        "isBold" => patch.is_bold = Some(parse_bool(value)?),
        "isItalic" => patch.is_italic = Some(parse_bool(value)?),
        "isStrikethrough" => patch.is_strikethrough = Some(parse_bool(value)?),
        "width" | "nodeWidth" => patch.width = Some(Dimension::parse(value)?),
        "height" | "nodeHeight" => patch.height = Some(Dimension::parse(value)?),
        "padding" => patch.padding = Some(parse_len(value)?),
        "hasShadow" => patch.has_shadow = Some(parse_bool(value)?),
        "shadowOpacity" => patch.shadow_opacity = Some(parse_unit(value)?),
        "opacity" | "nodeOpacity" => patch.opacity = Some(parse_unit(value)?),
        "icon" | "selectedIcon" => patch.icon = Some(value.to_string()),
        _ => return None,
    }
    if patch.is_empty() { None } else { Some(patch) }
}

// ─── Edges ───────────────────────────────────────────────────────────────

/// Build a one-attribute edge patch against the edge's authored style.
///
/// Marker edits keep the current head size and take the authored stroke
/// color. A stroke edit recolors both markers so the arrow head follows
/// the line.
pub fn edge_patch(key: &str, value: &str, edge: &EdgeEntity) -> Option<EdgeStyle> {
    let authored = &edge.original_style;
    let mut patch = EdgeStyle::default();
    match key {
        "stroke" | "strokeColor" => {
            let color = Color::from_hex(value)?;
            patch.stroke = Some(color);
            patch.marker_end = authored.marker_end.map(|m| m.with_color(color));
            patch.marker_start = authored.marker_start.map(|m| m.with_color(color));
        }
        "strokeWidth" => patch.stroke_width = Some(parse_len(value)?),
        "opacity" => patch.opacity = Some(parse_unit(value)?),
        "dash" | "strokeDasharray" => patch.dash = Some(DashPattern::parse(value)?),
        "curve" | "type" => patch.curve = Some(CurveKind::parse(value)?),
        "animated" => patch.animated = Some(parse_bool(value)?),
        "label" => patch.label = Some(value.to_string()),
        "labelColor" => patch.label_color = Some(Color::from_hex(value)?),
        "markerEnd" => patch.marker_end = Some(marker(value, authored, authored.marker_end)?),
        "markerStart" => {
            patch.marker_start = Some(marker(value, authored, authored.marker_start)?)
        }
        _ => return None,
    }
    Some(patch)
}

fn marker(kind: &str, authored: &EdgeStyle, current: Option<MarkerSpec>) -> Option<MarkerSpec> {
    let size = match current {
        Some(MarkerSpec::Arrow { width, .. }) | Some(MarkerSpec::ArrowClosed { width, .. }) => {
            width
        }
        _ => DEFAULT_ARROW_SIZE,
    };
    let color = authored.stroke.unwrap_or(NEUTRAL_GRAY);
    MarkerSpec::from_kind(kind, size, color)
}
