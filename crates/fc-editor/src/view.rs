//! Outbound scene snapshot for the canvas.
//!
//! The canvas component is fed a fully resolved, ordered view of the
//! diagram: node styles with fallbacks applied, the selection border
//! already swapped in, and edge render styles as they should be drawn.

use crate::selection::Selection;
use fc_core::{
    ACCENT, Color, EdgeStyle, ElementId, ElementStore, HandleId, NodeEntity, Position,
    ResolvedNodeStyle, ShapeKind,
};
use serde::Serialize;

/// Border actually drawn around a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub border_color: Color,
    pub border_width: f32,
}

impl Frame {
    /// Border for `shape` given its resolved style and selection state.
    /// Selected shapes switch to the accent and get a minimum width
    /// (thicker for triangles, whose outline is a stroked path).
    pub fn for_node(shape: ShapeKind, style: &ResolvedNodeStyle, selected: bool) -> Self {
        if !selected {
            return Self {
                border_color: style.border_color,
                border_width: style.border_width,
            };
        }
        let min_width = match shape {
            ShapeKind::Triangle => 3.0,
            _ => 2.0,
        };
        Self {
            border_color: ACCENT,
            border_width: style.border_width.max(min_width),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeView {
    pub id: ElementId,
    pub position: Position,
    pub shape: ShapeKind,
    pub style: ResolvedNodeStyle,
    pub selected: bool,
    pub frame: Frame,
    pub handles: Vec<HandleId>,
    pub minimap_color: Color,
}

impl NodeView {
    pub fn new(node: &NodeEntity, selected: bool) -> Self {
        let style = node.style.resolve(node.shape);
        Self {
            id: node.id,
            position: node.position,
            shape: node.shape,
            frame: Frame::for_node(node.shape, &style, selected),
            style,
            selected,
            handles: HandleId::all().collect(),
            minimap_color: node.shape.minimap_color(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeView {
    pub id: ElementId,
    pub source: ElementId,
    pub target: ElementId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<HandleId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<HandleId>,
    pub style: EdgeStyle,
    pub selected: bool,
}

/// Everything the canvas needs for one redraw.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneView {
    pub revision: u64,
    pub selection: Selection,
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
}

impl SceneView {
    pub fn build(store: &ElementStore, selection: Selection) -> Self {
        let nodes = store
            .nodes()
            .map(|node| NodeView::new(node, selection.node() == Some(node.id)))
            .collect();
        let edges = store
            .edges()
            .map(|edge| EdgeView {
                id: edge.id,
                source: edge.source,
                target: edge.target,
                source_handle: edge.source_handle,
                target_handle: edge.target_handle,
                style: edge.render_style.clone(),
                selected: selection.edge() == Some(edge.id),
            })
            .collect();
        Self {
            revision: store.revision(),
            selection,
            nodes,
            edges,
        }
    }

    pub fn node(&self, id: ElementId) -> Option<&NodeView> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: ElementId) -> Option<&EdgeView> {
        self.edges.iter().find(|e| e.id == id)
    }
}
