//! Input abstraction layer.
//!
//! Normalizes the callbacks the canvas component fires (connect, clicks,
//! drops, batched change lists, key presses) into a `CanvasEvent` enum
//! consumed by the editor session. Every variant also deserializes from
//! the JSON the browser side sends, tagged by `"type"`.

use fc_core::{ConnectionGesture, ElementId, Position, ShapeKind};
use serde::{Deserialize, Deserializer};

/// Keyboard modifier state at the time of an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Platform command key: ⌘ on macOS, Ctrl elsewhere.
    pub fn cmd(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A normalized event from the canvas component.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CanvasEvent {
    /// A connection drag finished (possibly on empty space).
    Connect(ConnectionGesture),

    NodeClick { id: ElementId },

    EdgeClick { id: ElementId },

    /// Click on empty canvas.
    BackgroundClick,

    /// A palette item was dropped. `position` is already in canvas space.
    NodeDrop {
        #[serde(deserialize_with = "shape_from_name")]
        shape: ShapeKind,
        position: Position,
    },

    /// Batched node changes (drag frames, selection flags, removals).
    NodesChanged { changes: Vec<NodeChange> },

    EdgesChanged { changes: Vec<EdgeChange> },

    Key {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
}

/// One entry of a node change list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeChange {
    /// Drag frame. `position` is absent when only the dragging flag flips.
    Position {
        id: ElementId,
        #[serde(default)]
        position: Option<Position>,
        #[serde(default)]
        dragging: bool,
    },
    Select { id: ElementId, selected: bool },
    Remove { id: ElementId },
    /// Measurement and other bookkeeping the store does not track.
    #[serde(other)]
    Other,
}

/// One entry of an edge change list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EdgeChange {
    Select { id: ElementId, selected: bool },
    Remove { id: ElementId },
    #[serde(other)]
    Other,
}

impl CanvasEvent {
    pub fn key(key: &str, modifiers: Modifiers) -> Self {
        Self::Key {
            key: key.to_string(),
            modifiers,
        }
    }

    /// Parse one event from the bridge's JSON form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn shape_from_name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ShapeKind, D::Error> {
    let name = String::deserialize(deserializer)?;
    Ok(ShapeKind::from_name(&name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fc_core::{HandleId, HandleRole, HandleSide};
    use pretty_assertions::assert_eq;

    #[test]
    fn connect_event_from_json() {
        let ev = CanvasEvent::from_json(
            r#"{"type":"connect","source":"n1","sourceHandle":"right-source","target":"n2","targetHandle":"left-target"}"#,
        )
        .unwrap();
        assert_eq!(
            ev,
            CanvasEvent::Connect(ConnectionGesture::new(
                ElementId::intern("n1"),
                Some(HandleId::new(HandleSide::Right, HandleRole::Source)),
                ElementId::intern("n2"),
                Some(HandleId::new(HandleSide::Left, HandleRole::Target)),
            ))
        );
    }

    #[test]
    fn cancelled_connect_has_no_target() {
        let ev = CanvasEvent::from_json(r#"{"type":"connect","source":"n1","target":null}"#).unwrap();
        let CanvasEvent::Connect(gesture) = ev else {
            panic!("expected connect");
        };
        assert_eq!(gesture.target, None);
        assert_eq!(gesture.source_handle, None);
    }

    #[test]
    fn drop_accepts_any_palette_name() {
        let ev = CanvasEvent::from_json(
            r#"{"type":"nodeDrop","shape":"Hexagon","position":{"x":10,"y":20}}"#,
        )
        .unwrap();
        assert_eq!(
            ev,
            CanvasEvent::NodeDrop {
                shape: ShapeKind::Generic,
                position: Position::new(10.0, 20.0),
            }
        );
    }

    #[test]
    fn change_lists_skip_unknown_kinds() {
        let ev = CanvasEvent::from_json(
            r#"{"type":"nodesChanged","changes":[
                {"type":"dimensions","id":"n1","dimensions":{"width":120,"height":60}},
                {"type":"position","id":"n1","position":{"x":4,"y":5},"dragging":true},
                {"type":"select","id":"n1","selected":true},
                {"type":"remove","id":"n2"}
            ]}"#,
        )
        .unwrap();
        let CanvasEvent::NodesChanged { changes } = ev else {
            panic!("expected nodesChanged");
        };
        assert_eq!(changes.len(), 4);
        assert_eq!(changes[0], NodeChange::Other);
        assert_eq!(
            changes[1],
            NodeChange::Position {
                id: ElementId::intern("n1"),
                position: Some(Position::new(4.0, 5.0)),
                dragging: true,
            }
        );
    }

    #[test]
    fn key_event_defaults_modifiers() {
        let ev = CanvasEvent::from_json(r#"{"type":"key","key":"Delete"}"#).unwrap();
        assert_eq!(ev, CanvasEvent::key("Delete", Modifiers::default()));

        let ev = CanvasEvent::from_json(r#"{"type":"key","key":"z","modifiers":{"meta":true}}"#)
            .unwrap();
        let CanvasEvent::Key { modifiers, .. } = ev else {
            panic!("expected key");
        };
        assert!(modifiers.cmd());
    }
}
