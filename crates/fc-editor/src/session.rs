//! Editor session: the element store plus selection, driven by canvas events.
//!
//! The session owns the authoritative [`ElementStore`] and the
//! [`SelectionController`]. Canvas callbacks arrive either as direct method
//! calls or as [`CanvasEvent`] values through [`Editor::handle`]; each
//! returns whether anything visible changed so the bridge knows to redraw.
//!
//! Gesture and lookup failures never surface to the user. They are logged at
//! `debug` and reported as "nothing changed".

use crate::config::EditorConfig;
use crate::input::{CanvasEvent, EdgeChange, Modifiers, NodeChange};
use crate::panel::{self, PanelProps};
use crate::selection::{Selection, SelectionController};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::view::SceneView;
use fc_core::{
    ConnectionGesture, EdgeStyle, ElementId, ElementStore, NodeStyle, Position, Removed,
    ShapeKind, StoreError,
};

pub struct Editor {
    store: ElementStore,
    selection: SelectionController,
    config: EditorConfig,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// Empty diagram with the default configuration.
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            store: ElementStore::with_connections(config.connection_builder()),
            selection: SelectionController::new(config.highlight),
            config,
        }
    }

    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn selection(&self) -> Selection {
        self.selection.state()
    }

    pub fn revision(&self) -> u64 {
        self.store.revision()
    }

    /// Snapshot for the next redraw.
    pub fn view(&self) -> SceneView {
        SceneView::build(&self.store, self.selection.state())
    }

    // ─── Event dispatch ──────────────────────────────────────────────────

    /// Apply one canvas event. Returns true if the canvas must redraw.
    pub fn handle(&mut self, event: CanvasEvent) -> bool {
        log::trace!("event {event:?}");
        match event {
            CanvasEvent::Connect(gesture) => self.on_connect(&gesture).is_some(),
            CanvasEvent::NodeClick { id } => self.on_node_click(id),
            CanvasEvent::EdgeClick { id } => self.on_edge_click(id),
            CanvasEvent::BackgroundClick => self.on_background_click(),
            CanvasEvent::NodeDrop { shape, position } => {
                self.on_node_drop(shape, position);
                true
            }
            CanvasEvent::NodesChanged { changes } => self.on_nodes_changed(&changes),
            CanvasEvent::EdgesChanged { changes } => self.on_edges_changed(&changes),
            CanvasEvent::Key { key, modifiers } => self.on_key(&key, modifiers).is_some(),
        }
    }

    /// Commit a finished connection drag. Returns the new edge's id, or
    /// `None` if the gesture was cancelled or invalid.
    pub fn on_connect(&mut self, gesture: &ConnectionGesture) -> Option<ElementId> {
        let id = match self.store.connect(gesture) {
            Ok(edge) => edge.id,
            Err(err) => {
                discard(&err);
                return None;
            }
        };
        log::debug!("connected {id}");
        Some(id)
    }

    pub fn on_node_click(&mut self, id: ElementId) -> bool {
        self.selection.select_node(&mut self.store, id)
    }

    pub fn on_edge_click(&mut self, id: ElementId) -> bool {
        self.selection.select_edge(&mut self.store, id)
    }

    pub fn on_background_click(&mut self) -> bool {
        self.selection.clear(&mut self.store)
    }

    /// Place a palette shape at an already-projected canvas position.
    /// The new node is not selected.
    pub fn on_node_drop(&mut self, shape: ShapeKind, position: Position) -> ElementId {
        let id = self.store.create_node(shape, position).id;
        log::debug!("dropped {} as {id}", shape.as_str());
        id
    }

    /// Apply a batch of node changes from the canvas.
    pub fn on_nodes_changed(&mut self, changes: &[NodeChange]) -> bool {
        let mut changed = false;
        for change in changes {
            changed |= match change {
                NodeChange::Position {
                    id,
                    position: Some(position),
                    ..
                } => self.move_node(*id, *position),
                NodeChange::Position { position: None, .. } | NodeChange::Other => false,
                NodeChange::Select { id, selected: true } => self.on_node_click(*id),
                NodeChange::Select { id, selected: false } => self.deselect(*id),
                NodeChange::Remove { id } => !self.delete(&[*id]).is_empty(),
            };
        }
        changed
    }

    /// Apply a batch of edge changes from the canvas.
    pub fn on_edges_changed(&mut self, changes: &[EdgeChange]) -> bool {
        let mut changed = false;
        for change in changes {
            changed |= match change {
                EdgeChange::Select { id, selected: true } => self.on_edge_click(*id),
                EdgeChange::Select { id, selected: false } => self.deselect(*id),
                EdgeChange::Remove { id } => !self.delete(&[*id]).is_empty(),
                EdgeChange::Other => false,
            };
        }
        changed
    }

    /// Resolve and run a keyboard shortcut. Returns the action taken, if
    /// the key is bound, whether or not it changed anything.
    pub fn on_key(&mut self, key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        let action = ShortcutMap::resolve(key, modifiers)?;
        match action {
            ShortcutAction::Delete => self.delete_selected(),
            ShortcutAction::Deselect => self.on_background_click(),
        };
        Some(action)
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Store a dragged position, snapped to the configured grid.
    pub fn move_node(&mut self, id: ElementId, position: Position) -> bool {
        let position = match self.config.snap_grid {
            Some(grid) => position.snapped(grid),
            None => position,
        };
        let before = self.store.revision();
        match self.store.move_node(id, position) {
            Ok(()) => self.store.revision() != before,
            Err(err) => discard(&err),
        }
    }

    /// Shallow-merge a partial style into a node.
    pub fn update_node(&mut self, id: ElementId, patch: &NodeStyle) -> bool {
        match self.store.update_node(id, patch) {
            Ok(()) => true,
            Err(err) => discard(&err),
        }
    }

    /// Authored edge edit. Lands in both style records, even while the
    /// edge is highlighted.
    pub fn update_edge(&mut self, id: ElementId, patch: &EdgeStyle) -> bool {
        match self.store.update_edge(id, patch) {
            Ok(()) => true,
            Err(err) => discard(&err),
        }
    }

    /// Remove elements (edges of removed nodes go too) and drop a selection
    /// that pointed at any of them.
    pub fn delete(&mut self, ids: &[ElementId]) -> Removed {
        let removed = self.store.delete_elements(ids);
        if !removed.is_empty() {
            self.selection.revalidate(&mut self.store);
        }
        removed
    }

    /// Delete whatever is selected. Returns true if anything was removed.
    pub fn delete_selected(&mut self) -> bool {
        match self.selection.state().id() {
            Some(id) => !self.delete(&[id]).is_empty(),
            None => false,
        }
    }

    fn deselect(&mut self, id: ElementId) -> bool {
        if self.selection.state().is(id) {
            self.selection.clear(&mut self.store)
        } else {
            false
        }
    }

    // ─── Property panel ──────────────────────────────────────────────────

    /// Set one panel property on the selected node.
    pub fn set_node_prop(&mut self, key: &str, value: &str) -> bool {
        let Some(id) = self.selection.state().node() else {
            return false;
        };
        match panel::node_patch(key, value) {
            Some(patch) => self.update_node(id, &patch),
            None => {
                log::debug!("rejected node prop {key}={value:?}");
                false
            }
        }
    }

    /// Set one panel property on the selected edge.
    pub fn set_edge_prop(&mut self, key: &str, value: &str) -> bool {
        let Some(id) = self.selection.state().edge() else {
            return false;
        };
        let Some(edge) = self.store.edge(id) else {
            return false;
        };
        match panel::edge_patch(key, value, edge) {
            Some(patch) => self.update_edge(id, &patch),
            None => {
                log::debug!("rejected edge prop {key}={value:?}");
                false
            }
        }
    }

    pub fn selected_props(&self) -> Option<PanelProps> {
        panel::props_for(&self.store, self.selection.state())
    }
}

/// Swallow a store error the user should never see.
fn discard(err: &StoreError) -> bool {
    log::debug!("ignored: {err}");
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use fc_core::{ACCENT, Color, HandleId, HandleRole, HandleSide, NEUTRAL_GRAY, ledger};
    use pretty_assertions::assert_eq;

    fn editor_with_pair() -> (Editor, ElementId, ElementId) {
        let mut editor = Editor::new();
        let a = editor.on_node_drop(ShapeKind::Rectangle, Position::new(100.0, 100.0));
        let b = editor.on_node_drop(ShapeKind::Ellipse, Position::new(300.0, 100.0));
        (editor, a, b)
    }

    fn drag(from: ElementId, to: ElementId) -> ConnectionGesture {
        ConnectionGesture::new(
            from,
            Some(HandleId::new(HandleSide::Right, HandleRole::Source)),
            to,
            Some(HandleId::new(HandleSide::Left, HandleRole::Target)),
        )
    }

    #[test]
    fn drop_keeps_exact_position_and_selects_nothing() {
        let (editor, a, _) = editor_with_pair();
        assert_eq!(editor.store().node(a).unwrap().position, Position::new(100.0, 100.0));
        assert_eq!(editor.selection(), Selection::Idle);
    }

    #[test]
    fn cancelled_connect_is_silent() {
        let (mut editor, a, _) = editor_with_pair();
        let gesture = ConnectionGesture {
            target: None,
            ..drag(a, a)
        };
        assert!(!editor.handle(CanvasEvent::Connect(gesture)));
        assert_eq!(editor.store().edge_count(), 0);
    }

    #[test]
    fn drag_frames_snap_to_grid() {
        let (mut editor, a, _) = editor_with_pair();
        let changed = editor.on_nodes_changed(&[NodeChange::Position {
            id: a,
            position: Some(Position::new(131.0, 97.0)),
            dragging: true,
        }]);
        assert!(changed);
        assert_eq!(editor.store().node(a).unwrap().position, Position::new(135.0, 90.0));

        // Same snapped cell again: no redraw needed.
        let again = editor.on_nodes_changed(&[NodeChange::Position {
            id: a,
            position: Some(Position::new(134.0, 92.0)),
            dragging: true,
        }]);
        assert!(!again);
    }

    #[test]
    fn snapping_can_be_disabled() {
        let mut editor = Editor::with_config(EditorConfig {
            snap_grid: None,
            ..Default::default()
        });
        let a = editor.on_node_drop(ShapeKind::Circle, Position::default());
        editor.move_node(a, Position::new(7.5, 3.25));
        assert_eq!(editor.store().node(a).unwrap().position, Position::new(7.5, 3.25));
    }

    #[test]
    fn select_changes_route_through_the_controller() {
        let (mut editor, a, b) = editor_with_pair();
        let e = editor.on_connect(&drag(a, b)).unwrap();

        editor.on_edges_changed(&[EdgeChange::Select { id: e, selected: true }]);
        assert_eq!(editor.selection(), Selection::Edge(e));
        assert_eq!(editor.store().edge(e).unwrap().render_style.stroke, Some(ACCENT));

        // Deselecting something else leaves the selection alone.
        assert!(!editor.on_nodes_changed(&[NodeChange::Select { id: a, selected: false }]));
        assert_eq!(editor.selection(), Selection::Edge(e));

        editor.on_edges_changed(&[EdgeChange::Select { id: e, selected: false }]);
        assert_eq!(editor.selection(), Selection::Idle);
        assert!(ledger::is_restored(editor.store().edge(e).unwrap()));
    }

    #[test]
    fn delete_key_removes_selected_node_and_its_edges() {
        let (mut editor, a, b) = editor_with_pair();
        editor.on_connect(&drag(a, b));
        editor.on_node_click(a);

        let action = editor.on_key("Delete", Modifiers::default());
        assert_eq!(action, Some(ShortcutAction::Delete));
        assert!(!editor.store().contains_node(a));
        assert_eq!(editor.store().edge_count(), 0);
        assert_eq!(editor.selection(), Selection::Idle);
    }

    #[test]
    fn removing_the_selected_edge_clears_selection() {
        let (mut editor, a, b) = editor_with_pair();
        let e = editor.on_connect(&drag(a, b)).unwrap();
        editor.on_edge_click(e);
        assert!(editor.on_edges_changed(&[EdgeChange::Remove { id: e }]));
        assert_eq!(editor.selection(), Selection::Idle);
        assert!(editor.store().contains_node(a));
    }

    #[test]
    fn escape_deselects() {
        let (mut editor, a, _) = editor_with_pair();
        editor.on_node_click(a);
        assert!(editor.handle(CanvasEvent::key("Escape", Modifiers::default())));
        assert_eq!(editor.selection(), Selection::Idle);
        assert!(!editor.handle(CanvasEvent::key("F5", Modifiers::default())));
    }

    #[test]
    fn panel_edits_apply_to_selection_only() {
        let (mut editor, a, b) = editor_with_pair();
        assert!(!editor.set_node_prop("backgroundColor", "#ff0000"));

        editor.on_node_click(a);
        assert!(editor.set_node_prop("backgroundColor", "#ff0000"));
        assert!(!editor.set_node_prop("backgroundColor", "nope"));
        assert!(!editor.set_edge_prop("stroke", "#ff0000"));
        assert_eq!(
            editor.store().node(a).unwrap().style.background_color,
            Some(Color::rgb8(255, 0, 0))
        );
        assert_eq!(
            editor.store().node(b).unwrap().style.background_color,
            Some(Color::rgb8(255, 255, 255))
        );
    }

    #[test]
    fn edge_panel_edit_while_highlighted() {
        let (mut editor, a, b) = editor_with_pair();
        let e = editor.on_connect(&drag(a, b)).unwrap();
        editor.on_edge_click(e);
        assert!(editor.set_edge_prop("strokeWidth", "4"));

        let Some(PanelProps::Edge { style, .. }) = editor.selected_props() else {
            panic!("expected edge props");
        };
        assert_eq!(style.stroke_width, Some(4.0));
        assert_eq!(style.stroke, Some(NEUTRAL_GRAY));

        editor.on_background_click();
        let edge = editor.store().edge(e).unwrap();
        assert_eq!(edge.render_style.stroke_width, Some(4.0));
        assert_eq!(edge.render_style.stroke, Some(NEUTRAL_GRAY));
    }

    #[test]
    fn updates_to_missing_elements_report_no_change() {
        let mut editor = Editor::new();
        let ghost = ElementId::intern("node_session_ghost");
        assert!(!editor.update_node(ghost, &NodeStyle::default()));
        assert!(!editor.update_edge(ghost, &EdgeStyle::default()));
        assert!(!editor.move_node(ghost, Position::default()));
        assert!(editor.delete(&[ghost]).is_empty());
    }
}
