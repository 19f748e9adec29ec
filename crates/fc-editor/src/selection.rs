//! Selection controller: at most one selected element, node or edge.
//!
//! Selection is a single tagged value, so "a node and an edge at once"
//! cannot be represented. Every transition restores all edges through the
//! ledger first, then (for edge selection) highlights the new edge, so a
//! redraw never sees two highlighted edges.

use fc_core::ledger::{self, Highlight};
use fc_core::{ElementId, ElementStore};
use serde::Serialize;

/// What is currently selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Selection {
    #[default]
    Idle,
    Node(ElementId),
    Edge(ElementId),
}

impl Selection {
    pub fn node(&self) -> Option<ElementId> {
        match self {
            Selection::Node(id) => Some(*id),
            _ => None,
        }
    }

    pub fn edge(&self) -> Option<ElementId> {
        match self {
            Selection::Edge(id) => Some(*id),
            _ => None,
        }
    }

    pub fn id(&self) -> Option<ElementId> {
        match self {
            Selection::Idle => None,
            Selection::Node(id) | Selection::Edge(id) => Some(*id),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Selection::Idle)
    }

    pub fn is(&self, id: ElementId) -> bool {
        self.id() == Some(id)
    }
}

/// Owns the selection state and drives edge highlighting in the store.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    state: Selection,
    highlight: Highlight,
}

impl SelectionController {
    pub fn new(highlight: Highlight) -> Self {
        Self {
            state: Selection::Idle,
            highlight,
        }
    }

    pub fn state(&self) -> Selection {
        self.state
    }

    /// Select a node. Unknown ids select nothing.
    /// Returns true if the selection or any edge appearance changed.
    pub fn select_node(&mut self, store: &mut ElementStore, id: ElementId) -> bool {
        if !store.contains_node(id) {
            log::debug!("click on missing node {id}; clearing selection");
            return self.clear(store);
        }
        let restored = restore_all(store);
        self.transition(Selection::Node(id)) || restored
    }

    /// Select an edge and highlight it. Unknown ids select nothing.
    pub fn select_edge(&mut self, store: &mut ElementStore, id: ElementId) -> bool {
        let Some(edge) = store.edge(id) else {
            log::debug!("click on missing edge {id}; clearing selection");
            return self.clear(store);
        };
        // Compute from the authored record before anything is rewritten.
        let lit = ledger::apply_highlight(edge, &self.highlight);

        let restored = restore_all(store);
        let highlighted = store.set_render_style(id, lit).unwrap_or(false);
        self.transition(Selection::Edge(id)) || restored || highlighted
    }

    /// Back to `Idle`; every edge shows its authored style.
    pub fn clear(&mut self, store: &mut ElementStore) -> bool {
        let restored = restore_all(store);
        self.transition(Selection::Idle) || restored
    }

    /// Drop a selection whose element no longer exists in `store`.
    /// Call after every store mutation.
    pub fn revalidate(&mut self, store: &mut ElementStore) -> bool {
        let dangling = match self.state {
            Selection::Idle => false,
            Selection::Node(id) => !store.contains_node(id),
            Selection::Edge(id) => !store.contains_edge(id),
        };
        if dangling {
            log::debug!("selection {:?} vanished from the store", self.state);
            self.clear(store)
        } else {
            false
        }
    }

    fn transition(&mut self, next: Selection) -> bool {
        if self.state == next {
            return false;
        }
        log::trace!("selection {:?} -> {:?}", self.state, next);
        self.state = next;
        true
    }
}

/// Put every edge back to its authored style. Returns true if any changed.
fn restore_all(store: &mut ElementStore) -> bool {
    let ids: Vec<ElementId> = store.edge_ids().collect();
    let mut changed = false;
    for id in ids {
        let Some(edge) = store.edge(id) else { continue };
        if ledger::is_restored(edge) {
            continue;
        }
        let style = ledger::restore(edge);
        changed |= store.set_render_style(id, style).unwrap_or(false);
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use fc_core::{ACCENT, EdgeEntity, EdgeStyle, Position, ShapeKind};

    struct Fixture {
        store: ElementStore,
        a: ElementId,
        b: ElementId,
        e: ElementId,
        f: ElementId,
    }

    fn fixture() -> Fixture {
        let mut store = ElementStore::new();
        let a = store.create_node(ShapeKind::Rectangle, Position::new(0.0, 0.0)).id;
        let b = store.create_node(ShapeKind::Ellipse, Position::new(200.0, 0.0)).id;
        let e = store.create_edge(a, b, None, None).unwrap().id;
        let f = store.create_edge(b, a, None, None).unwrap().id;
        Fixture { store, a, b, e, f }
    }

    fn highlighted(store: &ElementStore) -> Vec<ElementId> {
        store
            .edges()
            .filter(|e| !ledger::is_restored(e))
            .map(|e| e.id)
            .collect()
    }

    #[test]
    fn node_after_node_leaves_no_highlight() {
        let mut fx = fixture();
        let mut sel = SelectionController::default();
        assert!(sel.select_node(&mut fx.store, fx.a));
        assert!(sel.select_node(&mut fx.store, fx.b));
        assert_eq!(sel.state(), Selection::Node(fx.b));
        assert!(highlighted(&fx.store).is_empty());
    }

    #[test]
    fn edge_selection_moves_the_highlight() {
        let mut fx = fixture();
        let mut sel = SelectionController::default();

        sel.select_edge(&mut fx.store, fx.e);
        assert_eq!(highlighted(&fx.store), vec![fx.e]);
        assert_eq!(fx.store.edge(fx.e).unwrap().render_style.stroke, Some(ACCENT));

        sel.select_edge(&mut fx.store, fx.f);
        assert_eq!(highlighted(&fx.store), vec![fx.f]);
        assert_eq!(sel.state(), Selection::Edge(fx.f));
    }

    #[test]
    fn reselecting_the_same_edge_is_stable() {
        let mut fx = fixture();
        let mut sel = SelectionController::default();
        sel.select_edge(&mut fx.store, fx.e);
        let rev = fx.store.revision();
        assert!(!sel.select_edge(&mut fx.store, fx.e));
        assert_eq!(fx.store.revision(), rev);
        assert_eq!(fx.store.edge(fx.e).unwrap().render_style.stroke_width, Some(3.0));
    }

    #[test]
    fn leaving_edge_selection_restores_it() {
        let mut fx = fixture();
        let mut sel = SelectionController::default();
        sel.select_edge(&mut fx.store, fx.e);
        sel.select_node(&mut fx.store, fx.a);
        assert!(highlighted(&fx.store).is_empty());

        sel.select_edge(&mut fx.store, fx.f);
        sel.clear(&mut fx.store);
        assert!(sel.state().is_idle());
        assert!(highlighted(&fx.store).is_empty());
    }

    #[test]
    fn clicking_a_missing_element_selects_nothing() {
        let mut fx = fixture();
        let mut sel = SelectionController::default();
        sel.select_edge(&mut fx.store, fx.e);
        assert!(sel.select_node(&mut fx.store, ElementId::intern("node_deleted")));
        assert_eq!(sel.state(), Selection::Idle);
        assert!(highlighted(&fx.store).is_empty());

        sel.select_node(&mut fx.store, fx.a);
        sel.select_edge(&mut fx.store, ElementId::intern("edge_deleted"));
        assert_eq!(sel.state(), Selection::Idle);
    }

    #[test]
    fn revalidate_clears_dangling_selection() {
        let mut fx = fixture();
        let mut sel = SelectionController::default();
        sel.select_edge(&mut fx.store, fx.f);
        assert!(!sel.revalidate(&mut fx.store));

        fx.store.delete_elements(&[fx.b]);
        assert!(sel.revalidate(&mut fx.store));
        assert_eq!(sel.state(), Selection::Idle);
        assert!(fx.store.edges().next().is_none());
    }

    #[test]
    fn sparse_edge_keeps_its_authored_style_across_selection() {
        let mut fx = fixture();
        let sparse = EdgeStyle {
            animated: Some(true),
            ..Default::default()
        };
        let id = ElementId::intern("edge_sparse");
        fx.store
            .insert_edge(EdgeEntity::new(id, fx.a, fx.b, None, None, sparse.clone()))
            .unwrap();

        let mut sel = SelectionController::default();
        for _ in 0..2 {
            sel.select_edge(&mut fx.store, id);
            let edge = fx.store.edge(id).unwrap();
            assert_eq!(edge.render_style.stroke, Some(ACCENT));
            assert_eq!(edge.render_style.stroke_width, Some(3.0));
            assert_eq!(edge.original_style, sparse);

            sel.clear(&mut fx.store);
            let edge = fx.store.edge(id).unwrap();
            assert_eq!(edge.original_style, sparse);
            assert!(ledger::is_restored(edge));
        }
    }

    #[test]
    fn selection_serializes_as_tagged_value() {
        let json = serde_json::to_value(Selection::Edge(ElementId::intern("edge_x"))).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "edge", "id": "edge_x"}));
        let idle = serde_json::to_value(Selection::Idle).unwrap();
        assert_eq!(idle, serde_json::json!({"kind": "idle"}));
    }
}
