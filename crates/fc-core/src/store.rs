//! The element store: single source of truth for a diagram.
//!
//! Nodes and edges live in a `StableDiGraph` (connections are graph edges,
//! directed source → target) so node removal drops its edges with it and
//! indices stay valid across deletions. Two order vectors remember
//! creation order, which is the order the canvas draws in.
//!
//! Every successful mutation bumps [`ElementStore::revision`]; the canvas
//! bridge compares revisions to decide when to redraw.

use crate::connect::{ConnectionBuilder, ConnectionGesture};
use crate::error::{GestureError, StoreError};
use crate::id::ElementId;
use crate::ledger;
use crate::model::{EdgeEntity, ElementKind, HandleId, NodeEntity, Position, ShapeKind};
use crate::style::{EdgeStyle, NodeStyle, merge_node_style};
use petgraph::Direction;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::stable_graph::StableDiGraph;
use petgraph::visit::EdgeRef;
use smallvec::SmallVec;
use std::collections::HashMap;

/// Ids removed by a single [`ElementStore::delete_elements`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Removed {
    pub nodes: SmallVec<[ElementId; 4]>,
    pub edges: SmallVec<[ElementId; 8]>,
}

impl Removed {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.nodes.contains(&id) || self.edges.contains(&id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ElementStore {
    graph: StableDiGraph<NodeEntity, EdgeEntity>,
    node_index: HashMap<ElementId, NodeIndex>,
    edge_index: HashMap<ElementId, EdgeIndex>,
    node_order: Vec<ElementId>,
    edge_order: Vec<ElementId>,
    connections: ConnectionBuilder,
    revision: u64,
}

impl ElementStore {
    /// Create an empty store with the default connection policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that builds edges with `connections`.
    #[must_use]
    pub fn with_connections(connections: ConnectionBuilder) -> Self {
        Self {
            connections,
            ..Self::default()
        }
    }

    /// Mutation counter. Changes whenever the canvas must redraw.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    // ─── Nodes ───────────────────────────────────────────────────────────

    /// Drop a new shape at `position` with a fully populated default style.
    pub fn create_node(&mut self, shape: ShapeKind, position: Position) -> &NodeEntity {
        let id = ElementId::with_prefix(ElementKind::Node.id_prefix());
        let idx = self.add_node(NodeEntity::new(id, shape, position));
        &self.graph[idx]
    }

    /// Insert a node with a caller-chosen id.
    pub fn insert_node(&mut self, node: NodeEntity) -> Result<&NodeEntity, StoreError> {
        if self.contains(node.id).is_some() {
            return Err(StoreError::DuplicateId(node.id));
        }
        let idx = self.add_node(node);
        Ok(&self.graph[idx])
    }

    fn add_node(&mut self, node: NodeEntity) -> NodeIndex {
        let id = node.id;
        log::trace!("node {id} created ({})", node.shape.as_str());
        let idx = self.graph.add_node(node);
        self.node_index.insert(id, idx);
        self.node_order.push(id);
        self.touch();
        idx
    }

    /// Shallow, key-wise merge of `patch` into the node's style.
    pub fn update_node(&mut self, id: ElementId, patch: &NodeStyle) -> Result<(), StoreError> {
        let idx = self.node_idx(id)?;
        merge_node_style(&mut self.graph[idx].style, patch);
        self.touch();
        Ok(())
    }

    /// Store a position reported by the canvas (drag, snap).
    pub fn move_node(&mut self, id: ElementId, position: Position) -> Result<(), StoreError> {
        let idx = self.node_idx(id)?;
        let node = &mut self.graph[idx];
        if node.position != position {
            node.position = position;
            self.touch();
        }
        Ok(())
    }

    pub fn node(&self, id: ElementId) -> Option<&NodeEntity> {
        self.node_index.get(&id).map(|idx| &self.graph[*idx])
    }

    /// Nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeEntity> + '_ {
        self.node_order
            .iter()
            .filter_map(|id| self.node_index.get(id))
            .map(|idx| &self.graph[*idx])
    }

    pub fn contains_node(&self, id: ElementId) -> bool {
        self.node_index.contains_key(&id)
    }

    pub fn node_count(&self) -> usize {
        self.node_order.len()
    }

    fn node_idx(&self, id: ElementId) -> Result<NodeIndex, StoreError> {
        self.node_index
            .get(&id)
            .copied()
            .ok_or(StoreError::NotFound {
                kind: ElementKind::Node,
                id,
            })
    }

    // ─── Edges ───────────────────────────────────────────────────────────

    /// Build an edge from raw endpoints through the connection builder
    /// (direction correction, default style) and commit it.
    pub fn create_edge(
        &mut self,
        source: ElementId,
        target: ElementId,
        source_handle: Option<HandleId>,
        target_handle: Option<HandleId>,
    ) -> Result<&EdgeEntity, StoreError> {
        self.connect(&ConnectionGesture::new(
            source,
            source_handle,
            target,
            target_handle,
        ))
    }

    /// Commit a raw connection gesture.
    pub fn connect(&mut self, gesture: &ConnectionGesture) -> Result<&EdgeEntity, StoreError> {
        let edge = self.connections.build(self, gesture)?;
        self.insert_edge(edge)
    }

    /// Commit an already-normalized edge.
    pub fn insert_edge(&mut self, mut edge: EdgeEntity) -> Result<&EdgeEntity, StoreError> {
        if self.contains(edge.id).is_some() {
            return Err(StoreError::DuplicateId(edge.id));
        }
        let from = self.endpoint_idx(edge.source)?;
        let to = self.endpoint_idx(edge.target)?;

        ledger::snapshot_if_absent(&mut edge);
        let id = edge.id;
        let idx = self.graph.add_edge(from, to, edge);
        self.edge_index.insert(id, idx);
        self.edge_order.push(id);
        self.touch();
        log::trace!("edge {id} committed");
        Ok(&self.graph[idx])
    }

    fn endpoint_idx(&self, id: ElementId) -> Result<NodeIndex, StoreError> {
        self.node_index
            .get(&id)
            .copied()
            .ok_or(StoreError::InvalidGesture(GestureError::MissingNode(id)))
    }

    /// Authored edit from the property panel: the patch lands in both the
    /// render style and the original style.
    pub fn update_edge(&mut self, id: ElementId, patch: &EdgeStyle) -> Result<(), StoreError> {
        let idx = self.edge_idx(id)?;
        ledger::commit_edit(&mut self.graph[idx], patch);
        self.touch();
        Ok(())
    }

    /// Transient write path for highlight/restore. Never touches the
    /// original style. Returns whether the render style changed.
    pub fn set_render_style(&mut self, id: ElementId, style: EdgeStyle) -> Result<bool, StoreError> {
        let idx = self.edge_idx(id)?;
        let edge = &mut self.graph[idx];
        if edge.render_style == style {
            return Ok(false);
        }
        edge.render_style = style;
        self.touch();
        Ok(true)
    }

    pub fn edge(&self, id: ElementId) -> Option<&EdgeEntity> {
        self.edge_index.get(&id).map(|idx| &self.graph[*idx])
    }

    /// Edges in creation order.
    pub fn edges(&self) -> impl Iterator<Item = &EdgeEntity> + '_ {
        self.edge_order
            .iter()
            .filter_map(|id| self.edge_index.get(id))
            .map(|idx| &self.graph[*idx])
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.edge_order.iter().copied()
    }

    /// Ids of every edge with `node` as source or target, in creation order.
    pub fn edges_of(&self, node: ElementId) -> SmallVec<[ElementId; 8]> {
        match self.node_index.get(&node) {
            Some(&idx) => self.edges_of_idx(idx),
            None => SmallVec::new(),
        }
    }

    pub fn contains_edge(&self, id: ElementId) -> bool {
        self.edge_index.contains_key(&id)
    }

    pub fn edge_count(&self) -> usize {
        self.edge_order.len()
    }

    fn edge_idx(&self, id: ElementId) -> Result<EdgeIndex, StoreError> {
        self.edge_index
            .get(&id)
            .copied()
            .ok_or(StoreError::NotFound {
                kind: ElementKind::Edge,
                id,
            })
    }

    // ─── Both kinds ──────────────────────────────────────────────────────

    /// Which collection `id` lives in, if any.
    pub fn contains(&self, id: ElementId) -> Option<ElementKind> {
        if self.contains_node(id) {
            Some(ElementKind::Node)
        } else if self.contains_edge(id) {
            Some(ElementKind::Edge)
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.node_order.is_empty() && self.edge_order.is_empty()
    }

    /// Remove the named nodes and edges. Edges touching a removed node go
    /// with it. Unknown ids are ignored.
    pub fn delete_elements(&mut self, ids: &[ElementId]) -> Removed {
        let mut removed = Removed::default();

        for &id in ids {
            if let Some(idx) = self.node_index.remove(&id) {
                for edge_id in self.edges_of_idx(idx) {
                    self.forget_edge(edge_id);
                    removed.edges.push(edge_id);
                }
                self.graph.remove_node(idx);
                self.node_order.retain(|n| *n != id);
                removed.nodes.push(id);
            } else if let Some(idx) = self.edge_index.get(&id).copied() {
                self.graph.remove_edge(idx);
                self.forget_edge(id);
                removed.edges.push(id);
            }
        }

        if !removed.is_empty() {
            log::trace!(
                "deleted {} node(s), {} edge(s)",
                removed.nodes.len(),
                removed.edges.len()
            );
            self.touch();
        }
        removed
    }

    fn edges_of_idx(&self, idx: NodeIndex) -> SmallVec<[ElementId; 8]> {
        // Self-loops show up in both directions.
        let mut ids: SmallVec<[ElementId; 8]> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .chain(self.graph.edges_directed(idx, Direction::Incoming))
            .map(|e| e.weight().id)
            .collect();
        ids.sort_by_key(|id| self.edge_order.iter().position(|o| o == id));
        ids.dedup();
        ids
    }

    /// Drop the index entries for an edge. The graph edge itself is
    /// removed by the caller (or implicitly with its node).
    fn forget_edge(&mut self, id: ElementId) {
        self.edge_index.remove(&id);
        self.edge_order.retain(|e| *e != id);
    }
}
