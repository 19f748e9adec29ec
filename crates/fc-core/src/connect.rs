//! Connection builder: raw drag gesture → committed edge.
//!
//! The canvas reports a connection in the order the user physically
//! dragged. Before it becomes an edge the builder checks the policy,
//! swaps the endpoints (and their handles), attaches the default
//! connection style, and mints a fresh id.
//!
//! The swap is intentional: the committed arrow points *into* the node the
//! drag started from. Do not "fix" it.

use crate::error::{GestureError, StoreError};
use crate::id::ElementId;
use crate::model::{EdgeEntity, ElementKind, HandleId};
use crate::store::ElementStore;
use crate::style::EdgeStyle;
use serde::{Deserialize, Serialize};

/// A connection as the canvas reported it, before any correction.
/// A missing target means the drag ended outside every handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionGesture {
    #[serde(default)]
    pub source: Option<ElementId>,
    #[serde(default)]
    pub source_handle: Option<HandleId>,
    #[serde(default)]
    pub target: Option<ElementId>,
    #[serde(default)]
    pub target_handle: Option<HandleId>,
}

impl ConnectionGesture {
    /// A completed drag from `source`'s handle to `target`'s handle.
    pub fn new(
        source: ElementId,
        source_handle: Option<HandleId>,
        target: ElementId,
        target_handle: Option<HandleId>,
    ) -> Self {
        Self {
            source: Some(source),
            source_handle,
            target: Some(target),
            target_handle,
        }
    }
}

/// Endpoints after direction correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub source: ElementId,
    pub target: ElementId,
    pub source_handle: Option<HandleId>,
    pub target_handle: Option<HandleId>,
}

/// Swap source/target and their handles. Fails only on a cancelled drag.
pub fn invert(gesture: &ConnectionGesture) -> Result<Connection, GestureError> {
    let (Some(source), Some(target)) = (gesture.source, gesture.target) else {
        return Err(GestureError::Cancelled);
    };
    Ok(Connection {
        source: target,
        target: source,
        source_handle: gesture.target_handle,
        target_handle: gesture.source_handle,
    })
}

/// Which gestures are allowed to become edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionPolicy {
    /// Permit `source == target`.
    pub allow_self_loops: bool,
}

impl Default for ConnectionPolicy {
    fn default() -> Self {
        Self {
            allow_self_loops: true,
        }
    }
}

/// Validates and normalizes gestures into edges.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionBuilder {
    policy: ConnectionPolicy,
    defaults: EdgeStyle,
}

impl Default for ConnectionBuilder {
    fn default() -> Self {
        Self::new(ConnectionPolicy::default())
    }
}

impl ConnectionBuilder {
    pub fn new(policy: ConnectionPolicy) -> Self {
        Self {
            policy,
            defaults: EdgeStyle::connection_default(),
        }
    }

    /// Override the style given to new edges. Attributes left unset in
    /// `defaults` fall back to the stock connection style.
    pub fn with_defaults(mut self, defaults: &EdgeStyle) -> Self {
        crate::style::merge_edge_style(&mut self.defaults, defaults);
        self
    }

    pub fn policy(&self) -> ConnectionPolicy {
        self.policy
    }

    pub fn defaults(&self) -> &EdgeStyle {
        &self.defaults
    }

    /// Turn a gesture into an uncommitted edge, checking it against `store`.
    pub fn build(
        &self,
        store: &ElementStore,
        gesture: &ConnectionGesture,
    ) -> Result<EdgeEntity, StoreError> {
        let conn = invert(gesture)?;

        if conn.source == conn.target && !self.policy.allow_self_loops {
            return Err(GestureError::SelfLoop(conn.source).into());
        }
        for endpoint in [conn.source, conn.target] {
            if !store.contains_node(endpoint) {
                return Err(GestureError::MissingNode(endpoint).into());
            }
        }

        let edge = EdgeEntity::new(
            ElementId::with_prefix(ElementKind::Edge.id_prefix()),
            conn.source,
            conn.target,
            conn.source_handle,
            conn.target_handle,
            self.defaults.clone(),
        );
        if store.edges().any(|existing| existing.same_connection(&edge)) {
            return Err(GestureError::Duplicate.into());
        }

        log::trace!(
            "connection {} -> {} built as {}",
            conn.target,
            conn.source,
            edge.id
        );
        Ok(edge)
    }
}
