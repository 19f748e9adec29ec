use crate::id::ElementId;
use crate::model::ElementKind;
use std::fmt;

/// Why a connection gesture was not committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureError {
    /// The drag ended outside any handle.
    Cancelled,
    /// An endpoint names a node that is not in the store.
    MissingNode(ElementId),
    /// Source and target are the same node and self-loops are disabled.
    SelfLoop(ElementId),
    /// An identical connection already exists.
    Duplicate,
}

impl fmt::Display for GestureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => f.write_str("connection cancelled"),
            Self::MissingNode(id) => write!(f, "endpoint node not found (id={id})"),
            Self::SelfLoop(id) => write!(f, "self-loop not allowed (id={id})"),
            Self::Duplicate => f.write_str("connection already exists"),
        }
    }
}

/// Errors reported by the element store and connection builder.
///
/// None of these are faults: UI events can race with deletions, so the
/// editor layer turns every variant into "nothing happened".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    NotFound { kind: ElementKind, id: ElementId },
    InvalidGesture(GestureError),
    DuplicateId(ElementId),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { kind, id } => write!(f, "{kind} not found (id={id})"),
            Self::InvalidGesture(reason) => write!(f, "invalid connection gesture: {reason}"),
            Self::DuplicateId(id) => write!(f, "element id already in use (id={id})"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<GestureError> for StoreError {
    fn from(err: GestureError) -> Self {
        StoreError::InvalidGesture(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_element() {
        let err = StoreError::NotFound {
            kind: ElementKind::Edge,
            id: ElementId::intern("edge_gone"),
        };
        assert_eq!(err.to_string(), "edge not found (id=edge_gone)");

        let err: StoreError = GestureError::Cancelled.into();
        assert_eq!(
            err.to_string(),
            "invalid connection gesture: connection cancelled"
        );
    }
}
