//! DOM Node Operations
//!
//! Error type shared by the arena mutation methods on [`DomTree`](crate::DomTree).

use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Node id does not refer to a node of this tree
    #[error("node {0} not found")]
    NotFound(NodeId),

    /// Inserting a node into itself or one of its descendants, or under a leaf
    #[error("hierarchy request error: cannot insert {child} under {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    /// Reference node is not a child of the given parent
    #[error("node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },

    /// Operation requires an element node
    #[error("node {0} is not an element")]
    NotAnElement(NodeId),

    /// Selector string could not be parsed
    #[error("invalid selector {0:?}")]
    InvalidSelector(String),
}
