//! DOM Node Operations
//!
//! Errors raised by structural manipulation: appendChild, insertBefore, removeChild.

use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Node not found
    #[error("Node not found: {0}")]
    NotFound(NodeId),
    /// Hierarchy error (e.g., inserting an ancestor or the document)
    #[error("Hierarchy request error")]
    HierarchyRequest,
    /// Operation needs a different kind of node
    #[error("Invalid node type: {0}")]
    InvalidNodeType(NodeId),
    /// Node is not a child of the given parent
    #[error("Node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },
}
