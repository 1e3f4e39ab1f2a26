//! View Errors
//!
//! Every error here is a synchronous usage error reported to the immediate
//! caller. Nothing is retried.

use crate::NodeId;

/// Result type for view operations
pub type ViewResult<T> = Result<T, ViewError>;

/// View tree, walker and renderer errors
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    /// Walker built with neither a start position nor boundaries
    #[error("tree-walker-no-start-position: neither boundaries nor starting position have been defined")]
    NoStartPosition,
    /// Walker direction outside FORWARD/BACKWARD
    #[error("tree-walker-unknown-direction: only FORWARD and BACKWARD are allowed, got {0:?}")]
    UnknownDirection(String),
    /// Change kind outside ATTRIBUTES/CHILDREN/TEXT
    #[error("renderer-unknown-type: only ATTRIBUTES, CHILDREN and TEXT can be marked, got {0:?}")]
    UnknownChangeType(String),
    /// Position offset past the end of its parent
    #[error("position offset {offset} is out of range 0..={length}")]
    OffsetOutOfRange { offset: usize, length: usize },
    /// Position derived from a node that has no parent
    #[error("node {0} has no parent")]
    NoParent(NodeId),
    /// Node ID not present in the tree
    #[error("node {0} not found")]
    NodeNotFound(NodeId),
    /// Operation needs an element
    #[error("node {0} is not an element")]
    NotAnElement(NodeId),
    /// Operation needs a text node
    #[error("node {0} is not a text node")]
    NotAText(NodeId),
    /// Child index past the end of the child list
    #[error("child index {index} is out of range for {length} children")]
    IndexOutOfRange { index: usize, length: usize },
    /// Host node kind with no view counterpart (document, comment, ...)
    #[error("host node cannot be converted to a view node")]
    HostNodeNotConvertible,
    /// `render` called while the renderer is already borrowed
    #[error("render is already in progress")]
    RenderInProgress,
    /// Host tree rejected an operation
    #[error("host tree operation failed: {0}")]
    Host(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ViewError {
    /// Wrap a host tree error
    pub fn host(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        ViewError::Host(Box::new(err))
    }
}
