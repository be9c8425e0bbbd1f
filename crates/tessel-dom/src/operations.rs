//! DOM Node Operations errors
//!
//! Failures of appendChild, removeChild and insertBefore. A failed
//! operation never leaves a partial mutation behind.

use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// The child is the parent itself or one of its ancestors
    #[error("inserting {child} under {parent} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },

    /// A node expected to be a child of `parent` is not
    #[error("{child} is not a child of {parent}")]
    NotFound { parent: NodeId, child: NodeId },

    /// The id was never allocated
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// The document root cannot be inserted anywhere
    #[error("the document root cannot be moved")]
    RootNotMovable,
}
