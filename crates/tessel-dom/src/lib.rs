//! Tessel DOM - Document Object Model
//!
//! Arena-backed mutable document tree. Nodes live in an indexed table and
//! reference each other by [`NodeId`]; the parent link is a plain id, so
//! the cycle check on insertion is an ancestor walk over integer lookups.

mod dirty;
mod document;
mod node;
mod operations;
mod style;
mod tag;
mod tree;

pub use dirty::{DirtyFlags, DirtyQueue};
pub use document::Document;
pub use node::{Node, PseudoState};
pub use operations::{DomError, DomResult};
pub use style::{ComputedStyle, StyleMap};
pub use tag::Tag;
pub use tree::{Descendants, DomTree};

/// Node identifier (index into the node table)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The pre-existing document root
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
