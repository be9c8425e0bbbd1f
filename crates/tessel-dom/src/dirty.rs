//! Dirty tracking
//!
//! Per-node flags say *what* changed; the queue says *which* nodes changed
//! since the last reconciliation tick.

use std::collections::BTreeSet;

use crate::NodeId;

bitflags::bitflags! {
    /// Aspects of a node that changed since it was last reconciled
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DirtyFlags: u8 {
        /// Parent/child structure changed
        const TREE = 0b0001;
        /// Computed style must be re-resolved
        const STYLE = 0b0010;
        /// Attributes changed
        const ATTRIBUTES = 0b0100;
        /// Text content changed
        const TEXT = 0b1000;
        const ALL = Self::TREE.bits() | Self::STYLE.bits() | Self::ATTRIBUTES.bits() | Self::TEXT.bits();
    }
}

/// Set-like queue of nodes awaiting reconciliation.
///
/// Enqueuing a node that is already queued is a no-op.
#[derive(Debug, Default)]
pub struct DirtyQueue {
    pending: BTreeSet<NodeId>,
}

impl DirtyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node; returns `false` if it was already queued
    pub fn enqueue(&mut self, id: NodeId) -> bool {
        self.pending.insert(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.pending.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take every queued node, leaving the queue empty
    pub fn drain(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }
}
