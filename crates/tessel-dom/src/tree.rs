//! DOM Tree (arena-based allocation)
//!
//! Nodes are stored in a `Vec` indexed by id. Ids are handed out in
//! allocation order, so the root is 0 and every later node gets the next
//! integer. Nodes are never freed: a removed subtree simply becomes
//! unreachable from the root and can be re-attached later.

use crate::{
    ComputedStyle, DirtyFlags, DirtyQueue, DomError, DomResult, Node, NodeId, PseudoState,
    StyleMap, Tag,
};

/// Arena-based DOM tree with dirty tracking
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    dirty: DirtyQueue,
}

impl DomTree {
    /// Create a tree holding only the document root
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeId::ROOT, Tag::Root)],
            dirty: DirtyQueue::new(),
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Number of allocated nodes, reachable or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Never true: the root always exists
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.nodes.get(id.index()).ok_or(DomError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> DomResult<&mut Node> {
        self.nodes.get_mut(id.index()).ok_or(DomError::UnknownNode(id))
    }

    // ------------------------------------------------------------------
    // Creation
    // ------------------------------------------------------------------

    fn alloc(&mut self, build: impl FnOnce(NodeId) -> Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(build(id));
        tracing::trace!(%id, "allocated node");
        id
    }

    pub fn create_element(&mut self, tag: Tag) -> NodeId {
        self.alloc(|id| Node::new(id, tag))
    }

    pub fn create_text_node(&mut self, text: &str) -> NodeId {
        self.alloc(|id| Node::text_node(id, text))
    }

    /// Create an element with its attributes and inline style already set.
    ///
    /// Nothing is queued; pair with [`DomTree::attach_parsed`].
    pub fn create_parsed_element(
        &mut self,
        tag: Tag,
        attributes: impl IntoIterator<Item = (String, String)>,
        inline_style: StyleMap,
    ) -> NodeId {
        self.alloc(|id| {
            let mut node = Node::new(id, tag);
            node.attributes = attributes
                .into_iter()
                .map(|(name, value)| (name.to_ascii_lowercase(), value))
                .collect();
            node.inline_style = inline_style;
            node
        })
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    /// Append `child` as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` before `reference`, or append when `reference` is `None`.
    ///
    /// The child is first detached from its current parent.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<()> {
        self.check_insertion(parent, child)?;

        if let Some(reference) = reference {
            if self.node(parent)?.child_index(reference).is_none() {
                return Err(DomError::NotFound { parent, child: reference });
            }
            if reference == child {
                // Inserting a node before itself leaves it where it is
                self.mark_dirty(parent, DirtyFlags::TREE);
                self.mark_dirty(child, DirtyFlags::TREE);
                return Ok(());
            }
        }

        self.detach(child);
        let parent_node = &mut self.nodes[parent.index()];
        let index = reference
            .and_then(|r| parent_node.child_index(r))
            .unwrap_or(parent_node.children.len());
        parent_node.children.insert(index, child);
        self.nodes[child.index()].parent = Some(parent);

        self.mark_dirty(parent, DirtyFlags::TREE);
        self.mark_dirty(child, DirtyFlags::TREE);
        Ok(())
    }

    /// Remove `child` from `parent`'s child list
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.node(child)?;
        let index = self
            .node(parent)?
            .child_index(child)
            .ok_or(DomError::NotFound { parent, child })?;

        self.nodes[parent.index()].children.remove(index);
        self.nodes[child.index()].parent = None;

        self.mark_dirty(parent, DirtyFlags::TREE);
        self.mark_dirty(child, DirtyFlags::TREE);
        Ok(())
    }

    /// Append without touching the dirty queue.
    ///
    /// Used by bulk builders (the markup parser) which announce the new
    /// nodes to the reconciler themselves.
    pub fn attach_parsed(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.check_insertion(parent, child)?;
        self.detach(child);
        self.nodes[parent.index()].children.push(child);
        self.nodes[child.index()].parent = Some(parent);
        Ok(())
    }

    /// Validate an insertion before any mutation happens
    fn check_insertion(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.node(parent)?;
        self.node(child)?;

        if child == parent || self.ancestors(parent).any(|a| a == child) {
            return Err(DomError::Cycle { parent, child });
        }
        if child == NodeId::ROOT {
            return Err(DomError::RootNotMovable);
        }
        Ok(())
    }

    /// Unlink `child` from its current parent, if any
    fn detach(&mut self, child: NodeId) {
        let Some(old_parent) = self.nodes[child.index()].parent.take() else {
            return;
        };
        let siblings = &mut self.nodes[old_parent.index()].children;
        if let Some(index) = siblings.iter().position(|&c| c == child) {
            siblings.remove(index);
        }
        self.mark_dirty(old_parent, DirtyFlags::TREE);
    }

    // ------------------------------------------------------------------
    // Content
    // ------------------------------------------------------------------

    /// Set an attribute. Selectors may depend on it, so the node and its
    /// following siblings need restyling.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.node_mut(id)?
            .attributes
            .insert(name.to_ascii_lowercase(), value.to_string());
        self.mark_dirty(id, DirtyFlags::ATTRIBUTES | DirtyFlags::STYLE);
        self.mark_following_siblings(id);
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<Option<String>> {
        let removed = self.node_mut(id)?.attributes.remove(&name.to_ascii_lowercase());
        if removed.is_some() {
            self.mark_dirty(id, DirtyFlags::ATTRIBUTES | DirtyFlags::STYLE);
            self.mark_following_siblings(id);
        }
        Ok(removed)
    }

    pub fn set_inline_style(&mut self, id: NodeId, property: &str, value: &str) -> DomResult<()> {
        self.node_mut(id)?
            .inline_style
            .insert(property.to_ascii_lowercase(), value.to_string());
        self.mark_dirty(id, DirtyFlags::STYLE);
        Ok(())
    }

    pub fn remove_inline_style(&mut self, id: NodeId, property: &str) -> DomResult<Option<String>> {
        let removed = self
            .node_mut(id)?
            .inline_style
            .remove(&property.to_ascii_lowercase());
        if removed.is_some() {
            self.mark_dirty(id, DirtyFlags::STYLE);
        }
        Ok(removed)
    }

    /// Replace the whole inline style map
    pub fn set_inline_styles(&mut self, id: NodeId, styles: StyleMap) -> DomResult<()> {
        self.node_mut(id)?.inline_style = styles;
        self.mark_dirty(id, DirtyFlags::STYLE);
        Ok(())
    }

    pub fn set_text(&mut self, id: NodeId, text: &str) -> DomResult<()> {
        self.node_mut(id)?.text = Some(text.to_string());
        self.mark_dirty(id, DirtyFlags::TEXT);
        Ok(())
    }

    pub fn set_pseudo_state(&mut self, id: NodeId, state: PseudoState) -> DomResult<()> {
        let node = self.node_mut(id)?;
        if node.pseudo_state == state {
            return Ok(());
        }
        node.pseudo_state = state;
        self.mark_dirty(id, DirtyFlags::STYLE);
        self.mark_following_siblings(id);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Dirty tracking
    // ------------------------------------------------------------------

    /// Add `flags` to a node and queue it for the next tick
    pub fn mark_dirty(&mut self, id: NodeId, flags: DirtyFlags) {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.dirty |= flags;
            self.dirty.enqueue(id);
        }
    }

    /// Add `flags` without queueing. For a reconciler that has already
    /// drained the queue for the current tick.
    pub fn add_dirty_flags(&mut self, id: NodeId, flags: DirtyFlags) {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.dirty |= flags;
        }
    }

    /// Remove `flags` from a node without touching the queue
    pub fn clear_dirty(&mut self, id: NodeId, flags: DirtyFlags) {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.dirty.remove(flags);
        }
    }

    /// Flag every node for restyling (stylesheet changes)
    pub fn mark_all_style_dirty(&mut self) {
        for node in &mut self.nodes {
            node.dirty |= DirtyFlags::STYLE;
        }
    }

    fn mark_following_siblings(&mut self, id: NodeId) {
        let Some(parent) = self.nodes[id.index()].parent else {
            return;
        };
        let siblings = &self.nodes[parent.index()].children;
        let Some(index) = siblings.iter().position(|&c| c == id) else {
            return;
        };
        let following: Vec<NodeId> = siblings[index + 1..].to_vec();
        for sibling in following {
            self.mark_dirty(sibling, DirtyFlags::STYLE);
        }
    }

    pub fn dirty_queue(&self) -> &DirtyQueue {
        &self.dirty
    }

    /// Drain the dirty queue
    pub fn take_dirty(&mut self) -> Vec<NodeId> {
        self.dirty.drain()
    }

    /// Store a freshly resolved style, clearing the `STYLE` flag
    pub fn set_computed_style(&mut self, id: NodeId, style: ComputedStyle) {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.computed_style = Some(style);
            node.dirty.remove(DirtyFlags::STYLE);
        }
    }

    // ------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Index of `id` within its parent's child list
    pub fn sibling_index(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.get(parent)?.child_index(id)
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.sibling_index(id)?;
        index.checked_sub(1).map(|i| self.nodes[parent.index()].children[i])
    }

    /// Preceding siblings, nearest first
    pub fn preceding_siblings(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let siblings = match (self.parent(id), self.sibling_index(id)) {
            (Some(parent), Some(index)) => &self.nodes[parent.index()].children[..index],
            _ => &[][..],
        };
        siblings.iter().rev().copied()
    }

    /// Strict ancestors, nearest first
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&a| self.parent(a))
    }

    /// Whether the node hangs off the document root
    pub fn is_reachable(&self, id: NodeId) -> bool {
        id == NodeId::ROOT || self.ancestors(id).any(|a| a == NodeId::ROOT)
    }

    /// Depth-first, document-order walk of `id` and its subtree
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let stack = if self.contains(id) { vec![id] } else { Vec::new() };
        Descendants { tree: self, stack }
    }

    /// First element in document order whose `id` attribute equals `value`
    pub fn get_element_by_id(&self, value: &str) -> Option<NodeId> {
        self.descendants(NodeId::ROOT)
            .find(|&id| self.nodes[id.index()].element_id() == Some(value))
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Pre-order iterator over a subtree
pub struct Descendants<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack.extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential() {
        let mut tree = DomTree::new();
        let a = tree.create_element(Tag::Div);
        let b = tree.create_text_node("hi");
        assert_eq!(a, NodeId(1));
        assert_eq!(b, NodeId(2));
        assert_eq!(tree.get(b).unwrap().text.as_deref(), Some("hi"));
    }

    #[test]
    fn test_parsed_elements_stay_off_the_queue() {
        let mut tree = DomTree::new();
        let mut inline = StyleMap::new();
        inline.insert("color".into(), "red".into());
        let div = tree.create_parsed_element(Tag::Div, [("ID".to_string(), "x".to_string())], inline);
        tree.attach_parsed(NodeId::ROOT, div).unwrap();

        let node = tree.get(div).unwrap();
        assert_eq!(node.attribute("id"), Some("x"));
        assert_eq!(node.inline_style.get("color").map(String::as_str), Some("red"));
        assert!(node.dirty.is_empty());
        assert!(tree.take_dirty().is_empty());
    }

    #[test]
    fn test_insert_before_self_is_noop() {
        let mut tree = DomTree::new();
        let a = tree.create_element(Tag::Div);
        let b = tree.create_element(Tag::Div);
        tree.append_child(NodeId::ROOT, a).unwrap();
        tree.append_child(NodeId::ROOT, b).unwrap();

        tree.insert_before(NodeId::ROOT, b, Some(b)).unwrap();
        assert_eq!(tree.children(NodeId::ROOT), &[a, b]);
    }

    #[test]
    fn test_descendants_document_order() {
        let mut tree = DomTree::new();
        let a = tree.create_element(Tag::Div);
        let a1 = tree.create_element(Tag::Span);
        let b = tree.create_element(Tag::P);
        tree.append_child(NodeId::ROOT, a).unwrap();
        tree.append_child(a, a1).unwrap();
        tree.append_child(NodeId::ROOT, b).unwrap();

        let order: Vec<_> = tree.descendants(NodeId::ROOT).collect();
        assert_eq!(order, vec![NodeId::ROOT, a, a1, b]);
    }

    #[test]
    fn test_attribute_change_restyles_following_siblings() {
        let mut tree = DomTree::new();
        let a = tree.create_element(Tag::Div);
        let b = tree.create_element(Tag::Div);
        tree.append_child(NodeId::ROOT, a).unwrap();
        tree.append_child(NodeId::ROOT, b).unwrap();
        tree.take_dirty();
        tree.clear_dirty(b, DirtyFlags::ALL);

        tree.set_attribute(a, "CLASS", "x").unwrap();
        assert_eq!(tree.get(a).unwrap().attribute("class"), Some("x"));
        assert!(tree.get(b).unwrap().dirty.contains(DirtyFlags::STYLE));
        assert!(tree.dirty_queue().contains(b));
    }

    #[test]
    fn test_set_computed_style_clears_style_flag() {
        let mut tree = DomTree::new();
        let a = tree.create_element(Tag::Div);
        tree.set_inline_style(a, "color", "red").unwrap();
        assert!(tree.get(a).unwrap().dirty.contains(DirtyFlags::STYLE));

        tree.set_computed_style(a, ComputedStyle::new());
        assert!(!tree.get(a).unwrap().dirty.contains(DirtyFlags::STYLE));
        assert!(tree.get(a).unwrap().computed_style.is_some());
    }
}
