//! Document - High-level document API

use crate::{DomTree, NodeId, Tag};

/// A document: the node tree plus where it came from
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL or path
    url: String,
}

impl Document {
    /// Create a document holding only the root node
    pub fn new(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// First reachable element with the given tag, in document order
    pub fn find_first(&self, tag: Tag) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .find(|&id| self.tree.get(id).is_some_and(|n| n.tag == tag))
    }

    /// Every reachable element with the given tag, in document order
    pub fn find_all(&self, tag: Tag) -> Vec<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .filter(|&id| self.tree.get(id).is_some_and(|n| n.tag == tag))
            .collect()
    }

    pub fn body(&self) -> Option<NodeId> {
        self.find_first(Tag::Body)
    }

    pub fn head(&self) -> Option<NodeId> {
        self.find_first(Tag::Head)
    }

    /// Text content of the first `<title>`
    pub fn title(&self) -> String {
        let Some(title) = self.find_first(Tag::Title) else {
            return String::new();
        };
        self.text_content(title)
    }

    /// Concatenated text of every text node under `id`
    pub fn text_content(&self, id: NodeId) -> String {
        self.tree
            .descendants(id)
            .filter_map(|n| self.tree.get(n).and_then(|node| node.text.as_deref()))
            .collect()
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree.get_element_by_id(id)
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}
