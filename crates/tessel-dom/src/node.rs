//! DOM Node

use std::collections::HashMap;

use crate::{ComputedStyle, DirtyFlags, NodeId, StyleMap, Tag};

bitflags::bitflags! {
    /// Interaction state tested by `:hover` / `:focus`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PseudoState: u8 {
        const HOVER = 0b01;
        const FOCUS = 0b10;
    }
}

/// DOM Node
///
/// Children are owned by id; `parent` is a non-owning back-reference.
/// Fields are readable from anywhere but only [`crate::DomTree`] mutates
/// them, so structure and dirty bookkeeping stay consistent.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub tag: Tag,
    /// Attribute names are stored lowercased
    pub attributes: HashMap<String, String>,
    pub inline_style: StyleMap,
    /// Only meaningful for text nodes
    pub text: Option<String>,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    pub pseudo_state: PseudoState,
    pub dirty: DirtyFlags,
    /// `None` until the node is first resolved
    pub computed_style: Option<ComputedStyle>,
}

impl Node {
    pub(crate) fn new(id: NodeId, tag: Tag) -> Self {
        Self {
            id,
            tag,
            attributes: HashMap::new(),
            inline_style: StyleMap::new(),
            text: None,
            children: Vec::new(),
            parent: None,
            pseudo_state: PseudoState::empty(),
            dirty: DirtyFlags::empty(),
            computed_style: None,
        }
    }

    pub(crate) fn text_node(id: NodeId, content: &str) -> Self {
        let mut node = Self::new(id, Tag::Text);
        node.text = Some(content.to_string());
        node
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        self.tag == Tag::Text
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        !self.is_text()
    }

    /// Attribute lookup (name is matched case-insensitively)
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match self.attributes.get(name) {
            Some(value) => Some(value.as_str()),
            None => self
                .attributes
                .get(&name.to_ascii_lowercase())
                .map(String::as_str),
        }
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// The `id` attribute
    pub fn element_id(&self) -> Option<&str> {
        self.attribute("id")
    }

    /// Whitespace-separated tokens of the `class` attribute
    pub fn class_list(&self) -> impl Iterator<Item = &str> {
        self.attribute("class").unwrap_or("").split_ascii_whitespace()
    }

    /// Position of `child` in this node's child list
    pub fn child_index(&self, child: NodeId) -> Option<usize> {
        self.children.iter().position(|&c| c == child)
    }
}
