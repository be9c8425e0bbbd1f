//! Render backends

use std::collections::{BTreeMap, HashMap};

use tessel_dom::{NodeId, Tag};
use tessel_layout::Rect;

use crate::{Command, Op, decode};

/// Consumer of per-tick command buffers
pub trait RenderBackend {
    /// Apply one tick's command buffer
    fn execute(&mut self, buffer: &[u8]);

    fn get_x(&self, node: NodeId) -> f32;
    fn get_y(&self, node: NodeId) -> f32;
    fn get_width(&self, node: NodeId) -> f32;
    fn get_height(&self, node: NodeId) -> f32;
}

/// Renderer-side copy of one node
#[derive(Debug, Clone, PartialEq)]
pub struct MirrorNode {
    pub tag: Tag,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub layout: Rect,
    pub styles: BTreeMap<String, String>,
    pub text: Option<String>,
}

/// Backend that rebuilds the node tree from the command stream
///
/// Hosts without a renderer use it for layout readback; tests use it to
/// check that the stream reproduces the document. The document root
/// exists from the start, as it does on the engine side.
#[derive(Debug)]
pub struct MirrorBackend {
    nodes: HashMap<NodeId, MirrorNode>,
    executions: usize,
    last_batch: Vec<Command>,
}

impl Default for MirrorBackend {
    fn default() -> Self {
        let root = MirrorNode {
            tag: Tag::Root,
            parent: None,
            children: Vec::new(),
            layout: Rect::default(),
            styles: BTreeMap::new(),
            text: None,
        };
        Self {
            nodes: HashMap::from([(NodeId::ROOT, root)]),
            executions: 0,
            last_batch: Vec::new(),
        }
    }
}

impl MirrorBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: NodeId) -> Option<&MirrorNode> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Child ids of a mirrored node, in order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map_or(&[], |n| n.children.as_slice())
    }

    pub fn style(&self, id: NodeId, property: &str) -> Option<&str> {
        self.nodes
            .get(&id)
            .and_then(|n| n.styles.get(property))
            .map(String::as_str)
    }

    /// Number of buffers executed so far
    pub fn executions(&self) -> usize {
        self.executions
    }

    /// Commands decoded from the most recent buffer
    pub fn last_batch(&self) -> &[Command] {
        &self.last_batch
    }

    /// Apply one decoded command
    pub fn apply(&mut self, command: &Command) {
        let id = command.node;
        match command.op {
            Op::Create => {
                let node = MirrorNode {
                    tag: command.tag.unwrap_or(Tag::Unknown),
                    parent: None,
                    children: Vec::new(),
                    layout: command.layout.unwrap_or_default(),
                    styles: command.styles.iter().flatten().cloned().collect(),
                    text: command.text.clone(),
                };
                self.nodes.insert(id, node);
                if let Some(Some(parent)) = command.parent {
                    self.attach(id, parent, command.sibling_index.unwrap_or(i32::MAX));
                }
            }
            Op::Destroy => {
                self.detach(id);
                if let Some(node) = self.nodes.remove(&id) {
                    for child in node.children {
                        if let Some(c) = self.nodes.get_mut(&child) {
                            c.parent = None;
                        }
                    }
                }
            }
            Op::UpdateLayout => {
                if let (Some(node), Some(rect)) = (self.nodes.get_mut(&id), command.layout) {
                    node.layout = rect;
                }
            }
            Op::UpdateStyle => {
                if let (Some(node), Some(styles)) = (self.nodes.get_mut(&id), &command.styles) {
                    node.styles.extend(styles.iter().cloned());
                }
            }
            Op::UpdateText => {
                if let Some(node) = self.nodes.get_mut(&id) {
                    node.text = command.text.clone();
                }
            }
            Op::Reparent => {
                self.detach(id);
                if let Some(Some(parent)) = command.parent {
                    self.attach(id, parent, command.sibling_index.unwrap_or(i32::MAX));
                }
            }
        }
        if !self.nodes.contains_key(&id) && command.op != Op::Destroy {
            tracing::trace!(node = %id, op = ?command.op, "command for unknown node");
        }
    }

    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.nodes.get_mut(&id).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.retain(|&c| c != id);
        }
    }

    fn attach(&mut self, id: NodeId, parent: NodeId, index: i32) {
        let Some(p) = self.nodes.get_mut(&parent) else {
            tracing::trace!(node = %id, %parent, "attach to unknown parent");
            return;
        };
        let at = usize::try_from(index).unwrap_or(0).min(p.children.len());
        p.children.insert(at, id);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = Some(parent);
        }
    }

    fn rect(&self, id: NodeId) -> Rect {
        self.nodes.get(&id).map(|n| n.layout).unwrap_or_default()
    }
}

impl RenderBackend for MirrorBackend {
    fn execute(&mut self, buffer: &[u8]) {
        let commands = decode(buffer);
        for command in &commands {
            self.apply(command);
        }
        self.executions += 1;
        tracing::trace!(commands = commands.len(), nodes = self.nodes.len(), "executed buffer");
        self.last_batch = commands;
    }

    fn get_x(&self, node: NodeId) -> f32 {
        self.rect(node).x
    }

    fn get_y(&self, node: NodeId) -> f32 {
        self.rect(node).y
    }

    fn get_width(&self, node: NodeId) -> f32 {
        self.rect(node).width
    }

    fn get_height(&self, node: NodeId) -> f32 {
        self.rect(node).height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode;

    fn create(id: u32, parent: Option<u32>, index: usize) -> Command {
        Command::create(
            NodeId(id),
            Tag::Div,
            parent.map(NodeId),
            index,
            Rect::new(id as f32, 0.0, 10.0, 10.0),
            vec![("color".into(), "red".into())],
            None,
        )
    }

    #[test]
    fn test_builds_tree() {
        let mut backend = MirrorBackend::new();
        backend.execute(&encode(&[create(0, None, 0), create(1, Some(0), 0), create(2, Some(0), 0)]));

        assert_eq!(backend.children(NodeId(0)), &[NodeId(2), NodeId(1)]);
        assert_eq!(backend.node(NodeId(1)).unwrap().parent, Some(NodeId(0)));
        assert_eq!(backend.get_x(NodeId(2)), 2.0);
        assert_eq!(backend.style(NodeId(1), "color"), Some("red"));
        assert_eq!(backend.executions(), 1);
        assert_eq!(backend.last_batch().len(), 3);
    }

    #[test]
    fn test_reparent_and_destroy() {
        let mut backend = MirrorBackend::new();
        backend.execute(&encode(&[create(0, None, 0), create(1, Some(0), 0), create(2, Some(0), 1)]));
        backend.execute(&encode(&[Command::reparent(NodeId(2), Some(NodeId(1)), 0)]));
        assert_eq!(backend.children(NodeId(0)), &[NodeId(1)]);
        assert_eq!(backend.children(NodeId(1)), &[NodeId(2)]);

        backend.execute(&encode(&[Command::destroy(NodeId(2))]));
        assert!(!backend.contains(NodeId(2)));
        assert!(backend.children(NodeId(1)).is_empty());
    }

    #[test]
    fn test_updates_merge() {
        let mut backend = MirrorBackend::new();
        backend.execute(&encode(&[create(0, None, 0)]));
        backend.execute(&encode(&[
            Command::update_style(NodeId(0), vec![("opacity".into(), "0.5".into())]),
            Command::update_layout(NodeId(0), Rect::new(1.0, 2.0, 3.0, 4.0)),
            Command::update_text(NodeId(0), "x"),
        ]));
        let node = backend.node(NodeId(0)).unwrap();
        assert_eq!(node.styles.len(), 2);
        assert_eq!(node.text.as_deref(), Some("x"));
        assert_eq!(backend.get_height(NodeId(0)), 4.0);
        assert_eq!(backend.get_width(NodeId(9)), 0.0);
    }

    #[test]
    fn test_garbage_is_ignored() {
        let mut backend = MirrorBackend::new();
        backend.execute(&[5, 0, 0, 0, 0]);
        assert_eq!(backend.len(), 1);
        assert!(backend.last_batch().is_empty());
        assert_eq!(backend.executions(), 1);
    }
}
