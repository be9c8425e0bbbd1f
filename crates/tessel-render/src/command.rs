//! Render commands

use tessel_dom::{NodeId, Tag};
use tessel_layout::Rect;

/// Command opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Op {
    Create = 0,
    Destroy = 1,
    UpdateLayout = 2,
    UpdateStyle = 3,
    UpdateText = 4,
    Reparent = 5,
}

impl Op {
    pub fn from_u8(value: u8) -> Option<Op> {
        Some(match value {
            0 => Op::Create,
            1 => Op::Destroy,
            2 => Op::UpdateLayout,
            3 => Op::UpdateStyle,
            4 => Op::UpdateText,
            5 => Op::Reparent,
            _ => return None,
        })
    }
}

bitflags::bitflags! {
    /// Which optional fields follow a command header, in bit order
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FieldMask: u8 {
        const TAG = 1 << 0;
        const PARENT = 1 << 1;
        const SIBLING = 1 << 2;
        const LAYOUT = 1 << 3;
        const STYLES = 1 << 4;
        const TEXT = 1 << 5;
    }
}

/// One instruction to the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub op: Op,
    pub node: NodeId,
    pub tag: Option<Tag>,
    /// Outer `Some` when present; `Some(None)` means "no parent"
    pub parent: Option<Option<NodeId>>,
    pub sibling_index: Option<i32>,
    pub layout: Option<Rect>,
    /// `(property, value)` pairs sorted by property, the order they take
    /// on the wire. The constructors sort them.
    pub styles: Option<Vec<(String, String)>>,
    pub text: Option<String>,
}

impl Command {
    fn bare(op: Op, node: NodeId) -> Self {
        Self {
            op,
            node,
            tag: None,
            parent: None,
            sibling_index: None,
            layout: None,
            styles: None,
            text: None,
        }
    }

    /// Full description of a node the renderer has not seen yet
    pub fn create(
        node: NodeId,
        tag: Tag,
        parent: Option<NodeId>,
        sibling_index: usize,
        layout: Rect,
        styles: Vec<(String, String)>,
        text: Option<String>,
    ) -> Self {
        Self {
            tag: Some(tag),
            parent: Some(parent),
            sibling_index: Some(sibling_index as i32),
            layout: Some(layout),
            styles: Some(sorted(styles)),
            text,
            ..Self::bare(Op::Create, node)
        }
    }

    pub fn destroy(node: NodeId) -> Self {
        Self::bare(Op::Destroy, node)
    }

    pub fn update_layout(node: NodeId, layout: Rect) -> Self {
        Self {
            layout: Some(layout),
            ..Self::bare(Op::UpdateLayout, node)
        }
    }

    /// Only the properties that changed
    pub fn update_style(node: NodeId, styles: Vec<(String, String)>) -> Self {
        Self {
            styles: Some(sorted(styles)),
            ..Self::bare(Op::UpdateStyle, node)
        }
    }

    pub fn update_text(node: NodeId, text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Self::bare(Op::UpdateText, node)
        }
    }

    pub fn reparent(node: NodeId, parent: Option<NodeId>, sibling_index: usize) -> Self {
        Self {
            parent: Some(parent),
            sibling_index: Some(sibling_index as i32),
            ..Self::bare(Op::Reparent, node)
        }
    }

    /// Field mask matching the fields present
    pub fn mask(&self) -> FieldMask {
        let mut mask = FieldMask::empty();
        mask.set(FieldMask::TAG, self.tag.is_some());
        mask.set(FieldMask::PARENT, self.parent.is_some());
        mask.set(FieldMask::SIBLING, self.sibling_index.is_some());
        mask.set(FieldMask::LAYOUT, self.layout.is_some());
        mask.set(FieldMask::STYLES, self.styles.is_some());
        mask.set(FieldMask::TEXT, self.text.is_some());
        mask
    }
}

fn sorted(mut styles: Vec<(String, String)>) -> Vec<(String, String)> {
    styles.sort_by(|a, b| a.0.cmp(&b.0));
    styles
}
