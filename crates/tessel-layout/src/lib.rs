//! Tessel Layout Engine
//!
//! Turns computed styles into per-node rectangles. The default engine
//! treats every element as a single-line flex container.

mod box_model;
mod flex;
mod length;
mod text;

use std::collections::HashMap;

use tessel_dom::{DomTree, NodeId};

pub use box_model::{EdgeSizes, Rect, Size};
pub use flex::{FlexLayout, MAX_LAYOUT_DEPTH};
pub use length::{Length, font_size};
pub use text::{ApproxTextMeasurer, TextMeasurer, TextMetrics, collapse_whitespace};

/// Node rectangles produced by one layout pass
pub type LayoutMap = HashMap<NodeId, Rect>;

/// Size of the area the root box fills
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// A layout algorithm.
///
/// Reads the computed styles stored on the tree and returns a rectangle
/// for every laid-out node below `root`, positioned relative to its
/// parent's border box.
pub trait LayoutEngine {
    fn compute(
        &mut self,
        tree: &DomTree,
        root: NodeId,
        viewport: Viewport,
        measurer: &dyn TextMeasurer,
    ) -> LayoutMap;
}

/// Lay out a styled tree with the default flex engine
pub fn layout(tree: &DomTree, viewport: Viewport) -> LayoutMap {
    FlexLayout::new().compute(tree, tree.root(), viewport, &ApproxTextMeasurer)
}
