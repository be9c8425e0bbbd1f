//! Flexbox layout
//!
//! Every element box is a single-line flex container. Sizes are border-box
//! sizes; rectangles are relative to the parent's border box.

use std::collections::HashMap;

use tessel_dom::{ComputedStyle, DomTree, NodeId};

use crate::{
    EdgeSizes, LayoutEngine, LayoutMap, Length, Rect, Size, TextMeasurer, TextMetrics, Viewport,
    collapse_whitespace, font_size,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Row,
    RowReverse,
    Column,
    ColumnReverse,
}

impl Direction {
    fn parse(value: &str) -> Self {
        match value {
            "row" => Direction::Row,
            "row-reverse" => Direction::RowReverse,
            "column-reverse" => Direction::ColumnReverse,
            _ => Direction::Column,
        }
    }

    fn is_row(self) -> bool {
        matches!(self, Direction::Row | Direction::RowReverse)
    }

    fn is_reverse(self) -> bool {
        matches!(self, Direction::RowReverse | Direction::ColumnReverse)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Justify {
    Start,
    End,
    Center,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

impl Justify {
    fn parse(value: &str) -> Self {
        match value {
            "flex-end" | "end" | "right" => Justify::End,
            "center" => Justify::Center,
            "space-between" => Justify::SpaceBetween,
            "space-around" => Justify::SpaceAround,
            "space-evenly" => Justify::SpaceEvenly,
            _ => Justify::Start,
        }
    }

    /// Leading offset and gap between items for `remaining` free space
    fn distribute(self, remaining: f32, count: usize) -> (f32, f32) {
        let n = count as f32;
        match self {
            Justify::End => (remaining, 0.0),
            Justify::Center => (remaining / 2.0, 0.0),
            _ if remaining <= 0.0 || count == 0 => (0.0, 0.0),
            Justify::SpaceBetween if count > 1 => (0.0, remaining / (n - 1.0)),
            Justify::SpaceAround => (remaining / n / 2.0, remaining / n),
            Justify::SpaceEvenly => (remaining / (n + 1.0), remaining / (n + 1.0)),
            _ => (0.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Start,
    End,
    Center,
    Stretch,
}

impl Align {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "auto" => None,
            "flex-start" | "start" | "self-start" | "baseline" => Some(Align::Start),
            "flex-end" | "end" | "self-end" => Some(Align::End),
            "center" => Some(Align::Center),
            _ => Some(Align::Stretch),
        }
    }
}

/// The layout-relevant part of a computed style
#[derive(Debug, Clone)]
struct BoxStyle {
    display_none: bool,
    direction: Direction,
    justify: Justify,
    align_items: Align,
    align_self: Option<Align>,
    grow: f32,
    shrink: f32,
    basis: Length,
    width: Length,
    height: Length,
    min_width: Length,
    min_height: Length,
    max_width: Length,
    max_height: Length,
    /// top, right, bottom, left
    margin: [Length; 4],
    padding: [Length; 4],
    border: [Length; 4],
}

impl BoxStyle {
    fn from_style(style: Option<&ComputedStyle>) -> Self {
        let get = |name: &str, default: &'static str| -> String {
            style
                .and_then(|s| s.get(name))
                .unwrap_or(default)
                .trim()
                .to_ascii_lowercase()
        };
        let fs = style.map_or(16.0, font_size);
        let len = |name: &str, default: &'static str| Length::parse(&get(name, default), fs);
        let number = |name: &str, default: f32| {
            get(name, "")
                .parse::<f32>()
                .ok()
                .filter(|n| n.is_finite() && *n >= 0.0)
                .unwrap_or(default)
        };
        let sides = |prefix: &str, suffix: &str| {
            ["top", "right", "bottom", "left"].map(|side| len(&format!("{prefix}-{side}{suffix}"), "0"))
        };

        let border_style = get("border-style", "none");
        let border = if matches!(border_style.as_str(), "none" | "hidden") {
            [Length::Px(0.0); 4]
        } else {
            sides("border", "-width")
        };

        Self {
            display_none: get("display", "inline") == "none",
            direction: Direction::parse(&get("flex-direction", "column")),
            justify: Justify::parse(&get("justify-content", "flex-start")),
            align_items: Align::parse(&get("align-items", "stretch")).unwrap_or(Align::Stretch),
            align_self: Align::parse(&get("align-self", "auto")),
            grow: number("flex-grow", 0.0),
            shrink: number("flex-shrink", 1.0),
            basis: len("flex-basis", "auto"),
            width: len("width", "auto"),
            height: len("height", "auto"),
            min_width: len("min-width", "auto"),
            min_height: len("min-height", "auto"),
            max_width: len("max-width", "none"),
            max_height: len("max-height", "none"),
            margin: sides("margin", ""),
            padding: sides("padding", ""),
            border,
        }
    }

    /// Padding plus border, percentages against the containing width
    fn frame(&self, containing_width: Option<f32>) -> EdgeSizes {
        non_negative(edges(&self.padding, containing_width))
            .add(&non_negative(edges(&self.border, containing_width)))
    }

    fn size(&self, row: bool) -> Length {
        if row { self.width } else { self.height }
    }

    fn min(&self, row: bool) -> Length {
        if row { self.min_width } else { self.min_height }
    }

    fn max(&self, row: bool) -> Length {
        if row { self.max_width } else { self.max_height }
    }
}

/// Resolved sides; margins may be negative
fn edges(lengths: &[Length; 4], basis: Option<f32>) -> EdgeSizes {
    let [top, right, bottom, left] = lengths.map(|l| l.resolve(basis).unwrap_or(0.0));
    EdgeSizes {
        top,
        right,
        bottom,
        left,
    }
}

fn non_negative(sides: EdgeSizes) -> EdgeSizes {
    EdgeSizes {
        top: sides.top.max(0.0),
        right: sides.right.max(0.0),
        bottom: sides.bottom.max(0.0),
        left: sides.left.max(0.0),
    }
}

/// Clamp a border-box size between content-box min/max plus `frame`
fn clamp(value: f32, min: Length, max: Length, basis: Option<f32>, frame: f32) -> f32 {
    let min = min.resolve(basis).map_or(0.0, |m| m + frame);
    let max = max.resolve(basis).map_or(f32::INFINITY, |m| m + frame);
    value.min(max).max(min)
}

fn main_of(size: Size, row: bool) -> f32 {
    if row { size.width } else { size.height }
}

fn cross_of(size: Size, row: bool) -> f32 {
    if row { size.height } else { size.width }
}

fn main_margins(margin: &EdgeSizes, row: bool) -> (f32, f32) {
    if row {
        (margin.left, margin.right)
    } else {
        (margin.top, margin.bottom)
    }
}

fn cross_margins(margin: &EdgeSizes, row: bool) -> (f32, f32) {
    if row {
        (margin.top, margin.bottom)
    } else {
        (margin.left, margin.right)
    }
}

/// Boxes nested deeper than this are collapsed to zero size
pub const MAX_LAYOUT_DEPTH: usize = 256;

/// Default layout engine: single-line flexbox
#[derive(Debug, Default, Clone, Copy)]
pub struct FlexLayout;

impl FlexLayout {
    pub fn new() -> Self {
        Self
    }
}

impl LayoutEngine for FlexLayout {
    fn compute(
        &mut self,
        tree: &DomTree,
        root: NodeId,
        viewport: Viewport,
        measurer: &dyn TextMeasurer,
    ) -> LayoutMap {
        let mut pass = Pass {
            tree,
            measurer,
            rects: LayoutMap::new(),
            cache: HashMap::new(),
            collapsed: 0,
        };
        let fill = Size::new(Some(viewport.width), Some(viewport.height));
        pass.layout_node(root, fill, fill, true, 0);
        pass.rects
            .insert(root, Rect::new(0.0, 0.0, viewport.width, viewport.height));
        if pass.collapsed > 0 {
            tracing::warn!(
                max_depth = MAX_LAYOUT_DEPTH,
                collapsed = pass.collapsed,
                "tree too deep, collapsed nested boxes"
            );
        }
        tracing::debug!(nodes = pass.rects.len(), "layout complete");
        pass.rects
    }
}

type CacheKey = (NodeId, [Option<u32>; 4]);

/// State for one `compute` call
struct Pass<'a> {
    tree: &'a DomTree,
    measurer: &'a dyn TextMeasurer,
    rects: LayoutMap,
    /// Sizes from measuring runs, which record nothing
    cache: HashMap<CacheKey, Size>,
    /// Nodes given an empty box for exceeding the depth limit
    collapsed: usize,
}

/// A flex item during line resolution
struct Item {
    id: NodeId,
    style: BoxStyle,
    margin: EdgeSizes,
    frame: EdgeSizes,
    base: f32,
    hypothetical: f32,
    target: f32,
    frozen: bool,
}

impl Pass<'_> {
    /// Lay out `id` and return its border-box size. `forced` sizes are
    /// imposed by the parent; `containing` is the parent's content box.
    fn layout_node(
        &mut self,
        id: NodeId,
        forced: Size<Option<f32>>,
        containing: Size<Option<f32>>,
        record: bool,
        depth: usize,
    ) -> Size {
        if depth > MAX_LAYOUT_DEPTH {
            if record {
                self.collapse(id);
            }
            return Size::default();
        }
        let bits = |v: Option<f32>| v.map(f32::to_bits);
        let key = (
            id,
            [
                bits(forced.width),
                bits(forced.height),
                bits(containing.width),
                bits(containing.height),
            ],
        );
        if !record {
            if let Some(size) = self.cache.get(&key) {
                return *size;
            }
        }
        let size = self.layout_uncached(id, forced, containing, record, depth);
        if !record {
            self.cache.insert(key, size);
        }
        size
    }

    fn layout_uncached(
        &mut self,
        id: NodeId,
        forced: Size<Option<f32>>,
        containing: Size<Option<f32>>,
        record: bool,
        depth: usize,
    ) -> Size {
        let tree = self.tree;
        let Some(node) = tree.get(id) else {
            return Size::default();
        };
        let style = node.computed_style.as_ref();

        if node.is_text() {
            let metrics = self.measure_text(node.text.as_deref().unwrap_or(""), style);
            return Size::new(
                forced.width.unwrap_or(metrics.width),
                forced.height.unwrap_or(metrics.height),
            );
        }

        let bs = BoxStyle::from_style(style);
        let frame = bs.frame(containing.width);
        let own = |forced: Option<f32>, row: bool, basis: Option<f32>, frame: f32| {
            forced.or_else(|| {
                bs.size(row)
                    .resolve(basis)
                    .map(|v| clamp(v + frame, bs.min(row), bs.max(row), basis, frame))
            })
        };
        let width = own(forced.width, true, containing.width, frame.horizontal());
        let height = own(forced.height, false, containing.height, frame.vertical());

        let inner = Size::new(
            width.map(|w| (w - frame.horizontal()).max(0.0)),
            height.map(|h| (h - frame.vertical()).max(0.0)),
        );
        let origin = (frame.left, frame.top);
        let content = self.layout_children(id, &bs, inner, origin, record, depth + 1);

        Size::new(
            width.unwrap_or_else(|| {
                clamp(
                    content.width + frame.horizontal(),
                    bs.min_width,
                    bs.max_width,
                    containing.width,
                    frame.horizontal(),
                )
            }),
            height.unwrap_or_else(|| {
                clamp(
                    content.height + frame.vertical(),
                    bs.min_height,
                    bs.max_height,
                    containing.height,
                    frame.vertical(),
                )
            }),
        )
    }

    /// Give every node below `id` an empty box at its parent's origin
    fn collapse(&mut self, id: NodeId) {
        for node in self.tree.descendants(id).skip(1) {
            self.rects.insert(node, Rect::default());
            self.collapsed += 1;
        }
        self.collapsed += 1;
    }

    fn measure_text(&self, text: &str, style: Option<&ComputedStyle>) -> TextMetrics {
        let get = |name: &str, default: &'static str| -> &str {
            style.and_then(|s| s.get(name)).unwrap_or(default)
        };
        let content = if get("white-space", "normal").starts_with("pre") {
            text.to_string()
        } else {
            collapse_whitespace(text)
        };
        if content.is_empty() {
            return TextMetrics::default();
        }
        self.measurer.measure(
            &content,
            get("font-family", "sans-serif"),
            style.map_or(16.0, font_size),
            get("font-weight", "normal"),
            get("font-style", "normal"),
        )
    }

    /// Resolve and place the children of a container whose content box is
    /// `inner`. Returns the content extent.
    fn layout_children(
        &mut self,
        id: NodeId,
        container: &BoxStyle,
        inner: Size<Option<f32>>,
        origin: (f32, f32),
        record: bool,
        depth: usize,
    ) -> Size {
        let row = container.direction.is_row();
        let inner_main = if row { inner.width } else { inner.height };
        let inner_cross = if row { inner.height } else { inner.width };

        let tree = self.tree;
        let mut items = Vec::new();
        for &child in tree.children(id) {
            let Some(node) = tree.get(child) else { continue };
            let style = if node.is_text() {
                BoxStyle::from_style(None)
            } else {
                BoxStyle::from_style(node.computed_style.as_ref())
            };
            if style.display_none && !node.is_text() {
                if record {
                    self.rects.insert(child, Rect::new(origin.0, origin.1, 0.0, 0.0));
                }
                continue;
            }

            let margin = edges(&style.margin, inner.width);
            let frame = if node.is_text() {
                EdgeSizes::default()
            } else {
                style.frame(inner.width)
            };
            let frame_main = if row { frame.horizontal() } else { frame.vertical() };
            let definite = if style.basis.is_auto() {
                style.size(row).resolve(inner_main)
            } else {
                style.basis.resolve(inner_main)
            };
            let base = match definite {
                Some(v) if !node.is_text() => v + frame_main,
                _ => main_of(self.layout_node(child, Size::default(), inner, false, depth), row),
            };
            let hypothetical = clamp(base, style.min(row), style.max(row), inner_main, frame_main);
            items.push(Item {
                id: child,
                style,
                margin,
                frame,
                base,
                hypothetical,
                target: hypothetical,
                frozen: false,
            });
        }

        let outer_hypothetical: f32 = items
            .iter()
            .map(|i| {
                let (start, end) = main_margins(&i.margin, row);
                i.hypothetical + start + end
            })
            .sum();
        let space = inner_main.unwrap_or(outer_hypothetical);
        resolve_flexible_lengths(&mut items, space, row, inner_main);

        // Cross sizes
        let mut measured_cross = Vec::with_capacity(items.len());
        for item in &items {
            let forced = if row {
                Size::new(Some(item.target), None)
            } else {
                Size::new(None, Some(item.target))
            };
            measured_cross.push(cross_of(self.layout_node(item.id, forced, inner, false, depth), row));
        }
        let line_cross = inner_cross.unwrap_or_else(|| {
            items
                .iter()
                .zip(&measured_cross)
                .map(|(item, cross)| {
                    let (start, end) = cross_margins(&item.margin, row);
                    cross + start + end
                })
                .fold(0.0, f32::max)
        });

        // Final sizes
        let mut sizes = Vec::with_capacity(items.len());
        for item in &items {
            let align = item.style.align_self.unwrap_or(container.align_items);
            let (start, end) = cross_margins(&item.margin, row);
            let frame_cross = if row { item.frame.vertical() } else { item.frame.horizontal() };
            let stretched = (align == Align::Stretch && item.style.size(!row).is_auto()).then(|| {
                clamp(
                    (line_cross - start - end).max(0.0),
                    item.style.min(!row),
                    item.style.max(!row),
                    inner_cross,
                    frame_cross,
                )
            });
            let forced = if row {
                Size::new(Some(item.target), stretched)
            } else {
                Size::new(stretched, Some(item.target))
            };
            sizes.push(self.layout_node(item.id, forced, inner, record, depth));
        }

        // Placement
        let outer_main: f32 = items
            .iter()
            .zip(&sizes)
            .map(|(item, size)| {
                let (start, end) = main_margins(&item.margin, row);
                main_of(*size, row) + start + end
            })
            .sum();
        let (mut cursor, gap) = container
            .justify
            .distribute(space - outer_main, items.len());

        for (item, size) in items.iter().zip(&sizes) {
            let (main_start, main_end) = main_margins(&item.margin, row);
            let main_size = main_of(*size, row);
            let mut main_pos = cursor + main_start;
            cursor = main_pos + main_size + main_end + gap;
            if container.direction.is_reverse() {
                main_pos = space - main_pos - main_size;
            }

            let (cross_start, cross_end) = cross_margins(&item.margin, row);
            let cross_size = cross_of(*size, row);
            let cross_pos = match item.style.align_self.unwrap_or(container.align_items) {
                Align::Start | Align::Stretch => cross_start,
                Align::End => line_cross - cross_size - cross_end,
                Align::Center => {
                    cross_start + (line_cross - cross_size - cross_start - cross_end) / 2.0
                }
            };

            if record {
                let (x, y) = if row {
                    (main_pos, cross_pos)
                } else {
                    (cross_pos, main_pos)
                };
                self.rects.insert(
                    item.id,
                    Rect::new(origin.0 + x, origin.1 + y, size.width, size.height),
                );
            }
        }

        let extent_main = outer_main;
        let extent_cross = line_cross;
        if row {
            Size::new(extent_main, extent_cross)
        } else {
            Size::new(extent_cross, extent_main)
        }
    }
}

/// Grow or shrink items toward `space`, freezing items that hit their
/// min/max constraints and redistributing what is left.
fn resolve_flexible_lengths(items: &mut [Item], space: f32, row: bool, basis: Option<f32>) {
    let margins: f32 = items
        .iter()
        .map(|i| {
            let (start, end) = main_margins(&i.margin, row);
            start + end
        })
        .sum();
    let hypothetical: f32 = items.iter().map(|i| i.hypothetical).sum();
    let growing = space - margins - hypothetical > 0.0;

    for item in items.iter_mut() {
        let factor = if growing { item.style.grow } else { item.style.shrink };
        item.frozen = factor == 0.0
            || (growing && item.base > item.hypothetical)
            || (!growing && item.base < item.hypothetical);
        item.target = item.hypothetical;
    }

    for _ in 0..=items.len() {
        if items.iter().all(|i| i.frozen) {
            break;
        }
        let used: f32 = items
            .iter()
            .map(|i| if i.frozen { i.target } else { i.base })
            .sum();
        let free = space - margins - used;

        let mut raw = Vec::with_capacity(items.len());
        if growing {
            let total: f32 = items.iter().filter(|i| !i.frozen).map(|i| i.style.grow).sum();
            for item in items.iter() {
                raw.push(item.base + free.max(0.0) * item.style.grow / total);
            }
        } else {
            let total: f32 = items
                .iter()
                .filter(|i| !i.frozen)
                .map(|i| i.style.shrink * i.base)
                .sum();
            for item in items.iter() {
                let share = if total > 0.0 {
                    item.style.shrink * item.base / total
                } else {
                    0.0
                };
                raw.push(item.base + free.min(0.0) * share);
            }
        }

        let mut violation = 0.0;
        let mut clamped = vec![0.0; items.len()];
        for (i, item) in items.iter().enumerate() {
            if item.frozen {
                continue;
            }
            let frame = if row { item.frame.horizontal() } else { item.frame.vertical() };
            clamped[i] = clamp(raw[i], item.style.min(row), item.style.max(row), basis, frame).max(0.0);
            violation += clamped[i] - raw[i];
        }

        for (i, item) in items.iter_mut().enumerate() {
            if item.frozen {
                continue;
            }
            let diff = clamped[i] - raw[i];
            let freeze = violation.abs() < f32::EPSILON
                || (violation > 0.0 && diff > 0.0)
                || (violation < 0.0 && diff < 0.0);
            if freeze {
                item.target = clamped[i];
                item.frozen = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_justify_distribute() {
        assert_eq!(Justify::Start.distribute(100.0, 2), (0.0, 0.0));
        assert_eq!(Justify::End.distribute(100.0, 2), (100.0, 0.0));
        assert_eq!(Justify::Center.distribute(100.0, 2), (50.0, 0.0));
        assert_eq!(Justify::SpaceBetween.distribute(100.0, 3), (0.0, 50.0));
        assert_eq!(Justify::SpaceAround.distribute(100.0, 2), (25.0, 50.0));
        assert_eq!(Justify::SpaceEvenly.distribute(90.0, 2), (30.0, 30.0));
        assert_eq!(Justify::SpaceBetween.distribute(-10.0, 3), (0.0, 0.0));
    }

    #[test]
    fn test_box_style_defaults() {
        let bs = BoxStyle::from_style(None);
        assert_eq!(bs.direction, Direction::Column);
        assert_eq!(bs.align_items, Align::Stretch);
        assert_eq!(bs.shrink, 1.0);
        assert!(bs.width.is_auto());
        assert!(!bs.display_none);
    }

    #[test]
    fn test_border_needs_style() {
        let mut style = ComputedStyle::new();
        style.set("border-top-width", "4px");
        assert_eq!(BoxStyle::from_style(Some(&style)).frame(None).top, 0.0);
        style.set("border-style", "solid");
        assert_eq!(BoxStyle::from_style(Some(&style)).frame(None).top, 4.0);
    }

    #[test]
    fn test_negative_padding_is_clamped_but_margin_is_not() {
        let mut style = ComputedStyle::new();
        style.set("padding-left", "-5px");
        style.set("margin-left", "-20px");
        let bs = BoxStyle::from_style(Some(&style));
        assert_eq!(bs.frame(None).left, 0.0);
        assert_eq!(edges(&bs.margin, None).left, -20.0);
    }
}
