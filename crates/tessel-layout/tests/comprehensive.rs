//! Comprehensive tests for tessel-layout
//!
//! Trees are styled with tessel-css first, as the engine does.

use tessel_css::{parse_inline_style, parse_stylesheet, resolve_tree};
use tessel_dom::{DomTree, NodeId, Tag};
use tessel_layout::{
    ApproxTextMeasurer, FlexLayout, LayoutEngine, LayoutMap, Rect, TextMeasurer, TextMetrics,
    MAX_LAYOUT_DEPTH, Viewport, layout,
};

fn boxed(tree: &mut DomTree, parent: NodeId, style: &str) -> NodeId {
    let id = tree.create_element(Tag::Div);
    tree.append_child(parent, id).unwrap();
    tree.set_inline_styles(id, parse_inline_style(style)).unwrap();
    id
}

fn run(tree: &mut DomTree, root_style: &str) -> LayoutMap {
    tree.set_inline_styles(NodeId::ROOT, parse_inline_style(root_style))
        .unwrap();
    resolve_tree(tree, NodeId::ROOT, &[]);
    layout(tree, Viewport::new(800.0, 600.0))
}

#[test]
fn test_row_places_children_side_by_side() {
    let mut tree = DomTree::new();
    let a = boxed(&mut tree, NodeId::ROOT, "width: 200px; height: 100px");
    let b = boxed(&mut tree, NodeId::ROOT, "width: 200px; height: 100px");
    let rects = run(&mut tree, "flex-direction: row");

    assert_eq!(rects[&NodeId::ROOT], Rect::new(0.0, 0.0, 800.0, 600.0));
    assert_eq!(rects[&a], Rect::new(0.0, 0.0, 200.0, 100.0));
    assert_eq!(rects[&b], Rect::new(200.0, 0.0, 200.0, 100.0));
}

#[test]
fn test_margin_left_offsets() {
    let mut tree = DomTree::new();
    let a = boxed(&mut tree, NodeId::ROOT, "width: 100px; height: 50px; margin-left: 20px");
    let rects = run(&mut tree, "flex-direction: row");
    assert_eq!(rects[&a].x, 20.0);
    assert_eq!(rects[&a].y, 0.0);
}

#[test]
fn test_negative_margin_pulls_left() {
    let mut tree = DomTree::new();
    let a = boxed(&mut tree, NodeId::ROOT, "width: 100px; height: 50px; margin-left: -20px");
    let b = boxed(&mut tree, NodeId::ROOT, "width: 100px; height: 50px");
    let rects = run(&mut tree, "flex-direction: row");
    assert_eq!(rects[&a].x, -20.0);
    assert_eq!(rects[&b].x, 80.0);
}

#[test]
fn test_column_is_default_and_stretches() {
    let mut tree = DomTree::new();
    let a = boxed(&mut tree, NodeId::ROOT, "height: 10px");
    let b = boxed(&mut tree, NodeId::ROOT, "height: 30px; margin: 5px");
    let rects = run(&mut tree, "");

    assert_eq!(rects[&a], Rect::new(0.0, 0.0, 800.0, 10.0));
    assert_eq!(rects[&b], Rect::new(5.0, 15.0, 790.0, 30.0));
}

#[test]
fn test_flex_grow_shares_free_space() {
    let mut tree = DomTree::new();
    let a = boxed(&mut tree, NodeId::ROOT, "flex-grow: 1; height: 10px");
    let b = boxed(&mut tree, NodeId::ROOT, "flex-grow: 3; height: 10px");
    let rects = run(&mut tree, "flex-direction: row");

    assert_eq!(rects[&a].width, 200.0);
    assert_eq!(rects[&b].x, 200.0);
    assert_eq!(rects[&b].width, 600.0);
}

#[test]
fn test_flex_shrink_and_max_width() {
    let mut tree = DomTree::new();
    let a = boxed(&mut tree, NodeId::ROOT, "width: 600px; height: 10px");
    let b = boxed(&mut tree, NodeId::ROOT, "width: 600px; height: 10px; flex-shrink: 0");
    let rects = run(&mut tree, "flex-direction: row");
    assert_eq!(rects[&a].width, 200.0);
    assert_eq!(rects[&b].width, 600.0);

    let mut tree = DomTree::new();
    let a = boxed(&mut tree, NodeId::ROOT, "flex: 1; max-width: 100px; height: 10px");
    let b = boxed(&mut tree, NodeId::ROOT, "flex: 1; height: 10px");
    let rects = run(&mut tree, "flex-direction: row");
    assert_eq!(rects[&a].width, 100.0);
    assert_eq!(rects[&b].width, 700.0);
}

#[test]
fn test_justify_and_align() {
    let mut tree = DomTree::new();
    let a = boxed(&mut tree, NodeId::ROOT, "width: 100px; height: 100px");
    let rects = run(
        &mut tree,
        "flex-direction: row; justify-content: center; align-items: center",
    );
    assert_eq!(rects[&a], Rect::new(350.0, 250.0, 100.0, 100.0));

    let mut tree = DomTree::new();
    let a = boxed(&mut tree, NodeId::ROOT, "width: 100px; height: 100px");
    let b = boxed(&mut tree, NodeId::ROOT, "width: 100px; height: 100px; align-self: flex-end");
    let rects = run(&mut tree, "flex-direction: row; justify-content: space-between");
    assert_eq!(rects[&a].x, 0.0);
    assert_eq!(rects[&b].x, 700.0);
    assert_eq!(rects[&b].y, 500.0);
}

#[test]
fn test_positions_relative_to_parent_border_box() {
    let mut tree = DomTree::new();
    let outer = boxed(
        &mut tree,
        NodeId::ROOT,
        "width: 300px; height: 300px; padding: 10px; border: 5px solid black; margin-left: 50px",
    );
    let inner = boxed(&mut tree, outer, "height: 20px");
    let rects = run(&mut tree, "flex-direction: row");

    assert_eq!(rects[&outer], Rect::new(50.0, 0.0, 330.0, 330.0));
    assert_eq!(rects[&inner], Rect::new(15.0, 15.0, 300.0, 20.0));
}

#[test]
fn test_percentages_and_auto_height() {
    let mut tree = DomTree::new();
    let half = boxed(&mut tree, NodeId::ROOT, "width: 50%; height: 25%");
    let wrapper = boxed(&mut tree, NodeId::ROOT, "");
    boxed(&mut tree, wrapper, "height: 40px");
    boxed(&mut tree, wrapper, "height: 60px");
    let rects = run(&mut tree, "align-items: flex-start");

    assert_eq!(rects[&half].width, 400.0);
    assert_eq!(rects[&half].height, 150.0);
    assert_eq!(rects[&wrapper].height, 100.0);
    assert_eq!(rects[&wrapper].y, 150.0);
}

#[test]
fn test_display_none_takes_no_space() {
    let mut tree = DomTree::new();
    let hidden = boxed(&mut tree, NodeId::ROOT, "display: none; height: 100px");
    let shown = boxed(&mut tree, NodeId::ROOT, "height: 10px");
    let rects = run(&mut tree, "");

    assert_eq!(rects[&hidden].width, 0.0);
    assert_eq!(rects[&hidden].height, 0.0);
    assert_eq!(rects[&shown].y, 0.0);
}

#[test]
fn test_text_uses_measurer() {
    struct Fixed;
    impl TextMeasurer for Fixed {
        fn measure(&self, text: &str, _: &str, size: f32, _: &str, _: &str) -> TextMetrics {
            TextMetrics {
                width: text.len() as f32 * 10.0,
                height: size,
            }
        }
    }

    let mut tree = DomTree::new();
    let span = tree.create_element(Tag::Span);
    tree.append_child(NodeId::ROOT, span).unwrap();
    let text = tree.create_text_node("  hello \n ");
    tree.append_child(span, text).unwrap();
    tree.set_inline_styles(NodeId::ROOT, parse_inline_style("align-items: flex-start"))
        .unwrap();
    let sheet = parse_stylesheet("span { font-size: 20px }");
    resolve_tree(&mut tree, NodeId::ROOT, &sheet.rules);

    let rects = FlexLayout::new().compute(&tree, NodeId::ROOT, Viewport::default(), &Fixed);
    assert_eq!(rects[&span].width, 50.0);
    assert_eq!(rects[&span].height, 20.0);

    let approx = FlexLayout::new().compute(&tree, NodeId::ROOT, Viewport::default(), &ApproxTextMeasurer);
    assert_eq!(approx[&span].width, 5.0 * 20.0 * 0.6);
}

#[test]
fn test_deep_tree_collapses_past_depth_limit() {
    let mut tree = DomTree::new();
    let mut chain = Vec::new();
    let mut parent = NodeId::ROOT;
    for _ in 0..5_000 {
        parent = boxed(&mut tree, parent, "");
        chain.push(parent);
    }
    let rects = run(&mut tree, "");

    assert_eq!(rects.len(), 5_001);
    assert_eq!(rects[&chain[0]].width, 800.0);
    assert_eq!(rects[&chain[MAX_LAYOUT_DEPTH - 1]].width, 800.0);
    assert_eq!(rects[&chain[MAX_LAYOUT_DEPTH]].width, 0.0);
    assert_eq!(rects[&chain[4_999]], Rect::default());
}
