//! Edge case tests for tessel-css
//!
//! Odd selectors, keyword handling and large trees.

use tessel_css::properties::initial_value;
use tessel_css::{
    Specificity, apply_inheritance, calculate, matches_selector, parse_inline_style,
    parse_stylesheet, resolve_tree, serialize_inline_style,
};
use tessel_dom::{ComputedStyle, DomTree, NodeId, StyleMap, Tag};

// ============================================================================
// INLINE STYLES
// ============================================================================

#[test]
fn test_inline_round_trip_ignores_pair_order() {
    let pairs = [
        ("color", "red"),
        ("width", "10px"),
        ("font-family", "\"A B\", serif"),
        ("margin-left", "3px"),
    ];
    let expected: StyleMap = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let forward = pairs.iter().map(|(k, v)| format!("{k}: {v}")).collect::<Vec<_>>().join("; ");
    let backward = pairs.iter().rev().map(|(k, v)| format!("{k}:{v};")).collect::<String>();

    assert_eq!(parse_inline_style(&forward), expected);
    assert_eq!(parse_inline_style(&backward), expected);
    assert_eq!(parse_inline_style(&serialize_inline_style(&expected)), expected);
}

#[test]
fn test_inline_garbage() {
    assert!(parse_inline_style("").is_empty());
    assert!(parse_inline_style(";;;").is_empty());
    assert!(parse_inline_style("color").is_empty());
    assert!(parse_inline_style("color:").is_empty());
}

// ============================================================================
// SPECIFICITY
// ============================================================================

#[test]
fn test_specificity_edge_cases() {
    assert_eq!(calculate("*"), Specificity(0, 0, 0));
    assert_eq!(calculate("a::before"), Specificity(0, 0, 1));
    assert_eq!(calculate("div > p + span ~ em"), Specificity(0, 0, 4));
    assert_eq!(calculate("a[href]:hover"), Specificity(0, 2, 1));
    assert_eq!(calculate("ul li.x, #a"), Specificity(1, 0, 0));
    assert_eq!(calculate(""), Specificity(0, 0, 0));
}

// ============================================================================
// SELECTORS
// ============================================================================

#[test]
fn test_whitespace_selector_never_matches() {
    let mut tree = DomTree::new();
    let div = tree.create_element(Tag::Div);
    tree.append_child(NodeId::ROOT, div).unwrap();
    assert_eq!(matches_selector(&tree, div, "   "), Ok(false));
    assert_eq!(matches_selector(&tree, div, ""), Ok(false));
}

#[test]
fn test_attribute_operator_edges() {
    let mut tree = DomTree::new();
    let p = tree.create_element(Tag::P);
    tree.append_child(NodeId::ROOT, p).unwrap();
    tree.set_attribute(p, "lang", "en-US").unwrap();
    tree.set_attribute(p, "data-x", "abc").unwrap();

    assert_eq!(matches_selector(&tree, p, r#"[lang|="en"]"#), Ok(true));
    assert_eq!(matches_selector(&tree, p, r#"[lang|="e"]"#), Ok(false));
    assert_eq!(matches_selector(&tree, p, r#"[data-x^=""]"#), Ok(false));
    assert_eq!(matches_selector(&tree, p, r#"[data-x*="b"]"#), Ok(true));
    assert_eq!(matches_selector(&tree, p, r#"[missing]"#), Ok(false));
}

#[test]
fn test_pseudo_element_never_matches() {
    let mut tree = DomTree::new();
    let p = tree.create_element(Tag::P);
    tree.append_child(NodeId::ROOT, p).unwrap();
    assert_eq!(matches_selector(&tree, p, "p::first-line"), Ok(false));
    assert!(matches_selector(&tree, p, "p:nth-child(2)").is_err());
}

// ============================================================================
// INHERITANCE KEYWORDS
// ============================================================================

#[test]
fn test_keywords_ignore_inheritability() {
    let parent: ComputedStyle = [
        ("margin-left".to_string(), "5px".to_string()),
        ("color".to_string(), "green".to_string()),
        ("width".to_string(), "300px".to_string()),
    ]
    .into_iter()
    .collect();

    let mut cascaded = StyleMap::new();
    cascaded.insert("margin-left".into(), "inherit".into());
    cascaded.insert("color".into(), "initial".into());
    let style = apply_inheritance(&cascaded, Some(&parent));

    assert_eq!(style.get("margin-left"), Some("5px"));
    assert_eq!(style.get("color"), initial_value("color"));
    assert_eq!(style.get("width"), initial_value("width"));

    let orphan = apply_inheritance(&cascaded, None);
    assert_eq!(orphan.get("margin-left"), initial_value("margin-left"));
}

// ============================================================================
// STRESS
// ============================================================================

#[test]
fn test_deep_tree_resolves_without_recursion() {
    let mut tree = DomTree::new();
    tree.set_inline_style(NodeId::ROOT, "color", "teal").unwrap();
    let mut parent = NodeId::ROOT;
    for _ in 0..5_000 {
        let id = tree.create_element(Tag::Div);
        tree.append_child(parent, id).unwrap();
        parent = id;
    }
    let leaf = tree.create_text_node("deep");
    tree.append_child(parent, leaf).unwrap();

    let stats = resolve_tree(&mut tree, NodeId::ROOT, &[]);
    assert_eq!(stats.resolved, 5_002);
    let style = tree.get(leaf).unwrap().computed_style.as_ref().unwrap();
    assert_eq!(style.get("color"), Some("teal"));
}

#[test]
fn test_many_rules_keep_source_order() {
    let css: String = (0..500).map(|i| format!(".c{i} {{ z-index: {i} }}\n")).collect();
    let sheet = parse_stylesheet(&css);
    assert_eq!(sheet.len(), 500);
    assert!(sheet.rules.windows(2).all(|w| w[0].source_order < w[1].source_order));
    assert_eq!(sheet.rules[499].get("z-index"), Some("499"));
}
