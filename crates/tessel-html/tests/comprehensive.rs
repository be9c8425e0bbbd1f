//! Comprehensive tests for tessel-html

use tessel_css::{parse_stylesheet, resolve_tree};
use tessel_dom::{DomTree, NodeId, Tag};
use tessel_html::{HtmlParser, parse};

#[test]
fn test_parse_empty() {
    let (doc, output) = parse("");
    // html5ever still synthesises html/head/body
    assert_eq!(doc.tree.len(), 4);
    assert_eq!(output.root, NodeId::ROOT);
    assert!(output.scripts.is_empty());
}

#[test]
fn test_parse_leaves_dirty_queue_empty() {
    let (mut doc, output) = parse(r#"<div id="a" class="b" style="color: red">x</div>"#);
    assert!(doc.tree.take_dirty().is_empty());

    let div = doc.get_element_by_id("a").unwrap();
    let node = doc.tree.get(div).unwrap();
    assert!(node.dirty.is_empty());
    assert_eq!(node.attribute("style"), Some("color: red"));
    assert_eq!(node.inline_style.get("color").map(String::as_str), Some("red"));
    assert!(output.created > 0);
}

#[test]
fn test_id_beats_type_selector() {
    let (mut doc, _) = parse(r#"<div class="foo" id="bar">hi</div>"#);
    let sheet = parse_stylesheet("div{color:red} #bar{color:blue}");
    resolve_tree(&mut doc.tree, NodeId::ROOT, &sheet.rules);

    let div = doc.get_element_by_id("bar").unwrap();
    let node = doc.tree.get(div).unwrap();
    assert_eq!(node.tag, Tag::Div);
    assert_eq!(node.class_list().collect::<Vec<_>>(), vec!["foo"]);
    assert_eq!(node.computed_style.as_ref().unwrap().get("color"), Some("blue"));
}

#[test]
fn test_style_attribute_becomes_inline_style() {
    let (doc, _) = parse(r#"<p style="color: red; margin-left: 4px !important">x</p>"#);
    let p = doc.find_first(Tag::P).unwrap();
    let node = doc.tree.get(p).unwrap();
    assert_eq!(node.inline_style.get("color").map(String::as_str), Some("red"));
    assert_eq!(node.inline_style.get("margin-left").map(String::as_str), Some("4px"));
    assert!(node.attribute("style").is_some());
}

#[test]
fn test_reports_scripts_links_and_styles() {
    let html = r#"
        <html>
          <head>
            <link rel="stylesheet" href="./main.css">
            <style>p { color: green }</style>
            <script src="a.js"></script>
          </head>
          <body><script>console.log(1)</script></body>
        </html>
    "#;
    let (doc, output) = parse(html);
    assert_eq!(output.links.len(), 1);
    assert_eq!(output.styles.len(), 1);
    assert_eq!(output.scripts.len(), 2);
    assert_eq!(
        doc.tree.get(output.links[0]).unwrap().attribute("href"),
        Some("./main.css")
    );
    assert_eq!(doc.text_content(output.scripts[1]), "console.log(1)");
    assert!(output.scripts[0] < output.scripts[1]);
}

#[test]
fn test_unknown_tags_and_whitespace() {
    let (doc, _) = parse("<body>\n  <blink>x</blink>\n  <custom-thing></custom-thing>\n</body>");
    let body = doc.body().unwrap();
    let kids: Vec<Tag> = doc
        .tree
        .children(body)
        .iter()
        .map(|&c| doc.tree.get(c).unwrap().tag)
        .collect();
    assert_eq!(kids, vec![Tag::Unknown, Tag::Unknown]);
}

#[test]
fn test_created_callback_in_document_order() {
    let mut tree = DomTree::new();
    let mut seen = Vec::new();
    let output = HtmlParser::new().parse_into(
        &mut tree,
        "<div><p>a</p><p>b</p></div><span></span>",
        |id| seen.push(id),
    );

    let preorder: Vec<NodeId> = tree.descendants(NodeId::ROOT).skip(1).collect();
    assert_eq!(seen, preorder);
    assert_eq!(output.created, seen.len());
    assert!(!seen.contains(&NodeId::ROOT));
    assert!(seen.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_malformed_markup() {
    let (doc, _) = parse("<div><p>Unclosed paragraph<span>Unclosed span</div>");
    assert!(doc.find_first(Tag::Span).is_some());
    assert_eq!(doc.text_content(doc.find_first(Tag::Div).unwrap()), "Unclosed paragraphUnclosed span");
}
