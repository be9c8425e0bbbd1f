//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts it into our node table.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use tessel_dom::{Document, DomTree, NodeId, Tag};

use crate::ParseOutput;

/// HTML5 parser
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlParser;

impl HtmlParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse into a fresh document
    pub fn parse(&self, html: &str) -> (Document, ParseOutput) {
        let mut document = Document::new("about:blank");
        let output = self.parse_into(&mut document.tree, html, |_| {});
        (document, output)
    }

    /// Parse into an existing tree under its root.
    ///
    /// `on_created` sees every new node in document order, after the node
    /// is attached. The root itself is not reported.
    pub fn parse_into(
        &self,
        tree: &mut DomTree,
        html: &str,
        mut on_created: impl FnMut(NodeId),
    ) -> ParseOutput {
        let dom = parse_document(RcDom::default(), Default::default()).one(html);

        let root = tree.root();
        let mut output = ParseOutput {
            root,
            scripts: Vec::new(),
            links: Vec::new(),
            styles: Vec::new(),
            created: 0,
        };

        // Preorder walk; children pushed in reverse so they pop in order
        let mut stack: Vec<(Handle, NodeId)> = dom
            .document
            .children
            .borrow()
            .iter()
            .rev()
            .map(|child| (child.clone(), root))
            .collect();

        while let Some((handle, parent)) = stack.pop() {
            let Some(id) = self.convert_node(&handle, tree) else {
                continue;
            };
            if let Err(e) = tree.attach_parsed(parent, id) {
                tracing::warn!(error = %e, node = %id, "dropping parsed node");
                continue;
            }
            output.created += 1;
            on_created(id);

            match tree.get(id).map(|n| n.tag) {
                Some(Tag::Script) => output.scripts.push(id),
                Some(Tag::Link) => output.links.push(id),
                Some(Tag::Style) => output.styles.push(id),
                _ => {}
            }

            if matches!(handle.data, RcNodeData::Element { .. }) {
                for child in handle.children.borrow().iter().rev() {
                    stack.push((child.clone(), id));
                }
            }
        }

        tracing::debug!(
            nodes = output.created,
            scripts = output.scripts.len(),
            links = output.links.len(),
            styles = output.styles.len(),
            "parsed HTML"
        );
        output
    }

    /// Create the node for one RcDom node, unattached.
    ///
    /// Doctypes, comments, processing instructions and whitespace-only text
    /// produce nothing.
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree) -> Option<NodeId> {
        match &handle.data {
            RcNodeData::Text { contents } => {
                let text = contents.borrow();
                if text.trim().is_empty() {
                    return None;
                }
                Some(tree.create_text_node(&text))
            }
            RcNodeData::Element { name, attrs, .. } => {
                let tag = Tag::from_name(&name.local);
                if tag == Tag::Unknown {
                    tracing::trace!(name = %name.local, "unrecognised tag");
                }

                let attrs = attrs.borrow();
                let inline = attrs
                    .iter()
                    .rev()
                    .find(|attr| attr.name.local.as_ref() == "style")
                    .map(|attr| tessel_css::parse_inline_style(&attr.value))
                    .unwrap_or_default();
                let attributes = attrs
                    .iter()
                    .map(|attr| (attr.name.local.to_string(), attr.value.to_string()));
                Some(tree.create_parsed_element(tag, attributes, inline))
            }
            RcNodeData::Document
            | RcNodeData::Doctype { .. }
            | RcNodeData::Comment { .. }
            | RcNodeData::ProcessingInstruction { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let (doc, output) = HtmlParser::new().parse("<html><head><title>Test</title></head><body><p>Hello</p></body></html>");
        assert_eq!(doc.title(), "Test");
        assert!(doc.body().is_some());
        assert_eq!(output.created, doc.tree.len() - 1);
    }

    #[test]
    fn test_parse_fragment() {
        // Fragments still get html/head/body from html5ever
        let (doc, _) = HtmlParser::new().parse("<div><span>Text</span></div>");
        let span = doc.find_first(Tag::Span).unwrap();
        assert_eq!(doc.text_content(span), "Text");
        assert!(doc.find_first(Tag::Html).is_some());
    }
}
