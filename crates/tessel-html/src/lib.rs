//! Tessel HTML Parser
//!
//! Builds a [`DomTree`](tessel_dom::DomTree) from markup using html5ever.

mod parser;

pub use parser::HtmlParser;

use tessel_dom::{Document, NodeId};

/// Parse a complete document
pub fn parse(html: &str) -> (Document, ParseOutput) {
    HtmlParser::new().parse(html)
}

/// Nodes a host needs after parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutput {
    /// Node the parsed content was attached under
    pub root: NodeId,
    /// `<script>` elements, in document order
    pub scripts: Vec<NodeId>,
    /// `<link>` elements, in document order
    pub links: Vec<NodeId>,
    /// `<style>` elements, in document order
    pub styles: Vec<NodeId>,
    /// Number of nodes created
    pub created: usize,
}
