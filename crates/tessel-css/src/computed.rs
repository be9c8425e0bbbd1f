//! Computed Style Resolver
//!
//! Produces a node's computed style from the cascade and inheritance, and
//! walks the tree re-resolving only what changed.

use tessel_dom::{ComputedStyle, DirtyFlags, DomTree, NodeId, StyleMap, Tag};

use crate::selectors::match_rules;
use crate::{CssRule, apply_inheritance, resolve};

/// Result counters for a [`resolve_tree`] pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    /// Nodes whose style was recomputed
    pub resolved: usize,
    /// Nodes whose stored style was kept
    pub reused: usize,
}

/// Built-in presentation for a tag, applied beneath author styles
pub fn user_agent_defaults(tag: Tag) -> StyleMap {
    let mut map = StyleMap::new();
    let mut set = |k: &str, v: &str| {
        map.insert(k.to_string(), v.to_string());
    };

    if tag.is_hidden() {
        set("display", "none");
    } else if tag.is_block_level() {
        set("display", "block");
    }

    match tag {
        Tag::H1 => set("font-size", "32px"),
        Tag::H2 => set("font-size", "24px"),
        Tag::H3 => set("font-size", "18.72px"),
        _ => {}
    }
    match tag {
        Tag::H1 | Tag::H2 | Tag::H3 | Tag::H4 | Tag::H5 | Tag::H6 | Tag::Strong | Tag::B | Tag::Th => {
            set("font-weight", "bold")
        }
        Tag::Em | Tag::I => set("font-style", "italic"),
        Tag::A | Tag::U => set("text-decoration", "underline"),
        Tag::Pre | Tag::Code => set("font-family", "monospace"),
        _ => {}
    }
    map
}

/// Compute the style of one node given its parent's computed style.
///
/// Text nodes take no part in selector matching; they only inherit.
pub fn resolve_node(
    tree: &DomTree,
    node: NodeId,
    rules: &[CssRule],
    parent_style: Option<&ComputedStyle>,
) -> ComputedStyle {
    let Some(element) = tree.get(node) else {
        return apply_inheritance(&StyleMap::new(), parent_style);
    };

    let mut cascaded = user_agent_defaults(element.tag);
    if element.is_element() {
        let matched = match_rules(tree, node, rules);
        cascaded.extend(resolve(&matched, &element.inline_style));
    }
    apply_inheritance(&cascaded, parent_style)
}

/// Resolve styles for `root` and its subtree.
///
/// A node is recomputed when it has no style yet, is STYLE-dirty, or an
/// ancestor was recomputed in this pass. Otherwise its stored style is
/// reused and the walk continues below it. STYLE is cleared on every
/// recomputed node.
pub fn resolve_tree(tree: &mut DomTree, root: NodeId, rules: &[CssRule]) -> ResolveStats {
    let mut stats = ResolveStats::default();
    let mut stack = vec![(root, false)];

    while let Some((id, ancestor_resolved)) = stack.pop() {
        let Some(node) = tree.get(id) else { continue };
        let needs_resolve = ancestor_resolved
            || node.computed_style.is_none()
            || node.dirty.contains(DirtyFlags::STYLE);

        if needs_resolve {
            let parent_style = node
                .parent
                .and_then(|p| tree.get(p))
                .and_then(|p| p.computed_style.as_ref());
            let style = resolve_node(tree, id, rules, parent_style);
            tree.set_computed_style(id, style);
            stats.resolved += 1;
            stack.extend(tree.children(id).iter().rev().map(|&c| (c, true)));
        } else {
            stats.reused += 1;
            stack.extend(tree.children(id).iter().rev().map(|&c| (c, false)));
        }
    }

    tracing::debug!(
        resolved = stats.resolved,
        reused = stats.reused,
        "style pass complete"
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_stylesheet;

    #[test]
    fn test_user_agent_display() {
        assert_eq!(
            user_agent_defaults(Tag::Div).get("display").map(String::as_str),
            Some("block")
        );
        assert_eq!(
            user_agent_defaults(Tag::Script).get("display").map(String::as_str),
            Some("none")
        );
        assert!(user_agent_defaults(Tag::Span).get("display").is_none());
    }

    #[test]
    fn test_text_node_inherits_only() {
        let mut tree = DomTree::new();
        let div = tree.create_element(Tag::Div);
        let text = tree.create_text_node("hi");
        tree.append_child(NodeId::ROOT, div).unwrap();
        tree.append_child(div, text).unwrap();

        let sheet = parse_stylesheet("div { color: red; margin-top: 4px } * { color: green }");
        resolve_tree(&mut tree, NodeId::ROOT, &sheet.rules);

        let text_style = tree.get(text).unwrap().computed_style.clone().unwrap();
        assert_eq!(text_style.get("color"), Some("red"));
        assert_eq!(text_style.get("margin-top"), Some("0"));
        assert_eq!(text_style.get("display"), Some("inline"));
    }

    #[test]
    fn test_clean_nodes_are_reused() {
        let mut tree = DomTree::new();
        let a = tree.create_element(Tag::Div);
        let b = tree.create_element(Tag::Div);
        tree.append_child(NodeId::ROOT, a).unwrap();
        tree.append_child(NodeId::ROOT, b).unwrap();
        let rules = parse_stylesheet("div { color: red }").rules;

        let first = resolve_tree(&mut tree, NodeId::ROOT, &rules);
        assert_eq!(first.resolved, 3);

        tree.set_inline_style(b, "width", "10px").unwrap();
        let second = resolve_tree(&mut tree, NodeId::ROOT, &rules);
        assert_eq!(second.resolved, 1);
        assert_eq!(second.reused, 2);
        assert!(!tree.get(b).unwrap().dirty.contains(DirtyFlags::STYLE));
    }
}
