//! Style Cascade
//!
//! Merges matched rules and inline styles into a single map of longhand
//! values. Among stylesheet declarations the winner is decided by
//! importance, then specificity, then source order, then position inside
//! the rule. Inline styles beat every stylesheet declaration.

use tessel_dom::StyleMap;

use crate::shorthand::{expand, is_shorthand};
use crate::{CssRule, Specificity};

/// Cascade priority; larger wins
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Priority {
    important: bool,
    specificity: Specificity,
    source_order: u32,
    index: usize,
}

/// Cascade the matched rules and the node's inline styles
pub fn resolve(matched: &[&CssRule], inline: &StyleMap) -> StyleMap {
    let mut candidates: Vec<(Priority, String, String)> = Vec::new();
    for rule in matched {
        for (index, decl) in rule.declarations.iter().enumerate() {
            let priority = Priority {
                important: decl.important,
                specificity: rule.specificity,
                source_order: rule.source_order,
                index,
            };
            for (property, value) in expand(&decl.property, &decl.value) {
                candidates.push((priority, property, value));
            }
        }
    }

    // Apply lowest priority first so later writes win
    candidates.sort_by(|a, b| a.0.cmp(&b.0));
    let mut result = StyleMap::new();
    for (_, property, value) in candidates {
        result.insert(property, value);
    }

    // Shorthands before longhands so `margin-left` refines `margin`
    let mut inline: Vec<(&String, &String)> = inline.iter().collect();
    inline.sort_by_key(|(property, _)| (!is_shorthand(property), property.as_str()));
    for (property, value) in inline {
        result.extend(expand(property, value));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Declaration;

    fn rule(selector: &str, decls: &[(&str, &str)], order: u32) -> CssRule {
        let declarations = decls.iter().map(|(p, v)| Declaration::new(p, v)).collect();
        CssRule::new(selector, declarations, order)
    }

    #[test]
    fn test_specificity_beats_order() {
        let id = rule("#x", &[("color", "blue")], 0);
        let tag = rule("div", &[("color", "red")], 1);
        let out = resolve(&[&tag, &id], &StyleMap::new());
        assert_eq!(out.get("color").map(String::as_str), Some("blue"));
    }

    #[test]
    fn test_later_rule_wins_ties() {
        let first = rule(".a", &[("color", "red")], 0);
        let second = rule(".b", &[("color", "green")], 1);
        let out = resolve(&[&second, &first], &StyleMap::new());
        assert_eq!(out.get("color").map(String::as_str), Some("green"));
    }

    #[test]
    fn test_later_declaration_in_rule_wins() {
        let r = rule("p", &[("color", "red"), ("color", "teal")], 0);
        let out = resolve(&[&r], &StyleMap::new());
        assert_eq!(out.get("color").map(String::as_str), Some("teal"));
    }

    #[test]
    fn test_important_beats_specificity_but_not_inline() {
        let mut weak = rule("p", &[("color", "red")], 0);
        weak.declarations[0].important = true;
        let strong = rule("#x", &[("color", "blue")], 1);
        let out = resolve(&[&weak, &strong], &StyleMap::new());
        assert_eq!(out.get("color").map(String::as_str), Some("red"));

        let inline = StyleMap::from([("color".to_string(), "black".to_string())]);
        let out = resolve(&[&weak, &strong], &inline);
        assert_eq!(out.get("color").map(String::as_str), Some("black"));
    }

    #[test]
    fn test_shorthand_and_longhand_compete() {
        let base = rule(".a", &[("margin", "10px")], 0);
        let side = rule("div", &[("margin-left", "2px")], 1);
        let out = resolve(&[&base, &side], &StyleMap::new());
        // `.a` is more specific, so its expanded margin-left wins
        assert_eq!(out.get("margin-left").map(String::as_str), Some("10px"));

        let inline = StyleMap::from([
            ("margin-top".to_string(), "1px".to_string()),
            ("margin".to_string(), "5px".to_string()),
        ]);
        let out = resolve(&[], &inline);
        assert_eq!(out.get("margin-top").map(String::as_str), Some("1px"));
        assert_eq!(out.get("margin-bottom").map(String::as_str), Some("5px"));
    }
}
