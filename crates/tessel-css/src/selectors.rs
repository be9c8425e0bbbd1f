//! CSS Selectors Module
//!
//! Selector parsing and right-to-left matching against the DOM tree.
//! Supported: type, universal, class, id, attribute (`= ~= |= ^= $= *=`),
//! `:hover`, `:focus`, pseudo-elements (which never match), selector
//! lists and the four combinators.

use tessel_dom::{DomTree, Node, NodeId, PseudoState, Tag};

use crate::CssRule;

/// Selector failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unsupported pseudo-class :{0}")]
    UnsupportedPseudoClass(String),
    #[error("malformed selector `{0}`")]
    Malformed(String),
}

/// Selector component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// `*`
    Universal,
    /// Element type, lowercased
    Type(String),
    /// `.class`
    Class(String),
    /// `#id`
    Id(String),
    /// `[attr]`, `[attr=value]`, ...
    Attribute(AttributeSelector),
    /// `:hover`, `:focus`; anything else is rejected at match time
    PseudoClass(String),
    /// `::before` etc. There is no generated content, so these never match.
    PseudoElement(String),
}

/// Attribute selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    pub name: String,
    pub matcher: Option<AttributeMatcher>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeMatcher {
    /// [attr=value] - exact match
    Exact(String),
    /// [attr~=value] - whitespace-separated list contains
    Includes(String),
    /// [attr|=value] - exact or prefix with hyphen
    DashMatch(String),
    /// [attr^=value] - starts with
    Prefix(String),
    /// [attr$=value] - ends with
    Suffix(String),
    /// [attr*=value] - contains substring
    Substring(String),
}

impl AttributeSelector {
    /// Check an attribute value against this selector
    pub fn matches(&self, value: Option<&str>) -> bool {
        match (&self.matcher, value) {
            (None, value) => value.is_some(),
            (Some(_), None) => false,
            (Some(matcher), Some(val)) => match matcher {
                AttributeMatcher::Exact(expected) => val == expected,
                AttributeMatcher::Includes(expected) => {
                    val.split_ascii_whitespace().any(|w| w == expected)
                }
                AttributeMatcher::DashMatch(expected) => {
                    val == expected
                        || val
                            .strip_prefix(expected.as_str())
                            .is_some_and(|rest| rest.starts_with('-'))
                }
                // Empty operands never match for the substring family
                AttributeMatcher::Prefix(expected) => {
                    !expected.is_empty() && val.starts_with(expected.as_str())
                }
                AttributeMatcher::Suffix(expected) => {
                    !expected.is_empty() && val.ends_with(expected.as_str())
                }
                AttributeMatcher::Substring(expected) => {
                    !expected.is_empty() && val.contains(expected.as_str())
                }
            },
        }
    }
}

impl SimpleSelector {
    /// Match against a single node, ignoring its position in the tree
    pub fn matches(&self, node: &Node) -> Result<bool, SelectorError> {
        Ok(match self {
            SimpleSelector::Universal => true,
            SimpleSelector::Type(name) => {
                let tag = Tag::from_name(name);
                tag != Tag::Unknown && node.tag == tag
            }
            SimpleSelector::Class(class) => node
                .class_list()
                .any(|token| token.eq_ignore_ascii_case(class)),
            SimpleSelector::Id(id) => node
                .element_id()
                .is_some_and(|value| value.eq_ignore_ascii_case(id)),
            SimpleSelector::Attribute(attr) => attr.matches(node.attribute(&attr.name)),
            SimpleSelector::PseudoClass(name) => {
                let state = match name.to_ascii_lowercase().as_str() {
                    "hover" => PseudoState::HOVER,
                    "focus" => PseudoState::FOCUS,
                    _ => return Err(SelectorError::UnsupportedPseudoClass(name.clone())),
                };
                node.pseudo_state.contains(state)
            }
            SimpleSelector::PseudoElement(_) => false,
        })
    }

    fn validate(&self) -> Result<(), SelectorError> {
        match self {
            SimpleSelector::PseudoClass(name)
                if !matches!(name.to_ascii_lowercase().as_str(), "hover" | "focus") =>
            {
                Err(SelectorError::UnsupportedPseudoClass(name.clone()))
            }
            _ => Ok(()),
        }
    }
}

/// Simple selectors with no combinator between them (`div.a#b`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundSelector {
    pub parts: Vec<SimpleSelector>,
}

impl CompoundSelector {
    pub fn matches(&self, node: &Node) -> Result<bool, SelectorError> {
        for part in &self.parts {
            if !part.matches(node)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Selector combinator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `a b`
    Descendant,
    /// `a > b`
    Child,
    /// `a + b`
    NextSibling,
    /// `a ~ b`
    SubsequentSibling,
}

/// Compounds joined by combinators. `combinators[i]` sits between
/// `compounds[i]` and `compounds[i + 1]`; the last compound is the subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    pub compounds: Vec<CompoundSelector>,
    pub combinators: Vec<Combinator>,
}

impl ComplexSelector {
    pub fn parse(text: &str) -> Result<Self, SelectorError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SelectorError::Empty);
        }
        let malformed = || SelectorError::Malformed(text.to_string());

        let mut cursor = Cursor::new(text);
        let mut compounds = Vec::new();
        let mut combinators = Vec::new();
        let mut current = CompoundSelector::default();
        let mut pending: Option<Combinator> = None;

        loop {
            let had_space = cursor.skip_whitespace();
            let Some(c) = cursor.peek() else { break };
            let explicit = match c {
                '>' => Some(Combinator::Child),
                '+' => Some(Combinator::NextSibling),
                '~' => Some(Combinator::SubsequentSibling),
                _ => None,
            };
            if let Some(combinator) = explicit {
                if current.parts.is_empty() || pending.is_some() {
                    return Err(malformed());
                }
                cursor.bump();
                compounds.push(std::mem::take(&mut current));
                pending = Some(combinator);
                continue;
            }

            if let Some(combinator) = pending.take() {
                combinators.push(combinator);
            } else if had_space && !current.parts.is_empty() {
                compounds.push(std::mem::take(&mut current));
                combinators.push(Combinator::Descendant);
            }
            let part = cursor.simple_selector().ok_or_else(malformed)?;
            current.parts.push(part);
        }

        if pending.is_some() || current.parts.is_empty() {
            return Err(malformed());
        }
        compounds.push(current);
        Ok(Self {
            compounds,
            combinators,
        })
    }

    /// Reject selectors that use pseudo-classes we cannot evaluate
    pub fn validate(&self) -> Result<(), SelectorError> {
        self.compounds
            .iter()
            .flat_map(|c| c.parts.iter())
            .try_for_each(SimpleSelector::validate)
    }

    /// Match with `node` as the subject
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> Result<bool, SelectorError> {
        self.validate()?;
        match self.compounds.len() {
            0 => Ok(false),
            n => self.matches_from(tree, node, n - 1),
        }
    }

    fn matches_from(&self, tree: &DomTree, node: NodeId, index: usize) -> Result<bool, SelectorError> {
        let Some(element) = tree.get(node) else {
            return Ok(false);
        };
        if !self.compounds[index].matches(element)? {
            return Ok(false);
        }
        if index == 0 {
            return Ok(true);
        }

        let next = index - 1;
        match self.combinators[next] {
            Combinator::Child => match tree.parent(node) {
                Some(parent) => self.matches_from(tree, parent, next),
                None => Ok(false),
            },
            Combinator::NextSibling => match tree.previous_sibling(node) {
                Some(sibling) => self.matches_from(tree, sibling, next),
                None => Ok(false),
            },
            Combinator::Descendant => {
                for ancestor in tree.ancestors(node) {
                    if self.matches_from(tree, ancestor, next)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Combinator::SubsequentSibling => {
                for sibling in tree.preceding_siblings(node) {
                    if self.matches_from(tree, sibling, next)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }
}

/// Comma-separated selector list; matches when any member matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList(pub Vec<ComplexSelector>);

impl SelectorList {
    pub fn parse(text: &str) -> Result<Self, SelectorError> {
        if text.trim().is_empty() {
            return Err(SelectorError::Empty);
        }
        split_top_level(text)
            .into_iter()
            .map(|part| {
                ComplexSelector::parse(part).map_err(|e| match e {
                    SelectorError::Empty => SelectorError::Malformed(text.trim().to_string()),
                    other => other,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(SelectorList)
    }

    pub fn validate(&self) -> Result<(), SelectorError> {
        self.0.iter().try_for_each(ComplexSelector::validate)
    }

    pub fn matches(&self, tree: &DomTree, node: NodeId) -> Result<bool, SelectorError> {
        self.validate()?;
        for selector in &self.0 {
            if selector.matches(tree, node)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// Split on commas outside brackets, parentheses and quotes
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[' | '(') => depth += 1,
            (None, ']' | ')') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    /// Returns whether anything was skipped
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.pos > start
    }

    fn ident(&mut self) -> Option<&'a str> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii())
        {
            self.bump();
        }
        (self.pos > start).then(|| &self.input[start..self.pos])
    }

    fn simple_selector(&mut self) -> Option<SimpleSelector> {
        match self.peek()? {
            '*' => {
                self.bump();
                Some(SimpleSelector::Universal)
            }
            '.' => {
                self.bump();
                self.ident().map(|i| SimpleSelector::Class(i.to_string()))
            }
            '#' => {
                self.bump();
                self.ident().map(|i| SimpleSelector::Id(i.to_string()))
            }
            '[' => {
                self.bump();
                self.attribute().map(SimpleSelector::Attribute)
            }
            ':' => {
                self.bump();
                let element = self.eat(':');
                let name = self.ident()?.to_string();
                if self.peek() == Some('(') {
                    // Functional pseudo-classes are kept whole and rejected at match time
                    let args = self.balanced_parens()?;
                    return Some(SimpleSelector::PseudoClass(format!("{name}{args}")));
                }
                Some(if element {
                    SimpleSelector::PseudoElement(name)
                } else {
                    SimpleSelector::PseudoClass(name)
                })
            }
            _ => self
                .ident()
                .map(|i| SimpleSelector::Type(i.to_ascii_lowercase())),
        }
    }

    fn balanced_parens(&mut self) -> Option<&'a str> {
        let start = self.pos;
        let mut depth = 0usize;
        loop {
            match self.bump()? {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(&self.input[start..self.pos]);
                    }
                }
                _ => {}
            }
        }
    }

    fn attribute(&mut self) -> Option<AttributeSelector> {
        self.skip_whitespace();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_whitespace();
        if self.eat(']') {
            return Some(AttributeSelector {
                name,
                matcher: None,
            });
        }

        let op = match self.bump()? {
            '=' => None,
            c @ ('~' | '|' | '^' | '$' | '*') => {
                if !self.eat('=') {
                    return None;
                }
                Some(c)
            }
            _ => return None,
        };
        self.skip_whitespace();
        let value = self.attribute_value()?;
        self.skip_whitespace();
        if !self.eat(']') {
            return None;
        }

        let matcher = match op {
            None => AttributeMatcher::Exact(value),
            Some('~') => AttributeMatcher::Includes(value),
            Some('|') => AttributeMatcher::DashMatch(value),
            Some('^') => AttributeMatcher::Prefix(value),
            Some('$') => AttributeMatcher::Suffix(value),
            Some(_) => AttributeMatcher::Substring(value),
        };
        Some(AttributeSelector {
            name,
            matcher: Some(matcher),
        })
    }

    fn attribute_value(&mut self) -> Option<String> {
        match self.peek()? {
            q @ ('"' | '\'') => {
                self.bump();
                let start = self.pos;
                while self.peek()? != q {
                    self.bump();
                }
                let value = self.input[start..self.pos].to_string();
                self.bump();
                Some(value)
            }
            _ => self.ident().map(str::to_string),
        }
    }
}

/// Does `node` satisfy a single simple selector such as `.a` or `[href]`?
pub fn matches_simple_selector(tree: &DomTree, node: NodeId, selector: &str) -> Result<bool, SelectorError> {
    let Some(element) = tree.get(node) else {
        return Ok(false);
    };
    let compound = parse_compound(selector)?;
    match compound.parts.as_slice() {
        [part] => part.matches(element),
        _ => Err(SelectorError::Malformed(selector.to_string())),
    }
}

/// Does `node` satisfy every part of a compound selector such as `div.a#b`?
pub fn matches_compound_selector(tree: &DomTree, node: NodeId, selector: &str) -> Result<bool, SelectorError> {
    let Some(element) = tree.get(node) else {
        return Ok(false);
    };
    parse_compound(selector)?.matches(element)
}

fn parse_compound(selector: &str) -> Result<CompoundSelector, SelectorError> {
    let complex = ComplexSelector::parse(selector)?;
    match <[CompoundSelector; 1]>::try_from(complex.compounds) {
        Ok([compound]) => Ok(compound),
        Err(_) => Err(SelectorError::Malformed(selector.to_string())),
    }
}

/// Full selector (list) match with `node` as the subject. Empty selectors
/// never match.
pub fn matches_selector(tree: &DomTree, node: NodeId, selector: &str) -> Result<bool, SelectorError> {
    match SelectorList::parse(selector) {
        Ok(list) => list.matches(tree, node),
        Err(SelectorError::Empty) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Rules whose selector matches `node`, in input order. Rules that cannot
/// be evaluated are skipped.
pub fn match_rules<'a>(tree: &DomTree, node: NodeId, rules: &'a [CssRule]) -> Vec<&'a CssRule> {
    rules
        .iter()
        .filter(|rule| {
            let list = match rule.selectors() {
                Ok(list) => list,
                Err(SelectorError::Empty) => return false,
                Err(e) => {
                    tracing::debug!(selector = %rule.selector, error = %e, "skipping rule");
                    return false;
                }
            };
            match list.matches(tree, node) {
                Ok(matched) => matched,
                Err(e) => {
                    tracing::debug!(selector = %rule.selector, error = %e, "skipping rule");
                    false
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with(tag: Tag) -> (DomTree, NodeId) {
        let mut tree = DomTree::new();
        let id = tree.create_element(tag);
        tree.append_child(NodeId::ROOT, id).unwrap();
        (tree, id)
    }

    #[test]
    fn test_parse_complex() {
        let sel = ComplexSelector::parse("div > p.note  span").unwrap();
        assert_eq!(sel.compounds.len(), 3);
        assert_eq!(
            sel.combinators,
            vec![Combinator::Child, Combinator::Descendant]
        );
        assert_eq!(
            sel.compounds[1].parts,
            vec![
                SimpleSelector::Type("p".into()),
                SimpleSelector::Class("note".into())
            ]
        );
    }

    #[test]
    fn test_parse_rejects_dangling_combinators() {
        assert!(ComplexSelector::parse("div >").is_err());
        assert!(ComplexSelector::parse("> div").is_err());
        assert!(ComplexSelector::parse("a > > b").is_err());
        assert_eq!(ComplexSelector::parse("   "), Err(SelectorError::Empty));
    }

    #[test]
    fn test_attribute_matchers() {
        let sel = |m| AttributeSelector {
            name: "lang".into(),
            matcher: Some(m),
        };
        assert!(sel(AttributeMatcher::DashMatch("en".into())).matches(Some("en-US")));
        assert!(sel(AttributeMatcher::DashMatch("en".into())).matches(Some("en")));
        assert!(!sel(AttributeMatcher::DashMatch("en".into())).matches(Some("english")));
        assert!(sel(AttributeMatcher::Includes("b".into())).matches(Some("a b c")));
        assert!(!sel(AttributeMatcher::Prefix(String::new())).matches(Some("x")));
        assert!(sel(AttributeMatcher::Suffix(".png".into())).matches(Some("a.png")));
    }

    #[test]
    fn test_type_selector_case_insensitive() {
        let (tree, id) = tree_with(Tag::Div);
        assert_eq!(matches_simple_selector(&tree, id, "DIV"), Ok(true));
        assert_eq!(matches_simple_selector(&tree, id, "span"), Ok(false));
        assert_eq!(matches_simple_selector(&tree, id, "*"), Ok(true));
    }

    #[test]
    fn test_unsupported_pseudo_class_errors() {
        let (tree, id) = tree_with(Tag::Li);
        assert!(matches!(
            matches_simple_selector(&tree, id, ":nth-child(2)"),
            Err(SelectorError::UnsupportedPseudoClass(_))
        ));
        assert_eq!(matches_simple_selector(&tree, id, "::before"), Ok(false));
    }
}
