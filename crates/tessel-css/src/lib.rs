//! Tessel CSS Parser & Style System
//!
//! Parsing, selector matching, specificity, cascade, inheritance and the
//! incremental computed-style walk.

mod cascade;
mod computed;
mod inheritance;
mod parser;
pub mod properties;
mod selectors;
mod sheets;
mod shorthand;
mod specificity;

pub use cascade::resolve;
pub use computed::{ResolveStats, resolve_node, resolve_tree, user_agent_defaults};
pub use inheritance::apply_inheritance;
pub use parser::{CssParser, parse_declaration_list, parse_inline_style, serialize_inline_style};
pub use selectors::{
    AttributeMatcher, AttributeSelector, Combinator, ComplexSelector, CompoundSelector,
    SelectorError, SelectorList, SimpleSelector, match_rules, matches_compound_selector,
    matches_selector, matches_simple_selector,
};
pub use sheets::{SheetId, StyleSheetManager};
pub use shorthand::expand;
pub use specificity::calculate;

/// Parse a CSS stylesheet, dropping anything unparseable
pub fn parse_stylesheet(css: &str) -> Stylesheet {
    CssParser::new().parse(css)
}

/// Parsed stylesheet
#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    pub rules: Vec<CssRule>,
}

impl Stylesheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// A style rule: selector text, declarations, precomputed specificity and
/// its global source position.
#[derive(Debug, Clone)]
pub struct CssRule {
    pub selector: String,
    pub declarations: Vec<Declaration>,
    pub specificity: Specificity,
    /// Cascade tie-break; larger means declared later
    pub source_order: u32,
    compiled: Result<SelectorList, SelectorError>,
}

impl CssRule {
    pub fn new(selector: &str, declarations: Vec<Declaration>, source_order: u32) -> Self {
        Self {
            selector: selector.to_string(),
            declarations,
            specificity: calculate(selector),
            source_order,
            compiled: SelectorList::parse(selector),
        }
    }

    /// The parsed selector list, or why it could not be parsed
    pub fn selectors(&self) -> Result<&SelectorList, &SelectorError> {
        self.compiled.as_ref()
    }

    /// Value of the last declaration for `property` in this rule
    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .rev()
            .find(|d| d.property == property)
            .map(|d| d.value.as_str())
    }
}

/// Selector specificity (a, b, c), compared lexicographically
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl std::ops::Add for Specificity {
    type Output = Specificity;

    fn add(self, rhs: Specificity) -> Specificity {
        Specificity(self.0 + rhs.0, self.1 + rhs.1, self.2 + rhs.2)
    }
}

/// CSS declaration (property: value)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Lowercased property name
    pub property: String,
    /// Raw value text without `!important`
    pub value: String,
    pub important: bool,
}

impl Declaration {
    pub fn new(property: &str, value: &str) -> Self {
        Self {
            property: property.to_ascii_lowercase(),
            value: value.to_string(),
            important: false,
        }
    }
}

/// CSS parsing error
#[derive(Debug, thiserror::Error)]
pub enum CssError {
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: u32, message: String },
}
