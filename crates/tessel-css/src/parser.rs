//! CSS Parser using cssparser
//!
//! Turns stylesheet text into rules and inline `style` text into a
//! property map. Values are kept as raw text; nothing is normalised.
//! Invalid rules and declarations are dropped and parsing carries on.

use cssparser::{
    AtRuleParser, BasicParseErrorKind, CowRcStr, DeclarationParser, ParseError, Parser,
    ParserInput, ParserState, QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser,
    StyleSheetParser,
};
use tessel_dom::StyleMap;

use crate::{CssError, CssRule, Declaration, SelectorList, Stylesheet};

/// CSS Parser
#[derive(Debug, Default, Clone, Copy)]
pub struct CssParser;

impl CssParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a stylesheet, skipping anything invalid. Rules are numbered
    /// in source order starting at zero.
    pub fn parse(&self, css: &str) -> Stylesheet {
        let mut sheet = Stylesheet::new();
        let mut skipped = 0usize;
        for item in parse_items(css) {
            match item {
                Ok(Some(rule)) => sheet.rules.push(rule),
                Ok(None) => {}
                Err(_) => skipped += 1,
            }
        }
        renumber(&mut sheet.rules);
        if skipped > 0 {
            tracing::debug!(skipped, kept = sheet.rules.len(), "dropped invalid CSS rules");
        }
        sheet
    }

    /// Parse a stylesheet, failing on the first invalid rule
    pub fn parse_strict(&self, css: &str) -> Result<Stylesheet, CssError> {
        let mut sheet = Stylesheet::new();
        for item in parse_items(css) {
            if let Some(rule) = item? {
                sheet.rules.push(rule);
            }
        }
        renumber(&mut sheet.rules);
        Ok(sheet)
    }
}

fn renumber(rules: &mut [CssRule]) {
    for (order, rule) in rules.iter_mut().enumerate() {
        rule.source_order = order as u32;
    }
}

fn parse_items(css: &str) -> Vec<Result<Option<CssRule>, CssError>> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut top = TopLevelParser;
    StyleSheetParser::new(&mut parser, &mut top)
        .map(|item| {
            item.map_err(|(error, slice)| CssError::ParseError {
                line: error.location.line + 1,
                message: format!("invalid rule `{}`", slice.trim()),
            })
        })
        .collect()
}

/// Parse the body of a `style` attribute into declarations, in order
pub fn parse_declaration_list(text: &str) -> Vec<Declaration> {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    parse_declarations_from_block(&mut parser)
}

/// Parse a `style` attribute into a property map. Later duplicates win.
pub fn parse_inline_style(text: &str) -> StyleMap {
    parse_declaration_list(text)
        .into_iter()
        .map(|d| (d.property, d.value))
        .collect()
}

/// Render a property map back into `style` attribute text, sorted by name
pub fn serialize_inline_style(styles: &StyleMap) -> String {
    let mut entries: Vec<_> = styles.iter().collect();
    entries.sort();
    entries
        .into_iter()
        .map(|(k, v)| format!("{k}: {v};"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a trailing `!important` off a raw value
fn split_important(raw: &str) -> (String, bool) {
    let trimmed = raw.trim();
    if let Some(pos) = trimmed.rfind('!') {
        let (head, tail) = trimmed.split_at(pos);
        if tail[1..].trim().eq_ignore_ascii_case("important") {
            return (head.trim_end().to_string(), true);
        }
    }
    (trimmed.to_string(), false)
}

fn parse_declarations_from_block(block: &mut Parser) -> Vec<Declaration> {
    let mut body = BodyDeclParser;
    RuleBodyParser::new(block, &mut body).flatten().collect()
}

/// Records each declaration's name and raw value
struct BodyDeclParser;

impl<'i> DeclarationParser<'i> for BodyDeclParser {
    type Declaration = Declaration;
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
        _decl_start: &ParserState,
    ) -> Result<Declaration, ParseError<'i, ()>> {
        let start = input.position();
        while input.next_including_whitespace_and_comments().is_ok() {}
        let (value, important) = split_important(input.slice_from(start));
        if value.is_empty() {
            return Err(input.new_custom_error(()));
        }
        Ok(Declaration {
            property: name.to_ascii_lowercase(),
            value,
            important,
        })
    }
}

impl<'i> AtRuleParser<'i> for BodyDeclParser {
    type Prelude = ();
    type AtRule = Declaration;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<(), ParseError<'i, ()>> {
        Err(input.new_error(BasicParseErrorKind::AtRuleInvalid(name)))
    }

    fn parse_block<'t>(
        &mut self,
        _prelude: (),
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Declaration, ParseError<'i, ()>> {
        Err(input.new_error(BasicParseErrorKind::AtRuleBodyInvalid))
    }

    fn rule_without_block(&mut self, _prelude: (), _start: &ParserState) -> Result<Declaration, ()> {
        Err(())
    }
}

impl<'i> QualifiedRuleParser<'i> for BodyDeclParser {
    type Prelude = ();
    type QualifiedRule = Declaration;
    type Error = ();

    fn parse_prelude<'t>(&mut self, input: &mut Parser<'i, 't>) -> Result<(), ParseError<'i, ()>> {
        Err(input.new_error(BasicParseErrorKind::QualifiedRuleInvalid))
    }

    fn parse_block<'t>(
        &mut self,
        _prelude: (),
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Declaration, ParseError<'i, ()>> {
        Err(input.new_error(BasicParseErrorKind::QualifiedRuleInvalid))
    }
}

impl<'i> RuleBodyItemParser<'i, Declaration, ()> for BodyDeclParser {
    fn parse_declarations(&self) -> bool {
        true
    }

    fn parse_qualified(&self) -> bool {
        false
    }
}

/// Builds style rules; at-rules are consumed and produce nothing
struct TopLevelParser;

impl<'i> AtRuleParser<'i> for TopLevelParser {
    type Prelude = String;
    type AtRule = Option<CssRule>;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<String, ParseError<'i, ()>> {
        while input.next().is_ok() {}
        Ok(name.to_string())
    }

    fn parse_block<'t>(
        &mut self,
        prelude: String,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Option<CssRule>, ParseError<'i, ()>> {
        tracing::debug!(at_rule = %prelude, "skipping at-rule");
        while input.next().is_ok() {}
        Ok(None)
    }

    fn rule_without_block(&mut self, prelude: String, _start: &ParserState) -> Result<Option<CssRule>, ()> {
        tracing::debug!(at_rule = %prelude, "skipping at-rule");
        Ok(None)
    }
}

impl<'i> QualifiedRuleParser<'i> for TopLevelParser {
    type Prelude = String;
    type QualifiedRule = Option<CssRule>;
    type Error = ();

    fn parse_prelude<'t>(&mut self, input: &mut Parser<'i, 't>) -> Result<String, ParseError<'i, ()>> {
        let start = input.position();
        while input.next_including_whitespace_and_comments().is_ok() {}
        let prelude = input.slice_from(start).trim().to_string();
        // Unsupported pseudo-classes are only rejected at match time
        if let Err(error) = SelectorList::parse(&prelude) {
            tracing::debug!(selector = %prelude, %error, "dropping rule");
            return Err(input.new_custom_error(()));
        }
        Ok(prelude)
    }

    fn parse_block<'t>(
        &mut self,
        prelude: String,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Option<CssRule>, ParseError<'i, ()>> {
        let declarations = parse_declarations_from_block(input);
        Ok(Some(CssRule::new(&prelude, declarations, 0)))
    }
}
