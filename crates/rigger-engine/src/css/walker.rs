//! Structural stylesheet pass built on `cssparser`.
//!
//! Walks top-level and nested rules, recording every declaration together
//! with the exact byte span of its value. The walker does no filtering
//! beyond pruning skipped at-rules; the extractor decides what becomes a
//! parameter.
//!
//! Any rule-level parse error aborts the pass (the caller then degrades to
//! the regex pass). Errors inside a declaration block only drop that
//! declaration, which is how `cssparser` recovers anyway.

use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, ParseError, Parser, ParserInput, ParserState,
    QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser, SourcePosition,
};
use once_cell::sync::Lazy;
use regex::Regex;

use super::classify::is_skipped_at_rule;
use crate::text::LineIndex;

static IMPORTANT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*!\s*important\s*$").expect("important pattern"));
static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("comment pattern"));

/// A declaration as it appears in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Lower-cased property name.
    pub property: String,
    /// Value text, trimmed and without `!important`.
    pub value: String,
    /// Byte offset of the first value byte.
    pub start: usize,
    /// Byte offset one past the last value byte.
    pub end: usize,
    /// Selector prefixed by enclosing at-rule preludes.
    pub selector: String,
    /// 1-based line of the value start.
    pub line: usize,
    /// 1-based byte column of the value start, as [`LineIndex`] counts it.
    pub column: usize,
}

/// Runs the structural pass. Returns `None` when the stylesheet cannot be
/// parsed rule by rule.
pub fn declarations(css: &str) -> Option<Vec<Declaration>> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);

    let mut walker = RuleWalker {
        context: Vec::new(),
        declarations: Vec::new(),
        failed: false,
    };

    let rules = cssparser::StyleSheetParser::new(&mut parser, &mut walker);
    let mut failed = false;
    for result in rules {
        if let Err((err, slice)) = result {
            tracing::debug!(kind = ?err.kind, slice, "stylesheet rule failed to parse");
            failed = true;
        }
    }

    if failed || walker.failed {
        return None;
    }

    let index = LineIndex::new(css);
    let mut declarations = walker.declarations;
    for decl in &mut declarations {
        (decl.line, decl.column) = index.locate(decl.start);
    }
    Some(declarations)
}

/// Drops comments and collapses whitespace runs in a rule prelude.
fn normalize_prelude(text: &str) -> String {
    COMMENT
        .replace_all(text, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Consumes the rest of `input`, returning the source text it covered.
fn drain<'i>(input: &mut Parser<'i, '_>, start: SourcePosition) -> &'i str {
    while input.next_including_whitespace_and_comments().is_ok() {}
    input.slice_from(start)
}

struct RuleWalker {
    /// Enclosing at-rule preludes, outermost first.
    context: Vec<String>,
    declarations: Vec<Declaration>,
    failed: bool,
}

impl RuleWalker {
    fn selector_in_context(&self, selector: &str) -> String {
        if self.context.is_empty() {
            selector.to_string()
        } else {
            format!("{} {}", self.context.join(" "), selector)
        }
    }
}

enum AtRuleKind {
    /// Rules inside are walked with this context entry.
    Group(String),
    /// Contents are pruned.
    Skip,
}

impl<'i> QualifiedRuleParser<'i> for RuleWalker {
    type Prelude = String;
    type QualifiedRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        let start = input.position();
        let selector = drain(input, start);
        Ok(normalize_prelude(selector))
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        let selector = self.selector_in_context(&prelude);
        let mut decl_parser = ValueSpanParser;
        let body = RuleBodyParser::new(input, &mut decl_parser);

        for span in body.flatten() {
            self.declarations.push(Declaration {
                property: span.property,
                value: span.value,
                start: span.start,
                end: span.end,
                selector: selector.clone(),
                // Located by `declarations` once the walk is done.
                line: 0,
                column: 0,
            });
        }
        Ok(())
    }
}

impl<'i> AtRuleParser<'i> for RuleWalker {
    type Prelude = AtRuleKind;
    type AtRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        let start = input.position();
        let prelude = normalize_prelude(drain(input, start));

        if is_skipped_at_rule(name.as_ref()) {
            return Ok(AtRuleKind::Skip);
        }

        let entry = if prelude.is_empty() {
            format!("@{}", name.as_ref())
        } else {
            format!("@{} {}", name.as_ref(), prelude)
        };
        Ok(AtRuleKind::Group(entry))
    }

    fn rule_without_block(
        &mut self,
        _prelude: Self::Prelude,
        _start: &ParserState,
    ) -> Result<Self::AtRule, ()> {
        // `@import`, `@charset` and friends carry no declarations.
        Ok(())
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, ParseError<'i, Self::Error>> {
        match prelude {
            AtRuleKind::Skip => {
                let start = input.position();
                drain(input, start);
            }
            AtRuleKind::Group(entry) => {
                self.context.push(entry);
                let nested = cssparser::StyleSheetParser::new(input, self);
                let mut failed = false;
                for result in nested {
                    failed |= result.is_err();
                }
                self.failed |= failed;
                self.context.pop();
            }
        }
        Ok(())
    }
}

struct ValueSpan {
    property: String,
    value: String,
    start: usize,
    end: usize,
}

/// Records the value span of every declaration in a block.
struct ValueSpanParser;

impl<'i> DeclarationParser<'i> for ValueSpanParser {
    type Declaration = ValueSpan;
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        input.skip_whitespace();
        let start = input.position();
        let raw = drain(input, start);

        let leading = raw.len() - raw.trim_start().len();
        let trimmed = raw.trim();
        let value = match IMPORTANT.find(trimmed) {
            Some(m) => trimmed[..m.start()].trim_end(),
            None => trimmed,
        };
        if value.is_empty() {
            return Err(input.new_custom_error::<(), ()>(()));
        }

        let value_start = start.byte_index() + leading;
        Ok(ValueSpan {
            property: name.as_ref().to_ascii_lowercase(),
            value: value.to_string(),
            start: value_start,
            end: value_start + value.len(),
        })
    }
}

impl<'i> AtRuleParser<'i> for ValueSpanParser {
    type Prelude = ();
    type AtRule = ValueSpan;
    type Error = ();
}

impl<'i> QualifiedRuleParser<'i> for ValueSpanParser {
    type Prelude = ();
    type QualifiedRule = ValueSpan;
    type Error = ();
}

impl<'i> RuleBodyItemParser<'i, ValueSpan, ()> for ValueSpanParser {
    fn parse_declarations(&self) -> bool {
        true
    }
    fn parse_qualified(&self) -> bool {
        false
    }
}
