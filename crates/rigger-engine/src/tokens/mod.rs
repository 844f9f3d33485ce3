//! Token table extraction from a JS-like theme configuration
//! (`tailwind.config.js` and friends).
//!
//! The source is never evaluated. Each recognised section key is located
//! with a whole-word regex, its object literal is sliced out with the
//! string- and comment-aware [`lexer`], and every `key: value` entry becomes
//! a [`Parameter`]. One level of nesting is flattened (`gray: { 900: … }`
//! becomes `gray-900`) and array values contribute their first element.
//!
//! Token parameters carry no byte span (`start = end = -1`), so they are
//! declared in the root block but never spliced.
//!
//! ```rust
//! use rigger_engine::extract_tokens;
//!
//! let source = r##"module.exports = { theme: { colors: { brand: "#ff00ff" } } }"##;
//! let params = extract_tokens(source, "tailwind.config.js", 60);
//!
//! assert_eq!(params.len(), 1);
//! assert_eq!(params[0].id, "rig.tw.colors-brand");
//! assert_eq!(params[0].source.start, -1);
//! ```

pub mod lexer;

use std::collections::{HashMap, HashSet};
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::css::classify::is_color;
use crate::param::{
    clamp_confidence, NumericRange, Origin, ParamGroup, ParamSource, ParamType, ParamValue,
    Parameter,
};
use crate::text::{parse_numeric, slugify, strip_quotes};

use lexer::{extract_braced_block, parse_array_first, split_key_value, split_top_level};

/// Default cap on token parameters.
pub const DEFAULT_TOKEN_LIMIT: usize = 60;

static LABEL_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-_]+").expect("label separator pattern"));

/// Theme sections that are extracted, in extraction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenSection {
    Colors,
    Spacing,
    FontSize,
    LineHeight,
    LetterSpacing,
    BorderRadius,
    BoxShadow,
}

impl TokenSection {
    pub const ALL: [TokenSection; 7] = [
        TokenSection::Colors,
        TokenSection::Spacing,
        TokenSection::FontSize,
        TokenSection::LineHeight,
        TokenSection::LetterSpacing,
        TokenSection::BorderRadius,
        TokenSection::BoxShadow,
    ];

    /// The object key as written in the configuration.
    pub fn key(&self) -> &'static str {
        match self {
            TokenSection::Colors => "colors",
            TokenSection::Spacing => "spacing",
            TokenSection::FontSize => "fontSize",
            TokenSection::LineHeight => "lineHeight",
            TokenSection::LetterSpacing => "letterSpacing",
            TokenSection::BorderRadius => "borderRadius",
            TokenSection::BoxShadow => "boxShadow",
        }
    }

    pub fn group(&self) -> ParamGroup {
        match self {
            TokenSection::Colors => ParamGroup::Colour,
            TokenSection::Spacing => ParamGroup::Spacing,
            TokenSection::FontSize | TokenSection::LineHeight | TokenSection::LetterSpacing => {
                ParamGroup::Typography
            }
            TokenSection::BorderRadius => ParamGroup::Radius,
            TokenSection::BoxShadow => ParamGroup::Shadow,
        }
    }

    pub fn range(&self) -> NumericRange {
        match self {
            TokenSection::FontSize => NumericRange::new(8.0, 96.0, 1.0),
            TokenSection::LineHeight => NumericRange::new(0.8, 3.0, 0.05),
            TokenSection::LetterSpacing => NumericRange::new(-2.0, 10.0, 0.1),
            TokenSection::BorderRadius => NumericRange::new(0.0, 64.0, 1.0),
            TokenSection::Spacing => NumericRange::new(0.0, 256.0, 1.0),
            _ => NumericRange::new(0.0, 200.0, 1.0),
        }
    }

    fn pattern(&self) -> Regex {
        // Section keys are plain identifiers, no escaping needed.
        Regex::new(&format!(r#"\b{}\b['"]?\s*:\s*\{{"#, self.key())).expect("section pattern")
    }
}

static SECTION_PATTERNS: Lazy<Vec<(TokenSection, Regex)>> = Lazy::new(|| {
    TokenSection::ALL
        .iter()
        .map(|section| (*section, section.pattern()))
        .collect()
});

/// Every non-empty object body assigned to `section` in `source`.
///
/// Scanning resumes after each extracted block, so a nested occurrence of
/// the same key inside a block is not reported twice.
pub fn find_section_blocks(source: &str, section: TokenSection) -> Vec<&str> {
    let Some((_, pattern)) = SECTION_PATTERNS.iter().find(|(s, _)| *s == section) else {
        return Vec::new();
    };

    let mut blocks = Vec::new();
    let mut pos = 0;
    while let Some(found) = pattern.find_at(source, pos) {
        let open = found.end() - 1;
        match extract_braced_block(source, open) {
            Some((body, close)) if !body.trim().is_empty() => {
                blocks.push(body);
                pos = close + 1;
            }
            _ => pos = found.end(),
        }
        if pos >= source.len() {
            break;
        }
    }
    blocks
}

/// Extracts at most `limit` token parameters from a theme configuration.
pub fn extract_tokens(content: &str, file: impl AsRef<Path>, limit: usize) -> Vec<Parameter> {
    let mut extractor = TokenExtractor {
        file: file.as_ref(),
        limit,
        seen: HashSet::new(),
        id_counts: HashMap::new(),
        params: Vec::new(),
    };

    for section in TokenSection::ALL {
        if extractor.full() {
            break;
        }
        for block in find_section_blocks(content, section) {
            if extractor.full() {
                break;
            }
            extractor.collect_block(section, block);
        }
    }

    tracing::debug!(
        file = %extractor.file.display(),
        count = extractor.params.len(),
        "token extraction finished"
    );
    extractor.params
}

struct TokenExtractor<'a> {
    file: &'a Path,
    limit: usize,
    /// `section:key` pairs already emitted.
    seen: HashSet<String>,
    /// Occurrences per slug base, for `-n` suffixes.
    id_counts: HashMap<String, usize>,
    params: Vec<Parameter>,
}

impl TokenExtractor<'_> {
    fn full(&self) -> bool {
        self.params.len() >= self.limit
    }

    fn collect_block(&mut self, section: TokenSection, block: &str) {
        for entry in split_top_level(block) {
            if self.full() {
                return;
            }
            let Some((key, raw)) = split_key_value(&entry) else {
                continue;
            };

            if raw.starts_with('{') {
                self.collect_nested(section, key, raw);
                continue;
            }

            if let Some(value) = entry_value(raw) {
                self.push(section, key.to_string(), value);
            }
        }
    }

    /// Flattens one nested level: `gray: { 900: "#111" }` → `gray-900`.
    fn collect_nested(&mut self, section: TokenSection, parent: &str, raw: &str) {
        let Some((body, _)) = extract_braced_block(raw, 0) else {
            return;
        };
        for entry in split_top_level(body) {
            if self.full() {
                return;
            }
            let Some((key, nested_raw)) = split_key_value(&entry) else {
                continue;
            };
            if nested_raw.starts_with('{') {
                tracing::debug!(section = section.key(), parent, key, "skipping deep nesting");
                continue;
            }
            if let Some(value) = entry_value(nested_raw) {
                self.push(section, format!("{}-{}", parent, key), value);
            }
        }
    }

    fn push(&mut self, section: TokenSection, key: String, value: String) {
        if !self.seen.insert(format!("{}:{}", section.key(), key)) {
            return;
        }
        let param = self.build(section, key, value);
        self.params.push(param);
    }

    fn build(&mut self, section: TokenSection, key: String, value: String) -> Parameter {
        let (kind, default, unit, range) = if section == TokenSection::Colors && is_color(&value) {
            (ParamType::Color, ParamValue::Text(value.clone()), None, None)
        } else if let Some((number, unit)) = parse_numeric(&value) {
            (
                ParamType::Number,
                ParamValue::Number(number),
                (!unit.is_empty()).then(|| unit.to_string()),
                Some(section.range()),
            )
        } else {
            (ParamType::String, ParamValue::Text(value.clone()), None, None)
        };

        let base = slugify(&format!("{}-{}", section.key(), key));
        let count = self.id_counts.entry(base.clone()).or_insert(0);
        *count += 1;
        let suffix = if *count > 1 {
            format!("-{}", count)
        } else {
            String::new()
        };

        let mut confidence = 0.35;
        if matches!(kind, ParamType::Color | ParamType::Number) {
            confidence += 0.1;
        }
        if matches!(section, TokenSection::Spacing | TokenSection::FontSize) {
            confidence += 0.05;
        }

        Parameter {
            id: format!("rig.tw.{}{}", base, suffix),
            label: LABEL_SEPARATORS.replace_all(&key, " ").into_owned(),
            group: section.group(),
            kind,
            min: range.map(|r| r.min),
            max: range.map(|r| r.max),
            step: range.map(|r| r.step),
            default,
            unit,
            css_var: format!("--rig-tw-{}{}", base, suffix),
            confidence: clamp_confidence(confidence, 0.2, 0.6),
            origin: Origin::TokenConfig,
            source: ParamSource {
                file: self.file.to_path_buf(),
                property: format!("tailwind.{}", section.key()),
                value,
                start: -1,
                end: -1,
                selector: Some(key),
                line: None,
                column: None,
            },
        }
    }
}

/// The representative value of an entry: first array element or the
/// unquoted literal. Empty values are dropped.
fn entry_value(raw: &str) -> Option<String> {
    let value = if raw.starts_with('[') {
        parse_array_first(raw)?
    } else {
        strip_quotes(raw).to_string()
    };
    (!value.is_empty()).then_some(value)
}
