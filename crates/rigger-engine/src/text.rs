//! Text primitives shared by the extractors.
//!
//! Everything here is a small, pure function or state machine over `&str`:
//!
//! - [`LineIndex`]: byte offset to 1-based line/column via binary search
//! - [`CodeChars`]: a character iterator that classifies each char as code,
//!   string literal or comment, driven by [`LexState`]
//! - [`stable_hash`] / [`short_hash`]: the identity hash (version 1)
//! - [`slugify`], [`strip_quotes`], [`parse_numeric`]

use std::iter::Peekable;
use std::str::CharIndices;

use once_cell::sync::Lazy;
use regex::Regex;

static NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(-?\d*\.?\d+)([a-zA-Z%]*)$").expect("numeric pattern"));

/// Precomputed line-start table for a piece of text.
///
/// Lines and columns are 1-based. Columns count bytes from the start of the
/// line, matching the byte offsets carried by [`ParamSource`](crate::ParamSource).
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(content: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            content
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { starts }
    }

    /// Returns the `(line, column)` of a byte offset.
    ///
    /// Offsets past the end of the text resolve to the last line.
    pub fn locate(&self, offset: usize) -> (usize, usize) {
        // Number of line starts at or before the offset; never zero because
        // the table always begins with 0.
        let line = self.starts.partition_point(|&start| start <= offset);
        let start = self.starts[line - 1];
        (line, offset - start + 1)
    }
}

/// Identity hash, version 1.
///
/// 32-bit FNV-1a over the UTF-16 code units of `input`:
///
/// ```text
/// h = 0x811c9dc5
/// for each unit u:  h = (h ^ u) * 16777619   (mod 2^32)
/// ```
///
/// The multiply is the same as `h + (h<<1) + (h<<4) + (h<<7) + (h<<8) + (h<<24)`.
/// Persisted overrides are keyed by ids built from this value, so the
/// algorithm must not change.
pub fn stable_hash(input: &str) -> u32 {
    input.encode_utf16().fold(0x811c_9dc5_u32, |hash, unit| {
        (hash ^ u32::from(unit)).wrapping_mul(16_777_619)
    })
}

/// The hash rendered in lowercase base-36, truncated to six characters.
pub fn short_hash(input: &str) -> String {
    let mut digits = to_base36(stable_hash(input));
    digits.truncate(6);
    digits
}

fn to_base36(mut value: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut out = Vec::with_capacity(7);
    loop {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
        if value == 0 {
            break;
        }
    }
    out.reverse();
    // Only ASCII digits were pushed.
    String::from_utf8(out).unwrap_or_default()
}

/// Lowercases and collapses every run of non `[a-z0-9]` characters into a
/// single `-`, trimming dashes at both ends.
///
/// ```rust
/// use rigger_engine::text::slugify;
///
/// assert_eq!(slugify("Colour-background-color"), "colour-background-color");
/// assert_eq!(slugify("  Gray / 900 "), "gray-900");
/// ```
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;
    for c in input.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Removes one matching pair of `'`, `"` or `` ` `` around a trimmed value.
pub fn strip_quotes(value: &str) -> &str {
    let trimmed = value.trim();
    for quote in ['\'', '"', '`'] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return &trimmed[1..trimmed.len() - 1];
        }
    }
    trimmed
}

/// Splits a plain numeric literal into its number and unit suffix.
///
/// Accepts `-?\d*\.?\d+` followed by letters or `%`; anything else,
/// including lists like `0 auto`, yields `None`.
pub fn parse_numeric(value: &str) -> Option<(f64, &str)> {
    let caps = NUMERIC.captures(value.trim())?;
    let number = caps.get(1)?.as_str().parse::<f64>().ok()?;
    let unit = caps.get(2).map(|m| m.as_str()).unwrap_or("");
    Some((number, unit))
}

/// Lexical state of a JS-like source scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexState {
    Normal,
    /// Inside a string literal opened by the given delimiter.
    InString(char),
    /// Just read a backslash inside a string literal.
    InStringEscape(char),
    InLineComment,
    InBlockComment,
}

/// How a character participates in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Significant code: braces, commas and colons here affect structure.
    Code,
    /// Part of a string literal, delimiters included.
    Str,
    /// Part of a comment, markers included.
    Comment,
}

/// Iterator over `(byte_offset, char, CharClass)` driven by [`LexState`].
///
/// Both characters of the two-character comment markers (`//`, `/*`, `*/`)
/// are reported as [`CharClass::Comment`].
pub struct CodeChars<'a> {
    chars: Peekable<CharIndices<'a>>,
    state: LexState,
    queued: Option<(usize, char, CharClass)>,
}

impl<'a> CodeChars<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            chars: source.char_indices().peekable(),
            state: LexState::Normal,
            queued: None,
        }
    }

    fn take_pair(&mut self, class: CharClass) {
        if let Some((idx, c)) = self.chars.next() {
            self.queued = Some((idx, c, class));
        }
    }
}

impl Iterator for CodeChars<'_> {
    type Item = (usize, char, CharClass);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(item) = self.queued.take() {
            return Some(item);
        }

        let (idx, c) = self.chars.next()?;
        let next = self.chars.peek().map(|&(_, n)| n);

        let class = match self.state {
            LexState::Normal => match (c, next) {
                ('/', Some('/')) => {
                    self.state = LexState::InLineComment;
                    self.take_pair(CharClass::Comment);
                    CharClass::Comment
                }
                ('/', Some('*')) => {
                    self.state = LexState::InBlockComment;
                    self.take_pair(CharClass::Comment);
                    CharClass::Comment
                }
                ('\'' | '"' | '`', _) => {
                    self.state = LexState::InString(c);
                    CharClass::Str
                }
                _ => CharClass::Code,
            },
            LexState::InString(delim) => {
                if c == '\\' {
                    self.state = LexState::InStringEscape(delim);
                } else if c == delim {
                    self.state = LexState::Normal;
                }
                CharClass::Str
            }
            LexState::InStringEscape(delim) => {
                self.state = LexState::InString(delim);
                CharClass::Str
            }
            LexState::InLineComment => {
                if c == '\n' {
                    self.state = LexState::Normal;
                }
                CharClass::Comment
            }
            LexState::InBlockComment => {
                if c == '*' && next == Some('/') {
                    self.state = LexState::Normal;
                    self.take_pair(CharClass::Comment);
                }
                CharClass::Comment
            }
        };

        Some((idx, c, class))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_index_locates_offsets() {
        let text = "a {\n  color: red;\n}\n";
        let index = LineIndex::new(text);
        assert_eq!(index.locate(text.len()), (4, 1));
        assert_eq!(index.locate(0), (1, 1));
        assert_eq!(index.locate(2), (1, 3));
        let color = text.find("color").unwrap();
        assert_eq!(index.locate(color), (2, 3));
        assert_eq!(index.locate(text.len() - 2), (3, 1));
    }

    #[test]
    fn test_line_index_past_end() {
        let index = LineIndex::new("ab");
        assert_eq!(index.locate(10), (1, 11));
    }

    #[test]
    fn test_hash_is_fnv1a_over_utf16() {
        assert_eq!(stable_hash(""), 0x811c_9dc5);
        assert_eq!(stable_hash("a"), 0xe40c_292c);
        assert_eq!(short_hash("sample.css|h1|color|#ff0000"), "p7j1dz");
        assert_eq!(short_hash(""), "ztntfp");
        assert_eq!(short_hash("a"), "1r9wi7");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Typography-font-size"), "typography-font-size");
        assert_eq!(slugify("--weird__key--"), "weird-key");
        assert_eq!(slugify("colors-gray-900"), "colors-gray-900");
        assert_eq!(slugify("fontSize-2xl"), "fontsize-2xl");
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes(" \"#fff\" "), "#fff");
        assert_eq!(strip_quotes("'a'"), "a");
        assert_eq!(strip_quotes("`b`"), "b");
        assert_eq!(strip_quotes("'mixed\""), "'mixed\"");
        assert_eq!(strip_quotes("\""), "\"");
        assert_eq!(strip_quotes("bare"), "bare");
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric("24px"), Some((24.0, "px")));
        assert_eq!(parse_numeric(" 1.5 "), Some((1.5, "")));
        assert_eq!(parse_numeric("-0.05em"), Some((-0.05, "em")));
        assert_eq!(parse_numeric(".5rem"), Some((0.5, "rem")));
        assert_eq!(parse_numeric("100%"), Some((100.0, "%")));
        assert_eq!(parse_numeric("0 auto"), None);
        assert_eq!(parse_numeric("#fff"), None);
        assert_eq!(parse_numeric("calc(1px + 2px)"), None);
    }

    fn classes(source: &str) -> String {
        CodeChars::new(source)
            .map(|(_, _, class)| match class {
                CharClass::Code => 'c',
                CharClass::Str => 's',
                CharClass::Comment => '#',
            })
            .collect()
    }

    #[test]
    fn test_code_chars_strings_and_escapes() {
        assert_eq!(classes(r#"a"{\"}"b"#), "cssssssc");
        assert_eq!(classes("`x`y"), "sssc");
    }

    #[test]
    fn test_code_chars_comments() {
        assert_eq!(classes("a//{\nb"), "c####c");
        assert_eq!(classes("a/*}*/b"), "c#####c");
        assert_eq!(classes("'//'"), "ssss");
    }

    #[test]
    fn test_code_chars_unterminated_string_runs_to_end() {
        assert_eq!(classes("a'b{c"), "cssss");
    }
}
