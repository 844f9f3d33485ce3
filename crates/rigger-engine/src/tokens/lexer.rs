//! Syntax-aware slicing of JS-like object literals.
//!
//! None of these functions evaluate or fully parse the source. They walk it
//! with [`CodeChars`], so braces, commas and colons inside string literals
//! or comments never affect structure.

use crate::text::{strip_quotes, CharClass, CodeChars};

/// Extracts the body of the brace-delimited block opening at `open`.
///
/// Returns the text strictly between the braces and the byte offset of the
/// closing brace, or `None` when `open` is not a `{` or the block never
/// closes.
pub fn extract_braced_block(source: &str, open: usize) -> Option<(&str, usize)> {
    let tail = source.get(open..)?;
    if !tail.starts_with('{') {
        return None;
    }

    let mut depth = 0usize;
    for (idx, c, class) in CodeChars::new(tail) {
        if class != CharClass::Code {
            continue;
        }
        match c {
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    let close = open + idx;
                    return Some((&source[open + 1..close], close));
                }
            }
            _ => {}
        }
    }
    None
}

/// Splits on commas that sit outside any bracket, string or comment.
///
/// Comments are replaced by a single space; entries are trimmed and empty
/// entries dropped.
pub fn split_top_level(source: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut buffer = String::new();
    let mut depth = 0i32;
    let mut in_comment = false;

    for (_, c, class) in CodeChars::new(source) {
        match class {
            CharClass::Comment => {
                if !in_comment {
                    buffer.push(' ');
                    in_comment = true;
                }
                continue;
            }
            CharClass::Str => {
                in_comment = false;
                buffer.push(c);
                continue;
            }
            CharClass::Code => in_comment = false,
        }

        match c {
            '{' | '[' | '(' => depth += 1,
            '}' | ']' | ')' => depth -= 1,
            ',' if depth == 0 => {
                push_trimmed(&mut parts, &buffer);
                buffer.clear();
                continue;
            }
            _ => {}
        }
        buffer.push(c);
    }

    push_trimmed(&mut parts, &buffer);
    parts
}

fn push_trimmed(parts: &mut Vec<String>, buffer: &str) {
    let trimmed = buffer.trim();
    if !trimmed.is_empty() {
        parts.push(trimmed.to_string());
    }
}

/// Splits an entry at its first top-level colon.
///
/// The key is unquoted. Returns `None` when there is no such colon or either
/// side is empty.
pub fn split_key_value(entry: &str) -> Option<(&str, &str)> {
    let mut depth = 0i32;
    for (idx, c, class) in CodeChars::new(entry) {
        if class != CharClass::Code {
            continue;
        }
        match c {
            '{' | '[' | '(' => depth += 1,
            '}' | ']' | ')' => depth -= 1,
            ':' if depth == 0 => {
                let key = entry[..idx].trim();
                let value = entry[idx + 1..].trim();
                if key.is_empty() || value.is_empty() {
                    return None;
                }
                return Some((strip_quotes(key), value));
            }
            _ => {}
        }
    }
    None
}

/// First element of an array literal, unquoted.
///
/// `["1.5rem", { lineHeight: "2rem" }]` yields `1.5rem`.
pub fn parse_array_first(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if !trimmed.starts_with('[') {
        return None;
    }
    let close = trimmed.rfind(']').filter(|&idx| idx > 0)?;
    let first = split_top_level(&trimmed[1..close]).into_iter().next()?;
    Some(strip_quotes(&first).to_string())
}
