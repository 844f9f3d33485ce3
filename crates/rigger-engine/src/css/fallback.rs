//! Permissive `property: value;` pass used when the structural parse fails.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::text::LineIndex;

use super::walker::Declaration;

static PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-zA-Z-]+)\s*:\s*([^;{}]+);").expect("declaration pattern"));

/// Finds every `property: value;` pair in `css`, in source order.
///
/// No selector is recovered; line and column come from `index`.
pub fn declarations(css: &str, index: &LineIndex) -> Vec<Declaration> {
    PAIR.captures_iter(css)
        .filter_map(|caps| {
            let property = caps.get(1)?;
            let value = caps.get(2)?;
            let raw = value.as_str();
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return None;
            }
            let start = value.start() + (raw.len() - raw.trim_start().len());
            let (line, column) = index.locate(start);
            Some(Declaration {
                property: property.as_str().to_ascii_lowercase(),
                value: trimmed.to_string(),
                start,
                end: start + trimmed.len(),
                selector: String::new(),
                line,
                column,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_with_offsets() {
        let css = "a { Color :  red ; margin: 0 auto; } junk";
        let decls = declarations(css, &LineIndex::new(css));
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].property, "color");
        assert_eq!(decls[0].value, "red");
        assert_eq!(&css[decls[0].start..decls[0].end], "red");
        assert_eq!(decls[1].value, "0 auto");
        assert_eq!(decls[1].selector, "");
    }

    #[test]
    fn test_missing_semicolon_is_not_a_pair() {
        let css = "a { color: red }";
        assert!(declarations(css, &LineIndex::new(css)).is_empty());
    }
}
