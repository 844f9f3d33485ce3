//! Unified diffs of planned rewrites.

use similar::{ChangeTag, TextDiff};

use crate::output::Styles;

/// Unified diff between two versions of `path`, with `a/` and `b/` headers
/// and three lines of context. Empty when nothing changed.
pub fn unified_diff(original: &str, modified: &str, path: &str) -> String {
    if original == modified {
        return String::new();
    }
    let diff = TextDiff::from_lines(original, modified);
    let old_header = format!("a/{}", path);
    let new_header = format!("b/{}", path);
    let text = diff
        .unified_diff()
        .context_radius(3)
        .header(&old_header, &new_header)
        .to_string();
    text
}

/// Inserted and deleted line counts.
pub fn change_counts(original: &str, modified: &str) -> (usize, usize) {
    let diff = TextDiff::from_lines(original, modified);
    diff.iter_all_changes()
        .fold((0, 0), |(inserted, deleted), change| match change.tag() {
            ChangeTag::Insert => (inserted + 1, deleted),
            ChangeTag::Delete => (inserted, deleted + 1),
            ChangeTag::Equal => (inserted, deleted),
        })
}

/// Applies diff styles line by line.
pub fn style_diff(diff: &str, styles: &Styles) -> String {
    diff.lines()
        .map(|line| {
            let style = if line.starts_with("+++") || line.starts_with("---") {
                &styles.heading
            } else if line.starts_with("@@") {
                &styles.hunk
            } else if line.starts_with('+') {
                &styles.added
            } else if line.starts_with('-') {
                &styles.removed
            } else {
                return line.to_string();
            };
            style.apply_to(line).to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_diff() {
        let diff = unified_diff("line1\nold_text\nline3\n", "line1\nnew_text\nline3\n", "a.css");
        assert!(diff.starts_with("--- a/a.css\n+++ b/a.css\n@@"));
        assert!(diff.contains("-old_text"));
        assert!(diff.contains("+new_text"));
    }

    #[test]
    fn test_no_changes() {
        assert!(unified_diff("same\n", "same\n", "a.css").is_empty());
        assert_eq!(change_counts("same\n", "same\n"), (0, 0));
    }

    #[test]
    fn test_change_counts() {
        assert_eq!(change_counts("a\nb\n", "x\na\nc\n"), (2, 1));
    }

    #[test]
    fn test_plain_styling_is_identity() {
        let diff = unified_diff("a\n", "b\n", "x.css");
        assert_eq!(style_diff(&diff, &Styles::plain()), diff.trim_end_matches('\n'));
    }
}
