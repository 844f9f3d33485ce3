//! Stylesheet references in CSS, HTML and script sources.
//!
//! Extraction is regex based and returns raw targets with any `?query` or
//! `#hash` removed. [`resolve_css_path`] turns a raw target into a
//! project-relative path.

use std::path::{Component, Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

static CSS_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)@import\s+(?:url\()?['"]?([^'")\s]+\.css[^'")]*?)['"]?\)?"#)
        .expect("css import pattern")
});
static HTML_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<link[^>]+href=['"]([^'"]+\.css[^'"]*)['"][^>]*>"#)
        .expect("html link pattern")
});
static SCRIPT_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"import\s+(?:[^'"]+\s+from\s+)?['"]([^'"]+\.css[^'"]*)['"]"#)
        .expect("script import pattern")
});
static MODULE_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"import\s+(?:[^'"]+\s+from\s+)?['"]([^'"]+\.module\.css)['"]"#)
        .expect("module import pattern")
});

/// Cuts a reference at the first `?` or `#` and trims it.
pub fn strip_query_hash(target: &str) -> &str {
    target
        .split(|c| c == '?' || c == '#')
        .next()
        .unwrap_or_default()
        .trim()
}

fn collect(pattern: &Regex, content: &str) -> Vec<String> {
    pattern
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| strip_query_hash(m.as_str()))
        .filter(|target| !target.is_empty())
        .map(str::to_string)
        .collect()
}

/// `@import` targets of a stylesheet, in source order.
///
/// ```rust
/// use rigger_engine::discover::css_imports;
///
/// let css = "@import url('./base.css');\n@import \"theme.css?x=1\";";
/// assert_eq!(css_imports(css), vec!["./base.css", "theme.css"]);
/// ```
pub fn css_imports(content: &str) -> Vec<String> {
    collect(&CSS_IMPORT, content)
}

/// Stylesheet `href`s of `<link>` tags in an HTML document.
pub fn html_links(content: &str) -> Vec<String> {
    collect(&HTML_LINK, content)
}

/// `.css` imports in a script (`import './app.css'`, `import s from './x.css'`).
pub fn script_imports(content: &str) -> Vec<String> {
    collect(&SCRIPT_IMPORT, content)
}

/// CSS-module imports in a script (`import styles from './Card.module.css'`).
pub fn module_imports(content: &str) -> Vec<String> {
    collect(&MODULE_IMPORT, content)
}

/// Resolves a reference found in a file located in `base_dir` (project
/// relative) to a project-relative path.
///
/// - `/x` is relative to the project root
/// - `./x` and `../x` are relative to `base_dir`
/// - bare `x` is relative to the project root
///
/// Returns `None` for empty targets and for paths that climb above the root.
pub fn resolve_css_path(base_dir: &Path, target: &str) -> Option<PathBuf> {
    let cleaned = strip_query_hash(target);
    if cleaned.is_empty() {
        return None;
    }
    if let Some(rooted) = cleaned.strip_prefix('/') {
        normalize(Path::new(rooted))
    } else if cleaned.starts_with('.') {
        normalize(&base_dir.join(cleaned))
    } else {
        normalize(Path::new(cleaned))
    }
}

/// Lexically removes `.` and `..` segments.
pub fn normalize(path: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    return None;
                }
            }
            Component::Normal(part) => out.push(part),
            Component::RootDir | Component::Prefix(_) => {}
        }
    }
    if out.as_os_str().is_empty() {
        None
    } else {
        Some(out)
    }
}
