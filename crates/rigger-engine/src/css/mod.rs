//! CSS declaration scanner.
//!
//! Turns stylesheet text into an ordered list of [`Parameter`]s:
//!
//! 1. A structural pass on `cssparser` records every declaration with the
//!    byte span of its value ([`walker`]). If any rule fails to parse, a
//!    regex pass over `property: value;` pairs is used instead ([`fallback`]).
//! 2. Declarations outside the allow-list, or whose value is already a
//!    `var(...)` reference, are dropped.
//! 3. Identical `(file, selector, property, value)` tuples yield one parameter.
//! 4. Values are typed (number with unit, color, or string), given a range
//!    and a confidence, and identified with the version-1 identity hash.
//!
//! Extraction stops at [`MAX_CSS_PARAMS`] parameters for the whole file.
//!
//! # Example
//!
//! ```rust
//! use rigger_engine::{scan_stylesheet, ParamType};
//!
//! let css = ":root { --a: 1; } h1 { color: #ff0000; font-size: 24px; }";
//! let params = scan_stylesheet(css, "site.css");
//!
//! assert_eq!(params.len(), 2);
//! assert_eq!(params[0].kind, ParamType::Color);
//! assert_eq!(params[1].unit.as_deref(), Some("px"));
//! assert!(params[0].css_var.starts_with("--rig-colour-color-"));
//! ```

pub mod classify;
pub mod fallback;
pub mod walker;

use std::collections::HashSet;
use std::path::Path;

use crate::param::{Origin, ParamSource, ParamType, ParamValue, Parameter};
use crate::text::{parse_numeric, short_hash, slugify, LineIndex};

pub use walker::Declaration;

/// Hard cap on parameters extracted from one stylesheet.
pub const MAX_CSS_PARAMS: usize = 120;

/// Scans a stylesheet. Never fails: unparsable input degrades to the regex
/// pass, and input without qualifying declarations yields an empty list.
pub fn scan_stylesheet(content: &str, file: impl AsRef<Path>) -> Vec<Parameter> {
    let file = file.as_ref();
    let declarations = match walker::declarations(content) {
        Some(decls) => decls,
        None => {
            tracing::debug!(file = %file.display(), "structural parse failed, using regex pass");
            fallback::declarations(content, &LineIndex::new(content))
        }
    };

    let mut builder = CssParamBuilder::new(file);
    for decl in declarations {
        if builder.len() >= MAX_CSS_PARAMS {
            tracing::debug!(
                file = %file.display(),
                cap = MAX_CSS_PARAMS,
                "parameter cap reached"
            );
            break;
        }
        builder.add(decl);
    }
    builder.finish()
}

/// Accumulates parameters for one file, enforcing the filters, dedup and
/// id uniqueness.
struct CssParamBuilder<'a> {
    file: &'a Path,
    file_key: String,
    seen: HashSet<String>,
    ids: HashSet<String>,
    params: Vec<Parameter>,
}

impl<'a> CssParamBuilder<'a> {
    fn new(file: &'a Path) -> Self {
        Self {
            file,
            file_key: file.to_string_lossy().into_owned(),
            seen: HashSet::new(),
            ids: HashSet::new(),
            params: Vec::new(),
        }
    }

    fn len(&self) -> usize {
        self.params.len()
    }

    fn add(&mut self, decl: Declaration) {
        let property = decl.property.as_str();
        if !classify::is_allowed(property) || classify::is_rigged(&decl.value) {
            return;
        }

        let identity = format!(
            "{}|{}|{}|{}",
            self.file_key, decl.selector, property, decl.value
        );
        if !self.seen.insert(identity.clone()) {
            return;
        }

        let group = classify::group_for(property);
        let (kind, default, unit, range) = match parse_numeric(&decl.value) {
            Some((number, unit)) => (
                ParamType::Number,
                ParamValue::Number(number),
                (!unit.is_empty()).then(|| unit.to_string()),
                Some(classify::range_for(property)),
            ),
            None if classify::is_color(&decl.value) => (
                ParamType::Color,
                ParamValue::Text(decl.value.clone()),
                None,
                None,
            ),
            None => (
                ParamType::String,
                ParamValue::Text(decl.value.clone()),
                None,
                None,
            ),
        };

        let selector = (!decl.selector.is_empty()).then(|| decl.selector.clone());
        let base = slugify(&format!("{}-{}", group.as_str(), property));
        let stem = format!("{}-{}", base, short_hash(&identity));
        let stem = self.unique_stem(stem);

        let confidence = classify::confidence(property, &decl.value, selector.as_deref(), kind);

        self.params.push(Parameter {
            id: format!("rig.{}", stem),
            label: property.replace('-', " "),
            group,
            kind,
            min: range.map(|r| r.min),
            max: range.map(|r| r.max),
            step: range.map(|r| r.step),
            default,
            unit,
            css_var: format!("--rig-{}", stem),
            confidence,
            origin: Origin::Css,
            source: ParamSource {
                file: self.file.to_path_buf(),
                property: decl.property,
                value: decl.value,
                start: decl.start as i64,
                end: decl.end as i64,
                selector,
                line: Some(decl.line),
                column: Some(decl.column),
            },
        });
    }

    /// Appends `-2`, `-3`, ... when two identities collide on the short hash.
    fn unique_stem(&mut self, stem: String) -> String {
        if self.ids.insert(stem.clone()) {
            return stem;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{}-{}", stem, n);
            if self.ids.insert(candidate.clone()) {
                tracing::debug!(stem = %stem, "identity hash collision");
                return candidate;
            }
            n += 1;
        }
    }

    fn finish(self) -> Vec<Parameter> {
        self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::ParamGroup;

    #[test]
    fn test_scenario_root_and_heading() {
        let css = ":root { --a: 1; } h1 { color: #ff0000; font-size: 24px; }";
        let params = scan_stylesheet(css, "sample.css");
        assert_eq!(params.len(), 2);

        let color = &params[0];
        assert_eq!(color.id, "rig.colour-color-p7j1dz");
        assert_eq!(color.css_var, "--rig-colour-color-p7j1dz");
        assert_eq!(color.group, ParamGroup::Colour);
        assert_eq!(color.kind, ParamType::Color);
        assert_eq!(color.default, ParamValue::from("#ff0000"));
        assert_eq!(color.confidence, 0.75);
        assert_eq!(color.source.selector.as_deref(), Some("h1"));

        let size = &params[1];
        assert_eq!(size.kind, ParamType::Number);
        assert_eq!(size.default, ParamValue::Number(24.0));
        assert_eq!(size.unit.as_deref(), Some("px"));
        assert_eq!((size.min, size.max, size.step), (Some(8.0), Some(96.0), Some(1.0)));
        assert_eq!(size.label, "font size");
        assert!(size.css_var.starts_with("--rig-typography-font-size-"));
        assert_eq!(
            &css[size.source.start as usize..size.source.end as usize],
            "24px"
        );
    }

    #[test]
    fn test_skips_disallowed_and_rigged() {
        let css = "a { width: 10px; color: var(--brand); margin: calc(1px + var(--x)); }";
        let params = scan_stylesheet(css, "a.css");
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].source.property, "margin");
        assert_eq!(params[0].kind, ParamType::String);
        assert_eq!(params[0].confidence, 0.45);
    }

    #[test]
    fn test_dedup_same_selector_property_value() {
        let css = "p { color: #333; } p { color: #333; } div { color: #333; }";
        let params = scan_stylesheet(css, "dup.css");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_skipped_at_rules_are_invisible() {
        let css = "@keyframes pulse { 50% { color: #f00; } }\n\
                   @page { margin: 1in; }\n\
                   @media print { body { margin: 0; } }";
        let params = scan_stylesheet(css, "a.css");
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].source.selector.as_deref(), Some("@media print body"));
        assert_eq!(params[0].default, ParamValue::Number(0.0));
        assert_eq!(params[0].unit, None);
    }

    #[test]
    fn test_fallback_on_broken_stylesheet() {
        let css = "h1 { color: #abc; }\nthis is not css";
        let params = scan_stylesheet(css, "broken.css");
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].source.selector, None);
        assert_eq!(params[0].source.line, Some(1));
        assert_eq!(params[0].source.column, Some(13));
        // No selector means no root bonus and no pseudo penalty.
        assert_eq!(params[0].confidence, 0.75);
    }

    #[test]
    fn test_cap_is_global() {
        let mut css = String::new();
        for i in 0..500 {
            css.push_str(&format!(".c{} {{ margin: {}px; }}\n", i, i));
        }
        let params = scan_stylesheet(&css, "big.css");
        assert_eq!(params.len(), MAX_CSS_PARAMS);
    }

    #[test]
    fn test_ids_unique_and_deterministic() {
        let css = "a { color: red; } b { color: red; } a:hover { color: red; }";
        let first = scan_stylesheet(css, "x.css");
        let second = scan_stylesheet(css, "x.css");
        let ids: Vec<_> = first.iter().map(|p| p.id.clone()).collect();
        let again: Vec<_> = second.iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids, again);
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn test_unique_stem_disambiguates() {
        let mut builder = CssParamBuilder::new(Path::new("a.css"));
        assert_eq!(builder.unique_stem("x".into()), "x");
        assert_eq!(builder.unique_stem("x".into()), "x-2");
        assert_eq!(builder.unique_stem("x".into()), "x-3");
    }
}
