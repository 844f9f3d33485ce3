//! Stylesheet rewriting.
//!
//! [`rewrite`] replaces every span-addressable parameter value with a
//! `var(--…)` reference and injects a root block that binds each variable
//! to its effective value. The block is delimited by [`BLOCK_START`] and
//! [`BLOCK_END`]; a later rewrite replaces it in place, so the operation is
//! idempotent with respect to the block.
//!
//! A stylesheet rewritten earlier already reads its old values through
//! `var(--rig-…)`, so a rescan no longer sees them. Declarations of the
//! previous block that the text still references are carried into the new
//! block (see [`carried_declarations`]) so those references stay bound.
//!
//! Replacements are applied in descending `start` order. Splicing a span
//! only shifts text after it, so the offsets of the spans still to be
//! applied (all earlier in the text) stay valid.

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::document::{build_config, Overrides, RigConfig};
use crate::param::Parameter;
use crate::scan::ScanResult;
use crate::text::parse_numeric;

/// Opening sentinel of the injected root block.
pub const BLOCK_START: &str = "/* rigger:start */";
/// Closing sentinel of the injected root block.
pub const BLOCK_END: &str = "/* rigger:end */";

static BLOCK_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*(--rig-[A-Za-z0-9_-]+)\s*:\s*(.*?)\s*;\s*$")
        .expect("block declaration pattern")
});
static VAR_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"var\(\s*(--rig-[A-Za-z0-9_-]+)").expect("variable reference pattern")
});

/// A declaration kept from an earlier root block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarriedDeclaration {
    pub css_var: String,
    /// Value text as it appeared in the block.
    pub value: String,
}

impl CarriedDeclaration {
    /// The override for the variable's parameter id if present, else the
    /// old value. Numeric overrides take the old value's unit.
    fn effective_value(&self, overrides: &Overrides) -> String {
        let Some(value) = variable_id(&self.css_var).and_then(|id| overrides.get(&id)) else {
            return self.value.clone();
        };
        let unit = parse_numeric(&self.value).map(|(_, unit)| unit);
        value.render(unit)
    }
}

/// Parameter id of a generated variable name.
///
/// ```rust
/// use rigger_engine::variable_id;
///
/// assert_eq!(variable_id("--rig-colour-color-p7j1dz").as_deref(), Some("rig.colour-color-p7j1dz"));
/// assert_eq!(variable_id("--rig-tw-colors-brand").as_deref(), Some("rig.tw.colors-brand"));
/// assert_eq!(variable_id("--brand"), None);
/// ```
pub fn variable_id(css_var: &str) -> Option<String> {
    let rest = css_var.strip_prefix("--rig-")?;
    Some(match rest.strip_prefix("tw-") {
        Some(token) => format!("rig.tw.{}", token),
        None => format!("rig.{}", rest),
    })
}

/// Byte range of the root block, sentinels included.
fn block_range(content: &str) -> Option<(usize, usize)> {
    let start = content.find(BLOCK_START)?;
    let search_from = start + BLOCK_START.len();
    let end = content[search_from..].find(BLOCK_END)?;
    Some((start, search_from + end + BLOCK_END.len()))
}

/// Declarations in the existing root block of `content` that the text
/// outside the block still references and `params` do not declare, in
/// block order.
pub fn carried_declarations(content: &str, params: &[Parameter]) -> Vec<CarriedDeclaration> {
    let Some((start, after)) = block_range(content) else {
        return Vec::new();
    };
    let outside = format!("{}{}", &content[..start], &content[after..]);
    let referenced: HashSet<&str> = VAR_REFERENCE
        .captures_iter(&outside)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect();
    let declared: HashSet<&str> = params.iter().map(|p| p.css_var.as_str()).collect();

    let mut seen = HashSet::new();
    BLOCK_DECLARATION
        .captures_iter(&content[start..after])
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str();
            let value = caps.get(2)?.as_str();
            let keep = referenced.contains(name) && !declared.contains(name) && seen.insert(name);
            keep.then(|| CarriedDeclaration {
                css_var: name.to_string(),
                value: value.to_string(),
            })
        })
        .collect()
}

fn root_block(params: &[Parameter], carried: &[CarriedDeclaration], overrides: &Overrides) -> String {
    let mut lines = Vec::with_capacity(params.len() + carried.len() + 4);
    lines.push(BLOCK_START.to_string());
    lines.push(":root {".to_string());
    for param in params {
        let value = param.effective_value(overrides).render(param.unit.as_deref());
        lines.push(format!("  {}: {};", param.css_var, value));
    }
    for decl in carried {
        lines.push(format!("  {}: {};", decl.css_var, decl.effective_value(overrides)));
    }
    lines.push("}".to_string());
    lines.push(BLOCK_END.to_string());
    lines.join("\n")
}

/// Builds the sentinel-wrapped `:root` block.
///
/// Every parameter is declared, token-config ones included, in the order
/// given.
pub fn build_root_block(params: &[Parameter], overrides: &Overrides) -> String {
    root_block(params, &[], overrides)
}

/// Replaces an existing root block, or prepends `block` and a blank line.
pub fn inject_root_block(content: &str, block: &str) -> String {
    match block_range(content) {
        Some((start, after)) => format!("{}{}{}", &content[..start], block, &content[after..]),
        None => format!("{}\n\n{}", block, content),
    }
}

struct Replacement<'a> {
    start: usize,
    end: usize,
    css_var: &'a str,
}

/// Rewrites `content` so parameter values read from variables, then
/// injects the root block.
///
/// Spans that fall outside `content`, split a UTF-8 character, or overlap
/// a span already applied are left untouched.
pub fn rewrite(content: &str, params: &[Parameter], overrides: &Overrides) -> String {
    let mut replacements: Vec<Replacement<'_>> = params
        .iter()
        .filter_map(|param| {
            let (start, end) = param.source.span()?;
            Some(Replacement {
                start,
                end,
                css_var: &param.css_var,
            })
        })
        .collect();
    replacements.sort_by(|a, b| b.start.cmp(&a.start));

    let mut updated = content.to_string();
    let mut floor = usize::MAX;
    for repl in replacements {
        let valid = repl.end <= updated.len()
            && repl.end <= floor
            && updated.is_char_boundary(repl.start)
            && updated.is_char_boundary(repl.end);
        if !valid {
            tracing::debug!(
                start = repl.start,
                end = repl.end,
                var = repl.css_var,
                "skipping stale span"
            );
            continue;
        }
        updated.replace_range(repl.start..repl.end, &format!("var({})", repl.css_var));
        floor = repl.start;
    }

    let carried = carried_declarations(content, params);
    if !carried.is_empty() {
        tracing::debug!(count = carried.len(), "carrying declarations from previous block");
    }
    inject_root_block(&updated, &root_block(params, &carried, overrides))
}

/// A rewrite ready to be written back, plus its configuration document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditPlan {
    /// Target stylesheet, project-relative.
    pub file: PathBuf,
    pub rewritten: String,
    pub config: RigConfig,
}

impl EditPlan {
    /// Derives a plan from a scan and the stylesheet's current text.
    ///
    /// `None` when the scan found no stylesheet.
    pub fn build(
        result: &ScanResult,
        current: &str,
        overrides: &Overrides,
        generated_at: DateTime<Utc>,
    ) -> Option<Self> {
        let file = result.css_file.clone()?;
        let rewritten = rewrite(current, &result.params, overrides);
        tracing::info!(
            file = %file.display(),
            params = result.params.len(),
            "edit plan built"
        );
        Some(Self {
            file,
            rewritten,
            config: build_config(result, generated_at),
        })
    }
}
