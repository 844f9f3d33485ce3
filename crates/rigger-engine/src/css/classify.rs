//! Property allow-list, grouping, value typing, ranges and confidence for
//! stylesheet declarations.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::param::{clamp_confidence, NumericRange, ParamGroup, ParamType};

/// Properties whose values are extracted. Everything else is ignored.
pub const ALLOWED_PROPERTIES: &[&str] = &[
    "color",
    "background-color",
    "border-color",
    "font-size",
    "line-height",
    "letter-spacing",
    "margin",
    "margin-top",
    "margin-right",
    "margin-bottom",
    "margin-left",
    "padding",
    "padding-top",
    "padding-right",
    "padding-bottom",
    "padding-left",
    "border-radius",
    "box-shadow",
    "transition",
    "animation",
    "animation-duration",
];

/// At-rules whose contents are never extracted.
pub const SKIPPED_AT_RULES: &[&str] = &["keyframes", "-webkit-keyframes", "font-face", "page"];

const COMPLEX_PROPERTIES: &[&str] = &["box-shadow", "transition", "animation", "animation-duration"];

pub(crate) static COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(#([0-9a-fA-F]{3,8})|rgb\(|rgba\(|hsl\(|hsla\()").expect("color pattern")
});
static INTERACTIVE_SELECTOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i):(hover|active|focus|focus-visible|focus-within)").expect("pseudo pattern")
});
static ROOT_SELECTOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(^|[\s>])(:root|html|body)([\s>]|$)").expect("root pattern"));
static COMPLEX_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(calc\(|var\(|clamp\(|min\(|max\()").expect("complex pattern"));

pub fn is_allowed(property: &str) -> bool {
    ALLOWED_PROPERTIES.contains(&property)
}

pub fn is_skipped_at_rule(name: &str) -> bool {
    SKIPPED_AT_RULES
        .iter()
        .any(|skipped| skipped.eq_ignore_ascii_case(name))
}

/// A value that already routes through a custom property.
pub fn is_rigged(raw_value: &str) -> bool {
    raw_value
        .get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("var("))
}

pub fn is_color(value: &str) -> bool {
    COLOR.is_match(value)
}

pub fn group_for(property: &str) -> ParamGroup {
    if property.contains("color") {
        ParamGroup::Colour
    } else if matches!(
        property,
        "font-size" | "line-height" | "letter-spacing" | "font-weight"
    ) {
        ParamGroup::Typography
    } else if property.starts_with("margin") || property.starts_with("padding") {
        ParamGroup::Spacing
    } else if property.contains("radius") {
        ParamGroup::Radius
    } else if property.contains("shadow") {
        ParamGroup::Shadow
    } else if property.contains("transition") || property.contains("animation") {
        ParamGroup::Motion
    } else {
        ParamGroup::Other
    }
}

pub fn range_for(property: &str) -> NumericRange {
    if property.contains("line-height") {
        NumericRange::new(0.8, 3.0, 0.05)
    } else if property.contains("letter-spacing") {
        NumericRange::new(-2.0, 10.0, 0.1)
    } else if property.contains("radius") {
        NumericRange::new(0.0, 64.0, 1.0)
    } else if property.contains("shadow") {
        NumericRange::new(0.0, 32.0, 1.0)
    } else if property.contains("font-size") {
        NumericRange::new(8.0, 96.0, 1.0)
    } else {
        NumericRange::new(0.0, 200.0, 1.0)
    }
}

/// Reliability estimate for a stylesheet declaration, in `[0.2, 0.95]`.
pub fn confidence(property: &str, raw_value: &str, selector: Option<&str>, kind: ParamType) -> f64 {
    let mut score = 0.55;
    match kind {
        ParamType::Color => score += 0.2,
        ParamType::Number => score += 0.15,
        ParamType::String => {}
    }
    if let Some(selector) = selector {
        if ROOT_SELECTOR.is_match(selector) {
            score += 0.1;
        }
        if INTERACTIVE_SELECTOR.is_match(selector) {
            score -= 0.05;
        }
    }
    if COMPLEX_VALUE.is_match(raw_value) {
        score -= 0.1;
    }
    if COMPLEX_PROPERTIES.contains(&property) {
        score -= 0.05;
    }
    clamp_confidence(score, 0.2, 0.95)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups() {
        assert_eq!(group_for("background-color"), ParamGroup::Colour);
        assert_eq!(group_for("line-height"), ParamGroup::Typography);
        assert_eq!(group_for("padding-left"), ParamGroup::Spacing);
        assert_eq!(group_for("border-radius"), ParamGroup::Radius);
        assert_eq!(group_for("box-shadow"), ParamGroup::Shadow);
        assert_eq!(group_for("animation-duration"), ParamGroup::Motion);
        assert_eq!(group_for("width"), ParamGroup::Other);
    }

    #[test]
    fn test_ranges() {
        assert_eq!(range_for("line-height"), NumericRange::new(0.8, 3.0, 0.05));
        assert_eq!(range_for("font-size"), NumericRange::new(8.0, 96.0, 1.0));
        assert_eq!(range_for("margin"), NumericRange::new(0.0, 200.0, 1.0));
    }

    #[test]
    fn test_rigged_values() {
        assert!(is_rigged("var(--x)"));
        assert!(is_rigged("VAR(--x)"));
        assert!(!is_rigged("calc(var(--x) * 2)"));
        assert!(!is_rigged("va"));
    }

    #[test]
    fn test_skipped_at_rules() {
        assert!(is_skipped_at_rule("keyframes"));
        assert!(is_skipped_at_rule("-webkit-keyframes"));
        assert!(is_skipped_at_rule("font-face"));
        assert!(!is_skipped_at_rule("media"));
    }

    #[test]
    fn test_confidence_signals() {
        assert_eq!(confidence("color", "#fff", Some("h1"), ParamType::Color), 0.75);
        assert_eq!(confidence("color", "#fff", Some(":root"), ParamType::Color), 0.85);
        assert_eq!(confidence("font-size", "16px", Some("a:hover"), ParamType::Number), 0.65);
        assert_eq!(
            confidence("margin", "calc(1px + 2px)", None, ParamType::String),
            0.45
        );
        assert_eq!(
            confidence("box-shadow", "0 1px var(--x)", Some("body"), ParamType::String),
            0.5
        );
    }

    #[test]
    fn test_root_selector_requires_boundary() {
        assert_eq!(confidence("color", "red", Some("body > p"), ParamType::String), 0.65);
        assert_eq!(confidence("color", "red", Some(".tbody"), ParamType::String), 0.55);
    }
}
