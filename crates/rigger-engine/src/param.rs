//! The parameter data model.
//!
//! A [`Parameter`] is one tunable literal discovered in a stylesheet or a
//! theme configuration. Parameters are immutable once built; edits are
//! expressed as new text produced by [`rewrite`](crate::rewrite), never by
//! mutating a parameter.

use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize, Serializer};

/// Fixed, ordered parameter taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ParamGroup {
    Colour,
    Typography,
    Spacing,
    Radius,
    Shadow,
    Motion,
    Other,
}

impl ParamGroup {
    /// All groups in display order.
    pub const ALL: [ParamGroup; 7] = [
        ParamGroup::Colour,
        ParamGroup::Typography,
        ParamGroup::Spacing,
        ParamGroup::Radius,
        ParamGroup::Shadow,
        ParamGroup::Motion,
        ParamGroup::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParamGroup::Colour => "Colour",
            ParamGroup::Typography => "Typography",
            ParamGroup::Spacing => "Spacing",
            ParamGroup::Radius => "Radius",
            ParamGroup::Shadow => "Shadow",
            ParamGroup::Motion => "Motion",
            ParamGroup::Other => "Other",
        }
    }

    /// Position in [`ParamGroup::ALL`].
    pub fn rank(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for ParamGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value type inferred from the literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Number,
    Color,
    String,
}

/// Where a parameter was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    #[serde(rename = "css")]
    Css,
    /// A JS-like theme configuration such as `tailwind.config.js`.
    #[serde(rename = "tailwind")]
    TokenConfig,
}

/// A parameter default or an override value.
///
/// Serialises as a bare JSON number or string. Whole numbers are written
/// without a fractional part (`24`, not `24.0`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Text(String),
}

impl ParamValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(n) => Some(*n),
            ParamValue::Text(_) => None,
        }
    }

    /// Renders the value as CSS text, appending `unit` to numbers only.
    pub fn render(&self, unit: Option<&str>) -> String {
        match self {
            ParamValue::Number(n) => format!("{}{}", n, unit.unwrap_or("")),
            ParamValue::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Number(n) => write!(f, "{}", n),
            ParamValue::Text(s) => f.write_str(s),
        }
    }
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParamValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                serializer.serialize_i64(*n as i64)
            }
            ParamValue::Number(n) => serializer.serialize_f64(*n),
            ParamValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        ParamValue::Number(n)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

/// Slider bounds for numeric parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl NumericRange {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }
}

/// Provenance of a parameter.
///
/// `start`/`end` are byte offsets of the value in `file`, or `-1` for
/// parameters that cannot be spliced (token-config origin).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamSource {
    pub file: PathBuf,
    pub property: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    pub value: String,
    pub start: i64,
    pub end: i64,
}

impl ParamSource {
    /// The byte span of the value when it can be spliced.
    pub fn span(&self) -> Option<(usize, usize)> {
        if self.start >= 0 && self.end > self.start {
            Some((self.start as usize, self.end as usize))
        } else {
            None
        }
    }
}

/// One extracted tunable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub id: String,
    pub label: String,
    pub group: ParamGroup,
    #[serde(rename = "type")]
    pub kind: ParamType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    pub default: ParamValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Generated custom property name, e.g. `--rig-colour-color-p7j1dz`.
    pub css_var: String,
    pub confidence: f64,
    pub origin: Origin,
    pub source: ParamSource,
}

impl Parameter {
    /// The override for this parameter if present, else its default.
    pub fn effective_value<'a>(
        &'a self,
        overrides: &'a crate::Overrides,
    ) -> &'a ParamValue {
        overrides.get(&self.id).unwrap_or(&self.default)
    }

    pub fn range(&self) -> Option<NumericRange> {
        match (self.min, self.max, self.step) {
            (Some(min), Some(max), Some(step)) => Some(NumericRange { min, max, step }),
            _ => None,
        }
    }

    /// Whether the rewrite step can splice this parameter's value.
    pub fn is_span_addressable(&self) -> bool {
        self.source.span().is_some()
    }
}

/// Deterministic display order: group, label, selector, id.
pub fn compare_params(a: &Parameter, b: &Parameter) -> Ordering {
    a.group
        .rank()
        .cmp(&b.group.rank())
        .then_with(|| a.label.cmp(&b.label))
        .then_with(|| {
            let sa = a.source.selector.as_deref().unwrap_or("");
            let sb = b.source.selector.as_deref().unwrap_or("");
            sa.cmp(sb)
        })
        .then_with(|| a.id.cmp(&b.id))
}

/// Sorts parameters in place with [`compare_params`].
pub fn sort_params(params: &mut [Parameter]) {
    params.sort_by(compare_params);
}

/// Clamps to `[min, max]` and rounds to two decimals.
pub(crate) fn clamp_confidence(value: f64, min: f64, max: f64) -> f64 {
    (value.clamp(min, max) * 100.0).round() / 100.0
}
