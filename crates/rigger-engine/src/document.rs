//! Persisted documents: the configuration written next to a rewritten
//! stylesheet, and the point-in-time snapshot export.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RiggerError};
use crate::param::{ParamGroup, ParamValue, Parameter};
use crate::project::ProjectType;
use crate::scan::ScanResult;

/// Document format version.
pub const DOCUMENT_VERSION: &str = "0.1";

/// Per-parameter values keyed by parameter id.
pub type Overrides = BTreeMap<String, ParamValue>;

/// A stylesheet the documents refer to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub file: PathBuf,
    pub injected: bool,
}

/// Full parameter descriptors plus provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RigConfig {
    pub version: String,
    pub project_type: ProjectType,
    /// ISO-8601, UTC, millisecond precision.
    pub generated_at: String,
    pub params: Vec<Parameter>,
    pub files: Vec<FileEntry>,
}

/// Reduced parameter record carrying only the effective value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotParam {
    pub id: String,
    pub label: String,
    pub group: ParamGroup,
    pub css_var: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub value: ParamValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RigSnapshot {
    pub version: String,
    pub project_type: ProjectType,
    pub generated_at: String,
    pub params: Vec<SnapshotParam>,
    pub files: Vec<FileEntry>,
    pub overrides: Overrides,
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn files_of(result: &ScanResult) -> Vec<FileEntry> {
    result
        .css_file
        .iter()
        .map(|file| FileEntry {
            file: file.clone(),
            injected: true,
        })
        .collect()
}

pub fn build_config(result: &ScanResult, generated_at: DateTime<Utc>) -> RigConfig {
    RigConfig {
        version: DOCUMENT_VERSION.to_string(),
        project_type: result.project_type,
        generated_at: timestamp(generated_at),
        params: result.params.clone(),
        files: files_of(result),
    }
}

pub fn build_snapshot(
    result: &ScanResult,
    overrides: &Overrides,
    generated_at: DateTime<Utc>,
) -> RigSnapshot {
    RigSnapshot {
        version: DOCUMENT_VERSION.to_string(),
        project_type: result.project_type,
        generated_at: timestamp(generated_at),
        params: result
            .params
            .iter()
            .map(|param| SnapshotParam {
                id: param.id.clone(),
                label: param.label.clone(),
                group: param.group,
                css_var: param.css_var.clone(),
                unit: param.unit.clone(),
                value: param.effective_value(overrides).clone(),
            })
            .collect(),
        files: files_of(result),
        overrides: overrides.clone(),
    }
}

/// Pretty JSON with two-space indentation.
pub fn to_pretty_json<T: Serialize>(document: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Reads overrides from either a snapshot document (its `overrides` field)
/// or a bare `{ "id": value }` object.
///
/// ```rust
/// use rigger_engine::{overrides_from_json, ParamValue};
///
/// let bare = overrides_from_json(r#"{"rig.a": 12, "rig.b": "red"}"#).unwrap();
/// assert_eq!(bare["rig.a"], ParamValue::Number(12.0));
///
/// let snapshot = overrides_from_json(r#"{"version": "0.1", "overrides": {"rig.a": 3}}"#).unwrap();
/// assert_eq!(snapshot.len(), 1);
/// ```
pub fn overrides_from_json(text: &str) -> Result<Overrides> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let serde_json::Value::Object(mut map) = value else {
        return Err(RiggerError::invalid_overrides("expected a JSON object"));
    };
    let inner = match map.remove("overrides") {
        Some(overrides @ serde_json::Value::Object(_)) => overrides,
        Some(other) => {
            map.insert("overrides".to_string(), other);
            serde_json::Value::Object(map)
        }
        None => serde_json::Value::Object(map),
    };
    Ok(serde_json::from_value(inner)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::scan_stylesheet;
    use crate::rank::Candidate;
    use chrono::TimeZone;

    fn result() -> ScanResult {
        ScanResult {
            project_type: ProjectType::Vanilla,
            root: PathBuf::from("/site"),
            css_file: Some(PathBuf::from("styles.css")),
            css_candidates: vec![Candidate {
                file: PathBuf::from("styles.css"),
                score: 7,
                reason: "preferred; discovered".to_string(),
            }],
            params: scan_stylesheet("h1 { color: #ff0000; font-size: 24px; }", "styles.css"),
            diagnostics: Vec::new(),
        }
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_config_header_and_files() {
        let config = build_config(&result(), at());
        assert_eq!(config.version, "0.1");
        assert_eq!(config.generated_at, "2024-05-01T12:30:00.000Z");
        assert_eq!(config.files.len(), 1);
        assert!(config.files[0].injected);

        let json: serde_json::Value =
            serde_json::from_str(&to_pretty_json(&config).unwrap()).unwrap();
        assert_eq!(json["projectType"], "vanilla");
        let first = &json["params"][0];
        assert_eq!(first["type"], "color");
        assert_eq!(first["origin"], "css");
        assert_eq!(first["source"]["selector"], "h1");
        assert!(first.get("min").is_none());
        assert_eq!(json["params"][1]["default"], 24);
        assert_eq!(json["params"][1]["unit"], "px");
    }

    #[test]
    fn test_config_without_file() {
        let mut result = result();
        result.css_file = None;
        assert!(build_config(&result, at()).files.is_empty());
    }

    #[test]
    fn test_snapshot_uses_effective_values() {
        let result = result();
        let mut overrides = Overrides::new();
        overrides.insert(result.params[1].id.clone(), ParamValue::Number(32.0));

        let snapshot = build_snapshot(&result, &overrides, at());
        assert_eq!(snapshot.params[0].value, ParamValue::from("#ff0000"));
        assert_eq!(snapshot.params[1].value, ParamValue::Number(32.0));
        assert_eq!(snapshot.overrides, overrides);

        let text = to_pretty_json(&snapshot).unwrap();
        assert!(text.starts_with("{\n  \"version\": \"0.1\""));
        assert_eq!(overrides_from_json(&text).unwrap(), overrides);
    }

    #[test]
    fn test_overrides_shapes() {
        assert!(overrides_from_json("[1, 2]").is_err());
        assert!(overrides_from_json("{\"a\": true}").is_err());
        assert!(overrides_from_json("not json").is_err());
        // A non-object `overrides` entry is just another id.
        let bare = overrides_from_json(r#"{"overrides": 5, "x": 1}"#).unwrap();
        assert_eq!(bare.len(), 2);
    }

    #[test]
    fn test_config_round_trips_through_serde() {
        let config = build_config(&result(), at());
        let text = to_pretty_json(&config).unwrap();
        let back: RigConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
