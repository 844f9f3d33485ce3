//! Project access and project-level detection.
//!
//! The engine never touches the file system directly. Everything it needs
//! from a project goes through [`ProjectSource`], which the command-line
//! crate implements over a real directory and tests implement with
//! [`MemoryProject`].
//!
//! All paths handed to and returned by a source are relative to its root.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::param::Parameter;
use crate::tokens::extract_tokens;

/// Theme configuration files, in lookup order.
pub const TOKEN_CONFIG_FILES: &[&str] = &[
    "tailwind.config.js",
    "tailwind.config.cjs",
    "tailwind.config.mjs",
    "tailwind.config.ts",
];

/// Script extensions sampled for stylesheet imports.
pub const SCRIPT_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];

/// Read-only view of a project tree.
pub trait ProjectSource {
    /// Absolute (or caller-chosen) root the relative paths hang off.
    fn root(&self) -> &Path;

    /// Whether a project-relative path names an existing file.
    fn exists(&self, path: &Path) -> bool;

    /// Reads a project-relative file as UTF-8.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Every `.css` file, project-relative, in a stable order.
    fn stylesheets(&self) -> Vec<PathBuf>;

    /// Every script file (see [`SCRIPT_EXTENSIONS`]), project-relative, in a
    /// stable order.
    fn scripts(&self) -> Vec<PathBuf>;
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.contains(&ext))
}

/// In-memory project, keyed by relative path.
#[derive(Debug, Clone, Default)]
pub struct MemoryProject {
    root: PathBuf,
    files: BTreeMap<PathBuf, String>,
}

impl MemoryProject {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files: BTreeMap::new(),
        }
    }

    /// Adds a file.
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }
}

impl ProjectSource for MemoryProject {
    fn root(&self) -> &Path {
        &self.root
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not in project", path.display()),
            )
        })
    }

    fn stylesheets(&self) -> Vec<PathBuf> {
        self.files
            .keys()
            .filter(|path| has_extension(path, &["css"]))
            .cloned()
            .collect()
    }

    fn scripts(&self) -> Vec<PathBuf> {
        self.files
            .keys()
            .filter(|path| has_extension(path, SCRIPT_EXTENSIONS))
            .cloned()
            .collect()
    }
}

/// Kind of front-end project, used to pick default stylesheet candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    React,
    Vanilla,
    #[default]
    Unknown,
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::React => "react",
            ProjectType::Vanilla => "vanilla",
            ProjectType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names in `dependencies` and `devDependencies` of `package.json`.
///
/// `None` when there is no `package.json`; `Err` carries the parse message.
fn package_dependencies(project: &dyn ProjectSource) -> Option<Result<BTreeSet<String>, String>> {
    let path = Path::new("package.json");
    if !project.exists(path) {
        return None;
    }
    let parsed = project
        .read_to_string(path)
        .map_err(|err| err.to_string())
        .and_then(|text| {
            serde_json::from_str::<serde_json::Value>(&text).map_err(|err| err.to_string())
        });
    Some(parsed.map(|manifest| {
        ["dependencies", "devDependencies"]
            .iter()
            .filter_map(|key| manifest.get(key).and_then(|deps| deps.as_object()))
            .flat_map(|deps| deps.keys().cloned())
            .collect()
    }))
}

/// Classifies the project, appending the reason to `diagnostics`.
pub fn detect_project_type(project: &dyn ProjectSource, diagnostics: &mut Vec<String>) -> ProjectType {
    match package_dependencies(project) {
        Some(Ok(deps)) if deps.contains("react") => {
            diagnostics.push("Detected react dependency in package.json".to_string());
            return ProjectType::React;
        }
        Some(Err(err)) => {
            tracing::warn!(error = %err, "package.json is not valid JSON");
            diagnostics.push(format!("Failed to parse package.json: {}", err));
        }
        _ => {}
    }

    if project.exists(Path::new("index.html")) {
        diagnostics.push("Detected index.html".to_string());
        return ProjectType::Vanilla;
    }

    diagnostics.push("Unknown project type".to_string());
    ProjectType::Unknown
}

/// First existing theme configuration file.
pub fn find_token_config(project: &dyn ProjectSource) -> Option<PathBuf> {
    TOKEN_CONFIG_FILES
        .iter()
        .map(PathBuf::from)
        .find(|path| project.exists(path))
}

/// Finds and parses the theme configuration, if any.
///
/// Never fails: problems end up in `diagnostics` and yield no parameters.
pub fn load_token_params(
    project: &dyn ProjectSource,
    limit: usize,
    diagnostics: &mut Vec<String>,
) -> Vec<Parameter> {
    let Some(config) = find_token_config(project) else {
        match package_dependencies(project) {
            Some(Ok(deps)) if deps.contains("tailwindcss") => diagnostics.push(
                "Tailwind dependency found, but no tailwind.config file detected.".to_string(),
            ),
            Some(Err(err)) => {
                diagnostics.push(format!("Failed to parse package.json for Tailwind: {}", err))
            }
            _ => {}
        }
        return Vec::new();
    };

    match project.read_to_string(&config) {
        Ok(content) => {
            let params = extract_tokens(&content, &config, limit);
            let name = config
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            diagnostics.push(format!("Tailwind tokens: {} from {}", params.len(), name));
            params
        }
        Err(err) => {
            tracing::warn!(file = %config.display(), error = %err, "cannot read token config");
            diagnostics.push(format!("Tailwind parse failed: {}", err));
            Vec::new()
        }
    }
}
