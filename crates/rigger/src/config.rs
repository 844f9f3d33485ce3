//! Project configuration from `rigger.yaml`.
//!
//! Every field is optional. Missing fields take the defaults below, and
//! command-line flags win over both.
//!
//! ```yaml
//! stylesheet: src/theme.css
//! exclude: [node_modules, dist, vendor]
//! token_limit: 40
//! ```

use std::path::{Path, PathBuf};

use rigger_engine::{RankLimits, ScanOptions, DEFAULT_TOKEN_LIMIT};
use serde::{Deserialize, Serialize};

use crate::error::{CliError, Result};

/// Configuration files, in lookup order.
pub const CONFIG_FILES: &[&str] = &["rigger.yaml", ".rigger.yaml"];

/// Directories skipped during discovery unless the configuration says otherwise.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "node_modules",
    "dist",
    "build",
    "coverage",
    ".git",
    ".next",
    "out",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RiggerConfig {
    /// Forces the primary stylesheet, project-relative.
    pub stylesheet: Option<PathBuf>,
    /// Directory names pruned from the walk.
    pub exclude: Vec<String>,
    pub token_limit: usize,
    pub script_sample: usize,
    pub stylesheet_sample: usize,
    /// Where `apply` writes the configuration document.
    pub config_file: PathBuf,
    /// Where `snapshot` writes the snapshot document.
    pub snapshot_file: PathBuf,
}

impl Default for RiggerConfig {
    fn default() -> Self {
        let limits = RankLimits::default();
        Self {
            stylesheet: None,
            exclude: DEFAULT_EXCLUDES.iter().map(|name| name.to_string()).collect(),
            token_limit: DEFAULT_TOKEN_LIMIT,
            script_sample: limits.script_sample,
            stylesheet_sample: limits.stylesheet_sample,
            config_file: PathBuf::from("rig.config.json"),
            snapshot_file: PathBuf::from("rig.snapshot.json"),
        }
    }
}

impl RiggerConfig {
    /// Parses YAML. An empty document yields the defaults.
    pub fn from_yaml(text: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Loads the first configuration file found under `root`.
    ///
    /// Returns the defaults and `None` when there is none.
    pub fn load(root: &Path) -> Result<(Self, Option<PathBuf>)> {
        let Some(path) = CONFIG_FILES
            .iter()
            .map(|name| root.join(name))
            .find(|path| path.is_file())
        else {
            return Ok((Self::default(), None));
        };

        let text = std::fs::read_to_string(&path).map_err(|source| CliError::Read {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_yaml(&text).map_err(|source| CliError::Config {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok((config, Some(path)))
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            token_limit: self.token_limit,
            limits: RankLimits {
                script_sample: self.script_sample,
                stylesheet_sample: self.stylesheet_sample,
            },
        }
    }
}
