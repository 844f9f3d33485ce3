//! Scan orchestration: project type, primary stylesheet, extraction.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::css::scan_stylesheet;
use crate::param::{sort_params, Parameter};
use crate::project::{detect_project_type, load_token_params, ProjectSource, ProjectType};
use crate::rank::{primary, rank_candidates, Candidate, RankLimits};
use crate::tokens::DEFAULT_TOKEN_LIMIT;

/// Outcome of one scan. Superseded, never mutated, by the next scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub project_type: ProjectType,
    pub root: PathBuf,
    /// Primary stylesheet, project-relative.
    pub css_file: Option<PathBuf>,
    pub css_candidates: Vec<Candidate>,
    /// Sorted by group, label, selector, id.
    pub params: Vec<Parameter>,
    /// Human-readable log of the decisions taken, in order.
    pub diagnostics: Vec<String>,
}

impl ScanResult {
    pub fn param(&self, id: &str) -> Option<&Parameter> {
        self.params.iter().find(|param| param.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Cap on token-config parameters.
    pub token_limit: usize,
    pub limits: RankLimits,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            token_limit: DEFAULT_TOKEN_LIMIT,
            limits: RankLimits::default(),
        }
    }
}

/// Sorts `params` and assembles the result.
pub fn build_scan_result(
    project_type: ProjectType,
    root: PathBuf,
    css_file: Option<PathBuf>,
    css_candidates: Vec<Candidate>,
    mut params: Vec<Parameter>,
    diagnostics: Vec<String>,
) -> ScanResult {
    sort_params(&mut params);
    ScanResult {
        project_type,
        root,
        css_file,
        css_candidates,
        params,
        diagnostics,
    }
}

fn stylesheet_params(
    project: &dyn ProjectSource,
    file: &Path,
    diagnostics: &mut Vec<String>,
) -> Vec<Parameter> {
    match project.read_to_string(file) {
        Ok(content) => scan_stylesheet(&content, file),
        Err(err) => {
            tracing::warn!(file = %file.display(), error = %err, "cannot read stylesheet");
            diagnostics.push(format!("Failed to read {}: {}", file.display(), err));
            Vec::new()
        }
    }
}

/// Runs the full pipeline: detect, rank, extract from the winner and from
/// the theme configuration.
pub fn scan_project(project: &dyn ProjectSource, options: ScanOptions) -> ScanResult {
    let mut diagnostics = Vec::new();
    let project_type = detect_project_type(project, &mut diagnostics);

    let candidates = rank_candidates(project, project_type, options.limits);
    diagnostics.push(format!("CSS candidates: {}", candidates.len()));
    let css_file = primary(&candidates).map(|c| c.file.clone());
    match &css_file {
        Some(file) => diagnostics.push(format!("Using CSS file: {}", file.display())),
        None => diagnostics.push("No CSS files found".to_string()),
    }

    let mut params = match &css_file {
        Some(file) => stylesheet_params(project, file, &mut diagnostics),
        None => Vec::new(),
    };
    params.extend(load_token_params(project, options.token_limit, &mut diagnostics));

    tracing::info!(
        project_type = %project_type,
        candidates = candidates.len(),
        params = params.len(),
        "scan finished"
    );
    build_scan_result(
        project_type,
        project.root().to_path_buf(),
        css_file,
        candidates,
        params,
        diagnostics,
    )
}

/// Like [`scan_project`], but with a caller-chosen primary stylesheet.
///
/// Candidates are still ranked for display. A selection that does not exist
/// yields no stylesheet parameters and no `css_file`.
pub fn scan_with_stylesheet(
    project: &dyn ProjectSource,
    selected: &Path,
    options: ScanOptions,
) -> ScanResult {
    let mut diagnostics = vec![format!("Using selected CSS file: {}", selected.display())];
    let project_type = detect_project_type(project, &mut diagnostics);
    let candidates = rank_candidates(project, project_type, options.limits);

    let (css_file, mut params) = if project.exists(selected) {
        let params = stylesheet_params(project, selected, &mut diagnostics);
        (Some(selected.to_path_buf()), params)
    } else {
        diagnostics.push(format!("Selected CSS file not found: {}", selected.display()));
        (None, Vec::new())
    };
    params.extend(load_token_params(project, options.token_limit, &mut diagnostics));

    build_scan_result(
        project_type,
        project.root().to_path_buf(),
        css_file,
        candidates,
        params,
        diagnostics,
    )
}
