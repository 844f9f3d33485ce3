//! Command handlers.
//!
//! Each handler returns the text to print; nothing here writes to stdout.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _};
use chrono::Utc;
use rigger_engine::{
    build_snapshot, detect_project_type, extract_tokens, overrides_from_json, rank_candidates,
    scan_project, scan_stylesheet, scan_with_stylesheet, to_pretty_json, EditPlan, Overrides,
    ProjectSource, ScanResult,
};
use serde::Serialize;

use crate::cli::{Cli, Command};
use crate::config::RiggerConfig;
use crate::diff::{change_counts, unified_diff};
use crate::error::CliError;
use crate::fs_project::FsProject;
use crate::output::{emit, OutputMode};
use crate::render::{render_candidates, render_params, render_plan, render_scan, render_written};

/// What `plan` reports.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanReport {
    pub file: PathBuf,
    pub params: usize,
    pub inserted: usize,
    pub deleted: usize,
    pub diff: String,
}

/// What `apply` and `snapshot` report.
#[derive(Debug, Clone, Serialize)]
pub struct WriteReport {
    pub files: Vec<PathBuf>,
    pub params: usize,
}

/// A loaded project plus its configuration.
pub struct Context {
    pub project: FsProject,
    pub config: RiggerConfig,
    pub output: OutputMode,
}

impl Context {
    pub fn open(root: &Path, output: OutputMode) -> anyhow::Result<Self> {
        if !root.is_dir() {
            bail!("project root {} is not a directory", root.display());
        }
        let (config, source) = RiggerConfig::load(root)?;
        if let Some(source) = source {
            tracing::info!(config = %source.display(), "using configuration file");
        }
        let project = FsProject::open(root, &config.exclude);
        Ok(Self {
            project,
            config,
            output,
        })
    }

    /// Scans with `--css`, else the configured stylesheet, else the
    /// top-ranked candidate.
    pub fn scan(&self, css: Option<&Path>) -> ScanResult {
        let selected = css
            .map(|path| self.project.relativize(path))
            .or_else(|| self.config.stylesheet.clone());
        let options = self.config.scan_options();
        match selected {
            Some(file) => scan_with_stylesheet(&self.project, &file, options),
            None => scan_project(&self.project, options),
        }
    }

    fn read(&self, path: &Path) -> Result<String, CliError> {
        self.project
            .read_to_string(path)
            .map_err(|source| CliError::Read {
                path: self.project.resolve(path),
                source,
            })
    }

    fn write(&self, path: &Path, content: &str) -> Result<PathBuf, CliError> {
        let written = self
            .project
            .write(path, content)
            .map_err(|source| CliError::Write {
                path: self.project.resolve(path),
                source,
            })?;
        tracing::info!(file = %written.display(), "wrote file");
        Ok(written)
    }

    fn plan(&self, css: Option<&Path>, overrides: &Overrides) -> anyhow::Result<(EditPlan, String)> {
        let result = self.scan(css);
        let file = result.css_file.clone().ok_or(CliError::NoStylesheet)?;
        let current = self.read(&file)?;
        let plan = EditPlan::build(&result, &current, overrides, Utc::now())
            .ok_or(CliError::NoStylesheet)?;
        Ok((plan, current))
    }
}

/// Reads an overrides file (a snapshot or a bare id map).
pub fn load_overrides(path: Option<&Path>) -> anyhow::Result<Overrides> {
    let Some(path) = path else {
        return Ok(Overrides::new());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read overrides from {}", path.display()))?;
    let overrides = overrides_from_json(&text)
        .with_context(|| format!("invalid overrides in {}", path.display()))?;
    tracing::debug!(count = overrides.len(), "loaded overrides");
    Ok(overrides)
}

/// Runs the parsed command and returns its output.
pub fn execute(cli: &Cli) -> anyhow::Result<String> {
    let ctx = Context::open(&cli.root, cli.output)?;
    let mode = ctx.output;

    let text = match &cli.command {
        Command::Scan { css } => emit(&ctx.scan(css.as_deref()), mode, render_scan)?,
        Command::Candidates => {
            let mut diagnostics = Vec::new();
            let project_type = detect_project_type(&ctx.project, &mut diagnostics);
            let candidates = rank_candidates(
                &ctx.project,
                project_type,
                ctx.config.scan_options().limits,
            );
            emit(&candidates, mode, |c, styles| render_candidates(c, styles))?
        }
        Command::Css { file } => {
            let file = ctx.project.relativize(file);
            let params = scan_stylesheet(&ctx.read(&file)?, &file);
            emit(&params, mode, |p, styles| render_params(p, styles))?
        }
        Command::Tokens { file, limit } => {
            let file = ctx.project.relativize(file);
            let limit = limit.unwrap_or(ctx.config.token_limit);
            let params = extract_tokens(&ctx.read(&file)?, &file, limit);
            emit(&params, mode, |p, styles| render_params(p, styles))?
        }
        Command::Plan { css, overrides } => {
            let overrides = load_overrides(overrides.as_deref())?;
            let (plan, current) = ctx.plan(css.as_deref(), &overrides)?;
            let (inserted, deleted) = change_counts(&current, &plan.rewritten);
            let report = PlanReport {
                diff: unified_diff(&current, &plan.rewritten, &plan.file.display().to_string()),
                file: plan.file,
                params: plan.config.params.len(),
                inserted,
                deleted,
            };
            emit(&report, mode, render_plan)?
        }
        Command::Apply { css, overrides } => {
            let overrides = load_overrides(overrides.as_deref())?;
            let (plan, _) = ctx.plan(css.as_deref(), &overrides)?;
            let stylesheet = ctx.write(&plan.file, &plan.rewritten)?;
            let config = ctx.write(
                &ctx.config.config_file,
                &format!("{}\n", to_pretty_json(&plan.config)?),
            )?;
            let report = WriteReport {
                files: vec![stylesheet, config],
                params: plan.config.params.len(),
            };
            emit(&report, mode, render_written)?
        }
        Command::Snapshot { css, overrides } => {
            let overrides = load_overrides(overrides.as_deref())?;
            let result = ctx.scan(css.as_deref());
            let snapshot = build_snapshot(&result, &overrides, Utc::now());
            let written = ctx.write(
                &ctx.config.snapshot_file,
                &format!("{}\n", to_pretty_json(&snapshot)?),
            )?;
            let report = WriteReport {
                files: vec![written],
                params: snapshot.params.len(),
            };
            emit(&report, mode, render_written)?
        }
    };
    Ok(text)
}
