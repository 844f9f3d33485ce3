//! Primary stylesheet selection.
//!
//! Every signal that points at a stylesheet adds a weighted score to a
//! [`Candidate`]. Candidates are keyed by path, so several signals for the
//! same file sum up and their reasons are joined with `; `. The highest
//! score wins; ties keep discovery order.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::discover::{css_imports, html_links, module_imports, resolve_css_path, script_imports};
use crate::project::{ProjectSource, ProjectType};

/// Files that may reference the primary stylesheet, in probe order.
pub const ENTRY_FILES: &[&str] = &[
    "index.html",
    "src/main.tsx",
    "src/main.jsx",
    "src/main.ts",
    "src/main.js",
    "src/index.tsx",
    "src/index.jsx",
    "src/index.ts",
    "src/index.js",
    "src/App.tsx",
    "src/App.jsx",
    "app/layout.tsx",
    "app/page.tsx",
    "pages/_app.tsx",
    "pages/index.tsx",
];

/// Conventional global stylesheet locations.
pub const PREFERRED_STYLESHEETS: &[&str] = &[
    "src/index.css",
    "src/styles.css",
    "src/App.css",
    "src/global.css",
    "styles/globals.css",
    "styles.css",
    "style.css",
];

/// Score contributions per signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// `import '...css'` in an entry file.
    EntryImport,
    /// `<link href="...css">` in an entry HTML file.
    HtmlLink,
    /// One of [`PREFERRED_STYLESHEETS`].
    Preferred,
    /// `import x from '...module.css'` in a sampled script.
    ModuleImport,
    /// A `*.module.css` file on disk.
    ModuleFile,
    /// `@import` inside another stylesheet.
    CssImport,
    /// Any stylesheet on disk.
    Discovered,
    /// Project-type default location.
    ProjectDefault,
}

impl Signal {
    pub fn weight(&self) -> u32 {
        match self {
            Signal::EntryImport => 10,
            Signal::HtmlLink => 8,
            Signal::Preferred | Signal::ModuleImport => 6,
            Signal::CssImport => 5,
            Signal::ProjectDefault => 4,
            Signal::ModuleFile => 3,
            Signal::Discovered => 1,
        }
    }
}

/// A scored stylesheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// Project-relative path.
    pub file: PathBuf,
    pub score: u32,
    /// Contributing signals joined with `; `.
    pub reason: String,
}

/// Sampling bounds for the ranker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankLimits {
    /// Scripts scanned for module imports.
    pub script_sample: usize,
    /// Stylesheets scanned for `@import`.
    pub stylesheet_sample: usize,
}

impl Default for RankLimits {
    fn default() -> Self {
        Self {
            script_sample: 200,
            stylesheet_sample: 120,
        }
    }
}

fn is_module(path: &Path) -> bool {
    path.to_string_lossy().ends_with(".module.css")
}

/// Score-aggregating candidate map that remembers first-discovery order.
#[derive(Debug, Default)]
pub struct CandidateSet {
    candidates: Vec<Candidate>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a signal for `file`.
    ///
    /// Targets that do not end in `.css`, end in `.min.css`, or do not
    /// exist in `project` are ignored. Module stylesheets get half the
    /// weight (at least 1) and a `(module)` tag.
    pub fn add(
        &mut self,
        project: &dyn ProjectSource,
        file: &Path,
        signal: Signal,
        reason: impl Into<String>,
    ) {
        let name = file.to_string_lossy();
        if !name.ends_with(".css") || name.ends_with(".min.css") || !project.exists(file) {
            return;
        }
        let mut reason = reason.into();
        let mut score = signal.weight();
        if is_module(file) {
            score = ((score + 1) / 2).max(1);
            if !reason.contains("module") {
                reason.push_str(" (module)");
            }
        }
        tracing::debug!(file = %file.display(), score, reason = %reason, "stylesheet signal");

        match self.candidates.iter_mut().find(|c| c.file == file) {
            Some(existing) => {
                existing.score += score;
                existing.reason.push_str("; ");
                existing.reason.push_str(&reason);
            }
            None => self.candidates.push(Candidate {
                file: file.to_path_buf(),
                score,
                reason,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Candidates by descending score, ties in discovery order.
    pub fn into_ranked(self) -> Vec<Candidate> {
        let mut ranked = self.candidates;
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked
    }
}

/// Collects every signal from `project` and ranks the stylesheets.
pub fn rank_candidates(
    project: &dyn ProjectSource,
    project_type: ProjectType,
    limits: RankLimits,
) -> Vec<Candidate> {
    let mut set = CandidateSet::new();

    for css in PREFERRED_STYLESHEETS {
        set.add(project, Path::new(css), Signal::Preferred, "preferred");
    }

    for entry in ENTRY_FILES {
        let path = Path::new(entry);
        if !project.exists(path) {
            continue;
        }
        let Some(content) = read(project, path) else {
            continue;
        };
        let dir = parent_dir(path);
        for target in script_imports(&content) {
            if let Some(target) = resolve_css_path(dir, &target) {
                set.add(project, &target, Signal::EntryImport, format!("import in {}", entry));
            }
        }
        if entry.ends_with(".html") {
            for link in html_links(&content) {
                if let Some(target) = resolve_css_path(dir, &link) {
                    set.add(project, &target, Signal::HtmlLink, format!("link in {}", entry));
                }
            }
        }
    }

    for script in project.scripts().iter().take(limits.script_sample) {
        let Some(content) = read(project, script) else {
            continue;
        };
        let dir = parent_dir(script);
        for target in module_imports(&content) {
            if let Some(target) = resolve_css_path(dir, &target) {
                set.add(
                    project,
                    &target,
                    Signal::ModuleImport,
                    format!("module import in {}", script.display()),
                );
            }
        }
    }

    let stylesheets = project.stylesheets();
    for css in stylesheets.iter().filter(|path| is_module(path)) {
        set.add(project, css, Signal::ModuleFile, "module css");
    }

    for css in stylesheets.iter().take(limits.stylesheet_sample) {
        let Some(content) = read(project, css) else {
            continue;
        };
        let dir = parent_dir(css);
        for import in css_imports(&content) {
            if let Some(target) = resolve_css_path(dir, &import) {
                set.add(
                    project,
                    &target,
                    Signal::CssImport,
                    format!("@import in {}", css.display()),
                );
            }
        }
    }

    for css in &stylesheets {
        set.add(project, css, Signal::Discovered, "discovered");
    }

    let defaults: &[&str] = match project_type {
        ProjectType::React => &["src/index.css", "src/App.css"],
        ProjectType::Vanilla => &["styles.css", "style.css"],
        ProjectType::Unknown => &[],
    };
    let default_reason = format!("{} default", project_type);
    for css in defaults {
        set.add(project, Path::new(css), Signal::ProjectDefault, default_reason.as_str());
    }

    set.into_ranked()
}

/// The winning candidate, if any.
pub fn primary(candidates: &[Candidate]) -> Option<&Candidate> {
    candidates.first()
}

fn parent_dir(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new(""))
}

fn read(project: &dyn ProjectSource, path: &Path) -> Option<String> {
    match project.read_to_string(path) {
        Ok(content) => Some(content),
        Err(err) => {
            tracing::warn!(file = %path.display(), error = %err, "skipping unreadable file");
            None
        }
    }
}
