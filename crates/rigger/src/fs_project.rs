//! [`ProjectSource`] over a directory on disk.

use std::io;
use std::path::{Path, PathBuf};

use rigger_engine::project::SCRIPT_EXTENSIONS;
use rigger_engine::ProjectSource;
use walkdir::{DirEntry, WalkDir};

/// A project directory, walked once at open time.
///
/// Listings are project-relative and sorted. Directories whose name is in
/// the exclude list are pruned, as are symlinks.
#[derive(Debug, Clone)]
pub struct FsProject {
    root: PathBuf,
    stylesheets: Vec<PathBuf>,
    scripts: Vec<PathBuf>,
}

fn is_excluded(entry: &DirEntry, exclude: &[String]) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| exclude.iter().any(|excluded| excluded == name))
}

fn extension_in(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.contains(&ext))
}

impl FsProject {
    pub fn open(root: impl Into<PathBuf>, exclude: &[String]) -> Self {
        let root = root.into();
        let mut stylesheets = Vec::new();
        let mut scripts = Vec::new();

        let walker = WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_excluded(entry, exclude));
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!(error = %err, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&root) else {
                continue;
            };
            if extension_in(relative, &["css"]) {
                stylesheets.push(relative.to_path_buf());
            } else if extension_in(relative, SCRIPT_EXTENSIONS) {
                scripts.push(relative.to_path_buf());
            }
        }
        stylesheets.sort();
        scripts.sort();

        tracing::debug!(
            root = %root.display(),
            stylesheets = stylesheets.len(),
            scripts = scripts.len(),
            "project walked"
        );
        Self {
            root,
            stylesheets,
            scripts,
        }
    }

    /// Absolute location of a project-relative path.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    /// Maps a user-supplied path onto the project: relative paths are taken
    /// as project-relative, absolute paths inside the root are stripped.
    pub fn relativize(&self, path: &Path) -> PathBuf {
        if path.is_relative() {
            return path.to_path_buf();
        }
        path.strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf())
    }

    /// Writes a project-relative file, creating parent directories.
    pub fn write(&self, path: &Path, content: &str) -> io::Result<PathBuf> {
        let target = self.resolve(path);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&target, content)?;
        Ok(target)
    }
}

impl ProjectSource for FsProject {
    fn root(&self) -> &Path {
        &self.root
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).is_file()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(self.resolve(path))
    }

    fn stylesheets(&self) -> Vec<PathBuf> {
        self.stylesheets.clone()
    }

    fn scripts(&self) -> Vec<PathBuf> {
        self.scripts.clone()
    }
}
