//! Source tree enumeration
//!
//! Walks a node pack directory and lists the Python sources to analyse,
//! with pattern-based exclusion and optional hidden-entry skipping.

use crate::error::{Result, ScoutError};
use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

/// A directory of node pack sources
#[derive(Debug, Clone)]
pub struct SourceTree {
    root: PathBuf,
    exclude_patterns: Vec<Pattern>,
}

impl SourceTree {
    /// Tree rooted at `root` with no exclusions
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            exclude_patterns: Vec::new(),
        }
    }

    /// Tree rooted at `root`, skipping paths that match any of `patterns`
    pub fn with_excludes(root: impl Into<PathBuf>, patterns: &[String]) -> Result<Self> {
        Ok(Self {
            root: root.into(),
            exclude_patterns: compile_exclude_patterns(patterns)?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every `.py` file under the root, in sorted path order
    ///
    /// With `skip_hidden`, entries below the root whose name starts with a dot
    /// are pruned together with everything beneath them.
    pub fn python_files(&self, skip_hidden: bool) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(ScoutError::InvalidPath {
                path: self.root.clone(),
            });
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !(skip_hidden && is_hidden(entry)) && !self.is_excluded(entry.path()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| self.root.clone());
                    warn!("Skipping {}: {}", path.display(), err);
                    continue;
                }
            };

            if entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == "py") {
                files.push(entry.into_path());
            }
        }

        files.sort();
        Ok(files)
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.exclude_patterns.iter().any(|pattern| pattern.matches(&path_str))
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

/// Compile exclude patterns into glob patterns
pub fn compile_exclude_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|pattern| Pattern::new(pattern).map_err(|source| ScoutError::GlobPattern { source }))
        .collect()
}
