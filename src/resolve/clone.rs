//! Materializing custom node repositories with git

use crate::error::{handle_error, Result, ScoutError};
use crate::models::deployment::CORE_REPOSITORY_URL;
use crate::models::manifest::RepoRequirement;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

/// Outcome of cloning a set of repositories
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloneSummary {
    pub cloned: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<String>,
}

/// Clones repositories into a custom nodes directory
#[derive(Debug, Clone)]
pub struct RepoCloner {
    root: PathBuf,
}

impl RepoCloner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Checkout directory of a repository: the last segment of its URL
    ///
    /// `None` when that segment would not name a directory inside the root.
    pub fn target_dir(&self, url: &str) -> Option<PathBuf> {
        let name = url.trim_end_matches('/').rsplit('/').next()?;
        if matches!(name, "" | "." | "..") || name.contains('\\') {
            return None;
        }
        Some(self.root.join(name))
    }

    /// Clone every repository whose checkout does not exist yet
    ///
    /// The host application repository is never cloned.
    /// Failures are logged per repository and never abort the run.
    pub fn materialize(&self, repos: &[RepoRequirement]) -> Result<CloneSummary> {
        fs::create_dir_all(&self.root)?;

        let mut summary = CloneSummary::default();
        for repo in repos.iter().filter(|repo| repo.url != CORE_REPOSITORY_URL) {
            let Some(target) = self.target_dir(&repo.url) else {
                warn!("Not cloning {}: no usable directory name in the URL", repo.url);
                summary.failed.push(repo.url.clone());
                continue;
            };
            if target.exists() {
                debug!("{} already present at {}", repo.url, target.display());
                summary.skipped.push(repo.url.clone());
                continue;
            }

            info!("Cloning repository {}...", repo.url);
            match clone_repo(&repo.url, &target) {
                Ok(()) => summary.cloned.push(repo.url.clone()),
                Err(err) => {
                    summary.failed.push(repo.url.clone());
                    if let Some(fatal) = handle_error(err) {
                        return Err(fatal);
                    }
                }
            }
        }

        Ok(summary)
    }
}

fn clone_repo(url: &str, target: &Path) -> Result<()> {
    let output = Command::new("git")
        .args(["clone", "--depth", "1", "--recurse-submodules"])
        .arg(url)
        .arg(target)
        .output()
        .map_err(|e| ScoutError::Clone {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    if output.status.success() {
        Ok(())
    } else {
        Err(ScoutError::Clone {
            url: url.to_string(),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}
