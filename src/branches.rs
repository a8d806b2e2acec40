//! Cleanup of local branches that are already merged into the base branch.

use std::path::Path;

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::git;
use crate::runner::Runner;

/// Branch names that are never deleted.
pub const PROTECTED: &[&str] = &["main", "master", "develop"];

/// Pick the base branch: explicit, else `origin/HEAD`, else `main`, else
/// `master`.
pub fn resolve_base(runner: &Runner, dir: &Path, explicit: Option<&str>) -> Result<String> {
    if let Some(base) = explicit {
        return Ok(base.to_string());
    }
    if let Some(base) = git::origin_head(runner, dir)? {
        debug!("Base branch from origin/HEAD: {}", base);
        return Ok(base);
    }
    for candidate in ["main", "master"] {
        if git::has_local_branch(runner, dir, candidate)? {
            return Ok(candidate.to_string());
        }
    }
    Err(Error::NoBaseBranch {
        dir: dir.display().to_string(),
    })
}

/// Ref to compare against: `origin/<base>` when it exists, else the local
/// branch.
pub fn merge_target(runner: &Runner, dir: &Path, base: &str) -> Result<String> {
    if git::has_remote_branch(runner, dir, "origin", base)? {
        Ok(format!("origin/{}", base))
    } else {
        Ok(base.to_string())
    }
}

/// Filter `git branch --merged` output down to deletable branches.
pub fn prune_candidates(merged: &[String], current: Option<&str>, base: &str) -> Vec<String> {
    merged
        .iter()
        .map(|b| b.trim().trim_start_matches("* ").to_string())
        .filter(|b| !b.is_empty())
        .filter(|b| b != base)
        .filter(|b| Some(b.as_str()) != current)
        .filter(|b| !PROTECTED.contains(&b.as_str()))
        // `git branch --format` prints "(HEAD detached at ...)" on a detached HEAD.
        .filter(|b| !b.starts_with('('))
        .collect()
}

/// Result of deleting a batch of branches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    pub deleted: Vec<String>,
    pub failed: Vec<(String, String)>,
}

/// Delete each branch with `git branch -d`, continuing past failures.
pub fn delete_branches(runner: &Runner, dir: &Path, branches: &[String]) -> PruneReport {
    let mut report = PruneReport::default();
    for branch in branches {
        match git::delete_branch(runner, dir, branch) {
            Ok(()) => report.deleted.push(branch.clone()),
            Err(e) => {
                warn!("Could not delete {}: {}", branch, e);
                report.failed.push((branch.clone(), e.to_string()));
            }
        }
    }
    report
}
