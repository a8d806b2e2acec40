//! # Repository Operations
//!
//! The refresh sweep never calls `git` directly. It talks to a
//! [`GitOperations`] implementation, which keeps the sweep logic testable:
//! the binaries use [`SystemGit`], which wraps the functions in
//! [`crate::git`] around a [`Runner`], while tests substitute a recording
//! fake that simulates clones, conflicts and network failures without
//! touching a real repository.

use std::path::Path;

use crate::error::Result;
use crate::git::{self, PullResult};
use crate::runner::Runner;

/// The narrow set of git actions the sweep needs.
pub trait GitOperations {
    /// Shallow clone (depth one, shallow submodules) of `url` into `dest`.
    fn clone_shallow(&self, url: &str, dest: &Path) -> Result<()>;

    /// Fetch every remote, pruning stale refs and syncing tags.
    fn fetch_all(&self, dir: &Path) -> Result<()>;

    /// Drop remote-tracking branches that no longer exist on `origin`.
    fn prune_origin(&self, dir: &Path) -> Result<()>;

    /// Pull with rebase and automatic stashing of local changes.
    fn pull_rebase(&self, dir: &Path) -> Result<PullResult>;

    /// Checked-out branch, `None` when HEAD is detached.
    fn current_branch(&self, dir: &Path) -> Result<Option<String>>;

    /// Whether `origin/<branch>` exists as a remote-tracking ref.
    fn has_origin_branch(&self, dir: &Path, branch: &str) -> Result<bool>;

    /// Rebase the current branch onto `upstream` with automatic stashing.
    fn rebase_onto(&self, dir: &Path, upstream: &str) -> Result<()>;

    /// Initialize and update submodules recursively, never prompting.
    fn submodule_update(&self, dir: &Path) -> Result<()>;

    /// Opportunistic garbage collection.
    fn gc(&self, dir: &Path) -> Result<()>;
}

/// [`GitOperations`] backed by the system `git` binary.
#[derive(Debug, Clone, Copy)]
pub struct SystemGit {
    runner: Runner,
}

impl SystemGit {
    pub fn new(runner: Runner) -> Self {
        Self { runner }
    }
}

impl GitOperations for SystemGit {
    fn clone_shallow(&self, url: &str, dest: &Path) -> Result<()> {
        git::clone_shallow(&self.runner, url, dest)
    }

    fn fetch_all(&self, dir: &Path) -> Result<()> {
        git::fetch_all(&self.runner, dir)
    }

    fn prune_origin(&self, dir: &Path) -> Result<()> {
        git::prune_origin(&self.runner, dir)
    }

    fn pull_rebase(&self, dir: &Path) -> Result<PullResult> {
        git::pull_rebase(&self.runner, dir)
    }

    fn current_branch(&self, dir: &Path) -> Result<Option<String>> {
        git::current_branch(&self.runner, dir)
    }

    fn has_origin_branch(&self, dir: &Path, branch: &str) -> Result<bool> {
        git::has_remote_branch(&self.runner, dir, "origin", branch)
    }

    fn rebase_onto(&self, dir: &Path, upstream: &str) -> Result<()> {
        git::rebase_autostash(&self.runner, dir, upstream)
    }

    fn submodule_update(&self, dir: &Path) -> Result<()> {
        git::submodule_update(&self.runner, dir)
    }

    fn gc(&self, dir: &Path) -> Result<()> {
        git::gc(&self.runner, dir)
    }
}
