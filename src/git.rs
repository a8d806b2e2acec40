//! Thin wrappers over the system `git` binary.
//!
//! Using the system git means SSH keys, credential helpers and anything in
//! `~/.gitconfig` work exactly as they do in the user's shell. Mutating
//! commands go through [`Runner::run`]/[`Runner::capture`] and are therefore
//! skipped in dry-run mode; lookups use [`Runner::query`].

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::runner::{CommandLine, Completed, Runner};

/// What a successful `git pull --rebase` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullResult {
    UpToDate,
    Updated,
}

impl PullResult {
    /// Classify pull output. git prints "Already up to date." for merges and
    /// "Current branch X is up to date." for rebases.
    pub fn from_output(output: &str) -> Self {
        let lower = output.to_lowercase();
        if lower.contains("already up to date")
            || lower.contains("already up-to-date")
            || lower.contains("is up to date")
        {
            PullResult::UpToDate
        } else {
            PullResult::Updated
        }
    }
}

fn git(dir: &Path) -> CommandLine {
    CommandLine::new("git").current_dir(dir)
}

fn check(cmd: &CommandLine, dir: &Path, completed: Completed) -> Result<Completed> {
    if completed.success {
        Ok(completed)
    } else {
        Err(Error::GitCommand {
            command: cmd.to_string(),
            dir: dir.display().to_string(),
            stderr: completed.message(),
        })
    }
}

/// True when `dir` has git metadata (a `.git` directory, or a `.git` file
/// for worktrees and submodules).
pub fn is_work_tree(dir: &Path) -> bool {
    dir.join(".git").exists()
}

/// Shallow clone with shallow submodules into `dest`.
pub fn clone_shallow(runner: &Runner, url: &str, dest: &Path) -> Result<()> {
    let parent = dest.parent().unwrap_or(Path::new("."));
    if !runner.is_dry_run() {
        std::fs::create_dir_all(parent)?;
    }
    let cmd = CommandLine::new("git")
        .args([
            "clone",
            "--depth",
            "1",
            "--recurse-submodules",
            "--shallow-submodules",
            url,
        ])
        .arg(dest.as_os_str());
    let completed = runner.run(&cmd)?;
    check(&cmd, parent, completed).map(|_| ())
}

/// `git fetch --all --prune --tags`
pub fn fetch_all(runner: &Runner, dir: &Path) -> Result<()> {
    let cmd = git(dir).args(["fetch", "--all", "--prune", "--tags", "--quiet"]);
    let completed = runner.capture(&cmd)?;
    check(&cmd, dir, completed).map(|_| ())
}

/// `git remote prune origin`
pub fn prune_origin(runner: &Runner, dir: &Path) -> Result<()> {
    let cmd = git(dir).args(["remote", "prune", "origin"]);
    let completed = runner.capture(&cmd)?;
    check(&cmd, dir, completed).map(|_| ())
}

/// The pull command. Output is forced to the C locale so the up-to-date
/// message can be recognised.
fn pull_command(dir: &Path) -> CommandLine {
    git(dir)
        .args(["pull", "--rebase", "--autostash"])
        .env("LC_ALL", "C")
}

/// `git pull --rebase --autostash`, classifying the result. A pull that
/// stops part way through its rebase is aborted, which also restores the
/// autostash.
pub fn pull_rebase(runner: &Runner, dir: &Path) -> Result<PullResult> {
    let cmd = pull_command(dir);
    let completed = runner.capture(&cmd)?;
    if !completed.success {
        abort_rebase(runner, dir);
    }
    let completed = check(&cmd, dir, completed)?;
    // Depending on the git version the summary lands on either stream.
    let combined = format!("{}\n{}", completed.stdout, completed.stderr);
    Ok(PullResult::from_output(&combined))
}

/// Name of the checked-out branch, or `None` on a detached HEAD.
pub fn current_branch(runner: &Runner, dir: &Path) -> Result<Option<String>> {
    let cmd = git(dir).args(["symbolic-ref", "--quiet", "--short", "HEAD"]);
    let completed = runner.query(&cmd)?;
    if !completed.success {
        // Exit status 1 with no output is how symbolic-ref reports detached HEAD.
        if completed.code == Some(1) && completed.stderr.trim().is_empty() {
            return Ok(None);
        }
        return check(&cmd, dir, completed).map(|_| None);
    }
    let branch = completed.stdout.trim();
    Ok((!branch.is_empty()).then(|| branch.to_string()))
}

/// Whether `refs/remotes/<remote>/<branch>` exists locally.
pub fn has_remote_branch(runner: &Runner, dir: &Path, remote: &str, branch: &str) -> Result<bool> {
    let cmd = git(dir).args([
        "rev-parse".to_string(),
        "--verify".to_string(),
        "--quiet".to_string(),
        format!("refs/remotes/{}/{}", remote, branch),
    ]);
    Ok(runner.query(&cmd)?.success)
}

/// `git rebase --autostash <upstream>`. A failed rebase is aborted.
pub fn rebase_autostash(runner: &Runner, dir: &Path, upstream: &str) -> Result<()> {
    let cmd = git(dir).args(["rebase", "--autostash", upstream]);
    let completed = runner.capture(&cmd)?;
    if completed.success {
        return Ok(());
    }
    abort_rebase(runner, dir);
    check(&cmd, dir, completed).map(|_| ())
}

/// Best-effort `git rebase --abort`.
fn abort_rebase(runner: &Runner, dir: &Path) {
    let abort = git(dir).args(["rebase", "--abort"]);
    match runner.capture(&abort) {
        Ok(done) if !done.success => {
            log::debug!("rebase --abort in {}: {}", dir.display(), done.message());
        }
        Ok(_) => log::debug!("aborted rebase in {}", dir.display()),
        Err(err) => log::debug!("rebase --abort in {}: {}", dir.display(), err),
    }
}

/// Non-interactive `git submodule update --init --recursive`.
pub fn submodule_update(runner: &Runner, dir: &Path) -> Result<()> {
    let cmd = git(dir)
        .args(["submodule", "update", "--init", "--recursive"])
        .env("GIT_TERMINAL_PROMPT", "0");
    let completed = runner.capture(&cmd)?;
    check(&cmd, dir, completed).map(|_| ())
}

/// `git gc --auto --quiet`
pub fn gc(runner: &Runner, dir: &Path) -> Result<()> {
    let cmd = git(dir).args(["gc", "--auto", "--quiet"]);
    let completed = runner.capture(&cmd)?;
    check(&cmd, dir, completed).map(|_| ())
}

/// Top-level directory of the work tree containing `dir`.
pub fn toplevel(runner: &Runner, dir: &Path) -> Result<PathBuf> {
    let cmd = git(dir).args(["rev-parse", "--show-toplevel"]);
    let completed = check(&cmd, dir, runner.query(&cmd)?)?;
    Ok(PathBuf::from(completed.stdout.trim()))
}

/// Default branch of `origin` as recorded by `origin/HEAD`.
pub fn origin_head(runner: &Runner, dir: &Path) -> Result<Option<String>> {
    let cmd = git(dir).args(["symbolic-ref", "--quiet", "--short", "refs/remotes/origin/HEAD"]);
    let completed = runner.query(&cmd)?;
    if !completed.success {
        return Ok(None);
    }
    Ok(completed
        .stdout
        .trim()
        .strip_prefix("origin/")
        .map(|s| s.to_string()))
}

/// Whether a local branch exists.
pub fn has_local_branch(runner: &Runner, dir: &Path, branch: &str) -> Result<bool> {
    let cmd = git(dir).args([
        "rev-parse".to_string(),
        "--verify".to_string(),
        "--quiet".to_string(),
        format!("refs/heads/{}", branch),
    ]);
    Ok(runner.query(&cmd)?.success)
}

/// Local branches fully merged into `base`.
pub fn merged_branches(runner: &Runner, dir: &Path, base: &str) -> Result<Vec<String>> {
    let cmd = git(dir).args(["branch", "--merged", base, "--format=%(refname:short)"]);
    let completed = check(&cmd, dir, runner.query(&cmd)?)?;
    Ok(completed
        .stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| l.to_string())
        .collect())
}

/// `git branch -d <branch>`
pub fn delete_branch(runner: &Runner, dir: &Path, branch: &str) -> Result<()> {
    let cmd = git(dir).args(["branch", "-d", branch]);
    let completed = runner.capture(&cmd)?;
    check(&cmd, dir, completed).map(|_| ())
}

/// `git fetch --prune` against the default remote.
pub fn fetch_prune(runner: &Runner, dir: &Path) -> Result<()> {
    let cmd = git(dir).args(["fetch", "--prune", "--quiet"]);
    let completed = runner.capture(&cmd)?;
    check(&cmd, dir, completed).map(|_| ())
}
