//! # Repository Refresh Sweep
//!
//! Brings a managed skills root in line with its clone list and then
//! updates every git repository found there.
//!
//! ## Layout
//!
//! ```text
//! <root>/
//!   tools/            full clone (entry without subpath)
//!   pdf -> .repos/skills/document-skills/pdf
//!   .repos/
//!     skills/         cached clone (entry with subpath)
//! ```
//!
//! ## Phases
//!
//! 1.  **Clone**: every entry whose clone directory is missing is cloned
//!     shallowly, either into the root or into the cache directory.
//! 2.  **Refresh cache**: every repository under `.repos/` is refreshed.
//! 3.  **Link**: symlinks from the root to cached subpaths are created. This
//!     runs after the cache refresh so a subpath that only exists upstream
//!     resolves on the same run.
//! 4.  **Refresh root**: every directory directly under the root is
//!     refreshed, skipping symlinks (they point into the cache, which was
//!     already refreshed) and hidden entries.
//!
//! Per-repository problems never abort the sweep. They are recorded in the
//! caller's [`Report`] and rendered by [`crate::summary`].

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use log::{debug, info, warn};

use crate::clone_list::CloneEntry;
use crate::error::Result;
use crate::git::{is_work_tree, PullResult};
use crate::repository::GitOperations;

/// Name of the hidden cache directory inside the managed root.
pub const CACHE_DIR_NAME: &str = ".repos";

/// Environment variable selecting the managed root.
pub const ROOT_ENV: &str = "CLAUDE_SKILLS_DIR";

/// Where things live under the managed root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
    cache: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let cache = root.join(CACHE_DIR_NAME);
        Self { root, cache }
    }

    /// `~/.claude/skills`, or `./.claude/skills` without a home directory.
    pub fn default_root() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".claude")
            .join("skills")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache
    }

    /// Clone directory for an entry: the root for plain entries, the cache
    /// for entries with a subpath.
    pub fn clone_path(&self, entry: &CloneEntry) -> PathBuf {
        if entry.subpath.is_some() {
            self.cache.join(entry.name())
        } else {
            self.root.join(entry.name())
        }
    }

    /// Symlink location and target for an entry with a subpath. `None` when
    /// the subpath would point outside the clone.
    pub fn link_paths(&self, entry: &CloneEntry) -> Option<(PathBuf, PathBuf)> {
        let subpath = entry.subpath.as_deref()?;
        let escapes = Path::new(subpath).components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes {
            return None;
        }
        let link_name = entry.link_name()?;
        Some((
            self.root.join(link_name),
            self.cache.join(entry.name()).join(subpath),
        ))
    }
}

/// What happened to one processed item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Cloned,
    Linked,
    Updated,
    UpToDate,
    Skipped(String),
    Failed(String),
    NotGit,
}

/// Run-scoped, ordered record of every outcome.
#[derive(Debug, Clone, Default)]
pub struct Report {
    items: Vec<(String, Outcome)>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: impl Into<String>, outcome: Outcome) {
        self.items.push((name.into(), outcome));
    }

    pub fn items(&self) -> &[(String, Outcome)] {
        &self.items
    }

    /// Outcomes recorded for `name`, in order.
    #[cfg(test)]
    pub fn outcomes_for<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Outcome> + 'a {
        self.items
            .iter()
            .filter(move |(n, _)| n == name)
            .map(|(_, o)| o)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The sweep over one managed root.
pub struct Sweep<'a, G: GitOperations> {
    git: &'a G,
    layout: &'a Layout,
    dry_run: bool,
}

impl<'a, G: GitOperations> Sweep<'a, G> {
    pub fn new(git: &'a G, layout: &'a Layout, dry_run: bool) -> Self {
        Self {
            git,
            layout,
            dry_run,
        }
    }

    /// Run every phase in order.
    pub fn run(&self, entries: &[CloneEntry], report: &mut Report) -> Result<()> {
        let unavailable = self.clone_missing(entries, report);
        self.refresh_tree(self.layout.cache_dir(), Some(CACHE_DIR_NAME), report)?;
        self.link_subpaths(entries, &unavailable, report)?;
        self.refresh_tree(self.layout.root(), None, report)?;
        Ok(())
    }

    /// Clone every entry that is not on disk yet. Entries sharing a clone
    /// directory (one repository linked at several subpaths) are cloned and
    /// reported once.
    ///
    /// Returns the names whose clone is not available after this phase
    /// (failed, or only planned in dry-run mode); their subpaths are not
    /// link-resolved.
    pub fn clone_missing(&self, entries: &[CloneEntry], report: &mut Report) -> HashSet<String> {
        let mut unavailable = HashSet::new();
        let mut seen = HashSet::new();

        for entry in entries {
            let name = entry.name();
            let dest = self.layout.clone_path(entry);

            if !seen.insert(dest.clone()) {
                continue;
            }
            if dest.exists() {
                debug!("{} already present at {}", name, dest.display());
                continue;
            }

            if self.dry_run {
                info!("[dry-run] would clone {} into {}", entry.url, dest.display());
                report.record(&name, Outcome::Skipped("dry run".to_string()));
                unavailable.insert(name);
                continue;
            }

            info!("Cloning {} into {}", entry.url, dest.display());
            match self.git.clone_shallow(&entry.url, &dest) {
                Ok(()) => report.record(&name, Outcome::Cloned),
                Err(e) => {
                    warn!("Clone of {} failed: {}", entry.url, e);
                    report.record(&name, Outcome::Failed(format!("clone failed: {}", e)));
                    unavailable.insert(name);
                }
            }
        }

        unavailable
    }

    /// Create root symlinks for entries with a subpath.
    pub fn link_subpaths(
        &self,
        entries: &[CloneEntry],
        unavailable: &HashSet<String>,
        report: &mut Report,
    ) -> Result<()> {
        for entry in entries.iter().filter(|e| e.subpath.is_some()) {
            let name = entry.name();
            if unavailable.contains(&name) {
                debug!("Not linking {}: clone unavailable", name);
                continue;
            }

            let subpath = entry.subpath.as_deref().unwrap_or_default();
            let Some((link, target)) = self.layout.link_paths(entry) else {
                report.record(
                    &name,
                    Outcome::Failed(format!("invalid subpath '{}'", subpath)),
                );
                continue;
            };
            let link_name = link_display(&link);

            if !target.exists() {
                warn!("Subpath {} not found in {}", subpath, name);
                report.record(
                    &link_name,
                    Outcome::Failed(format!("subpath '{}' not found in {}", subpath, name)),
                );
                continue;
            }

            match fs::symlink_metadata(&link) {
                Ok(meta) if meta.file_type().is_symlink() => {
                    debug!("{} already linked", link.display());
                }
                Ok(_) => {
                    warn!(
                        "{} exists and is not a symlink; leaving it alone",
                        link.display()
                    );
                    report.record(
                        &link_name,
                        Outcome::Skipped("exists and is not a symlink".to_string()),
                    );
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    if self.dry_run {
                        info!(
                            "[dry-run] would link {} -> {}",
                            link.display(),
                            target.display()
                        );
                        report.record(&link_name, Outcome::Skipped("dry run".to_string()));
                        continue;
                    }
                    fs::create_dir_all(self.layout.root())?;
                    match make_symlink(&target, &link) {
                        Ok(()) => {
                            info!("Linked {} -> {}", link.display(), target.display());
                            report.record(&link_name, Outcome::Linked);
                        }
                        Err(e) => {
                            warn!("Could not link {}: {}", link.display(), e);
                            report.record(&link_name, Outcome::Failed(format!("link failed: {}", e)));
                        }
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Refresh every visible, non-symlinked directory directly under `base`.
    pub fn refresh_tree(
        &self,
        base: &Path,
        prefix: Option<&str>,
        report: &mut Report,
    ) -> Result<()> {
        if !base.is_dir() {
            debug!("{} does not exist; nothing to refresh", base.display());
            return Ok(());
        }

        for dir in child_dirs(base)? {
            let dir_name = dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let name = match prefix {
                Some(prefix) => format!("{}/{}", prefix, dir_name),
                None => dir_name,
            };
            let outcome = self.refresh_repo(&dir, &name);
            report.record(name, outcome);
        }
        Ok(())
    }

    /// Refresh a single directory and return its outcome.
    pub fn refresh_repo(&self, dir: &Path, name: &str) -> Outcome {
        if !is_work_tree(dir) {
            debug!("{} is not a git repository", name);
            return Outcome::NotGit;
        }

        info!("Refreshing {}", name);
        if let Err(e) = self.git.fetch_all(dir) {
            warn!("{}: fetch failed: {}", name, e);
        }
        if let Err(e) = self.git.prune_origin(dir) {
            warn!("{}: remote prune failed: {}", name, e);
        }

        if self.dry_run {
            return Outcome::Skipped("dry run".to_string());
        }

        let outcome = match self.git.pull_rebase(dir) {
            Ok(PullResult::UpToDate) => Outcome::UpToDate,
            Ok(PullResult::Updated) => Outcome::Updated,
            Err(e) => {
                warn!("{}: pull failed, trying rebase onto origin: {}", name, e);
                self.fallback_rebase(dir, name)
            }
        };

        self.housekeeping(dir, name);
        outcome
    }

    /// Re-fetch and rebase directly onto `origin/<current-branch>`.
    fn fallback_rebase(&self, dir: &Path, name: &str) -> Outcome {
        if let Err(e) = self.git.fetch_all(dir) {
            warn!("{}: fetch before rebase failed: {}", name, e);
            return Outcome::Failed(format!("fetch failed: {}", e));
        }

        let branch = match self.git.current_branch(dir) {
            Ok(Some(branch)) => branch,
            Ok(None) => return Outcome::Failed("detached HEAD".to_string()),
            Err(e) => return Outcome::Failed(format!("cannot determine branch: {}", e)),
        };

        let upstream = format!("origin/{}", branch);
        match self.git.has_origin_branch(dir, &branch) {
            Ok(true) => {}
            Ok(false) => return Outcome::Failed(format!("no remote branch {}", upstream)),
            Err(e) => return Outcome::Failed(format!("cannot resolve {}: {}", upstream, e)),
        }

        match self.git.rebase_onto(dir, &upstream) {
            Ok(()) => {
                info!("{}: rebased onto {}", name, upstream);
                Outcome::Updated
            }
            Err(e) => {
                warn!("{}: rebase onto {} failed: {}", name, upstream, e);
                Outcome::Failed(format!("rebase onto {} failed", upstream))
            }
        }
    }

    fn housekeeping(&self, dir: &Path, name: &str) {
        if dir.join(".gitmodules").is_file() {
            if let Err(e) = self.git.submodule_update(dir) {
                warn!("{}: submodule update failed: {}", name, e);
            }
        }
        if let Err(e) = self.git.gc(dir) {
            debug!("{}: gc failed: {}", name, e);
        }
    }
}

/// Visible, non-symlink subdirectories of `base`, sorted by name.
fn child_dirs(base: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(base)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let file_type = entry.file_type()?;
        if file_type.is_symlink() || !file_type.is_dir() {
            continue;
        }
        dirs.push(entry.path());
    }
    dirs.sort();
    Ok(dirs)
}

fn link_display(link: &Path) -> String {
    link.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| link.display().to_string())
}

#[cfg(unix)]
fn make_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn make_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}
