//! # Clone List
//!
//! The declarative list of repositories a skills root should contain.
//!
//! ```text
//! # full clone into <root>/tools
//! https://github.com/acme/tools.git
//!
//! # cached clone, with <root>/pdf -> <root>/.repos/skills/document-skills/pdf
//! https://github.com/acme/skills.git document-skills/pdf
//! ```
//!
//! One entry per line: a source URL and an optional subpath separated by
//! whitespace. Blank lines and `#` comments are ignored. Entries are kept in
//! file order.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};

/// A single line of the clone list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneEntry {
    pub url: String,
    /// Path inside the repository to expose through a symlink.
    pub subpath: Option<String>,
}

impl CloneEntry {
    /// Directory/cache name derived from the URL.
    pub fn name(&self) -> String {
        repo_name(&self.url)
    }

    /// Name of the symlink placed in the managed root, if any.
    pub fn link_name(&self) -> Option<String> {
        self.subpath.as_deref().and_then(|sub| {
            Path::new(sub.trim_end_matches('/'))
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
        })
    }
}

/// Derive a repository name: last path segment with `/` and `.git` trimmed.
///
/// Works for `https://host/org/repo.git`, `git@host:org/repo.git` and plain
/// local paths.
pub fn repo_name(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    let last = trimmed
        .rsplit(['/', ':'])
        .next()
        .unwrap_or(trimmed);
    last.strip_suffix(".git").unwrap_or(last).to_string()
}

/// Parse clone list text.
pub fn parse(content: &str) -> Vec<CloneEntry> {
    content
        .lines()
        .enumerate()
        .filter_map(|(index, line)| parse_line(index + 1, line))
        .collect()
}

fn parse_line(line_no: usize, line: &str) -> Option<CloneEntry> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let mut fields = line.split_whitespace();
    let url = fields.next()?.to_string();
    let subpath = fields.next().map(|s| s.to_string());
    let extra: Vec<&str> = fields.collect();
    if !extra.is_empty() {
        debug!("Clone list line {}: ignoring extra fields {:?}", line_no, extra);
    }

    Some(CloneEntry { url, subpath })
}

/// Read and parse a clone list file.
pub fn from_file(path: &Path) -> Result<Vec<CloneEntry>> {
    if !path.exists() {
        return Err(Error::CloneListNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path).map_err(|e| Error::CloneList {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(parse(&content))
}

/// Location of the bundled clone list, used when none is given explicitly.
pub fn default_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("DEVFLOW_CLONE_FILE") {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("devflow").join("skills.list"))
}

/// Load the explicit list, or the bundled one if it exists.
///
/// An explicit path that does not exist is an error; a missing bundled list
/// simply means there is nothing to clone.
pub fn load(explicit: Option<&Path>) -> Result<Vec<CloneEntry>> {
    match explicit {
        Some(path) => from_file(path),
        None => match default_path() {
            Some(path) if path.is_file() => {
                debug!("Using bundled clone list {}", path.display());
                from_file(&path)
            }
            _ => {
                debug!("No clone list found; refreshing existing repositories only");
                Ok(Vec::new())
            }
        },
    }
}
