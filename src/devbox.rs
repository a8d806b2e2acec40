//! # Devbox Package Listing
//!
//! Turns the human-oriented output of `devbox list` (or `devbox global
//! list`) into JSON. Two shapes are produced:
//!
//! - the default mirrors the `packages` array of a `devbox.json`, so the
//!   output can be pasted into another project:
//!   `{"packages": ["nodejs@20", "go@latest"]}`
//! - `detailed` lists one object per package with the resolved version
//!   when devbox reports one.
//!
//! Listing is read-only, so it runs through [`Runner::query`] and happens
//! even in dry-run mode.

use std::path::Path;

use serde::Serialize;
use serde_json::json;

use crate::error::{Error, Result};
use crate::runner::{CommandLine, Runner};

/// Version used by devbox when a package is added without one.
pub const DEFAULT_VERSION: &str = "latest";

/// One installed package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Package {
    pub name: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<String>,
}

impl Package {
    /// `name@version`, the form used in `devbox.json`.
    pub fn spec(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }
}

/// JSON layout to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Packages,
    Detailed,
}

/// Parse `devbox list` output.
///
/// Package lines look like `* nodejs@20 - 20.11.0`; older devbox releases
/// omit the resolved version. Every other line (headers, notices) is
/// ignored.
pub fn parse_list(output: &str) -> Vec<Package> {
    output
        .lines()
        .filter_map(|line| line.trim().strip_prefix("* "))
        .filter_map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> Option<Package> {
    let (spec, resolved) = match line.split_once(" - ") {
        Some((spec, resolved)) => (spec.trim(), Some(resolved.trim())),
        None => (line.trim(), None),
    };
    if spec.is_empty() {
        return None;
    }
    // The version follows the last '@'.
    let (name, version) = match spec.rsplit_once('@') {
        Some((name, version)) if !name.is_empty() && !version.is_empty() => (name, version),
        _ => (spec, DEFAULT_VERSION),
    };
    Some(Package {
        name: name.to_string(),
        version: version.to_string(),
        resolved: resolved.filter(|r| !r.is_empty()).map(|r| r.to_string()),
    })
}

/// The listing command for a project directory or the global profile.
pub fn list_command(dir: Option<&Path>, global: bool) -> CommandLine {
    let cmd = if global {
        CommandLine::new("devbox").args(["global", "list"])
    } else {
        CommandLine::new("devbox").arg("list")
    };
    match dir {
        Some(dir) => cmd.current_dir(dir),
        None => cmd,
    }
}

/// Run devbox and parse what it lists.
pub fn list(runner: &Runner, dir: Option<&Path>, global: bool) -> Result<Vec<Package>> {
    let completed = runner.query(&list_command(dir, global))?;
    if !completed.success {
        return Err(Error::Devbox {
            message: completed.message(),
        });
    }
    Ok(parse_list(&completed.stdout))
}

/// Serialize `packages` in the requested shape.
pub fn render(packages: &[Package], shape: Shape, pretty: bool) -> Result<String> {
    let value = match shape {
        Shape::Packages => json!({
            "packages": packages.iter().map(Package::spec).collect::<Vec<_>>(),
        }),
        Shape::Detailed => serde_json::to_value(packages)?,
    };
    let rendered = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(rendered)
}
