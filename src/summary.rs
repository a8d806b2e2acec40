//! End-of-run summary, derived from a [`Report`] by grouping outcomes.

use std::fmt::Write;

use console::style;

use crate::output::OutputConfig;
use crate::refresh::{Outcome, Report};

/// Outcomes grouped by kind, each list in the order they were recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub cloned: Vec<String>,
    pub linked: Vec<String>,
    pub updated: Vec<String>,
    pub up_to_date: Vec<String>,
    pub skipped: Vec<(String, String)>,
    pub failed: Vec<(String, String)>,
    pub not_git: Vec<String>,
}

impl Summary {
    pub fn from_report(report: &Report) -> Self {
        let mut summary = Summary::default();
        for (name, outcome) in report.items() {
            let name = name.clone();
            match outcome {
                Outcome::Cloned => summary.cloned.push(name),
                Outcome::Linked => summary.linked.push(name),
                Outcome::Updated => summary.updated.push(name),
                Outcome::UpToDate => summary.up_to_date.push(name),
                Outcome::Skipped(reason) => summary.skipped.push((name, reason.clone())),
                Outcome::Failed(reason) => summary.failed.push((name, reason.clone())),
                Outcome::NotGit => summary.not_git.push(name),
            }
        }
        summary
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Render the counts table followed by the name lists of the
    /// non-trivial buckets.
    pub fn render(&self, output: &OutputConfig) -> String {
        let mut out = String::new();
        let heading = if output.use_color {
            style("Summary").bold().force_styling(true).to_string()
        } else {
            "Summary".to_string()
        };
        let _ = writeln!(out, "{}", heading);

        let rows = [
            (output.marker("🔄", "*"), "Updated", self.updated.len()),
            (output.marker("✅", "="), "Up to date", self.up_to_date.len()),
            (output.marker("⏭️ ", "-"), "Skipped", self.skipped.len()),
            (output.marker("❌", "!"), "Failed", self.failed.len()),
            (output.marker("📁", "?"), "Not a repository", self.not_git.len()),
        ];
        for (marker, label, count) in rows {
            let _ = writeln!(out, "  {} {:<17} {}", marker, format!("{}:", label), count);
        }
        if !self.cloned.is_empty() || !self.linked.is_empty() {
            let _ = writeln!(
                out,
                "  Cloned {}, linked {}",
                self.cloned.len(),
                self.linked.len()
            );
        }

        list_names(&mut out, "Updated", &self.updated);
        list_reasons(&mut out, "Skipped", &self.skipped);
        list_reasons(&mut out, "Failed", &self.failed);
        list_names(&mut out, "Not a repository", &self.not_git);
        out
    }
}

fn list_names(out: &mut String, title: &str, names: &[String]) {
    if names.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{}:", title);
    for name in names {
        let _ = writeln!(out, "  - {}", name);
    }
}

fn list_reasons(out: &mut String, title: &str, items: &[(String, String)]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{}:", title);
    for (name, reason) in items {
        let _ = writeln!(out, "  - {} ({})", name, reason);
    }
}
