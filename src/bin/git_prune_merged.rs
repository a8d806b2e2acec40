//! # git-prune-merged
//!
//! Deletes local branches that are already merged into the base branch.
//! The current branch, the base and `main`/`master`/`develop` are never
//! touched, and deletion uses `git branch -d`, so git itself refuses to
//! drop anything unmerged.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use devflow::branches;
use devflow::exit_codes;
use devflow::git;
use devflow::logging;
use devflow::output::{ColorChoice, OutputConfig};
use devflow::prompt;
use devflow::runner::{self, Runner};
use devflow::suggestions;

/// Delete local branches already merged into the base branch
#[derive(Parser, Debug)]
#[command(name = "git-prune-merged")]
#[command(version, about, long_about = None)]
struct Cli {
    /// List the branches that would be deleted without deleting them
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Echo each command before running it and enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Delete without asking for confirmation
    #[arg(short, long)]
    yes: bool,

    /// Base branch (default: origin/HEAD, else main, else master)
    #[arg(long, value_name = "BRANCH")]
    base: Option<String>,

    /// Repository to clean up
    #[arg(short = 'C', value_name = "DIR", default_value = ".")]
    dir: PathBuf,

    /// Colorize output
    #[arg(long, value_name = "WHEN", value_enum, default_value = "auto")]
    color: ColorChoice,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = OutputConfig::new(cli.color);
    logging::init(cli.verbose, &output);

    match execute(cli, &output) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS),
        Err(err) => exit_codes::report_error(&err),
    }
}

fn execute(cli: Cli, output: &OutputConfig) -> Result<()> {
    runner::ensure(&["git"])?;
    let runner = Runner::new(cli.dry_run, cli.verbose);

    let dir = git::toplevel(&runner, &cli.dir)
        .map_err(|_| suggestions::not_a_repository(&cli.dir))?;

    if let Err(e) = git::fetch_prune(&runner, &dir) {
        warn!("fetch --prune failed, continuing with local refs: {}", e);
    }

    let base = branches::resolve_base(&runner, &dir, cli.base.as_deref())?;
    let target = branches::merge_target(&runner, &dir, &base)?;
    let current = git::current_branch(&runner, &dir)?;
    let merged = git::merged_branches(&runner, &dir, &target)
        .with_context(|| format!("Failed to list branches merged into {}", target))?;
    let candidates = branches::prune_candidates(&merged, current.as_deref(), &base);

    if candidates.is_empty() {
        info!("No merged branches to delete (base: {})", target);
        return Ok(());
    }

    println!("Branches merged into {}:", target);
    for branch in &candidates {
        println!("  {} {}", output.marker("🌿", "-"), branch);
    }

    if !cli.dry_run && !cli.yes {
        let question = format!("Delete {} branch(es)?", candidates.len());
        if !prompt::confirm(&question, false)? {
            info!("Nothing deleted");
            return Ok(());
        }
    }

    let report = branches::delete_branches(&runner, &dir, &candidates);
    if cli.dry_run {
        println!("Would delete {} branch(es)", report.deleted.len());
    } else {
        println!(
            "Deleted {} branch(es), {} failed",
            report.deleted.len(),
            report.failed.len()
        );
    }
    for (branch, reason) in &report.failed {
        println!("  {} {} ({})", output.marker("❌", "!"), branch, reason);
    }
    Ok(())
}
