//! # refresh-skills
//!
//! Keeps the managed skills directory current: clones what the clone list
//! names, links requested sub-paths out of the hidden cache, then rebases
//! every checkout onto its upstream and prints a summary.
//!
//! Per-repository failures are listed in the summary and do not change the
//! exit code.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use devflow::clone_list;
use devflow::exit_codes;
use devflow::logging;
use devflow::output::{ColorChoice, OutputConfig};
use devflow::refresh::{Layout, Report, Sweep, ROOT_ENV};
use devflow::repository::SystemGit;
use devflow::runner::{self, Runner};
use devflow::summary::Summary;

/// Clone, link and rebase the repositories under the skills directory
#[derive(Parser, Debug)]
#[command(name = "refresh-skills")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log what would be done without changing anything
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Echo each command before running it and enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Clone list to use instead of the bundled one
    #[arg(short, long, value_name = "FILE")]
    clone_file: Option<PathBuf>,

    /// Managed root directory (default: ~/.claude/skills)
    #[arg(long, value_name = "DIR", env = ROOT_ENV)]
    root: Option<PathBuf>,

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
    // Configuration errors take precedence over missing tools.
    let entries = clone_list::load(cli.clone_file.as_deref())?;
    runner::ensure(&["git"])?;

    let layout = Layout::new(cli.root.unwrap_or_else(Layout::default_root));
    if cli.dry_run {
        info!("Dry run: no changes will be made");
    }
    info!(
        "Refreshing {} ({} clone list entries)",
        layout.root().display(),
        entries.len()
    );

    let git = SystemGit::new(Runner::new(cli.dry_run, cli.verbose));
    let sweep = Sweep::new(&git, &layout, cli.dry_run);
    let mut report = Report::new();
    sweep
        .run(&entries, &mut report)
        .with_context(|| format!("Failed to scan {}", layout.root().display()))?;

    let summary = Summary::from_report(&report);
    println!();
    print!("{}", summary.render(output));
    if summary.has_failures() {
        warn!("Some repositories could not be refreshed; see the summary above");
    }
    Ok(())
}
