//! # devbox-json
//!
//! Prints the packages of a devbox project (or the global profile) as JSON,
//! either to stdout or atomically into a file.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};

use devflow::devbox::{self, Shape};
use devflow::exit_codes;
use devflow::logging;
use devflow::output::{ColorChoice, OutputConfig};
use devflow::runner::{self, Runner};
use devflow::tempfiles::TempFiles;

/// Print devbox packages as JSON
#[derive(Parser, Debug)]
#[command(name = "devbox-json")]
#[command(version, about, long_about = None)]
struct Cli {
    /// List the global profile instead of the project
    #[arg(short, long)]
    global: bool,

    /// One object per package, with the resolved version
    #[arg(short, long)]
    detailed: bool,

    /// Pretty-print the JSON
    #[arg(short, long)]
    pretty: bool,

    /// Write to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Project directory
    #[arg(short = 'C', value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Print instead of writing the output file
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Echo each command before running it and enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Colorize output
    #[arg(long, value_name = "WHEN", value_enum, default_value = "auto")]
    color: ColorChoice,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = OutputConfig::new(cli.color);
    logging::init(cli.verbose, &output);

    let mut temps = TempFiles::new();
    let result = execute(cli, &mut temps);
    drop(temps);

    match result {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS),
        Err(err) => exit_codes::report_error(&err),
    }
}

fn execute(cli: Cli, temps: &mut TempFiles) -> Result<()> {
    runner::ensure(&["devbox"])?;
    let runner = Runner::new(cli.dry_run, cli.verbose);

    let packages = devbox::list(&runner, cli.dir.as_deref(), cli.global)?;
    if packages.is_empty() {
        warn!("No packages found");
    }
    debug!("Found {} package(s)", packages.len());

    let shape = if cli.detailed {
        Shape::Detailed
    } else {
        Shape::Packages
    };
    let json = devbox::render(&packages, shape, cli.pretty)?;

    match cli.output {
        Some(path) if cli.dry_run => {
            info!("[dry-run] would write {}", path.display());
            println!("{}", json);
        }
        Some(path) => {
            write_atomic(temps, &path, &json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {} package(s) to {}", packages.len(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn write_atomic(temps: &mut TempFiles, path: &Path, json: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let temp = temps.acquire_in(&dir)?;
    fs::write(&temp, format!("{}\n", json))?;
    temps.persist(&temp, path)?;
    Ok(())
}
