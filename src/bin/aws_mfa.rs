//! # aws-mfa
//!
//! Exchanges a profile's long-lived keys plus an MFA token code for
//! temporary session credentials and stores them under a separate profile
//! (`<profile>-mfa` by default) in the shared credentials file.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};

use devflow::aws;
use devflow::exit_codes;
use devflow::logging;
use devflow::output::{ColorChoice, OutputConfig};
use devflow::prompt;
use devflow::runner::{self, Runner};
use devflow::suggestions;
use devflow::tempfiles::TempFiles;

/// Store temporary MFA session credentials as an AWS profile
#[derive(Parser, Debug)]
#[command(name = "aws-mfa")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Profile holding the long-lived keys
    #[arg(long, value_name = "NAME", default_value = "default")]
    profile: String,

    /// Profile to write the session credentials to (default: <profile>-mfa)
    #[arg(long, value_name = "NAME")]
    mfa_profile: Option<String>,

    /// MFA device ARN (default: mfa_serial of the source profile)
    #[arg(long, value_name = "ARN")]
    serial: Option<String>,

    /// Six-digit token code; prompted for when omitted
    #[arg(long, value_name = "CODE")]
    token: Option<String>,

    /// Session lifetime in seconds
    #[arg(
        long,
        value_name = "SECS",
        default_value_t = aws::DEFAULT_DURATION,
        value_parser = clap::value_parser!(u32).range(i64::from(aws::MIN_DURATION)..=i64::from(aws::MAX_DURATION))
    )]
    duration: u32,

    /// Shared credentials file (default: ~/.aws/credentials)
    #[arg(long, value_name = "FILE", env = "AWS_SHARED_CREDENTIALS_FILE")]
    credentials: Option<PathBuf>,

    /// Show the request without calling AWS or writing anything
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

    // Dropped before the process exits, removing any temp file left behind.
    let mut temps = TempFiles::new();
    let result = execute(cli, &output, &mut temps);
    drop(temps);

    match result {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS),
        Err(err) => exit_codes::report_error(&err),
    }
}

fn execute(cli: Cli, output: &OutputConfig, temps: &mut TempFiles) -> Result<()> {
    runner::ensure(&["aws"])?;
    let runner = Runner::new(cli.dry_run, cli.verbose);
    let path = aws::credentials_path(cli.credentials);
    let target = cli
        .mfa_profile
        .unwrap_or_else(|| aws::default_mfa_profile(&cli.profile));
    debug!("Credentials file: {}", path.display());

    let serial = match cli.serial {
        Some(serial) => serial,
        None => resolve_serial(&path, &cli.profile)?,
    };

    let token = match cli.token {
        Some(token) => token,
        None => prompt::secret(&format!("MFA code for {}", serial))?,
    };
    let token = token.trim().to_string();
    aws::validate_token(&token)?;

    let Some(creds) =
        aws::get_session_token(&runner, &cli.profile, &serial, &token, cli.duration)?
    else {
        info!("Dry run: would write profile [{}] to {}", target, path.display());
        return Ok(());
    };

    aws::write_credentials(temps, &path, &target, &creds)
        .with_context(|| format!("Failed to update {}", path.display()))?;
    println!(
        "{} Profile [{}] valid until {}",
        output.marker("🔑", "*"),
        target,
        creds.expiration
    );
    Ok(())
}

fn resolve_serial(path: &std::path::Path, profile: &str) -> Result<String> {
    if let Some(serial) = aws::read_mfa_serial(path, profile)? {
        return Ok(serial);
    }
    let known = aws::profiles(path)?;
    if known.iter().any(|p| p == profile) {
        Err(suggestions::no_mfa_serial(profile, path))
    } else {
        Err(suggestions::unknown_profile(profile, &known))
    }
}
