//! # AWS MFA Sessions
//!
//! Exchanges a long-lived profile plus an MFA token code for temporary
//! session credentials (`aws sts get-session-token`) and stores them as a
//! separate profile in the shared credentials file, so other tools can use
//! `--profile <name>-mfa` until the session expires.
//!
//! The credentials file is edited with `rust-ini`; every other section is
//! preserved. The new contents are written to a temp file beside the
//! original and renamed over it, so a crash never leaves a half-written
//! credentials file behind.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use ini::Ini;
use log::{debug, info};
use regex::Regex;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::runner::{CommandLine, Runner};
use crate::tempfiles::TempFiles;

/// Session lifetime bounds accepted by STS, in seconds.
pub const MIN_DURATION: u32 = 900;
pub const MAX_DURATION: u32 = 129_600;
pub const DEFAULT_DURATION: u32 = 43_200;

/// Temporary credentials returned by STS.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expiration: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SessionTokenResponse {
    credentials: Credentials,
}

/// Parse the JSON printed by `aws sts get-session-token --output json`.
pub fn parse_session_token(json: &str) -> Result<Credentials> {
    let response: SessionTokenResponse = serde_json::from_str(json)?;
    Ok(response.credentials)
}

/// MFA token codes are exactly six digits.
pub fn validate_token(code: &str) -> Result<()> {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    let re = TOKEN.get_or_init(|| Regex::new(r"^\d{6}$").expect("valid token regex"));
    if re.is_match(code) {
        Ok(())
    } else {
        Err(Error::InvalidToken)
    }
}

/// Default profile name for the session credentials.
pub fn default_mfa_profile(profile: &str) -> String {
    format!("{}-mfa", profile)
}

/// `~/.aws/credentials`, unless overridden.
pub fn credentials_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".aws")
            .join("credentials")
    })
}

fn load(path: &Path) -> Result<Ini> {
    if !path.exists() {
        return Ok(Ini::new());
    }
    let content = fs::read_to_string(path).map_err(|e| Error::Credentials {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ini::load_from_str(&content).map_err(|e| Error::Credentials {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// The `mfa_serial` configured for `profile`, if any.
pub fn read_mfa_serial(path: &Path, profile: &str) -> Result<Option<String>> {
    let conf = load(path)?;
    Ok(conf
        .section(Some(profile))
        .and_then(|s| s.get("mfa_serial"))
        .map(|s| s.to_string()))
}

/// Names of all profiles in the credentials file.
pub fn profiles(path: &Path) -> Result<Vec<String>> {
    let conf = load(path)?;
    Ok(conf
        .sections()
        .flatten()
        .map(|name| name.to_string())
        .collect())
}

/// Request session credentials. Returns `None` in dry-run mode.
pub fn get_session_token(
    runner: &Runner,
    profile: &str,
    serial: &str,
    token: &str,
    duration: u32,
) -> Result<Option<Credentials>> {
    let cmd = CommandLine::new("aws").args([
        "sts".to_string(),
        "get-session-token".to_string(),
        "--serial-number".to_string(),
        serial.to_string(),
        "--token-code".to_string(),
        token.to_string(),
        "--duration-seconds".to_string(),
        duration.to_string(),
        "--profile".to_string(),
        profile.to_string(),
        "--output".to_string(),
        "json".to_string(),
    ]);
    let completed = runner.capture(&cmd)?;
    if completed.skipped {
        return Ok(None);
    }
    if !completed.success {
        return Err(Error::Aws {
            message: completed.message(),
        });
    }
    parse_session_token(&completed.stdout).map(Some)
}

/// Credentials file contents with `profile` set to `creds`.
pub fn render_credentials(existing: &Ini, profile: &str, creds: &Credentials) -> Result<String> {
    let mut conf = existing.clone();
    conf.with_section(Some(profile))
        .set("aws_access_key_id", creds.access_key_id.as_str())
        .set("aws_secret_access_key", creds.secret_access_key.as_str())
        .set("aws_session_token", creds.session_token.as_str())
        .set("expiration", creds.expiration.as_str());

    let mut buf = Vec::new();
    conf.write_to(&mut buf)?;
    String::from_utf8(buf).map_err(|e| Error::Aws {
        message: e.to_string(),
    })
}

/// Store `creds` under `profile`, atomically replacing the file.
pub fn write_credentials(
    temps: &mut TempFiles,
    path: &Path,
    profile: &str,
    creds: &Credentials,
) -> Result<()> {
    let existing = load(path)?;
    let rendered = render_credentials(&existing, profile, creds)?;

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;
    let temp = temps.acquire_in(&dir)?;
    debug!("Writing credentials to {}", temp.display());
    fs::write(&temp, rendered)?;
    temps.persist(&temp, path)?;
    info!("Updated profile [{}] in {}", profile, path.display());
    Ok(())
}
