//! # Command Execution
//!
//! Every external tool devflow drives (`git`, `aws`) goes through a
//! [`Runner`]. The runner owns the two global switches of every devflow
//! binary:
//!
//! - **dry-run**: mutating commands are logged instead of executed and report
//!   success without spawning anything.
//! - **verbose**: each command is echoed through the logger before it runs.
//!
//! Commands are described by a [`CommandLine`] and spawned directly with
//! `std::process::Command`, so arguments reach the child literally without
//! any shell re-interpretation.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use log::info;

use crate::error::{Error, Result};

/// A program invocation: program, arguments, optional working directory and
/// extra environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    envs: Vec<(String, String)>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            envs: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run the command from `dir` instead of the current directory.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
        cmd
    }
}

impl fmt::Display for CommandLine {
    /// Shell-like rendering used for logging only.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(dir) = &self.cwd {
            write!(f, "(cd {} && ", quote(&dir.to_string_lossy()))?;
        }
        for (key, value) in &self.envs {
            write!(f, "{}={} ", key, quote(value))?;
        }
        write!(f, "{}", quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(&arg.to_string_lossy()))?;
        }
        if self.cwd.is_some() {
            write!(f, ")")?;
        }
        Ok(())
    }
}

fn quote(word: &str) -> String {
    let plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@%+,".contains(c));
    if plain {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// Result of a finished (or skipped) command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completed {
    /// Exit code of the child; `None` when killed by a signal or skipped.
    pub code: Option<i32>,
    pub success: bool,
    /// Captured stdout; empty when the stream was inherited.
    pub stdout: String,
    /// Captured stderr; empty when the stream was inherited.
    pub stderr: String,
    /// `true` when dry-run mode prevented the command from running.
    pub skipped: bool,
}

impl Completed {
    fn dry_run() -> Self {
        Self {
            code: None,
            success: true,
            skipped: true,
            ..Default::default()
        }
    }

    /// Trimmed stderr, falling back to stdout when stderr is empty.
    pub fn message(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim().to_string()
        } else {
            stderr.to_string()
        }
    }
}

/// Executes external commands honoring the dry-run and verbose switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct Runner {
    dry_run: bool,
    verbose: bool,
}

impl Runner {
    pub fn new(dry_run: bool, verbose: bool) -> Self {
        Self { dry_run, verbose }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Run a mutating command with stdout and stderr attached to ours.
    pub fn run(&self, cmd: &CommandLine) -> Result<Completed> {
        if self.dry_run {
            info!("[dry-run] {}", cmd);
            return Ok(Completed::dry_run());
        }
        self.echo(cmd);
        let status = cmd
            .to_command()
            .status()
            .map_err(|source| Error::CommandSpawn {
                command: cmd.to_string(),
                source,
            })?;
        Ok(Completed {
            code: status.code(),
            success: status.success(),
            ..Default::default()
        })
    }

    /// Run a mutating command and capture its output.
    pub fn capture(&self, cmd: &CommandLine) -> Result<Completed> {
        if self.dry_run {
            info!("[dry-run] {}", cmd);
            return Ok(Completed::dry_run());
        }
        self.echo(cmd);
        self.spawn_captured(cmd)
    }

    /// Run a read-only command. Queries execute even in dry-run mode.
    pub fn query(&self, cmd: &CommandLine) -> Result<Completed> {
        self.echo(cmd);
        self.spawn_captured(cmd)
    }

    fn echo(&self, cmd: &CommandLine) {
        if self.verbose {
            info!("+ {}", cmd);
        }
    }

    fn spawn_captured(&self, cmd: &CommandLine) -> Result<Completed> {
        let output = cmd
            .to_command()
            .stdin(Stdio::null())
            .output()
            .map_err(|source| Error::CommandSpawn {
                command: cmd.to_string(),
                source,
            })?;
        Ok(Completed {
            code: output.status.code(),
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            skipped: false,
        })
    }
}

/// Check that every named command resolves to an executable on `PATH`.
///
/// All missing names are reported together.
pub fn ensure(commands: &[&str]) -> Result<()> {
    let missing: Vec<String> = commands
        .iter()
        .filter(|name| which::which(name).is_err())
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::MissingCommands { commands: missing })
    }
}
