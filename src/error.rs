//! # Error Handling
//!
//! This module defines the centralized error type for the `devflow` library.
//! It uses `thiserror` to derive an `Error` enum covering every failure the
//! library reports to its callers, with descriptive messages suitable for
//! printing directly to the terminal.
//!
//! Per-repository failures during a refresh sweep are *not* errors at this
//! level: they are recorded as outcomes in a `Report` so the sweep can keep
//! going. Only failures that make continuing meaningless surface as `Error`.
//!
//! The `Result` alias is used throughout the library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for devflow operations
#[derive(Error, Debug)]
pub enum Error {
    /// An external command could not be started at all.
    #[error("Failed to run `{command}`: {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A git command exited unsuccessfully.
    #[error("Git command failed in {dir}: {command} - {stderr}")]
    GitCommand {
        command: String,
        dir: String,
        stderr: String,
    },

    /// No base branch could be determined for a branch cleanup.
    #[error("Could not determine the base branch in {dir}")]
    NoBaseBranch { dir: String },

    /// One or more required executables are not on `PATH`.
    #[error("Missing required commands: {}", commands.join(", "))]
    MissingCommands { commands: Vec<String> },

    /// The clone list was explicitly requested but does not exist.
    #[error("Clone list not found: {}", path.display())]
    CloneListNotFound { path: PathBuf },

    /// The clone list exists but could not be read.
    #[error("Clone list error in {}: {message}", path.display())]
    CloneList { path: PathBuf, message: String },

    /// Reading from the terminal failed.
    #[error("Prompt failed: {message}")]
    Prompt { message: String },

    /// An MFA token code that is not six digits.
    #[error("Invalid MFA token code: must be 6 digits")]
    InvalidToken,

    /// The AWS CLI returned something unusable.
    #[error("AWS error: {message}")]
    Aws { message: String },

    /// `devbox` failed to list packages.
    #[error("devbox error: {message}")]
    Devbox { message: String },

    /// The AWS shared credentials file could not be read or written.
    #[error("Credentials file error for {}: {message}", path.display())]
    Credentials { path: PathBuf, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON parsing error, wrapped from `serde_json::Error`.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Prompt {
            message: err.to_string(),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_git_command() {
        let error = Error::GitCommand {
            command: "git pull --rebase --autostash".to_string(),
            dir: "/skills/foo".to_string(),
            stderr: "diverged".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Git command failed"));
        assert!(display.contains("/skills/foo"));
        assert!(display.contains("diverged"));
    }

    #[test]
    fn test_error_display_missing_commands_lists_all() {
        let error = Error::MissingCommands {
            commands: vec!["git".to_string(), "aws".to_string()],
        };
        assert_eq!(error.to_string(), "Missing required commands: git, aws");
    }

    #[test]
    fn test_error_display_clone_list_not_found() {
        let error = Error::CloneListNotFound {
            path: PathBuf::from("/tmp/missing.list"),
        };
        let display = format!("{}", error);
        assert!(display.contains("Clone list not found"));
        assert!(display.contains("/tmp/missing.list"));
    }

    #[test]
    fn test_error_display_command_spawn_keeps_source() {
        let error = Error::CommandSpawn {
            command: "nope --flag".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file"),
        };
        let display = format!("{}", error);
        assert!(display.contains("nope --flag"));
        assert!(display.contains("No such file"));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();
        let display = format!("{}", error);
        assert!(display.contains("I/O error"));
        assert!(display.contains("File not found"));
    }

    #[test]
    fn test_error_from_json_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("{unclosed").unwrap_err();
        let error: Error = json_error.into();
        assert!(error.to_string().contains("JSON parsing error"));
    }

    #[test]
    fn test_error_display_devbox() {
        let error = Error::Devbox {
            message: "no devbox.json found".to_string(),
        };
        assert_eq!(error.to_string(), "devbox error: no devbox.json found");
    }

    #[test]
    fn test_error_credentials() {
        let error = Error::Credentials {
            path: PathBuf::from("/home/me/.aws/credentials"),
            message: "permission denied".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Credentials file error"));
        assert!(display.contains("permission denied"));
    }
}
