//! Process exit codes shared by the devflow binaries.
//!
//! - `0`: success, including runs where individual repositories failed
//! - `1`: general error
//! - `2`: invalid command-line usage (reported by clap)
//! - `66`: an explicitly named input file does not exist (`EX_NOINPUT`)

use std::process::ExitCode;

use crate::error::Error;
use crate::suggestions;

pub const SUCCESS: u8 = 0;
pub const ERROR: u8 = 1;
pub const NO_INPUT: u8 = 66;

/// Exit code for an error that ended a run.
pub fn for_error(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<Error>() {
        Some(Error::CloneListNotFound { .. }) => NO_INPUT,
        _ => ERROR,
    }
}

/// Print `error: <message>` plus any hints to stderr and pick the exit code.
pub fn report_error(err: &anyhow::Error) -> ExitCode {
    eprintln!("error: {:#}", err);
    let hints = suggestions::hints(err);
    if !hints.is_empty() {
        eprintln!();
        for hint in hints {
            eprintln!("{}", hint);
        }
    }
    ExitCode::from(for_error(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_clone_list_is_no_input() {
        let err = anyhow::Error::new(Error::CloneListNotFound {
            path: PathBuf::from("/nope"),
        });
        assert_eq!(for_error(&err), NO_INPUT);
    }

    #[test]
    fn test_other_errors_are_general() {
        let err = anyhow::Error::new(Error::MissingCommands {
            commands: vec!["git".to_string()],
        });
        assert_eq!(for_error(&err), ERROR);
        assert_eq!(for_error(&anyhow::anyhow!("boom")), ERROR);
    }
}
