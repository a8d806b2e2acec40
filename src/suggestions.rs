//! # Error Suggestions
//!
//! Helpers that turn failures into messages telling the user what went
//! wrong AND how to fix it. Errors raised by the library keep their typed
//! form (so `exit_codes` can still inspect them); [`hints`] supplies the
//! extra lines the binaries print after the error itself.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use devflow::suggestions;
//!
//! // Instead of:
//! anyhow::bail!("No MFA device configured for profile {}", profile);
//!
//! // Use:
//! return Err(suggestions::no_mfa_serial(profile, &path));
//! ```

use std::path::Path;

use crate::error::Error;

/// Hint lines for a library error, if there is useful advice to give.
pub fn hints(err: &anyhow::Error) -> Vec<String> {
    let Some(err) = err.downcast_ref::<Error>() else {
        return Vec::new();
    };
    match err {
        Error::CloneListNotFound { .. } => vec![
            "hint: Check the path passed to -c/--clone-file".to_string(),
            "hint: Omit -c to use the bundled list (DEVFLOW_CLONE_FILE overrides its location)"
                .to_string(),
        ],
        Error::MissingCommands { commands } => commands
            .iter()
            .map(|name| format!("hint: Install `{}` and make sure it is on your PATH", name))
            .collect(),
        Error::NoBaseBranch { .. } => vec![
            "hint: Pass the branch explicitly with --base <BRANCH>".to_string(),
            "hint: Run `git remote set-head origin --auto` to record the remote default branch"
                .to_string(),
        ],
        Error::Aws { .. } => vec![
            "hint: Token codes expire after 30 seconds; wait for a fresh one and retry".to_string(),
        ],
        Error::Devbox { .. } => vec![
            "hint: Run inside a devbox project or pass -C <DIR>".to_string(),
            "hint: Use --global to list the global profile instead".to_string(),
        ],
        _ => Vec::new(),
    }
}

/// Generate an error for a directory that is not inside a git work tree.
pub fn not_a_repository(dir: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Not a git repository: {dir}\n\n\
         hint: Run from inside a repository or pass -C <DIR>",
        dir = dir.display()
    )
}

/// Generate an error for a profile with no MFA device configured.
pub fn no_mfa_serial(profile: &str, credentials: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "No MFA device configured for profile '{profile}'\n\n\
         hint: Pass the device ARN with --serial <ARN>\n\
         hint: Or add `mfa_serial = <ARN>` to [{profile}] in {path}",
        path = credentials.display()
    )
}

/// Generate an error for a profile missing from the credentials file.
///
/// Suggests the closest existing profile name when one is near enough.
pub fn unknown_profile(profile: &str, known: &[String]) -> anyhow::Error {
    let candidates: Vec<&str> = known.iter().map(String::as_str).collect();
    let did_you_mean = find_similar(profile, &candidates)
        .map(|s| format!("\nhint: Did you mean '{s}'?"))
        .unwrap_or_default();
    let available = if known.is_empty() {
        "(none)".to_string()
    } else {
        known.join(", ")
    };

    anyhow::anyhow!(
        "Profile not found in credentials file: {profile}{did_you_mean}\n\n\
         Available profiles: {available}"
    )
}

/// Find a similar string from a list of candidates using edit distance.
///
/// Returns Some(candidate) if a close match is found (edit distance <= 2).
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(input, candidate);
            if distance <= 2 && distance < input.len() {
                Some((candidate, distance))
            } else {
                None
            }
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Levenshtein distance, two rows at a time.
fn edit_distance(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0; b_chars.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}
