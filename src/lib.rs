//! # devflow
//!
//! Shared library behind a small set of developer workstation tools:
//!
//! - `refresh-skills` keeps a directory of git checkouts current. It clones
//!   what a declarative list names into a hidden cache, exposes sub-paths of
//!   those clones through symlinks, then rebases every checkout onto its
//!   upstream and prints a summary.
//! - `git-prune-merged` deletes local branches already merged into the base
//!   branch.
//! - `devbox-json` prints the packages of a devbox project as JSON.
//! - `aws-mfa` exchanges an MFA token for temporary AWS credentials and stores
//!   them as a separate profile.
//!
//! ## Core Concepts
//!
//! - **Command execution (`runner`)**: every external command goes through a
//!   [`runner::Runner`], which owns the dry-run and verbose switches.
//! - **Git (`git`, `repository`)**: thin wrappers over the `git` CLI, exposed
//!   to the sweep through the [`repository::GitOperations`] trait so tests can
//!   substitute a fake.
//! - **Sweep (`refresh`, `summary`)**: the clone, link and refresh phases
//!   record typed outcomes into a [`refresh::Report`], which
//!   [`summary::Summary`] groups for display.
//! - **Temporary files (`tempfiles`)**: a registry of temp paths removed on
//!   every exit path.
//!
//! ## Quick Example
//!
//! ```
//! use devflow::clone_list;
//!
//! let entries = clone_list::parse(
//!     "# skills\n\
//!      https://github.com/acme/skills.git\n\
//!      https://github.com/acme/docs.git tools/pdf\n",
//! );
//! assert_eq!(entries.len(), 2);
//! assert_eq!(entries[1].name(), "docs");
//! assert_eq!(entries[1].link_name().as_deref(), Some("pdf"));
//! ```

pub mod aws;
pub mod branches;
pub mod clone_list;
pub mod devbox;
pub mod error;
pub mod exit_codes;
pub mod git;
pub mod logging;
pub mod output;
pub mod prompt;
pub mod refresh;
pub mod repository;
pub mod runner;
pub mod suggestions;
pub mod summary;
pub mod tempfiles;
