//! Shared test utilities for the CLI E2E tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_file("skills.list", "");
//!     fixture.refresh_skills().arg("--dry-run").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::git;
    #[allow(unused_imports)]
    pub use super::init_repo;
    pub use super::TestFixture;
}

/// Run git in `dir` with a fixed identity, panicking on failure.
#[allow(dead_code)]
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_AUTHOR_NAME", "Test")
        .env("GIT_AUTHOR_EMAIL", "test@example.com")
        .env("GIT_COMMITTER_NAME", "Test")
        .env("GIT_COMMITTER_EMAIL", "test@example.com")
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Create a repository on branch `main` with one commit.
#[allow(dead_code)]
pub fn init_repo(dir: &Path) {
    std::fs::create_dir_all(dir).expect("Failed to create repo dir");
    git(dir, &["init", "--quiet", "--initial-branch=main"]);
    std::fs::write(dir.join("README.md"), "hello\n").expect("Failed to write file");
    git(dir, &["add", "README.md"]);
    git(dir, &["commit", "--quiet", "-m", "initial"]);
}

/// A temporary home with an (initially empty) skills root.
///
/// Commands built from the fixture point `HOME`, `CLAUDE_SKILLS_DIR` and
/// `DEVFLOW_CLONE_FILE` into the temp directory so the user's real setup is
/// never touched.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Add an empty directory.
    #[allow(dead_code)]
    pub fn with_dir(self, path: &str) -> Self {
        self.temp_dir
            .child(path)
            .create_dir_all()
            .expect("Failed to create directory");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The managed root used by `refresh_skills`.
    pub fn root(&self) -> PathBuf {
        self.temp_dir.path().join("skills")
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    fn isolate(&self, cmd: &mut assert_cmd::Command) {
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env("DEVFLOW_CLONE_FILE", self.path().join("no-bundled.list"))
            .env("AWS_SHARED_CREDENTIALS_FILE", self.path().join("credentials"))
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
    }

    /// `refresh-skills` with the managed root inside the fixture.
    #[allow(dead_code)]
    pub fn refresh_skills(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("refresh-skills");
        self.isolate(&mut cmd);
        cmd.env("CLAUDE_SKILLS_DIR", self.root());
        cmd
    }

    /// `git-prune-merged` run from the fixture directory.
    #[allow(dead_code)]
    pub fn prune_merged(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("git-prune-merged");
        self.isolate(&mut cmd);
        cmd
    }

    /// `aws-mfa` with the credentials file inside the fixture.
    #[allow(dead_code)]
    pub fn aws_mfa(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("aws-mfa");
        self.isolate(&mut cmd);
        cmd
    }

    /// `devbox-json` run from the fixture directory.
    #[allow(dead_code)]
    pub fn devbox_json(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("devbox-json");
        self.isolate(&mut cmd);
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_fixture_with_file() {
        let fixture = TestFixture::new().with_file("test.txt", "hello");
        assert!(fixture.path().join("test.txt").exists());
    }

    #[test]
    fn test_root_is_inside_fixture() {
        let fixture = TestFixture::new();
        assert!(fixture.root().starts_with(fixture.path()));
    }
}
