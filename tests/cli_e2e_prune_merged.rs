//! End-to-end tests for `git-prune-merged`.
//!
//! These tests need the real `git` binary and are gated behind the
//! `integration-tests` feature.

mod common;
use common::prelude::*;

use std::path::Path;

/// Repository on `main` with two merged branches, one unmerged branch and a
/// merged `develop`.
fn repo_with_branches(fixture: &TestFixture) -> std::path::PathBuf {
    let repo = fixture.path().join("repo");
    init_repo(&repo);
    git(&repo, &["branch", "feature-a"]);
    git(&repo, &["branch", "feature-b"]);
    git(&repo, &["branch", "develop"]);
    git(&repo, &["checkout", "--quiet", "-b", "wip"]);
    std::fs::write(repo.join("wip.txt"), "wip\n").unwrap();
    git(&repo, &["add", "wip.txt"]);
    git(&repo, &["commit", "--quiet", "-m", "wip"]);
    git(&repo, &["checkout", "--quiet", "main"]);
    repo
}

fn branches(repo: &Path) -> Vec<String> {
    git(repo, &["branch", "--format=%(refname:short)"])
        .lines()
        .map(|l| l.to_string())
        .collect()
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_yes_deletes_merged_branches_only() {
    let fixture = TestFixture::new();
    let repo = repo_with_branches(&fixture);

    fixture
        .prune_merged()
        .args(["-C", "repo", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("feature-a"))
        .stdout(predicate::str::contains("Deleted 2 branch(es), 0 failed"));

    assert_eq!(branches(&repo), vec!["develop", "main", "wip"]);
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_dry_run_lists_without_deleting() {
    let fixture = TestFixture::new();
    let repo = repo_with_branches(&fixture);

    fixture
        .prune_merged()
        .args(["-C", "repo", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("feature-b"))
        .stdout(predicate::str::contains("Would delete 2 branch(es)"));

    assert_eq!(branches(&repo).len(), 5);
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_current_branch_is_kept() {
    let fixture = TestFixture::new();
    let repo = repo_with_branches(&fixture);
    git(&repo, &["checkout", "--quiet", "feature-a"]);

    fixture
        .prune_merged()
        .args(["-C", "repo", "--yes", "--base", "main"])
        .assert()
        .success();

    assert!(branches(&repo).contains(&"feature-a".to_string()));
    assert!(!branches(&repo).contains(&"feature-b".to_string()));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_nothing_to_delete() {
    let fixture = TestFixture::new();
    init_repo(&fixture.path().join("repo"));

    fixture
        .prune_merged()
        .args(["-C", "repo"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No merged branches"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_missing_base_branch_reports_hint() {
    let fixture = TestFixture::new();
    let repo = fixture.path().join("repo");
    init_repo(&repo);
    git(&repo, &["branch", "-m", "main", "trunk"]);

    fixture
        .prune_merged()
        .args(["-C", "repo"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Could not determine the base branch"))
        .stderr(predicate::str::contains("--base"));
}
