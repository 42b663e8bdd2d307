//! Local upstream repository fixtures.
//!
//! Tests clone from a plain local path, so no network or credentials are
//! involved; git2 handles local-path clones through its file transport.

use std::fs;
use std::path::Path;

use git2::{Commit, Oid, Repository, Signature};

/// Initialise an upstream repository whose default branch is `dev` with a
/// single commit, mirroring the plugin remote's layout.
///
/// # Panics
/// Panics if any git operation fails.
pub fn upstream_with_commit(path: &Path) -> Repository {
    let repo = Repository::init(path)
        .unwrap_or_else(|e| panic!("upstream_with_commit: init failed at {}: {e}", path.display()));
    repo.set_head("refs/heads/dev")
        .unwrap_or_else(|e| panic!("upstream_with_commit: set_head failed: {e}"));
    commit_file(&repo, "GitSourceControl.uplugin", "{}\n", "Initial commit");
    repo
}

/// Add (or overwrite) a file in the repository's working directory and
/// commit it to the current branch. Returns the new commit id.
///
/// # Panics
/// Panics if any git operation fails.
pub fn commit_file(repo: &Repository, name: &str, content: &str, message: &str) -> Oid {
    let workdir = repo
        .workdir()
        .unwrap_or_else(|| panic!("commit_file: repository has no workdir"));
    fs::write(workdir.join(name), content)
        .unwrap_or_else(|e| panic!("commit_file: failed to write {name}: {e}"));

    let mut index = repo.index().unwrap();
    index.add_path(Path::new(name)).unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();

    let sig = Signature::now("Test User", "test@test.com").unwrap();
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap_or_else(|e| panic!("commit_file: commit failed: {e}"))
}

/// Add `count` filler commits to the repository's current branch.
///
/// # Panics
/// Panics if any git operation fails.
pub fn add_commits(repo: &Repository, count: usize) {
    for i in 0..count {
        commit_file(
            repo,
            "CHANGES.md",
            &format!("change {i}\n"),
            &format!("Change {i}"),
        );
    }
}
