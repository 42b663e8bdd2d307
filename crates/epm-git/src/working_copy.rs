//! Per-version working copies backed by git worktrees.

use std::fs;

use git2::{BranchType, Repository, WorktreeAddOptions, WorktreePruneOptions};

use epm_fs::constants::VERSION_DIR_PREFIX;
use epm_fs::{DataPath, NormalizedPath};

use crate::{Error, Origin, Result};

/// Local branch name backing the working copy for an engine version.
pub fn engine_branch(version: &str) -> String {
    format!("engine-{version}")
}

/// Update availability for one working copy, relative to the tracked
/// remote branch.
///
/// `commits_ahead` counts commits reachable from the remote tip but not
/// from the local head. The count is one-directional: a working copy that
/// has diverged still reports only how far behind it is, and local-only
/// commits are not surfaced here (fast-forward refusal catches them).
#[derive(Debug, Clone)]
pub struct UpdateInfo {
    pub version: String,
    pub local_sha: String,
    pub remote_sha: String,
    pub commits_ahead: usize,
    pub compare_url: String,
}

/// The per-version working copies under `<data-dir>/working-copies`.
pub struct WorkingCopies {
    root: NormalizedPath,
}

impl WorkingCopies {
    /// Create a handle rooted under `data_dir`. Pure path computation.
    pub fn new(data_dir: &NormalizedPath) -> Self {
        Self {
            root: data_dir.join(DataPath::WorkingCopies.as_str()),
        }
    }

    /// Root directory holding all working copies.
    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    /// Path of the working copy for `version`. Always succeeds; existence
    /// is a separate question.
    pub fn path(&self, version: &str) -> NormalizedPath {
        self.root.join(&format!("{VERSION_DIR_PREFIX}{version}"))
    }

    /// Whether a working copy directory exists for `version`.
    pub fn exists(&self, version: &str) -> bool {
        self.path(version).is_dir()
    }

    fn worktree_name(version: &str) -> String {
        format!("{VERSION_DIR_PREFIX}{version}")
    }

    /// Materialize the working copy for `version`.
    ///
    /// Creates (or force-resets) the local branch `engine-<version>` from
    /// `origin/<branch>`, then adds a worktree on it. Fails when the
    /// origin is missing or the destination holds a non-empty directory.
    /// The directory is re-checked after the worktree call.
    pub fn create(&self, origin: &Origin, version: &str, branch: &str) -> Result<NormalizedPath> {
        let path = self.path(version);

        if path.exists() {
            let occupied = fs::read_dir(path.to_native())
                .map(|mut entries| entries.next().is_some())
                .unwrap_or(true);
            if occupied {
                return Err(Error::WorkingCopyExists {
                    version: version.to_string(),
                    path: path.to_native(),
                });
            }
            // Empty leftover directory; the worktree call wants a clean slot.
            fs::remove_dir(path.to_native()).map_err(|e| Error::io(path.to_native(), e))?;
        }

        let repo = origin.open()?;

        fs::create_dir_all(self.root.to_native())
            .map_err(|e| Error::io(self.root.to_native(), e))?;

        let remote_ref = repo
            .find_reference(&format!("refs/remotes/origin/{branch}"))
            .map_err(|_| Error::BranchNotFound {
                name: format!("origin/{branch}"),
            })?;
        let base_commit = remote_ref.peel_to_commit()?;

        let local_branch = repo.branch(&engine_branch(version), &base_commit, true)?;
        let branch_ref = local_branch.into_reference();

        let mut opts = WorktreeAddOptions::new();
        opts.reference(Some(&branch_ref));

        tracing::debug!(version, branch, path = %path, "Creating working copy");
        repo.worktree(&Self::worktree_name(version), &path.to_native(), Some(&opts))?;

        if !path.is_dir() {
            return Err(Error::CreationFailed {
                path: path.to_native(),
            });
        }
        Ok(path)
    }

    /// Compute update availability for `version` against `origin/<branch>`.
    pub fn update_info(&self, origin: &Origin, version: &str, branch: &str) -> Result<UpdateInfo> {
        let path = self.path(version);
        if !path.is_dir() {
            return Err(Error::WorkingCopyNotFound {
                version: version.to_string(),
            });
        }

        let wc_repo = Repository::open(path.to_native())?;
        let local = wc_repo.head()?.peel_to_commit()?.id();
        let remote = origin.remote_tracking_commit(branch)?;

        let commits_ahead = if local == remote {
            0
        } else {
            // The worktree shares the origin's object database, so the
            // walk sees both tips.
            let repo = origin.open()?;
            let mut walk = repo.revwalk()?;
            walk.push(remote)?;
            walk.hide(local)?;
            let mut count = 0;
            for oid in walk {
                oid?;
                count += 1;
            }
            count
        };

        Ok(UpdateInfo {
            version: version.to_string(),
            local_sha: local.to_string(),
            remote_sha: remote.to_string(),
            commits_ahead,
            compare_url: format!("{}/compare/{}...{}", origin.remote_url(), local, remote),
        })
    }

    /// Fast-forward the working copy to `origin/<branch>`.
    ///
    /// Diverged history fails with [`Error::Diverged`] instead of being
    /// resolved: the working copy may carry hand-made edits, and choosing
    /// a merge or rebase policy is not this tool's call.
    pub fn update(&self, version: &str, branch: &str) -> Result<()> {
        let path = self.path(version);
        if !path.is_dir() {
            return Err(Error::WorkingCopyNotFound {
                version: version.to_string(),
            });
        }

        let repo = Repository::open(path.to_native())?;
        let remote_ref = repo
            .find_reference(&format!("refs/remotes/origin/{branch}"))
            .map_err(|_| Error::BranchNotFound {
                name: format!("origin/{branch}"),
            })?;
        let remote_commit = remote_ref.peel_to_commit()?;
        let annotated = repo.find_annotated_commit(remote_commit.id())?;

        let (analysis, _) = repo.merge_analysis(&[&annotated])?;

        if analysis.is_up_to_date() {
            return Ok(());
        }

        if analysis.is_fast_forward() {
            let refname = format!("refs/heads/{}", engine_branch(version));
            let mut reference = repo.find_reference(&refname)?;
            reference.set_target(
                remote_commit.id(),
                &format!("update: fast-forward to {}", remote_commit.id()),
            )?;
            repo.checkout_head(Some(git2::build::CheckoutBuilder::default().force()))?;
            return Ok(());
        }

        Err(Error::Diverged {
            version: version.to_string(),
            branch: branch.to_string(),
        })
    }

    /// Remove the working copy for `version`.
    ///
    /// Escalates through three tiers: worktree prune, forced prune
    /// (ignores locks), direct directory deletion. Earlier tiers log and
    /// fall through; only the final tier's failure surfaces. The
    /// per-version branch is deleted best-effort afterwards.
    pub fn remove(&self, origin: &Origin, version: &str) -> Result<()> {
        let path = self.path(version);
        let wt_name = Self::worktree_name(version);

        if path.exists() {
            let pruned = self.prune_worktree(origin, &wt_name, false).or_else(|e| {
                tracing::warn!(version, error = %e, "Worktree prune failed, retrying with force");
                self.prune_worktree(origin, &wt_name, true)
            });

            if let Err(e) = pruned {
                tracing::warn!(version, error = %e, "Forced prune failed, deleting directory");
                fs::remove_dir_all(path.to_native())
                    .map_err(|err| Error::io(path.to_native(), err))?;
            }

            if path.exists() {
                return Err(Error::StillExists {
                    path: path.to_native(),
                });
            }
        }

        // Metadata may outlive the directory when the final tier ran.
        if let Ok(repo) = origin.open()
            && let Ok(wt) = repo.find_worktree(&wt_name)
        {
            let mut opts = WorktreePruneOptions::new();
            opts.valid(true).locked(true).working_tree(false);
            let _ = wt.prune(Some(&mut opts));
        }

        if let Ok(repo) = origin.open()
            && let Ok(mut branch) = repo.find_branch(&engine_branch(version), BranchType::Local)
            && let Err(e) = branch.delete()
        {
            tracing::warn!(
                branch = %engine_branch(version),
                error = %e,
                "Failed to delete branch after working copy removal"
            );
        }

        Ok(())
    }

    fn prune_worktree(&self, origin: &Origin, wt_name: &str, force: bool) -> Result<()> {
        let repo = origin.open()?;
        let wt = repo.find_worktree(wt_name)?;

        let mut opts = WorktreePruneOptions::new();
        opts.valid(true).working_tree(true);
        if force {
            opts.locked(true);
        }
        wt.prune(Some(&mut opts))?;
        Ok(())
    }
}
