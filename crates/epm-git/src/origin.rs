//! The shared origin clone.

use std::fs;

use git2::{AutotagOption, Direction, FetchOptions, FetchPrune, Repository};

use epm_fs::constants::DEFAULT_BRANCH;
use epm_fs::{DataPath, NormalizedPath};

use crate::{Error, Result};

/// The single shared clone all working copies derive from.
///
/// Lives at `<data-dir>/origin`. Either present (cloned) or absent; the
/// presence test is the git metadata directory, not the directory itself.
pub struct Origin {
    dir: NormalizedPath,
    remote_url: String,
}

impl Origin {
    /// Create an Origin handle rooted under `data_dir`.
    ///
    /// Pure path computation; nothing is touched on disk.
    pub fn new(data_dir: &NormalizedPath, remote_url: impl Into<String>) -> Self {
        Self {
            dir: data_dir.join(DataPath::Origin.as_str()),
            remote_url: remote_url.into(),
        }
    }

    /// Directory of the origin clone.
    pub fn dir(&self) -> &NormalizedPath {
        &self.dir
    }

    /// The upstream URL this origin was (or will be) cloned from.
    pub fn remote_url(&self) -> &str {
        &self.remote_url
    }

    /// Whether the origin has been cloned.
    pub fn is_cloned(&self) -> bool {
        self.dir.join(".git").exists()
    }

    /// Clone the origin if it is not already present.
    ///
    /// No-op when the clone exists. The directory is re-checked after the
    /// clone call; a clone that reports success without producing a
    /// repository is still a failure.
    pub fn ensure_cloned(&self) -> Result<()> {
        if self.is_cloned() {
            return Ok(());
        }

        tracing::info!(url = %self.remote_url, dir = %self.dir, "Cloning origin");
        git2::build::RepoBuilder::new()
            .clone(&self.remote_url, &self.dir.to_native())
            .map_err(|e| Error::CloneFailed {
                url: self.remote_url.clone(),
                source: e,
            })?;

        if !self.is_cloned() {
            return Err(Error::CreationFailed {
                path: self.dir.to_native(),
            });
        }
        Ok(())
    }

    /// Open the origin repository.
    pub fn open(&self) -> Result<Repository> {
        if !self.is_cloned() {
            return Err(Error::OriginMissing {
                path: self.dir.to_native(),
            });
        }
        Ok(Repository::open(self.dir.to_native())?)
    }

    /// Ask the remote which branch it advertises as HEAD.
    ///
    /// Falls back to `"dev"` on any connect or parse failure: callers use
    /// the answer to pick a tracked branch, and a degraded default beats
    /// aborting the whole operation.
    pub fn resolve_default_branch(&self) -> String {
        match self.query_default_branch() {
            Ok(branch) => branch,
            Err(e) => {
                tracing::debug!(error = %e, fallback = DEFAULT_BRANCH, "Default branch query failed");
                DEFAULT_BRANCH.to_string()
            }
        }
    }

    fn query_default_branch(&self) -> Result<String> {
        let repo = self.open()?;
        let mut remote = repo.find_remote("origin")?;
        remote.connect(Direction::Fetch)?;
        let buf = remote.default_branch()?;
        let name = buf
            .as_str()
            .and_then(|r| r.strip_prefix("refs/heads/"))
            .map(str::to_string);
        remote.disconnect()?;
        name.ok_or_else(|| Error::Git(git2::Error::from_str("remote advertised no default branch")))
    }

    /// Fetch all heads into remote-tracking refs, pruning deleted ones.
    pub fn fetch_all(&self) -> Result<()> {
        let repo = self.open()?;
        let mut remote = repo.find_remote("origin")?;

        let mut opts = FetchOptions::new();
        opts.prune(FetchPrune::On);
        opts.download_tags(AutotagOption::All);

        remote.fetch(
            &["+refs/heads/*:refs/remotes/origin/*"],
            Some(&mut opts),
            None,
        )?;
        Ok(())
    }

    /// Resolve the tip commit of `origin/<branch>`.
    pub fn remote_tracking_commit(&self, branch: &str) -> Result<git2::Oid> {
        let repo = self.open()?;
        let refname = format!("refs/remotes/origin/{branch}");
        let reference = repo
            .find_reference(&refname)
            .map_err(|_| Error::BranchNotFound {
                name: format!("origin/{branch}"),
            })?;
        Ok(reference.peel_to_commit()?.id())
    }

    /// Delete the origin clone wholesale.
    ///
    /// No-op if absent. Callers are responsible for only invoking this
    /// when zero working copies remain.
    pub fn remove(&self) -> Result<()> {
        if !self.dir.exists() {
            return Ok(());
        }
        tracing::info!(dir = %self.dir, "Removing origin clone");
        fs::remove_dir_all(self.dir.to_native())
            .map_err(|e| Error::io(self.dir.to_native(), e))?;
        Ok(())
    }
}
