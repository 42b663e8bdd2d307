//! Error types for epm-git

use std::path::PathBuf;

/// Result type for epm-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in epm-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] epm_fs::Error),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Origin clone not found at {path}")]
    OriginMissing { path: PathBuf },

    #[error("Failed to clone {url}: {source}")]
    CloneFailed {
        url: String,
        #[source]
        source: git2::Error,
    },

    #[error("Branch '{name}' not found")]
    BranchNotFound { name: String },

    #[error("Working copy for version {version} already occupies {path}")]
    WorkingCopyExists { version: String, path: PathBuf },

    #[error("Working copy for version {version} not found")]
    WorkingCopyNotFound { version: String },

    #[error("Working copy directory was not created at {path}")]
    CreationFailed { path: PathBuf },

    #[error(
        "Working copy for version {version} has diverged from origin/{branch}; \
         fast-forward is not possible and local commits will not be discarded"
    )]
    Diverged { version: String, branch: String },

    #[error("Path still exists after removal attempts: {path}")]
    StillExists { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
