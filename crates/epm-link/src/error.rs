//! Error types for epm-link

use std::path::PathBuf;

/// Result type for epm-link operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in epm-link operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No write access to {path}; re-run with elevated privileges")]
    PermissionDenied { path: PathBuf },

    #[error("Link target does not exist: {path}")]
    TargetMissing { path: PathBuf },

    #[error("Failed to create link at {path}: {message}")]
    CreationFailed { path: PathBuf, message: String },

    #[error("Path still exists after removal attempts: {path}")]
    StillExists { path: PathBuf },

    #[error("Stock plugin manifest not found at {path}; nothing to disable")]
    ManifestMissing { path: PathBuf },

    #[error("No disabled stock plugin manifest at {path}; nothing to restore")]
    NothingToRestore { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
