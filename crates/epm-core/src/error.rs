//! Error types for epm-core

use std::path::PathBuf;

/// Result type for epm-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in epm-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Transparent wrappers for underlying crate errors
    /// Filesystem error from epm-fs
    #[error(transparent)]
    Fs(#[from] epm_fs::Error),

    /// Version control error from epm-git
    #[error(transparent)]
    Git(#[from] epm_git::Error),

    /// Link error from epm-link
    #[error(transparent)]
    Link(#[from] epm_link::Error),

    /// The engine build tool could not be invoked
    #[error("Build tool not found at {path}")]
    ToolUnavailable { path: PathBuf },

    /// The plugin manifest expected by the build tool is absent
    #[error("Plugin manifest not found at {path}")]
    ManifestMissing { path: PathBuf },

    /// The build subprocess exited unsuccessfully
    #[error("Plugin build failed ({status}):\n{output}")]
    BuildFailed { status: String, output: String },

    /// The build reported success but the staged binaries are absent
    #[error("Built binaries missing at {path} after build")]
    ArtifactsMissing { path: PathBuf },

    /// No persisted record exists for the engine
    #[error("Engine at {path} is not managed")]
    NotManaged { path: PathBuf },

    /// Standard I/O error with path context
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
