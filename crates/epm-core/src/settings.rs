//! Injected runtime configuration.
//!
//! The core never queries process-ambient state (current directory,
//! elevation, environment); everything it needs arrives through this
//! object at construction time, which keeps the whole engine testable
//! against temp directories.

use epm_fs::NormalizedPath;
use epm_fs::constants::{DEFAULT_BRANCH, DEFAULT_ENGINE_ROOT, DEFAULT_REMOTE_URL};

/// Runtime configuration for the core.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory holding the origin clone, working copies and config
    pub data_dir: NormalizedPath,
    /// Upstream repository URL
    pub remote_url: String,
    /// Tracked remote branch
    pub branch: String,
    /// Default root scanned for engine installations
    pub default_engine_root: NormalizedPath,
    /// Additional roots to scan
    pub custom_roots: Vec<NormalizedPath>,
}

impl Settings {
    /// Settings with stock defaults rooted at `data_dir`.
    pub fn new(data_dir: NormalizedPath) -> Self {
        Self {
            data_dir,
            remote_url: DEFAULT_REMOTE_URL.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            default_engine_root: NormalizedPath::new(DEFAULT_ENGINE_ROOT),
            custom_roots: Vec::new(),
        }
    }

    /// The platform-default data directory
    /// (`<config-dir>/engine-plugin-manager`).
    pub fn default_data_dir() -> NormalizedPath {
        let base = dirs::config_dir().unwrap_or_else(|| std::path::PathBuf::from("."));
        NormalizedPath::new(base.join("engine-plugin-manager"))
    }
}
