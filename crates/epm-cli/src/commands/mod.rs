//! Command implementations.

mod discover;
mod install;
mod repair;
mod roots;
mod status;
mod uninstall;
mod update;

pub use discover::run_discover;
pub use install::run_install;
pub use repair::run_repair;
pub use roots::run_roots;
pub use status::run_status;
pub use uninstall::run_uninstall;
pub use update::run_update;

use std::path::PathBuf;

use epm_core::{
    ManagerConfig, Reconciler, Settings, Target, UatBuildDriver, discover as discover_targets,
};
use epm_fs::NormalizedPath;

use crate::error::{CliError, Result};

/// Everything a command needs: the loaded config and a wired reconciler.
pub struct AppContext {
    data_dir: NormalizedPath,
    pub config: ManagerConfig,
    pub reconciler: Reconciler,
}

impl AppContext {
    /// Load config from the data directory and wire up the reconciler
    /// with the production build driver.
    pub fn open(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = data_dir
            .map(NormalizedPath::new)
            .unwrap_or_else(Settings::default_data_dir);

        let config = ManagerConfig::load_or_default(&data_dir)?;

        let mut settings = Settings::new(data_dir.clone());
        settings.branch = config.default_remote_branch.clone();
        settings.custom_roots = config
            .custom_engine_roots
            .iter()
            .map(NormalizedPath::new)
            .collect();

        let reconciler = Reconciler::new(settings, Box::new(UatBuildDriver));

        Ok(Self {
            data_dir,
            config,
            reconciler,
        })
    }

    /// Persist the config, stamping the run time.
    pub fn save(&mut self) -> Result<()> {
        self.config.save(&self.data_dir)?;
        Ok(())
    }

    /// Run discovery with the configured roots.
    pub fn discover(&self) -> Vec<Target> {
        let settings = self.reconciler.settings();
        discover_targets(&settings.default_engine_root, &settings.custom_roots)
    }

    /// Resolve an engine by version: managed records first, then a fresh
    /// discovery scan.
    pub fn resolve_engine(&self, version: &str) -> Result<(NormalizedPath, String)> {
        if let Some(record) = self
            .config
            .engines
            .iter()
            .find(|e| e.engine_version == version)
        {
            return Ok((
                NormalizedPath::new(&record.engine_path),
                record.engine_version.clone(),
            ));
        }

        self.discover()
            .into_iter()
            .find(|t| t.version == version)
            .map(|t| (t.path, t.version))
            .ok_or_else(|| CliError::user(format!("No engine installation found for version {version}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_with_empty_data_dir_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let ctx = AppContext::open(Some(temp.path().to_path_buf())).unwrap();

        assert_eq!(ctx.reconciler.settings().branch, "dev");
        assert!(ctx.config.engines.is_empty());
    }

    #[test]
    fn resolve_engine_for_unknown_version_is_a_user_error() {
        let temp = TempDir::new().unwrap();
        let ctx = AppContext::open(Some(temp.path().to_path_buf())).unwrap();

        let err = ctx.resolve_engine("9.9").unwrap_err();
        assert!(matches!(err, CliError::User(_)));
    }
}
