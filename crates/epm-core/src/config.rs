//! Persisted manager configuration.
//!
//! The JSON record of engines under management plus the handful of
//! user-tunable values. The core operates on the in-memory form; the CLI
//! owns when it is loaded and saved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use epm_fs::constants::DEFAULT_BRANCH;
use epm_fs::{ConfigStore, DataPath, NormalizedPath};

use crate::Result;

/// Persisted record of one engine installation under management.
///
/// Written only after a fully successful install; dropped on uninstall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedEngine {
    pub engine_path: String,
    pub engine_version: String,
    pub working_copy_subdir: String,
    pub branch: String,
    pub plugin_link_path: String,
    /// Whether this tool performed the stock-plugin disable. Uninstall
    /// only restores the stock plugin when this is set.
    pub stock_plugin_disabled_by_tool: bool,
}

/// The persisted configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerConfig {
    pub version: u32,
    pub default_remote_branch: String,
    pub engines: Vec<ManagedEngine>,
    pub custom_engine_roots: Vec<String>,
    pub last_run_utc: Option<DateTime<Utc>>,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            version: 1,
            default_remote_branch: DEFAULT_BRANCH.to_string(),
            engines: Vec::new(),
            custom_engine_roots: Vec::new(),
            last_run_utc: None,
        }
    }
}

impl ManagerConfig {
    /// Path of the config file under `data_dir`.
    pub fn path(data_dir: &NormalizedPath) -> NormalizedPath {
        data_dir.join(DataPath::ConfigFile.as_str())
    }

    /// Load the config from `data_dir`, or start fresh when none exists.
    pub fn load_or_default(data_dir: &NormalizedPath) -> Result<Self> {
        let path = Self::path(data_dir);
        if !path.is_file() {
            return Ok(Self::default());
        }
        Ok(ConfigStore::new().load(&path)?)
    }

    /// Save the config under `data_dir`, stamping the run time.
    pub fn save(&mut self, data_dir: &NormalizedPath) -> Result<()> {
        self.last_run_utc = Some(Utc::now());
        ConfigStore::new().save(&Self::path(data_dir), self)?;
        Ok(())
    }

    /// Look up the record for an engine by its installation path.
    pub fn engine_by_path(&self, engine_path: &str) -> Option<&ManagedEngine> {
        self.engines.iter().find(|e| e.engine_path == engine_path)
    }

    /// Insert or replace the record for an engine, keyed by path.
    pub fn upsert_engine(&mut self, record: ManagedEngine) {
        match self
            .engines
            .iter_mut()
            .find(|e| e.engine_path == record.engine_path)
        {
            Some(existing) => *existing = record,
            None => self.engines.push(record),
        }
    }

    /// Drop the record for an engine. Unknown paths are a no-op.
    pub fn remove_engine(&mut self, engine_path: &str) {
        self.engines.retain(|e| e.engine_path != engine_path);
    }
}
