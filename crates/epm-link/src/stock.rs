//! Engine-bundled Git plugin collision handling.
//!
//! The bundled `GitSourceControl` plugin shares its module identity with
//! the managed plugin, so it must be disabled while a link is in place.
//! Disabling renames the manifest aside; the plugin itself is never
//! deleted, only the rename and its inverse are performed.

use std::fs;

use serde::{Deserialize, Serialize};

use epm_fs::constants::{DISABLED_SUFFIX, STOCK_PLUGIN_MANIFEST};
use epm_fs::{EnginePath, NormalizedPath};

use crate::{Error, Result};

/// Observed state of the engine-bundled Git plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockPluginState {
    /// Manifest present under its expected name
    Enabled,
    /// Manifest renamed aside with the disabled suffix
    Disabled,
    /// Neither form present
    NotFound,
}

impl std::fmt::Display for StockPluginState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
            Self::NotFound => "not found",
        };
        write!(f, "{label}")
    }
}

fn manifest_path(engine_root: &NormalizedPath) -> NormalizedPath {
    engine_root
        .join(EnginePath::StockPluginDir.as_str())
        .join(STOCK_PLUGIN_MANIFEST)
}

fn disabled_path(engine_root: &NormalizedPath) -> NormalizedPath {
    engine_root
        .join(EnginePath::StockPluginDir.as_str())
        .join(&format!("{STOCK_PLUGIN_MANIFEST}{DISABLED_SUFFIX}"))
}

/// Whether the bundled plugin's manifest is present in enabled form,
/// i.e. whether linking the managed plugin would create an identity
/// collision.
pub fn collision(engine_root: &NormalizedPath) -> bool {
    manifest_path(engine_root).is_file()
}

/// Current state of the bundled plugin.
pub fn stock_plugin_state(engine_root: &NormalizedPath) -> StockPluginState {
    if manifest_path(engine_root).is_file() {
        StockPluginState::Enabled
    } else if disabled_path(engine_root).is_file() {
        StockPluginState::Disabled
    } else {
        StockPluginState::NotFound
    }
}

/// Disable the bundled plugin by renaming its manifest aside.
///
/// Fails when there is no enabled manifest to rename.
pub fn disable_stock_plugin(engine_root: &NormalizedPath) -> Result<()> {
    let src = manifest_path(engine_root);
    let dst = disabled_path(engine_root);

    if !src.is_file() {
        return Err(Error::ManifestMissing {
            path: src.to_native(),
        });
    }

    tracing::debug!(manifest = %src, "Disabling stock plugin");
    fs::rename(src.to_native(), dst.to_native()).map_err(|e| Error::io(src.to_native(), e))
}

/// Restore the bundled plugin's manifest.
///
/// Fails with a distinct error when no disabled manifest exists, so
/// callers can tell "nothing to restore" from a failed restore.
pub fn enable_stock_plugin(engine_root: &NormalizedPath) -> Result<()> {
    let src = disabled_path(engine_root);
    let dst = manifest_path(engine_root);

    if !src.is_file() {
        return Err(Error::NothingToRestore {
            path: src.to_native(),
        });
    }

    tracing::debug!(manifest = %dst, "Re-enabling stock plugin");
    fs::rename(src.to_native(), dst.to_native()).map_err(|e| Error::io(src.to_native(), e))
}
