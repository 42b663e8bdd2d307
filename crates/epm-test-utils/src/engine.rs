//! Fake engine installation fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use epm_fs::constants::{REQUIRED_ARTIFACTS, STOCK_PLUGIN_MANIFEST};
use epm_fs::EnginePath;

/// Create a fake engine installation `UE_<version>` under `root` with the
/// marker executable in place, returning the installation path.
///
/// # Panics
/// Panics if the filesystem operations fail.
pub fn fake_engine_install(root: &Path, version: &str) -> PathBuf {
    let engine = root.join(format!("UE_{version}"));
    let exe = engine.join(EnginePath::Executable.as_str());
    fs::create_dir_all(exe.parent().unwrap())
        .unwrap_or_else(|e| panic!("fake_engine_install: create dirs failed: {e}"));
    fs::write(&exe, b"")
        .unwrap_or_else(|e| panic!("fake_engine_install: write executable failed: {e}"));
    fs::create_dir_all(engine.join(EnginePath::PluginsDir.as_str()))
        .unwrap_or_else(|e| panic!("fake_engine_install: create plugins dir failed: {e}"));
    engine
}

/// Add the engine-bundled Git plugin manifest to a fake installation, in
/// its enabled form.
///
/// # Panics
/// Panics if the filesystem operations fail.
pub fn add_stock_plugin(engine: &Path) {
    let dir = engine.join(EnginePath::StockPluginDir.as_str());
    fs::create_dir_all(&dir)
        .unwrap_or_else(|e| panic!("add_stock_plugin: create dir failed: {e}"));
    fs::write(dir.join(STOCK_PLUGIN_MANIFEST), b"{}\n")
        .unwrap_or_else(|e| panic!("add_stock_plugin: write manifest failed: {e}"));
}

/// Write the built-artifact files into a working copy, as a successful
/// build would.
///
/// # Panics
/// Panics if the filesystem operations fail.
pub fn stage_artifacts(working_copy: &Path) {
    let binaries = working_copy.join("Binaries").join("Win64");
    fs::create_dir_all(&binaries)
        .unwrap_or_else(|e| panic!("stage_artifacts: create dirs failed: {e}"));
    for name in REQUIRED_ARTIFACTS {
        fs::write(binaries.join(name), b"")
            .unwrap_or_else(|e| panic!("stage_artifacts: write {name} failed: {e}"));
    }
}
