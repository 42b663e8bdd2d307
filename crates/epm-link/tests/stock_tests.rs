use std::fs;

use epm_fs::NormalizedPath;
use epm_link::{
    Error, StockPluginState, collision, disable_stock_plugin, enable_stock_plugin,
    stock_plugin_state,
};
use epm_test_utils::engine::{add_stock_plugin, fake_engine_install};
use tempfile::TempDir;

fn setup(with_stock: bool) -> (TempDir, NormalizedPath) {
    let temp = TempDir::new().unwrap();
    let engine = fake_engine_install(temp.path(), "5.4");
    if with_stock {
        add_stock_plugin(&engine);
    }
    (temp, NormalizedPath::new(engine))
}

#[test]
fn state_tracks_manifest_presence() {
    let (_temp, engine) = setup(true);
    assert_eq!(stock_plugin_state(&engine), StockPluginState::Enabled);
    assert!(collision(&engine));

    disable_stock_plugin(&engine).unwrap();
    assert_eq!(stock_plugin_state(&engine), StockPluginState::Disabled);
    assert!(!collision(&engine));
}

#[test]
fn missing_plugin_is_not_found() {
    let (_temp, engine) = setup(false);
    assert_eq!(stock_plugin_state(&engine), StockPluginState::NotFound);
    assert!(!collision(&engine));
}

#[test]
fn disable_enable_round_trip_restores_exact_state() {
    let (_temp, engine) = setup(true);
    let plugin_dir = engine.join("Engine/Plugins/Developer/GitSourceControl");

    disable_stock_plugin(&engine).unwrap();
    enable_stock_plugin(&engine).unwrap();

    assert_eq!(stock_plugin_state(&engine), StockPluginState::Enabled);

    // Exactly the original manifest, no extra files left behind.
    let names: Vec<String> = fs::read_dir(plugin_dir.to_native())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["GitSourceControl.uplugin".to_string()]);
}

#[test]
fn disable_without_manifest_is_an_error() {
    let (_temp, engine) = setup(false);
    let err = disable_stock_plugin(&engine).unwrap_err();
    assert!(matches!(err, Error::ManifestMissing { .. }));
}

#[test]
fn enable_without_disabled_manifest_is_distinct_not_found() {
    let (_temp, engine) = setup(true);
    // Never disabled: nothing to restore, and the error says so.
    let err = enable_stock_plugin(&engine).unwrap_err();
    assert!(matches!(err, Error::NothingToRestore { .. }));
}
