//! End-to-end lifecycle scenarios
//!
//! Exercises the complete flow against a local upstream repository and a
//! fake build driver: install, drift detection, repair, update,
//! uninstall, and the persisted config along the way.

use std::cell::Cell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use epm_core::{
    BuildDriver, ManagerConfig, Reconciler, Remediation, Settings, Target, UpdateOutcome,
};
use epm_fs::NormalizedPath;
use epm_test_utils::engine::{add_stock_plugin, fake_engine_install, stage_artifacts};
use epm_test_utils::git::{add_commits, upstream_with_commit};
use tempfile::TempDir;

struct CountingBuild {
    builds: Rc<Cell<usize>>,
}

impl BuildDriver for CountingBuild {
    fn build(
        &self,
        _engine_root: &NormalizedPath,
        working_copy: &NormalizedPath,
    ) -> epm_core::Result<()> {
        self.builds.set(self.builds.get() + 1);
        stage_artifacts(&working_copy.to_native());
        Ok(())
    }
}

struct World {
    _temp: TempDir,
    data_dir: NormalizedPath,
    upstream: git2::Repository,
    engines_root: PathBuf,
    reconciler: Reconciler,
    builds: Rc<Cell<usize>>,
    config: ManagerConfig,
}

fn setup() -> World {
    let temp = TempDir::new().unwrap();

    let upstream_dir = temp.path().join("upstream");
    fs::create_dir(&upstream_dir).unwrap();
    let upstream = upstream_with_commit(&upstream_dir);

    let engines_root = temp.path().join("engines");
    fs::create_dir(&engines_root).unwrap();

    let data_dir = NormalizedPath::new(temp.path().join("data"));
    let mut settings = Settings::new(data_dir.clone());
    settings.remote_url = NormalizedPath::new(&upstream_dir).as_str().to_string();
    settings.default_engine_root = NormalizedPath::new(&engines_root);

    let builds = Rc::new(Cell::new(0));
    let reconciler = Reconciler::new(
        settings,
        Box::new(CountingBuild {
            builds: builds.clone(),
        }),
    );

    World {
        _temp: temp,
        data_dir,
        upstream,
        engines_root,
        reconciler,
        builds,
        config: ManagerConfig::default(),
    }
}

fn add_engine(world: &World, version: &str) -> Target {
    let path = fake_engine_install(&world.engines_root, version);
    add_stock_plugin(&path);
    Target {
        path: NormalizedPath::new(path),
        version: version.into(),
        valid: true,
    }
}

/// Remove the link the way an outside actor would, without going through
/// the link manager.
fn tamper_remove_link(link: &NormalizedPath) {
    let native = link.to_native();
    let _ = fs::remove_file(&native);
    let _ = fs::remove_dir(&native);
    assert!(fs::symlink_metadata(&native).is_err(), "link not removed");
}

#[test]
fn install_produces_the_documented_layout() {
    let mut world = setup();
    let target = add_engine(&world, "5.4");

    world.reconciler.install(&target, &mut world.config).unwrap();

    // Fixed data-directory layout.
    assert!(world.data_dir.join("origin").join(".git").exists());
    assert!(world.data_dir.join("working-copies/UE_5.4").is_dir());

    // Link inside the engine, resolving to the working copy.
    let link = target.path.join("Engine/Plugins/UEGitPlugin_PB");
    assert!(epm_link::link_exists(&link));
    assert!(epm_link::verify_link(
        &target.path,
        &world.data_dir.join("working-copies/UE_5.4")
    ));

    let status = world.reconciler.status(&target.path, "5.4");
    assert!(status.is_complete());

    // Config survives a save/load round trip with the record intact.
    world.config.save(&world.data_dir).unwrap();
    let reloaded = ManagerConfig::load_or_default(&world.data_dir).unwrap();
    assert_eq!(reloaded.engines.len(), 1);
    assert_eq!(reloaded.engines[0].engine_version, "5.4");
}

#[test]
fn externally_deleted_link_is_detected_and_repaired() {
    let mut world = setup();
    let target = add_engine(&world, "5.4");
    world.reconciler.install(&target, &mut world.config).unwrap();

    tamper_remove_link(&epm_link::link_path(&target.path));

    let status = world.reconciler.status(&target.path, "5.4");
    assert_eq!(status.issues(), ["plugin link does not exist"]);

    let wc_path = world.reconciler.working_copies().path("5.4");
    let sha_before = head_sha(&wc_path);

    let applied = world.reconciler.repair(&target.path, "5.4").unwrap();
    assert_eq!(applied, vec![Remediation::RecreatedLink]);

    // Link-only fault: no re-clone, no rebuild.
    assert_eq!(world.builds.get(), 1);
    assert_eq!(head_sha(&wc_path), sha_before);
    assert!(world.reconciler.status(&target.path, "5.4").is_complete());
}

#[test]
fn update_moves_head_to_remote_and_rebuilds_exactly_once() {
    let mut world = setup();
    let target = add_engine(&world, "5.4");
    world.reconciler.install(&target, &mut world.config).unwrap();

    add_commits(&world.upstream, 3);

    // Before: 3 commits behind.
    world.reconciler.origin().fetch_all().unwrap();
    let info = world
        .reconciler
        .working_copies()
        .update_info(world.reconciler.origin(), "5.4", "dev")
        .unwrap();
    assert_eq!(info.commits_ahead, 3);

    let outcome = world.reconciler.update(&target.path, "5.4").unwrap();
    assert_eq!(outcome, UpdateOutcome::Updated { commits_applied: 3 });
    assert_eq!(world.builds.get(), 2);

    // After: current, with HEAD equal to the remote tip.
    let info = world
        .reconciler
        .working_copies()
        .update_info(world.reconciler.origin(), "5.4", "dev")
        .unwrap();
    assert_eq!(info.commits_ahead, 0);

    let remote = world
        .upstream
        .head()
        .unwrap()
        .peel_to_commit()
        .unwrap()
        .id()
        .to_string();
    assert_eq!(head_sha(&world.reconciler.working_copies().path("5.4")), remote);
}

#[test]
fn uninstalling_the_last_target_removes_the_origin() {
    let mut world = setup();
    let first = add_engine(&world, "5.4");
    let second = add_engine(&world, "5.5");
    world.reconciler.install(&first, &mut world.config).unwrap();
    world.reconciler.install(&second, &mut world.config).unwrap();

    world
        .reconciler
        .uninstall(&first.path, "5.4", &mut world.config)
        .unwrap();
    assert!(!world.reconciler.remove_origin_if_unused(&world.config).unwrap());
    assert!(world.data_dir.join("origin").exists());

    world
        .reconciler
        .uninstall(&second.path, "5.5", &mut world.config)
        .unwrap();
    assert!(world.reconciler.remove_origin_if_unused(&world.config).unwrap());
    assert!(!world.data_dir.join("origin").exists());

    // Both engines restored and forgotten.
    assert!(world.config.engines.is_empty());
    assert!(!epm_link::link_exists(&epm_link::link_path(&first.path)));
    assert!(!epm_link::link_exists(&epm_link::link_path(&second.path)));
}

fn head_sha(path: &NormalizedPath) -> String {
    git2::Repository::open(path.to_native())
        .unwrap()
        .head()
        .unwrap()
        .peel_to_commit()
        .unwrap()
        .id()
        .to_string()
}
