use epm_fs::NormalizedPath;
use epm_git::{Error, Origin};
use epm_test_utils::git::{add_commits, upstream_with_commit};
use tempfile::TempDir;

fn setup() -> (TempDir, git2::Repository, Origin) {
    let temp = TempDir::new().unwrap();
    let upstream_dir = temp.path().join("upstream");
    std::fs::create_dir(&upstream_dir).unwrap();
    let upstream = upstream_with_commit(&upstream_dir);

    let data_dir = NormalizedPath::new(temp.path().join("data"));
    let origin = Origin::new(&data_dir, NormalizedPath::new(&upstream_dir).as_str());
    (temp, upstream, origin)
}

#[test]
fn ensure_cloned_creates_the_clone() {
    let (_temp, _upstream, origin) = setup();

    assert!(!origin.is_cloned());
    origin.ensure_cloned().unwrap();
    assert!(origin.is_cloned());
    assert!(origin.dir().join(".git").exists());
}

#[test]
fn ensure_cloned_is_a_noop_when_present() {
    let (_temp, _upstream, origin) = setup();

    origin.ensure_cloned().unwrap();
    // Second call must not re-clone or fail.
    origin.ensure_cloned().unwrap();
    assert!(origin.is_cloned());
}

#[test]
fn clone_failure_is_surfaced() {
    let temp = TempDir::new().unwrap();
    let data_dir = NormalizedPath::new(temp.path().join("data"));
    let origin = Origin::new(&data_dir, "/nonexistent/upstream/repo");

    let err = origin.ensure_cloned().unwrap_err();
    assert!(matches!(err, Error::CloneFailed { .. }));
}

#[test]
fn open_without_clone_is_origin_missing() {
    let temp = TempDir::new().unwrap();
    let data_dir = NormalizedPath::new(temp.path().join("data"));
    let origin = Origin::new(&data_dir, "unused");

    let err = origin.open().err().expect("expected open to fail");
    assert!(matches!(err, Error::OriginMissing { .. }));
}

#[test]
fn default_branch_resolves_from_remote_head() {
    let (_temp, _upstream, origin) = setup();
    origin.ensure_cloned().unwrap();

    assert_eq!(origin.resolve_default_branch(), "dev");
}

#[test]
fn default_branch_falls_back_when_origin_missing() {
    let temp = TempDir::new().unwrap();
    let data_dir = NormalizedPath::new(temp.path().join("data"));
    let origin = Origin::new(&data_dir, "/nonexistent/upstream/repo");

    // Query cannot succeed; the fallback must come back instead of an error.
    assert_eq!(origin.resolve_default_branch(), "dev");
}

#[test]
fn fetch_all_picks_up_new_upstream_commits() {
    let (_temp, upstream, origin) = setup();
    origin.ensure_cloned().unwrap();

    let before = origin.remote_tracking_commit("dev").unwrap();
    add_commits(&upstream, 2);
    origin.fetch_all().unwrap();
    let after = origin.remote_tracking_commit("dev").unwrap();

    assert_ne!(before, after);
    assert_eq!(after, upstream.head().unwrap().peel_to_commit().unwrap().id());
}

#[test]
fn remove_deletes_the_clone_and_tolerates_absence() {
    let (_temp, _upstream, origin) = setup();
    origin.ensure_cloned().unwrap();

    origin.remove().unwrap();
    assert!(!origin.is_cloned());
    assert!(!origin.dir().exists());

    // Absent origin is a no-op, not an error.
    origin.remove().unwrap();
}
