use epm_fs::NormalizedPath;
use epm_git::{Error, Origin, WorkingCopies, engine_branch};
use epm_test_utils::git::{add_commits, commit_file, upstream_with_commit};
use tempfile::TempDir;

struct Fixture {
    _temp: TempDir,
    upstream: git2::Repository,
    origin: Origin,
    working_copies: WorkingCopies,
}

fn setup() -> Fixture {
    let temp = TempDir::new().unwrap();
    let upstream_dir = temp.path().join("upstream");
    std::fs::create_dir(&upstream_dir).unwrap();
    let upstream = upstream_with_commit(&upstream_dir);

    let data_dir = NormalizedPath::new(temp.path().join("data"));
    let origin = Origin::new(&data_dir, NormalizedPath::new(&upstream_dir).as_str());
    origin.ensure_cloned().unwrap();
    let working_copies = WorkingCopies::new(&data_dir);

    Fixture {
        _temp: temp,
        upstream,
        origin,
        working_copies,
    }
}

#[test]
fn path_is_pure_computation() {
    let f = setup();
    let path = f.working_copies.path("5.4");
    assert!(path.as_str().ends_with("working-copies/UE_5.4"));
    assert!(!f.working_copies.exists("5.4"));
}

#[test]
fn create_checks_out_the_tracked_branch() {
    let f = setup();

    let path = f.working_copies.create(&f.origin, "5.4", "dev").unwrap();
    assert!(path.is_dir());
    assert!(f.working_copies.exists("5.4"));
    // Content from the upstream commit is present.
    assert!(path.join("GitSourceControl.uplugin").is_file());

    // The working copy sits on its per-version branch.
    let repo = git2::Repository::open(path.to_native()).unwrap();
    let head = repo.head().unwrap();
    assert_eq!(head.shorthand(), Some(engine_branch("5.4").as_str()));
}

#[test]
fn create_fails_on_occupied_path() {
    let f = setup();
    let path = f.working_copies.path("5.4");
    std::fs::create_dir_all(path.to_native()).unwrap();
    std::fs::write(path.join("occupied.txt").to_native(), b"x").unwrap();

    let err = f.working_copies.create(&f.origin, "5.4", "dev").unwrap_err();
    assert!(matches!(err, Error::WorkingCopyExists { .. }));
}

#[test]
fn create_requires_the_origin() {
    let f = setup();
    f.origin.remove().unwrap();

    let err = f.working_copies.create(&f.origin, "5.4", "dev").unwrap_err();
    assert!(matches!(err, Error::OriginMissing { .. }));
}

#[test]
fn update_info_reports_zero_when_current() {
    let f = setup();
    f.working_copies.create(&f.origin, "5.4", "dev").unwrap();

    let info = f
        .working_copies
        .update_info(&f.origin, "5.4", "dev")
        .unwrap();
    assert_eq!(info.commits_ahead, 0);
    assert_eq!(info.local_sha, info.remote_sha);
}

#[test]
fn update_info_counts_remote_commits() {
    let f = setup();
    f.working_copies.create(&f.origin, "5.4", "dev").unwrap();

    add_commits(&f.upstream, 3);
    f.origin.fetch_all().unwrap();

    let info = f
        .working_copies
        .update_info(&f.origin, "5.4", "dev")
        .unwrap();
    assert_eq!(info.commits_ahead, 3);
    assert_ne!(info.local_sha, info.remote_sha);
    assert!(info.compare_url.contains(&info.local_sha));
    assert!(info.compare_url.contains(&info.remote_sha));
}

#[test]
fn update_fast_forwards_to_remote_tip() {
    let f = setup();
    f.working_copies.create(&f.origin, "5.4", "dev").unwrap();

    add_commits(&f.upstream, 2);
    f.origin.fetch_all().unwrap();
    f.working_copies.update("5.4", "dev").unwrap();

    let info = f
        .working_copies
        .update_info(&f.origin, "5.4", "dev")
        .unwrap();
    assert_eq!(info.commits_ahead, 0);
    // The checked-out tree advanced too.
    assert!(f.working_copies.path("5.4").join("CHANGES.md").is_file());
}

#[test]
fn update_of_current_copy_is_a_noop() {
    let f = setup();
    let path = f.working_copies.create(&f.origin, "5.4", "dev").unwrap();

    let before = git2::Repository::open(path.to_native())
        .unwrap()
        .head()
        .unwrap()
        .peel_to_commit()
        .unwrap()
        .id();

    f.working_copies.update("5.4", "dev").unwrap();

    let after = git2::Repository::open(path.to_native())
        .unwrap()
        .head()
        .unwrap()
        .peel_to_commit()
        .unwrap()
        .id();
    assert_eq!(before, after);
}

#[test]
fn diverged_history_refuses_to_update() {
    let f = setup();
    let path = f.working_copies.create(&f.origin, "5.4", "dev").unwrap();

    // A hand-made local commit in the working copy...
    let wc_repo = git2::Repository::open(path.to_native()).unwrap();
    commit_file(&wc_repo, "local-edit.txt", "local\n", "Local edit");

    // ...while the remote moves on.
    add_commits(&f.upstream, 1);
    f.origin.fetch_all().unwrap();

    let err = f.working_copies.update("5.4", "dev").unwrap_err();
    assert!(matches!(err, Error::Diverged { .. }));

    // The local commit survived.
    assert!(path.join("local-edit.txt").is_file());
}

#[test]
fn update_of_missing_copy_is_not_found() {
    let f = setup();
    let err = f.working_copies.update("5.4", "dev").unwrap_err();
    assert!(matches!(err, Error::WorkingCopyNotFound { .. }));
}

#[test]
fn remove_deletes_directory_and_branch() {
    let f = setup();
    let path = f.working_copies.create(&f.origin, "5.4", "dev").unwrap();

    f.working_copies.remove(&f.origin, "5.4").unwrap();
    assert!(!path.exists());

    let repo = f.origin.open().unwrap();
    assert!(
        repo.find_branch(&engine_branch("5.4"), git2::BranchType::Local)
            .is_err()
    );

    // Removing again is a no-op.
    f.working_copies.remove(&f.origin, "5.4").unwrap();
}

#[test]
fn remove_falls_back_to_direct_deletion() {
    let f = setup();
    let path = f.working_copies.create(&f.origin, "5.4", "dev").unwrap();

    // With the origin gone every prune tier fails; the directory tier
    // must still clear the working copy.
    f.origin.remove().unwrap();
    f.working_copies.remove(&f.origin, "5.4").unwrap();
    assert!(!path.exists());
}
