//! Directory symlink operations.
//!
//! One primitive (the OS's native directory symlink) and one detection
//! strategy (`symlink_metadata` plus `read_link`). Creation is judged by
//! inspecting the filesystem afterwards, never by the creation call's
//! return value alone: link tooling has been observed reporting failure
//! on races that actually succeeded.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use epm_fs::constants::PLUGIN_LINK_NAME;
use epm_fs::{EnginePath, NormalizedPath};

use crate::{Error, Result};

#[cfg(unix)]
fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}

/// Path of the plugin link inside an engine installation.
pub fn link_path(engine_root: &NormalizedPath) -> NormalizedPath {
    engine_root
        .join(EnginePath::PluginsDir.as_str())
        .join(PLUGIN_LINK_NAME)
}

/// Link-aware existence check.
///
/// A link whose destination has been deleted still exists *as a link*;
/// `symlink_metadata` does not follow, and a readable link target
/// corroborates the file-type bit.
pub fn link_exists(path: &NormalizedPath) -> bool {
    let native = path.to_native();
    match fs::symlink_metadata(&native) {
        Err(_) => false,
        Ok(meta) => meta.file_type().is_symlink() || fs::read_link(&native).is_ok(),
    }
}

/// Read the link's target, resolving a relative target against the link's
/// parent directory.
pub fn resolved_target(link: &NormalizedPath) -> Option<NormalizedPath> {
    let raw = fs::read_link(link.to_native()).ok()?;
    if raw.is_absolute() {
        Some(NormalizedPath::new(raw))
    } else {
        let parent = link.to_native();
        let parent = parent.parent()?;
        Some(NormalizedPath::new(parent.join(raw)))
    }
}

fn link_is_correct(link: &NormalizedPath, expected: &NormalizedPath) -> bool {
    link_exists(link)
        && resolved_target(link).is_some_and(|t| t.canonical() == expected.canonical())
}

/// Whether the engine's plugin link exists and resolves to the expected
/// working copy (canonicalized comparison on both sides).
pub fn verify_link(engine_root: &NormalizedPath, expected: &NormalizedPath) -> bool {
    link_is_correct(&link_path(engine_root), expected)
}

/// Create the plugin link for an engine installation.
///
/// Idempotent: an existing link that already resolves to `working_copy`
/// is left alone. A stale link or a non-link occupant at the destination
/// is removed first — once management begins this tool owns that path.
/// One retry, then a failure that distinguishes missing target,
/// permissions, and the rest.
pub fn create_link(engine_root: &NormalizedPath, working_copy: &NormalizedPath) -> Result<()> {
    let plugins_dir = engine_root.join(EnginePath::PluginsDir.as_str());
    let link = link_path(engine_root);

    if !has_write_access(&plugins_dir) {
        return Err(Error::PermissionDenied {
            path: plugins_dir.to_native(),
        });
    }

    if link_exists(&link) {
        if link_is_correct(&link, working_copy) {
            tracing::debug!(link = %link, "Link already resolves to working copy");
            return Ok(());
        }
        tracing::debug!(link = %link, "Removing stale link");
        remove_link(&link)?;
    } else if fs::symlink_metadata(link.to_native()).is_ok() {
        // Not a link, but something occupies the slot.
        remove_occupant(&link)?;
    }

    if !working_copy.exists() {
        return Err(Error::TargetMissing {
            path: working_copy.to_native(),
        });
    }

    let mut last_error: Option<std::io::Error> = None;
    for attempt in 0..2 {
        match symlink_dir(&working_copy.to_native(), &link.to_native()) {
            Ok(()) => {}
            Err(e) => {
                tracing::debug!(attempt, link = %link, error = %e, "Link creation reported an error");
                last_error = Some(e);
            }
        }

        // The filesystem is the source of truth, whatever the call said.
        if link_is_correct(&link, working_copy) {
            return Ok(());
        }

        let _ = remove_link(&link);
    }

    Err(match last_error {
        Some(e) if e.kind() == ErrorKind::PermissionDenied => Error::PermissionDenied {
            path: plugins_dir.to_native(),
        },
        _ if !working_copy.exists() => Error::TargetMissing {
            path: working_copy.to_native(),
        },
        Some(e) => Error::CreationFailed {
            path: link.to_native(),
            message: e.to_string(),
        },
        None => Error::CreationFailed {
            path: link.to_native(),
            message: "link did not verify after creation".into(),
        },
    })
}

/// Remove the link at `path`, verifying it is gone afterwards.
///
/// No-op when nothing link-like occupies the path. Removal escalates:
/// file unlink, directory unlink, recursive removal.
pub fn remove_link(path: &NormalizedPath) -> Result<()> {
    if !link_exists(path) {
        return Ok(());
    }

    let native = path.to_native();
    if fs::remove_file(&native).is_err()
        && fs::remove_dir(&native).is_err()
        && let Err(e) = fs::remove_dir_all(&native)
    {
        tracing::warn!(path = %path, error = %e, "All link removal attempts failed");
    }

    if fs::symlink_metadata(&native).is_ok() {
        return Err(Error::StillExists { path: native });
    }
    Ok(())
}

fn remove_occupant(path: &NormalizedPath) -> Result<()> {
    let native = path.to_native();
    let meta = match fs::symlink_metadata(&native) {
        Ok(m) => m,
        Err(_) => return Ok(()),
    };

    tracing::debug!(path = %path, "Removing non-link occupant from link slot");
    let removed = if meta.is_dir() {
        fs::remove_dir_all(&native)
    } else {
        fs::remove_file(&native)
    };
    removed.map_err(|e| Error::io(&native, e))?;

    if fs::symlink_metadata(&native).is_ok() {
        return Err(Error::StillExists { path: native });
    }
    Ok(())
}

fn has_write_access(dir: &NormalizedPath) -> bool {
    let probe = dir.join(".epm-write-test");
    match fs::File::create(probe.to_native()) {
        Ok(file) => {
            drop(file);
            let _ = fs::remove_file(probe.to_native());
            true
        }
        Err(_) => false,
    }
}
