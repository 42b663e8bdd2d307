//! Plugin build driver.
//!
//! The build is a black-box collaborator with a narrow contract: given an
//! engine root and a working copy, either the binaries appear under
//! `Binaries/Win64` in the working copy or the step fails. Staging is
//! verified on disk; a clean exit status alone is not believed.

use std::fs;
use std::path::Path;
use std::process::Command;

use epm_fs::constants::{BINARIES_SUBDIR, BUILD_OUTPUT_DIR, PLUGIN_MANIFEST, REQUIRED_ARTIFACTS};
use epm_fs::{EnginePath, NormalizedPath};

use crate::{Error, Result};

/// Seam for the engine's native build step.
///
/// Production uses [`UatBuildDriver`]; tests substitute a fake that
/// writes the expected artifact files.
pub trait BuildDriver {
    /// Build the plugin in `working_copy` against the engine at
    /// `engine_root` and stage the binaries back into the working copy.
    fn build(&self, engine_root: &NormalizedPath, working_copy: &NormalizedPath) -> Result<()>;
}

/// Whether the built artifacts are present in a working copy.
pub fn artifacts_exist(working_copy: &NormalizedPath) -> bool {
    let binaries = working_copy.join(BINARIES_SUBDIR);
    binaries.is_dir()
        && REQUIRED_ARTIFACTS
            .iter()
            .all(|name| binaries.join(name).is_file())
}

/// Build driver invoking the engine's UAT `BuildPlugin` step.
pub struct UatBuildDriver;

impl BuildDriver for UatBuildDriver {
    fn build(&self, engine_root: &NormalizedPath, working_copy: &NormalizedPath) -> Result<()> {
        let uat = engine_root.join(EnginePath::BuildTool.as_str());
        if !uat.is_file() {
            return Err(Error::ToolUnavailable {
                path: uat.to_native(),
            });
        }

        let manifest = working_copy.join(PLUGIN_MANIFEST);
        if !manifest.is_file() {
            return Err(Error::ManifestMissing {
                path: manifest.to_native(),
            });
        }

        let build_out = working_copy.join(BUILD_OUTPUT_DIR);
        let _ = fs::remove_dir_all(build_out.to_native());

        tracing::info!(engine = %engine_root, working_copy = %working_copy, "Building plugin");
        let output = Command::new(uat.to_native())
            .arg("BuildPlugin")
            .arg(format!("-Plugin={}", manifest.to_native().display()))
            .arg(format!("-Package={}", build_out.to_native().display()))
            .arg("-Rocket")
            .arg("-TargetPlatforms=Win64")
            .current_dir(engine_root.to_native())
            .output()
            .map_err(|e| Error::io(uat.to_native(), e))?;

        if !output.status.success() {
            return Err(Error::BuildFailed {
                status: output.status.to_string(),
                output: format!(
                    "{}{}",
                    String::from_utf8_lossy(&output.stdout),
                    String::from_utf8_lossy(&output.stderr)
                ),
            });
        }

        // Binaries appear at the documented packaged location only.
        let staged_src = build_out.join(BINARIES_SUBDIR);
        let staged_dst = working_copy.join(BINARIES_SUBDIR);
        copy_dir(&staged_src.to_native(), &staged_dst.to_native())?;

        if !artifacts_exist(working_copy) {
            return Err(Error::ArtifactsMissing {
                path: staged_dst.to_native(),
            });
        }
        Ok(())
    }
}

fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst).map_err(|e| Error::io(dst, e))?;

    let entries = fs::read_dir(src).map_err(|e| Error::io(src, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(src, e))?;
        let target = dst.join(entry.file_name());
        let file_type = entry.file_type().map_err(|e| Error::io(entry.path(), e))?;

        if file_type.is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| Error::io(entry.path(), e))?;
        }
    }
    Ok(())
}
