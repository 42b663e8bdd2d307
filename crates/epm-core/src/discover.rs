//! Engine installation discovery.
//!
//! A pure read-only walk: no side effects, unreadable directories are
//! skipped silently. Everything downstream re-derives state from disk, so
//! discovery results are never cached or persisted as-is.

use std::cmp::Ordering;
use std::fs;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use epm_fs::constants::VERSION_DIR_PREFIX;
use epm_fs::{EnginePath, NormalizedPath};

/// A discovered engine installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Absolute installation path (the identity of the target)
    pub path: NormalizedPath,
    /// Version identifier, e.g. `"5.4"`, or `"unknown"`
    pub version: String,
    /// Whether the marker executable is present
    pub valid: bool,
}

fn candidate_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^UE_(\d+\.\d+)").expect("static pattern"))
}

/// Version fields of `Engine/Build/Build.version`.
#[derive(Debug, Deserialize)]
struct BuildVersion {
    #[serde(rename = "MajorVersion")]
    major_version: i64,
    #[serde(rename = "MinorVersion")]
    minor_version: i64,
}

/// Scan the default root plus each custom root for engine installations.
///
/// Only valid candidates are returned, deduplicated by absolute path and
/// sorted ascending by version.
pub fn discover(default_root: &NormalizedPath, custom_roots: &[NormalizedPath]) -> Vec<Target> {
    let mut found: Vec<Target> = Vec::new();

    for root in std::iter::once(default_root).chain(custom_roots.iter()) {
        scan_root(root, 1, &mut found);
    }

    // A target reachable from two roots counts once.
    let mut seen = std::collections::HashSet::new();
    let mut targets: Vec<Target> = found
        .into_iter()
        .filter(|t| t.valid)
        .filter(|t| seen.insert(t.path.canonical().as_str().to_string()))
        .collect();

    targets.sort_by(|a, b| compare_versions(&a.version, &b.version));
    targets
}

fn scan_root(dir: &NormalizedPath, depth: usize, out: &mut Vec<Target>) {
    const MAX_DEPTH: usize = 2;

    let entries = match fs::read_dir(dir.to_native()) {
        Ok(entries) => entries,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(_) => continue,
        };
        if !file_type.is_dir() {
            continue;
        }

        let name = entry.file_name();
        let name = name.to_string_lossy();
        let path = NormalizedPath::new(entry.path());

        if candidate_pattern().is_match(&name) {
            out.push(Target {
                version: extract_version(&path),
                valid: validate(&path),
                path,
            });
        } else if depth < MAX_DEPTH {
            scan_root(&path, depth + 1, out);
        }
    }
}

fn validate(engine_root: &NormalizedPath) -> bool {
    engine_root.join(EnginePath::Executable.as_str()).is_file()
}

/// Extract the version identifier for an installation.
///
/// Prefers the directory name (`UE_5.4`), falls back to the
/// `Build.version` manifest, and gives up with `"unknown"`.
fn extract_version(engine_root: &NormalizedPath) -> String {
    if let Some(name) = engine_root.file_name()
        && let Some(captures) = candidate_pattern().captures(name)
    {
        return captures[1].to_string();
    }

    let manifest = engine_root.join(EnginePath::BuildVersion.as_str());
    if let Ok(content) = fs::read_to_string(manifest.to_native())
        && let Ok(parsed) = serde_json::from_str::<BuildVersion>(&content)
    {
        return format!("{}.{}", parsed.major_version, parsed.minor_version);
    }

    "unknown".to_string()
}

/// Compare two dot-separated version identifiers.
///
/// Components compare numerically (`"5.10" > "5.4"`); a non-numeric
/// component pair falls back to string comparison of just that pair; the
/// shorter operand is lower only when all shared components are equal.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let parts_a: Vec<&str> = a.split('.').collect();
    let parts_b: Vec<&str> = b.split('.').collect();

    for i in 0..parts_a.len().max(parts_b.len()) {
        match (parts_a.get(i), parts_b.get(i)) {
            (Some(x), Some(y)) => {
                let ordering = match (x.parse::<u64>(), y.parse::<u64>()) {
                    (Ok(nx), Ok(ny)) => nx.cmp(&ny),
                    _ => x.cmp(y),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(_), None) => return Ordering::Greater,
            (None, Some(_)) => return Ordering::Less,
            (None, None) => break,
        }
    }
    Ordering::Equal
}

/// Working-copy directory name for a version (`UE_5.4`).
pub fn version_dir_name(version: &str) -> String {
    format!("{VERSION_DIR_PREFIX}{version}")
}
