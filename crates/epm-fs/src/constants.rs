//! Fixed filesystem layout constants.
//!
//! The data-directory layout and the engine-relative paths are a
//! compatibility contract with previously persisted state; they must not
//! drift between releases.

use std::path::Path;

/// Entries under the tool's data directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataPath {
    /// The shared origin clone
    Origin,
    /// Root of the per-version working copies
    WorkingCopies,
    /// The persisted manager configuration
    ConfigFile,
}

impl DataPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Origin => "origin",
            Self::WorkingCopies => "working-copies",
            Self::ConfigFile => "config.json",
        }
    }
}

/// Well-known paths relative to an engine installation root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePath {
    /// Directory the plugin link is created in
    PluginsDir,
    /// The editor executable that marks a valid installation
    Executable,
    /// Version manifest consulted when the directory name gives no version
    BuildVersion,
    /// Directory of the engine-bundled Git plugin
    StockPluginDir,
    /// The UAT batch file used to build the plugin
    BuildTool,
}

impl EnginePath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PluginsDir => "Engine/Plugins",
            Self::Executable => "Engine/Binaries/Win64/UnrealEditor.exe",
            Self::BuildVersion => "Engine/Build/Build.version",
            Self::StockPluginDir => "Engine/Plugins/Developer/GitSourceControl",
            Self::BuildTool => "Engine/Build/BatchFiles/RunUAT.bat",
        }
    }
}

impl AsRef<Path> for DataPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<Path> for EnginePath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl std::fmt::Display for DataPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::fmt::Display for EnginePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Directory-name prefix shared by engine installs and working copies
/// (`UE_5.4`).
pub const VERSION_DIR_PREFIX: &str = "UE_";

/// Name of the plugin link created under [`EnginePath::PluginsDir`].
pub const PLUGIN_LINK_NAME: &str = "UEGitPlugin_PB";

/// Manifest file of the engine-bundled Git plugin.
pub const STOCK_PLUGIN_MANIFEST: &str = "GitSourceControl.uplugin";

/// Suffix appended to the stock manifest to disable it.
pub const DISABLED_SUFFIX: &str = ".disabled";

/// Plugin manifest inside a working copy, fed to the build tool.
pub const PLUGIN_MANIFEST: &str = "GitSourceControl.uplugin";

/// Built-artifact directory relative to a working copy.
pub const BINARIES_SUBDIR: &str = "Binaries/Win64";

/// Files that must exist under [`BINARIES_SUBDIR`] for the plugin to load.
pub const REQUIRED_ARTIFACTS: &[&str] =
    &["UnrealEditor-GitSourceControl.dll", "UnrealEditor.modules"];

/// Packaged build output directory inside a working copy.
pub const BUILD_OUTPUT_DIR: &str = "_Built";

/// The single upstream repository this tool manages.
pub const DEFAULT_REMOTE_URL: &str = "https://github.com/ProjectBorealis/UEGitPlugin";

/// Branch tracked when the remote does not advertise one.
pub const DEFAULT_BRANCH: &str = "dev";

/// Default root scanned for engine installations.
pub const DEFAULT_ENGINE_ROOT: &str = r"C:\Program Files\Epic Games";
