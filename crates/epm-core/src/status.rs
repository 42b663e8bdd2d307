//! Derived setup status.
//!
//! A status is a snapshot of live filesystem and VCS state plus its
//! classification. It is recomputed on every query and never cached:
//! any step (a failed build, a half-created link) can change it.

use serde::Serialize;

use epm_fs::NormalizedPath;
use epm_link::StockPluginState;

/// Classification of one target's setup.
///
/// The issue list only exists in the `Broken` arm, so a "complete setup
/// with issues" cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SetupClass {
    /// Nothing exists yet; the expected starting point, not a fault
    NeverSetUp,
    /// Some but not all completeness conditions hold
    Broken { issues: Vec<String> },
    /// Every completeness condition holds
    Complete,
}

/// Snapshot of one target's setup state.
#[derive(Debug, Clone, Serialize)]
pub struct SetupStatus {
    pub engine_path: String,
    pub engine_version: String,
    pub working_copy_exists: bool,
    pub link_exists: bool,
    pub link_valid: bool,
    pub artifacts_exist: bool,
    pub stock_plugin: StockPluginState,
    #[serde(flatten)]
    pub class: SetupClass,
}

impl SetupStatus {
    /// Derive the classification from the five completeness conditions.
    pub(crate) fn derive(
        engine_path: &NormalizedPath,
        engine_version: &str,
        working_copy_exists: bool,
        link_exists: bool,
        link_valid: bool,
        artifacts_exist: bool,
        stock_plugin: StockPluginState,
    ) -> Self {
        let complete = working_copy_exists
            && link_exists
            && link_valid
            && artifacts_exist
            && stock_plugin != StockPluginState::Enabled;

        let class = if !working_copy_exists && !link_exists {
            SetupClass::NeverSetUp
        } else if !complete {
            let mut issues = Vec::new();
            if !working_copy_exists {
                issues.push("working copy does not exist".to_string());
            }
            if !link_exists {
                issues.push("plugin link does not exist".to_string());
            } else if !link_valid {
                issues.push("plugin link points to an incorrect location".to_string());
            }
            if !artifacts_exist {
                issues.push("plugin binaries not found in working copy".to_string());
            }
            if stock_plugin == StockPluginState::Enabled {
                issues.push("stock Git plugin is still enabled".to_string());
            }
            SetupClass::Broken { issues }
        } else {
            SetupClass::Complete
        };

        Self {
            engine_path: engine_path.as_str().to_string(),
            engine_version: engine_version.to_string(),
            working_copy_exists,
            link_exists,
            link_valid,
            artifacts_exist,
            stock_plugin,
            class,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.class, SetupClass::Complete)
    }

    pub fn is_never_set_up(&self) -> bool {
        matches!(self.class, SetupClass::NeverSetUp)
    }

    /// Issues for a broken setup; empty otherwise.
    pub fn issues(&self) -> &[String] {
        match &self.class {
            SetupClass::Broken { issues } => issues,
            _ => &[],
        }
    }
}
