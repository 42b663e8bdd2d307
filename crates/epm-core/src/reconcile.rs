//! The reconciliation engine.
//!
//! Drives install/update/repair/uninstall as idempotent transitions over
//! one target at a time. Each transition is a fixed sequence of calls
//! into the VCS adapter, the link manager and the build driver; the first
//! failing step aborts the remainder and surfaces a typed error. Batch
//! operations are bulkheaded: one broken target never blocks the others.

use epm_fs::NormalizedPath;
use epm_git::{Origin, WorkingCopies};
use epm_link::StockPluginState;

use crate::build::{BuildDriver, artifacts_exist};
use crate::config::{ManagedEngine, ManagerConfig};
use crate::discover::{Target, version_dir_name};
use crate::settings::Settings;
use crate::status::SetupStatus;
use crate::Result;

/// Outcome of an update transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Working copy already matches the remote tip; nothing was touched
    AlreadyCurrent { local_sha: String },
    /// Fast-forwarded and rebuilt
    Updated { commits_applied: usize },
}

/// A remediation applied by a repair transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remediation {
    RecreatedWorkingCopy,
    RecreatedLink,
    Rebuilt,
    DisabledStockPlugin,
}

/// The core state machine over discovered targets.
///
/// Single-threaded and synchronous by design: the origin clone is shared
/// mutable state, and serializing all transitions through one thread is
/// the locking discipline.
pub struct Reconciler {
    settings: Settings,
    origin: Origin,
    working_copies: WorkingCopies,
    build: Box<dyn BuildDriver>,
}

impl Reconciler {
    pub fn new(settings: Settings, build: Box<dyn BuildDriver>) -> Self {
        let origin = Origin::new(&settings.data_dir, settings.remote_url.clone());
        let working_copies = WorkingCopies::new(&settings.data_dir);
        Self {
            settings,
            origin,
            working_copies,
            build,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn working_copies(&self) -> &WorkingCopies {
        &self.working_copies
    }

    /// Derive the setup status for one target, fresh from disk.
    pub fn status(&self, engine_path: &NormalizedPath, version: &str) -> SetupStatus {
        let wc_path = self.working_copies.path(version);
        let working_copy_exists = self.working_copies.exists(version);

        let link = epm_link::link_path(engine_path);
        let link_exists = epm_link::link_exists(&link);
        let link_valid = link_exists && epm_link::verify_link(engine_path, &wc_path);

        let artifacts = working_copy_exists && artifacts_exist(&wc_path);
        let stock = epm_link::stock_plugin_state(engine_path);

        SetupStatus::derive(
            engine_path,
            version,
            working_copy_exists,
            link_exists,
            link_valid,
            artifacts,
            stock,
        )
    }

    /// Derive statuses for a batch of targets.
    pub fn statuses(&self, targets: &[Target]) -> Vec<SetupStatus> {
        targets
            .iter()
            .map(|t| self.status(&t.path, &t.version))
            .collect()
    }

    /// Install transition, from NeverSetUp.
    ///
    /// Origin clone → working copy → link → stock-plugin disable →
    /// build. The ManagedEngine record is written only after every step
    /// succeeded.
    pub fn install(&self, target: &Target, config: &mut ManagerConfig) -> Result<()> {
        tracing::info!(engine = %target.path, version = %target.version, "Installing");

        self.origin.ensure_cloned()?;

        let wc_path =
            self.working_copies
                .create(&self.origin, &target.version, &self.settings.branch)?;

        // The link must exist before building; the engine's tooling
        // probes the link destination.
        epm_link::create_link(&target.path, &wc_path)?;

        let mut disabled_by_tool = false;
        if epm_link::collision(&target.path) {
            epm_link::disable_stock_plugin(&target.path)?;
            disabled_by_tool = true;
        }

        self.build.build(&target.path, &wc_path)?;

        // A previous record may already carry the disabled flag; never
        // forget that we were the ones who disabled it.
        let previously_disabled = config
            .engine_by_path(target.path.as_str())
            .is_some_and(|e| e.stock_plugin_disabled_by_tool);

        config.upsert_engine(ManagedEngine {
            engine_path: target.path.as_str().to_string(),
            engine_version: target.version.clone(),
            working_copy_subdir: version_dir_name(&target.version),
            branch: self.settings.branch.clone(),
            plugin_link_path: epm_link::link_path(&target.path).as_str().to_string(),
            stock_plugin_disabled_by_tool: disabled_by_tool || previously_disabled,
        });
        Ok(())
    }

    /// Update transition, from Complete.
    ///
    /// Fetch → compare → fast-forward → stock-plugin re-disable →
    /// rebuild. A current working copy is a no-op and mutates nothing.
    pub fn update(&self, engine_path: &NormalizedPath, version: &str) -> Result<UpdateOutcome> {
        self.origin.fetch_all()?;

        let info =
            self.working_copies
                .update_info(&self.origin, version, &self.settings.branch)?;
        if info.commits_ahead == 0 {
            tracing::info!(version, "Already current");
            return Ok(UpdateOutcome::AlreadyCurrent {
                local_sha: info.local_sha,
            });
        }

        tracing::info!(
            version,
            commits = info.commits_ahead,
            compare = %info.compare_url,
            "Applying update"
        );
        self.working_copies.update(version, &self.settings.branch)?;

        if epm_link::collision(engine_path) {
            epm_link::disable_stock_plugin(engine_path)?;
        }

        let wc_path = self.working_copies.path(version);
        self.build.build(engine_path, &wc_path)?;

        Ok(UpdateOutcome::Updated {
            commits_applied: info.commits_ahead,
        })
    }

    /// Repair transition, from Broken.
    ///
    /// Applies only the remediations whose condition fails, in fixed
    /// order: working copy, link, binaries, stock plugin. A Complete
    /// target gets zero remediations. A wrong link is removed and
    /// recreated, never patched in place.
    pub fn repair(
        &self,
        engine_path: &NormalizedPath,
        version: &str,
    ) -> Result<Vec<Remediation>> {
        let status = self.status(engine_path, version);
        let mut applied = Vec::new();

        if !status.working_copy_exists {
            self.origin.ensure_cloned()?;
            self.working_copies
                .create(&self.origin, version, &self.settings.branch)?;
            applied.push(Remediation::RecreatedWorkingCopy);
        }

        let wc_path = self.working_copies.path(version);

        if !status.link_exists || !status.link_valid {
            epm_link::remove_link(&epm_link::link_path(engine_path))?;
            epm_link::create_link(engine_path, &wc_path)?;
            applied.push(Remediation::RecreatedLink);
        }

        if !status.artifacts_exist {
            self.build.build(engine_path, &wc_path)?;
            applied.push(Remediation::Rebuilt);
        }

        if status.stock_plugin == StockPluginState::Enabled {
            epm_link::disable_stock_plugin(engine_path)?;
            applied.push(Remediation::DisabledStockPlugin);
        }

        if applied.is_empty() {
            tracing::debug!(version, "Nothing to repair");
        } else {
            tracing::info!(version, remediations = applied.len(), "Repaired");
        }
        Ok(applied)
    }

    /// Uninstall transition, from Complete or Broken.
    ///
    /// Link → stock-plugin restore (only when this tool disabled it) →
    /// working copy → record. The origin is handled separately by
    /// [`Reconciler::remove_origin_if_unused`].
    pub fn uninstall(
        &self,
        engine_path: &NormalizedPath,
        version: &str,
        config: &mut ManagerConfig,
    ) -> Result<()> {
        tracing::info!(engine = %engine_path, version, "Uninstalling");

        epm_link::remove_link(&epm_link::link_path(engine_path))?;

        let disabled_by_tool = config
            .engine_by_path(engine_path.as_str())
            .is_some_and(|e| e.stock_plugin_disabled_by_tool);
        if disabled_by_tool {
            match epm_link::enable_stock_plugin(engine_path) {
                Ok(()) => {}
                // Someone already restored it by hand; not a failure.
                Err(epm_link::Error::NothingToRestore { .. }) => {
                    tracing::warn!(engine = %engine_path, "Stock plugin was already restored");
                }
                Err(e) => return Err(e.into()),
            }
        }

        self.working_copies.remove(&self.origin, version)?;

        config.remove_engine(engine_path.as_str());
        Ok(())
    }

    /// Remove the origin when no managed target still derives Complete.
    ///
    /// Returns whether the origin was removed. Run after uninstalls; the
    /// probe is live, not based on stale records.
    pub fn remove_origin_if_unused(&self, config: &ManagerConfig) -> Result<bool> {
        let any_complete = config.engines.iter().any(|e| {
            self.status(&NormalizedPath::new(&e.engine_path), &e.engine_version)
                .is_complete()
        });
        if any_complete {
            return Ok(false);
        }

        self.origin.remove()?;
        Ok(true)
    }

    /// Update every managed engine, bulkheaded per target.
    pub fn update_all(&self, config: &ManagerConfig) -> Vec<(ManagedEngine, Result<UpdateOutcome>)> {
        config
            .engines
            .iter()
            .map(|record| {
                let result = self.update(
                    &NormalizedPath::new(&record.engine_path),
                    &record.engine_version,
                );
                if let Err(e) = &result {
                    tracing::error!(
                        engine = %record.engine_path,
                        version = %record.engine_version,
                        error = %e,
                        "Update failed; continuing with remaining engines"
                    );
                }
                (record.clone(), result)
            })
            .collect()
    }
}
