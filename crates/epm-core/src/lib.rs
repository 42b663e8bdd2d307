//! Setup detection and reconciliation engine for Engine Plugin Manager
//!
//! This crate coordinates the lower layers into the core state machine:
//!
//! - **Discovery**: find engine installations and their versions
//! - **Status detection**: classify each installation's setup state from
//!   live filesystem and VCS state, fresh on every query
//! - **Reconciliation**: drive install/update/repair/uninstall as
//!   idempotent state transitions
//!
//! # Architecture
//!
//! `epm-core` sits above the leaf crates and below the CLI:
//!
//! ```text
//!           CLI
//!            |
//!        epm-core
//!            |
//!   +--------+--------+
//!   |        |        |
//! epm-fs  epm-git  epm-link
//! ```

pub mod build;
pub mod config;
pub mod discover;
pub mod error;
pub mod reconcile;
pub mod settings;
pub mod status;

pub use build::{BuildDriver, UatBuildDriver, artifacts_exist};
pub use config::{ManagedEngine, ManagerConfig};
pub use discover::{Target, compare_versions, discover};
pub use error::{Error, Result};
pub use reconcile::{Reconciler, Remediation, UpdateOutcome};
pub use settings::Settings;
pub use status::{SetupClass, SetupStatus};
