//! Version control adapter for Engine Plugin Manager
//!
//! One shared origin clone, one git worktree per engine version. All
//! operations run in-process through git2; directory-producing operations
//! verify their outcome on disk instead of trusting the library call.

pub mod error;
pub mod origin;
pub mod working_copy;

pub use error::{Error, Result};
pub use origin::Origin;
pub use working_copy::{UpdateInfo, WorkingCopies, engine_branch};
