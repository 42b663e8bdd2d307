//! Filesystem abstraction for Engine Plugin Manager
//!
//! Provides normalized path handling, atomic config I/O, and the fixed
//! path-layout constants shared by the other crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use constants::{DataPath, EnginePath};
pub use error::{Error, Result};
pub use path::NormalizedPath;
