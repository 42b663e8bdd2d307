//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Engine Plugin Manager - link a shared Git plugin into Unreal Engine installs
#[derive(Parser, Debug)]
#[command(name = "epm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Override the data directory (origin clone, working copies, config)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List discovered engine installations
    Discover,

    /// Show the setup status of every discovered engine
    Status {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Set up the plugin for an engine version
    Install {
        /// Engine version to install for (e.g. 5.4)
        version: String,
    },

    /// Update working copies to the latest upstream commits
    Update {
        /// Engine version to update
        version: Option<String>,

        /// Update every managed engine
        #[arg(long, conflicts_with = "version")]
        all: bool,
    },

    /// Repair a broken setup for an engine version
    Repair {
        /// Engine version to repair
        version: String,
    },

    /// Remove the plugin setup for an engine version
    Uninstall {
        /// Engine version to uninstall
        version: String,
    },

    /// Manage custom discovery roots
    Roots {
        #[command(subcommand)]
        action: RootsAction,
    },
}

/// Actions on the custom discovery roots
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum RootsAction {
    /// List custom roots
    List,
    /// Add a custom root
    Add { path: PathBuf },
    /// Remove a custom root
    Remove { path: PathBuf },
}
