//! Engine Plugin Manager CLI
//!
//! Non-interactive driver over the reconciliation engine: discover,
//! classify, install, update, repair, uninstall.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    match cli.command {
        Some(cmd) => execute_command(cmd, cli.data_dir),
        None => {
            println!("{} Engine Plugin Manager", "epm".green().bold());
            println!();
            println!("Run {} for available commands.", "epm --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands, data_dir: Option<std::path::PathBuf>) -> Result<()> {
    let mut ctx = commands::AppContext::open(data_dir)?;

    match cmd {
        Commands::Discover => commands::run_discover(&ctx),
        Commands::Status { json } => commands::run_status(&ctx, json),
        Commands::Install { version } => commands::run_install(&mut ctx, &version),
        Commands::Update { version, all } => commands::run_update(&mut ctx, version.as_deref(), all),
        Commands::Repair { version } => commands::run_repair(&ctx, &version),
        Commands::Uninstall { version } => commands::run_uninstall(&mut ctx, &version),
        Commands::Roots { action } => commands::run_roots(&mut ctx, action),
    }
}
