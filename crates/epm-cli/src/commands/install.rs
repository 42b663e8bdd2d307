//! `epm install` - set up the plugin for an engine version

use colored::Colorize;

use super::AppContext;
use crate::error::{CliError, Result};

pub fn run_install(ctx: &mut AppContext, version: &str) -> Result<()> {
    let target = ctx
        .discover()
        .into_iter()
        .find(|t| t.version == version)
        .ok_or_else(|| {
            CliError::user(format!("No engine installation found for version {version}"))
        })?;

    let status = ctx.reconciler.status(&target.path, &target.version);
    if status.is_complete() {
        println!("UE {version} is already set up.");
        return Ok(());
    }

    println!("Setting up UE {}...", version.bold());
    ctx.reconciler.install(&target, &mut ctx.config)?;
    ctx.save()?;

    println!("{} UE {version} setup complete", "ok".green().bold());
    Ok(())
}
