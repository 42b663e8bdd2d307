//! `epm uninstall` - remove the setup for an engine version

use colored::Colorize;

use super::AppContext;
use crate::error::Result;

pub fn run_uninstall(ctx: &mut AppContext, version: &str) -> Result<()> {
    let (engine_path, version) = ctx.resolve_engine(version)?;

    println!("Uninstalling UE {}...", version.bold());
    ctx.reconciler
        .uninstall(&engine_path, &version, &mut ctx.config)?;

    if ctx.reconciler.remove_origin_if_unused(&ctx.config)? {
        println!("Last managed engine removed; origin clone deleted.");
    }

    ctx.save()?;
    println!("{} UE {version} uninstalled", "ok".green().bold());
    Ok(())
}
