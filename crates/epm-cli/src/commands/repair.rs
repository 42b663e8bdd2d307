//! `epm repair` - remediate a broken setup

use colored::Colorize;

use epm_core::Remediation;

use super::AppContext;
use crate::error::Result;

pub fn run_repair(ctx: &AppContext, version: &str) -> Result<()> {
    let (engine_path, version) = ctx.resolve_engine(version)?;

    println!("Repairing UE {}...", version.bold());
    let applied = ctx.reconciler.repair(&engine_path, &version)?;

    if applied.is_empty() {
        println!("Nothing to repair; setup is intact.");
        return Ok(());
    }

    for remediation in &applied {
        let text = match remediation {
            Remediation::RecreatedWorkingCopy => "recreated working copy",
            Remediation::RecreatedLink => "recreated plugin link",
            Remediation::Rebuilt => "rebuilt plugin binaries",
            Remediation::DisabledStockPlugin => "disabled stock Git plugin",
        };
        println!("  - {text}");
    }
    println!("{} UE {version} repaired", "ok".green().bold());
    Ok(())
}
