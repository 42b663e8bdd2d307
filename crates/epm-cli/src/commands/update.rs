//! `epm update` - fast-forward working copies and rebuild

use colored::Colorize;

use epm_core::UpdateOutcome;

use super::AppContext;
use crate::error::{CliError, Result};

pub fn run_update(ctx: &mut AppContext, version: Option<&str>, all: bool) -> Result<()> {
    if all {
        return run_update_all(ctx);
    }

    let version =
        version.ok_or_else(|| CliError::user("Pass an engine version or --all"))?;
    let (engine_path, version) = ctx.resolve_engine(version)?;

    println!("Checking for updates for UE {}...", version.bold());
    let outcome = ctx.reconciler.update(&engine_path, &version)?;
    ctx.save()?;

    print_outcome(&version, &outcome);
    Ok(())
}

fn run_update_all(ctx: &mut AppContext) -> Result<()> {
    if ctx.config.engines.is_empty() {
        println!("No engines under management.");
        return Ok(());
    }

    let results = ctx.reconciler.update_all(&ctx.config);
    ctx.save()?;

    let mut failures = 0;
    for (record, result) in &results {
        match result {
            Ok(outcome) => print_outcome(&record.engine_version, outcome),
            Err(e) => {
                failures += 1;
                println!(
                    "{} UE {}: {e}",
                    "failed".red().bold(),
                    record.engine_version
                );
            }
        }
    }

    if failures > 0 {
        return Err(CliError::user(format!(
            "{failures} of {} engines failed to update",
            results.len()
        )));
    }
    Ok(())
}

fn print_outcome(version: &str, outcome: &UpdateOutcome) {
    match outcome {
        UpdateOutcome::AlreadyCurrent { local_sha } => {
            let short = &local_sha[..local_sha.len().min(8)];
            println!("UE {version} is already current ({short})");
        }
        UpdateOutcome::Updated { commits_applied } => {
            println!(
                "{} UE {version} updated ({commits_applied} commits applied)",
                "ok".green().bold()
            );
        }
    }
}
