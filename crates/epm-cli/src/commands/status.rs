//! `epm status` - per-engine setup classification

use colored::Colorize;

use epm_core::{SetupClass, SetupStatus};

use super::AppContext;
use crate::error::Result;

pub fn run_status(ctx: &AppContext, json: bool) -> Result<()> {
    let targets = ctx.discover();
    let statuses = ctx.reconciler.statuses(&targets);

    if json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }

    if statuses.is_empty() {
        println!("No engine installations found.");
        return Ok(());
    }

    for status in &statuses {
        print_status(status);
        println!();
    }
    Ok(())
}

fn print_status(status: &SetupStatus) {
    let label = match &status.class {
        SetupClass::Complete => "Complete".green().bold(),
        SetupClass::NeverSetUp => "Not set up".yellow(),
        SetupClass::Broken { .. } => "Broken".red().bold(),
    };
    println!(
        "{} {}  [{}]",
        "UE".bold(),
        status.engine_version.bold(),
        label
    );
    println!("  path:         {}", status.engine_path);
    println!("  working copy: {}", yes_no(status.working_copy_exists));
    if status.link_exists {
        println!(
            "  link:         {}",
            if status.link_valid {
                "yes (valid)".to_string()
            } else {
                "yes (wrong target)".to_string()
            }
        );
    } else {
        println!("  link:         no");
    }
    println!("  binaries:     {}", yes_no(status.artifacts_exist));
    println!("  stock plugin: {}", status.stock_plugin);

    let issues = status.issues();
    if !issues.is_empty() {
        println!("  issues:");
        for issue in issues {
            println!("    - {issue}");
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
