//! `epm discover` - list discovered engine installations

use colored::Colorize;

use super::AppContext;
use crate::error::Result;

pub fn run_discover(ctx: &AppContext) -> Result<()> {
    let targets = ctx.discover();

    if targets.is_empty() {
        println!("No engine installations found.");
        return Ok(());
    }

    for target in targets {
        println!(
            "{} {}  {}",
            "UE".green().bold(),
            target.version.bold(),
            target.path
        );
    }
    Ok(())
}
