//! `epm roots` - manage custom discovery roots

use epm_fs::NormalizedPath;

use super::AppContext;
use crate::cli::RootsAction;
use crate::error::{CliError, Result};

pub fn run_roots(ctx: &mut AppContext, action: RootsAction) -> Result<()> {
    match action {
        RootsAction::List => {
            if ctx.config.custom_engine_roots.is_empty() {
                println!("No custom roots configured.");
            }
            for root in &ctx.config.custom_engine_roots {
                println!("{root}");
            }
            Ok(())
        }
        RootsAction::Add { path } => {
            let root = NormalizedPath::new(&path);
            if !root.is_dir() {
                return Err(CliError::user(format!("Not a directory: {root}")));
            }
            let entry = root.as_str().to_string();
            if !ctx.config.custom_engine_roots.contains(&entry) {
                ctx.config.custom_engine_roots.push(entry);
                ctx.save()?;
            }
            println!("Added root {root}");
            Ok(())
        }
        RootsAction::Remove { path } => {
            let root = NormalizedPath::new(&path);
            let before = ctx.config.custom_engine_roots.len();
            ctx.config
                .custom_engine_roots
                .retain(|r| r != root.as_str());
            if ctx.config.custom_engine_roots.len() == before {
                return Err(CliError::user(format!("Root not configured: {root}")));
            }
            ctx.save()?;
            println!("Removed root {root}");
            Ok(())
        }
    }
}
