//! Treeship CLI - mirror a local project tree onto a remote host
//!
//! Usage: treeship mirror [--source DIR] [--remote host:/base] [--dry-run]

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Mirror {
            source,
            config,
            remote,
            identity,
            dry_run,
        } => {
            let summary = commands::mirror::run(commands::mirror::MirrorArgs {
                source,
                config,
                remote,
                identity,
                dry_run,
                json: cli.json,
                verbose: cli.verbose,
            })?;

            // Partial failure must be visible to automation
            if !summary.is_success() {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
