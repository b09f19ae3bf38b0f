use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Treeship - mirror a local project tree onto a remote host
#[derive(Parser, Debug)]
#[command(name = "treeship")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Mirror the configured roots and files to the remote host
    Mirror {
        /// Local source root the configured paths are relative to
        #[arg(short, long, default_value = ".")]
        source: PathBuf,

        /// Config file (default: treeship.toml under the source root)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Remote destination (host:/base/dir or user@host:/base/dir),
        /// overriding the [remote] section
        #[arg(long)]
        remote: Option<String>,

        /// Private key for ssh/scp, overriding remote.identity_file
        #[arg(long)]
        identity: Option<PathBuf>,

        /// Plan the transfer list without touching the remote host
        #[arg(long)]
        dry_run: bool,
    },
}
