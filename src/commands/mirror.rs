//! `treeship mirror` - run the sync engine against the configured remote

use std::path::PathBuf;

use anyhow::Result;

use treeship::config::{Config, MirrorConfig};
use treeship::sync::{RunSummary, SshTransport, SyncEngine, SyncEngineOptions, SyncEvent};

/// Arguments resolved from the CLI
pub struct MirrorArgs {
    pub source: PathBuf,
    pub config: Option<PathBuf>,
    pub remote: Option<String>,
    pub identity: Option<PathBuf>,
    pub dry_run: bool,
    pub json: bool,
    pub verbose: u8,
}

pub fn run(args: MirrorArgs) -> Result<RunSummary> {
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| args.source.join("treeship.toml"));
    let config = Config::load(&config_path)?;

    let mirror = MirrorConfig::resolve(
        config,
        args.source.clone(),
        args.remote.as_deref(),
        args.identity.clone(),
    )?;

    if !args.json {
        println!("📦 Treeship Mirror");
        println!("Source: {}", mirror.source_root.display());
        println!("Remote: {}:{}", mirror.host, mirror.base_dir);
        if args.dry_run {
            println!("Mode: Dry run");
        }
        println!();
    }

    let transport = SshTransport::new(&mirror.host, mirror.identity_file.clone());
    let options = SyncEngineOptions {
        dry_run: args.dry_run,
    };
    let mut engine = SyncEngine::new(&mirror, &transport, options);

    let json = args.json;
    let verbose = args.verbose;
    let summary = engine.run_with_callback(Some(|event: SyncEvent| {
        if json {
            return;
        }
        match event {
            SyncEvent::RootSkipped { root } => {
                println!("  ⚠ SKIP root: {}", root.display());
            }
            SyncEvent::FileSkipped { path } => {
                println!("  ⚠ SKIP file: {}", path.display());
            }
            SyncEvent::ItemStart { path, .. } => {
                if verbose > 1 {
                    println!("  … {path}");
                }
            }
            SyncEvent::ItemTransferred { path, .. } => {
                println!("  ✓ {path}");
            }
            SyncEvent::ItemError { path, message, .. } => {
                println!("  ✗ {path}: {message}");
            }
        }
    }));

    report(&summary, &args);
    Ok(summary)
}

fn report(summary: &RunSummary, args: &MirrorArgs) {
    if args.json {
        let failed: Vec<_> = summary
            .failures()
            .map(|f| {
                serde_json::json!({
                    "path": f.source.display().to_string(),
                    "remote_path": f.remote_path,
                    "diagnostic": f.diagnostic,
                })
            })
            .collect();

        let output = serde_json::json!({
            "event": "mirror",
            "status": if summary.is_success() { "success" } else { "partial" },
            "dry_run": args.dry_run,
            "transferred": summary.transferred_count(),
            "failed": summary.failed_count(),
            "failures": failed,
            "skipped_roots": summary
                .skipped_roots
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>(),
            "skipped_files": summary
                .skipped_files
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>(),
        });
        println!("{output}");
        return;
    }

    println!("\n📊 Mirror Results:");
    println!("  ✓ Transferred: {} files", summary.transferred_count());
    if summary.failed_count() > 0 {
        println!("  ✗ Failed: {} files", summary.failed_count());
        for failure in summary.failures() {
            println!(
                "    - {} ({})",
                failure.source.display(),
                failure.diagnostic.as_deref().unwrap_or("unknown error")
            );
        }
    }
    if args.verbose > 0 && !summary.skipped_roots.is_empty() {
        println!("  ⚠ Skipped roots: {}", summary.skipped_roots.len());
    }
    println!();
}
