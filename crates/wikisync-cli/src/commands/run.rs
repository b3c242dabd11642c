//! Run command
//!
//! Usage: wikisync run --host <FILE> [--config <FILE>] [--cycles <N>]
//!
//! Drives the scheduler against a [`FileHost`] until Ctrl-C, or for exactly
//! `--cycles` cycles.

use super::file_host::FileHost;
use super::load_config;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use wikisync_core::logging_facility::{init, Profile};
use wikisync_engine::main_context::MainContext;
use wikisync_engine::scheduler::SyncScheduler;
use wikisync_engine::transport::HttpTransport;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// JSON host file, re-read every cycle
    #[arg(long)]
    pub host: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Stop after this many cycles
    #[arg(long)]
    pub cycles: Option<usize>,

    /// Emit JSON logs
    #[arg(long)]
    pub json_logs: bool,
}

pub fn execute(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    init(if args.json_logs {
        Profile::Production
    } else {
        Profile::Development
    });
    let config = load_config(args.config.as_deref())?;
    let host = FileHost::open(&args.host)?;
    let transport = Arc::new(HttpTransport::new(config.request_timeout())?);
    let mut scheduler = SyncScheduler::new(&config, MainContext::inline(host)?, transport);

    let runtime = tokio::runtime::Runtime::new()?;
    let cycles = runtime.block_on(async {
        let shutdown = shutdown_on_ctrl_c();
        scheduler.run_bounded(shutdown, args.cycles).await
    });

    let profiles = scheduler.store().profiles();
    println!("Cycles run: {}", cycles);
    println!("Cycles synced: {}", scheduler.tick());
    println!("Profiles synced: {}", profiles.len());
    for profile in profiles {
        println!("  {}", profile);
    }
    Ok(())
}

/// Shutdown signal that flips to `true` on Ctrl-C.
fn shutdown_on_ctrl_c() -> watch::Receiver<bool> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                tracing::warn!(component = module_path!(), error = %e, "cannot listen for Ctrl-C");
                // Keep the sender alive so the scheduler is not stopped.
                std::future::pending::<()>().await;
                drop(shutdown_tx);
            }
        }
    });
    shutdown_rx
}
