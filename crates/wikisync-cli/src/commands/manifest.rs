//! Manifest command
//!
//! Usage: wikisync manifest [--config <FILE>]

use super::load_config;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use wikisync_core::logging_facility::{init, Profile};
use wikisync_engine::manifest_cache::ManifestCache;
use wikisync_engine::transport::HttpTransport;

#[derive(Debug, Args)]
pub struct ManifestArgs {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn execute(args: ManifestArgs) -> Result<(), Box<dyn std::error::Error>> {
    init(Profile::Development);
    let config = load_config(args.config.as_deref())?;
    let transport = Arc::new(HttpTransport::new(config.request_timeout())?);
    let cache = ManifestCache::new(
        transport,
        config.manifest_url.clone(),
        config.request_timeout(),
        config.manifest_refresh_every,
    );

    let runtime = tokio::runtime::Runtime::new()?;
    let manifest = runtime.block_on(cache.refresh())?;

    println!("Manifest: {}", config.manifest_url);
    println!("Fingerprint: {}", manifest.fingerprint());
    println!("Varbits: {}", manifest.varbits().len());
    println!("Varps: {}", manifest.varps().len());
    println!("Skills: {}", manifest.skills().len());
    Ok(())
}
