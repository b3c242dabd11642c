//! Diff command
//!
//! Usage: wikisync diff --new <FILE> --old <FILE> [--json]
//!
//! Snapshot files use the submission's delta layout:
//! `{"varb": {"10": 3}, "varp": {}, "level": {"Attack": 99}}`.

use clap::Args;
use std::path::{Path, PathBuf};
use wikisync_core::diff::{compute_delta, render_human_summary};
use wikisync_core::model::Snapshot;

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Freshly collected snapshot
    #[arg(long)]
    pub new: PathBuf,

    /// Baseline snapshot (omit for "never synced")
    #[arg(long)]
    pub old: Option<PathBuf>,

    /// Print the delta as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: DiffArgs) -> Result<(), Box<dyn std::error::Error>> {
    let new = read_snapshot(&args.new)?;
    let old = match &args.old {
        Some(path) => read_snapshot(path)?,
        None => Snapshot::empty(),
    };

    let delta = compute_delta(&new, &old);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&delta)?);
    } else {
        print!("{}", render_human_summary(&delta));
    }
    Ok(())
}

fn read_snapshot(path: &Path) -> Result<Snapshot, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    let snapshot = serde_json::from_str(&text)
        .map_err(|e| format!("{} is not a snapshot: {}", path.display(), e))?;
    Ok(snapshot)
}
