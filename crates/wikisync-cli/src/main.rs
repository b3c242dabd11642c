//! WikiSync CLI
//!
//! Command-line front end for the sync engine

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "wikisync")]
#[command(about = "WikiSync - incremental game state sync", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Diff two snapshot files
    Diff(commands::diff::DiffArgs),
    /// Extract a bit range from a raw varp value
    Bits(commands::bits::BitsArgs),
    /// Fetch and summarise the current manifest
    Manifest(commands::manifest::ManifestArgs),
    /// Run the sync scheduler against a JSON host file
    Run(commands::run::RunArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Diff(args) => commands::diff::execute(args),
        Commands::Bits(args) => commands::bits::execute(args),
        Commands::Manifest(args) => commands::manifest::execute(args),
        Commands::Run(args) => commands::run::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
