//! docnav CLI - documentation navigation engine.
//!
//! Provides commands for:
//! - `build`: Run one build pass and write the page and redirect manifests
//! - `redirects`: Print the legacy redirect table

mod commands;
mod error;
mod manifest;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, RedirectsArgs};
use output::Output;

/// docnav - documentation navigation engine.
#[derive(Parser)]
#[command(name = "docnav", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build pages and redirects from the content directory.
    Build(BuildArgs),
    /// Print the legacy redirect table.
    Redirects(RedirectsArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let verbose = matches!(&cli.command, Commands::Build(args) if args.verbose);
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Redirects(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
