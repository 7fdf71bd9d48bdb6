//! Leaf CLI - site navigation and layout resolution.
//!
//! Provides commands for:
//! - `check`: Validate configuration, navigation links and page layouts
//! - `resolve`: Show the layout, sidebar and neighbours of one page
//! - `build`: Write a page manifest per site for the renderer

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, CheckArgs, ResolveArgs};
use output::Output;

/// Leaf - site navigation and layout resolution.
#[derive(Parser)]
#[command(name = "leaf", version, about)]
struct Cli {
    /// Enable verbose output (show info-level logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check navigation links and page layouts.
    Check(CheckArgs),
    /// Resolve layout and sidebar for a page path.
    Resolve(ResolveArgs),
    /// Write site manifests.
    Build(BuildArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Check(args) => args.execute(),
        Commands::Resolve(args) => args.execute(),
        Commands::Build(args) => args.execute(),
    };

    if let Err(err) = result {
        output.failure(&err);
        std::process::exit(1);
    }
}
