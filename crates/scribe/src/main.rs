//! Scribe CLI - documentation authoring engine.
//!
//! Provides commands for:
//! - `serve`: Start the authoring server
//! - `new`: Submit a document from a markdown file
//! - `reconcile`: Rebuild the manifest from the document store

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{NewArgs, ReconcileArgs, ServeArgs};
use error::CliError;
use output::Output;

/// Scribe - documentation authoring engine.
#[derive(Parser)]
#[command(name = "scribe", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the authoring server.
    Serve(ServeArgs),
    /// Submit a document without going through HTTP.
    New(NewArgs),
    /// Rebuild the manifest from the documents in the store.
    Reconcile(ReconcileArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = matches!(&cli.command, Commands::Serve(args) if args.verbose);

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
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
        Commands::Serve(args) => tokio::runtime::Runtime::new()
            .map_err(CliError::from)
            .and_then(|rt| rt.block_on(args.execute())),
        Commands::New(args) => args.execute(),
        Commands::Reconcile(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
