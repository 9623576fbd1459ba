//! qlint command-line interface.
//!
//! Static analysis for fluent quantum-circuit construction scripts:
//! parses each script, extracts assignment and call facts, and runs the
//! semantic rule set over them, persisting one report per file.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{check, scan};

/// qlint - static analysis for fluent quantum-circuit scripts
#[derive(Parser)]
#[command(name = "qlint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single script
    Check {
        /// Script to analyze
        path: String,

        /// Print the structured report as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Directory for persisted reports (default: <script dir>/result)
        #[arg(long)]
        report_dir: Option<String>,
    },

    /// Recursively analyze every script under a directory
    Scan {
        /// Directory to scan
        path: String,

        /// Directory for persisted reports (default: per-script result/)
        #[arg(long)]
        report_dir: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    match cli.command {
        Commands::Check {
            path,
            json,
            report_dir,
        } => check::execute(&path, json, report_dir.as_deref()).await,
        Commands::Scan { path, report_dir } => scan::execute(&path, report_dir.as_deref()).await,
    }
}
