//! umlsync: render PlantUML blocks from a push and commit the SVGs back.
//!
//! # Usage
//!
//! ```text
//! umlsync sync [--event <file>] [--workspace <dir>] [--path <template>]
//!              [--message <text>] [--server <url>] [--api-url <url>] [--dry-run] [--json]
//! umlsync extract <file>... [--workspace <dir>] [--path <template>] [--json]
//! ```
//!
//! Every `sync` option falls back to the environment a GitHub Actions runner
//! provides (`GITHUB_TOKEN`, `GITHUB_EVENT_PATH`, `GITHUB_WORKSPACE`,
//! `INPUT_*`).

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{extract::ExtractArgs, sync::SyncArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "umlsync",
    version,
    about = "Render PlantUML diagrams found in pushed files and commit them as SVG",
    long_about = None,
)]
struct Cli {
    /// Log per-file and per-block detail to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the blocks of a push and commit changed SVGs to the pushed ref.
    Sync(SyncArgs),

    /// List the blocks in local files and where their SVGs would go.
    Extract(ExtractArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let outcome = match cli.command {
        Commands::Sync(args) => args.run(),
        Commands::Extract(args) => args.run(),
    };
    if let Err(err) = &outcome {
        annotate_failure(err);
    }
    outcome
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Surface the failure on the workflow run page when running under Actions.
fn annotate_failure(err: &anyhow::Error) {
    if std::env::var("GITHUB_ACTIONS").as_deref() == Ok("true") {
        let message = format!("{err:#}").replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A");
        println!("::error::{message}");
    }
}
