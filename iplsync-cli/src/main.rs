//! iplsync: keep a policy engine IP list in step with a vendor endpoint feed.
//!
//! # Usage
//!
//! ```text
//! iplsync sync --fqdn <host> --user <user> --pwd <secret> [--port 8443] [--org <id>]
//!              [--name Office365] [-p] [-x] [--instance worldwide] [--dry-run]
//! iplsync addresses [--instance worldwide] [--json]
//! ```
//!
//! Connection settings may also come from `IPLSYNC_*` environment variables or
//! a YAML config file (`--config`, default `~/.iplsync/config.yaml`).

mod commands;
mod transport;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{addresses::AddressesArgs, sync::SyncArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "iplsync",
    version,
    about = "Sync a policy engine IP list with a published cloud endpoint feed",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create or update the IP list from the current feed, optionally provisioning it.
    Sync(SyncArgs),

    /// Fetch the feed and print its deduplicated addresses.
    Addresses(AddressesArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Sync(args) => args.run(),
        Commands::Addresses(args) => args.run(),
    }
}

/// Diagnostics go to stderr so stdout carries only the confirmations.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
