//! move-txn: inspect and execute BCS-encoded Move transactions
//!
//! ## Commands
//!
//! - **decode**: decode an envelope and its arguments to a JSON report
//! - **execute**: simulate (`--dry-run`) or submit a transaction and wait
//!   for it to be committed
//!
//! ## Example Usage
//!
//! ```bash
//! # Decode a package upgrade
//! move-txn decode --tx 0x... --function upgradePackage --out upgrade.json
//!
//! # Simulate against testnet
//! move-txn execute --tx 0x... --public-key 0x... --dry-run --network testnet
//!
//! # Submit with a threshold (multi-key) signer
//! move-txn execute --tx 0x... --public-key 0x... --signature 0x... --multi-sig
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};

mod txn_cli;

use txn_cli::{decode::DecodeCmd, execute::ExecuteCmd};

#[derive(Parser)]
#[command(
    name = "move-txn",
    author,
    version,
    about = "Decode and execute BCS-encoded Move transactions",
    long_about = "Decode transaction envelopes into JSON reports with per-function argument \
                  decoders, and execute them as a dry-run simulation or a signed submission."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON instead of human-readable format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (debug logging)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a transaction envelope to a JSON report file
    Decode(DecodeCmd),

    /// Simulate or submit a transaction
    Execute(ExecuteCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    let Cli {
        command,
        json,
        verbose,
    } = Cli::parse();
    move_txn_tools::logging::init(verbose);

    match command {
        Commands::Decode(cmd) => cmd.execute(json),
        Commands::Execute(cmd) => cmd.execute(json).await,
    }
}
