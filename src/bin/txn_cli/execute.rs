//! Execute command - dry-run simulation or signed submission

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::{info, warn};

use move_txn_core::auth::SignerMode;
use move_txn_core::envelope::PreparedTransaction;
use move_txn_core::executor::{ExecutionEngine, ExecutionRequest};
use move_txn_tools::config::{FlagLayer, ToolConfig};
use move_txn_types::encoding::parse_hex_bytes;

use super::output::{format_outcome, format_outcome_json};

#[derive(Parser, Debug)]
pub struct ExecuteCmd {
    /// Transaction envelope as hex (`0x` prefix optional)
    #[arg(long)]
    pub tx: String,

    /// Signer public key as hex. With --multi-sig, the BCS multi-key
    /// (member keys followed by the threshold).
    #[arg(long)]
    pub public_key: String,

    /// Signature as hex. With --multi-sig, the BCS multi-key signature
    /// (signatures followed by the signer bitmap). Required unless --dry-run.
    #[arg(long)]
    pub signature: Option<String>,

    /// Treat the key and signature as a threshold (multi-key) signer
    #[arg(long)]
    pub multi_sig: bool,

    /// Simulate only; nothing is submitted
    #[arg(long)]
    pub dry_run: bool,

    /// Fullnode REST URL (overrides --network)
    #[arg(long)]
    pub node_url: Option<String>,

    /// Network preset: mainnet, testnet, devnet or local
    #[arg(long)]
    pub network: Option<String>,

    /// Bound on each network round trip, in seconds (0 = no bound)
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl ExecuteCmd {
    pub async fn execute(&self, json_output: bool) -> Result<()> {
        let config = ToolConfig::load(&FlagLayer {
            node_url: self.node_url.clone(),
            network: self.network.clone(),
            timeout_secs: self.timeout_secs,
            decoders: None,
        })?;

        let request = self.build_request()?;
        let header = &request.transaction.decoded.header;
        if let Some(expected) = config.network.and_then(|n| n.chain_id()) {
            if expected != header.chain_id {
                warn!(
                    chain_id = header.chain_id,
                    expected,
                    node = %config.node_url,
                    "transaction chain id does not match the target network"
                );
            }
        }

        info!(
            node = %config.node_url,
            function = %request.transaction.decoded.payload.function_id(),
            dry_run = request.dry_run,
            mode = ?request.signer_mode,
            "executing transaction"
        );
        let engine = ExecutionEngine::new(config.rest_client()).with_timeout(config.timeout);
        let outcome = engine.execute(&request).await?;

        if json_output {
            println!(
                "{}",
                format_outcome_json(&request.transaction, &config.node_url, &outcome)
            );
        } else {
            println!("{}", format_outcome(&request.transaction, &outcome));
        }

        if outcome.success() {
            Ok(())
        } else {
            Err(anyhow!("Transaction failed: {}", outcome.vm_status()))
        }
    }

    fn build_request(&self) -> Result<ExecutionRequest> {
        let transaction =
            PreparedTransaction::from_hex(&self.tx).context("Failed to decode transaction")?;
        let public_key = parse_hex_bytes(&self.public_key, "public key")?;
        let signature = self
            .signature
            .as_deref()
            .map(|sig| parse_hex_bytes(sig, "signature"))
            .transpose()?;

        Ok(ExecutionRequest {
            transaction,
            signer_mode: SignerMode::from_multi_sig(self.multi_sig),
            public_key,
            signature,
            dry_run: self.dry_run,
        })
    }
}
