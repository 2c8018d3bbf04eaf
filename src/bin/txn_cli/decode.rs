//! Decode command - envelope and arguments to a JSON report file

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use move_txn_core::report::decode_report;
use move_txn_tools::config::{load_decoder_registry, FlagLayer};
use move_txn_types::encoding::parse_hex_bytes;
use move_txn_types::transaction::TransactionReport;

use super::output::format_decode_summary;

#[derive(Parser, Debug)]
pub struct DecodeCmd {
    /// Transaction envelope as hex (`0x` prefix optional)
    #[arg(long)]
    pub tx: String,

    /// Function identity used to pick argument decoders
    /// (e.g. "upgradePackage" or "0x1::coin::transfer").
    /// Defaults to the payload's own function.
    #[arg(long)]
    pub function: Option<String>,

    /// Output file for the JSON report
    #[arg(long)]
    pub out: PathBuf,

    /// Decoder file merged over the built-in registry
    #[arg(long)]
    pub decoders: Option<PathBuf>,
}

impl DecodeCmd {
    pub fn execute(&self, json_output: bool) -> Result<()> {
        let report = self.decode()?;
        write_report(&report, &self.out)?;
        info!(
            function = %report.payload.function,
            out = %self.out.display(),
            "wrote decoded transaction"
        );
        println!("{}", format_decode_summary(&report, &self.out, json_output));
        Ok(())
    }

    fn decode(&self) -> Result<TransactionReport> {
        let registry = load_decoder_registry(&FlagLayer {
            decoders: self.decoders.clone(),
            ..Default::default()
        })?;
        let bytes = parse_hex_bytes(&self.tx, "transaction")?;
        decode_report(&bytes, self.function.as_deref(), &registry)
            .context("Failed to decode transaction")
    }
}

/// Serialize fully before touching the file, so a failure leaves no partial output.
fn write_report(report: &TransactionReport, out: &Path) -> Result<()> {
    let mut rendered = serde_json::to_string_pretty(report)?;
    rendered.push('\n');
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(out, rendered).with_context(|| format!("Failed to write {}", out.display()))
}
