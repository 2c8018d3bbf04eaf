//! Output formatting for move-txn CLI
//!
//! Human-readable and JSON output for both commands. Logs go to stderr;
//! everything here is printed to stdout.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use move_txn_core::envelope::PreparedTransaction;
use move_txn_types::transaction::{ExecutionOutcome, TransactionReport};

/// Render a Unix timestamp as RFC 3339, falling back to the raw seconds.
pub fn format_expiration(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|s| DateTime::<Utc>::from_timestamp(s, 0))
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| format!("{} (out of range)", secs))
}

/// Summary printed after `decode` wrote its report.
pub fn format_decode_summary(report: &TransactionReport, out: &Path, json_output: bool) -> String {
    if json_output {
        #[derive(Serialize)]
        struct DecodeJson<'a> {
            success: bool,
            out: String,
            function: &'a str,
            args: usize,
        }
        let json = DecodeJson {
            success: true,
            out: out.display().to_string(),
            function: &report.payload.function,
            args: report.payload.args.len(),
        };
        return serde_json::to_string_pretty(&json).unwrap_or_else(|_| "{}".to_string());
    }

    let mut text = format!(
        "\x1b[32m✓ Decoded {}\x1b[0m ({} args)\n",
        report.payload.function,
        report.payload.args.len()
    );
    text.push_str(&format!("  Sender:   {}\n", report.sender));
    if let Some(fee_payer) = &report.fee_payer {
        text.push_str(&format!("  Fee payer: {}\n", fee_payer));
    }
    text.push_str(&format!("  Written:  {}", out.display()));
    text
}

/// Human-readable execution result.
pub fn format_outcome(txn: &PreparedTransaction, outcome: &ExecutionOutcome) -> String {
    let decoded = &txn.decoded;
    let mut text = String::new();

    let verb = match outcome {
        ExecutionOutcome::Simulated(_) => "Simulation",
        ExecutionOutcome::Committed(_) => "Transaction",
    };
    if outcome.success() {
        text.push_str(&format!("\x1b[32m✓ {} succeeded\x1b[0m\n\n", verb));
    } else {
        text.push_str(&format!(
            "\x1b[31m✗ {} failed: {}\x1b[0m\n\n",
            verb,
            outcome.vm_status()
        ));
    }

    text.push_str(&format!("Function:   {}\n", decoded.payload.function_id()));
    text.push_str(&format!("Sender:     {}\n", decoded.header.sender.to_hex_literal()));
    text.push_str(&format!("Sequence:   {}\n", decoded.header.sequence_number));
    text.push_str(&format!(
        "Expires:    {}\n",
        format_expiration(decoded.header.expiration_timestamp_secs)
    ));

    match outcome {
        ExecutionOutcome::Simulated(result) => {
            text.push_str(&format!("Gas used:   {} units\n", result.gas_used));
        }
        ExecutionOutcome::Committed(result) => {
            text.push_str(&format!("Hash:       {}\n", result.hash));
            if let Some(version) = result.version {
                text.push_str(&format!("Version:    {}\n", version));
            }
            text.push_str(&format!("Gas used:   {} units\n", result.gas_used));
        }
    }
    text.push_str(&format!("VM status:  {}", outcome.vm_status()));
    text
}

/// Execution result as JSON.
pub fn format_outcome_json(
    txn: &PreparedTransaction,
    node_url: &str,
    outcome: &ExecutionOutcome,
) -> String {
    #[derive(Serialize)]
    struct OutcomeJson<'a> {
        function: String,
        sender: String,
        node_url: &'a str,
        #[serde(flatten)]
        outcome: &'a ExecutionOutcome,
    }

    let json = OutcomeJson {
        function: txn.decoded.payload.function_id(),
        sender: txn.decoded.header.sender.to_hex_literal(),
        node_url,
        outcome,
    };
    serde_json::to_string_pretty(&json).unwrap_or_else(|_| "{}".to_string())
}
