//! Envelope to JSON report.

use move_txn_types::transaction::TransactionReport;
use tracing::debug;

use crate::envelope::decode_transaction;
use crate::reader::CodecResult;
use crate::registry::DecoderRegistry;

/// Decode an envelope and its arguments into a report.
///
/// `function_hint` overrides the registry key derived from the payload;
/// see [`DecoderRegistry::resolve_function`].
pub fn decode_report(
    bytes: &[u8],
    function_hint: Option<&str>,
    registry: &DecoderRegistry,
) -> CodecResult<TransactionReport> {
    let txn = decode_transaction(bytes)?;
    let function = registry.resolve_function(function_hint, &txn.payload);
    debug!(function = %function, "decoding arguments");
    let args = registry.decode(&function, &txn.payload.args)?;
    Ok(TransactionReport::new(&txn, args))
}
