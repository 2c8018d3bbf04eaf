//! Transaction types shared by the codec, the execution engine and the CLI.
//!
//! Everything here is built per call and read-only afterwards: a decoded
//! envelope, the report written for it, and the outcome of executing it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::address::AccountAddress;

/// Header fields of a raw transaction, in wire order minus the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransactionHeader {
    pub sender: AccountAddress,
    pub sequence_number: u64,
    pub max_gas_amount: u64,
    pub gas_unit_price: u64,
    /// Seconds since the Unix epoch.
    pub expiration_timestamp_secs: u64,
    pub chain_id: u8,
}

/// An entry-function call: `module_address::module_name::function_name<type_args>(args)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFunctionPayload {
    pub module_address: AccountAddress,
    pub module_name: String,
    pub function_name: String,
    /// Canonical type tag strings, e.g. `0x1::aptos_coin::AptosCoin`.
    pub type_args: Vec<String>,
    /// Undecoded BCS bytes of each argument, in call order.
    pub args: Vec<Vec<u8>>,
}

impl EntryFunctionPayload {
    /// Fully-qualified function identity, e.g. `0x1::code::publish_package_txn`.
    pub fn function_id(&self) -> String {
        format!(
            "{}::{}::{}",
            self.module_address.to_short_string(),
            self.module_name,
            self.function_name
        )
    }

    /// Keys under which a decoder may be registered for this call,
    /// most specific first.
    pub fn lookup_keys(&self) -> Vec<String> {
        vec![
            self.function_id(),
            format!("{}::{}", self.module_name, self.function_name),
            self.function_name.clone(),
        ]
    }
}

/// How the transaction extends past the raw transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionShape {
    /// Sender pays its own gas.
    Plain,
    /// A sponsor pays gas on the sender's behalf.
    FeePayer(AccountAddress),
}

impl TransactionShape {
    pub fn fee_payer(&self) -> Option<AccountAddress> {
        match self {
            TransactionShape::Plain => None,
            TransactionShape::FeePayer(addr) => Some(*addr),
        }
    }
}

/// A fully decoded transaction envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTransaction {
    pub header: RawTransactionHeader,
    pub payload: EntryFunctionPayload,
    pub shape: TransactionShape,
    /// Length of the raw transaction prefix inside the envelope bytes.
    /// The signed transaction is built from exactly these bytes.
    pub raw_transaction_len: usize,
}

/// A decoded argument value, serialized untagged so the report reads naturally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DecodedArgument {
    /// `0x`-prefixed hex: raw passthrough, addresses, byte vectors.
    Hex(String),
    /// Nested byte vectors, each `0x`-prefixed hex.
    HexArray(Vec<String>),
    Bool(bool),
    /// Decimal strings for integers and UTF-8 text.
    Text(String),
}

/// The JSON document produced by `decode`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReport {
    pub sender: String,
    pub sequence_number: String,
    pub max_gas_amount: String,
    pub gas_unit_price: String,
    pub expiration_timestamp_secs: String,
    pub chain_id: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_payer: Option<String>,
    pub payload: PayloadReport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadReport {
    pub function: String,
    pub type_args: Vec<String>,
    pub args: Vec<DecodedArgument>,
}

impl TransactionReport {
    pub fn new(txn: &DecodedTransaction, args: Vec<DecodedArgument>) -> Self {
        let header = &txn.header;
        Self {
            sender: header.sender.to_hex_literal(),
            sequence_number: header.sequence_number.to_string(),
            max_gas_amount: header.max_gas_amount.to_string(),
            gas_unit_price: header.gas_unit_price.to_string(),
            expiration_timestamp_secs: header.expiration_timestamp_secs.to_string(),
            chain_id: header.chain_id,
            fee_payer: txn.shape.fee_payer().map(|a| a.to_hex_literal()),
            payload: PayloadReport {
                function: txn.payload.function_id(),
                type_args: txn.payload.type_args.clone(),
                args,
            },
        }
    }
}

// =============================================================================
// Execution outcomes
// =============================================================================

/// Transaction hash as reported by the network (`0x`-prefixed hex).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionHash(pub String);

impl TransactionHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of a read-only simulation. Never persisted on-chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub success: bool,
    pub gas_used: u64,
    pub vm_status: String,
}

/// Acknowledgement of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransaction {
    pub hash: TransactionHash,
}

/// Result observed after the network reports terminal inclusion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedResult {
    pub hash: TransactionHash,
    pub success: bool,
    pub vm_status: String,
    pub gas_used: u64,
    /// Ledger version the transaction was committed at, when reported.
    #[serde(default)]
    pub version: Option<u64>,
}

/// What an execution produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    Simulated(SimulationResult),
    Committed(CommittedResult),
}

impl ExecutionOutcome {
    pub fn success(&self) -> bool {
        match self {
            ExecutionOutcome::Simulated(r) => r.success,
            ExecutionOutcome::Committed(r) => r.success,
        }
    }

    pub fn vm_status(&self) -> &str {
        match self {
            ExecutionOutcome::Simulated(r) => &r.vm_status,
            ExecutionOutcome::Committed(r) => &r.vm_status,
        }
    }
}
