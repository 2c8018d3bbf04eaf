//! Shared types for the move-txn-tools workspace.
//!
//! This crate provides the data model used across the codec, the execution
//! engine, the transport and the CLI:
//!
//! - [`address`] - 32-byte account addresses and normalization
//! - [`encoding`] - hex helpers used for every byte string in reports
//! - [`env_utils`] - environment-variable configuration helpers
//! - [`transaction`] - decoded transactions, reports and execution outcomes

pub mod address;
pub mod encoding;
pub mod env_utils;
pub mod transaction;

// Re-export commonly used types at crate root
pub use address::AccountAddress;
pub use transaction::{
    CommittedResult, DecodedArgument, DecodedTransaction, EntryFunctionPayload, ExecutionOutcome,
    PayloadReport, PendingTransaction, RawTransactionHeader, SimulationResult, TransactionHash,
    TransactionReport, TransactionShape,
};
