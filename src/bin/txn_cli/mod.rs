//! CLI subcommand implementations for move-txn

pub mod decode;
pub mod execute;
pub mod output;
