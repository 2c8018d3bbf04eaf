//! Move Transaction Tools
//!
//! Command-line support for inspecting and executing BCS-encoded Move
//! entry-function transactions:
//!
//! - **Decode**: envelope and arguments to a JSON report
//! - **Execute**: dry-run simulation, or submit and wait for inclusion
//!
//! The codec and engine live in [`move_txn_core`], the REST transport in
//! [`move_txn_transport`]. This crate adds [`config`] layering and
//! [`logging`] setup for the `move-txn` binary.

pub mod config;
pub mod logging;

pub use config::{EnvLayer, FlagLayer, ToolConfig};
