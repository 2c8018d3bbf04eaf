//! Move Transaction Core
//!
//! Codec and execution engine for BCS-encoded Move entry-function
//! transactions.
//!
//! # Core Modules
//!
//! - [`reader`] / [`writer`]: bounds-checked BCS primitives
//! - [`vector`]: generic `vector<T>` codec
//! - [`envelope`]: raw transaction decoding and shape detection
//! - [`registry`]: per-function argument decoders
//! - [`auth`]: single-key and threshold authenticators
//! - [`executor`]: simulate, or submit and wait for inclusion
//!
//! # Example
//!
//! ```ignore
//! use move_txn_core::registry::DecoderRegistry;
//! use move_txn_core::report::decode_report;
//!
//! let registry = DecoderRegistry::with_defaults();
//! let report = decode_report(&bytes, Some("upgradePackage"), &registry)?;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! ```

pub mod auth;
pub mod envelope;
pub mod error;
pub mod executor;
pub mod reader;
pub mod registry;
pub mod report;
pub mod type_tag;
pub mod vector;
pub mod writer;

pub use auth::{build_authenticator, Authenticator, SignerIdentity, SignerMode};
pub use envelope::{decode_transaction, decode_transaction_hex, PreparedTransaction};
pub use error::{AuthError, CodecError, ExecutionError, ExecutionPhase};
pub use executor::{ExecutionEngine, ExecutionRequest, NetworkClient};
pub use reader::{ByteCursor, CodecResult};
pub use registry::{ArgDecoder, DecoderRegistry};
pub use report::decode_report;
pub use writer::ByteWriter;
