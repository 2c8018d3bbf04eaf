//! Move Transport Layer
//!
//! Network transport for submitting and simulating transactions against a
//! Move fullnode's REST API.
//!
//! This crate provides:
//! - [`rest`]: [`RestClient`], the fullnode implementation of
//!   [`move_txn_core::executor::NetworkClient`]
//! - [`network`]: named network presets and node URL resolution
//!
//! # Example
//!
//! ```ignore
//! use move_txn_core::executor::ExecutionEngine;
//! use move_txn_transport::{resolve_node_url, Network, RestClient};
//!
//! let url = resolve_node_url(None, Some(Network::Testnet));
//! let engine = ExecutionEngine::new(RestClient::new(&url));
//! let outcome = engine.execute(&request).await?;
//! ```

pub mod network;
pub mod rest;

pub use network::{resolve_node_url, Network};
pub use rest::RestClient;
