//! Hex encoding utilities.
//!
//! Every byte string that leaves the codec (decoded arguments, keys, hashes)
//! goes through [`to_hex_prefixed`] so reports use one format.

use std::fmt;

/// Encode bytes as a `0x`-prefixed lowercase hex string.
///
/// # Examples
///
/// ```
/// use move_txn_types::encoding::to_hex_prefixed;
///
/// assert_eq!(to_hex_prefixed(&[0xde, 0xad]), "0xdead");
/// assert_eq!(to_hex_prefixed(&[]), "0x");
/// ```
pub fn to_hex_prefixed(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Parse a hex string (with or without 0x prefix) to raw bytes.
///
/// # Arguments
/// * `hex_str` - Hex string (with or without 0x prefix)
/// * `context` - Description for error messages (e.g., "public key", "transaction")
pub fn parse_hex_bytes(hex_str: &str, context: &str) -> Result<Vec<u8>, HexError> {
    let trimmed = hex_str.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(digits).map_err(|e| HexError {
        context: context.to_string(),
        reason: e.to_string(),
    })
}

/// A hex string that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexError {
    pub context: String,
    pub reason: String,
}

impl fmt::Display for HexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid {} hex: {}", self.context, self.reason)
    }
}

impl std::error::Error for HexError {}
