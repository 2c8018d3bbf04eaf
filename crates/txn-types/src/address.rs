//! Account addresses.
//!
//! Move account addresses are 32-byte values, but they're often written in different formats:
//! - Short form: "0x1"
//! - Full form: "0x0000000000000000000000000000000000000000000000000000000000000001"
//! - Without prefix: "1"
//!
//! [`AccountAddress`] always renders in full form so decoded reports are diff-friendly.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Length of an account address in bytes.
pub const ADDRESS_LENGTH: usize = 32;

/// A 32-byte Move account address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AccountAddress([u8; ADDRESS_LENGTH]);

impl AccountAddress {
    pub const ZERO: AccountAddress = AccountAddress([0u8; ADDRESS_LENGTH]);

    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Build an address from a byte slice that must be exactly 32 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let array: [u8; ADDRESS_LENGTH] = bytes.try_into().ok()?;
        Some(Self(array))
    }

    /// Parse a hex literal, with or without `0x`, short or full form.
    ///
    /// # Examples
    ///
    /// ```
    /// use move_txn_types::address::AccountAddress;
    ///
    /// let addr = AccountAddress::from_hex_literal("0x1").unwrap();
    /// assert_eq!(addr.to_short_string(), "0x1");
    /// ```
    pub fn from_hex_literal(literal: &str) -> Result<Self, AddressParseError> {
        let normalized = normalize_address(literal);
        let hex_str = &normalized[2..];
        let bytes = hex::decode(hex_str).map_err(|_| AddressParseError(literal.to_string()))?;
        Self::from_bytes(&bytes).ok_or_else(|| AddressParseError(literal.to_string()))
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Full 66-character form (0x + 64 hex chars).
    pub fn to_hex_literal(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Short form with leading zeros stripped.
    ///
    /// Example: 0x0000...0001 -> 0x1
    pub fn to_short_string(&self) -> String {
        let full = hex::encode(self.0);
        let trimmed = full.trim_start_matches('0');
        if trimmed.is_empty() {
            "0x0".to_string()
        } else {
            format!("0x{}", trimmed)
        }
    }
}

impl AsRef<[u8]> for AccountAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex_literal())
    }
}

impl FromStr for AccountAddress {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex_literal(s)
    }
}

impl Serialize for AccountAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex_literal())
    }
}

impl<'de> Deserialize<'de> for AccountAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex_literal(&s).map_err(serde::de::Error::custom)
    }
}

/// Returned when a string is not a valid hex address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressParseError(pub String);

impl fmt::Display for AddressParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid account address '{}'", self.0)
    }
}

impl std::error::Error for AddressParseError {}

/// Normalize an address to lowercase with 0x prefix and full 64 hex characters.
///
/// # Examples
///
/// ```
/// use move_txn_types::address::normalize_address;
///
/// assert_eq!(
///     normalize_address("0x1"),
///     "0x0000000000000000000000000000000000000000000000000000000000000001"
/// );
/// assert_eq!(
///     normalize_address("ABC"),
///     "0x0000000000000000000000000000000000000000000000000000000000000abc"
/// );
/// ```
pub fn normalize_address(addr: &str) -> String {
    let addr = addr.trim();
    let hex = addr
        .strip_prefix("0x")
        .or_else(|| addr.strip_prefix("0X"))
        .unwrap_or(addr)
        .to_lowercase();
    if hex.len() < 64 {
        format!("0x{:0>64}", hex)
    } else {
        format!("0x{}", hex)
    }
}
