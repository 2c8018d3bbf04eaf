//! Environment variable parsing utilities.
//!
//! Configuration for the CLI and transport is layered as flag > environment > default.
//! These helpers keep the environment layer from repeating patterns like:
//!
//! ```ignore
//! std::env::var("VAR_NAME")
//!     .ok()
//!     .and_then(|v| v.parse::<u64>().ok())
//!     .unwrap_or(default_value)
//! ```

use std::path::PathBuf;
use std::str::FromStr;

/// Parse an environment variable into a type that implements `FromStr`.
///
/// Returns `None` if the variable is not set or cannot be parsed.
///
/// # Example
///
/// ```
/// use move_txn_types::env_utils::env_var;
///
/// let value: Option<u64> = env_var("MOVE_TXN_DOC_UNSET_VAR");
/// assert!(value.is_none());
/// ```
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Read a non-empty string variable.
///
/// Whitespace-only values count as unset.
pub fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read a path variable, expanding a leading `~/` against the home directory
/// given by the caller.
pub fn env_path(key: &str, home: Option<&std::path::Path>) -> Option<PathBuf> {
    let raw = env_string(key)?;
    match (raw.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => Some(home.join(rest)),
        _ => Some(PathBuf::from(raw)),
    }
}
