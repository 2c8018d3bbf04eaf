//! Argument decoder registry.
//!
//! Entry-function arguments arrive as opaque BCS byte strings; only the
//! function's signature says how to read them. The registry maps a function
//! identity to the ordered list of [`ArgDecoder`]s for its parameters. It is
//! plain data: supporting a new function means adding an entry (in code or
//! in a JSON file), never touching the envelope codec.
//!
//! ## Decoder file format
//!
//! ```json
//! {
//!   "functions": {
//!     "0x1::aptos_account::transfer": ["address", "u64"],
//!     "upgradePackage": ["address", "vector<u8>", "vector<vector<u8>>"]
//!   }
//! }
//! ```
//!
//! Functions without an entry fall back to raw `0x`-hex passthrough.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

use move_txn_types::encoding::to_hex_prefixed;
use move_txn_types::transaction::{DecodedArgument, EntryFunctionPayload};

use crate::error::CodecError;
use crate::reader::{ByteCursor, CodecResult};
use crate::vector::{decode_byte_vectors, decode_bytes};

/// How to read one argument's BCS bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgDecoder {
    /// 32-byte address, rendered in full hex form.
    Address,
    /// `vector<u8>`, rendered as `0x` hex.
    #[serde(alias = "vector<u8>")]
    Bytes,
    /// `vector<vector<u8>>`, rendered as an array of `0x` hex strings.
    #[serde(alias = "vector<vector<u8>>")]
    NestedBytes,
    U8,
    U64,
    U128,
    Bool,
    /// `0x1::string::String`.
    #[serde(alias = "string", alias = "0x1::string::String")]
    Utf8String,
    /// The whole argument as `0x` hex.
    Raw,
}

impl ArgDecoder {
    /// Decode one argument. The decoder must consume the bytes exactly.
    pub fn decode(self, bytes: &[u8]) -> CodecResult<DecodedArgument> {
        let mut cursor = ByteCursor::new(bytes);
        let value = match self {
            ArgDecoder::Address => DecodedArgument::Hex(cursor.read_address()?.to_hex_literal()),
            ArgDecoder::Bytes => DecodedArgument::Hex(to_hex_prefixed(&decode_bytes(&mut cursor)?)),
            ArgDecoder::NestedBytes => DecodedArgument::HexArray(
                decode_byte_vectors(&mut cursor)?
                    .iter()
                    .map(|b| to_hex_prefixed(b))
                    .collect(),
            ),
            ArgDecoder::U8 => DecodedArgument::Text(cursor.read_u8()?.to_string()),
            ArgDecoder::U64 => DecodedArgument::Text(cursor.read_u64()?.to_string()),
            ArgDecoder::U128 => DecodedArgument::Text(cursor.read_u128()?.to_string()),
            ArgDecoder::Bool => DecodedArgument::Bool(cursor.read_bool()?),
            ArgDecoder::Utf8String => DecodedArgument::Text(cursor.read_string()?),
            ArgDecoder::Raw => {
                DecodedArgument::Hex(to_hex_prefixed(cursor.read_bytes(bytes.len())?))
            }
        };
        cursor.finish()?;
        Ok(value)
    }
}

/// On-disk shape of a decoder file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecoderFile {
    #[serde(default)]
    pub functions: HashMap<String, Vec<ArgDecoder>>,
}

/// Function identity -> ordered argument decoders.
#[derive(Debug, Clone, Default)]
pub struct DecoderRegistry {
    decoders: HashMap<String, Vec<ArgDecoder>>,
}

impl DecoderRegistry {
    /// An empty registry: every function decodes as raw hex.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the package-management and transfer functions.
    pub fn with_defaults() -> Self {
        use ArgDecoder::*;

        let mut registry = Self::new();
        registry.register("upgradePackage", vec![Address, Bytes, NestedBytes]);
        registry.register("publishPackage", vec![Bytes, NestedBytes]);
        registry.register("0x1::code::publish_package_txn", vec![Bytes, NestedBytes]);
        registry.register("0x1::aptos_account::transfer", vec![Address, U64]);
        registry.register("0x1::coin::transfer", vec![Address, U64]);
        registry
    }

    /// Add or replace the decoders for `function`.
    pub fn register(&mut self, function: impl Into<String>, decoders: Vec<ArgDecoder>) {
        self.decoders.insert(function.into(), decoders);
    }

    pub fn lookup(&self, function: &str) -> Option<&[ArgDecoder]> {
        self.decoders.get(function).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Merge entries from a JSON decoder file; file entries win.
    pub fn extend_from_file(&mut self, path: &Path) -> Result<usize> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read decoder file {}", path.display()))?;
        self.extend_from_json(&content)
            .with_context(|| format!("Invalid decoder file {}", path.display()))
    }

    pub fn extend_from_json(&mut self, json: &str) -> Result<usize> {
        let file: DecoderFile = serde_json::from_str(json)?;
        let count = file.functions.len();
        self.decoders.extend(file.functions);
        Ok(count)
    }

    /// Decode `raw_args` positionally with the decoders registered for `function`.
    ///
    /// Unregistered functions return every argument as `0x` hex. Registered
    /// functions must have exactly one decoder per argument.
    pub fn decode(&self, function: &str, raw_args: &[Vec<u8>]) -> CodecResult<Vec<DecodedArgument>> {
        let Some(decoders) = self.lookup(function) else {
            return Ok(raw_passthrough(raw_args));
        };
        if decoders.len() != raw_args.len() {
            return Err(CodecError::ArgumentCountMismatch {
                function: function.to_string(),
                expected: decoders.len(),
                actual: raw_args.len(),
            });
        }
        decoders
            .iter()
            .zip(raw_args)
            .map(|(decoder, bytes)| decoder.decode(bytes))
            .collect()
    }

    /// Pick the registry key for a payload. An explicit hint is always the
    /// key, registered or not; without one, the payload's own identity is
    /// tried from most to least specific, falling back to the
    /// fully-qualified id.
    pub fn resolve_function(&self, hint: Option<&str>, payload: &EntryFunctionPayload) -> String {
        if let Some(hint) = hint {
            if !self.decoders.contains_key(hint) {
                warn!(
                    function = hint,
                    payload = %payload.function_id(),
                    "no decoders registered for function hint, arguments pass through as hex"
                );
            }
            return hint.to_string();
        }
        payload
            .lookup_keys()
            .into_iter()
            .find(|key| self.decoders.contains_key(key))
            .unwrap_or_else(|| payload.function_id())
    }

    /// Decode a payload's arguments, resolving the function identity first.
    pub fn decode_payload(
        &self,
        hint: Option<&str>,
        payload: &EntryFunctionPayload,
    ) -> CodecResult<Vec<DecodedArgument>> {
        let function = self.resolve_function(hint, payload);
        self.decode(&function, &payload.args)
    }
}

fn raw_passthrough(raw_args: &[Vec<u8>]) -> Vec<DecodedArgument> {
    raw_args
        .iter()
        .map(|bytes| DecodedArgument::Hex(to_hex_prefixed(bytes)))
        .collect()
}
