//! Error types for decoding, authentication and execution.
//!
//! Decode-time errors carry the byte offset at which decoding stopped so a
//! malformed envelope can be inspected with a hex dump. None of these errors
//! is ever recovered from inside the crate: a failed decode produces no output.

use std::fmt;
use std::time::Duration;

use move_txn_types::encoding::HexError;
use move_txn_types::transaction::TransactionHash;

/// Structured errors from the binary reader, the envelope codec and the
/// argument decoder registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A read needed more bytes than remain in the buffer.
    BufferUnderrun {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// ULEB128 value that overflows 32 bits or is not minimally encoded.
    MalformedVarint { offset: usize, reason: &'static str },

    /// Length-prefixed string that is not valid UTF-8.
    InvalidUtf8 { offset: usize },

    /// Boolean byte other than 0 or 1.
    InvalidBool { offset: usize, value: u8 },

    /// Payload variant other than an entry function.
    UnsupportedPayloadType { offset: usize, tag: u32 },

    /// Type tag discriminant this decoder does not know.
    UnsupportedTypeTag { offset: usize, tag: u32 },

    /// Type tags nested beyond the supported depth.
    TypeTagTooDeep { offset: usize },

    /// Envelope extension other than plain or fee payer (e.g. multi-agent).
    UnsupportedTransactionShape { offset: usize, detail: String },

    /// A value was fully decoded but input bytes remain.
    TrailingBytes { offset: usize, remaining: usize },

    /// Registered decoders and supplied arguments differ in count.
    ArgumentCountMismatch {
        function: String,
        expected: usize,
        actual: usize,
    },

    /// Hex input that could not be decoded to bytes.
    InvalidHex { context: String, reason: String },
}

impl CodecError {
    /// Byte offset of the failure, when the error is positional.
    pub fn offset(&self) -> Option<usize> {
        match self {
            CodecError::BufferUnderrun { offset, .. }
            | CodecError::MalformedVarint { offset, .. }
            | CodecError::InvalidUtf8 { offset }
            | CodecError::InvalidBool { offset, .. }
            | CodecError::UnsupportedPayloadType { offset, .. }
            | CodecError::UnsupportedTypeTag { offset, .. }
            | CodecError::TypeTagTooDeep { offset }
            | CodecError::UnsupportedTransactionShape { offset, .. }
            | CodecError::TrailingBytes { offset, .. } => Some(*offset),
            CodecError::ArgumentCountMismatch { .. } | CodecError::InvalidHex { .. } => None,
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::BufferUnderrun {
                offset,
                needed,
                remaining,
            } => write!(
                f,
                "buffer underrun at offset {}: need {} bytes, {} remaining",
                offset, needed, remaining
            ),
            CodecError::MalformedVarint { offset, reason } => {
                write!(f, "malformed ULEB128 at offset {}: {}", offset, reason)
            }
            CodecError::InvalidUtf8 { offset } => {
                write!(f, "invalid UTF-8 string at offset {}", offset)
            }
            CodecError::InvalidBool { offset, value } => {
                write!(f, "invalid boolean byte {:#04x} at offset {}", value, offset)
            }
            CodecError::UnsupportedPayloadType { offset, tag } => write!(
                f,
                "unsupported payload type {} at offset {} (only entry functions are supported)",
                tag, offset
            ),
            CodecError::UnsupportedTypeTag { offset, tag } => {
                write!(f, "unsupported type tag {} at offset {}", tag, offset)
            }
            CodecError::TypeTagTooDeep { offset } => {
                write!(f, "type tag nesting too deep at offset {}", offset)
            }
            CodecError::UnsupportedTransactionShape { offset, detail } => write!(
                f,
                "unsupported transaction shape at offset {}: {}",
                offset, detail
            ),
            CodecError::TrailingBytes { offset, remaining } => write!(
                f,
                "{} unexpected trailing bytes at offset {}",
                remaining, offset
            ),
            CodecError::ArgumentCountMismatch {
                function,
                expected,
                actual,
            } => write!(
                f,
                "argument count mismatch for {}: {} decoders registered, {} arguments supplied",
                function, expected, actual
            ),
            CodecError::InvalidHex { context, reason } => {
                write!(f, "invalid {} hex: {}", context, reason)
            }
        }
    }
}

impl std::error::Error for CodecError {}

impl From<HexError> for CodecError {
    fn from(e: HexError) -> Self {
        CodecError::InvalidHex {
            context: e.context,
            reason: e.reason,
        }
    }
}

/// Errors building a signer identity or authenticator from raw key material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Key, signature or bitmap with the wrong length.
    AuthenticatorLengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Key or signature scheme discriminant this builder does not know.
    UnsupportedKeyScheme { tag: u32 },

    /// A signature names a member index outside the key set.
    SignerIndexOutOfRange { index: usize, members: usize },

    /// Fewer signatures than the threshold requires.
    InsufficientSignatures { provided: usize, required: usize },

    /// Threshold of zero, or larger than the member count.
    InvalidThreshold { threshold: u8, members: usize },

    /// The key or signature bytes themselves failed to decode.
    Codec(CodecError),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::AuthenticatorLengthMismatch {
                field,
                expected,
                actual,
            } => write!(
                f,
                "authenticator length mismatch: {} expected {} bytes, got {}",
                field, expected, actual
            ),
            AuthError::UnsupportedKeyScheme { tag } => {
                write!(f, "unsupported key scheme {}", tag)
            }
            AuthError::SignerIndexOutOfRange { index, members } => write!(
                f,
                "signer index {} out of range for {} member keys",
                index, members
            ),
            AuthError::InsufficientSignatures { provided, required } => write!(
                f,
                "insufficient signatures: {} provided, {} required",
                provided, required
            ),
            AuthError::InvalidThreshold { threshold, members } => write!(
                f,
                "invalid threshold {} for {} member keys",
                threshold, members
            ),
            AuthError::Codec(e) => write!(f, "malformed key material: {}", e),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthError::Codec(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CodecError> for AuthError {
    fn from(e: CodecError) -> Self {
        AuthError::Codec(e)
    }
}

/// Execution phase, used in logs and timeout errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionPhase {
    Built,
    Simulating,
    Submitting,
    Awaiting,
    Done,
    Failed,
}

impl fmt::Display for ExecutionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExecutionPhase::Built => "built",
            ExecutionPhase::Simulating => "simulating",
            ExecutionPhase::Submitting => "submitting",
            ExecutionPhase::Awaiting => "awaiting inclusion",
            ExecutionPhase::Done => "done",
            ExecutionPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Errors from the execution engine.
#[derive(Debug)]
pub enum ExecutionError {
    /// Committed execution was requested without a signature.
    MissingSignature,

    Auth(AuthError),

    Codec(CodecError),

    /// The envelope cannot be submitted with the authenticators this crate builds.
    UnsupportedTransactionShape(String),

    /// A network round trip exceeded the caller's timeout. `hash` is set
    /// once the node has accepted the transaction.
    Timeout {
        phase: ExecutionPhase,
        after: Duration,
        hash: Option<TransactionHash>,
    },

    /// Opaque passthrough of a network client failure.
    NetworkFailure(anyhow::Error),
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionError::MissingSignature => {
                write!(f, "a signature is required unless --dry-run is set")
            }
            ExecutionError::Auth(e) => write!(f, "{}", e),
            ExecutionError::Codec(e) => write!(f, "{}", e),
            ExecutionError::UnsupportedTransactionShape(detail) => {
                write!(f, "unsupported transaction shape: {}", detail)
            }
            ExecutionError::Timeout {
                phase,
                after,
                hash: Some(hash),
            } => write!(
                f,
                "timed out after {:?} while {} (transaction {})",
                after, phase, hash
            ),
            ExecutionError::Timeout { phase, after, .. } => {
                write!(f, "timed out after {:?} while {}", after, phase)
            }
            ExecutionError::NetworkFailure(e) => write!(f, "network failure: {:#}", e),
        }
    }
}

impl std::error::Error for ExecutionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExecutionError::Auth(e) => Some(e),
            ExecutionError::Codec(e) => Some(e),
            ExecutionError::NetworkFailure(e) => Some(&**e),
            _ => None,
        }
    }
}

impl From<AuthError> for ExecutionError {
    fn from(e: AuthError) -> Self {
        ExecutionError::Auth(e)
    }
}

impl From<CodecError> for ExecutionError {
    fn from(e: CodecError) -> Self {
        ExecutionError::Codec(e)
    }
}
