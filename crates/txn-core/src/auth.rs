//! Authentication builder.
//!
//! Turns raw key and signature bytes into a [`SignerIdentity`] (enough to
//! simulate) or an [`Authenticator`] (enough to submit). Two schemes are
//! supported and selected by [`SignerMode`]:
//!
//! - **Single key**: a 32-byte Ed25519 public key and a 64-byte signature.
//! - **Threshold (multi-key)**: K-of-N member keys. The public key bytes are a
//!   BCS `MultiKey` and the signature bytes a BCS `MultiKeySignature`:
//!
//! ```text
//! MultiKey           vector<AnyPublicKey> ++ u8 signatures_required
//! AnyPublicKey       ULEB128 scheme (0 = Ed25519, 1 = Secp256k1) ++ bytes
//! MultiKeySignature  vector<AnySignature> ++ bytes bitmap
//! AnySignature       ULEB128 scheme (0 = Ed25519, 1 = Secp256k1) ++ bytes
//! ```
//!
//! Bit `i` of the bitmap (most significant bit of byte 0 first) is set when
//! member `i` signed; signatures appear in ascending member order.
//!
//! A fee-payer envelope is simulated under a `FeePayer` authenticator: the
//! sender's account authenticator, no secondary signers, the sponsor address
//! and a `NoAccountAuthenticator` in place of the sponsor's signature.

use move_txn_types::address::AccountAddress;
use move_txn_types::transaction::TransactionShape;
use tracing::debug;

use crate::error::AuthError;
use crate::reader::ByteCursor;
use crate::vector::encode_vector;
use crate::writer::ByteWriter;

pub const ED25519_PUBLIC_KEY_LENGTH: usize = 32;
pub const ED25519_SIGNATURE_LENGTH: usize = 64;
pub const SECP256K1_PUBLIC_KEY_LENGTH: usize = 65;
pub const SECP256K1_SIGNATURE_LENGTH: usize = 64;

/// Bitmap is at most 4 bytes, so at most 32 members.
pub const MAX_MULTI_KEY_MEMBERS: usize = 32;
const MAX_BITMAP_BYTES: usize = MAX_MULTI_KEY_MEMBERS / 8;

// TransactionAuthenticator variant indexes.
const TXN_AUTH_ED25519: u32 = 0;
const TXN_AUTH_FEE_PAYER: u32 = 3;
const TXN_AUTH_SINGLE_SENDER: u32 = 4;

// AccountAuthenticator variant indexes.
const ACCOUNT_AUTH_ED25519: u32 = 0;
const ACCOUNT_AUTH_MULTI_KEY: u32 = 3;
const ACCOUNT_AUTH_NO_ACCOUNT: u32 = 4;

/// Which authentication scheme the signer uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignerMode {
    Single,
    Threshold,
}

impl SignerMode {
    pub fn from_multi_sig(multi_sig: bool) -> Self {
        if multi_sig {
            SignerMode::Threshold
        } else {
            SignerMode::Single
        }
    }
}

/// Key scheme of a multi-key member (and of its signatures).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyScheme {
    Ed25519,
    Secp256k1Ecdsa,
}

impl KeyScheme {
    fn from_tag(tag: u32) -> Result<Self, AuthError> {
        match tag {
            0 => Ok(KeyScheme::Ed25519),
            1 => Ok(KeyScheme::Secp256k1Ecdsa),
            other => Err(AuthError::UnsupportedKeyScheme { tag: other }),
        }
    }

    fn tag(self) -> u32 {
        match self {
            KeyScheme::Ed25519 => 0,
            KeyScheme::Secp256k1Ecdsa => 1,
        }
    }

    fn public_key_length(self) -> usize {
        match self {
            KeyScheme::Ed25519 => ED25519_PUBLIC_KEY_LENGTH,
            KeyScheme::Secp256k1Ecdsa => SECP256K1_PUBLIC_KEY_LENGTH,
        }
    }

    fn signature_length(self) -> usize {
        match self {
            KeyScheme::Ed25519 => ED25519_SIGNATURE_LENGTH,
            KeyScheme::Secp256k1Ecdsa => SECP256K1_SIGNATURE_LENGTH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ed25519PublicKey(pub [u8; ED25519_PUBLIC_KEY_LENGTH]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ed25519Signature(pub [u8; ED25519_SIGNATURE_LENGTH]);

impl Ed25519PublicKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AuthError> {
        fixed_length(bytes, "public key").map(Self)
    }
}

impl Ed25519Signature {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AuthError> {
        fixed_length(bytes, "signature").map(Self)
    }
}

fn fixed_length<const N: usize>(bytes: &[u8], field: &'static str) -> Result<[u8; N], AuthError> {
    bytes
        .try_into()
        .map_err(|_| AuthError::AuthenticatorLengthMismatch {
            field,
            expected: N,
            actual: bytes.len(),
        })
}

/// A member key of a threshold signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnyPublicKey {
    pub scheme: KeyScheme,
    pub bytes: Vec<u8>,
}

/// A member signature of a threshold signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnySignature {
    pub scheme: KeyScheme,
    pub bytes: Vec<u8>,
}

impl AnyPublicKey {
    fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self, AuthError> {
        let scheme = KeyScheme::from_tag(cursor.read_uleb128_as_u32()?)?;
        let bytes = cursor.read_length_prefixed_bytes()?;
        check_length("member public key", scheme.public_key_length(), bytes.len())?;
        Ok(Self {
            scheme,
            bytes: bytes.to_vec(),
        })
    }

    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_uleb128(self.scheme.tag());
        writer.write_length_prefixed(&self.bytes);
    }
}

impl AnySignature {
    fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self, AuthError> {
        let scheme = KeyScheme::from_tag(cursor.read_uleb128_as_u32()?)?;
        let bytes = cursor.read_length_prefixed_bytes()?;
        check_length("member signature", scheme.signature_length(), bytes.len())?;
        Ok(Self {
            scheme,
            bytes: bytes.to_vec(),
        })
    }

    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_uleb128(self.scheme.tag());
        writer.write_length_prefixed(&self.bytes);
    }
}

fn check_length(field: &'static str, expected: usize, actual: usize) -> Result<(), AuthError> {
    if expected == actual {
        Ok(())
    } else {
        Err(AuthError::AuthenticatorLengthMismatch {
            field,
            expected,
            actual,
        })
    }
}

/// Ordered member keys plus the number of signatures required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiKey {
    pub public_keys: Vec<AnyPublicKey>,
    pub signatures_required: u8,
}

impl MultiKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AuthError> {
        let mut cursor = ByteCursor::new(bytes);
        let public_keys = decode_members(&mut cursor)?;
        let signatures_required = cursor.read_u8()?;
        cursor.finish()?;

        let members = public_keys.len();
        if members > MAX_MULTI_KEY_MEMBERS {
            return Err(AuthError::AuthenticatorLengthMismatch {
                field: "member key list",
                expected: MAX_MULTI_KEY_MEMBERS,
                actual: members,
            });
        }
        if signatures_required == 0 || usize::from(signatures_required) > members {
            return Err(AuthError::InvalidThreshold {
                threshold: signatures_required,
                members,
            });
        }
        Ok(Self {
            public_keys,
            signatures_required,
        })
    }

    fn encode(&self, writer: &mut ByteWriter) {
        encode_vector(writer, &self.public_keys, |w, key| key.encode(w));
        writer.write_u8(self.signatures_required);
    }
}

// `decode_vector` only carries `CodecError`.
fn decode_members(cursor: &mut ByteCursor<'_>) -> Result<Vec<AnyPublicKey>, AuthError> {
    let count = cursor.read_length()?;
    (0..count).map(|_| AnyPublicKey::decode(cursor)).collect()
}

fn decode_signatures(cursor: &mut ByteCursor<'_>) -> Result<Vec<AnySignature>, AuthError> {
    let count = cursor.read_length()?;
    (0..count).map(|_| AnySignature::decode(cursor)).collect()
}

/// Who is signing. Enough to run a simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignerIdentity {
    SingleKey(Ed25519PublicKey),
    ThresholdKey(MultiKey),
}

impl SignerIdentity {
    /// Parse public key bytes according to `mode`.
    pub fn parse(mode: SignerMode, public_key: &[u8]) -> Result<Self, AuthError> {
        match mode {
            SignerMode::Single => Ok(SignerIdentity::SingleKey(Ed25519PublicKey::from_bytes(
                public_key,
            )?)),
            SignerMode::Threshold => Ok(SignerIdentity::ThresholdKey(MultiKey::from_bytes(
                public_key,
            )?)),
        }
    }

    pub fn mode(&self) -> SignerMode {
        match self {
            SignerIdentity::SingleKey(_) => SignerMode::Single,
            SignerIdentity::ThresholdKey(_) => SignerMode::Threshold,
        }
    }

    /// An authenticator carrying this identity's keys and all-zero
    /// signatures, for simulation endpoints that skip verification.
    /// Threshold signers get signatures from their first K members.
    pub fn simulation_authenticator(&self) -> Authenticator {
        match self {
            SignerIdentity::SingleKey(public_key) => Authenticator::SingleKey {
                public_key: *public_key,
                signature: Ed25519Signature([0u8; ED25519_SIGNATURE_LENGTH]),
            },
            SignerIdentity::ThresholdKey(members) => {
                let signatures = members
                    .public_keys
                    .iter()
                    .take(usize::from(members.signatures_required))
                    .enumerate()
                    .map(|(index, key)| {
                        let signature = AnySignature {
                            scheme: key.scheme,
                            bytes: vec![0u8; key.scheme.signature_length()],
                        };
                        (index as u8, signature)
                    })
                    .collect();
                Authenticator::ThresholdKey {
                    members: members.clone(),
                    signatures,
                }
            }
        }
    }

    /// [`Self::simulation_authenticator`], sponsored when the envelope
    /// names a fee payer.
    pub fn simulation_authenticator_for(&self, shape: &TransactionShape) -> Authenticator {
        let authenticator = self.simulation_authenticator();
        match shape {
            TransactionShape::Plain => authenticator,
            TransactionShape::FeePayer(fee_payer) => authenticator.sponsored_by(*fee_payer),
        }
    }
}

/// A signer identity together with its signature(s). The variant always
/// matches the [`SignerIdentity`] it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authenticator {
    SingleKey {
        public_key: Ed25519PublicKey,
        signature: Ed25519Signature,
    },
    ThresholdKey {
        members: MultiKey,
        /// (member index, signature), ascending by index.
        signatures: Vec<(u8, AnySignature)>,
    },
    /// Sender authenticator with a gas sponsor that has not signed.
    FeePayer {
        sender: Box<Authenticator>,
        fee_payer: AccountAddress,
    },
}

impl Authenticator {
    pub fn mode(&self) -> SignerMode {
        match self {
            Authenticator::SingleKey { .. } => SignerMode::Single,
            Authenticator::ThresholdKey { .. } => SignerMode::Threshold,
            Authenticator::FeePayer { sender, .. } => sender.mode(),
        }
    }

    /// Wrap the sender's authenticator with `fee_payer` as gas sponsor.
    pub fn sponsored_by(self, fee_payer: AccountAddress) -> Authenticator {
        let sender = match self {
            Authenticator::FeePayer { sender, .. } => sender,
            other => Box::new(other),
        };
        Authenticator::FeePayer { sender, fee_payer }
    }

    /// BCS `TransactionAuthenticator` bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        self.encode(&mut writer);
        writer.into_bytes()
    }

    fn encode(&self, writer: &mut ByteWriter) {
        match self {
            Authenticator::SingleKey {
                public_key,
                signature,
            } => {
                writer.write_uleb128(TXN_AUTH_ED25519);
                writer.write_length_prefixed(&public_key.0);
                writer.write_length_prefixed(&signature.0);
            }
            Authenticator::ThresholdKey { .. } => {
                writer.write_uleb128(TXN_AUTH_SINGLE_SENDER);
                self.encode_account(writer);
            }
            Authenticator::FeePayer { sender, fee_payer } => {
                writer.write_uleb128(TXN_AUTH_FEE_PAYER);
                sender.encode_account(writer);
                // Secondary signer addresses, then their authenticators.
                writer.write_length(0);
                writer.write_length(0);
                writer.write_address(fee_payer);
                writer.write_uleb128(ACCOUNT_AUTH_NO_ACCOUNT);
            }
        }
    }

    /// BCS `AccountAuthenticator` for the sender.
    fn encode_account(&self, writer: &mut ByteWriter) {
        match self {
            Authenticator::SingleKey {
                public_key,
                signature,
            } => {
                writer.write_uleb128(ACCOUNT_AUTH_ED25519);
                writer.write_length_prefixed(&public_key.0);
                writer.write_length_prefixed(&signature.0);
            }
            Authenticator::ThresholdKey {
                members,
                signatures,
            } => {
                writer.write_uleb128(ACCOUNT_AUTH_MULTI_KEY);
                members.encode(writer);
                let (indexes, sigs): (Vec<u8>, Vec<AnySignature>) =
                    signatures.iter().cloned().unzip();
                encode_vector(writer, &sigs, |w, sig| sig.encode(w));
                writer.write_length_prefixed(&encode_bitmap(&indexes));
            }
            Authenticator::FeePayer { sender, .. } => sender.encode_account(writer),
        }
    }
}

/// Build an authenticator from raw key and signature bytes.
pub fn build_authenticator(
    mode: SignerMode,
    public_key: &[u8],
    signature: &[u8],
) -> Result<Authenticator, AuthError> {
    let authenticator = match SignerIdentity::parse(mode, public_key)? {
        SignerIdentity::SingleKey(public_key) => Authenticator::SingleKey {
            public_key,
            signature: Ed25519Signature::from_bytes(signature)?,
        },
        SignerIdentity::ThresholdKey(members) => {
            let signatures = parse_threshold_signatures(&members, signature)?;
            Authenticator::ThresholdKey {
                members,
                signatures,
            }
        }
    };
    debug!(mode = ?authenticator.mode(), "built authenticator");
    Ok(authenticator)
}

fn parse_threshold_signatures(
    members: &MultiKey,
    bytes: &[u8],
) -> Result<Vec<(u8, AnySignature)>, AuthError> {
    let mut cursor = ByteCursor::new(bytes);
    let signatures = decode_signatures(&mut cursor)?;
    let bitmap = cursor.read_length_prefixed_bytes()?;
    cursor.finish()?;

    if bitmap.len() > MAX_BITMAP_BYTES {
        return Err(AuthError::AuthenticatorLengthMismatch {
            field: "signature bitmap",
            expected: MAX_BITMAP_BYTES,
            actual: bitmap.len(),
        });
    }

    let member_count = members.public_keys.len();
    let indexes = decode_bitmap(bitmap);
    if let Some(&index) = indexes.iter().find(|&&i| i >= member_count) {
        return Err(AuthError::SignerIndexOutOfRange {
            index,
            members: member_count,
        });
    }
    check_length("signature bitmap", signatures.len(), indexes.len())?;

    let required = usize::from(members.signatures_required);
    if signatures.len() < required {
        return Err(AuthError::InsufficientSignatures {
            provided: signatures.len(),
            required,
        });
    }

    Ok(indexes
        .into_iter()
        .map(|i| i as u8)
        .zip(signatures)
        .collect())
}

/// Set bit positions, most significant bit of byte 0 first.
fn decode_bitmap(bitmap: &[u8]) -> Vec<usize> {
    bitmap
        .iter()
        .enumerate()
        .flat_map(|(byte_index, byte)| {
            (0..8)
                .filter(move |bit| byte & (0x80 >> bit) != 0)
                .map(move |bit| byte_index * 8 + bit)
        })
        .collect()
}

/// Shortest bitmap with the given bits set.
fn encode_bitmap(indexes: &[u8]) -> Vec<u8> {
    let Some(&max) = indexes.iter().max() else {
        return Vec::new();
    };
    let mut bitmap = vec![0u8; usize::from(max) / 8 + 1];
    for &index in indexes {
        bitmap[usize::from(index) / 8] |= 0x80 >> (index % 8);
    }
    bitmap
}

/// Signed transaction: raw transaction bytes followed by the authenticator.
pub fn signed_transaction_bytes(raw_transaction: &[u8], authenticator: &Authenticator) -> Vec<u8> {
    let mut writer = ByteWriter::new();
    writer.write_raw(raw_transaction);
    authenticator.encode(&mut writer);
    writer.into_bytes()
}
