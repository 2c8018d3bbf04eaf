//! Transaction envelope codec.
//!
//! ## Wire layout
//!
//! ```text
//! RawTransaction
//!   sender                     32 bytes
//!   sequence_number            u64
//!   payload                    ULEB128 variant (2 = EntryFunction)
//!     module address           32 bytes
//!     module name              string
//!     function name            string
//!     type args                vector<TypeTag>
//!     args                     vector<vector<u8>>
//!   max_gas_amount             u64
//!   gas_unit_price             u64
//!   expiration_timestamp_secs  u64
//!   chain_id                   u8
//! Extension (optional)
//!   fee payer                  option<address>: 0 = none, 1 = 32-byte address
//! ```
//!
//! Anything after the extension belongs to a multi-agent transaction
//! (secondary signer addresses) and is rejected rather than guessed at.

use move_txn_types::encoding::parse_hex_bytes;
use move_txn_types::transaction::{
    DecodedTransaction, EntryFunctionPayload, RawTransactionHeader, TransactionShape,
};
use tracing::debug;

use crate::error::CodecError;
use crate::reader::{ByteCursor, CodecResult};
use crate::type_tag::TypeTag;
use crate::vector::{decode_byte_vectors, decode_vector};

/// `TransactionPayload` variant index of an entry-function call.
pub const ENTRY_FUNCTION_PAYLOAD: u32 = 2;

/// Decode a hex-encoded envelope.
pub fn decode_transaction_hex(hex_str: &str) -> CodecResult<DecodedTransaction> {
    let bytes = parse_hex_bytes(hex_str, "transaction")?;
    decode_transaction(&bytes)
}

/// Decode a full envelope. Fails on the first malformed field; no partial result.
pub fn decode_transaction(bytes: &[u8]) -> CodecResult<DecodedTransaction> {
    let mut cursor = ByteCursor::new(bytes);

    let sender = cursor.read_address()?;
    let sequence_number = cursor.read_u64()?;
    let payload = decode_entry_function(&mut cursor)?;
    let max_gas_amount = cursor.read_u64()?;
    let gas_unit_price = cursor.read_u64()?;
    let expiration_timestamp_secs = cursor.read_u64()?;
    let chain_id = cursor.read_u8()?;
    let raw_transaction_len = cursor.offset();

    let shape = decode_shape(&mut cursor)?;

    debug!(
        function = %payload.function_id(),
        args = payload.args.len(),
        type_args = payload.type_args.len(),
        fee_payer = shape.fee_payer().is_some(),
        "decoded transaction envelope"
    );

    Ok(DecodedTransaction {
        header: RawTransactionHeader {
            sender,
            sequence_number,
            max_gas_amount,
            gas_unit_price,
            expiration_timestamp_secs,
            chain_id,
        },
        payload,
        shape,
        raw_transaction_len,
    })
}

/// An envelope decoded alongside the bytes it came from, ready to be signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedTransaction {
    pub decoded: DecodedTransaction,
    bytes: Vec<u8>,
}

impl PreparedTransaction {
    pub fn from_bytes(bytes: Vec<u8>) -> CodecResult<Self> {
        let decoded = decode_transaction(&bytes)?;
        Ok(Self { decoded, bytes })
    }

    pub fn from_hex(hex_str: &str) -> CodecResult<Self> {
        Self::from_bytes(parse_hex_bytes(hex_str, "transaction")?)
    }

    /// The raw transaction prefix, without any extension.
    pub fn raw_transaction(&self) -> &[u8] {
        &self.bytes[..self.decoded.raw_transaction_len]
    }
}

fn decode_entry_function(cursor: &mut ByteCursor<'_>) -> CodecResult<EntryFunctionPayload> {
    let offset = cursor.offset();
    let variant = cursor.read_uleb128_as_u32()?;
    if variant != ENTRY_FUNCTION_PAYLOAD {
        return Err(CodecError::UnsupportedPayloadType {
            offset,
            tag: variant,
        });
    }

    let module_address = cursor.read_address()?;
    let module_name = cursor.read_string()?;
    let function_name = cursor.read_string()?;
    let type_args = decode_vector(cursor, |c| TypeTag::decode(c).map(|t| t.to_string()))?;
    let args = decode_byte_vectors(cursor)?;

    Ok(EntryFunctionPayload {
        module_address,
        module_name,
        function_name,
        type_args,
        args,
    })
}

fn decode_shape(cursor: &mut ByteCursor<'_>) -> CodecResult<TransactionShape> {
    if cursor.is_empty() {
        return Ok(TransactionShape::Plain);
    }

    let offset = cursor.offset();
    let shape = match cursor.read_u8()? {
        0 => TransactionShape::Plain,
        1 => TransactionShape::FeePayer(cursor.read_address()?),
        other => {
            return Err(CodecError::UnsupportedTransactionShape {
                offset,
                detail: format!("unknown extension discriminant {}", other),
            })
        }
    };

    if !cursor.is_empty() {
        return Err(CodecError::UnsupportedTransactionShape {
            offset: cursor.offset(),
            detail: format!(
                "{} bytes after the fee payer field (multi-agent transactions are not supported)",
                cursor.remaining()
            ),
        });
    }
    Ok(shape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::encode_byte_vectors;
    use crate::writer::ByteWriter;
    use move_txn_types::address::AccountAddress;

    fn addr(s: &str) -> AccountAddress {
        AccountAddress::from_hex_literal(s).unwrap()
    }

    fn raw_transaction(args: &[Vec<u8>]) -> Vec<u8> {
        let mut w = ByteWriter::new();
        w.write_address(&addr("0xcafe"));
        w.write_u64(11);
        w.write_uleb128(ENTRY_FUNCTION_PAYLOAD);
        w.write_address(&addr("0x1"));
        w.write_str("aptos_account");
        w.write_str("transfer");
        w.write_length(0);
        encode_byte_vectors(&mut w, args);
        w.write_u64(2_000);
        w.write_u64(100);
        w.write_u64(1_717_000_000);
        w.write_u8(4);
        w.into_bytes()
    }

    #[test]
    fn test_plain_without_extension() {
        let args = vec![addr("0xbeef").as_bytes().to_vec(), 5u64.to_le_bytes().to_vec()];
        let bytes = raw_transaction(&args);
        let txn = decode_transaction(&bytes).unwrap();

        assert_eq!(txn.header.sender, addr("0xcafe"));
        assert_eq!(txn.header.sequence_number, 11);
        assert_eq!(txn.header.max_gas_amount, 2_000);
        assert_eq!(txn.header.gas_unit_price, 100);
        assert_eq!(txn.header.expiration_timestamp_secs, 1_717_000_000);
        assert_eq!(txn.header.chain_id, 4);
        assert_eq!(txn.payload.function_id(), "0x1::aptos_account::transfer");
        assert_eq!(txn.payload.args, args);
        assert_eq!(txn.shape, TransactionShape::Plain);
        assert_eq!(txn.raw_transaction_len, bytes.len());
    }

    #[test]
    fn test_explicit_plain_and_fee_payer() {
        let raw = raw_transaction(&[]);

        let mut plain = raw.clone();
        plain.push(0);
        let txn = decode_transaction(&plain).unwrap();
        assert_eq!(txn.shape, TransactionShape::Plain);
        assert_eq!(txn.raw_transaction_len, raw.len());

        let mut sponsored = raw.clone();
        sponsored.push(1);
        sponsored.extend_from_slice(addr("0xfee").as_bytes());
        let txn = decode_transaction(&sponsored).unwrap();
        assert_eq!(txn.shape, TransactionShape::FeePayer(addr("0xfee")));
        assert_eq!(txn.raw_transaction_len, raw.len());
    }

    #[test]
    fn test_rejects_script_payload() {
        let mut w = ByteWriter::new();
        w.write_address(&addr("0x1"));
        w.write_u64(0);
        w.write_uleb128(0);
        let err = decode_transaction(&w.into_bytes()).unwrap_err();
        assert_eq!(err, CodecError::UnsupportedPayloadType { offset: 40, tag: 0 });
    }

    #[test]
    fn test_rejects_unknown_extension() {
        let mut bytes = raw_transaction(&[]);
        let offset = bytes.len();
        bytes.push(2);
        assert!(matches!(
            decode_transaction(&bytes),
            Err(CodecError::UnsupportedTransactionShape { offset: o, .. }) if o == offset
        ));
    }

    #[test]
    fn test_rejects_multi_agent_trailer() {
        let mut bytes = raw_transaction(&[]);
        bytes.push(0);
        // A secondary signer list would follow here.
        bytes.push(1);
        bytes.extend_from_slice(addr("0xb0b").as_bytes());
        assert!(matches!(
            decode_transaction(&bytes),
            Err(CodecError::UnsupportedTransactionShape { .. })
        ));
    }

    #[test]
    fn test_truncated_envelope_reports_offset() {
        let bytes = raw_transaction(&[vec![1, 2, 3]]);
        let truncated = &bytes[..bytes.len() - 5];
        let err = decode_transaction(truncated).unwrap_err();
        assert!(matches!(err, CodecError::BufferUnderrun { .. }));
        assert!(err.offset().is_some());
    }

    #[test]
    fn test_prepared_keeps_raw_prefix() {
        let raw = raw_transaction(&[vec![7u8; 8]]);
        let mut sponsored = raw.clone();
        sponsored.push(1);
        sponsored.extend_from_slice(addr("0xfee").as_bytes());

        let prepared = PreparedTransaction::from_bytes(sponsored).unwrap();
        assert_eq!(prepared.raw_transaction(), raw.as_slice());
        assert_eq!(prepared.decoded.shape.fee_payer(), Some(addr("0xfee")));
    }

    #[test]
    fn test_hex_entry_point() {
        let bytes = raw_transaction(&[]);
        let txn = decode_transaction_hex(&format!("0x{}", hex::encode(&bytes))).unwrap();
        assert_eq!(txn.header.chain_id, 4);
        assert!(matches!(
            decode_transaction_hex("0xnothex"),
            Err(CodecError::InvalidHex { .. })
        ));
    }
}
