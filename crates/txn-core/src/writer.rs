//! BCS encoder, the mirror of [`ByteCursor`](crate::reader::ByteCursor).
//!
//! Used to lay out authenticators and signed transactions for submission.

use move_txn_types::address::AccountAddress;

/// Append-only BCS byte writer.
#[derive(Debug, Clone, Default)]
pub struct ByteWriter {
    output: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_u8(&mut self, value: u8) {
        self.output.push(value);
    }

    pub fn write_u64(&mut self, value: u64) {
        self.output.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_uleb128(&mut self, mut value: u32) {
        loop {
            let byte = (value & 0x7f) as u8;
            value >>= 7;
            if value == 0 {
                self.output.push(byte);
                break;
            } else {
                self.output.push(byte | 0x80);
            }
        }
    }

    /// Raw bytes with no length prefix.
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.output.extend_from_slice(bytes);
    }

    /// ULEB128 length followed by the bytes.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is longer than `u32::MAX`, which BCS cannot express.
    pub fn write_length_prefixed(&mut self, bytes: &[u8]) {
        self.write_length(bytes.len());
        self.output.extend_from_slice(bytes);
    }

    /// ULEB128 length prefix for a sequence.
    pub fn write_length(&mut self, len: usize) {
        let len = u32::try_from(len).expect("BCS sequence length exceeds u32::MAX");
        self.write_uleb128(len);
    }

    pub fn write_str(&mut self, value: &str) {
        self.write_length_prefixed(value.as_bytes());
    }

    pub fn write_address(&mut self, address: &AccountAddress) {
        self.output.extend_from_slice(address.as_bytes());
    }

    pub fn len(&self) -> usize {
        self.output.len()
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.output
    }
}
