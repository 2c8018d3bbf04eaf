//! Binary reader for BCS-encoded data.
//!
//! [`ByteCursor`] walks a borrowed byte slice front to back. Every read either
//! consumes exactly the bytes it needs or fails with the offset it was at;
//! nothing is ever truncated or padded.

use move_txn_types::address::{AccountAddress, ADDRESS_LENGTH};

use crate::error::CodecError;

pub type CodecResult<T> = Result<T, CodecError>;

/// Cursor over a byte buffer. Invariant: `offset <= data.len()`.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Current read position.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_bytes(&mut self, n: usize) -> CodecResult<&'a [u8]> {
        if n > self.remaining() {
            return Err(CodecError::BufferUnderrun {
                offset: self.offset,
                needed: n,
                remaining: self.remaining(),
            });
        }
        let slice = &self.data[self.offset..self.offset + n];
        self.offset += n;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self) -> CodecResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> CodecResult<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> CodecResult<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> CodecResult<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> CodecResult<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    pub fn read_u128(&mut self) -> CodecResult<u128> {
        Ok(u128::from_le_bytes(self.read_array()?))
    }

    /// BCS booleans are a single byte that must be 0 or 1.
    pub fn read_bool(&mut self) -> CodecResult<bool> {
        let offset = self.offset;
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(CodecError::InvalidBool { offset, value }),
        }
    }

    /// Read a ULEB128 varint that must fit in 32 bits.
    ///
    /// Each byte carries 7 data bits, low group first; the high bit marks
    /// continuation. Values above `u32::MAX` and encodings ending in a
    /// redundant zero byte are rejected, so every value has one encoding.
    pub fn read_uleb128_as_u32(&mut self) -> CodecResult<u32> {
        let start = self.offset;
        let mut value: u64 = 0;
        for shift in (0..32).step_by(7) {
            let byte = self.read_u8()?;
            let digit = byte & 0x7f;
            value |= u64::from(digit) << shift;
            if digit == byte {
                if shift > 0 && digit == 0 {
                    return Err(CodecError::MalformedVarint {
                        offset: start,
                        reason: "non-canonical trailing zero byte",
                    });
                }
                return u32::try_from(value).map_err(|_| CodecError::MalformedVarint {
                    offset: start,
                    reason: "value does not fit in 32 bits",
                });
            }
        }
        Err(CodecError::MalformedVarint {
            offset: start,
            reason: "value does not fit in 32 bits",
        })
    }

    /// Read a ULEB128 length prefix as `usize`.
    pub fn read_length(&mut self) -> CodecResult<usize> {
        Ok(self.read_uleb128_as_u32()? as usize)
    }

    /// ULEB128 length followed by that many bytes.
    pub fn read_length_prefixed_bytes(&mut self) -> CodecResult<&'a [u8]> {
        let len = self.read_length()?;
        self.read_bytes(len)
    }

    /// Length-prefixed UTF-8 string (identifiers, `0x1::string::String`).
    pub fn read_string(&mut self) -> CodecResult<String> {
        let start = self.offset;
        let bytes = self.read_length_prefixed_bytes()?;
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|_| CodecError::InvalidUtf8 { offset: start })
    }

    /// Fixed 32-byte account address (no length prefix).
    pub fn read_address(&mut self) -> CodecResult<AccountAddress> {
        Ok(AccountAddress::new(self.read_array::<ADDRESS_LENGTH>()?))
    }

    /// Require that the whole buffer has been consumed.
    pub fn finish(&self) -> CodecResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CodecError::TrailingBytes {
                offset: self.offset,
                remaining: self.remaining(),
            })
        }
    }
}
