//! Generic `vector<T>` codec.
//!
//! A BCS vector is a ULEB128 element count followed by the elements back to
//! back. The element codec is a parameter, so `vector<vector<u8>>` is just
//! [`decode_vector`] applied with a closure that itself calls it.

use crate::reader::{ByteCursor, CodecResult};
use crate::writer::ByteWriter;

/// Decode `vector<T>` with `element` decoding each item in order.
///
/// A zero count yields an empty `Vec`, never an absent value.
pub fn decode_vector<'a, T, F>(cursor: &mut ByteCursor<'a>, mut element: F) -> CodecResult<Vec<T>>
where
    F: FnMut(&mut ByteCursor<'a>) -> CodecResult<T>,
{
    let len = cursor.read_length()?;
    // Every element takes at least one byte.
    let mut items = Vec::with_capacity(len.min(cursor.remaining()));
    for _ in 0..len {
        items.push(element(cursor)?);
    }
    Ok(items)
}

/// Decode `vector<u8>`.
pub fn decode_bytes(cursor: &mut ByteCursor<'_>) -> CodecResult<Vec<u8>> {
    Ok(cursor.read_length_prefixed_bytes()?.to_vec())
}

/// Decode `vector<vector<u8>>`.
pub fn decode_byte_vectors(cursor: &mut ByteCursor<'_>) -> CodecResult<Vec<Vec<u8>>> {
    decode_vector(cursor, decode_bytes)
}

/// Encode `vector<T>` with `element` encoding each item in order.
pub fn encode_vector<T, F>(writer: &mut ByteWriter, items: &[T], mut element: F)
where
    F: FnMut(&mut ByteWriter, &T),
{
    writer.write_length(items.len());
    for item in items {
        element(writer, item);
    }
}

/// Encode `vector<vector<u8>>`.
pub fn encode_byte_vectors(writer: &mut ByteWriter, items: &[Vec<u8>]) {
    encode_vector(writer, items, |w, bytes| w.write_length_prefixed(bytes));
}
