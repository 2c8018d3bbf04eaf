//! Move type tags.
//!
//! Type arguments of an entry function travel as BCS-encoded `TypeTag`
//! enums. They are decoded here into a small tree and rendered in the
//! canonical string form used by explorers and the REST API
//! (`vector<u8>`, `0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>`).

use std::fmt;

use move_txn_types::address::AccountAddress;

use crate::error::CodecError;
use crate::reader::{ByteCursor, CodecResult};
use crate::vector::decode_vector;

/// Deepest nesting accepted for `vector<...>` and struct type parameters.
pub const MAX_TYPE_TAG_DEPTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeTag {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Address,
    Signer,
    Vector(Box<TypeTag>),
    Struct(Box<StructTag>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructTag {
    pub address: AccountAddress,
    pub module: String,
    pub name: String,
    pub type_params: Vec<TypeTag>,
}

impl TypeTag {
    /// Decode one type tag at the cursor.
    pub fn decode(cursor: &mut ByteCursor<'_>) -> CodecResult<TypeTag> {
        Self::decode_at_depth(cursor, 0)
    }

    fn decode_at_depth(cursor: &mut ByteCursor<'_>, depth: usize) -> CodecResult<TypeTag> {
        let offset = cursor.offset();
        if depth > MAX_TYPE_TAG_DEPTH {
            return Err(CodecError::TypeTagTooDeep { offset });
        }
        let tag = cursor.read_uleb128_as_u32()?;
        let decoded = match tag {
            0 => TypeTag::Bool,
            1 => TypeTag::U8,
            2 => TypeTag::U64,
            3 => TypeTag::U128,
            4 => TypeTag::Address,
            5 => TypeTag::Signer,
            6 => TypeTag::Vector(Box::new(Self::decode_at_depth(cursor, depth + 1)?)),
            7 => {
                let address = cursor.read_address()?;
                let module = cursor.read_string()?;
                let name = cursor.read_string()?;
                let type_params =
                    decode_vector(cursor, |c| Self::decode_at_depth(c, depth + 1))?;
                TypeTag::Struct(Box::new(StructTag {
                    address,
                    module,
                    name,
                    type_params,
                }))
            }
            8 => TypeTag::U16,
            9 => TypeTag::U32,
            10 => TypeTag::U256,
            other => return Err(CodecError::UnsupportedTypeTag { offset, tag: other }),
        };
        Ok(decoded)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Bool => f.write_str("bool"),
            TypeTag::U8 => f.write_str("u8"),
            TypeTag::U16 => f.write_str("u16"),
            TypeTag::U32 => f.write_str("u32"),
            TypeTag::U64 => f.write_str("u64"),
            TypeTag::U128 => f.write_str("u128"),
            TypeTag::U256 => f.write_str("u256"),
            TypeTag::Address => f.write_str("address"),
            TypeTag::Signer => f.write_str("signer"),
            TypeTag::Vector(inner) => write!(f, "vector<{}>", inner),
            TypeTag::Struct(s) => write!(f, "{}", s),
        }
    }
}

impl fmt::Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}::{}::{}",
            self.address.to_short_string(),
            self.module,
            self.name
        )?;
        if !self.type_params.is_empty() {
            let params: Vec<String> = self.type_params.iter().map(|t| t.to_string()).collect();
            write!(f, "<{}>", params.join(", "))?;
        }
        Ok(())
    }
}
