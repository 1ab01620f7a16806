//! Fixed-width scalar values
//!
//! Every scalar is written little-endian at the exact width of its declared
//! kind, with no padding or alignment. Keys and record fields share this
//! encoding.

use crate::type_tag::TypeTag;
use byteorder::{ByteOrder, LittleEndian};
use childfield_core::{Address, Error, Result, OBJECT_ID_LENGTH};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declared kind of a fixed-width scalar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    /// 1 byte, 0 or 1
    Bool,
    /// 1 byte
    U8,
    /// 2 bytes
    U16,
    /// 4 bytes
    U32,
    /// 8 bytes
    U64,
    /// 16 bytes
    U128,
    /// 32 bytes
    U256,
    /// 32 bytes
    Address,
}

impl ScalarKind {
    /// Encoded width in bytes
    pub const fn width(&self) -> usize {
        match self {
            ScalarKind::Bool | ScalarKind::U8 => 1,
            ScalarKind::U16 => 2,
            ScalarKind::U32 => 4,
            ScalarKind::U64 => 8,
            ScalarKind::U128 => 16,
            ScalarKind::U256 | ScalarKind::Address => 32,
        }
    }

    /// Type name as written in type descriptors
    pub const fn name(&self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::U128 => "u128",
            ScalarKind::U256 => "u256",
            ScalarKind::Address => "address",
        }
    }

    /// Largest value representable as [`Scalar::Uint`], for integer kinds up to 128 bits
    pub const fn max_uint(&self) -> Option<u128> {
        match self {
            ScalarKind::U8 => Some(u8::MAX as u128),
            ScalarKind::U16 => Some(u16::MAX as u128),
            ScalarKind::U32 => Some(u32::MAX as u128),
            ScalarKind::U64 => Some(u64::MAX as u128),
            ScalarKind::U128 | ScalarKind::U256 => Some(u128::MAX),
            ScalarKind::Bool | ScalarKind::Address => None,
        }
    }

    /// Primitive type tag for this kind
    pub fn type_tag(&self) -> TypeTag {
        match self {
            ScalarKind::Bool => TypeTag::Bool,
            ScalarKind::U8 => TypeTag::U8,
            ScalarKind::U16 => TypeTag::U16,
            ScalarKind::U32 => TypeTag::U32,
            ScalarKind::U64 => TypeTag::U64,
            ScalarKind::U128 => TypeTag::U128,
            ScalarKind::U256 => TypeTag::U256,
            ScalarKind::Address => TypeTag::Address,
        }
    }

    /// Scalar kind for a primitive type tag
    ///
    /// Returns `None` for `signer`, vectors and structs.
    pub fn from_type_tag(tag: &TypeTag) -> Option<Self> {
        Some(match tag {
            TypeTag::Bool => ScalarKind::Bool,
            TypeTag::U8 => ScalarKind::U8,
            TypeTag::U16 => ScalarKind::U16,
            TypeTag::U32 => ScalarKind::U32,
            TypeTag::U64 => ScalarKind::U64,
            TypeTag::U128 => ScalarKind::U128,
            TypeTag::U256 => ScalarKind::U256,
            TypeTag::Address => ScalarKind::Address,
            _ => return None,
        })
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScalarKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.parse::<TypeTag>()
            .ok()
            .as_ref()
            .and_then(ScalarKind::from_type_tag)
            .ok_or_else(|| Error::type_mismatch("scalar kind", s))
    }
}

/// A scalar value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scalar {
    /// Boolean
    Bool(bool),
    /// Unsigned integer up to 128 bits, range-checked against the declared kind
    Uint(u128),
    /// 256-bit unsigned integer, little-endian bytes
    U256([u8; 32]),
    /// 32-byte address
    Address(Address),
}

impl Scalar {
    /// Short name of the value's shape, for error messages
    pub fn shape(&self) -> &'static str {
        match self {
            Scalar::Bool(_) => "bool",
            Scalar::Uint(_) => "integer",
            Scalar::U256(_) => "u256",
            Scalar::Address(_) => "address",
        }
    }

    /// Append this value encoded as `kind`
    ///
    /// # Errors
    ///
    /// - `ValueOutOfRange` if an integer does not fit `kind`
    /// - `TypeMismatch` if the value's shape does not match `kind`
    pub fn encode_into(&self, kind: ScalarKind, buf: &mut Vec<u8>) -> Result<()> {
        match (kind, self) {
            (ScalarKind::Bool, Scalar::Bool(b)) => buf.push(u8::from(*b)),
            (ScalarKind::U256, Scalar::U256(bytes)) => buf.extend_from_slice(bytes),
            (ScalarKind::U256, Scalar::Uint(v)) => {
                buf.extend_from_slice(&v.to_le_bytes());
                buf.extend_from_slice(&[0u8; 16]);
            }
            (ScalarKind::Address, Scalar::Address(addr)) => buf.extend_from_slice(addr.as_bytes()),
            (kind, Scalar::Uint(v)) => {
                let max = kind
                    .max_uint()
                    .ok_or_else(|| Error::type_mismatch(kind.name(), self.shape()))?;
                if *v > max {
                    return Err(Error::value_out_of_range(kind.name(), v));
                }
                write_uint(kind, *v, buf);
            }
            (kind, other) => return Err(Error::type_mismatch(kind.name(), other.shape())),
        }
        Ok(())
    }

    /// Read a scalar from exactly `kind.width()` bytes
    ///
    /// # Errors
    ///
    /// `TypeMismatch` if the slice has the wrong width or a bool byte is not 0 or 1.
    pub fn decode(kind: ScalarKind, bytes: &[u8]) -> Result<Self> {
        if bytes.len() != kind.width() {
            return Err(Error::type_mismatch(
                format!("{} bytes for {}", kind.width(), kind),
                format!("{} bytes", bytes.len()),
            ));
        }
        Ok(match kind {
            ScalarKind::Bool => match bytes[0] {
                0 => Scalar::Bool(false),
                1 => Scalar::Bool(true),
                other => return Err(Error::type_mismatch("bool byte 0 or 1", other.to_string())),
            },
            ScalarKind::U8 => Scalar::Uint(bytes[0] as u128),
            ScalarKind::U16 => Scalar::Uint(LittleEndian::read_u16(bytes) as u128),
            ScalarKind::U32 => Scalar::Uint(LittleEndian::read_u32(bytes) as u128),
            ScalarKind::U64 => Scalar::Uint(LittleEndian::read_u64(bytes) as u128),
            ScalarKind::U128 => Scalar::Uint(LittleEndian::read_u128(bytes)),
            ScalarKind::U256 => {
                let mut out = [0u8; 32];
                out.copy_from_slice(bytes);
                Scalar::U256(out)
            }
            ScalarKind::Address => {
                let mut out = [0u8; OBJECT_ID_LENGTH];
                out.copy_from_slice(bytes);
                Scalar::Address(Address::new(out))
            }
        })
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<u64> for Scalar {
    fn from(v: u64) -> Self {
        Scalar::Uint(v as u128)
    }
}

impl From<u32> for Scalar {
    fn from(v: u32) -> Self {
        Scalar::Uint(v as u128)
    }
}

impl From<u128> for Scalar {
    fn from(v: u128) -> Self {
        Scalar::Uint(v)
    }
}

impl From<Address> for Scalar {
    fn from(addr: Address) -> Self {
        Scalar::Address(addr)
    }
}

fn write_uint(kind: ScalarKind, v: u128, buf: &mut Vec<u8>) {
    let mut scratch = [0u8; 16];
    let width = kind.width();
    match kind {
        ScalarKind::U8 => scratch[0] = v as u8,
        ScalarKind::U16 => LittleEndian::write_u16(&mut scratch, v as u16),
        ScalarKind::U32 => LittleEndian::write_u32(&mut scratch, v as u32),
        ScalarKind::U64 => LittleEndian::write_u64(&mut scratch, v as u64),
        _ => LittleEndian::write_u128(&mut scratch, v),
    }
    buf.extend_from_slice(&scratch[..width.min(16)]);
}
