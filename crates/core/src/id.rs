//! Object identifiers
//!
//! An [`ObjectId`] is an opaque 32-byte value. Parent tables, derived child
//! objects and struct addresses all share this representation.
//!
//! ## Text form
//!
//! `0x` followed by exactly 64 lowercase hex digits. Parsing is lenient in
//! one direction only: shorter inputs (leading zero bytes dropped, odd digit
//! count) are left-padded to 32 bytes. Longer inputs are rejected.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Length of an object identifier in bytes
pub const OBJECT_ID_LENGTH: usize = 32;

/// Text prefix of the identifier display form
const HEX_PREFIX: &str = "0x";

/// 32-byte object identifier
///
/// Equality is byte equality. Ordering is lexicographic over the bytes,
/// which gives stores a stable iteration order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ObjectId([u8; OBJECT_ID_LENGTH]);

/// Struct addresses use the same 32-byte representation as object ids
pub type Address = ObjectId;

impl ObjectId {
    /// The all-zero identifier
    pub const ZERO: Self = Self([0u8; OBJECT_ID_LENGTH]);

    /// Create an identifier from exactly 32 bytes
    pub const fn new(bytes: [u8; OBJECT_ID_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Create an identifier from up to 32 bytes, left-padding with zeros
    ///
    /// Short inputs are a defined normalization (a display string that lost
    /// its leading zero bytes). Inputs longer than 32 bytes are rejected
    /// rather than truncated.
    ///
    /// # Examples
    ///
    /// ```
    /// use childfield_core::ObjectId;
    ///
    /// let short = ObjectId::from_padded_bytes(&[0x02]).unwrap();
    /// let mut full = [0u8; 32];
    /// full[31] = 0x02;
    /// assert_eq!(short, ObjectId::new(full));
    ///
    /// assert!(ObjectId::from_padded_bytes(&[0u8; 33]).is_err());
    /// ```
    pub fn from_padded_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() > OBJECT_ID_LENGTH {
            return Err(Error::malformed_input(format!(
                "identifier is {} bytes, maximum is {}",
                bytes.len(),
                OBJECT_ID_LENGTH
            )));
        }
        let mut out = [0u8; OBJECT_ID_LENGTH];
        out[OBJECT_ID_LENGTH - bytes.len()..].copy_from_slice(bytes);
        Ok(Self(out))
    }

    /// Parse an identifier from hex, with or without the `0x` prefix
    pub fn from_hex_literal(s: &str) -> Result<Self> {
        let digits = s.strip_prefix(HEX_PREFIX).unwrap_or(s);
        if digits.is_empty() {
            return Err(Error::malformed_input(format!(
                "identifier '{}' has no hex digits",
                s
            )));
        }

        let bytes = if digits.len() % 2 == 1 {
            hex::decode(format!("0{}", digits))
        } else {
            hex::decode(digits)
        }
        .map_err(|e| Error::malformed_input(format!("identifier '{}': {}", s, e)))?;

        Self::from_padded_bytes(&bytes)
    }

    /// Raw bytes of the identifier
    pub fn as_bytes(&self) -> &[u8; OBJECT_ID_LENGTH] {
        &self.0
    }

    /// Consume into raw bytes
    pub fn into_bytes(self) -> [u8; OBJECT_ID_LENGTH] {
        self.0
    }

    /// Display form: `0x` + 64 lowercase hex digits
    pub fn to_hex_literal(&self) -> String {
        format!("{}{}", HEX_PREFIX, hex::encode(self.0))
    }
}

impl From<[u8; OBJECT_ID_LENGTH]> for ObjectId {
    fn from(bytes: [u8; OBJECT_ID_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for ObjectId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for ObjectId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex_literal(s)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex_literal())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex_literal())
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex_literal())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ObjectId::from_hex_literal(&s).map_err(serde::de::Error::custom)
    }
}
