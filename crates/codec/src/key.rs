//! Key types and key encoding
//!
//! A table's keys are either a primitive scalar (`u64`) or a struct wrapping
//! scalar fields (`0x..::i32::I32 { bits: u32 }`). The key value is encoded as
//! its fields, little-endian and concatenated, with no struct header: the type
//! information travels separately in the type tag.

use crate::scalar::{Scalar, ScalarKind};
use crate::type_tag::{StructTag, TypeTag};
use childfield_core::{Error, Result};
use std::fmt;

/// Declared type of a table's keys
///
/// Built once per table and shared across every derivation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyType {
    tag: TypeTag,
    fields: Vec<ScalarKind>,
}

/// A key value, shaped by its [`KeyType`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyValue {
    /// Value of a primitive key
    Scalar(Scalar),
    /// Field values of a struct key, in declaration order
    Fields(Vec<Scalar>),
}

impl KeyType {
    /// Key of a primitive scalar type
    pub fn primitive(kind: ScalarKind) -> Self {
        Self {
            tag: kind.type_tag(),
            fields: Vec::new(),
        }
    }

    /// Key of a struct type whose fields are all scalars
    pub fn wrapper(tag: StructTag, fields: Vec<ScalarKind>) -> Result<Self> {
        if fields.is_empty() {
            return Err(Error::malformed_type_tag(format!(
                "struct key {} declares no fields",
                tag
            )));
        }
        Ok(Self {
            tag: TypeTag::Struct(Box::new(tag)),
            fields,
        })
    }

    /// Build a key type from a type tag and, for structs, its field kinds
    ///
    /// # Errors
    ///
    /// `MalformedTypeTag` for `signer`, vectors, a primitive given fields, or
    /// a struct given none.
    pub fn from_tag(tag: TypeTag, fields: Vec<ScalarKind>) -> Result<Self> {
        match tag {
            TypeTag::Struct(s) => Self::wrapper(*s, fields),
            other => {
                let kind = ScalarKind::from_type_tag(&other).ok_or_else(|| {
                    Error::malformed_type_tag(format!("{} cannot be used as a key type", other))
                })?;
                if !fields.is_empty() {
                    return Err(Error::malformed_type_tag(format!(
                        "primitive key {} cannot declare fields",
                        other
                    )));
                }
                Ok(Self::primitive(kind))
            }
        }
    }

    /// The key's type tag
    pub fn type_tag(&self) -> &TypeTag {
        &self.tag
    }

    /// Field kinds of a struct key (empty for primitives)
    pub fn fields(&self) -> &[ScalarKind] {
        &self.fields
    }

    /// Scalar kind of a primitive key
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        ScalarKind::from_type_tag(&self.tag)
    }

    /// Encoded key width in bytes
    pub fn encoded_len(&self) -> usize {
        match self.scalar_kind() {
            Some(kind) => kind.width(),
            None => self.fields.iter().map(ScalarKind::width).sum(),
        }
    }

    /// Key value addressing the numeric window index `index`
    ///
    /// Integer primitives use the index directly. Single-field struct keys
    /// put the index in their one field, so a signed wrapper is addressed by
    /// its unsigned bit pattern.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` when the key has no single integer slot.
    pub fn key_for_index(&self, index: u64) -> Result<KeyValue> {
        let integer = |kind: ScalarKind| kind.max_uint().is_some();
        match (self.scalar_kind(), self.fields.as_slice()) {
            (Some(kind), _) if integer(kind) => Ok(KeyValue::Scalar(Scalar::from(index))),
            (None, [kind]) if integer(*kind) => Ok(KeyValue::Fields(vec![Scalar::from(index)])),
            _ => Err(Error::type_mismatch(
                "integer key or single integer field",
                self.to_string(),
            )),
        }
    }

    /// Canonical bytes of a key value
    ///
    /// # Errors
    ///
    /// - `ValueOutOfRange` if a value exceeds its declared width
    /// - `TypeMismatch` if the value's shape does not match the key type
    pub fn encode_key(&self, value: &KeyValue) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        match (self.scalar_kind(), value) {
            (Some(kind), KeyValue::Scalar(scalar)) => scalar.encode_into(kind, &mut buf)?,
            (None, KeyValue::Fields(values)) => {
                if values.len() != self.fields.len() {
                    return Err(Error::type_mismatch(
                        format!("{} fields for {}", self.fields.len(), self.tag),
                        format!("{} values", values.len()),
                    ));
                }
                for (kind, scalar) in self.fields.iter().zip(values) {
                    scalar.encode_into(*kind, &mut buf)?;
                }
            }
            (Some(_), KeyValue::Fields(_)) => {
                return Err(Error::type_mismatch(self.tag.to_string(), "struct fields"))
            }
            (None, KeyValue::Scalar(s)) => {
                return Err(Error::type_mismatch(self.tag.to_string(), s.shape()))
            }
        }
        Ok(buf)
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag)?;
        if !self.fields.is_empty() {
            let names: Vec<&str> = self.fields.iter().map(ScalarKind::name).collect();
            write!(f, " {{{}}}", names.join(", "))?;
        }
        Ok(())
    }
}

impl From<Scalar> for KeyValue {
    fn from(s: Scalar) -> Self {
        KeyValue::Scalar(s)
    }
}
