//! Record decoding and encoding
//!
//! Fields are consumed left to right in schema order. Every read is bounds
//! checked against the remaining buffer, and the whole buffer must be
//! consumed: a short buffer and trailing bytes both fail with
//! `TruncatedRecord`.
//!
//! Newtype wrappers (`I32 { bits: u32 }`) decode as a nested record holding
//! the raw unsigned value. Sign conversion happens at the call site, see
//! [`crate::bits`].

use crate::scalar::{Scalar, ScalarKind};
use crate::schema::{FieldType, RecordSchema, SchemaRegistry};
use crate::uleb::{decode_uleb128, encode_uleb128, UlebError};
use childfield_core::{Address, Error, Result, MAX_RECORD_DEPTH};

// ============================================================================
// Values
// ============================================================================

/// Decoded value of one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// `bool`
    Bool(bool),
    /// Integer up to 128 bits
    Uint(u128),
    /// `u256`, little-endian bytes
    U256([u8; 32]),
    /// `address`
    Address(Address),
    /// Fixed array or vector elements
    Array(Vec<FieldValue>),
    /// Nested record
    Struct(Record),
}

impl FieldValue {
    /// Integer value
    pub fn as_uint(&self) -> Option<u128> {
        match self {
            FieldValue::Uint(v) => Some(*v),
            _ => None,
        }
    }

    /// Boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Address value
    pub fn as_address(&self) -> Option<&Address> {
        match self {
            FieldValue::Address(a) => Some(a),
            _ => None,
        }
    }

    /// Elements of an array or vector
    pub fn as_array(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Nested record
    pub fn as_struct(&self) -> Option<&Record> {
        match self {
            FieldValue::Struct(r) => Some(r),
            _ => None,
        }
    }

    /// Inner integer of a single-field wrapper record
    pub fn newtype_uint(&self) -> Option<u128> {
        match self.as_struct()?.fields() {
            [(_, inner)] => inner.as_uint(),
            _ => None,
        }
    }

    fn shape(&self) -> &'static str {
        match self {
            FieldValue::Bool(_) => "bool",
            FieldValue::Uint(_) => "integer",
            FieldValue::U256(_) => "u256",
            FieldValue::Address(_) => "address",
            FieldValue::Array(_) => "array",
            FieldValue::Struct(_) => "struct",
        }
    }

    fn as_scalar(&self) -> Option<Scalar> {
        Some(match self {
            FieldValue::Bool(b) => Scalar::Bool(*b),
            FieldValue::Uint(v) => Scalar::Uint(*v),
            FieldValue::U256(b) => Scalar::U256(*b),
            FieldValue::Address(a) => Scalar::Address(*a),
            _ => return None,
        })
    }
}

impl From<Scalar> for FieldValue {
    fn from(s: Scalar) -> Self {
        match s {
            Scalar::Bool(b) => FieldValue::Bool(b),
            Scalar::Uint(v) => FieldValue::Uint(v),
            Scalar::U256(b) => FieldValue::U256(b),
            Scalar::Address(a) => FieldValue::Address(a),
        }
    }
}

/// A decoded record: schema name plus named field values in schema order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    schema: String,
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    /// Build a record from field values in schema order
    pub fn new(schema: impl Into<String>, fields: Vec<(String, FieldValue)>) -> Self {
        Self {
            schema: schema.into(),
            fields,
        }
    }

    /// Name of the schema this record follows
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Named fields in schema order
    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    /// Field by name
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Consume into the field list
    pub fn into_fields(self) -> Vec<(String, FieldValue)> {
        self.fields
    }
}

// ============================================================================
// Decoding
// ============================================================================

struct ByteReader<'a> {
    schema: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(Error::TruncatedRecord {
                schema: self.schema.to_string(),
                offset: self.pos,
                needed: n,
                available: self.bytes.len(),
            });
        }
        let out = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn read_scalar(&mut self, kind: ScalarKind) -> Result<FieldValue> {
        let offset = self.pos;
        let raw = self.take(kind.width())?;
        Scalar::decode(kind, raw).map(FieldValue::from).map_err(|e| {
            Error::type_mismatch(
                format!("{} at offset {} of '{}'", kind, offset, self.schema),
                e.to_string(),
            )
        })
    }

    fn read_len(&mut self) -> Result<u64> {
        match decode_uleb128(&self.bytes[self.pos..]) {
            Ok((value, used)) => {
                self.pos += used;
                Ok(value)
            }
            Err(UlebError::Truncated) => Err(Error::TruncatedRecord {
                schema: self.schema.to_string(),
                offset: self.pos,
                needed: self.remaining() + 1,
                available: self.bytes.len(),
            }),
            Err(e) => Err(Error::malformed_input(format!(
                "vector length at offset {} of '{}': {:?}",
                self.pos, self.schema, e
            ))),
        }
    }
}

/// Decode `bytes` as one record of `schema`
///
/// # Errors
///
/// - `TruncatedRecord` if the buffer is shorter or longer than the schema
/// - `UnknownSchema` if a struct field names an unregistered schema
/// - `TypeMismatch` for an invalid bool byte
pub fn decode_record(
    registry: &SchemaRegistry,
    schema: &RecordSchema,
    bytes: &[u8],
) -> Result<Record> {
    let mut reader = ByteReader {
        schema: schema.name(),
        bytes,
        pos: 0,
    };
    let record = decode_fields(&mut reader, registry, schema, 0)?;
    if reader.pos != bytes.len() {
        return Err(Error::TruncatedRecord {
            schema: schema.name().to_string(),
            offset: reader.pos,
            needed: reader.pos,
            available: bytes.len(),
        });
    }
    Ok(record)
}

fn decode_fields(
    reader: &mut ByteReader<'_>,
    registry: &SchemaRegistry,
    schema: &RecordSchema,
    depth: usize,
) -> Result<Record> {
    if depth >= MAX_RECORD_DEPTH {
        return Err(Error::malformed_input(format!(
            "record '{}' nested deeper than {}",
            schema.name(),
            MAX_RECORD_DEPTH
        )));
    }
    let mut fields = Vec::with_capacity(schema.fields().len());
    for field in schema.fields() {
        let value = match &field.ty {
            FieldType::Scalar(kind) => reader.read_scalar(*kind)?,
            FieldType::Array(kind, len) => {
                let mut items = Vec::with_capacity((*len).min(reader.remaining()));
                for _ in 0..*len {
                    items.push(reader.read_scalar(*kind)?);
                }
                FieldValue::Array(items)
            }
            FieldType::Vector(kind) => {
                let count = reader.read_len()?;
                let needed = usize::try_from(count)
                    .ok()
                    .and_then(|c| c.checked_mul(kind.width()));
                match needed {
                    Some(n) if n <= reader.remaining() => {}
                    _ => {
                        return Err(Error::TruncatedRecord {
                            schema: reader.schema.to_string(),
                            offset: reader.pos,
                            needed: needed.unwrap_or(usize::MAX),
                            available: reader.bytes.len(),
                        })
                    }
                }
                let mut items = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    items.push(reader.read_scalar(*kind)?);
                }
                FieldValue::Array(items)
            }
            FieldType::Struct(name) => {
                let nested = registry.get(name)?;
                FieldValue::Struct(decode_fields(reader, registry, &nested, depth + 1)?)
            }
        };
        fields.push((field.name.clone(), value));
    }
    Ok(Record::new(schema.name(), fields))
}

// ============================================================================
// Encoding
// ============================================================================

/// Encode a record into the bytes [`decode_record`] accepts
///
/// # Errors
///
/// `TypeMismatch` when field names, order or shapes differ from the schema;
/// `ValueOutOfRange` when an integer exceeds its declared width.
pub fn encode_record(
    registry: &SchemaRegistry,
    schema: &RecordSchema,
    record: &Record,
) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    encode_fields(&mut buf, registry, schema, record, 0)?;
    Ok(buf)
}

fn encode_fields(
    buf: &mut Vec<u8>,
    registry: &SchemaRegistry,
    schema: &RecordSchema,
    record: &Record,
    depth: usize,
) -> Result<()> {
    if depth >= MAX_RECORD_DEPTH {
        return Err(Error::malformed_input(format!(
            "record '{}' nested deeper than {}",
            schema.name(),
            MAX_RECORD_DEPTH
        )));
    }
    if record.fields().len() != schema.fields().len() {
        return Err(Error::type_mismatch(
            format!("{} fields for '{}'", schema.fields().len(), schema.name()),
            format!("{} fields", record.fields().len()),
        ));
    }
    for (field, (name, value)) in schema.fields().iter().zip(record.fields()) {
        if field.name != *name {
            return Err(Error::type_mismatch(
                format!("field '{}'", field.name),
                format!("field '{}'", name),
            ));
        }
        match (&field.ty, value) {
            (FieldType::Scalar(kind), value) => encode_scalar(buf, *kind, value)?,
            (FieldType::Array(kind, len), FieldValue::Array(items)) => {
                if items.len() != *len {
                    return Err(Error::type_mismatch(
                        format!("{} elements in '{}'", len, field.name),
                        format!("{} elements", items.len()),
                    ));
                }
                for item in items {
                    encode_scalar(buf, *kind, item)?;
                }
            }
            (FieldType::Vector(kind), FieldValue::Array(items)) => {
                encode_uleb128(items.len() as u64, buf);
                for item in items {
                    encode_scalar(buf, *kind, item)?;
                }
            }
            (FieldType::Struct(name), FieldValue::Struct(nested)) => {
                let nested_schema = registry.get(name)?;
                encode_fields(buf, registry, &nested_schema, nested, depth + 1)?;
            }
            (ty, value) => {
                return Err(Error::type_mismatch(ty.to_string(), value.shape()));
            }
        }
    }
    Ok(())
}

fn encode_scalar(buf: &mut Vec<u8>, kind: ScalarKind, value: &FieldValue) -> Result<()> {
    value
        .as_scalar()
        .ok_or_else(|| Error::type_mismatch(kind.name(), value.shape()))?
        .encode_into(kind, buf)
}
