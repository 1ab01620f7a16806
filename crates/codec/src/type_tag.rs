//! Type tags and their canonical encoding
//!
//! A [`TypeTag`] describes the declared type of a key. Its canonical bytes are
//! the last component of the child id preimage, which is what keeps two keys
//! with identical value bytes but different types from colliding.
//!
//! # Canonical Encoding
//!
//! ```text
//! primitive:  discriminant(1)
//! vector:     0x06 + encode(inner)
//! struct:     0x07 + address(32)
//!                  + uleb128(len) + module bytes
//!                  + uleb128(len) + name bytes
//!                  + uleb128(count) + encode(param)*
//! ```
//!
//! Discriminants are fixed by the external object model and MUST NOT change:
//! Bool=0, U8=1, U64=2, U128=3, Address=4, Signer=5, Vector=6, Struct=7,
//! U16=8, U32=9, U256=10. A wrong value here produces wrong identifiers with
//! no local error.
//!
//! # Display Form
//!
//! `u64`, `vector<u8>`, `0x2::coin::Coin<0x2::sui::SUI>`. Addresses are
//! rendered as the full 64-digit literal.

use crate::uleb::{decode_uleb128, encode_uleb128};
use childfield_core::{Address, Error, Result, MAX_TYPE_TAG_DEPTH, OBJECT_ID_LENGTH};
use std::fmt;
use std::str::FromStr;

/// Canonical discriminant bytes
pub mod discriminant {
    /// `bool`
    pub const BOOL: u8 = 0;
    /// `u8`
    pub const U8: u8 = 1;
    /// `u64`
    pub const U64: u8 = 2;
    /// `u128`
    pub const U128: u8 = 3;
    /// `address`
    pub const ADDRESS: u8 = 4;
    /// `signer`
    pub const SIGNER: u8 = 5;
    /// `vector<T>`
    pub const VECTOR: u8 = 6;
    /// struct
    pub const STRUCT: u8 = 7;
    /// `u16`
    pub const U16: u8 = 8;
    /// `u32`
    pub const U32: u8 = 9;
    /// `u256`
    pub const U256: u8 = 10;
}

/// Declared type of a key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeTag {
    /// `bool`
    Bool,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `u128`
    U128,
    /// `u256`
    U256,
    /// `address`
    Address,
    /// `signer`
    Signer,
    /// `vector<T>`
    Vector(Box<TypeTag>),
    /// `address::module::Name<T...>`
    Struct(Box<StructTag>),
}

/// Fully qualified struct type
///
/// Module and struct names are validated ASCII identifiers, so every
/// constructed tag encodes without error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructTag {
    address: Address,
    module: String,
    name: String,
    type_params: Vec<TypeTag>,
}

impl StructTag {
    /// Create a struct tag, validating module and struct names
    pub fn new(
        address: Address,
        module: impl Into<String>,
        name: impl Into<String>,
        type_params: Vec<TypeTag>,
    ) -> Result<Self> {
        let module = module.into();
        let name = name.into();
        validate_identifier(&module, "module")?;
        validate_identifier(&name, "struct")?;
        let tag = Self {
            address,
            module,
            name,
            type_params,
        };
        if tag.depth() > MAX_TYPE_TAG_DEPTH {
            return Err(Error::malformed_type_tag(format!(
                "type parameters nested deeper than {}",
                MAX_TYPE_TAG_DEPTH
            )));
        }
        Ok(tag)
    }

    /// Defining address
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Module name
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Struct name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type parameters, in declaration order
    pub fn type_params(&self) -> &[TypeTag] {
        &self.type_params
    }

    fn depth(&self) -> usize {
        1 + self.type_params.iter().map(TypeTag::depth).max().unwrap_or(0)
    }

    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.push(discriminant::STRUCT);
        buf.extend_from_slice(self.address.as_bytes());
        encode_uleb128(self.module.len() as u64, buf);
        buf.extend_from_slice(self.module.as_bytes());
        encode_uleb128(self.name.len() as u64, buf);
        buf.extend_from_slice(self.name.as_bytes());
        encode_uleb128(self.type_params.len() as u64, buf);
        for param in &self.type_params {
            param.encode_into(buf);
        }
    }
}

impl TypeTag {
    /// Build a struct type tag
    pub fn new_struct(
        address: Address,
        module: impl Into<String>,
        name: impl Into<String>,
        type_params: Vec<TypeTag>,
    ) -> Result<Self> {
        StructTag::new(address, module, name, type_params).map(|s| TypeTag::Struct(Box::new(s)))
    }

    /// Canonical one-byte discriminant of this variant
    pub fn discriminant(&self) -> u8 {
        match self {
            TypeTag::Bool => discriminant::BOOL,
            TypeTag::U8 => discriminant::U8,
            TypeTag::U16 => discriminant::U16,
            TypeTag::U32 => discriminant::U32,
            TypeTag::U64 => discriminant::U64,
            TypeTag::U128 => discriminant::U128,
            TypeTag::U256 => discriminant::U256,
            TypeTag::Address => discriminant::ADDRESS,
            TypeTag::Signer => discriminant::SIGNER,
            TypeTag::Vector(_) => discriminant::VECTOR,
            TypeTag::Struct(_) => discriminant::STRUCT,
        }
    }

    /// The struct tag, if this is a struct type
    pub fn as_struct(&self) -> Option<&StructTag> {
        match self {
            TypeTag::Struct(s) => Some(s),
            _ => None,
        }
    }

    /// Canonical bytes of this type tag
    ///
    /// Pure function of the tag: equal tags always produce identical bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.encode_into(&mut buf);
        buf
    }

    /// Append the canonical bytes of this type tag to `buf`
    pub fn encode_into(&self, buf: &mut Vec<u8>) {
        match self {
            TypeTag::Vector(inner) => {
                buf.push(discriminant::VECTOR);
                inner.encode_into(buf);
            }
            TypeTag::Struct(tag) => tag.encode_into(buf),
            primitive => buf.push(primitive.discriminant()),
        }
    }

    /// Parse canonical bytes back into a type tag
    ///
    /// The whole buffer must be consumed.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut reader = TagReader { bytes, pos: 0 };
        let tag = reader.read_tag(0)?;
        if reader.pos != bytes.len() {
            return Err(Error::malformed_type_tag(format!(
                "{} trailing bytes after type tag",
                bytes.len() - reader.pos
            )));
        }
        Ok(tag)
    }

    fn depth(&self) -> usize {
        match self {
            TypeTag::Vector(inner) => 1 + inner.depth(),
            TypeTag::Struct(tag) => tag.depth(),
            _ => 1,
        }
    }

    fn from_primitive_name(name: &str) -> Option<Self> {
        Some(match name {
            "bool" => TypeTag::Bool,
            "u8" => TypeTag::U8,
            "u16" => TypeTag::U16,
            "u32" => TypeTag::U32,
            "u64" => TypeTag::U64,
            "u128" => TypeTag::U128,
            "u256" => TypeTag::U256,
            "address" => TypeTag::Address,
            "signer" => TypeTag::Signer,
            _ => return None,
        })
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
            TypeTag::Struct(tag) => write!(f, "{}", tag),
        }
    }
}

impl fmt::Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.address, self.module, self.name)?;
        if !self.type_params.is_empty() {
            f.write_str("<")?;
            for (i, param) in self.type_params.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", param)?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl FromStr for TypeTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parser = TagParser { input: s, pos: 0 };
        let tag = parser.parse_type(0)?;
        parser.skip_whitespace();
        if parser.pos != s.len() {
            return Err(Error::malformed_type_tag(format!(
                "unexpected '{}' in '{}'",
                &s[parser.pos..],
                s
            )));
        }
        Ok(tag)
    }
}

/// Module and struct names: `[A-Za-z_][A-Za-z0-9_]*`, not a lone `_`
fn validate_identifier(name: &str, what: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
        Some('_') => name.len() > 1 && chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(Error::malformed_type_tag(format!(
            "invalid {} name '{}'",
            what,
            name.escape_debug()
        )))
    }
}

// ============================================================================
// Display-form parser
// ============================================================================

struct TagParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> TagParser<'a> {
    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn expect(&mut self, c: char) -> Result<()> {
        self.skip_whitespace();
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            Ok(())
        } else {
            Err(Error::malformed_type_tag(format!(
                "expected '{}' at position {} in '{}'",
                c, self.pos, self.input
            )))
        }
    }

    /// Path token: identifier characters and `::` separators
    fn read_path(&mut self) -> &'a str {
        let rest = &self.input[self.pos..];
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == ':'))
            .unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn parse_type(&mut self, depth: usize) -> Result<TypeTag> {
        if depth >= MAX_TYPE_TAG_DEPTH {
            return Err(Error::malformed_type_tag(format!(
                "type nested deeper than {}",
                MAX_TYPE_TAG_DEPTH
            )));
        }
        self.skip_whitespace();
        let path = self.read_path();
        if path.is_empty() {
            return Err(Error::malformed_type_tag(format!(
                "expected a type at position {} in '{}'",
                self.pos, self.input
            )));
        }

        if path == "vector" {
            self.expect('<')?;
            let inner = self.parse_type(depth + 1)?;
            self.expect('>')?;
            return Ok(TypeTag::Vector(Box::new(inner)));
        }

        if !path.contains("::") {
            return TypeTag::from_primitive_name(path).ok_or_else(|| {
                Error::malformed_type_tag(format!("unknown primitive type '{}'", path))
            });
        }

        let parts: Vec<&str> = path.split("::").collect();
        if parts.len() != 3 {
            return Err(Error::malformed_type_tag(format!(
                "struct type '{}' must have exactly 3 components (address::module::name), found {}",
                path,
                parts.len()
            )));
        }
        if !parts[0].starts_with("0x") {
            return Err(Error::malformed_type_tag(format!(
                "struct address '{}' must start with 0x",
                parts[0]
            )));
        }
        let address = Address::from_hex_literal(parts[0])
            .map_err(|e| Error::malformed_type_tag(format!("struct address: {}", e)))?;

        let mut type_params = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some('<') {
            self.pos += 1;
            loop {
                type_params.push(self.parse_type(depth + 1)?);
                self.skip_whitespace();
                match self.peek() {
                    Some(',') => self.pos += 1,
                    Some('>') => {
                        self.pos += 1;
                        break;
                    }
                    _ => {
                        return Err(Error::malformed_type_tag(format!(
                            "unterminated type parameter list in '{}'",
                            self.input
                        )))
                    }
                }
            }
        }

        TypeTag::new_struct(address, parts[1], parts[2], type_params)
    }
}

// ============================================================================
// Canonical-bytes reader
// ============================================================================

struct TagReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> TagReader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| {
                Error::malformed_type_tag(format!(
                    "type tag truncated: needed {} bytes at offset {}",
                    n, self.pos
                ))
            })?;
        let out = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn read_uleb(&mut self) -> Result<u64> {
        let (value, used) = decode_uleb128(&self.bytes[self.pos..]).map_err(|e| {
            Error::malformed_type_tag(format!("bad length at offset {}: {:?}", self.pos, e))
        })?;
        self.pos += used;
        Ok(value)
    }

    fn read_name(&mut self, what: &str) -> Result<String> {
        let len = self.read_uleb()?;
        let len = usize::try_from(len)
            .map_err(|_| Error::malformed_type_tag(format!("{} name length {}", what, len)))?;
        let raw = self.take(len)?;
        let name = std::str::from_utf8(raw)
            .map_err(|_| Error::malformed_type_tag(format!("{} name is not UTF-8", what)))?;
        validate_identifier(name, what)?;
        Ok(name.to_string())
    }

    fn read_tag(&mut self, depth: usize) -> Result<TypeTag> {
        if depth >= MAX_TYPE_TAG_DEPTH {
            return Err(Error::malformed_type_tag(format!(
                "type nested deeper than {}",
                MAX_TYPE_TAG_DEPTH
            )));
        }
        let disc = self.take(1)?[0];
        Ok(match disc {
            discriminant::BOOL => TypeTag::Bool,
            discriminant::U8 => TypeTag::U8,
            discriminant::U16 => TypeTag::U16,
            discriminant::U32 => TypeTag::U32,
            discriminant::U64 => TypeTag::U64,
            discriminant::U128 => TypeTag::U128,
            discriminant::U256 => TypeTag::U256,
            discriminant::ADDRESS => TypeTag::Address,
            discriminant::SIGNER => TypeTag::Signer,
            discriminant::VECTOR => TypeTag::Vector(Box::new(self.read_tag(depth + 1)?)),
            discriminant::STRUCT => {
                let mut address = [0u8; OBJECT_ID_LENGTH];
                address.copy_from_slice(self.take(OBJECT_ID_LENGTH)?);
                let module = self.read_name("module")?;
                let name = self.read_name("struct")?;
                let count = self.read_uleb()?;
                let mut type_params = Vec::new();
                for _ in 0..count {
                    type_params.push(self.read_tag(depth + 1)?);
                }
                TypeTag::new_struct(Address::new(address), module, name, type_params)?
            }
            other => {
                return Err(Error::malformed_type_tag(format!(
                    "unknown type tag discriminant {}",
                    other
                )))
            }
        })
    }
}
