//! Record schemas and the schema registry
//!
//! A [`RecordSchema`] is the ordered field list of one stored record kind.
//! Struct fields refer to other schemas by name and are resolved through a
//! [`SchemaRegistry`] at decode time.

use crate::scalar::ScalarKind;
use childfield_core::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Type of one record field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Single fixed-width scalar
    Scalar(ScalarKind),
    /// Fixed-length array of scalars, no length prefix
    Array(ScalarKind, usize),
    /// ULEB128 count followed by that many scalars
    Vector(ScalarKind),
    /// Nested record, by schema name
    Struct(String),
}

impl FieldType {
    /// Nested record field
    pub fn structure(name: impl Into<String>) -> Self {
        FieldType::Struct(name.into())
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Scalar(kind) => write!(f, "{}", kind),
            FieldType::Array(kind, len) => write!(f, "[{}; {}]", kind, len),
            FieldType::Vector(kind) => write!(f, "vector<{}>", kind),
            FieldType::Struct(name) => f.write_str(name),
        }
    }
}

/// One named field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldSchema {
    /// Field name
    pub name: String,
    /// Field type
    pub ty: FieldType,
}

/// Ordered field list of a record kind
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordSchema {
    name: String,
    fields: Vec<FieldSchema>,
}

impl RecordSchema {
    /// Empty schema; add fields with [`RecordSchema::field`]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field
    pub fn field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.fields.push(FieldSchema {
            name: name.into(),
            ty,
        });
        self
    }

    /// Single-field wrapper around a scalar, such as `I32 { bits: u32 }`
    pub fn newtype(name: impl Into<String>, field: impl Into<String>, kind: ScalarKind) -> Self {
        Self::new(name).field(field, FieldType::Scalar(kind))
    }

    /// The `{ id: address, name: K, value: V }` wrapper stored for each child
    pub fn dynamic_field(name: impl Into<String>, key_ty: FieldType, value_ty: FieldType) -> Self {
        Self::new(name)
            .field("id", FieldType::Scalar(ScalarKind::Address))
            .field("name", key_ty)
            .field("value", value_ty)
    }

    /// Schema name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }
}

/// Named schemas, shared across decodes
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Arc<RecordSchema>>,
}

impl SchemaRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-loaded with the signed wrappers `I32`, `I64` and `I128`
    pub fn with_signed_wrappers() -> Self {
        let mut registry = Self::new();
        registry.register(RecordSchema::newtype("I32", "bits", ScalarKind::U32));
        registry.register(RecordSchema::newtype("I64", "bits", ScalarKind::U64));
        registry.register(RecordSchema::newtype("I128", "bits", ScalarKind::U128));
        registry
    }

    /// Add or replace a schema, returning the shared handle
    pub fn register(&mut self, schema: RecordSchema) -> Arc<RecordSchema> {
        let schema = Arc::new(schema);
        self.schemas
            .insert(schema.name().to_string(), Arc::clone(&schema));
        schema
    }

    /// Look up a schema by name
    ///
    /// # Errors
    ///
    /// `UnknownSchema` if no schema has that name.
    pub fn get(&self, name: &str) -> Result<Arc<RecordSchema>> {
        self.schemas
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownSchema {
                name: name.to_string(),
            })
    }

    /// Whether a schema is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Number of registered schemas
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_order() {
        let schema = RecordSchema::new("Pair")
            .field("a", FieldType::Scalar(ScalarKind::U8))
            .field("b", FieldType::Array(ScalarKind::U16, 3));
        let names: Vec<_> = schema.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_dynamic_field_layout() {
        let schema = RecordSchema::dynamic_field(
            "Field<u64, u64>",
            FieldType::Scalar(ScalarKind::U64),
            FieldType::Scalar(ScalarKind::U64),
        );
        assert_eq!(schema.fields().len(), 3);
        assert_eq!(schema.fields()[0].ty, FieldType::Scalar(ScalarKind::Address));
        assert_eq!(schema.fields()[1].name, "name");
    }

    #[test]
    fn test_registry_lookup() {
        let registry = SchemaRegistry::with_signed_wrappers();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get("I32").unwrap().fields()[0].name, "bits");
        assert!(matches!(
            registry.get("I16"),
            Err(Error::UnknownSchema { ref name }) if name == "I16"
        ));
    }

    #[test]
    fn test_field_type_display() {
        assert_eq!(FieldType::Array(ScalarKind::U8, 4).to_string(), "[u8; 4]");
        assert_eq!(FieldType::Vector(ScalarKind::U128).to_string(), "vector<u128>");
        assert_eq!(FieldType::structure("I32").to_string(), "I32");
    }
}
