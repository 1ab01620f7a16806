//! Canonical encodings for childfield
//!
//! - `type_tag`: type descriptors, their display form and canonical bytes
//! - `scalar`: fixed-width little-endian scalars
//! - `key`: key types and key value encoding
//! - `derive`: child object id derivation (Blake2b-256)
//! - `bits`: signed values carried as unsigned bit patterns
//! - `schema` / `record`: record schemas and the record decoder
//!
//! Everything here is a pure function of its inputs and safe to call from
//! any number of threads.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bits;
pub mod derive;
pub mod key;
pub mod record;
pub mod scalar;
pub mod schema;
pub mod type_tag;
pub mod uleb;

pub use bits::{bits_to_signed, i32_from_bits, i32_to_bits, signed_to_bits};
pub use derive::{
    child_id_preimage, derive_child_id, derive_child_id_for_index, derive_child_id_from_bytes,
    CHILD_OBJECT_INTENT,
};
pub use key::{KeyType, KeyValue};
pub use record::{decode_record, encode_record, FieldValue, Record};
pub use scalar::{Scalar, ScalarKind};
pub use schema::{FieldSchema, FieldType, RecordSchema, SchemaRegistry};
pub use type_tag::{StructTag, TypeTag};
