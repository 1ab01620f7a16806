//! Child object id derivation
//!
//! ```text
//! id = blake2b_256( intent(1) || parent(32) || len(key_bytes) as u64 LE (8)
//!                   || key_bytes || type_tag_bytes )
//! ```
//!
//! The explicit length and trailing type tag make the preimage
//! self-delimiting, so keys of different types never share an id even when
//! their value bytes coincide.

use crate::key::{KeyType, KeyValue};
use crate::type_tag::TypeTag;
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use byteorder::{ByteOrder, LittleEndian};
use childfield_core::{ObjectId, Result, OBJECT_ID_LENGTH};

/// Intent scope byte for child object ids
pub const CHILD_OBJECT_INTENT: u8 = 0x01;

type Blake2b256 = Blake2b<U32>;

/// Exact hash input for a child id
pub fn child_id_preimage(parent: &ObjectId, type_tag: &TypeTag, key_bytes: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(1 + OBJECT_ID_LENGTH + 8 + key_bytes.len() + 1);
    buf.push(CHILD_OBJECT_INTENT);
    buf.extend_from_slice(parent.as_bytes());

    let mut len = [0u8; 8];
    LittleEndian::write_u64(&mut len, key_bytes.len() as u64);
    buf.extend_from_slice(&len);

    buf.extend_from_slice(key_bytes);
    type_tag.encode_into(&mut buf);
    buf
}

/// Derive a child id from already-encoded key bytes
pub fn derive_child_id_from_bytes(
    parent: &ObjectId,
    type_tag: &TypeTag,
    key_bytes: &[u8],
) -> ObjectId {
    let preimage = child_id_preimage(parent, type_tag, key_bytes);
    let digest: [u8; OBJECT_ID_LENGTH] = Blake2b256::digest(&preimage).into();
    ObjectId::new(digest)
}

/// Derive a child id from a typed key
///
/// # Errors
///
/// Fails only when the key value does not match its type (`TypeMismatch`,
/// `ValueOutOfRange`).
///
/// # Examples
///
/// ```
/// use childfield_codec::{derive_child_id, KeyType, ScalarKind, Scalar, KeyValue};
/// use childfield_core::ObjectId;
///
/// let parent: ObjectId = "0x2".parse().unwrap();
/// let key = KeyType::primitive(ScalarKind::U64);
/// let a = derive_child_id(&parent, &key, &KeyValue::Scalar(Scalar::Uint(7))).unwrap();
/// let b = derive_child_id(&parent, &key, &KeyValue::Scalar(Scalar::Uint(7))).unwrap();
/// assert_eq!(a, b);
/// ```
pub fn derive_child_id(parent: &ObjectId, key_type: &KeyType, key: &KeyValue) -> Result<ObjectId> {
    let key_bytes = key_type.encode_key(key)?;
    Ok(derive_child_id_from_bytes(
        parent,
        key_type.type_tag(),
        &key_bytes,
    ))
}

/// Derive the child id addressing window index `index`
pub fn derive_child_id_for_index(
    parent: &ObjectId,
    key_type: &KeyType,
    index: u64,
) -> Result<ObjectId> {
    derive_child_id(parent, key_type, &key_type.key_for_index(index)?)
}
