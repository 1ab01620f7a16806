//! Stored child objects
//!
//! A child object is the serialized `Field<K, V>` record for one key, owned
//! by its parent table and written at some version.

use childfield_core::{ObjectId, ObjectVersion};

/// One version of a stored child object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    id: ObjectId,
    owner: ObjectId,
    version: ObjectVersion,
    contents: Vec<u8>,
}

impl StoredObject {
    /// Create a stored object
    pub fn new(id: ObjectId, owner: ObjectId, version: ObjectVersion, contents: Vec<u8>) -> Self {
        Self {
            id,
            owner,
            version,
            contents,
        }
    }

    /// Object id (the derived child id)
    pub fn id(&self) -> &ObjectId {
        &self.id
    }

    /// Owning parent
    pub fn owner(&self) -> &ObjectId {
        &self.owner
    }

    /// Version this copy was written at
    pub fn version(&self) -> ObjectVersion {
        self.version
    }

    /// Serialized record bytes
    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    /// Consume into the serialized record bytes
    pub fn into_contents(self) -> Vec<u8> {
        self.contents
    }
}
