//! Child object store
//!
//! [`ChildObjectStore`] is the read interface range scans run against.
//! Persistent engines implement it outside this workspace; [`MemoryStore`]
//! is the in-process implementation used by the responder and tests.
//!
//! # Version Handling
//!
//! Each object id maps to a version chain. Reads take a version pin and
//! return the highest stored version at or below it, so a query pinned to a
//! parent version never observes children written later.

use crate::stored_object::StoredObject;
use childfield_codec::{derive_child_id, KeyType, KeyValue};
use childfield_core::{Error, ObjectId, ObjectVersion, Result};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::debug;

/// Read access to versioned child objects
pub trait ChildObjectStore: Send + Sync {
    /// Highest stored version of `id` at or below `version`
    fn find_object_at_or_before(
        &self,
        id: &ObjectId,
        version: ObjectVersion,
    ) -> Result<Option<StoredObject>>;

    /// Like [`find_object_at_or_before`](Self::find_object_at_or_before),
    /// but the object must be owned by `parent`
    ///
    /// # Errors
    ///
    /// `Storage` if the object exists under a different owner.
    fn read_child_object(
        &self,
        parent: &ObjectId,
        child: &ObjectId,
        version: ObjectVersion,
    ) -> Result<Option<StoredObject>> {
        match self.find_object_at_or_before(child, version)? {
            Some(object) if object.owner() != parent => Err(Error::storage(format!(
                "child {} is owned by {}, not {}",
                child,
                object.owner(),
                parent
            ))),
            found => Ok(found),
        }
    }
}

/// Versions of one object, ordered by version
#[derive(Debug, Clone, Default)]
pub struct VersionChain {
    versions: BTreeMap<ObjectVersion, StoredObject>,
}

impl VersionChain {
    /// Add a version, replacing any copy already stored at the same version
    pub fn push(&mut self, object: StoredObject) {
        self.versions.insert(object.version(), object);
    }

    /// Highest version at or below `max_version`
    pub fn get_at_version(&self, max_version: ObjectVersion) -> Option<&StoredObject> {
        self.versions
            .range(..=max_version)
            .next_back()
            .map(|(_, object)| object)
    }

    /// Newest version
    pub fn latest(&self) -> Option<&StoredObject> {
        self.versions.values().next_back()
    }

    /// Number of versions stored
    pub fn version_count(&self) -> usize {
        self.versions.len()
    }
}

/// Thread-safe in-memory child object store
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RwLock<BTreeMap<ObjectId, VersionChain>>,
}

impl MemoryStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store one version of an object
    pub fn insert(&self, object: StoredObject) {
        debug!(
            target: "childfield::store",
            id = %object.id(),
            owner = %object.owner(),
            version = object.version().value(),
            bytes = object.contents().len(),
            "insert"
        );
        self.objects
            .write()
            .entry(*object.id())
            .or_default()
            .push(object);
    }

    /// Derive the child id for `key` under `parent` and store `contents` there
    ///
    /// Returns the derived id.
    pub fn insert_child(
        &self,
        parent: &ObjectId,
        key_type: &KeyType,
        key: &KeyValue,
        version: ObjectVersion,
        contents: Vec<u8>,
    ) -> Result<ObjectId> {
        let id = derive_child_id(parent, key_type, key)?;
        self.insert(StoredObject::new(id, *parent, version, contents));
        Ok(id)
    }

    /// Number of distinct object ids
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    /// Whether the store holds no objects
    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }

    /// Number of versions stored for `id`
    pub fn version_count(&self, id: &ObjectId) -> usize {
        self.objects
            .read()
            .get(id)
            .map(VersionChain::version_count)
            .unwrap_or(0)
    }

    /// Newest stored version of `id`
    pub fn latest(&self, id: &ObjectId) -> Option<StoredObject> {
        self.objects.read().get(id)?.latest().cloned()
    }
}

impl ChildObjectStore for MemoryStore {
    fn find_object_at_or_before(
        &self,
        id: &ObjectId,
        version: ObjectVersion,
    ) -> Result<Option<StoredObject>> {
        Ok(self
            .objects
            .read()
            .get(id)
            .and_then(|chain| chain.get_at_version(version))
            .cloned())
    }
}
