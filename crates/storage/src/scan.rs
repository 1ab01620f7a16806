//! Window scans over a parent's children
//!
//! Every index in the window is mapped to a key, the child id is derived and
//! the store is asked for the object at or below the version pin. Hits come
//! back in ascending index order.
//!
//! Indices whose key cannot represent them (index above `u32::MAX` for a
//! `u32` key) cannot have a stored child and count as misses.

use crate::store::ChildObjectStore;
use childfield_codec::{derive_child_id_for_index, KeyType};
use childfield_core::{Error, IndexWindow, ObjectId, ObjectVersion, Result};
use tracing::debug;

/// A child found in a window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldHit {
    /// Window index
    pub index: u64,
    /// Derived child id
    pub field_id: ObjectId,
    /// Serialized record bytes
    pub bcs_bytes: Vec<u8>,
    /// Version the object was read at
    pub version: ObjectVersion,
}

/// How a scan looks children up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Every index, no owner check
    Dense,
    /// Every index, each hit must be owned by the parent
    Validated,
    /// Stop after this many consecutive misses
    Sparse {
        /// Misses in a row that end the scan
        max_consecutive_misses: usize,
    },
}

/// Scan every index of `window`
pub fn scan_window(
    store: &dyn ChildObjectStore,
    parent: &ObjectId,
    key_type: &KeyType,
    window: IndexWindow,
    version: ObjectVersion,
) -> Result<Vec<FieldHit>> {
    scan(store, parent, key_type, window, version, ScanMode::Dense)
}

/// Scan every index of `window`, requiring each hit to be owned by `parent`
pub fn scan_window_validated(
    store: &dyn ChildObjectStore,
    parent: &ObjectId,
    key_type: &KeyType,
    window: IndexWindow,
    version: ObjectVersion,
) -> Result<Vec<FieldHit>> {
    scan(store, parent, key_type, window, version, ScanMode::Validated)
}

/// Scan `window` from its lower end, stopping after `max_consecutive_misses` misses in a row
pub fn scan_window_sparse(
    store: &dyn ChildObjectStore,
    parent: &ObjectId,
    key_type: &KeyType,
    window: IndexWindow,
    version: ObjectVersion,
    max_consecutive_misses: usize,
) -> Result<Vec<FieldHit>> {
    scan(
        store,
        parent,
        key_type,
        window,
        version,
        ScanMode::Sparse {
            max_consecutive_misses,
        },
    )
}

/// Scan `window` in the given mode
pub fn scan(
    store: &dyn ChildObjectStore,
    parent: &ObjectId,
    key_type: &KeyType,
    window: IndexWindow,
    version: ObjectVersion,
    mode: ScanMode,
) -> Result<Vec<FieldHit>> {
    let mut hits = Vec::new();
    let mut consecutive_misses = 0usize;

    for index in window.indices() {
        let field_id = match derive_child_id_for_index(parent, key_type, index) {
            Ok(id) => Some(id),
            Err(Error::ValueOutOfRange { .. }) => None,
            Err(e) => return Err(e),
        };

        let found = match (field_id, mode) {
            (None, _) => None,
            (Some(id), ScanMode::Validated) => store.read_child_object(parent, &id, version)?,
            (Some(id), _) => store.find_object_at_or_before(&id, version)?,
        };

        match found {
            Some(object) => {
                consecutive_misses = 0;
                hits.push(FieldHit {
                    index,
                    field_id: *object.id(),
                    version: object.version(),
                    bcs_bytes: object.into_contents(),
                });
            }
            None => {
                consecutive_misses += 1;
                if let ScanMode::Sparse {
                    max_consecutive_misses,
                } = mode
                {
                    if consecutive_misses >= max_consecutive_misses {
                        debug!(
                            target: "childfield::store",
                            %parent,
                            index,
                            misses = consecutive_misses,
                            "sparse scan stopped early"
                        );
                        break;
                    }
                }
            }
        }
    }

    debug!(
        target: "childfield::store",
        %parent,
        %window,
        hits = hits.len(),
        ?mode,
        "window scanned"
    );
    Ok(hits)
}
