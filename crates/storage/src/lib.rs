//! Child object storage for childfield
//!
//! This crate implements the server-side lookup path:
//! - ChildObjectStore: versioned read interface with owner validation
//! - MemoryStore: RwLock + BTreeMap in-memory implementation
//! - Window scans: dense, owner-validated and sparse (early stop on misses)
//!
//! # Concurrency
//!
//! `MemoryStore` is `Send + Sync`. Scans take a read lock per lookup, so
//! writers interleave with long scans instead of waiting for them.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod scan;
pub mod store;
pub mod stored_object;

pub use scan::{scan, scan_window, scan_window_sparse, scan_window_validated, FieldHit, ScanMode};
pub use store::{ChildObjectStore, MemoryStore, VersionChain};
pub use stored_object::StoredObject;
