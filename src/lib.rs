//! childfield - content-addressed child objects and windowed range queries
//!
//! childfield derives the identifier of a keyed child object from its parent
//! id and typed key, and streams a numeric window of such children from a
//! remote store back to a client, decoding each record on arrival.
//!
//! # Quick Start
//!
//! ```
//! use childfield::{derive_child_id_for_index, KeyType, ObjectId, ScalarKind};
//!
//! let parent: ObjectId = "0x260d9bb579adc62ce0d2a094c39cd062cd0db1fc0fbbc7922e8dd88e39a0da4b"
//!     .parse()
//!     .unwrap();
//! let key = KeyType::primitive(ScalarKind::U64);
//! let id = derive_child_id_for_index(&parent, &key, 1000).unwrap();
//! assert_eq!(
//!     id.to_string(),
//!     "0x0dd9552423af3c00f1cdad00ce84c402e03248af0c04d277ef28df3d8c692abe"
//! );
//! ```
//!
//! # Architecture
//!
//! - `childfield-core`: ids, versions, windows, errors, limits
//! - `childfield-codec`: type tags, keys, id derivation, record decoding
//! - `childfield-wire`: JSON request/response messages
//! - `childfield-storage`: versioned child object store and window scans
//! - `childfield-session`: client state machine, client driver, responder, config

pub use childfield_codec::*;
pub use childfield_core::*;
pub use childfield_session::*;
pub use childfield_storage::*;
pub use childfield_wire::*;
