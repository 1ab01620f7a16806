//! Core types for childfield
//!
//! This crate defines the foundational types shared by every layer:
//! - ObjectId: 32-byte content-addressed identifier (also used for addresses)
//! - ObjectVersion: sequence number of a stored object
//! - IndexWindow: inclusive numeric window around a center index
//! - Error: error taxonomy shared by codec, wire, storage and session
//! - Limits: bounds on nesting depth and query radius

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod id;
pub mod limits;
pub mod version;
pub mod window;

pub use error::{Error, Result};
pub use id::{Address, ObjectId, OBJECT_ID_LENGTH};
pub use limits::{Limits, MAX_RECORD_DEPTH, MAX_TYPE_TAG_DEPTH};
pub use version::ObjectVersion;
pub use window::IndexWindow;
