//! Integration tests for child id derivation.
//!
//! Pins derivation against known ids and checks that every component of the
//! preimage (parent, key bytes, key type) changes the result.

#[path = "../common/mod.rs"]
mod common;

mod properties;
mod vectors;
