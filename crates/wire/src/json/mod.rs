//! JSON encoding of wire messages

pub mod envelope;
