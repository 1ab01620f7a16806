//! End-to-end range query tests.
//!
//! A responder serves a populated in-memory store on one end of a memory
//! channel (in its own thread) while a blocking client queries the other end.

#[path = "../common/mod.rs"]
mod common;

mod end_to_end;
mod failures;
