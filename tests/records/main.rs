//! Integration tests for record decoding.
//!
//! Uses the `Field<I32, TickInfo>` layout stored for concentrated liquidity
//! ticks: an id, a signed tick key and a nine-field payload with nested
//! signed wrappers and a vector.

#[path = "../common/mod.rs"]
mod common;

mod tick_info;
