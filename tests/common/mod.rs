//! Shared test utilities for all integration test suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from any suite's main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

use std::sync::{Arc, Once};

pub use childfield::{
    child_id_preimage, derive_child_id, derive_child_id_for_index, derive_child_id_from_bytes,
    encode_record, signed_to_bits, FieldRangeResponder, FieldType, FieldValue, KeyType, KeyValue,
    MemoryChannel, MemoryStore, ObjectId, ObjectVersion, RangeQueryClient, Record, RecordSchema,
    Scalar, ScalarKind, SchemaRegistry, TypeTag, CHILD_OBJECT_INTENT,
};

// ============================================================================
// Fixtures
// ============================================================================

/// Parent table used by the pinned derivation vectors.
pub const PARENT: &str = "0x260d9bb579adc62ce0d2a094c39cd062cd0db1fc0fbbc7922e8dd88e39a0da4b";

/// Signed 32-bit wrapper struct used as a tick key.
pub const I32_TYPE: &str =
    "0x70285592c97965e811e0c6f98dccc3a9c2b4ad854b3594faab9597ada267b860::i32::I32";

/// Schema name of the stored `Field<I32, TickInfo>` wrapper.
pub const TICK_FIELD: &str = "Field<I32, TickInfo>";

pub fn parent() -> ObjectId {
    PARENT.parse().expect("valid parent")
}

pub fn u64_key() -> KeyType {
    KeyType::primitive(ScalarKind::U64)
}

pub fn i32_key() -> KeyType {
    KeyType::from_tag(I32_TYPE.parse().expect("valid type"), vec![ScalarKind::U32])
        .expect("valid key type")
}

/// Registry holding the signed wrappers, `TickInfo` and its `Field` wrapper.
pub fn tick_registry() -> SchemaRegistry {
    let mut registry = SchemaRegistry::with_signed_wrappers();
    registry.register(
        RecordSchema::new("TickInfo")
            .field("fee_growth_outside_x", FieldType::Scalar(ScalarKind::U128))
            .field("fee_growth_outside_y", FieldType::Scalar(ScalarKind::U128))
            .field("liquidity_gross", FieldType::Scalar(ScalarKind::U128))
            .field("liquidity_net", FieldType::structure("I128"))
            .field("reward_growths_outside", FieldType::Vector(ScalarKind::U128))
            .field("seconds_out_side", FieldType::Scalar(ScalarKind::U64))
            .field(
                "seconds_per_liquidity_out_side",
                FieldType::Scalar(ScalarKind::U128),
            )
            .field("tick_cumulative_out_side", FieldType::structure("I64")),
    );
    registry.register(RecordSchema::dynamic_field(
        TICK_FIELD,
        FieldType::structure("I32"),
        FieldType::structure("TickInfo"),
    ));
    registry
}

fn newtype(schema: &str, bits: u128) -> FieldValue {
    FieldValue::Struct(Record::new(
        schema,
        vec![("bits".to_string(), FieldValue::Uint(bits))],
    ))
}

/// A `Field<I32, TickInfo>` record for `tick` with values derived from it.
pub fn tick_record(id: ObjectId, tick: i32, liquidity_net: i128) -> Record {
    let tick_info = Record::new(
        "TickInfo",
        vec![
            ("fee_growth_outside_x".to_string(), FieldValue::Uint(1)),
            ("fee_growth_outside_y".to_string(), FieldValue::Uint(2)),
            (
                "liquidity_gross".to_string(),
                FieldValue::Uint(liquidity_net.unsigned_abs()),
            ),
            (
                "liquidity_net".to_string(),
                newtype("I128", signed_to_bits(liquidity_net, 128).expect("fits")),
            ),
            (
                "reward_growths_outside".to_string(),
                FieldValue::Array(vec![FieldValue::Uint(10), FieldValue::Uint(20)]),
            ),
            ("seconds_out_side".to_string(), FieldValue::Uint(3600)),
            (
                "seconds_per_liquidity_out_side".to_string(),
                FieldValue::Uint(0),
            ),
            (
                "tick_cumulative_out_side".to_string(),
                newtype("I64", signed_to_bits(-(tick as i128), 64).expect("fits")),
            ),
        ],
    );
    Record::new(
        TICK_FIELD,
        vec![
            ("id".to_string(), FieldValue::Address(id)),
            (
                "name".to_string(),
                newtype("I32", signed_to_bits(tick as i128, 32).expect("fits")),
            ),
            ("value".to_string(), FieldValue::Struct(tick_info)),
        ],
    )
}

/// Store a `Field<I32, TickInfo>` child for each tick under `parent`, at `version`.
pub fn populate_ticks(
    store: &MemoryStore,
    registry: &SchemaRegistry,
    parent: &ObjectId,
    ticks: &[i32],
    version: u64,
) {
    let key = i32_key();
    let schema = registry.get(TICK_FIELD).expect("registered");
    for tick in ticks {
        let bits = signed_to_bits(*tick as i128, 32).expect("fits");
        let value = KeyValue::Fields(vec![Scalar::Uint(bits)]);
        let id = derive_child_id(parent, &key, &value).expect("derivable");
        let bytes = encode_record(registry, &schema, &tick_record(id, *tick, *tick as i128 * 7))
            .expect("encodable");
        store
            .insert_child(parent, &key, &value, ObjectVersion::new(version), bytes)
            .expect("insertable");
    }
}

// ============================================================================
// Logging
// ============================================================================

static INIT_TRACING: Once = Once::new();

/// Route `tracing` output to the test harness's captured stdout.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

// ============================================================================
// Responder harness
// ============================================================================

/// Spawn a responder serving one end of a memory channel; returns the client end.
pub fn spawn_responder(
    responder: FieldRangeResponder,
) -> (MemoryChannel, std::thread::JoinHandle<usize>) {
    let (client_end, mut server_end) = MemoryChannel::pair();
    let handle = std::thread::spawn(move || responder.serve(&mut server_end).unwrap_or(0));
    (client_end, handle)
}
