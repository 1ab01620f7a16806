//! `Field<I32, TickInfo>` records

use crate::common::*;
use childfield::{bits_to_signed, decode_record, Error};

fn encoded_tick(tick: i32, liquidity_net: i128) -> (SchemaRegistry, Vec<u8>) {
    let registry = tick_registry();
    let schema = registry.get(TICK_FIELD).unwrap();
    let record = tick_record(ObjectId::new([9; 32]), tick, liquidity_net);
    let bytes = encode_record(&registry, &schema, &record).unwrap();
    (registry, bytes)
}

#[test]
fn decodes_negative_tick() {
    let (registry, bytes) = encoded_tick(-306, -42);
    let schema = registry.get(TICK_FIELD).unwrap();
    let record = decode_record(&registry, &schema, &bytes).unwrap();

    let name_bits = record.get("name").and_then(FieldValue::newtype_uint).unwrap();
    assert_eq!(name_bits, 4_294_966_990);
    assert_eq!(bits_to_signed(name_bits, 32).unwrap(), -306);

    let info = record.get("value").and_then(FieldValue::as_struct).unwrap();
    let net_bits = info
        .get("liquidity_net")
        .and_then(FieldValue::newtype_uint)
        .unwrap();
    assert_eq!(bits_to_signed(net_bits, 128).unwrap(), -42);
    assert_eq!(
        info.get("liquidity_gross").and_then(FieldValue::as_uint),
        Some(42)
    );
    let cumulative = info
        .get("tick_cumulative_out_side")
        .and_then(FieldValue::newtype_uint)
        .unwrap();
    assert_eq!(bits_to_signed(cumulative, 64).unwrap(), 306);
}

#[test]
fn decoded_record_matches_encoded() {
    let (registry, bytes) = encoded_tick(26, 1_000_000);
    let schema = registry.get(TICK_FIELD).unwrap();
    let record = decode_record(&registry, &schema, &bytes).unwrap();
    assert_eq!(record, tick_record(ObjectId::new([9; 32]), 26, 1_000_000));
    assert_eq!(
        record.get("id").and_then(FieldValue::as_address),
        Some(&ObjectId::new([9; 32]))
    );
}

#[test]
fn payload_layout_is_fixed() {
    let (_, bytes) = encoded_tick(1, 1);
    // id(32) + I32(4) + three u128(48) + I128(16) + vector len(1) + two u128(32)
    // + u64(8) + u128(16) + I64(8)
    assert_eq!(bytes.len(), 32 + 4 + 48 + 16 + 1 + 32 + 8 + 16 + 8);
}

#[test]
fn truncated_payload_is_rejected() {
    let (registry, bytes) = encoded_tick(5, 5);
    let schema = registry.get(TICK_FIELD).unwrap();
    let err = decode_record(&registry, &schema, &bytes[..bytes.len() - 1]).unwrap_err();
    assert!(matches!(err, Error::TruncatedRecord { .. }));
}

#[test]
fn trailing_bytes_are_rejected() {
    let (registry, mut bytes) = encoded_tick(5, 5);
    bytes.push(0);
    let schema = registry.get(TICK_FIELD).unwrap();
    let err = decode_record(&registry, &schema, &bytes).unwrap_err();
    assert!(matches!(err, Error::TruncatedRecord { .. }));
}

#[test]
fn unregistered_nested_schema_is_rejected() {
    let mut registry = SchemaRegistry::with_signed_wrappers();
    let schema = registry.register(RecordSchema::dynamic_field(
        TICK_FIELD,
        FieldType::structure("I32"),
        FieldType::structure("TickInfo"),
    ));
    let err = decode_record(&registry, &schema, &[0u8; 200]).unwrap_err();
    assert!(matches!(err, Error::UnknownSchema { .. }));
}
