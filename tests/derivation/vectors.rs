//! Known-answer vectors

use crate::common::*;

fn hex_id(s: &str) -> ObjectId {
    s.parse().unwrap()
}

#[test]
fn u64_key_1000() {
    let id = derive_child_id_for_index(&parent(), &u64_key(), 1000).unwrap();
    assert_eq!(
        id,
        hex_id("0x0dd9552423af3c00f1cdad00ce84c402e03248af0c04d277ef28df3d8c692abe")
    );
}

#[test]
fn u32_key_1000() {
    let key = KeyType::primitive(ScalarKind::U32);
    let id = derive_child_id_for_index(&parent(), &key, 1000).unwrap();
    assert_eq!(
        id,
        hex_id("0x23270a56dc1a6d20732a63efd54829d678af5197be96e950aee232e896c1a9d0")
    );
}

#[test]
fn i32_wrapper_negative_tick() {
    let bits = signed_to_bits(-306, 32).unwrap();
    assert_eq!(bits, 4_294_966_990);
    let id = derive_child_id(&parent(), &i32_key(), &KeyValue::Fields(vec![Scalar::Uint(bits)]))
        .unwrap();
    assert_eq!(
        id,
        hex_id("0x33115a6957fa06eb60cfc19698b2f54e4ddd9d92085a6fd8b3c0544126feeae4")
    );
}

#[test]
fn i32_wrapper_positive_tick() {
    let id = derive_child_id_for_index(&parent(), &i32_key(), 26).unwrap();
    assert_eq!(
        id,
        hex_id("0xf74cbe6edec382c1e46c84b0242a6e7032d69407ec856da2c04ca81a57ed7125")
    );
}

#[test]
fn short_parent_is_left_padded() {
    let short: ObjectId = "0x2".parse().unwrap();
    let id = derive_child_id_for_index(&short, &u64_key(), 7).unwrap();
    assert_eq!(
        id,
        hex_id("0x706adbca22d6f6ee42c9ff7e8dde13d823f8389e0a5fd16387ece35c151052dd")
    );
    let padded: ObjectId = "0x0000000000000000000000000000000000000000000000000000000000000002"
        .parse()
        .unwrap();
    assert_eq!(short, padded);
}

#[test]
fn preimage_layout() {
    let key_bytes = 1000u64.to_le_bytes();
    let preimage = child_id_preimage(&parent(), &TypeTag::U64, &key_bytes);

    assert_eq!(preimage[0], CHILD_OBJECT_INTENT);
    assert_eq!(&preimage[1..33], parent().as_bytes());
    assert_eq!(&preimage[33..41], &8u64.to_le_bytes());
    assert_eq!(&preimage[41..49], &key_bytes);
    assert_eq!(&preimage[49..], &[2u8]);
    assert_eq!(
        derive_child_id_from_bytes(&parent(), &TypeTag::U64, &key_bytes),
        derive_child_id_for_index(&parent(), &u64_key(), 1000).unwrap()
    );
}
