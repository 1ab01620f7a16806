//! Determinism and sensitivity of derivation

use crate::common::*;
use proptest::prelude::*;

#[test]
fn same_bytes_different_type_differ() {
    // u64 1000 and a struct holding (u32 1000, u32 0) share their key bytes.
    let wrapper: TypeTag = "0x2::pair::Pair".parse().unwrap();
    let pair = KeyType::from_tag(wrapper, vec![ScalarKind::U32, ScalarKind::U32]).unwrap();
    let pair_value = KeyValue::Fields(vec![Scalar::Uint(1000), Scalar::Uint(0)]);

    assert_eq!(
        pair.encode_key(&pair_value).unwrap(),
        u64_key().encode_key(&KeyValue::Scalar(Scalar::Uint(1000))).unwrap()
    );
    assert_ne!(
        derive_child_id(&parent(), &pair, &pair_value).unwrap(),
        derive_child_id_for_index(&parent(), &u64_key(), 1000).unwrap()
    );
}

#[test]
fn width_is_part_of_the_key() {
    let as_u32 = derive_child_id_for_index(&parent(), &KeyType::primitive(ScalarKind::U32), 5);
    let as_u64 = derive_child_id_for_index(&parent(), &u64_key(), 5);
    assert_ne!(as_u32.unwrap(), as_u64.unwrap());
}

#[test]
fn index_beyond_key_width_is_rejected() {
    let key = KeyType::primitive(ScalarKind::U8);
    let err = derive_child_id_for_index(&parent(), &key, 256).unwrap_err();
    assert!(matches!(err, childfield::Error::ValueOutOfRange { .. }));
}

proptest! {
    #[test]
    fn derivation_is_deterministic(parent_bytes in any::<[u8; 32]>(), index in any::<u64>()) {
        let parent = ObjectId::new(parent_bytes);
        let first = derive_child_id_for_index(&parent, &u64_key(), index).unwrap();
        let second = derive_child_id_for_index(&parent, &u64_key(), index).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn distinct_indices_give_distinct_ids(a in any::<u64>(), b in any::<u64>()) {
        prop_assume!(a != b);
        let id_a = derive_child_id_for_index(&parent(), &u64_key(), a).unwrap();
        let id_b = derive_child_id_for_index(&parent(), &u64_key(), b).unwrap();
        prop_assert_ne!(id_a, id_b);
    }

    #[test]
    fn distinct_parents_give_distinct_ids(a in any::<[u8; 32]>(), b in any::<[u8; 32]>()) {
        prop_assume!(a != b);
        let id_a = derive_child_id_for_index(&ObjectId::new(a), &u64_key(), 1).unwrap();
        let id_b = derive_child_id_for_index(&ObjectId::new(b), &u64_key(), 1).unwrap();
        prop_assert_ne!(id_a, id_b);
    }
}
