//! Successful queries

use crate::common::*;
use childfield::{bits_to_signed, ChildObjectStore, QueryConfig, RangeQueryRequest, ScanMode};
use std::collections::HashSet;
use std::sync::Arc;

fn tick_store(ticks: &[i32], version: u64) -> (Arc<MemoryStore>, Arc<SchemaRegistry>) {
    let store = Arc::new(MemoryStore::new());
    let registry = tick_registry();
    populate_ticks(&store, &registry, &parent(), ticks, version);
    (store, Arc::new(registry))
}

fn responder(store: &Arc<MemoryStore>) -> FieldRangeResponder {
    let store: Arc<dyn ChildObjectStore> = store.clone();
    FieldRangeResponder::new(store, i32_key())
}

#[test]
fn window_returns_present_ticks_in_order() {
    init_tracing();
    let (store, registry) = tick_store(&[3, 10, 12, 15, 26], 1);
    let (channel, server) = spawn_responder(responder(&store));
    let mut client = RangeQueryClient::new(channel, registry.clone());

    let result = client
        .query(
            RangeQueryRequest::new(parent(), 14, 5),
            registry.get(TICK_FIELD).unwrap(),
        )
        .unwrap();

    assert_eq!(result.indices(), vec![10, 12, 15]);
    assert!(result.failures.is_empty());
    assert_eq!(result.total_fields, 3);
    assert!(result.count_consistent());

    let field = result.get(12).unwrap();
    let expected_id = derive_child_id_for_index(&parent(), &i32_key(), 12).unwrap();
    assert_eq!(field.field_id, expected_id);
    let tick = field.record.get("name").and_then(FieldValue::newtype_uint).unwrap();
    assert_eq!(bits_to_signed(tick, 32).unwrap(), 12);

    drop(client.into_channel());
    assert_eq!(server.join().unwrap(), 1);
}

#[test]
fn results_stay_inside_the_window() {
    let ticks: Vec<i32> = (0..60).collect();
    let (store, registry) = tick_store(&ticks, 1);
    let (channel, server) = spawn_responder(responder(&store));
    let mut client = RangeQueryClient::new(channel, registry.clone());
    let schema = registry.get(TICK_FIELD).unwrap();

    for (center, radius) in [(0u64, 4u64), (30, 0), (58, 5), (2, 10)] {
        let request = RangeQueryRequest::new(parent(), center, radius);
        let window = request.window();
        let result = client.query(request, schema.clone()).unwrap();

        let indices = result.indices();
        let unique: HashSet<u64> = indices.iter().copied().collect();
        assert_eq!(unique.len(), indices.len());
        assert!(indices.iter().all(|i| window.contains(*i)));
        let expected = window.indices().filter(|i| *i < 60).count();
        assert_eq!(indices.len(), expected, "window {}", window);
    }

    drop(client.into_channel());
    assert_eq!(server.join().unwrap(), 4);
}

#[test]
fn version_pin_hides_later_children() {
    let (store, registry) = tick_store(&[10, 12], 1);
    populate_ticks(&store, &registry, &parent(), &[11], 5);
    let (channel, server) = spawn_responder(responder(&store));
    let mut client = RangeQueryClient::new(channel, registry.clone());
    let schema = registry.get(TICK_FIELD).unwrap();

    let pinned = client
        .query(
            RangeQueryRequest::new(parent(), 11, 2).at_version(3),
            schema.clone(),
        )
        .unwrap();
    assert_eq!(pinned.indices(), vec![10, 12]);

    let latest = client
        .query(RangeQueryRequest::new(parent(), 11, 2), schema)
        .unwrap();
    assert_eq!(latest.indices(), vec![10, 11, 12]);
    assert_eq!(latest.get(11).unwrap().version, ObjectVersion::new(5));

    drop(client.into_channel());
    server.join().unwrap();
}

#[test]
fn other_parent_sees_nothing() {
    let (store, registry) = tick_store(&[1, 2, 3], 1);
    let (channel, server) = spawn_responder(responder(&store));
    let mut client = RangeQueryClient::new(channel, registry.clone());

    let result = client
        .query(
            RangeQueryRequest::new(ObjectId::new([1; 32]), 2, 2),
            registry.get(TICK_FIELD).unwrap(),
        )
        .unwrap();
    assert!(result.fields.is_empty());
    assert_eq!(result.total_fields, 0);

    drop(client.into_channel());
    server.join().unwrap();
}

#[test]
fn sparse_config_stops_after_gap() {
    let (store, registry) = tick_store(&[0, 1, 9], 1);
    let config = QueryConfig {
        key_type: I32_TYPE.to_string(),
        key_fields: vec![ScalarKind::U32],
        max_consecutive_misses: Some(3),
        ..QueryConfig::default()
    };
    let dyn_store: Arc<dyn ChildObjectStore> = store.clone();
    let responder = FieldRangeResponder::from_config(dyn_store, &config).unwrap();
    assert_eq!(
        config.scan_mode(),
        ScanMode::Sparse {
            max_consecutive_misses: 3
        }
    );
    let (channel, server) = spawn_responder(responder);
    let mut client = RangeQueryClient::from_config(channel, registry.clone(), &config);

    let result = client
        .query(
            RangeQueryRequest::new(parent(), 5, 5),
            registry.get(TICK_FIELD).unwrap(),
        )
        .unwrap();
    assert_eq!(result.indices(), vec![0, 1]);

    drop(client.into_channel());
    server.join().unwrap();
}
