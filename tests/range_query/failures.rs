//! Partial and total failures

use crate::common::*;
use childfield::{
    decode_request, encode_response, Channel, ChildObjectStore, Error, Limits, RangeQueryRequest,
    ServerMessage,
};
use std::sync::Arc;

#[test]
fn corrupt_payload_fails_only_its_item() {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let registry = tick_registry();
    populate_ticks(&store, &registry, &parent(), &[4, 6], 1);
    let key = i32_key();
    store
        .insert_child(
            &parent(),
            &key,
            &key.key_for_index(5).unwrap(),
            ObjectVersion::new(1),
            vec![0u8; 7],
        )
        .unwrap();

    let dyn_store: Arc<dyn ChildObjectStore> = store.clone();
    let (channel, server) = spawn_responder(FieldRangeResponder::new(dyn_store, key));
    let registry = Arc::new(registry);
    let mut client = RangeQueryClient::new(channel, registry.clone());

    let result = client
        .query(
            RangeQueryRequest::new(parent(), 5, 1),
            registry.get(TICK_FIELD).unwrap(),
        )
        .unwrap();

    assert_eq!(result.indices(), vec![4, 6]);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].index, 5);
    assert!(matches!(
        result.failures[0].error,
        Error::TruncatedRecord { .. }
    ));
    assert_eq!(result.total_fields, 3);
    assert_eq!(result.received, 3);

    drop(client.into_channel());
    server.join().unwrap();
}

#[test]
fn server_error_fails_query() {
    let store: Arc<dyn ChildObjectStore> = Arc::new(MemoryStore::new());
    let responder =
        FieldRangeResponder::new(store, u64_key()).with_limits(Limits::with_small_limits());
    let (channel, server) = spawn_responder(responder);
    let registry = Arc::new(tick_registry());
    let mut client = RangeQueryClient::new(channel, registry.clone());

    let err = client
        .query(
            RangeQueryRequest::new(parent(), 100, 50),
            registry.get(TICK_FIELD).unwrap(),
        )
        .unwrap_err();
    assert!(matches!(err, Error::QueryFailed { .. }));

    // The session is reusable after a failure.
    let ok = client
        .query(
            RangeQueryRequest::new(parent(), 100, 2),
            registry.get(TICK_FIELD).unwrap(),
        )
        .unwrap();
    assert!(ok.fields.is_empty());

    drop(client.into_channel());
    assert_eq!(server.join().unwrap(), 2);
}

#[test]
fn close_before_completion_is_channel_closed() {
    let (client_end, mut server_end) = MemoryChannel::pair();
    let server = std::thread::spawn(move || {
        let frame = server_end.recv().unwrap();
        decode_request(&frame).unwrap();
        let unknown = ServerMessage::Unknown {
            kind: "heartbeat".to_string(),
        };
        server_end.send(encode_response(&unknown).unwrap()).unwrap();
        server_end.close();
    });

    let registry = Arc::new(tick_registry());
    let mut client = RangeQueryClient::new(client_end, registry.clone());
    let err = client
        .query(
            RangeQueryRequest::new(parent(), 1, 1),
            registry.get(TICK_FIELD).unwrap(),
        )
        .unwrap_err();
    assert_eq!(err, Error::ChannelClosed);
    server.join().unwrap();
}
