//! Server-side field range responder
//!
//! Answers `query_field_range` requests from a [`ChildObjectStore`]: one
//! `field_data` per child found (ascending index), then `query_complete`.
//! Anything that stops the scan (bad request, radius over the limit, store
//! failure) is answered with a single `error` instead.

use crate::channel::Channel;
use crate::config::QueryConfig;
use childfield_codec::KeyType;
use childfield_core::{IndexWindow, Limits, ObjectVersion, Result};
use childfield_storage::{scan, ChildObjectStore, ScanMode};
use childfield_wire::{
    decode_request, encode_response, ClientMessage, FieldData, FieldRangeQuery, QueryComplete,
    ServerMessage,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Answers range queries for tables keyed by one key type
pub struct FieldRangeResponder {
    store: Arc<dyn ChildObjectStore>,
    key_type: KeyType,
    limits: Limits,
    mode: ScanMode,
}

impl FieldRangeResponder {
    /// Responder doing dense scans with default limits
    pub fn new(store: Arc<dyn ChildObjectStore>, key_type: KeyType) -> Self {
        Self {
            store,
            key_type,
            limits: Limits::default(),
            mode: ScanMode::Dense,
        }
    }

    /// Responder built from a config file's settings
    pub fn from_config(store: Arc<dyn ChildObjectStore>, config: &QueryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(store, config.key_type()?)
            .with_limits(config.limits())
            .with_scan_mode(config.scan_mode()))
    }

    /// Set query limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the scan strategy
    pub fn with_scan_mode(mut self, mode: ScanMode) -> Self {
        self.mode = mode;
        self
    }

    /// Key type used to derive child ids
    pub fn key_type(&self) -> &KeyType {
        &self.key_type
    }

    /// Responses for one decoded request
    pub fn respond(&self, request: &FieldRangeQuery) -> Vec<ServerMessage> {
        match self.run(request) {
            Ok(messages) => messages,
            Err(e) => {
                warn!(
                    target: "childfield::responder",
                    table_id = %request.table_id,
                    error = %e,
                    "range query rejected"
                );
                vec![ServerMessage::error(e.to_string())]
            }
        }
    }

    /// Responses for one request frame
    pub fn respond_to_text(&self, frame: &str) -> Vec<ServerMessage> {
        match decode_request(frame) {
            Ok(ClientMessage::QueryFieldRange(request)) => self.respond(&request),
            Err(e) => {
                warn!(
                    target: "childfield::responder",
                    error = %e,
                    "unparseable request"
                );
                vec![ServerMessage::error(e.to_string())]
            }
        }
    }

    /// Answer requests on `channel` until it closes
    ///
    /// Returns the number of requests answered.
    ///
    /// # Errors
    ///
    /// `ChannelClosed` if a response cannot be sent.
    pub fn serve<C: Channel>(&self, channel: &mut C) -> Result<usize> {
        let mut served = 0usize;
        while let Some(frame) = channel.recv() {
            for message in self.respond_to_text(&frame) {
                channel.send(encode_response(&message)?)?;
            }
            served += 1;
        }
        debug!(target: "childfield::responder", served, "channel closed");
        Ok(served)
    }

    fn run(&self, request: &FieldRangeQuery) -> Result<Vec<ServerMessage>> {
        self.limits.check_radius(request.range)?;
        let window = IndexWindow::around(request.current_index, request.range);
        let version = ObjectVersion::pin_or_latest(request.parent_version);

        let hits = scan(
            self.store.as_ref(),
            &request.table_id,
            &self.key_type,
            window,
            version,
            self.mode,
        )?;

        info!(
            target: "childfield::responder",
            table_id = %request.table_id,
            %window,
            %version,
            hits = hits.len(),
            "range query answered"
        );

        let total_fields = hits.len() as u64;
        let mut messages: Vec<ServerMessage> = hits
            .into_iter()
            .map(|hit| {
                ServerMessage::FieldData(FieldData {
                    table_id: Some(request.table_id),
                    index: hit.index,
                    field_id: hit.field_id,
                    bcs_bytes: hit.bcs_bytes,
                    version: hit.version.value(),
                })
            })
            .collect();
        messages.push(ServerMessage::QueryComplete(QueryComplete {
            table_id: Some(request.table_id),
            total_fields,
        }));
        Ok(messages)
    }
}
