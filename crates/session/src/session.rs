//! Range query session state machine
//!
//! ```text
//! Idle ──submit──▶ RequestSent ──field_data──▶ Streaming ──query_complete──▶ Completed
//!                      │    └───query_complete──────────────────────────────▶ Completed
//!                      └──error / close──▶ Failed ◀──error / close── Streaming
//! ```
//!
//! The session does no I/O. A driver (see [`crate::RangeQueryClient`]) sends
//! the request it returns and feeds every received frame back in, in
//! arrival order.
//!
//! # Failure scope
//!
//! - A `field_data` item that fails to decode, lies outside the request
//!   window, or repeats an index is recorded as an [`ItemFailure`] and the
//!   stream continues.
//! - Malformed frames and unknown message kinds are logged and skipped.
//! - Only a server `error` or a closed channel fails the session.

use childfield_codec::{decode_record, Record, RecordSchema, SchemaRegistry};
use childfield_core::{Error, IndexWindow, Limits, ObjectId, ObjectVersion, Result};
use childfield_wire::{decode_response, ClientMessage, FieldData, FieldRangeQuery, ServerMessage};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No query submitted yet
    Idle,
    /// Request sent, nothing received
    RequestSent,
    /// At least one `field_data` received
    Streaming,
    /// `query_complete` received
    Completed,
    /// Server error or channel closed
    Failed,
}

impl SessionState {
    /// Whether a query is in flight
    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::RequestSent | SessionState::Streaming)
    }

    /// Whether the last query has ended
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Completed | SessionState::Failed)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::RequestSent => "request_sent",
            SessionState::Streaming => "streaming",
            SessionState::Completed => "completed",
            SessionState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A windowed query over one parent table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeQueryRequest {
    /// Parent table id
    pub table_id: ObjectId,
    /// Center index
    pub center: u64,
    /// Radius; the window is `[center - radius, center + radius]`
    pub radius: u64,
    /// Optional parent version pin
    pub parent_version: Option<u64>,
}

impl RangeQueryRequest {
    /// Query `radius` indices either side of `center`, at the latest version
    pub fn new(table_id: ObjectId, center: u64, radius: u64) -> Self {
        Self {
            table_id,
            center,
            radius,
            parent_version: None,
        }
    }

    /// Pin the parent version
    pub fn at_version(mut self, version: u64) -> Self {
        self.parent_version = Some(version);
        self
    }

    /// Indices this query covers
    pub fn window(&self) -> IndexWindow {
        IndexWindow::around(self.center, self.radius)
    }

    /// Wire form of this request
    pub fn to_message(&self) -> ClientMessage {
        ClientMessage::QueryFieldRange(FieldRangeQuery {
            table_id: self.table_id,
            current_index: self.center,
            range: self.radius,
            parent_version: self.parent_version,
        })
    }
}

/// A decoded child record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedField {
    /// Window index
    pub index: u64,
    /// Child object id
    pub field_id: ObjectId,
    /// Version the server read
    pub version: ObjectVersion,
    /// Raw record bytes
    pub bcs_bytes: Vec<u8>,
    /// Decoded record
    pub record: Record,
}

/// A `field_data` item that was not accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    /// Window index the server reported
    pub index: u64,
    /// Child object id the server reported
    pub field_id: ObjectId,
    /// Why the item was rejected
    pub error: Error,
}

/// Outcome of a completed query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeQueryResult {
    /// Requested window
    pub window: IndexWindow,
    /// Accepted records, in arrival order
    pub fields: Vec<DecodedField>,
    /// Rejected items
    pub failures: Vec<ItemFailure>,
    /// `total_fields` reported by the server
    pub total_fields: u64,
    /// `field_data` messages received
    pub received: u64,
}

impl RangeQueryResult {
    /// Whether the server's count matches what arrived
    pub fn count_consistent(&self) -> bool {
        self.total_fields == self.received
    }

    /// Indices of accepted records
    pub fn indices(&self) -> Vec<u64> {
        self.fields.iter().map(|f| f.index).collect()
    }

    /// Accepted record at `index`
    pub fn get(&self, index: u64) -> Option<&DecodedField> {
        self.fields.iter().find(|f| f.index == index)
    }
}

/// What a handled message did to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A record was accepted
    Accepted {
        /// Its index
        index: u64,
    },
    /// A `field_data` item was rejected
    Rejected {
        /// Its index
        index: u64,
    },
    /// The message was skipped
    Ignored,
    /// The query completed
    Completed,
    /// The query failed
    Failed,
}

impl SessionEvent {
    /// Whether the query has ended
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionEvent::Completed | SessionEvent::Failed)
    }
}

struct ActiveQuery {
    request: RangeQueryRequest,
    window: IndexWindow,
    schema: Arc<RecordSchema>,
    fields: Vec<DecodedField>,
    failures: Vec<ItemFailure>,
    seen: HashSet<u64>,
    received: u64,
    total_fields: Option<u64>,
    error: Option<Error>,
}

/// Client-side state machine for one channel
pub struct RangeQuerySession {
    registry: Arc<SchemaRegistry>,
    limits: Limits,
    state: SessionState,
    query: Option<ActiveQuery>,
}

impl RangeQuerySession {
    /// Session decoding records against `registry`, with default limits
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self::with_limits(registry, Limits::default())
    }

    /// Session with explicit limits
    pub fn with_limits(registry: Arc<SchemaRegistry>, limits: Limits) -> Self {
        Self {
            registry,
            limits,
            state: SessionState::Idle,
            query: None,
        }
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Request currently or last submitted
    pub fn request(&self) -> Option<&RangeQueryRequest> {
        self.query.as_ref().map(|q| &q.request)
    }

    /// Start a query and return the message to send
    ///
    /// Records are decoded with `schema`. Submitting after a terminal state
    /// discards the previous result.
    ///
    /// # Errors
    ///
    /// - `InvalidState` while a query is in flight
    /// - `InvalidInput` if the radius exceeds the configured maximum
    pub fn submit(
        &mut self,
        request: RangeQueryRequest,
        schema: Arc<RecordSchema>,
    ) -> Result<ClientMessage> {
        if self.state.is_active() {
            return Err(Error::invalid_state(format!(
                "a query is already in flight (state: {})",
                self.state
            )));
        }
        self.limits.check_radius(request.radius)?;

        let window = request.window();
        info!(
            target: "childfield::session",
            table_id = %request.table_id,
            %window,
            parent_version = ?request.parent_version,
            schema = schema.name(),
            "range query submitted"
        );
        let message = request.to_message();
        self.query = Some(ActiveQuery {
            request,
            window,
            schema,
            fields: Vec::new(),
            failures: Vec::new(),
            seen: HashSet::new(),
            received: 0,
            total_fields: None,
            error: None,
        });
        self.state = SessionState::RequestSent;
        Ok(message)
    }

    /// Handle one received text frame
    ///
    /// Frames that do not parse are logged and skipped.
    ///
    /// # Errors
    ///
    /// `InvalidState` if no query is in flight.
    pub fn handle_text(&mut self, text: &str) -> Result<SessionEvent> {
        self.ensure_active()?;
        match decode_response(text) {
            Ok(message) => self.handle_message(message),
            Err(e) => {
                warn!(
                    target: "childfield::session",
                    error = %e,
                    "skipping malformed message"
                );
                Ok(SessionEvent::Ignored)
            }
        }
    }

    /// Handle one decoded server message
    ///
    /// # Errors
    ///
    /// `InvalidState` if no query is in flight.
    pub fn handle_message(&mut self, message: ServerMessage) -> Result<SessionEvent> {
        self.ensure_active()?;
        let Some(query) = self.query.as_mut() else {
            return Err(Error::invalid_state("no query submitted"));
        };

        match message {
            ServerMessage::FieldData(data) => {
                self.state = SessionState::Streaming;
                Ok(Self::accept_field(&self.registry, query, data))
            }
            ServerMessage::QueryComplete(complete) => {
                query.total_fields = Some(complete.total_fields);
                if complete.total_fields != query.received {
                    warn!(
                        target: "childfield::session",
                        expected = complete.total_fields,
                        received = query.received,
                        "field count mismatch"
                    );
                }
                info!(
                    target: "childfield::session",
                    window = %query.window,
                    accepted = query.fields.len(),
                    rejected = query.failures.len(),
                    "range query completed"
                );
                self.state = SessionState::Completed;
                Ok(SessionEvent::Completed)
            }
            ServerMessage::Error(error) => {
                warn!(
                    target: "childfield::session",
                    message = %error.message,
                    "range query failed"
                );
                query.error = Some(Error::QueryFailed {
                    message: error.message,
                });
                self.state = SessionState::Failed;
                Ok(SessionEvent::Failed)
            }
            ServerMessage::Unknown { kind } => {
                warn!(
                    target: "childfield::session",
                    kind = %kind,
                    "ignoring unknown message kind"
                );
                Ok(SessionEvent::Ignored)
            }
        }
    }

    /// The channel closed
    ///
    /// Fails an in-flight query with `ChannelClosed`; has no effect otherwise.
    pub fn handle_close(&mut self) -> SessionEvent {
        if !self.state.is_active() {
            return SessionEvent::Ignored;
        }
        warn!(
            target: "childfield::session",
            state = %self.state,
            "channel closed before query completed"
        );
        if let Some(query) = self.query.as_mut() {
            query.error = Some(Error::ChannelClosed);
        }
        self.state = SessionState::Failed;
        SessionEvent::Failed
    }

    /// Drop the current query without producing a result
    ///
    /// The session returns to `Idle` from any state. Drivers call this when
    /// a submitted request never made it onto the channel.
    pub fn abandon(&mut self) {
        if let Some(query) = self.query.take() {
            debug!(
                target: "childfield::session",
                window = %query.window,
                state = %self.state,
                "query abandoned"
            );
        }
        self.state = SessionState::Idle;
    }

    /// Take the outcome of a finished query
    ///
    /// The session returns to `Idle`.
    ///
    /// # Errors
    ///
    /// - `QueryFailed` or `ChannelClosed` if the query failed
    /// - `InvalidState` if no query has finished
    pub fn take_result(&mut self) -> Result<RangeQueryResult> {
        if !self.state.is_terminal() {
            return Err(Error::invalid_state(format!(
                "no finished query (state: {})",
                self.state
            )));
        }
        let query = self
            .query
            .take()
            .ok_or_else(|| Error::invalid_state("no query submitted"))?;
        self.state = SessionState::Idle;

        if let Some(error) = query.error {
            return Err(error);
        }
        Ok(RangeQueryResult {
            window: query.window,
            fields: query.fields,
            failures: query.failures,
            total_fields: query.total_fields.unwrap_or(query.received),
            received: query.received,
        })
    }

    fn ensure_active(&self) -> Result<()> {
        if self.state.is_active() {
            Ok(())
        } else {
            Err(Error::invalid_state(format!(
                "no query in flight (state: {})",
                self.state
            )))
        }
    }

    fn accept_field(
        registry: &SchemaRegistry,
        query: &mut ActiveQuery,
        data: FieldData,
    ) -> SessionEvent {
        query.received += 1;
        let FieldData {
            index,
            field_id,
            bcs_bytes,
            version,
            ..
        } = data;

        let rejected = if !query.window.contains(index) {
            Some(Error::protocol(format!(
                "index {} outside window {}",
                index, query.window
            )))
        } else if query.seen.contains(&index) {
            Some(Error::protocol(format!("duplicate index {}", index)))
        } else {
            match decode_record(registry, &query.schema, &bcs_bytes) {
                Ok(record) => {
                    debug!(
                        target: "childfield::session",
                        index,
                        %field_id,
                        version,
                        "field accepted"
                    );
                    query.seen.insert(index);
                    query.fields.push(DecodedField {
                        index,
                        field_id,
                        version: ObjectVersion::new(version),
                        bcs_bytes,
                        record,
                    });
                    None
                }
                Err(e) => Some(e),
            }
        };

        match rejected {
            None => SessionEvent::Accepted { index },
            Some(error) => {
                warn!(
                    target: "childfield::session",
                    index,
                    %field_id,
                    error = %error,
                    "field rejected"
                );
                query.failures.push(ItemFailure {
                    index,
                    field_id,
                    error,
                });
                SessionEvent::Rejected { index }
            }
        }
    }
}
