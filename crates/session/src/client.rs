//! Blocking range query client
//!
//! Drives a [`RangeQuerySession`] over a [`Channel`]: send the request, feed
//! every frame into the session until it reaches a terminal state, then hand
//! back the result. `query` takes `&mut self`, so one channel carries at most
//! one query at a time.

use crate::channel::Channel;
use crate::config::QueryConfig;
use crate::session::{RangeQueryRequest, RangeQueryResult, RangeQuerySession, SessionState};
use childfield_codec::{RecordSchema, SchemaRegistry};
use childfield_core::{Limits, Result};
use childfield_wire::encode_request;
use std::sync::Arc;

/// Range query client owning one channel
pub struct RangeQueryClient<C: Channel> {
    channel: C,
    session: RangeQuerySession,
}

impl<C: Channel> RangeQueryClient<C> {
    /// Client with default limits
    pub fn new(channel: C, registry: Arc<SchemaRegistry>) -> Self {
        Self::with_limits(channel, registry, Limits::default())
    }

    /// Client with explicit limits
    pub fn with_limits(channel: C, registry: Arc<SchemaRegistry>, limits: Limits) -> Self {
        Self {
            channel,
            session: RangeQuerySession::with_limits(registry, limits),
        }
    }

    /// Client using the limits from `config`
    pub fn from_config(channel: C, registry: Arc<SchemaRegistry>, config: &QueryConfig) -> Self {
        Self::with_limits(channel, registry, config.limits())
    }

    /// Run one query to completion
    ///
    /// Blocks until the server completes or fails the query, or the channel
    /// closes. There is no timeout; close the channel to cancel.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the radius exceeds the limit (nothing is sent)
    /// - `QueryFailed` if the server answered with `error`
    /// - `ChannelClosed` if the channel closed first
    pub fn query(
        &mut self,
        request: RangeQueryRequest,
        schema: Arc<RecordSchema>,
    ) -> Result<RangeQueryResult> {
        let message = self.session.submit(request, schema)?;
        let frame = match encode_request(&message) {
            Ok(frame) => frame,
            Err(e) => {
                self.session.abandon();
                return Err(e);
            }
        };

        if self.channel.send(frame).is_err() {
            self.session.handle_close();
            return self.session.take_result();
        }

        while self.session.state().is_active() {
            match self.channel.recv() {
                Some(frame) => {
                    self.session.handle_text(&frame)?;
                }
                None => {
                    self.session.handle_close();
                }
            }
        }
        self.session.take_result()
    }

    /// Current session state
    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// The underlying channel
    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Give back the channel
    pub fn into_channel(self) -> C {
        self.channel
    }
}
