//! Range query sessions for childfield
//!
//! - `channel`: text frame transport trait and an in-memory duplex
//! - `session`: client-side state machine (no I/O)
//! - `client`: blocking driver running one session over a channel
//! - `responder`: server-side handler answering queries from a child store
//! - `config`: `childfield.toml` limits and key typing
//!
//! # Usage
//!
//! ```ignore
//! let (client_end, mut server_end) = MemoryChannel::pair();
//! let responder = FieldRangeResponder::new(store, key_type);
//! std::thread::spawn(move || responder.serve(&mut server_end));
//!
//! let mut client = RangeQueryClient::new(client_end, registry);
//! let result = client.query(RangeQueryRequest::new(table_id, 1000, 100), schema)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod channel;
pub mod client;
pub mod config;
pub mod responder;
pub mod session;

pub use channel::{Channel, MemoryChannel};
pub use client::RangeQueryClient;
pub use config::{QueryConfig, CONFIG_FILE_NAME};
pub use responder::FieldRangeResponder;
pub use session::{
    DecodedField, ItemFailure, RangeQueryRequest, RangeQueryResult, RangeQuerySession,
    SessionEvent, SessionState,
};
