//! Wire protocol for childfield range queries
//!
//! One request kind (`query_field_range`) and a response stream of
//! `field_data` items terminated by `query_complete` or `error`. All messages
//! are JSON objects discriminated by their `type` field.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod json;

pub use json::envelope::{
    decode_request, decode_response, encode_request, encode_response, ClientMessage, FieldData,
    FieldRangeQuery, QueryComplete, ServerError, ServerMessage,
};
