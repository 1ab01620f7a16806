//! Request/response envelopes for the range query protocol
//!
//! Defines the wire format:
//! - Request: `{type: "query_field_range", table_id, current_index, range, parent_version?}`
//! - Item: `{type: "field_data", index, field_id, bcs_bytes: [u8...], version, table_id?}`
//! - Success terminal: `{type: "query_complete", total_fields, table_id?}`
//! - Failure terminal: `{type: "error", message}`
//!
//! Responses decode in two phases. The `type` field is read first; kinds this
//! version does not know become [`ServerMessage::Unknown`] instead of an
//! error, so servers can add message kinds without breaking clients.

use childfield_core::{Error, ObjectId, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Client → server messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Ask for every child in a window around `current_index`
    QueryFieldRange(FieldRangeQuery),
}

/// Body of a `query_field_range` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRangeQuery {
    /// Parent table identifier
    pub table_id: ObjectId,
    /// Center index of the window
    pub current_index: u64,
    /// Radius of the window
    pub range: u64,
    /// Optional version pin for the parent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_version: Option<u64>,
}

/// Server → client messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// One child found in the window
    FieldData(FieldData),
    /// The window scan finished
    QueryComplete(QueryComplete),
    /// The query failed
    Error(ServerError),
    /// A message kind this client does not recognize
    Unknown {
        /// The unrecognized `type` value
        kind: String,
    },
}

/// Body of a `field_data` message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldData {
    /// Echo of the request's table id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<ObjectId>,
    /// Window index of this child
    pub index: u64,
    /// Derived child object id
    pub field_id: ObjectId,
    /// Raw record bytes
    pub bcs_bytes: Vec<u8>,
    /// Object version the bytes were read at
    pub version: u64,
}

/// Body of a `query_complete` message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryComplete {
    /// Echo of the request's table id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<ObjectId>,
    /// Number of `field_data` messages the server sent
    pub total_fields: u64,
}

/// Body of an `error` message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerError {
    /// Human-readable failure
    pub message: String,
}

impl ServerMessage {
    /// The `type` tag this message carries on the wire
    pub fn kind(&self) -> &str {
        match self {
            ServerMessage::FieldData(_) => "field_data",
            ServerMessage::QueryComplete(_) => "query_complete",
            ServerMessage::Error(_) => "error",
            ServerMessage::Unknown { kind } => kind,
        }
    }

    /// Build an `error` message
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error(ServerError {
            message: message.into(),
        })
    }
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum KnownRef<'a> {
    FieldData(&'a FieldData),
    QueryComplete(&'a QueryComplete),
    Error(&'a ServerError),
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Known {
    FieldData(FieldData),
    QueryComplete(QueryComplete),
    Error(ServerError),
}

const KNOWN_KINDS: [&str; 3] = ["field_data", "query_complete", "error"];

/// Encode a request to JSON
pub fn encode_request(request: &ClientMessage) -> Result<String> {
    serde_json::to_string(request).map_err(|e| Error::protocol(e.to_string()))
}

/// Decode a request from JSON
///
/// # Errors
///
/// `ProtocolError` for non-JSON text, an unknown request kind, or missing or
/// ill-typed fields.
pub fn decode_request(json: &str) -> Result<ClientMessage> {
    serde_json::from_str(json).map_err(|e| Error::protocol(format!("bad request: {}", e)))
}

/// Encode a response to JSON
///
/// `Unknown` messages encode as a bare `{"type": kind}` object.
pub fn encode_response(response: &ServerMessage) -> Result<String> {
    let known = match response {
        ServerMessage::FieldData(body) => KnownRef::FieldData(body),
        ServerMessage::QueryComplete(body) => KnownRef::QueryComplete(body),
        ServerMessage::Error(body) => KnownRef::Error(body),
        ServerMessage::Unknown { kind } => {
            return Ok(serde_json::json!({ "type": kind }).to_string());
        }
    };
    serde_json::to_string(&known).map_err(|e| Error::protocol(e.to_string()))
}

/// Decode a response from JSON
///
/// # Errors
///
/// `ProtocolError` for non-JSON text, a missing or non-string `type`, or a
/// known kind with missing or ill-typed fields. Unknown kinds are not errors.
pub fn decode_response(json: &str) -> Result<ServerMessage> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| Error::protocol(format!("invalid JSON: {}", e)))?;
    let kind = match value.get("type") {
        Some(Value::String(kind)) => kind.clone(),
        Some(_) => return Err(Error::protocol("'type' is not a string")),
        None => return Err(Error::protocol("missing 'type'")),
    };
    if !KNOWN_KINDS.contains(&kind.as_str()) {
        return Ok(ServerMessage::Unknown { kind });
    }
    let known: Known = serde_json::from_value(value)
        .map_err(|e| Error::protocol(format!("bad '{}' message: {}", kind, e)))?;
    Ok(match known {
        Known::FieldData(body) => ServerMessage::FieldData(body),
        Known::QueryComplete(body) => ServerMessage::QueryComplete(body),
        Known::Error(body) => ServerMessage::Error(body),
    })
}
