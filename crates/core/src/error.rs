//! Error types for childfield
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! ## Scope of each error
//!
//! | Variant | Fatal to |
//! |---------|----------|
//! | `MalformedTypeTag`, `ValueOutOfRange`, `TypeMismatch` | one derive/encode call |
//! | `TruncatedRecord`, `UnknownSchema` | one decode call (isolated per item in a stream) |
//! | `ProtocolError` | nothing: the message is logged and skipped |
//! | `QueryFailed`, `ChannelClosed` | the whole query session |

use thiserror::Error;

/// Result type alias for childfield operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for childfield
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Type descriptor could not be parsed or is structurally invalid
    #[error("Malformed type tag: {reason}")]
    MalformedTypeTag {
        /// What was wrong with the descriptor
        reason: String,
    },

    /// A value does not fit the width of its declared type
    #[error("Value out of range: {value} does not fit in {kind}")]
    ValueOutOfRange {
        /// Declared type name (e.g. "u32")
        kind: String,
        /// Rendered offending value
        value: String,
    },

    /// A value has the wrong shape for its declared type
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Expected shape
        expected: String,
        /// Shape actually supplied
        actual: String,
    },

    /// Record bytes did not match the schema length exactly
    #[error("Truncated record '{schema}': needed {needed} bytes at offset {offset}, buffer has {available}")]
    TruncatedRecord {
        /// Schema being decoded
        schema: String,
        /// Byte offset where decoding stopped
        offset: usize,
        /// Bytes the schema needed at that point (or consumed, for trailing data)
        needed: usize,
        /// Total bytes in the buffer
        available: usize,
    },

    /// A struct field references a schema that is not registered
    #[error("Unknown schema: {name}")]
    UnknownSchema {
        /// Referenced schema name
        name: String,
    },

    /// Input could not be normalized (e.g. over-length identifier)
    #[error("Malformed input: {reason}")]
    MalformedInput {
        /// What was wrong with the input
        reason: String,
    },

    /// A wire message could not be parsed
    #[error("Protocol error: {reason}")]
    ProtocolError {
        /// What was wrong with the message
        reason: String,
    },

    /// The server terminated the query with an `error` message
    #[error("Query failed: {message}")]
    QueryFailed {
        /// Message carried by the server
        message: String,
    },

    /// The channel closed before the query reached a terminal message
    #[error("Channel closed before query completed")]
    ChannelClosed,

    /// Operation not allowed in the current session state
    #[error("Invalid state: {reason}")]
    InvalidState {
        /// Why the operation was rejected
        reason: String,
    },

    /// Request parameters rejected before anything was sent
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Why the input was rejected
        reason: String,
    },

    /// Child object store failure
    #[error("Storage error: {reason}")]
    Storage {
        /// Underlying failure
        reason: String,
    },

    /// Configuration file could not be read or validated
    #[error("Config error: {reason}")]
    Config {
        /// Underlying failure
        reason: String,
    },
}

impl Error {
    /// Create a malformed type tag error
    pub fn malformed_type_tag(reason: impl Into<String>) -> Self {
        Error::MalformedTypeTag {
            reason: reason.into(),
        }
    }

    /// Create a value out of range error
    pub fn value_out_of_range(kind: impl Into<String>, value: impl ToString) -> Self {
        Error::ValueOutOfRange {
            kind: kind.into(),
            value: value.to_string(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Error::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a malformed input error
    pub fn malformed_input(reason: impl Into<String>) -> Self {
        Error::MalformedInput {
            reason: reason.into(),
        }
    }

    /// Create a protocol error
    pub fn protocol(reason: impl Into<String>) -> Self {
        Error::ProtocolError {
            reason: reason.into(),
        }
    }

    /// Create an invalid state error
    pub fn invalid_state(reason: impl Into<String>) -> Self {
        Error::InvalidState {
            reason: reason.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Error::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Create a storage error
    pub fn storage(reason: impl Into<String>) -> Self {
        Error::Storage {
            reason: reason.into(),
        }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Error::Config {
            reason: reason.into(),
        }
    }

    /// Whether this error ends a query session rather than a single item
    pub fn is_fatal_to_session(&self) -> bool {
        matches!(self, Error::QueryFailed { .. } | Error::ChannelClosed)
    }
}
