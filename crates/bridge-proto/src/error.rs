//! Error types for the bridge-proto crate.

use thiserror::Error;

/// Errors that can occur while decoding or interpreting protocol messages.
#[derive(Debug, Error)]
pub enum ProtoError {
    /// The message was not valid JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The message body was not a JSON object.
    #[error("message body is not an object")]
    NotAnObject,

    /// A required field was absent or had the wrong type.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A field was present but its value is not acceptable.
    #[error("invalid field '{field}': {reason}")]
    InvalidField {
        /// Field name.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A response violated the ok/result/error pairing.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
