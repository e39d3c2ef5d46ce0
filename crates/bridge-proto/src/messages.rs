//! Protocol message definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ProtoError;
use crate::types::{Payload, Primitive};

/// Id used for responses to inbound messages whose own id could not be read.
pub const UNKNOWN_ID: &str = "unknown";

/// Error code carried in a failed response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ErrorCode {
    /// No handler claims the requested method.
    MethodNotFound,
    /// The request or its payload is malformed.
    BadRequest,
    /// The handler failed unexpectedly.
    InternalError,
    /// The client gave up waiting. Never sent over the wire.
    Timeout,
    /// A code this crate does not know, kept verbatim.
    Other(String),
}

impl ErrorCode {
    /// Wire representation of the code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::MethodNotFound => "METHOD_NOT_FOUND",
            Self::BadRequest => "BAD_REQUEST",
            Self::InternalError => "INTERNAL_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::Other(code) => code,
        }
    }
}

impl From<String> for ErrorCode {
    fn from(value: String) -> Self {
        match value.as_str() {
            "METHOD_NOT_FOUND" => Self::MethodNotFound,
            "BAD_REQUEST" => Self::BadRequest,
            "INTERNAL_ERROR" => Self::InternalError,
            "TIMEOUT" => Self::Timeout,
            _ => Self::Other(value),
        }
    }
}

impl From<ErrorCode> for String {
    fn from(value: ErrorCode) -> Self {
        match value {
            ErrorCode::Other(code) => code,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error half of a failed [`CommandResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeError {
    /// Machine-readable code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
}

impl BridgeError {
    /// Create an error with an arbitrary code.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// The method has no handler.
    pub fn method_not_found(method: &str) -> Self {
        Self::new(ErrorCode::MethodNotFound, format!("Unsupported method: {method}"))
    }

    /// The request was malformed.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    /// The handler failed.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A command invocation sent from content to host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRequest {
    /// Correlation id, unique among in-flight requests.
    pub id: String,
    /// Command name.
    pub method: String,
    /// Optional arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,
}

impl CommandRequest {
    /// Create a request without a payload.
    pub fn new(id: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            method: method.into(),
            payload: None,
        }
    }

    /// Attach a payload.
    #[must_use]
    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Look up a payload value by key.
    #[must_use]
    pub fn payload_value(&self, key: &str) -> Option<&Primitive> {
        self.payload.as_ref().and_then(|p| p.get(key))
    }

    /// Look up a string payload value by key.
    #[must_use]
    pub fn payload_str(&self, key: &str) -> Option<&str> {
        self.payload_value(key).and_then(Primitive::as_str)
    }
}

/// Success or failure of a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The command succeeded with this result.
    Ok(Payload),
    /// The command failed.
    Err(BridgeError),
}

/// Host answer to a [`CommandRequest`].
///
/// The wire form has separate `ok`, `result` and `error` fields; here they
/// collapse into one [`Outcome`], so a response can never be both or neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireResponse", into = "WireResponse")]
pub struct CommandResponse {
    /// Id of the originating request.
    pub id: String,
    /// Result or error.
    pub outcome: Outcome,
}

impl CommandResponse {
    /// Create a success response.
    pub fn success(id: impl Into<String>, result: Payload) -> Self {
        Self {
            id: id.into(),
            outcome: Outcome::Ok(result),
        }
    }

    /// Create an error response.
    pub fn failure(id: impl Into<String>, error: BridgeError) -> Self {
        Self {
            id: id.into(),
            outcome: Outcome::Err(error),
        }
    }

    /// Wire `ok` flag.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self.outcome, Outcome::Ok(_))
    }

    /// Result payload, present iff ok.
    #[must_use]
    pub const fn result(&self) -> Option<&Payload> {
        match &self.outcome {
            Outcome::Ok(result) => Some(result),
            Outcome::Err(_) => None,
        }
    }

    /// Error, present iff not ok.
    #[must_use]
    pub const fn error(&self) -> Option<&BridgeError> {
        match &self.outcome {
            Outcome::Ok(_) => None,
            Outcome::Err(error) => Some(error),
        }
    }

    /// Split into a standard `Result`.
    pub fn into_result(self) -> Result<Payload, BridgeError> {
        match self.outcome {
            Outcome::Ok(result) => Ok(result),
            Outcome::Err(error) => Err(error),
        }
    }
}

/// Literal wire layout of a response, before the pairing check.
#[derive(Serialize, Deserialize)]
pub(crate) struct WireResponse {
    id: String,
    ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<Payload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<BridgeError>,
}

impl TryFrom<WireResponse> for CommandResponse {
    type Error = ProtoError;

    fn try_from(wire: WireResponse) -> Result<Self, Self::Error> {
        let outcome = match (wire.ok, wire.result, wire.error) {
            (true, Some(result), None) => Outcome::Ok(result),
            (false, None, Some(error)) => Outcome::Err(error),
            (true, _, Some(_)) => {
                return Err(ProtoError::InvalidResponse(
                    "ok response must not carry an error".to_string(),
                ));
            }
            (true, None, None) => {
                return Err(ProtoError::InvalidResponse(
                    "ok response is missing its result".to_string(),
                ));
            }
            (false, Some(_), _) => {
                return Err(ProtoError::InvalidResponse(
                    "failed response must not carry a result".to_string(),
                ));
            }
            (false, None, None) => {
                return Err(ProtoError::InvalidResponse(
                    "failed response is missing its error".to_string(),
                ));
            }
        };

        Ok(Self {
            id: wire.id,
            outcome,
        })
    }
}

impl From<CommandResponse> for WireResponse {
    fn from(response: CommandResponse) -> Self {
        match response.outcome {
            Outcome::Ok(result) => Self {
                id: response.id,
                ok: true,
                result: Some(result),
                error: None,
            },
            Outcome::Err(error) => Self {
                id: response.id,
                ok: false,
                result: None,
                error: Some(error),
            },
        }
    }
}
