//! Client error types.

use bridge_proto::{ErrorCode, ProtoError};
use thiserror::Error;

/// Why a request could not be handed to the host.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The host never installed its message handler.
    #[error("native bridge handler is not available")]
    NotInstalled,

    /// The host side of the channel has gone away.
    #[error("native bridge channel is disconnected")]
    Disconnected,
}

/// Failure of a bridge call as seen by the caller.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be posted. No timer was started.
    #[error("bridge unavailable: {0}")]
    Unavailable(#[from] TransportError),

    /// No response arrived in time.
    #[error("TIMEOUT: request {id} exceeded {timeout_ms}ms")]
    Timeout {
        /// Correlation id of the abandoned request.
        id: String,
        /// Configured timeout.
        timeout_ms: u64,
    },

    /// The host answered with an error.
    #[error("{message}")]
    Remote {
        /// Host error code.
        code: ErrorCode,
        /// Host error message.
        message: String,
    },

    /// The client was closed before the call settled.
    #[error("bridge client closed")]
    Closed,

    /// Too many calls are already waiting for a response.
    #[error("too many pending requests (limit {limit})")]
    TooManyPending {
        /// Configured cap.
        limit: usize,
    },

    /// The host reported success but the result lacks an expected field.
    #[error("{method} returned a malformed result: {source}")]
    MalformedResult {
        /// Command whose result was malformed.
        method: &'static str,
        /// What was wrong with it.
        #[source]
        source: ProtoError,
    },
}

impl ClientError {
    /// Protocol error code for this failure, when it has one.
    #[must_use]
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Timeout { .. } => Some(ErrorCode::Timeout),
            Self::Remote { code, .. } => Some(code.clone()),
            _ => None,
        }
    }

    /// Whether this is a timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
