//! Host error types

use bridge_proto::{BridgeError, CommandResponse, ErrorCode};
use thiserror::Error;

/// Failure inside a capability handler.
///
/// Handlers never let these escape; they become error responses through
/// [`HandlerError::into_response`].
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The request payload failed validation
    #[error("{0}")]
    BadRequest(String),

    /// A platform facility reported a failure
    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Any other unexpected failure
    #[error("internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Get the wire error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::BadRequest(_) => ErrorCode::BadRequest,
            Self::Platform(_) | Self::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Convert into the wire error
    pub fn to_bridge_error(&self) -> BridgeError {
        BridgeError::new(self.code(), self.to_string())
    }

    /// Build the failed response for request `id`
    pub fn into_response(self, id: impl Into<String>) -> CommandResponse {
        CommandResponse::failure(id, self.to_bridge_error())
    }
}

/// Failure reported by a platform facility (device, haptics, session store)
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The facility does not exist on this host
    #[error("{0} is not available on this host")]
    Unavailable(&'static str),

    /// The facility was invoked and failed
    #[error("{0}")]
    Failed(String),
}

/// Handler registration error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A handler for this method is already registered
    #[error("a handler for '{0}' is already registered")]
    DuplicateMethod(String),
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_keeps_message_verbatim() {
        let err = HandlerError::BadRequest("style is required".into());
        assert_eq!(err.code(), ErrorCode::BadRequest);

        let response = err.into_response("3");
        let error = response.error().expect("error");
        assert_eq!(error.message, "style is required");
        assert_eq!(response.id, "3");
    }

    #[test]
    fn platform_failure_maps_to_internal() {
        let err = HandlerError::from(PlatformError::Unavailable("haptic engine"));
        assert_eq!(err.code(), ErrorCode::InternalError);
        assert_eq!(
            err.to_string(),
            "platform error: haptic engine is not available on this host"
        );
    }
}
