//! # bridge-proto
//!
//! Protocol definitions for the native bridge: the request/response messages
//! exchanged between embedded web content and the host, the error codes they
//! carry, and the typed payloads of the built-in capabilities.
//!
//! ## Wire shapes
//!
//! Request (content → host):
//! ```json
//! {"id": "1718000000000-9f3a", "method": "triggerHaptic", "payload": {"style": "light"}}
//! ```
//!
//! Response (host → content):
//! ```json
//! {"id": "1718000000000-9f3a", "ok": true, "result": {"triggered": true}}
//! {"id": "1718000000000-9f3a", "ok": false, "error": {"code": "BAD_REQUEST", "message": "style is required"}}
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod capabilities;
pub mod codec;
pub mod error;
pub mod messages;
pub mod types;

pub use capabilities::{DeviceInfo, HapticAck, HapticStyle, MobileAgentContext};
pub use codec::{
    decode_request, decode_request_str, decode_response, decode_response_str, encode_request,
    encode_response,
};
pub use error::ProtoError;
pub use messages::{BridgeError, CommandRequest, CommandResponse, ErrorCode, Outcome, UNKNOWN_ID};
pub use types::{Payload, Primitive};
