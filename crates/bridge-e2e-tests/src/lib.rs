//! End-to-end tests for the native bridge.
//!
//! These tests wire a real [`bridge_client::BridgeClient`] to a real
//! [`bridge_host::MessageRouter`] over in-process channels and exercise:
//! - Request/response correlation across concurrent calls
//! - Error propagation from host handlers to callers
//! - Timeouts against hosts that never answer
//! - Dead-letter and foreign-channel traffic

#![cfg(test)]
