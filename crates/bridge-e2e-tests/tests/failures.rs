//! End-to-end tests for failure paths.
//!
//! These tests verify:
//! 1. Silent hosts time out after the configured period
//! 2. A missing bridge fails immediately instead of timing out
//! 3. Undecodable traffic gets a dead-letter response the client ignores
//! 4. Foreign-channel traffic is ignored entirely
//! 5. Late responses after a timeout are dropped

mod helpers;

use std::future::pending;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bridge_client::{BridgeClient, ChannelTransport, ClientConfig, ClientError, TransportError};
use bridge_host::{CommandDispatcher, CommandHandler};
use bridge_proto::{CommandRequest, CommandResponse, HapticAck, UNKNOWN_ID};
use helpers::*;
use serde_json::json;
use tokio::time::Instant;

/// Never answers.
struct StuckHandler;

#[async_trait]
impl CommandHandler for StuckHandler {
    fn method(&self) -> &str {
        "stuck"
    }

    async fn handle(&self, _request: &CommandRequest) -> CommandResponse {
        pending().await
    }
}

// ============================================================================
// Timeouts
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_host_that_never_replies_times_out() {
    let (transport, _to_host) = ChannelTransport::pair();
    let client = BridgeClient::with_config(transport, ClientConfig::new().with_timeout_ms(1000));
    let started = Instant::now();

    let err = client.send("getDeviceInfo", None).await.expect_err("no reply");

    assert!(err.is_timeout(), "unexpected error: {err}");
    assert!(err.to_string().starts_with("TIMEOUT"));
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(1000));
    assert!(elapsed < Duration::from_millis(1100));
    assert_eq!(client.pending_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_stuck_handler_times_out_without_blocking_others() {
    let (platform, haptics) = test_platform();
    let mut dispatcher =
        CommandDispatcher::with_builtin_handlers(&platform).expect("built-in handlers register");
    dispatcher.register(Arc::new(StuckHandler)).expect("stuck registers");
    let bridge = TestBridge::start_with_dispatcher(
        dispatcher,
        ClientConfig::new().with_timeout_ms(1000),
        haptics,
    );

    let (stuck, info) = tokio::join!(
        bridge.client.send("stuck", None),
        bridge.client.get_device_info(),
    );

    assert!(matches!(stuck, Err(ClientError::Timeout { timeout_ms: 1000, .. })));
    assert_eq!(info.expect("device info"), test_device());
    bridge.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_late_response_is_dropped() {
    let (transport, mut to_host) = ChannelTransport::pair();
    let client = BridgeClient::with_config(transport, ClientConfig::new().with_timeout_ms(1000));

    let err = client.send("triggerHaptic", None).await.expect_err("no reply");
    assert!(err.is_timeout());

    let posted = to_host.recv().await.expect("request posted");
    let id = posted["id"].as_str().expect("id").to_string();
    let late = CommandResponse::success(id, HapticAck { triggered: true }.to_payload());

    assert!(!client.deliver(late));
}

// ============================================================================
// Unavailable Bridge
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_missing_bridge_fails_fast() {
    let client = BridgeClient::new(None::<ChannelTransport>);
    let started = Instant::now();

    let err = client.get_device_info().await.expect_err("no bridge");

    assert!(matches!(err, ClientError::Unavailable(TransportError::NotInstalled)));
    assert_eq!(started.elapsed(), Duration::ZERO);
}

// ============================================================================
// Dead Letters and Foreign Traffic
// ============================================================================

#[tokio::test]
async fn test_undecodable_message_gets_dead_letter() {
    let bridge = TestBridge::start();

    assert!(bridge.post_raw(&json!({"method": 5})).is_none());

    let emitted = bridge.emitted();
    assert_eq!(
        emitted,
        vec![json!({
            "id": UNKNOWN_ID,
            "ok": false,
            "error": {"code": "BAD_REQUEST", "message": "invalid message body"}
        })]
    );

    // The dead letter matches nothing on the client side.
    let info = bridge.client.get_device_info().await.expect("device info");
    assert_eq!(info, test_device());
    bridge.shutdown();
}

#[tokio::test]
async fn test_dead_letter_does_not_settle_pending_call() {
    let bridge = TestBridge::start();
    let call = bridge.client.call("getDeviceInfo", None).expect("posted");

    bridge.client.deliver(CommandResponse::failure(
        UNKNOWN_ID,
        bridge_proto::BridgeError::bad_request("invalid message body"),
    ));

    let response = call.wait().await.expect("real response");
    assert!(response.is_ok());
    bridge.shutdown();
}

#[tokio::test]
async fn test_foreign_channel_is_ignored() {
    let bridge = TestBridge::start();

    let handle = bridge
        .router
        .handle_message("analytics", &json!({"id": "1", "method": "getDeviceInfo"}));

    assert!(handle.is_none());
    assert!(bridge.emitted().is_empty());
    bridge.shutdown();
}

// ============================================================================
// Teardown
// ============================================================================

#[tokio::test]
async fn test_close_rejects_in_flight_calls() {
    let (transport, _to_host) = ChannelTransport::pair();
    let client = BridgeClient::new(transport);
    let call = client.call("getDeviceInfo", None).expect("posted");

    client.close();

    assert!(matches!(call.wait().await, Err(ClientError::Closed)));
}
