//! Test helpers for E2E tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bridge_client::{BridgeClient, ChannelTransport, ClientConfig};
use bridge_host::{
    CommandDispatcher, DeviceInfoProvider, FnEmitter, HapticEngine, HostConfig, HostPlatform,
    MessageRouter, PlatformError, StaticSessionContext,
};
use bridge_proto::{encode_response, CommandResponse, DeviceInfo, HapticStyle};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Default test timeout.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Session id every test host reports.
pub const TEST_SESSION_ID: &str = "session-e2e";

/// Device uuid every test host reports.
pub const TEST_DEVICE_UUID: &str = "0F6C3C51-4E5B-4D0B-9E55-6B1B2A3C4D5E";

/// Device description every test host reports.
pub fn test_device() -> DeviceInfo {
    DeviceInfo {
        platform: "iOS".into(),
        system_name: "iOS".into(),
        system_version: "17.4".into(),
        model: "iPhone".into(),
    }
}

/// Fixed device info source.
pub struct FixedDevice(pub DeviceInfo);

impl DeviceInfoProvider for FixedDevice {
    fn device_info(&self) -> Result<DeviceInfo, PlatformError> {
        Ok(self.0.clone())
    }
}

/// Haptic engine that remembers every impact.
#[derive(Default)]
pub struct RecordingHaptics {
    pub impacts: Mutex<Vec<HapticStyle>>,
}

#[async_trait]
impl HapticEngine for RecordingHaptics {
    async fn impact(&self, style: HapticStyle) -> Result<(), PlatformError> {
        self.impacts.lock().push(style);
        Ok(())
    }
}

/// Platform with deterministic fakes, plus the haptic recorder behind it.
pub fn test_platform() -> (HostPlatform, Arc<RecordingHaptics>) {
    let haptics = Arc::new(RecordingHaptics::default());
    let platform = HostPlatform::default()
        .with_device(Arc::new(FixedDevice(test_device())))
        .with_haptics(haptics.clone())
        .with_session(Arc::new(StaticSessionContext::new(
            Some(TEST_SESSION_ID.into()),
            Some(TEST_DEVICE_UUID.into()),
        )));
    (platform, haptics)
}

/// A client and host joined by in-process channels.
pub struct TestBridge {
    pub client: BridgeClient,
    pub router: MessageRouter,
    pub haptics: Arc<RecordingHaptics>,
    /// Raw messages the host emitted toward content, in emission order.
    pub emitted: Arc<Mutex<Vec<Value>>>,
    host_pump: JoinHandle<()>,
    client_pump: JoinHandle<()>,
}

impl TestBridge {
    /// Start a bridge with the built-in handlers and default client config.
    pub fn start() -> Self {
        Self::start_with(ClientConfig::default())
    }

    /// Start a bridge with the built-in handlers and the given client config.
    pub fn start_with(config: ClientConfig) -> Self {
        let (platform, haptics) = test_platform();
        let dispatcher = CommandDispatcher::with_builtin_handlers(&platform)
            .expect("built-in handlers register");
        Self::start_with_dispatcher(dispatcher, config, haptics)
    }

    /// Start a bridge around an explicit dispatcher.
    pub fn start_with_dispatcher(
        dispatcher: CommandDispatcher,
        config: ClientConfig,
        haptics: Arc<RecordingHaptics>,
    ) -> Self {
        let (transport, mut to_host) = ChannelTransport::pair();
        let (to_content, from_host) = mpsc::unbounded_channel::<Value>();
        let emitted = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&emitted);
        let emitter = FnEmitter(move |response: CommandResponse| {
            let message = encode_response(&response).expect("response encodes");
            log.lock().push(message.clone());
            let _ = to_content.send(message);
        });
        let router = MessageRouter::new(dispatcher, Arc::new(emitter))
            .with_config(HostConfig::default());

        let host_router = router.clone();
        let channel = router.config().channel_name.clone();
        let host_pump = tokio::spawn(async move {
            while let Some(message) = to_host.recv().await {
                host_router.handle_message(&channel, &message);
            }
        });

        let client = BridgeClient::with_config(transport, config);
        let client_pump = client.attach(from_host);

        Self {
            client,
            router,
            haptics,
            emitted,
            host_pump,
            client_pump,
        }
    }

    /// Post a raw message straight into the host, bypassing the client.
    pub fn post_raw(&self, message: &Value) -> Option<JoinHandle<()>> {
        let channel = self.router.config().channel_name.clone();
        self.router.handle_message(&channel, message)
    }

    /// Emitted messages so far.
    pub fn emitted(&self) -> Vec<Value> {
        self.emitted.lock().clone()
    }

    /// Stop both pumps and close the client.
    pub fn shutdown(self) {
        self.client.close();
        self.host_pump.abort();
        self.client_pump.abort();
    }
}
