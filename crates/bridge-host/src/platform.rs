//! Platform facilities used by the built-in handlers.
//!
//! Handlers only see these traits, so hosts plug in real device APIs and
//! tests plug in fakes.

use std::sync::Arc;

use async_trait::async_trait;
use bridge_proto::{DeviceInfo, HapticStyle};
use sysinfo::System;
use tracing::info;
use uuid::Uuid;

use crate::error::PlatformError;

const UNKNOWN: &str = "unknown";

/// Source of the host device description.
pub trait DeviceInfoProvider: Send + Sync {
    /// Describe the device.
    fn device_info(&self) -> Result<DeviceInfo, PlatformError>;
}

/// Haptic actuator.
#[async_trait]
pub trait HapticEngine: Send + Sync {
    /// Fire one impact of the given strength.
    async fn impact(&self, style: HapticStyle) -> Result<(), PlatformError>;
}

/// Source of the host's monitoring session identifiers.
pub trait SessionContextProvider: Send + Sync {
    /// Current monitoring session id, if a session is active.
    fn session_id(&self) -> Option<String>;

    /// Per-install device identifier, if one exists.
    fn device_uuid(&self) -> Option<String>;
}

/// Device info read from the running operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemDeviceInfo;

impl DeviceInfoProvider for SystemDeviceInfo {
    fn device_info(&self) -> Result<DeviceInfo, PlatformError> {
        Ok(DeviceInfo {
            platform: std::env::consts::OS.to_string(),
            system_name: System::name().unwrap_or_else(|| UNKNOWN.to_string()),
            system_version: System::os_version().unwrap_or_else(|| UNKNOWN.to_string()),
            model: std::env::consts::ARCH.to_string(),
        })
    }
}

/// Haptic engine for hosts without an actuator; records each impact as a
/// tracing event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHaptics;

#[async_trait]
impl HapticEngine for TracingHaptics {
    async fn impact(&self, style: HapticStyle) -> Result<(), PlatformError> {
        info!(style = %style, "haptic impact");
        Ok(())
    }
}

/// Session identifiers fixed at wiring time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticSessionContext {
    session_id: Option<String>,
    device_uuid: Option<String>,
}

impl StaticSessionContext {
    /// Create a context with explicit values.
    #[must_use]
    pub const fn new(session_id: Option<String>, device_uuid: Option<String>) -> Self {
        Self {
            session_id,
            device_uuid,
        }
    }

    /// Create a context with a freshly generated device identifier.
    #[must_use]
    pub fn with_generated_uuid(session_id: Option<String>) -> Self {
        Self::new(session_id, Some(Uuid::new_v4().to_string().to_uppercase()))
    }
}

impl SessionContextProvider for StaticSessionContext {
    fn session_id(&self) -> Option<String> {
        self.session_id.clone()
    }

    fn device_uuid(&self) -> Option<String> {
        self.device_uuid.clone()
    }
}

/// The set of facilities handed to the built-in handlers.
#[derive(Clone)]
pub struct HostPlatform {
    /// Device description source.
    pub device: Arc<dyn DeviceInfoProvider>,
    /// Haptic actuator.
    pub haptics: Arc<dyn HapticEngine>,
    /// Session identifier source.
    pub session: Arc<dyn SessionContextProvider>,
}

impl HostPlatform {
    /// Facilities backed by the running system.
    #[must_use]
    pub fn system(session: StaticSessionContext) -> Self {
        Self {
            device: Arc::new(SystemDeviceInfo),
            haptics: Arc::new(TracingHaptics),
            session: Arc::new(session),
        }
    }

    /// Replace the device info source.
    #[must_use]
    pub fn with_device(mut self, device: Arc<dyn DeviceInfoProvider>) -> Self {
        self.device = device;
        self
    }

    /// Replace the haptic engine.
    #[must_use]
    pub fn with_haptics(mut self, haptics: Arc<dyn HapticEngine>) -> Self {
        self.haptics = haptics;
        self
    }

    /// Replace the session identifier source.
    #[must_use]
    pub fn with_session(mut self, session: Arc<dyn SessionContextProvider>) -> Self {
        self.session = session;
        self
    }
}

impl Default for HostPlatform {
    fn default() -> Self {
        Self::system(StaticSessionContext::default())
    }
}
