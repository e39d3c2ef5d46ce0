//! Built-in capability handlers
//!
//! One handler per command; each reads from a platform facility.

use std::sync::Arc;

use crate::handler::CommandHandler;
use crate::platform::HostPlatform;

pub mod device_info;
pub mod haptic;
pub mod mobile_agent;

pub use device_info::GetDeviceInfoHandler;
pub use haptic::TriggerHapticHandler;
pub use mobile_agent::GetMobileAgentContextHandler;

/// Build the built-in handlers in their canonical registration order
pub fn builtin_handlers(platform: &HostPlatform) -> Vec<Arc<dyn CommandHandler>> {
    vec![
        Arc::new(GetDeviceInfoHandler::new(Arc::clone(&platform.device))),
        Arc::new(TriggerHapticHandler::new(Arc::clone(&platform.haptics))),
        Arc::new(GetMobileAgentContextHandler::new(Arc::clone(&platform.session))),
    ]
}
