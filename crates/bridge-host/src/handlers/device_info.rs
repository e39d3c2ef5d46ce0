//! `getDeviceInfo` handler

use std::sync::Arc;

use async_trait::async_trait;
use bridge_proto::capabilities::GET_DEVICE_INFO;
use bridge_proto::{CommandRequest, CommandResponse};

use crate::error::HandlerError;
use crate::handler::{respond, CommandHandler};
use crate::platform::DeviceInfoProvider;

/// Reports the host device description
pub struct GetDeviceInfoHandler {
    device: Arc<dyn DeviceInfoProvider>,
}

impl GetDeviceInfoHandler {
    /// Create a handler reading from `device`
    pub fn new(device: Arc<dyn DeviceInfoProvider>) -> Self {
        Self { device }
    }
}

#[async_trait]
impl CommandHandler for GetDeviceInfoHandler {
    fn method(&self) -> &str {
        GET_DEVICE_INFO
    }

    async fn handle(&self, request: &CommandRequest) -> CommandResponse {
        let result = self
            .device
            .device_info()
            .map(|info| info.to_payload())
            .map_err(HandlerError::from);
        respond(&request.id, result)
    }
}
