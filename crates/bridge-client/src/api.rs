//! Typed wrappers for the built-in capabilities.

use bridge_proto::capabilities::{GET_DEVICE_INFO, GET_MOBILE_AGENT_CONTEXT, TRIGGER_HAPTIC};
use bridge_proto::{CommandResponse, DeviceInfo, HapticAck, HapticStyle, MobileAgentContext, Payload, ProtoError};

use crate::client::BridgeClient;
use crate::error::ClientError;

fn result_of(response: &CommandResponse) -> Payload {
    response.result().cloned().unwrap_or_default()
}

fn malformed(method: &'static str) -> impl FnOnce(ProtoError) -> ClientError {
    move |source| ClientError::MalformedResult { method, source }
}

impl BridgeClient {
    /// Ask the host to describe its device.
    pub async fn get_device_info(&self) -> Result<DeviceInfo, ClientError> {
        let response = self.send(GET_DEVICE_INFO, None).await?;
        DeviceInfo::from_payload(&result_of(&response)).map_err(malformed(GET_DEVICE_INFO))
    }

    /// Fire a haptic impact of the given style.
    pub async fn trigger_haptic(&self, style: HapticStyle) -> Result<HapticAck, ClientError> {
        let response = self.send(TRIGGER_HAPTIC, Some(style.to_payload())).await?;
        HapticAck::from_payload(&result_of(&response)).map_err(malformed(TRIGGER_HAPTIC))
    }

    /// Fetch the host's monitoring session identifiers.
    pub async fn get_mobile_agent_context(&self) -> Result<MobileAgentContext, ClientError> {
        let response = self.send(GET_MOBILE_AGENT_CONTEXT, None).await?;
        MobileAgentContext::from_payload(&result_of(&response))
            .map_err(malformed(GET_MOBILE_AGENT_CONTEXT))
    }
}
