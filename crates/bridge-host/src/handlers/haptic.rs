//! `triggerHaptic` handler

use std::sync::Arc;

use async_trait::async_trait;
use bridge_proto::capabilities::TRIGGER_HAPTIC;
use bridge_proto::{CommandRequest, CommandResponse, HapticAck, HapticStyle, Payload};

use crate::error::{HandlerError, HandlerResult};
use crate::handler::{respond, CommandHandler};
use crate::platform::HapticEngine;

/// Fires a haptic impact of the requested style
pub struct TriggerHapticHandler {
    haptics: Arc<dyn HapticEngine>,
}

impl TriggerHapticHandler {
    /// Create a handler driving `haptics`
    pub fn new(haptics: Arc<dyn HapticEngine>) -> Self {
        Self { haptics }
    }

    async fn trigger(&self, request: &CommandRequest) -> HandlerResult<Payload> {
        // Validation happens before the actuator is touched.
        let style = parse_style(request)?;
        self.haptics.impact(style).await?;
        Ok(HapticAck { triggered: true }.to_payload())
    }
}

fn parse_style(request: &CommandRequest) -> HandlerResult<HapticStyle> {
    let raw = request
        .payload_str("style")
        .ok_or_else(|| HandlerError::BadRequest("style is required".to_string()))?;

    raw.parse()
        .map_err(|_| HandlerError::BadRequest(format!("unsupported haptic style: {raw}")))
}

#[async_trait]
impl CommandHandler for TriggerHapticHandler {
    fn method(&self) -> &str {
        TRIGGER_HAPTIC
    }

    async fn handle(&self, request: &CommandRequest) -> CommandResponse {
        respond(&request.id, self.trigger(request).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlatformError;
    use bridge_proto::{ErrorCode, Primitive};
    use std::sync::Mutex;
    use test_case::test_case;

    #[derive(Default)]
    struct RecordingHaptics {
        fired: Mutex<Vec<HapticStyle>>,
    }

    #[async_trait]
    impl HapticEngine for RecordingHaptics {
        async fn impact(&self, style: HapticStyle) -> Result<(), PlatformError> {
            self.fired.lock().expect("lock").push(style);
            Ok(())
        }
    }

    struct JammedHaptics;

    #[async_trait]
    impl HapticEngine for JammedHaptics {
        async fn impact(&self, _style: HapticStyle) -> Result<(), PlatformError> {
            Err(PlatformError::Unavailable("haptic engine"))
        }
    }

    fn request_with_style(id: &str, style: Primitive) -> CommandRequest {
        let mut payload = Payload::new();
        payload.insert("style".into(), style);
        CommandRequest::new(id, TRIGGER_HAPTIC).with_payload(payload)
    }

    #[test_case("light", HapticStyle::Light)]
    #[test_case("medium", HapticStyle::Medium)]
    #[test_case("heavy", HapticStyle::Heavy)]
    fn test_valid_style_fires_once(style: &str, expected: HapticStyle) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime");
        let haptics = Arc::new(RecordingHaptics::default());
        let handler = TriggerHapticHandler::new(haptics.clone());

        let response = runtime.block_on(handler.handle(&request_with_style("4", style.into())));

        assert!(response.is_ok());
        assert_eq!(
            response.result().and_then(|r| r.get("triggered")),
            Some(&Primitive::Bool(true))
        );
        assert_eq!(*haptics.fired.lock().expect("lock"), vec![expected]);
    }

    #[tokio::test]
    async fn test_invalid_style_is_bad_request_without_side_effect() {
        let haptics = Arc::new(RecordingHaptics::default());
        let handler = TriggerHapticHandler::new(haptics.clone());

        let response = handler.handle(&request_with_style("3", "invalid".into())).await;

        let error = response.error().expect("error");
        assert_eq!(error.code, ErrorCode::BadRequest);
        assert_eq!(error.message, "unsupported haptic style: invalid");
        assert!(haptics.fired.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn test_missing_style_is_bad_request() {
        let handler = TriggerHapticHandler::new(Arc::new(RecordingHaptics::default()));

        let response = handler.handle(&CommandRequest::new("5", TRIGGER_HAPTIC)).await;

        let error = response.error().expect("error");
        assert_eq!(error.code, ErrorCode::BadRequest);
        assert_eq!(error.message, "style is required");
    }

    #[tokio::test]
    async fn test_non_string_style_is_bad_request() {
        let handler = TriggerHapticHandler::new(Arc::new(RecordingHaptics::default()));

        let response = handler.handle(&request_with_style("6", Primitive::Int(2))).await;

        assert_eq!(
            response.error().map(|e| e.code.clone()),
            Some(ErrorCode::BadRequest)
        );
    }

    #[tokio::test]
    async fn test_engine_failure_becomes_internal_error() {
        let handler = TriggerHapticHandler::new(Arc::new(JammedHaptics));

        let response = handler.handle(&request_with_style("7", "heavy".into())).await;

        let error = response.error().expect("error");
        assert_eq!(error.code, ErrorCode::InternalError);
        assert_eq!(response.id, "7");
    }
}
