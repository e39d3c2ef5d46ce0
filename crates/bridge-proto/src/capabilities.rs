//! Typed payloads of the built-in capabilities.

use std::fmt;
use std::str::FromStr;

use crate::error::ProtoError;
use crate::types::{Payload, Primitive};

/// Method name of the device info command.
pub const GET_DEVICE_INFO: &str = "getDeviceInfo";
/// Method name of the haptic feedback command.
pub const TRIGGER_HAPTIC: &str = "triggerHaptic";
/// Method name of the mobile agent session context command.
pub const GET_MOBILE_AGENT_CONTEXT: &str = "getMobileAgentContext";

fn required_str(payload: &Payload, key: &'static str) -> Result<String, ProtoError> {
    payload
        .get(key)
        .and_then(Primitive::as_str)
        .map(ToString::to_string)
        .ok_or(ProtoError::MissingField(key))
}

/// Host device description returned by `getDeviceInfo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Platform family, e.g. `iOS` or `linux`.
    pub platform: String,
    /// Operating system name.
    pub system_name: String,
    /// Operating system version.
    pub system_version: String,
    /// Device model.
    pub model: String,
}

impl DeviceInfo {
    /// Encode as a result payload.
    #[must_use]
    pub fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.insert("platform".into(), self.platform.as_str().into());
        payload.insert("systemName".into(), self.system_name.as_str().into());
        payload.insert("systemVersion".into(), self.system_version.as_str().into());
        payload.insert("model".into(), self.model.as_str().into());
        payload
    }

    /// Decode from a result payload. Every field must be a string.
    pub fn from_payload(payload: &Payload) -> Result<Self, ProtoError> {
        Ok(Self {
            platform: required_str(payload, "platform")?,
            system_name: required_str(payload, "systemName")?,
            system_version: required_str(payload, "systemVersion")?,
            model: required_str(payload, "model")?,
        })
    }
}

/// Impact strength accepted by `triggerHaptic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HapticStyle {
    /// Light impact.
    Light,
    /// Medium impact.
    Medium,
    /// Heavy impact.
    Heavy,
}

impl HapticStyle {
    /// All styles, lightest first.
    pub const ALL: [Self; 3] = [Self::Light, Self::Medium, Self::Heavy];

    /// Wire name of the style.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Medium => "medium",
            Self::Heavy => "heavy",
        }
    }

    /// Encode as a request payload.
    #[must_use]
    pub fn to_payload(self) -> Payload {
        let mut payload = Payload::new();
        payload.insert("style".into(), self.as_str().into());
        payload
    }
}

impl fmt::Display for HapticStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HapticStyle {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "medium" => Ok(Self::Medium),
            "heavy" => Ok(Self::Heavy),
            other => Err(ProtoError::InvalidField {
                field: "style",
                reason: format!("unsupported haptic style: {other}"),
            }),
        }
    }
}

/// Result of `triggerHaptic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HapticAck {
    /// Whether the impact was fired.
    pub triggered: bool,
}

impl HapticAck {
    /// Encode as a result payload.
    #[must_use]
    pub fn to_payload(self) -> Payload {
        let mut payload = Payload::new();
        payload.insert("triggered".into(), self.triggered.into());
        payload
    }

    /// Decode from a result payload.
    pub fn from_payload(payload: &Payload) -> Result<Self, ProtoError> {
        payload
            .get("triggered")
            .and_then(Primitive::as_bool)
            .map(|triggered| Self { triggered })
            .ok_or(ProtoError::MissingField("triggered"))
    }
}

/// Session identifiers that let web monitoring correlate with the host's agent.
///
/// Either value may be empty when the host has none.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MobileAgentContext {
    /// Host monitoring session id.
    pub session_id: String,
    /// Per-install device identifier.
    pub uuid: String,
}

impl MobileAgentContext {
    /// Encode as a result payload.
    #[must_use]
    pub fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.insert("sessionId".into(), self.session_id.as_str().into());
        payload.insert("uuid".into(), self.uuid.as_str().into());
        payload
    }

    /// Decode from a result payload.
    pub fn from_payload(payload: &Payload) -> Result<Self, ProtoError> {
        Ok(Self {
            session_id: required_str(payload, "sessionId")?,
            uuid: required_str(payload, "uuid")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn device_info_payload_uses_camel_case_keys() {
        let info = DeviceInfo {
            platform: "iOS".into(),
            system_name: "iOS".into(),
            system_version: "17.4".into(),
            model: "iPhone".into(),
        };
        let payload = info.to_payload();

        assert_eq!(payload.get("systemName"), Some(&Primitive::from("iOS")));
        assert_eq!(payload.get("systemVersion"), Some(&Primitive::from("17.4")));
        assert_eq!(DeviceInfo::from_payload(&payload).expect("decode"), info);
    }

    #[test]
    fn device_info_missing_field() {
        let mut payload = Payload::new();
        payload.insert("platform".into(), "iOS".into());

        let err = DeviceInfo::from_payload(&payload).expect_err("should fail");
        assert!(matches!(err, ProtoError::MissingField("systemName")));
    }

    #[test_case("light", HapticStyle::Light)]
    #[test_case("medium", HapticStyle::Medium)]
    #[test_case("heavy", HapticStyle::Heavy)]
    fn haptic_style_parses(input: &str, expected: HapticStyle) {
        assert_eq!(input.parse::<HapticStyle>().expect("parse"), expected);
        assert_eq!(expected.to_string(), input);
    }

    #[test_case("invalid" ; "unknown word")]
    #[test_case("Light" ; "wrong case")]
    #[test_case("" ; "empty")]
    fn haptic_style_rejects(input: &str) {
        let err = input.parse::<HapticStyle>().expect_err("should fail");
        assert!(err.to_string().contains(&format!("unsupported haptic style: {input}")));
    }

    #[test]
    fn haptic_ack_requires_bool() {
        let mut payload = Payload::new();
        payload.insert("triggered".into(), "yes".into());
        assert!(HapticAck::from_payload(&payload).is_err());

        let ack = HapticAck { triggered: true };
        assert_eq!(HapticAck::from_payload(&ack.to_payload()).expect("decode"), ack);
    }

    #[test]
    fn mobile_agent_context_allows_empty_values() {
        let context = MobileAgentContext::default();
        let decoded = MobileAgentContext::from_payload(&context.to_payload()).expect("decode");
        assert_eq!(decoded.session_id, "");
        assert_eq!(decoded.uuid, "");
    }
}
