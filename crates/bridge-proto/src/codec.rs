//! Conversion between protocol messages and their JSON wire form.
//!
//! Requests are decoded by hand rather than through serde so that each
//! rejection names the offending field; hosts report that reason back in
//! `BAD_REQUEST` logs.

use serde_json::{Map, Value};

use crate::error::ProtoError;
use crate::messages::{CommandRequest, CommandResponse, WireResponse};
use crate::types::{Payload, Primitive};

/// Decode a request from an already-parsed JSON value.
///
/// Only `id` and `method` are required. A `payload` that is not an object is
/// treated as absent, and entries whose values are arrays or objects are
/// dropped, so any request with a readable id still reaches its handler.
pub fn decode_request(value: &Value) -> Result<CommandRequest, ProtoError> {
    let object = value.as_object().ok_or(ProtoError::NotAnObject)?;

    let id = object
        .get("id")
        .and_then(Value::as_str)
        .ok_or(ProtoError::MissingField("id"))?;
    let method = object
        .get("method")
        .and_then(Value::as_str)
        .ok_or(ProtoError::MissingField("method"))?;

    let payload = match object.get("payload") {
        Some(Value::Object(map)) => Some(decode_payload(map)),
        _ => None,
    };

    Ok(CommandRequest {
        id: id.to_string(),
        method: method.to_string(),
        payload,
    })
}

/// Parse and decode a request from JSON text.
pub fn decode_request_str(text: &str) -> Result<CommandRequest, ProtoError> {
    let value: Value = serde_json::from_str(text)?;
    decode_request(&value)
}

/// Decode a response, enforcing that it carries exactly one of result/error.
pub fn decode_response(value: &Value) -> Result<CommandResponse, ProtoError> {
    if !value.is_object() {
        return Err(ProtoError::NotAnObject);
    }
    let wire: WireResponse = serde_json::from_value(value.clone())?;
    CommandResponse::try_from(wire)
}

/// Parse and decode a response from JSON text.
pub fn decode_response_str(text: &str) -> Result<CommandResponse, ProtoError> {
    let value: Value = serde_json::from_str(text)?;
    decode_response(&value)
}

/// Encode a request into its wire form.
#[must_use]
pub fn encode_request(request: &CommandRequest) -> Value {
    let mut object = Map::new();
    object.insert("id".to_string(), Value::String(request.id.clone()));
    object.insert("method".to_string(), Value::String(request.method.clone()));
    if let Some(payload) = &request.payload {
        object.insert("payload".to_string(), encode_payload(payload));
    }
    Value::Object(object)
}

/// Encode a response into its wire form.
pub fn encode_response(response: &CommandResponse) -> Result<Value, ProtoError> {
    Ok(serde_json::to_value(response)?)
}

/// Encode a payload as a JSON object.
#[must_use]
pub fn encode_payload(payload: &Payload) -> Value {
    Value::Object(
        payload
            .iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect(),
    )
}

fn decode_payload(map: &Map<String, Value>) -> Payload {
    map.iter()
        .filter_map(|(key, value)| Primitive::from_json(value).map(|primitive| (key.clone(), primitive)))
        .collect()
}
