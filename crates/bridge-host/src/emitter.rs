//! Response emitters
//!
//! An emitter is the host half of the transport: it takes a finished
//! response and sends it toward content without waiting for anything back.

use std::fmt;

use bridge_proto::{encode_response, CommandResponse, ProtoError};
use tokio::sync::mpsc;
use tracing::warn;

/// One-way sink for responses headed to content
pub trait ResponseEmitter: Send + Sync {
    /// Send one response. Must not block and must not fail loudly.
    fn emit(&self, response: CommandResponse);
}

impl ResponseEmitter for mpsc::UnboundedSender<CommandResponse> {
    fn emit(&self, response: CommandResponse) {
        if let Err(e) = self.send(response) {
            warn!(id = %e.0.id, "response receiver dropped, response discarded");
        }
    }
}

/// Adapts a closure into an emitter
pub struct FnEmitter<F>(pub F);

impl<F> ResponseEmitter for FnEmitter<F>
where
    F: Fn(CommandResponse) + Send + Sync,
{
    fn emit(&self, response: CommandResponse) {
        (self.0)(response);
    }
}

/// Render the JavaScript snippet that delivers `response` to the content's
/// global `callback`
///
/// ```
/// # use bridge_host::emitter::delivery_script;
/// # use bridge_proto::{BridgeError, CommandResponse};
/// let response = CommandResponse::failure("1", BridgeError::bad_request("style is required"));
/// let script = delivery_script(&response, "onNativeMessage").unwrap();
/// assert!(script.starts_with("window.onNativeMessage && window.onNativeMessage({"));
/// ```
pub fn delivery_script(response: &CommandResponse, callback: &str) -> Result<String, ProtoError> {
    let json = serde_json::to_string(&encode_response(response)?)?;
    Ok(format!("window.{callback} && window.{callback}({json});"))
}

/// Emits responses as script snippets evaluated in the content surface
pub struct ScriptEmitter<F> {
    callback: String,
    evaluate: F,
}

impl<F> ScriptEmitter<F>
where
    F: Fn(String) + Send + Sync,
{
    /// Create an emitter calling `callback` through the `evaluate` sink
    pub fn new(callback: impl Into<String>, evaluate: F) -> Self {
        Self {
            callback: callback.into(),
            evaluate,
        }
    }
}

impl<F> ResponseEmitter for ScriptEmitter<F>
where
    F: Fn(String) + Send + Sync,
{
    fn emit(&self, response: CommandResponse) {
        match delivery_script(&response, &self.callback) {
            Ok(script) => (self.evaluate)(script),
            Err(e) => warn!(id = %response.id, error = %e, "failed to render delivery script"),
        }
    }
}

impl<F> fmt::Debug for ScriptEmitter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptEmitter")
            .field("callback", &self.callback)
            .finish_non_exhaustive()
    }
}
