//! Host ingress
//!
//! The router takes raw inbound messages one at a time, decodes them, and
//! dispatches each valid request on its own task so a slow platform call
//! never holds up the next message. Every message that reaches the router
//! produces exactly one emitted response:
//!
//! - messages without a readable string `id` and `method` get a
//!   `BAD_REQUEST` response with id `"unknown"`, which no client can match
//!   (dead-letter);
//! - decodable messages get whatever the dispatcher returns, with the request
//!   id echoed back;
//! - a handler that panics gets an `INTERNAL_ERROR` response.

use std::fmt;
use std::sync::Arc;

use bridge_proto::{
    decode_request, BridgeError, CommandRequest, CommandResponse, ProtoError, UNKNOWN_ID,
};
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::config::HostConfig;
use crate::dispatcher::CommandDispatcher;
use crate::emitter::ResponseEmitter;

/// Message body used in dead-letter responses.
pub const INVALID_BODY_MESSAGE: &str = "invalid message body";

/// Decodes inbound messages, dispatches them and emits the responses.
#[derive(Clone)]
pub struct MessageRouter {
    dispatcher: Arc<CommandDispatcher>,
    emitter: Arc<dyn ResponseEmitter>,
    config: HostConfig,
    runtime: Option<Handle>,
}

impl MessageRouter {
    /// Create a router with default configuration.
    pub fn new(dispatcher: CommandDispatcher, emitter: Arc<dyn ResponseEmitter>) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            emitter,
            config: HostConfig::default(),
            runtime: None,
        }
    }

    /// Set the host configuration.
    #[must_use]
    pub fn with_config(mut self, config: HostConfig) -> Self {
        self.config = config;
        self
    }

    /// Spawn dispatch tasks on `runtime` instead of the ambient runtime.
    ///
    /// Needed when messages arrive on threads outside any Tokio runtime,
    /// such as a UI thread callback.
    #[must_use]
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Host configuration in use.
    pub const fn config(&self) -> &HostConfig {
        &self.config
    }

    /// The dispatcher requests are routed through.
    pub fn dispatcher(&self) -> &CommandDispatcher {
        &self.dispatcher
    }

    /// Accept a message posted on a named channel.
    ///
    /// Messages on channels other than the configured bridge channel are not
    /// bridge traffic; they are ignored and get no response.
    pub fn handle_message(&self, channel: &str, body: &Value) -> Option<JoinHandle<()>> {
        if !self.config.accepts_channel(channel) {
            debug!(channel, "ignoring message on foreign channel");
            return None;
        }
        self.route(body)
    }

    /// Route one structured message.
    ///
    /// Returns the dispatch task when the message decoded, or `None` when a
    /// dead-letter response was emitted immediately. The response is emitted
    /// by the task; awaiting the handle is optional.
    pub fn route(&self, body: &Value) -> Option<JoinHandle<()>> {
        match decode_request(body) {
            Ok(request) => Some(self.spawn_dispatch(request)),
            Err(e) => {
                self.reject(&e);
                None
            }
        }
    }

    /// Route one message given as JSON text.
    pub fn route_text(&self, text: &str) -> Option<JoinHandle<()>> {
        match serde_json::from_str::<Value>(text) {
            Ok(body) => self.route(&body),
            Err(e) => {
                self.reject(&ProtoError::from(e));
                None
            }
        }
    }

    fn reject(&self, error: &ProtoError) {
        warn!(error = %error, "undecodable inbound message, emitting dead-letter response");
        self.emitter.emit(CommandResponse::failure(
            UNKNOWN_ID,
            BridgeError::bad_request(INVALID_BODY_MESSAGE),
        ));
    }

    fn spawn_dispatch(&self, request: CommandRequest) -> JoinHandle<()> {
        let dispatcher = Arc::clone(&self.dispatcher);
        let emitter = Arc::clone(&self.emitter);
        let runtime = self.runtime.clone();

        let settle = async move {
            let id = request.id.clone();
            let method = request.method.clone();
            debug!(id = %id, method = %method, "routing request");

            // Inner task isolates handler panics from the emit path.
            let dispatch = async move { dispatcher.dispatch(&request).await };
            let outcome = match &runtime {
                Some(handle) => handle.spawn(dispatch).await,
                None => tokio::spawn(dispatch).await,
            };

            let mut response = match outcome {
                Ok(response) => response,
                Err(e) => {
                    error!(id = %id, method = %method, error = %e, "handler did not complete");
                    CommandResponse::failure(
                        id.as_str(),
                        BridgeError::internal(format!("handler for {method} did not complete")),
                    )
                }
            };

            if response.id != id {
                warn!(expected = %id, actual = %response.id, "handler answered with a foreign id");
                response.id = id;
            }

            debug!(id = %response.id, ok = response.is_ok(), "emitting response");
            emitter.emit(response);
        };

        match &self.runtime {
            Some(handle) => handle.spawn(settle),
            None => tokio::spawn(settle),
        }
    }
}

impl fmt::Debug for MessageRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageRouter")
            .field("dispatcher", &self.dispatcher)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
