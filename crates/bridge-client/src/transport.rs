//! Outbound half of the message channel.

use std::sync::Arc;

use bridge_proto::{encode_request, CommandRequest};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::TransportError;

/// One-way "post a structured message" primitive toward the host.
///
/// Posting never waits for an answer; responses come back separately through
/// [`BridgeClient::deliver`](crate::BridgeClient::deliver).
pub trait Transport: Send + Sync {
    /// Hand `request` to the host.
    fn post(&self, request: &CommandRequest) -> Result<(), TransportError>;
}

/// `None` models a content surface whose host never installed the bridge.
impl<T: Transport> Transport for Option<T> {
    fn post(&self, request: &CommandRequest) -> Result<(), TransportError> {
        match self {
            Some(transport) => transport.post(request),
            None => Err(TransportError::NotInstalled),
        }
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn post(&self, request: &CommandRequest) -> Result<(), TransportError> {
        (**self).post(request)
    }
}

/// Posts wire-encoded requests into a Tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<Value>,
}

impl ChannelTransport {
    /// Create a transport feeding `tx`.
    #[must_use]
    pub const fn new(tx: mpsc::UnboundedSender<Value>) -> Self {
        Self { tx }
    }

    /// Create a transport and the receiver the host reads from.
    #[must_use]
    pub fn pair() -> (Self, mpsc::UnboundedReceiver<Value>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl Transport for ChannelTransport {
    fn post(&self, request: &CommandRequest) -> Result<(), TransportError> {
        self.tx
            .send(encode_request(request))
            .map_err(|_| TransportError::Disconnected)
    }
}

/// Adapts a closure into a transport.
pub struct FnTransport<F>(pub F);

impl<F> Transport for FnTransport<F>
where
    F: Fn(&CommandRequest) -> Result<(), TransportError> + Send + Sync,
{
    fn post(&self, request: &CommandRequest) -> Result<(), TransportError> {
        (self.0)(request)
    }
}
