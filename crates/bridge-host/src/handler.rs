//! Capability handler contract.

use async_trait::async_trait;
use bridge_proto::{CommandRequest, CommandResponse, Payload};

use crate::error::HandlerResult;

/// A unit implementing exactly one bridge command.
///
/// `handle` must always produce a response: invalid input becomes
/// `BAD_REQUEST` and platform failures become `INTERNAL_ERROR`.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// The single method name this handler serves.
    fn method(&self) -> &str;

    /// Whether this handler serves `method`.
    fn can_handle(&self, method: &str) -> bool {
        self.method() == method
    }

    /// Execute the command.
    async fn handle(&self, request: &CommandRequest) -> CommandResponse;
}

/// Turn a handler result into the response for request `id`.
pub fn respond(id: &str, result: HandlerResult<Payload>) -> CommandResponse {
    match result {
        Ok(payload) => CommandResponse::success(id, payload),
        Err(e) => e.into_response(id),
    }
}
