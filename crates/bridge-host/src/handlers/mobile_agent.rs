//! `getMobileAgentContext` handler

use std::sync::Arc;

use async_trait::async_trait;
use bridge_proto::capabilities::GET_MOBILE_AGENT_CONTEXT;
use bridge_proto::{CommandRequest, CommandResponse, MobileAgentContext};

use crate::handler::CommandHandler;
use crate::platform::SessionContextProvider;

/// Hands the host monitoring session ids to content so the two sides can be
/// correlated
pub struct GetMobileAgentContextHandler {
    session: Arc<dyn SessionContextProvider>,
}

impl GetMobileAgentContextHandler {
    /// Create a handler reading from `session`
    pub fn new(session: Arc<dyn SessionContextProvider>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl CommandHandler for GetMobileAgentContextHandler {
    fn method(&self) -> &str {
        GET_MOBILE_AGENT_CONTEXT
    }

    async fn handle(&self, request: &CommandRequest) -> CommandResponse {
        let context = MobileAgentContext {
            session_id: self
                .session
                .session_id()
                .filter(|id| !id.is_empty())
                .unwrap_or_default(),
            uuid: self.session.device_uuid().unwrap_or_default(),
        };
        CommandResponse::success(&request.id, context.to_payload())
    }
}
