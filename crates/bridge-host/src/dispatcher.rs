//! Command dispatch
//!
//! Resolves a request's method to the first registered handler that claims
//! it. The dispatcher adds no validation or recovery of its own; converting
//! failures into responses is the handlers' job.

use std::fmt;
use std::sync::Arc;

use bridge_proto::{BridgeError, CommandRequest, CommandResponse};
use tracing::debug;

use crate::error::RegistryError;
use crate::handler::CommandHandler;
use crate::handlers::builtin_handlers;
use crate::platform::HostPlatform;

/// Ordered set of capability handlers
#[derive(Default, Clone)]
pub struct CommandDispatcher {
    handlers: Vec<Arc<dyn CommandHandler>>,
}

impl CommandDispatcher {
    /// Create an empty dispatcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dispatcher from handlers in registration order
    pub fn with_handlers(
        handlers: impl IntoIterator<Item = Arc<dyn CommandHandler>>,
    ) -> Result<Self, RegistryError> {
        let mut dispatcher = Self::new();
        for handler in handlers {
            dispatcher.register(handler)?;
        }
        Ok(dispatcher)
    }

    /// Create a dispatcher wired with the built-in handlers
    pub fn with_builtin_handlers(platform: &HostPlatform) -> Result<Self, RegistryError> {
        Self::with_handlers(builtin_handlers(platform))
    }

    /// Append a handler
    ///
    /// Fails if the new handler and an already registered one claim a
    /// common method, in either direction.
    pub fn register(&mut self, handler: Arc<dyn CommandHandler>) -> Result<&mut Self, RegistryError> {
        let method = handler.method();
        for existing in &self.handlers {
            if existing.can_handle(method) {
                return Err(RegistryError::DuplicateMethod(method.to_string()));
            }
            if handler.can_handle(existing.method()) {
                return Err(RegistryError::DuplicateMethod(existing.method().to_string()));
            }
        }
        self.handlers.push(handler);
        Ok(self)
    }

    /// Method names in registration order
    pub fn methods(&self) -> Vec<&str> {
        self.handlers.iter().map(|h| h.method()).collect()
    }

    /// Number of registered handlers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handlers are registered
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Execute the request on the first handler claiming its method
    pub async fn dispatch(&self, request: &CommandRequest) -> CommandResponse {
        let Some(handler) = self.handlers.iter().find(|h| h.can_handle(&request.method)) else {
            debug!(id = %request.id, method = %request.method, "no handler for method");
            return CommandResponse::failure(&request.id, BridgeError::method_not_found(&request.method));
        };

        debug!(id = %request.id, method = %request.method, "dispatching");
        handler.handle(request).await
    }
}

impl fmt::Debug for CommandDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDispatcher")
            .field("methods", &self.methods())
            .finish()
    }
}
