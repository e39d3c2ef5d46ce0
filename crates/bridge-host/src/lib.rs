//! Native bridge host
//!
//! Host side of the native bridge protocol. Web content posts command
//! requests on a message channel; the host decodes them, runs the matching
//! capability handler, and sends the response back.
//!
//! ## Wiring
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use bridge_host::{CommandDispatcher, HostPlatform, MessageRouter};
//! use bridge_proto::CommandResponse;
//! use tokio::sync::mpsc;
//!
//! # async fn wire() -> Result<(), bridge_host::RegistryError> {
//! let dispatcher = CommandDispatcher::with_builtin_handlers(&HostPlatform::default())?;
//! let (tx, mut rx) = mpsc::unbounded_channel::<CommandResponse>();
//! let router = MessageRouter::new(dispatcher, Arc::new(tx));
//!
//! router.route_text(r#"{"id":"1","method":"getDeviceInfo"}"#);
//! let response = rx.recv().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dispatcher;
pub mod emitter;
pub mod error;
pub mod handler;
pub mod handlers;
pub mod platform;
pub mod router;

pub use config::HostConfig;
pub use dispatcher::CommandDispatcher;
pub use emitter::{delivery_script, FnEmitter, ResponseEmitter, ScriptEmitter};
pub use error::{HandlerError, HandlerResult, PlatformError, RegistryError};
pub use handler::{respond, CommandHandler};
pub use platform::{
    DeviceInfoProvider, HapticEngine, HostPlatform, SessionContextProvider, StaticSessionContext,
    SystemDeviceInfo, TracingHaptics,
};
pub use router::MessageRouter;
