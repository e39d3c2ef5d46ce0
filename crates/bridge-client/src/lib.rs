//! # bridge-client
//!
//! Content side of the native bridge. A [`BridgeClient`] assigns each call a
//! unique correlation id, posts it through a [`Transport`], and resolves it
//! when the host pushes back a response with the same id, or fails it once
//! the configured timeout elapses.
//!
//! ```no_run
//! use bridge_client::{BridgeClient, ChannelTransport, ClientConfig};
//! use bridge_proto::HapticStyle;
//!
//! # async fn demo() -> Result<(), bridge_client::ClientError> {
//! let (transport, _to_host) = ChannelTransport::pair();
//! let (_from_host_tx, from_host) = tokio::sync::mpsc::unbounded_channel();
//!
//! let client = BridgeClient::with_config(transport, ClientConfig::new().with_timeout_ms(1000));
//! client.attach(from_host);
//!
//! let ack = client.trigger_haptic(HapticStyle::Light).await?;
//! assert!(ack.triggered);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;

pub use client::{BridgeClient, PendingCall};
pub use config::{ClientConfig, DEFAULT_MAX_PENDING, DEFAULT_TIMEOUT};
pub use error::{ClientError, TransportError};
pub use transport::{ChannelTransport, FnTransport, Transport};
