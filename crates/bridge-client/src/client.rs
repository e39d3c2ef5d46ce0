//! Correlating bridge client.
//!
//! Every call registers a pending entry keyed by a fresh correlation id,
//! posts the request, then waits for whichever comes first: the matching
//! response, the deadline, or client teardown. Removal of the entry from the
//! pending table, under its lock, is what decides the winner, so each call
//! settles exactly once.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bridge_proto::{decode_response, decode_response_str, CommandRequest, CommandResponse, Payload};
use chrono::Utc;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::transport::Transport;

/// A call waiting for its response.
struct PendingRequest {
    method: String,
    tx: oneshot::Sender<CommandResponse>,
}

#[derive(Default)]
struct PendingTable {
    entries: HashMap<String, PendingRequest>,
    closed: bool,
}

struct Shared {
    transport: Box<dyn Transport>,
    config: ClientConfig,
    pending: Mutex<PendingTable>,
}

impl Shared {
    fn remove(&self, id: &str) -> Option<PendingRequest> {
        self.pending.lock().entries.remove(id)
    }

    fn deliver(&self, response: CommandResponse) -> bool {
        let mut table = self.pending.lock();
        let Some(entry) = table.entries.remove(&response.id) else {
            debug!(id = %response.id, "no pending request for response, discarding");
            return false;
        };

        debug!(id = %response.id, method = %entry.method, ok = response.is_ok(), "response matched");
        // Sent while the lock is held: a racing timeout either finds the
        // entry or finds the value already in the channel.
        if entry.tx.send(response).is_err() {
            debug!("caller stopped waiting before the response arrived");
        }
        true
    }

    fn deliver_value(&self, message: &Value) -> bool {
        match decode_response(message) {
            Ok(response) => self.deliver(response),
            Err(e) => {
                warn!(error = %e, "discarding undecodable inbound message");
                false
            }
        }
    }
}

/// Content-side bridge client.
///
/// Clones share one pending table; [`close`](Self::close) on any clone tears
/// the client down for all of them.
#[derive(Clone)]
pub struct BridgeClient {
    shared: Arc<Shared>,
}

impl BridgeClient {
    /// Create a client with default configuration.
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    /// Create a client with explicit configuration.
    pub fn with_config(transport: impl Transport + 'static, config: ClientConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                transport: Box::new(transport),
                config,
                pending: Mutex::new(PendingTable::default()),
            }),
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &ClientConfig {
        &self.shared.config
    }

    /// Number of calls waiting for a response.
    pub fn pending_count(&self) -> usize {
        self.shared.pending.lock().entries.len()
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.shared.pending.lock().closed
    }

    /// Send a command and wait for its response.
    ///
    /// Resolves with the response when the host answers `ok`; fails with
    /// [`ClientError::Remote`] when it answers with an error, and with
    /// [`ClientError::Timeout`] when it does not answer in time.
    pub async fn send(
        &self,
        method: &str,
        payload: Option<Payload>,
    ) -> Result<CommandResponse, ClientError> {
        self.call(method, payload)?.wait().await
    }

    /// Register and post a command without waiting for it.
    ///
    /// Fails immediately, before any deadline is set, when the transport
    /// cannot take the request. The deadline starts when this returns.
    pub fn call(&self, method: &str, payload: Option<Payload>) -> Result<PendingCall, ClientError> {
        let (id, rx) = self.register(method)?;
        let guard = PendingGuard {
            shared: Arc::clone(&self.shared),
            id: id.clone(),
        };

        let request = CommandRequest {
            id,
            method: method.to_string(),
            payload,
        };

        // On failure the guard drops here and unregisters the entry.
        if let Err(e) = self.shared.transport.post(&request) {
            debug!(id = %request.id, method, error = %e, "transport rejected request");
            return Err(ClientError::from(e));
        }
        debug!(id = %request.id, method, "request posted");

        Ok(PendingCall {
            guard,
            rx,
            deadline: deadline_after(self.shared.config.timeout),
            timeout_ms: self.shared.config.timeout_ms(),
        })
    }

    fn register(
        &self,
        method: &str,
    ) -> Result<(String, oneshot::Receiver<CommandResponse>), ClientError> {
        let mut table = self.shared.pending.lock();
        if table.closed {
            return Err(ClientError::Closed);
        }
        if let Some(limit) = self.shared.config.max_pending {
            if table.entries.len() >= limit {
                warn!(limit, method, "pending request cap reached");
                return Err(ClientError::TooManyPending { limit });
            }
        }

        let mut id = generate_id();
        while table.entries.contains_key(&id) {
            id = generate_id();
        }

        let (tx, rx) = oneshot::channel();
        table.entries.insert(
            id.clone(),
            PendingRequest {
                method: method.to_string(),
                tx,
            },
        );
        Ok((id, rx))
    }

    /// Inbound delivery point for responses pushed by the host.
    ///
    /// Returns whether the response matched a pending call. Responses for
    /// unknown, settled or timed-out ids are dropped without error.
    pub fn deliver(&self, response: CommandResponse) -> bool {
        self.shared.deliver(response)
    }

    /// Deliver a structured inbound message, decoding it first.
    pub fn deliver_value(&self, message: &Value) -> bool {
        self.shared.deliver_value(message)
    }

    /// Deliver an inbound message given as JSON text.
    pub fn deliver_text(&self, text: &str) -> bool {
        match decode_response_str(text) {
            Ok(response) => self.deliver(response),
            Err(e) => {
                warn!(error = %e, "discarding undecodable inbound message");
                false
            }
        }
    }

    /// Feed every message from `inbound` into [`deliver_value`](Self::deliver_value).
    ///
    /// The pump holds only a weak reference and stops once the channel closes
    /// or every client handle is gone.
    pub fn attach(&self, mut inbound: mpsc::UnboundedReceiver<Value>) -> JoinHandle<()> {
        let shared = Arc::downgrade(&self.shared);
        tokio::spawn(async move {
            while let Some(message) = inbound.recv().await {
                let Some(shared) = shared.upgrade() else {
                    break;
                };
                shared.deliver_value(&message);
            }
            debug!("inbound pump stopped");
        })
    }

    /// Tear the client down.
    ///
    /// Every pending call fails with [`ClientError::Closed`] and later calls
    /// are refused.
    pub fn close(&self) {
        let drained: Vec<PendingRequest> = {
            let mut table = self.shared.pending.lock();
            table.closed = true;
            table.entries.drain().map(|(_, entry)| entry).collect()
        };

        if !drained.is_empty() {
            debug!(count = drained.len(), "closing client, rejecting pending requests");
        }
        // Dropping the senders wakes each waiter with a closed channel.
        drop(drained);
    }
}

impl fmt::Debug for BridgeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeClient")
            .field("config", &self.shared.config)
            .field("pending", &self.pending_count())
            .finish_non_exhaustive()
    }
}

/// Unregisters a pending entry when the call is abandoned.
struct PendingGuard {
    shared: Arc<Shared>,
    id: String,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.shared.remove(&self.id);
    }
}

/// A posted call whose response has not been awaited yet.
pub struct PendingCall {
    guard: PendingGuard,
    rx: oneshot::Receiver<CommandResponse>,
    deadline: Instant,
    timeout_ms: u64,
}

impl PendingCall {
    /// Correlation id of the request.
    pub fn id(&self) -> &str {
        &self.guard.id
    }

    /// Wait for the response, the deadline, or client teardown.
    pub async fn wait(mut self) -> Result<CommandResponse, ClientError> {
        let response = match timeout_at(self.deadline, &mut self.rx).await {
            Ok(Ok(response)) => response,
            Ok(Err(_)) => return Err(ClientError::Closed),
            Err(_) => {
                if self.guard.shared.remove(&self.guard.id).is_some() {
                    debug!(id = %self.guard.id, timeout_ms = self.timeout_ms, "request timed out");
                    return Err(ClientError::Timeout {
                        id: self.guard.id.clone(),
                        timeout_ms: self.timeout_ms,
                    });
                }
                // Delivery or teardown took the entry first.
                self.rx.try_recv().map_err(|_| ClientError::Closed)?
            }
        };

        settle(response)
    }
}

impl fmt::Debug for PendingCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingCall")
            .field("id", &self.guard.id)
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}

fn settle(response: CommandResponse) -> Result<CommandResponse, ClientError> {
    if let Some(error) = response.error() {
        return Err(ClientError::Remote {
            code: error.code.clone(),
            message: error.message.clone(),
        });
    }
    Ok(response)
}

/// Furthest deadline a call is given; longer timeouts are clamped to it.
const MAX_WAIT: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 30);

fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout.min(MAX_WAIT))
        .or_else(|| now.checked_add(Duration::from_secs(60 * 60 * 24)))
        .unwrap_or(now)
}

/// `<unix millis>-<random hex>`; unique enough for correlation, not secret.
fn generate_id() -> String {
    format!("{}-{:x}", Utc::now().timestamp_millis(), rand::random::<u64>())
}
