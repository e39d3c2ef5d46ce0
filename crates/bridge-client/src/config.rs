//! Client configuration.

use std::time::Duration;

/// Default time a call waits for its response.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Default cap on calls waiting for a response at once.
pub const DEFAULT_MAX_PENDING: usize = 1024;

/// Configuration for a [`BridgeClient`](crate::BridgeClient).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    /// How long a call waits before failing with a timeout.
    pub timeout: Duration,
    /// Maximum number of outstanding calls. `None` means unbounded.
    pub max_pending: Option<usize>,
}

impl ClientConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_pending: Some(DEFAULT_MAX_PENDING),
        }
    }

    /// Set the per-call timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the per-call timeout in milliseconds.
    #[must_use]
    pub const fn with_timeout_ms(self, timeout_ms: u64) -> Self {
        self.with_timeout(Duration::from_millis(timeout_ms))
    }

    /// Set the cap on outstanding calls.
    #[must_use]
    pub const fn with_max_pending(mut self, max: Option<usize>) -> Self {
        self.max_pending = max;
        self
    }

    /// Timeout in whole milliseconds.
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}
