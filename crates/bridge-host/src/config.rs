//! Host configuration.

/// Default name of the message channel content posts requests on.
pub const DEFAULT_CHANNEL_NAME: &str = "nativeBridge";

/// Default name of the content-side function responses are delivered to.
pub const DEFAULT_CALLBACK_NAME: &str = "onNativeMessage";

/// Configuration for the host side of the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// Channel name the router accepts messages on.
    /// Messages posted on any other channel are ignored.
    pub channel_name: String,
    /// Global function on the content side that receives responses.
    pub callback_name: String,
}

impl HostConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            channel_name: DEFAULT_CHANNEL_NAME.to_string(),
            callback_name: DEFAULT_CALLBACK_NAME.to_string(),
        }
    }

    /// Set the channel name.
    #[must_use]
    pub fn with_channel_name(mut self, name: impl Into<String>) -> Self {
        self.channel_name = name.into();
        self
    }

    /// Set the callback name.
    #[must_use]
    pub fn with_callback_name(mut self, name: impl Into<String>) -> Self {
        self.callback_name = name.into();
        self
    }

    /// Check whether a message posted on `channel` is addressed to the bridge.
    #[must_use]
    pub fn accepts_channel(&self, channel: &str) -> bool {
        self.channel_name == channel
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self::new()
    }
}
