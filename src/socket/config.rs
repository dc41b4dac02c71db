//! Socket configuration.
//!
//! Provides a type-safe interface for configuring a [`SocketManager`]:
//! endpoint, reconnection policy, and keepalive.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use sockmux::SocketConfig;
//!
//! let config = SocketConfig::new("publish.ip1.cc:4000")
//!     .with_reconnect(3, Duration::from_secs(1))
//!     .with_keepalive(Duration::from_secs(30));
//! ```
//!
//! [`SocketManager`]: crate::SocketManager

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Default reconnect budget: consecutive attempts before giving up.
pub const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 5;

/// Default delay between reconnect attempts.
pub const DEFAULT_RECONNECT_INTERVAL: Duration = Duration::from_millis(3000);

/// Path the channel endpoint serves WebSocket upgrades on.
const ENDPOINT_PATH: &str = "/channel/websocket";

// ============================================================================
// SocketConfig
// ============================================================================

/// Configuration for a socket manager.
///
/// `server` is the remote `host:port`; the full endpoint becomes
/// `ws://<server>/channel/websocket` (`wss://` with [`with_tls`]).
///
/// [`with_tls`]: SocketConfig::with_tls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketConfig {
    /// Remote address as `host:port`.
    pub server: String,

    /// Connect with `wss://` instead of `ws://`.
    pub tls: bool,

    /// Consecutive reconnect attempts before giving up.
    pub max_reconnect_attempts: u32,

    /// Fixed delay between reconnect attempts.
    pub reconnect_interval: Duration,

    /// Keepalive ping period; `None` disables keepalive.
    pub keepalive: Option<Duration>,
}

// ============================================================================
// Constructors
// ============================================================================

impl SocketConfig {
    /// Creates a configuration with default policy for the given server.
    #[inline]
    #[must_use]
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            tls: false,
            max_reconnect_attempts: DEFAULT_MAX_RECONNECT_ATTEMPTS,
            reconnect_interval: DEFAULT_RECONNECT_INTERVAL,
            keepalive: None,
        }
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl SocketConfig {
    /// Enables TLS (`wss://`).
    #[inline]
    #[must_use]
    pub fn with_tls(mut self) -> Self {
        self.tls = true;
        self
    }

    /// Sets the reconnection policy.
    #[inline]
    #[must_use]
    pub fn with_reconnect(mut self, max_attempts: u32, interval: Duration) -> Self {
        self.max_reconnect_attempts = max_attempts;
        self.reconnect_interval = interval;
        self
    }

    /// Enables keepalive pings at the given period.
    ///
    /// A zero period disables keepalive.
    #[inline]
    #[must_use]
    pub fn with_keepalive(mut self, period: Duration) -> Self {
        self.keepalive = if period.is_zero() { None } else { Some(period) };
        self
    }
}

// ============================================================================
// Endpoint URL
// ============================================================================

impl SocketConfig {
    /// Builds and validates the full endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `server` does not form a valid
    /// `host:port` authority.
    pub fn endpoint_url(&self) -> Result<String> {
        let scheme = if self.tls { "wss" } else { "ws" };
        let raw = format!("{scheme}://{}{ENDPOINT_PATH}", self.server);

        let url = Url::parse(&raw)
            .map_err(|e| Error::config(format!("invalid server address {:?}: {e}", self.server)))?;

        if url.host_str().is_none() {
            return Err(Error::config(format!(
                "server address {:?} has no host",
                self.server
            )));
        }

        Ok(url.to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================
