//! Socket manager: the public connection handle.
//!
//! A [`SocketManager`] owns one physical connection lifecycle and the set of
//! channels multiplexed over it. Construction spawns the driver task, which
//! connects immediately and keeps reconnecting within the configured budget.
//!
//! The manager is a cheap handle: cloning it shares the same driver,
//! listeners, and channel registry. All operations are non-blocking; they
//! enqueue commands the driver applies on its event loop.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};

use crate::error::Result;
use crate::ids::Topic;
use crate::transport::{Transport, WsTransport};

use super::channel::{Channel, ChannelRegistry, ChannelShared};
use super::config::SocketConfig;
use super::driver::{Command, Driver};
use super::event::{SocketEvent, SocketEventKind, SocketListeners};

// ============================================================================
// SocketState
// ============================================================================

/// Connection state of the socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketState {
    /// A connect attempt is in progress.
    Connecting,
    /// A transport connection is established.
    Open,
    /// No connection; either between attempts, after the reconnect budget
    /// was exhausted, or after shutdown.
    Closed,
}

// ============================================================================
// SocketManager
// ============================================================================

/// Reconnecting channel-multiplexing socket.
///
/// # Example
///
/// ```no_run
/// use sockmux::{SocketConfig, SocketEventKind, SocketManager};
///
/// # fn example() -> sockmux::Result<()> {
/// let manager = SocketManager::new(SocketConfig::new("publish.ip1.cc:4000"))?;
///
/// manager.on(SocketEventKind::Open, |_| println!("socket open"));
///
/// let channel = manager.join_channel("lobby");
/// channel.on_message(|message| println!("lobby: {message}"));
/// channel.send(&"hello")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SocketManager {
    commands: mpsc::UnboundedSender<Command>,
    listeners: Arc<SocketListeners>,
    registry: Arc<ChannelRegistry>,
    state_rx: watch::Receiver<SocketState>,
}

// ============================================================================
// SocketManager - Construction
// ============================================================================

impl SocketManager {
    /// Creates a manager connected over WebSocket and starts its driver.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if the configured
    /// server address is invalid.
    pub fn new(config: SocketConfig) -> Result<Self> {
        Self::with_transport(config, WsTransport::new())
    }

    /// Creates a manager over a custom [`Transport`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if the configured
    /// server address is invalid.
    pub fn with_transport(config: SocketConfig, transport: impl Transport) -> Result<Self> {
        let url = config.endpoint_url()?;

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(SocketState::Connecting);
        let listeners = Arc::new(SocketListeners::default());
        let registry = Arc::new(ChannelRegistry::default());

        let driver = Driver::new(
            url,
            Box::new(transport),
            &config,
            command_rx,
            state_tx,
            Arc::clone(&listeners),
            Arc::clone(&registry),
        );
        tokio::spawn(driver.run());

        Ok(Self {
            commands: command_tx,
            listeners,
            registry,
            state_rx,
        })
    }
}

// ============================================================================
// SocketManager - Public API
// ============================================================================

impl SocketManager {
    /// Registers a connection-level event listener.
    ///
    /// Listeners for a kind fire in registration order, on the driver task.
    pub fn on(
        &self,
        kind: SocketEventKind,
        listener: impl Fn(&SocketEvent) + Send + Sync + 'static,
    ) {
        self.listeners.register(kind, Arc::new(listener));
    }

    /// Replaces the reconnection policy.
    ///
    /// Takes effect at the next close event; a reconnect already scheduled
    /// keeps its original delay.
    pub fn configure_reconnection(&self, max_attempts: u32, interval: Duration) {
        let _ = self.commands.send(Command::ConfigureReconnect {
            max_attempts,
            interval,
        });
    }

    /// Joins the channel `room:<name>` and returns its handle.
    ///
    /// The join frame goes out immediately when the socket is open;
    /// membership is (re-)established by join replay on every open, so a
    /// channel joined while disconnected becomes live at the next open.
    ///
    /// Joining a topic that already has a live channel replaces it; the new
    /// channel keeps the topic's original join-replay position.
    pub fn join_channel(&self, name: impl AsRef<str>) -> Channel {
        let topic = Topic::room(name);
        let shared = Arc::new(ChannelShared::new(topic.clone()));

        self.registry.insert(Arc::clone(&shared));
        let _ = self.commands.send(Command::Join(topic));

        Channel::new(shared, self.commands.clone())
    }

    /// Replaces the keepalive schedule.
    ///
    /// While the socket is open, a ping frame is sent every `period`,
    /// starting one full period after the call. A zero period disables
    /// keepalive.
    pub fn set_keepalive_interval(&self, period: Duration) {
        let keepalive = if period.is_zero() { None } else { Some(period) };
        let _ = self.commands.send(Command::SetKeepAlive(keepalive));
    }

    /// Returns the current connection state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> SocketState {
        *self.state_rx.borrow()
    }

    /// Returns a receiver observing connection state changes.
    #[inline]
    #[must_use]
    pub fn state_receiver(&self) -> watch::Receiver<SocketState> {
        self.state_rx.clone()
    }

    /// Shuts the socket down.
    ///
    /// Closes any live connection and cancels a reconnect scheduled
    /// mid-backoff. Dropping every handle (manager and channels) has the
    /// same effect.
    pub fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::transport::fake::FakeTransport;

    fn manager(config: SocketConfig) -> (SocketManager, FakeTransport) {
        let fake = FakeTransport::new();
        let manager =
            SocketManager::with_transport(config, fake.clone()).expect("valid config");
        (manager, fake)
    }

    #[tokio::test]
    async fn test_invalid_server_address_rejected() {
        let result = SocketManager::new(SocketConfig::new("not a host"));
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_join_channel_topic_prefix() {
        let (manager, _fake) = manager(SocketConfig::new("localhost:4000"));
        let channel = manager.join_channel("someTopic");
        assert_eq!(channel.topic().as_str(), "room:someTopic");
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_state_is_connecting() {
        let (manager, fake) = manager(SocketConfig::new("localhost:4000"));
        let _conn = fake.expect_accept();
        assert_eq!(manager.state(), SocketState::Connecting);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clones_share_driver() {
        let (manager, fake) = manager(SocketConfig::new("localhost:4000"));
        let conn = fake.expect_accept();

        let clone = manager.clone();
        clone.join_channel("lobby");
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(manager.state(), SocketState::Open);
        assert_eq!(conn.sent_frames().len(), 1);
    }
}
