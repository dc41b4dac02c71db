//! Socket driver: the connection event loop.
//!
//! One driver task exists per [`SocketManager`]; it owns the transport link
//! exclusively and runs every piece of work (inbound frames, commands from
//! the public handles, keepalive ticks, and the reconnect backoff) on one
//! `tokio::select!` loop. Listener callbacks therefore run to completion
//! before the next event is processed.
//!
//! # Connection Cycle
//!
//! ```text
//!            ┌──────────── backoff (cancellable) ◄─────────────┐
//!            ▼                                                 │
//!   Connecting ──connect──► Open ──link lost / error──► Closed ┤
//!            │                                                 │ budget
//!            └──connect failed──────────────────────────► Closed ──► done
//! ```
//!
//! On every successful connect the driver resets the reconnect budget,
//! restarts the frame reference sequence, and replays each channel's join in
//! channel-creation order before emitting `Open`.
//!
//! [`SocketManager`]: crate::SocketManager

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use rustc_hash::FxHashSet;
use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use crate::error::{Error, Result};
use crate::ids::{ChannelId, RefSeq, Topic};
use crate::protocol::Frame;
use crate::transport::{Transport, TransportLink};

use super::channel::ChannelRegistry;
use super::config::SocketConfig;
use super::event::{SocketEvent, SocketListeners};
use super::manager::SocketState;

// ============================================================================
// Command
// ============================================================================

/// Commands from the public handles to the driver.
pub(crate) enum Command {
    /// Send the join frame for a registered topic.
    Join(Topic),

    /// Send a shout frame on a topic.
    Push {
        /// Target topic.
        topic: Topic,
        /// User message, becomes `payload.message`.
        message: Value,
    },

    /// Replace the reconnection policy, effective at the next close.
    ConfigureReconnect {
        max_attempts: u32,
        interval: Duration,
    },

    /// Replace the keepalive schedule; `None` disables keepalive.
    SetKeepAlive(Option<Duration>),

    /// Tear the socket down.
    Shutdown,
}

// ============================================================================
// SessionEnd
// ============================================================================

/// Why a connection session ended.
enum SessionEnd {
    /// The link was lost; the reconnect budget decides what happens next.
    Lost,
    /// Shutdown was requested; the driver exits.
    Shutdown,
}

// ============================================================================
// Driver
// ============================================================================

/// The connection event loop, one task per socket manager.
pub(crate) struct Driver {
    url: String,
    transport: Box<dyn Transport>,
    commands: mpsc::UnboundedReceiver<Command>,
    state: watch::Sender<SocketState>,
    listeners: Arc<SocketListeners>,
    registry: Arc<ChannelRegistry>,

    max_reconnect_attempts: u32,
    reconnect_interval: Duration,
    keepalive: Option<Duration>,

    /// Consecutive failed/closed cycles since the last open.
    reconnect_attempts: u32,
}

impl Driver {
    pub(crate) fn new(
        url: String,
        transport: Box<dyn Transport>,
        config: &SocketConfig,
        commands: mpsc::UnboundedReceiver<Command>,
        state: watch::Sender<SocketState>,
        listeners: Arc<SocketListeners>,
        registry: Arc<ChannelRegistry>,
    ) -> Self {
        Self {
            url,
            transport,
            commands,
            state,
            listeners,
            registry,
            max_reconnect_attempts: config.max_reconnect_attempts,
            reconnect_interval: config.reconnect_interval,
            keepalive: config.keepalive,
            reconnect_attempts: 0,
        }
    }

    /// Runs the connect/reconnect cycle until shutdown or budget exhaustion.
    pub(crate) async fn run(mut self) {
        loop {
            self.state.send_replace(SocketState::Connecting);
            debug!(url = %self.url, attempt = self.reconnect_attempts, "Connecting");

            let end = match self.transport.connect(&self.url).await {
                Ok(link) => self.drive_link(link).await,
                Err(e) => {
                    warn!(error = %e, "Connect attempt failed");
                    self.emit(SocketEvent::Error {
                        message: e.to_string(),
                    });
                    self.emit(SocketEvent::Close);
                    SessionEnd::Lost
                }
            };

            self.state.send_replace(SocketState::Closed);

            if matches!(end, SessionEnd::Shutdown) {
                break;
            }

            // Fixed-budget capped retry: past the budget the driver stops
            // silently; the state watch is the only observation point.
            if self.reconnect_attempts >= self.max_reconnect_attempts {
                debug!(
                    attempts = self.reconnect_attempts,
                    "Reconnect budget exhausted, giving up"
                );
                break;
            }
            self.reconnect_attempts += 1;

            if !self.backoff().await {
                break;
            }
        }

        debug!("Socket driver terminated");
    }
}

// ============================================================================
// Driver - Session
// ============================================================================

impl Driver {
    /// Drives one live connection until it is lost or shut down.
    async fn drive_link(&mut self, mut link: Box<dyn TransportLink>) -> SessionEnd {
        self.reconnect_attempts = 0;
        self.state.send_replace(SocketState::Open);

        let mut refs = RefSeq::new();
        let mut joined: FxHashSet<ChannelId> = FxHashSet::default();

        // The server does not persist channel membership across a physical
        // reconnect; replay every join in channel-creation order.
        let channels = self.registry.in_order();
        for channel in &channels {
            let frame = Frame::join(channel.topic().clone(), refs.next());
            if let Err(e) = Self::send_frame(&mut link, &frame).await {
                return self.fail_link(&mut link, &e).await;
            }
            channel.mark_join_sent();
            joined.insert(channel.id());
        }

        self.emit(SocketEvent::Open);
        info!(url = %self.url, channels = channels.len(), "Socket open");

        let mut keepalive = Self::keepalive_timer(self.keepalive);

        loop {
            tokio::select! {
                inbound = link.recv() => match inbound {
                    Some(Ok(text)) => self.handle_inbound(&text),

                    Some(Err(e)) => {
                        // A transport error is fatal to the current
                        // connection; force-close and take the retry path.
                        return self.fail_link(&mut link, &e).await;
                    }

                    None => {
                        debug!("Connection closed by remote");
                        self.emit(SocketEvent::Close);
                        return SessionEnd::Lost;
                    }
                },

                command = self.commands.recv() => match command {
                    Some(Command::Join(topic)) => {
                        if let Some(channel) = self.registry.get(&topic)
                            && joined.insert(channel.id())
                        {
                            let frame = Frame::join(topic, refs.next());
                            if let Err(e) = Self::send_frame(&mut link, &frame).await {
                                return self.fail_link(&mut link, &e).await;
                            }
                            channel.mark_join_sent();
                        }
                    }

                    Some(Command::Push { topic, message }) => {
                        let frame = Frame::shout(topic, message, refs.next());
                        if let Err(e) = Self::send_frame(&mut link, &frame).await {
                            return self.fail_link(&mut link, &e).await;
                        }
                    }

                    Some(Command::ConfigureReconnect { max_attempts, interval }) => {
                        self.max_reconnect_attempts = max_attempts;
                        self.reconnect_interval = interval;
                    }

                    Some(Command::SetKeepAlive(period)) => {
                        self.keepalive = period;
                        keepalive = Self::keepalive_timer(period);
                    }

                    Some(Command::Shutdown) | None => {
                        debug!("Shutdown requested");
                        link.close().await;
                        return SessionEnd::Shutdown;
                    }
                },

                _ = Self::keepalive_tick(&mut keepalive) => {
                    if let Err(e) = Self::send_frame(&mut link, &Frame::keepalive()).await {
                        return self.fail_link(&mut link, &e).await;
                    }
                }
            }
        }
    }

    /// Emits `Error` and `Close`, discarding the link.
    async fn fail_link(
        &mut self,
        link: &mut Box<dyn TransportLink>,
        err: &Error,
    ) -> SessionEnd {
        warn!(error = %err, "Connection failure");
        self.emit(SocketEvent::Error {
            message: err.to_string(),
        });
        link.close().await;
        self.emit(SocketEvent::Close);
        SessionEnd::Lost
    }

    /// Emits the raw message event, decodes, and routes one inbound frame.
    fn handle_inbound(&self, text: &str) {
        self.emit(SocketEvent::Message {
            raw: text.to_string(),
        });

        match Frame::decode(text) {
            Ok(frame) => match self.registry.get(&frame.topic) {
                Some(channel) => channel.handle_frame(&frame),
                None => trace!(topic = %frame.topic, "Dropping frame for unknown topic"),
            },
            Err(e) => {
                // Malformed input must not take the event loop down.
                warn!(error = %e, "Failed to decode inbound frame");
                self.emit(SocketEvent::Error {
                    message: e.to_string(),
                });
            }
        }
    }
}

// ============================================================================
// Driver - Backoff
// ============================================================================

impl Driver {
    /// Waits out the reconnect interval.
    ///
    /// Commands are still applied while waiting; returns `false` when
    /// shutdown arrives mid-backoff, cancelling the scheduled reconnect.
    async fn backoff(&mut self) -> bool {
        debug!(delay = ?self.reconnect_interval, "Reconnect scheduled");

        let retry = tokio::time::sleep(self.reconnect_interval);
        tokio::pin!(retry);

        loop {
            tokio::select! {
                _ = &mut retry => return true,

                command = self.commands.recv() => match command {
                    Some(Command::Shutdown) | None => {
                        debug!("Shutdown requested, cancelling scheduled reconnect");
                        return false;
                    }
                    Some(command) => self.apply_offline(command),
                },
            }
        }
    }

    /// Applies a command while no link is live.
    fn apply_offline(&mut self, command: Command) {
        match command {
            Command::Join(topic) => {
                trace!(topic = %topic, "Join deferred until socket opens");
            }
            Command::Push { topic, .. } => {
                debug!(topic = %topic, "Dropping frame, socket not open");
            }
            Command::ConfigureReconnect {
                max_attempts,
                interval,
            } => {
                self.max_reconnect_attempts = max_attempts;
                self.reconnect_interval = interval;
            }
            Command::SetKeepAlive(period) => self.keepalive = period,
            Command::Shutdown => {}
        }
    }
}

// ============================================================================
// Driver - Helpers
// ============================================================================

impl Driver {
    fn emit(&self, event: SocketEvent) {
        self.listeners.emit(&event);
    }

    async fn send_frame(link: &mut Box<dyn TransportLink>, frame: &Frame) -> Result<()> {
        let text = frame.encode()?;
        trace!(
            topic = %frame.topic,
            event = %frame.event,
            reference = %frame.reference,
            "Frame sent"
        );
        link.send(text).await
    }

    fn keepalive_timer(period: Option<Duration>) -> Option<Interval> {
        period.map(|period| {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        })
    }

    /// Pends forever while keepalive is disabled.
    async fn keepalive_tick(keepalive: &mut Option<Interval>) {
        match keepalive {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending().await,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
