//! Channels: topic-scoped subscriptions over the shared connection.
//!
//! A [`Channel`] represents one logical topic multiplexed over the manager's
//! single physical connection. Channels own their message listeners and
//! their join state; they never touch the transport directly. Sending goes
//! through the manager's command queue, a non-owning send capability.
//!
//! # Join State
//!
//! Joining is optimistic: the join frame is sent (and re-sent on every
//! reconnect) without waiting for confirmation. The channel tracks an
//! internal ack-pending flag that a `phx_reply` frame for the topic clears;
//! it never blocks [`Channel::send`].

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{trace, warn};

use crate::error::{Error, Result};
use crate::ids::{ChannelId, Topic};
use crate::protocol::Frame;

use super::driver::Command;

// ============================================================================
// Listener Types
// ============================================================================

/// Channel message listener callback.
///
/// Invoked with the `message` field of each routed frame's payload
/// ([`Value::Null`] when absent).
pub type MessageListener = Arc<dyn Fn(&Value) + Send + Sync>;

// ============================================================================
// ChannelShared
// ============================================================================

/// Channel state shared between the public handle and the driver task.
pub(crate) struct ChannelShared {
    id: ChannelId,
    topic: Topic,
    listeners: Mutex<Vec<MessageListener>>,
    join_ack_pending: AtomicBool,
}

impl ChannelShared {
    pub(crate) fn new(topic: Topic) -> Self {
        Self {
            id: ChannelId::next(),
            topic,
            listeners: Mutex::new(Vec::new()),
            join_ack_pending: AtomicBool::new(false),
        }
    }

    #[inline]
    pub(crate) fn id(&self) -> ChannelId {
        self.id
    }

    #[inline]
    pub(crate) fn topic(&self) -> &Topic {
        &self.topic
    }

    /// Records that a join frame went out on the current connection.
    pub(crate) fn mark_join_sent(&self) {
        self.join_ack_pending.store(true, Ordering::SeqCst);
    }

    pub(crate) fn awaiting_join_ack(&self) -> bool {
        self.join_ack_pending.load(Ordering::SeqCst)
    }

    /// Dispatches a routed inbound frame to this channel's listeners.
    ///
    /// Re-validates the topic defensively; a mismatched frame is dropped.
    pub(crate) fn handle_frame(&self, frame: &Frame) {
        if frame.topic != self.topic {
            warn!(
                frame_topic = %frame.topic,
                channel_topic = %self.topic,
                "Dropping misrouted frame"
            );
            return;
        }

        if frame.is_reply() {
            self.join_ack_pending.store(false, Ordering::SeqCst);
        }

        trace!(topic = %self.topic, event = %frame.event, "Channel frame dispatched");

        let message = frame.message();
        let listeners: Vec<MessageListener> = self.listeners.lock().to_vec();
        for listener in &listeners {
            listener(&message);
        }
    }

    fn register(&self, listener: MessageListener) {
        self.listeners.lock().push(listener);
    }
}

// ============================================================================
// Channel
// ============================================================================

/// One logical topic subscription.
///
/// Created by [`SocketManager::join_channel`]; cheaply cloneable. The
/// channel lives until the manager is torn down; topics are never removed,
/// only rejoined after a reconnect.
///
/// [`SocketManager::join_channel`]: crate::SocketManager::join_channel
#[derive(Clone)]
pub struct Channel {
    shared: Arc<ChannelShared>,
    commands: mpsc::UnboundedSender<Command>,
}

impl Channel {
    pub(crate) fn new(
        shared: Arc<ChannelShared>,
        commands: mpsc::UnboundedSender<Command>,
    ) -> Self {
        Self { shared, commands }
    }

    /// Returns the channel's topic.
    #[inline]
    #[must_use]
    pub fn topic(&self) -> &Topic {
        self.shared.topic()
    }

    /// Registers an inbound message listener.
    ///
    /// Listeners fire in registration order, on the driver task.
    pub fn on_message(&self, listener: impl Fn(&Value) + Send + Sync + 'static) {
        self.shared.register(Arc::new(listener));
    }

    /// Sends a message on this channel.
    ///
    /// Delivery is best-effort: while the socket is not open the frame is
    /// dropped, matching the channel's optimistic join model.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Shutdown`] once the manager has been torn down, or
    /// [`Error::Json`] if the message does not serialize.
    pub fn send<T: Serialize>(&self, message: &T) -> Result<()> {
        let message = serde_json::to_value(message)?;

        self.commands
            .send(Command::Push {
                topic: self.shared.topic().clone(),
                message,
            })
            .map_err(|_| Error::Shutdown)
    }

    /// Returns `true` while a join sent on the current connection has not
    /// seen a server reply yet.
    #[inline]
    #[must_use]
    pub fn awaiting_join_ack(&self) -> bool {
        self.shared.awaiting_join_ack()
    }
}

// ============================================================================
// ChannelRegistry
// ============================================================================

/// Topic-keyed registry of live channels.
///
/// Shared between manager handles (insertion) and the driver task (routing,
/// join replay). Tracks creation order so joins replay in the order the
/// channels were created; re-joining an existing topic replaces the channel
/// in place and keeps its replay position.
#[derive(Default)]
pub(crate) struct ChannelRegistry {
    inner: Mutex<RegistryInner>,
}

#[derive(Default)]
struct RegistryInner {
    by_topic: FxHashMap<Topic, Arc<ChannelShared>>,
    order: Vec<Topic>,
}

impl ChannelRegistry {
    /// Inserts a channel, replacing any live channel for the same topic.
    pub(crate) fn insert(&self, channel: Arc<ChannelShared>) {
        let mut inner = self.inner.lock();
        let topic = channel.topic().clone();

        if inner.by_topic.insert(topic.clone(), channel).is_none() {
            inner.order.push(topic);
        }
    }

    /// Looks up the channel for a topic.
    pub(crate) fn get(&self, topic: &Topic) -> Option<Arc<ChannelShared>> {
        self.inner.lock().by_topic.get(topic).cloned()
    }

    /// Snapshot of all channels in creation order.
    pub(crate) fn in_order(&self) -> Vec<Arc<ChannelShared>> {
        let inner = self.inner.lock();
        inner
            .order
            .iter()
            .filter_map(|topic| inner.by_topic.get(topic).cloned())
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.inner.lock().by_topic.len()
    }
}

// ============================================================================
// Tests
// ============================================================================
