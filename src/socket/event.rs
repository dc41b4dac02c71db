//! Connection-level socket events.
//!
//! The socket manager emits one event stream per physical connection
//! lifecycle. Event kinds form a closed enum: registering a listener for an
//! unknown kind is a compile-time error rather than a silently ignored
//! string key.
//!
//! | Kind | Fired when |
//! |------|------------|
//! | `Open` | a transport connection is established (after join replay) |
//! | `Close` | the current connection is lost or closed |
//! | `Error` | a transport or frame-decode failure occurs |
//! | `Message` | any inbound text frame arrives, before routing |

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use parking_lot::Mutex;

// ============================================================================
// SocketEvent
// ============================================================================

/// A connection-level lifecycle event.
#[derive(Debug, Clone)]
pub enum SocketEvent {
    /// Transport connection established.
    Open,

    /// Transport connection lost or closed.
    Close,

    /// Transport or decode failure on the current connection.
    Error {
        /// Description of the failure.
        message: String,
    },

    /// Raw inbound frame text, emitted before topic routing.
    Message {
        /// The frame text as delivered by the transport.
        raw: String,
    },
}

impl SocketEvent {
    /// Returns the kind of this event.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> SocketEventKind {
        match self {
            Self::Open => SocketEventKind::Open,
            Self::Close => SocketEventKind::Close,
            Self::Error { .. } => SocketEventKind::Error,
            Self::Message { .. } => SocketEventKind::Message,
        }
    }
}

// ============================================================================
// SocketEventKind
// ============================================================================

/// Discriminator for [`SocketEvent`] listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketEventKind {
    /// Connection established.
    Open,
    /// Connection lost or closed.
    Close,
    /// Transport or decode failure.
    Error,
    /// Raw inbound frame.
    Message,
}

impl SocketEventKind {
    pub(crate) const COUNT: usize = 4;

    #[inline]
    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Open => 0,
            Self::Close => 1,
            Self::Error => 2,
            Self::Message => 3,
        }
    }
}

// ============================================================================
// Listener Types
// ============================================================================

/// Connection-level event listener callback.
pub type SocketListener = Arc<dyn Fn(&SocketEvent) + Send + Sync>;

// ============================================================================
// SocketListeners
// ============================================================================

/// Listener registry, one ordered slot per event kind.
///
/// Shared between the manager handle (registration) and the driver task
/// (emission). Listeners for a kind fire in registration order.
#[derive(Default)]
pub(crate) struct SocketListeners {
    slots: Mutex<[Vec<SocketListener>; SocketEventKind::COUNT]>,
}

impl SocketListeners {
    /// Registers a listener for one event kind.
    pub(crate) fn register(&self, kind: SocketEventKind, listener: SocketListener) {
        self.slots.lock()[kind.index()].push(listener);
    }

    /// Emits an event to every listener registered for its kind.
    ///
    /// The slot is cloned before invocation so listeners may register
    /// further listeners without deadlocking.
    pub(crate) fn emit(&self, event: &SocketEvent) {
        let listeners: Vec<SocketListener> =
            self.slots.lock()[event.kind().index()].to_vec();

        for listener in &listeners {
            listener(event);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
