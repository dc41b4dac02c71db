//! Transport layer.
//!
//! The socket driver does not talk to a WebSocket directly; it talks to the
//! [`Transport`] / [`TransportLink`] seam, a reliable ordered message
//! transport with connect / send / receive / close semantics. The production
//! implementation is [`WsTransport`] over `tokio-tungstenite`.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   connect()    ┌───────────────┐    ws(s)://…    ┌────────┐
//! │ Socket driver│───────────────►│ TransportLink │◄───────────────►│ Server │
//! │ (event loop) │  send()/recv() │ (one per      │                 │        │
//! │              │                │  connection)  │                 │        │
//! └──────────────┘                └───────────────┘                 └────────┘
//! ```
//!
//! # Link Semantics
//!
//! - [`TransportLink::recv`] yields text frames in delivery order;
//!   `Some(Err(_))` is a transport failure, `None` a clean close.
//! - Exactly one link is live per driver at any time; the driver discards a
//!   lost link entirely before connecting anew.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `ws` | tokio-tungstenite WebSocket implementation |

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;

use crate::error::Result;

// ============================================================================
// Submodules
// ============================================================================

/// WebSocket transport implementation.
pub mod ws;

#[cfg(test)]
pub(crate) mod fake;

// ============================================================================
// Re-exports
// ============================================================================

pub use ws::WsTransport;

// ============================================================================
// Transport
// ============================================================================

/// Factory for transport connections.
///
/// One `Transport` serves a socket manager for its whole life; every
/// (re)connect attempt calls [`Transport::connect`] afresh.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Opens a new link to the endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`](crate::Error::Connection) (or a
    /// transport-specific error) if the endpoint cannot be reached.
    async fn connect(&self, url: &str) -> Result<Box<dyn TransportLink>>;
}

// ============================================================================
// TransportLink
// ============================================================================

/// One live bidirectional connection.
#[async_trait]
pub trait TransportLink: Send {
    /// Sends one text frame.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the link is no longer usable.
    async fn send(&mut self, text: String) -> Result<()>;

    /// Receives the next text frame.
    ///
    /// Returns `Some(Ok(text))` for a frame, `Some(Err(_))` on transport
    /// failure, and `None` once the link is cleanly closed.
    async fn recv(&mut self) -> Option<Result<String>>;

    /// Closes the link. Best-effort; errors are discarded.
    async fn close(&mut self);
}
