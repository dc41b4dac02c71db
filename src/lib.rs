//! sockmux - Reconnecting WebSocket channel multiplexer.
//!
//! This library maintains one persistent WebSocket connection and
//! multiplexes it into named logical channels identified by topic strings,
//! providing topic-based publish/subscribe messaging with automatic
//! reconnection.
//!
//! # Architecture
//!
//! - Each [`SocketManager`] owns: one driver task + one live transport link
//! - Channels are logical; they share the physical connection and hold only
//!   a send capability, never the transport itself
//! - After a reconnect, every channel's join is replayed in creation order;
//!   the server does not persist channel membership across connections
//! - Reconnection uses a fixed-budget capped retry policy (no exponential
//!   backoff); the budget refills on every successful open
//!
//! # Quick Start
//!
//! ```no_run
//! use sockmux::{SocketConfig, SocketEventKind, SocketManager};
//!
//! #[tokio::main]
//! async fn main() -> sockmux::Result<()> {
//!     let manager = SocketManager::new(SocketConfig::new("publish.ip1.cc:4000"))?;
//!
//!     manager.on(SocketEventKind::Open, |_| println!("socket open"));
//!     manager.on(SocketEventKind::Close, |_| println!("socket closed"));
//!
//!     let channel = manager.join_channel("someTopic");
//!     channel.on_message(|message| println!("someTopic: {message}"));
//!     channel.send(&"hello there")?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Error types and [`Result`] alias |
//! | [`ids`] | Type-safe identifiers: [`Topic`], [`Ref`] |
//! | [`protocol`] | Wire frame types (internal format) |
//! | [`socket`] | Socket entities: [`SocketManager`], [`Channel`] |
//! | [`transport`] | Transport seam and WebSocket implementation |
//!
//! # Delivery Semantics
//!
//! Messaging is best-effort: no acknowledgement tracking, no ordering
//! recovery across a reconnect gap, no at-least-once guarantee. Frames sent
//! while the socket is not open are dropped.

// ============================================================================
// Modules
// ============================================================================

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers for socket entities.
///
/// Newtype wrappers prevent mixing incompatible values at compile time.
pub mod ids;

/// Wire protocol message types.
///
/// Internal module defining the frame structure exchanged over the
/// transport.
pub mod protocol;

/// Socket entities: manager, channels, driver.
///
/// The core of the crate; start at [`SocketManager`].
pub mod socket;

/// Transport layer.
///
/// The transport seam the driver talks through, and its WebSocket
/// implementation.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Socket types
pub use socket::{
    Channel, MessageListener, SocketConfig, SocketEvent, SocketEventKind, SocketListener,
    SocketManager, SocketState,
};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use ids::{Ref, Topic};

// Protocol types
pub use protocol::Frame;

// Transport seam
pub use transport::{Transport, TransportLink, WsTransport};
